//! Sine-wave color gradients.
//!
//! Every channel of a gradient entry is driven by its own sine wave:
//!
//! ```text
//! value(i) = round(sin(frequency * i + phase) * width + center)
//! ```
//!
//! Channel values are rounded but never clamped. With the default center of
//! `128` and width of `127` they stay within `1..=255`, but other
//! combinations can push them out of the displayable range. Consumers decide
//! what to do with such values, see [`Rgb::to_color`].

use std::fmt;

use compact_str::{format_compact, CompactString};
use ratatui::style::Color;

/// Default mean channel value.
pub const DEFAULT_CENTER: f64 = 128.0;

/// Default channel amplitude.
pub const DEFAULT_WIDTH: f64 = 127.0;

/// Default gradient length.
pub const DEFAULT_LENGTH: usize = 50;

/// Index of each channel in the frequency and phase lists.
const CHANNELS: [usize; 3] = [0, 1, 2];

/// Parameters of a sine-wave gradient.
///
/// `frequencies` and `phases` hold one entry per channel in red, green, blue
/// order. Missing entries are read as `0`, so a partially filled list is
/// valid input.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientParameters {
    /// Angular rate per index of each channel.
    pub frequencies: Vec<f64>,
    /// Offset in radians of each channel.
    pub phases: Vec<f64>,
    /// Mean channel value.
    pub center: f64,
    /// Channel amplitude.
    pub width: f64,
    /// Number of entries to generate.
    pub length: usize,
}

impl Default for GradientParameters {
    fn default() -> Self {
        Self {
            frequencies: Vec::new(),
            phases: Vec::new(),
            center: DEFAULT_CENTER,
            width: DEFAULT_WIDTH,
            length: DEFAULT_LENGTH,
        }
    }
}

impl GradientParameters {
    /// Constructs parameters for a gradient of the given length.
    pub fn new(length: usize) -> Self {
        Self {
            length,
            ..Default::default()
        }
    }

    /// Sets the channel frequencies.
    pub fn frequencies<I: IntoIterator<Item = f64>>(mut self, frequencies: I) -> Self {
        self.frequencies = frequencies.into_iter().collect();
        self
    }

    /// Sets the channel phases.
    pub fn phases<I: IntoIterator<Item = f64>>(mut self, phases: I) -> Self {
        self.phases = phases.into_iter().collect();
        self
    }

    /// Sets the mean channel value.
    pub fn center(mut self, center: f64) -> Self {
        self.center = center;
        self
    }

    /// Sets the channel amplitude.
    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    fn channel(&self, channel: usize, index: usize) -> i32 {
        let frequency = self.frequencies.get(channel).copied().unwrap_or_default();
        let phase = self.phases.get(channel).copied().unwrap_or_default();
        round_half_up((frequency * index as f64 + phase).sin() * self.width + self.center)
    }
}

/// Rounds to the nearest integer, with halves going towards positive infinity,
/// like the browser's `Math.round`.
///
/// `f64::round` rounds halves away from zero, which differs for negative
/// halves (`-2.5` becomes `-3` instead of `-2`).
fn round_half_up(value: f64) -> i32 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor as i32 + 1
    } else {
        floor as i32
    }
}

/// An unclamped RGB triple.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub red: i32,
    pub green: i32,
    pub blue: i32,
}

impl Rgb {
    /// Constructs a new [`Rgb`].
    pub const fn new(red: i32, green: i32, blue: i32) -> Self {
        Self { red, green, blue }
    }

    /// Returns the CSS representation, e.g. `rgb(128,128,128)`.
    pub fn css(&self) -> CompactString {
        format_compact!("rgb({},{},{})", self.red, self.green, self.blue)
    }

    /// Converts to a displayable color, saturating every channel into `0..=255`.
    pub fn to_color(self) -> Color {
        let clamp = |value: i32| value.clamp(0, u8::MAX as i32) as u8;
        Color::Rgb(clamp(self.red), clamp(self.green), clamp(self.blue))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.red, self.green, self.blue)
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        rgb.to_color()
    }
}

/// An immutable, index-addressable sequence of gradient colors.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ColorSequence {
    colors: Vec<Rgb>,
}

impl ColorSequence {
    /// Returns the number of colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns `true` if the sequence has no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns the color at `index`.
    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).copied()
    }

    /// Returns an iterator over the colors.
    pub fn iter(&self) -> std::slice::Iter<'_, Rgb> {
        self.colors.iter()
    }

    /// Returns the colors as a slice.
    pub fn as_slice(&self) -> &[Rgb] {
        &self.colors
    }

    /// Returns every color in its CSS representation.
    pub fn to_css(&self) -> Vec<CompactString> {
        self.colors.iter().map(Rgb::css).collect()
    }
}

impl<'a> IntoIterator for &'a ColorSequence {
    type Item = &'a Rgb;
    type IntoIter = std::slice::Iter<'a, Rgb>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.iter()
    }
}

/// Generates the color sequence described by `params`.
pub fn generate(params: &GradientParameters) -> ColorSequence {
    let colors = (0..params.length)
        .map(|index| {
            let [red, green, blue] = CHANNELS.map(|channel| params.channel(channel, index));
            Rgb::new(red, green, blue)
        })
        .collect();
    ColorSequence { colors }
}
