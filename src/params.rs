//! User-tunable animation parameters.
//!
//! [`ParameterStore`] is the single mutable configuration of the app. Input
//! handling mutates it between frames; the frame builder reads a snapshot of
//! it once per frame.

use std::{fmt, ops::RangeInclusive};

use crate::{
    gradient::{GradientParameters, DEFAULT_CENTER, DEFAULT_WIDTH},
    height::{HeightTransform, TileAnimationParameters},
};

/// One of the three color channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// All channels in gradient order.
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Channel::Red => "red",
            Channel::Green => "green",
            Channel::Blue => "blue",
        }
    }
}

/// A slider-adjustable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// Number of tiles.
    Resolution,
    /// Oscillation speed (the frequency factor).
    Speed,
    /// Phase spread across the tiles (the phase factor).
    Frequency,
    /// Frequency increase across the tiles.
    Modulation,
    /// Mean channel value of the tile gradient.
    ColorCenter,
    /// Gradient frequency of one channel.
    ColorFrequency(Channel),
    /// Gradient phase of one channel.
    ColorPhase(Channel),
}

impl Parameter {
    /// All parameters, in the order the settings panel lists them.
    pub const ALL: [Parameter; 11] = [
        Parameter::Resolution,
        Parameter::Speed,
        Parameter::Frequency,
        Parameter::Modulation,
        Parameter::ColorCenter,
        Parameter::ColorFrequency(Channel::Red),
        Parameter::ColorFrequency(Channel::Green),
        Parameter::ColorFrequency(Channel::Blue),
        Parameter::ColorPhase(Channel::Red),
        Parameter::ColorPhase(Channel::Green),
        Parameter::ColorPhase(Channel::Blue),
    ];

    /// Returns the accepted values.
    pub fn range(self) -> RangeInclusive<f64> {
        match self {
            Parameter::Resolution => 1.0..=1000.0,
            Parameter::Speed | Parameter::Frequency => 0.0..=500.0,
            Parameter::Modulation => 0.0..=50.0,
            Parameter::ColorCenter => -150.0..=400.0,
            Parameter::ColorFrequency(_) | Parameter::ColorPhase(_) => -10.0..=10.0,
        }
    }

    /// Returns the slider step.
    pub fn step(self) -> f64 {
        match self {
            Parameter::ColorFrequency(_) | Parameter::ColorPhase(_) => 0.1,
            _ => 1.0,
        }
    }

    /// Returns the settings panel label.
    pub fn label(self) -> &'static str {
        match self {
            Parameter::Resolution => "Resolution",
            Parameter::Speed => "Speed",
            Parameter::Frequency => "Frequency",
            Parameter::Modulation => "Modulation",
            Parameter::ColorCenter => "Color center",
            Parameter::ColorFrequency(Channel::Red) => "Red frequency",
            Parameter::ColorFrequency(Channel::Green) => "Green frequency",
            Parameter::ColorFrequency(Channel::Blue) => "Blue frequency",
            Parameter::ColorPhase(Channel::Red) => "Red phase",
            Parameter::ColorPhase(Channel::Green) => "Green phase",
            Parameter::ColorPhase(Channel::Blue) => "Blue phase",
        }
    }

    /// Returns the query string key, e.g. `speed` or `red-phase`.
    pub fn key(self) -> String {
        match self {
            Parameter::Resolution => "resolution".into(),
            Parameter::Speed => "speed".into(),
            Parameter::Frequency => "frequency".into(),
            Parameter::Modulation => "modulation".into(),
            Parameter::ColorCenter => "center".into(),
            Parameter::ColorFrequency(channel) => format!("{}-frequency", channel.name()),
            Parameter::ColorPhase(channel) => format!("{}-phase", channel.name()),
        }
    }

    /// Looks a parameter up by its query string key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|parameter| parameter.key() == key)
    }

    /// Clamps `value` into range and snaps it to the step grid.
    pub fn normalize(self, value: f64) -> f64 {
        let range = self.range();
        let scale = 1.0 / self.step();
        ((value * scale).round() / scale).clamp(*range.start(), *range.end())
    }

    /// Returns the position of `value` within the range, in `[0, 1]`.
    pub fn ratio(self, value: f64) -> f64 {
        let range = self.range();
        ((value - range.start()) / (range.end() - range.start())).clamp(0.0, 1.0)
    }

    /// Formats `value` with the precision of the step.
    pub fn format(self, value: f64) -> String {
        if self.step() < 1.0 {
            format!("{value:.1}")
        } else {
            format!("{value:.0}")
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Half of the tile extent, in percent of the viewport.
pub const TILE_AMPLITUDE: f64 = 50.0;

/// The mutable configuration of the animation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterStore {
    /// Number of tiles, in `1..=1000`.
    pub resolution: u32,
    /// Oscillation speed, in `0..=500`.
    pub frequency_factor: u32,
    /// Phase spread across the tiles, in `0..=500`.
    pub phase_factor: u32,
    /// Frequency increase across the tiles, in `0..=50`.
    pub modulation_factor: u32,
    /// Mean channel value of the tile gradient, in `-150..=400`.
    pub color_center_factor: i32,
    /// Gradient frequency per channel, in `-10.0..=10.0`.
    pub color_frequency: [f64; 3],
    /// Gradient phase per channel, in `-10.0..=10.0`.
    pub color_phase: [f64; 3],
    /// Whether the settings panel is shown.
    pub show_settings: bool,
    /// Whether tiles are drawn as two half-height bands.
    pub enable_double: bool,
    /// Whether tile heights are mirrored.
    pub enable_flip: bool,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self {
            resolution: 200,
            frequency_factor: 0,
            phase_factor: 10,
            modulation_factor: 6,
            color_center_factor: DEFAULT_CENTER as i32,
            color_frequency: [5.0, 5.0, 5.0],
            color_phase: [0.0, 2.0, 4.0],
            show_settings: true,
            enable_double: false,
            enable_flip: false,
        }
    }
}

impl ParameterStore {
    /// Returns the current value of `parameter`.
    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Resolution => self.resolution as f64,
            Parameter::Speed => self.frequency_factor as f64,
            Parameter::Frequency => self.phase_factor as f64,
            Parameter::Modulation => self.modulation_factor as f64,
            Parameter::ColorCenter => self.color_center_factor as f64,
            Parameter::ColorFrequency(channel) => self.color_frequency[channel.index()],
            Parameter::ColorPhase(channel) => self.color_phase[channel.index()],
        }
    }

    /// Sets `parameter`, clamping the value into its range. Returns the
    /// stored value.
    pub fn set(&mut self, parameter: Parameter, value: f64) -> f64 {
        let value = parameter.normalize(value);
        match parameter {
            Parameter::Resolution => self.resolution = value as u32,
            Parameter::Speed => self.frequency_factor = value as u32,
            Parameter::Frequency => self.phase_factor = value as u32,
            Parameter::Modulation => self.modulation_factor = value as u32,
            Parameter::ColorCenter => self.color_center_factor = value as i32,
            Parameter::ColorFrequency(channel) => self.color_frequency[channel.index()] = value,
            Parameter::ColorPhase(channel) => self.color_phase[channel.index()] = value,
        }
        value
    }

    /// Moves `parameter` by `steps` slider steps.
    pub fn adjust(&mut self, parameter: Parameter, steps: i32) -> f64 {
        let value = self.get(parameter) + parameter.step() * steps as f64;
        self.set(parameter, value)
    }

    /// Toggles the settings panel.
    pub fn toggle_settings(&mut self) {
        self.show_settings = !self.show_settings;
    }

    /// Toggles double-row mode.
    pub fn toggle_double(&mut self) {
        self.enable_double = !self.enable_double;
    }

    /// Toggles flip mode.
    pub fn toggle_flip(&mut self) {
        self.enable_flip = !self.enable_flip;
    }

    /// Restores the default slider values. Display toggles are kept.
    pub fn reset(&mut self) {
        *self = Self {
            show_settings: self.show_settings,
            enable_double: self.enable_double,
            enable_flip: self.enable_flip,
            ..Self::default()
        };
    }

    /// Gradient of the tile colors.
    ///
    /// Channel frequencies are given per full sweep of the tiles, so they are
    /// divided by the resolution.
    pub fn gradient_parameters(&self) -> GradientParameters {
        let resolution = self.resolution.max(1) as f64;
        GradientParameters::new(self.resolution as usize)
            .frequencies(self.color_frequency.map(|frequency| frequency / resolution))
            .phases(self.color_phase)
            .center(self.color_center_factor as f64)
            .width(DEFAULT_WIDTH)
    }

    /// Height function inputs of the frame sampled at `time`.
    pub fn tile_parameters(&self, time: i64) -> TileAnimationParameters {
        TileAnimationParameters {
            amplitude: TILE_AMPLITUDE,
            frequency_factor: self.frequency_factor as f64,
            phase_factor: self.phase_factor as f64,
            modulation_factor: self.modulation_factor as f64,
            resolution: self.resolution,
            time,
        }
    }

    /// Post transforms selected by the display toggles.
    pub fn height_transform(&self) -> HeightTransform {
        HeightTransform::new(self.enable_double, self.enable_flip)
    }

    /// Applies overrides from a URL query string such as
    /// `?resolution=300&speed=40&flip=true`.
    ///
    /// Values are clamped. Unknown keys and unparsable values are skipped.
    /// Returns the number of applied overrides.
    pub fn apply_query(&mut self, query: &str) -> usize {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut applied = 0;
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if self.apply_override(key, value) {
                applied += 1;
            } else {
                tracing::warn!(key, value, "ignoring query parameter");
            }
        }
        applied
    }

    fn apply_override(&mut self, key: &str, value: &str) -> bool {
        let toggle = match key {
            "settings" => Some(&mut self.show_settings),
            "double" => Some(&mut self.enable_double),
            "flip" => Some(&mut self.enable_flip),
            _ => None,
        };
        if let Some(toggle) = toggle {
            return match parse_flag(value) {
                Some(flag) => {
                    *toggle = flag;
                    true
                }
                None => false,
            };
        }
        match (Parameter::from_key(key), value.parse::<f64>()) {
            (Some(parameter), Ok(value)) if value.is_finite() => {
                let stored = self.set(parameter, value);
                tracing::debug!(key, stored, "applied query parameter");
                true
            }
            _ => false,
        }
    }
}

/// Parses a query string flag. A bare key counts as `true`.
fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "" | "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn defaults_drive_the_gradient() {
        let store = ParameterStore::default();
        let gradient = store.gradient_parameters();
        assert_eq!(gradient.length, 200);
        assert_eq!(gradient.frequencies, vec![0.025, 0.025, 0.025]);
        assert_eq!(gradient.phases, vec![0.0, 2.0, 4.0]);
        assert_eq!(gradient.center, 128.0);
        assert_eq!(gradient.width, 127.0);
    }

    #[test]
    fn setters_clamp_and_snap() {
        let mut store = ParameterStore::default();
        assert_eq!(store.set(Parameter::Resolution, 0.0), 1.0);
        assert_eq!(store.resolution, 1);
        assert_eq!(store.set(Parameter::Speed, 9_000.0), 500.0);
        assert_eq!(store.set(Parameter::ColorCenter, -400.0), -150.0);
        assert_eq!(store.set(Parameter::ColorPhase(Channel::Green), 0.26), 0.3);
        assert_eq!(store.color_phase, [0.0, 0.3, 4.0]);
    }

    #[test]
    fn adjust_moves_by_steps() {
        let mut store = ParameterStore::default();
        assert_eq!(store.adjust(Parameter::Modulation, 3), 9.0);
        assert_eq!(store.adjust(Parameter::Modulation, -100), 0.0);
        assert_eq!(store.adjust(Parameter::ColorFrequency(Channel::Blue), -2), 4.8);
    }

    #[test]
    fn reset_keeps_toggles() {
        let mut store = ParameterStore::default();
        store.toggle_flip();
        store.toggle_settings();
        store.set(Parameter::Speed, 42.0);
        store.reset();
        assert_eq!(store.frequency_factor, 0);
        assert!(store.enable_flip);
        assert!(!store.show_settings);
    }

    #[test]
    fn toggles_select_transforms() {
        let mut store = ParameterStore::default();
        assert_eq!(store.height_transform(), HeightTransform::new(false, false));
        store.toggle_double();
        store.toggle_flip();
        assert_eq!(store.height_transform(), HeightTransform::new(true, true));
    }

    #[test]
    fn query_overrides() {
        let mut store = ParameterStore::default();
        let applied =
            store.apply_query("?resolution=300&speed=4000&flip&settings=off&red-phase=1.25");
        assert_eq!(applied, 5);
        assert_eq!(store.resolution, 300);
        assert_eq!(store.frequency_factor, 500);
        assert!(store.enable_flip);
        assert!(!store.show_settings);
        assert_eq!(store.color_phase[0], 1.3);
    }

    #[test]
    fn query_skips_garbage() {
        let mut store = ParameterStore::default();
        assert_eq!(store.apply_query("volume=11&speed=fast&double=maybe&&"), 0);
        assert_eq!(store.apply_query("speed=NaN"), 0);
        assert_eq!(store, ParameterStore::default());
    }

    #[test]
    fn keys_round_trip() {
        for parameter in Parameter::ALL {
            assert_eq!(Parameter::from_key(&parameter.key()), Some(parameter));
        }
    }

    proptest! {
        #[test]
        fn stored_values_stay_in_range(index in 0usize..11, value in -5_000.0f64..5_000.0) {
            let parameter = Parameter::ALL[index];
            let mut store = ParameterStore::default();
            let stored = store.set(parameter, value);
            prop_assert!(parameter.range().contains(&stored));
            prop_assert_eq!(store.get(parameter), stored);
        }
    }
}
