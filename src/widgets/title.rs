use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::gradient::{generate, GradientParameters};

/// Phases of the title gradient.
const TITLE_PHASES: [f64; 3] = [0.0, 2.0, 4.0];

/// Frequencies of the title gradient.
///
/// The extended application variant wrote its header literal as
/// `[0,3, 0.3, 0.3]`, so the red channel stays flat and green runs ten times
/// faster than blue. The look is kept as is.
const TITLE_FREQUENCIES: [f64; 3] = [0.0, 3.0, 0.3];

/// A line of text where every character gets the next color of a sine
/// gradient.
#[derive(Debug, Clone)]
pub struct GradientTitle<'a> {
    text: &'a str,
    gradient: GradientParameters,
    style: Style,
}

impl<'a> GradientTitle<'a> {
    /// Constructs a title colored with the application header gradient.
    pub fn new(text: &'a str) -> Self {
        let length = text.chars().count();
        Self {
            text,
            gradient: GradientParameters::new(length)
                .frequencies(TITLE_FREQUENCIES)
                .phases(TITLE_PHASES),
            style: Style::new().add_modifier(Modifier::BOLD),
        }
    }

    /// Overrides the gradient frequencies.
    pub fn frequencies(mut self, frequencies: [f64; 3]) -> Self {
        self.gradient = self.gradient.frequencies(frequencies);
        self
    }

    /// Sets the base style.
    pub fn style<S: Into<Style>>(mut self, style: S) -> Self {
        self.style = style.into();
        self
    }

    /// Returns the colored line.
    pub fn line(&self) -> Line<'a> {
        let colors = generate(&self.gradient);
        let text = self.text;
        let spans: Vec<Span<'a>> = text
            .char_indices()
            .zip(colors.iter())
            .map(|((offset, ch), rgb)| {
                let end = offset + ch.len_utf8();
                Span::styled(&text[offset..end], self.style.fg(rgb.to_color()))
            })
            .collect();
        Line::from(spans)
    }
}

impl Widget for GradientTitle<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.line().centered().render(area, buf);
    }
}
