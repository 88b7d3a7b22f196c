use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Hyperlink modifier.
///
/// When added as a modifier to a style, the styled element is marked as
/// hyperlink. The DOM backend turns consecutive marked cells into a single
/// `<a>` element whose `href` is the text of those cells.
pub(crate) const HYPERLINK_MODIFIER: Modifier = Modifier::SLOW_BLINK;

/// A widget that can be used to render hyperlinks, optionally preceded by a
/// plain label.
///
/// ```rust no_run
/// use colorsine::widgets::Hyperlink;
///
/// let link = Hyperlink::new("https://github.com/eiriklv/colorsine").label("Fork me on GitHub");
///
/// // Then you can render it as usual:
/// // frame.render_widget(link, frame.area());
/// ```
#[derive(Debug, Clone)]
pub struct Hyperlink<'a> {
    /// Label rendered before the link.
    label: Option<Span<'a>>,
    /// Link target, rendered as the link text.
    url: Span<'a>,
    /// Base style of the whole line.
    style: Style,
}

impl<'a> Hyperlink<'a> {
    /// Constructs a new [`Hyperlink`] widget.
    pub fn new<T>(url: T) -> Self
    where
        T: Into<Span<'a>>,
    {
        let url = url.into();
        let style = url.style.add_modifier(HYPERLINK_MODIFIER);
        Self {
            label: None,
            url: url.style(style),
            style: Style::default(),
        }
    }

    /// Sets the label rendered before the link.
    pub fn label<T>(mut self, label: T) -> Self
    where
        T: Into<Span<'a>>,
    {
        self.label = Some(label.into());
        self
    }

    /// Sets the base style.
    pub fn style<S: Into<Style>>(mut self, style: S) -> Self {
        self.style = style.into();
        self
    }

    /// Returns the number of cells the widget occupies.
    pub fn width(&self) -> u16 {
        let label = self.label.as_ref().map_or(0, |label| label.width() + 1);
        (label + self.url.width()).min(u16::MAX as usize) as u16
    }
}

impl Widget for Hyperlink<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let mut spans = Vec::with_capacity(3);
        if let Some(label) = self.label {
            spans.push(label);
            spans.push(Span::raw(" "));
        }
        spans.push(self.url);
        Line::from(spans).style(self.style).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_only_the_url() {
        let link = Hyperlink::new("https://x.y").label("Fork");
        assert_eq!(link.width(), 16);
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        link.render(area, &mut buf);

        let marked: String = (0..20)
            .map(|x| &buf[(x, 0)])
            .filter(|cell| cell.modifier.contains(HYPERLINK_MODIFIER))
            .map(|cell| cell.symbol())
            .collect();
        assert_eq!(marked, "https://x.y");
        assert!(!buf[(0, 0)].modifier.contains(HYPERLINK_MODIFIER));
    }
}
