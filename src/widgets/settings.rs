use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, LineGauge, StatefulWidget, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    params::{Parameter, ParameterStore},
    widgets::GradientTitle,
};

/// Width of the slider column.
const GAUGE_WIDTH: u16 = 24;

/// Marker in front of the selected slider.
const SELECTION_MARKER: &str = "> ";

/// Key hints at the bottom of the panel.
const HINTS: &str = "s hide  d double  f flip  r reset  space pause";

/// Which slider of the [`SettingsPanel`] is selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsState {
    selected: usize,
}

impl SettingsState {
    /// Returns the selected parameter.
    pub fn selected(&self) -> Parameter {
        Parameter::ALL[self.selected]
    }

    /// Selects the next slider, wrapping around.
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % Parameter::ALL.len();
    }

    /// Selects the previous slider, wrapping around.
    pub fn select_previous(&mut self) {
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(Parameter::ALL.len() - 1);
    }
}

/// The settings panel: one labelled line gauge per [`Parameter`], followed
/// by the display toggles and the key hints.
#[derive(Debug, Clone)]
pub struct SettingsPanel<'a> {
    store: &'a ParameterStore,
    title: &'a str,
}

impl<'a> SettingsPanel<'a> {
    /// Constructs a panel showing the values of `store`.
    pub fn new(store: &'a ParameterStore) -> Self {
        Self {
            store,
            title: "ColorSine",
        }
    }

    /// Sets the title.
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    fn label_width() -> u16 {
        Parameter::ALL
            .iter()
            .map(|parameter| parameter.label().width())
            .max()
            .unwrap_or_default() as u16
            + SELECTION_MARKER.width() as u16
    }

    /// Returns the size the panel needs, borders included.
    pub fn size(&self) -> (u16, u16) {
        let width = (Self::label_width() + 1 + GAUGE_WIDTH).max(HINTS.width() as u16);
        // sliders, a blank line, toggles and hints
        let height = Parameter::ALL.len() as u16 + 3;
        (width + 2, height + 2)
    }

    fn toggles(&self) -> Line<'static> {
        let flag = |name: &'static str, enabled: bool| {
            let style = if enabled {
                Style::new().fg(Color::Green)
            } else {
                Style::new().fg(Color::DarkGray)
            };
            vec![
                Span::raw(name),
                Span::styled(if enabled { "on " } else { "off" }, style),
            ]
        };
        let mut spans = flag("double ", self.store.enable_double);
        spans.push(Span::raw("  "));
        spans.extend(flag("flip ", self.store.enable_flip));
        Line::from(spans)
    }

    fn render_slider(&self, parameter: Parameter, selected: bool, area: Rect, buf: &mut Buffer) {
        let [label_area, _, gauge_area] = Layout::horizontal([
            Constraint::Length(Self::label_width()),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);

        let value = self.store.get(parameter);
        let (marker, label_style, filled) = if selected {
            (
                SELECTION_MARKER,
                Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                Color::Yellow,
            )
        } else {
            ("  ", Style::new(), Color::Gray)
        };
        Line::from(vec![
            Span::raw(marker),
            Span::styled(parameter.label(), label_style),
        ])
        .render(label_area, buf);
        LineGauge::default()
            .ratio(parameter.ratio(value))
            .label(format!("{:>6}", parameter.format(value)))
            .line_set(symbols::line::THICK)
            .filled_style(Style::new().fg(filled))
            .unfilled_style(Style::new().fg(Color::DarkGray))
            .render(gauge_area, buf);
    }
}

impl StatefulWidget for SettingsPanel<'_> {
    type State = SettingsState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        Clear.render(area, buf);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(GradientTitle::new(self.title).line().centered())
            .style(Style::new().bg(Color::Black).fg(Color::White));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows =
            Layout::vertical(vec![Constraint::Length(1); Parameter::ALL.len() + 3]).split(inner);
        for (row, parameter) in rows.iter().zip(Parameter::ALL) {
            self.render_slider(parameter, parameter == state.selected(), *row, buf);
        }
        let toggles = rows[Parameter::ALL.len() + 1];
        self.toggles().render(toggles, buf);
        let hints = rows[Parameter::ALL.len() + 2];
        Line::styled(HINTS, Style::new().fg(Color::DarkGray)).render(hints, buf);
    }
}
