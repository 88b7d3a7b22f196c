//! The application: input handling and the frame layout.

use std::cell::RefCell;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    Frame,
};

use crate::{
    clock::{AnimationClock, FrameScheduler},
    error::Error,
    event::{KeyCode, KeyEvent},
    frame::{FrameBuilder, TileFrame},
    params::{Parameter, ParameterStore},
    widgets::{Hyperlink, SettingsPanel, SettingsState, TileField},
};

/// Title of the page and of the settings panel.
pub const TITLE: &str = "ColorSine";

/// Link target of the fork banner.
pub const REPOSITORY_URL: &str = "https://github.com/eiriklv/colorsine";

/// Number of slider steps moved by page up and page down.
const PAGE_STEPS: i32 = 10;

/// What the caller has to do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    /// The key is not bound.
    Ignored,
    /// The key changed the application state.
    Handled,
    /// The animation clock should be paused or resumed.
    ToggleClock,
}

/// The application state shared by the key listener and the render loop.
#[derive(Debug, Default)]
pub struct App {
    store: ParameterStore,
    builder: FrameBuilder,
    frame: TileFrame,
    settings: SettingsState,
}

impl App {
    /// Constructs a new [`App`] starting from `store`.
    pub fn new(store: ParameterStore) -> Self {
        Self {
            store,
            ..Self::default()
        }
    }

    /// Returns the parameters.
    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    /// Returns the latest published frame.
    pub fn frame(&self) -> &TileFrame {
        &self.frame
    }

    /// Returns the selected slider.
    pub fn selected(&self) -> Parameter {
        self.settings.selected()
    }

    /// Computes and publishes the frame sampled at `time`.
    ///
    /// On error the previously published frame stays visible.
    pub fn on_tick(&mut self, time: i64) -> Result<(), Error> {
        self.frame = self.builder.build(&self.store, time)?;
        Ok(())
    }

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if key.has_command_modifier() {
            return AppAction::Ignored;
        }
        let selected = self.settings.selected();
        match key.code {
            KeyCode::Char(' ') => return AppAction::ToggleClock,
            KeyCode::Char('s') => self.store.toggle_settings(),
            KeyCode::Char('d') => self.store.toggle_double(),
            KeyCode::Char('f') => self.store.toggle_flip(),
            KeyCode::Char('r') => {
                tracing::info!("restoring default parameters");
                self.store.reset();
            }
            KeyCode::Up => self.settings.select_previous(),
            KeyCode::Down => self.settings.select_next(),
            KeyCode::Left => self.adjust(selected, -1),
            KeyCode::Right => self.adjust(selected, 1),
            KeyCode::PageDown => self.adjust(selected, -PAGE_STEPS),
            KeyCode::PageUp => self.adjust(selected, PAGE_STEPS),
            KeyCode::Home => self.set(selected, *selected.range().start()),
            KeyCode::End => self.set(selected, *selected.range().end()),
            _ => return AppAction::Ignored,
        }
        AppAction::Handled
    }

    fn adjust(&mut self, parameter: Parameter, steps: i32) {
        let value = self.store.adjust(parameter, steps);
        tracing::debug!(%parameter, value, "adjusted parameter");
    }

    fn set(&mut self, parameter: Parameter, value: f64) {
        let value = self.store.set(parameter, value);
        tracing::debug!(%parameter, value, "set parameter");
    }

    /// Draws the tile field, the fork banner and, if enabled, the settings
    /// panel in the top right corner.
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(TileField::new(&self.frame), area);

        let link = Hyperlink::new(REPOSITORY_URL)
            .label("Fork me on GitHub")
            .style(Style::new().fg(Color::White).bg(Color::Black));
        let width = link.width().min(area.width);
        let banner = Rect::new(area.right() - width, area.bottom().saturating_sub(1), width, 1)
            .intersection(area);
        frame.render_widget(link, banner);

        if self.store.show_settings {
            let panel = SettingsPanel::new(&self.store).title(TITLE);
            let (width, height) = panel.size();
            let width = width.min(area.width);
            let panel_area = Rect::new(area.right() - width, area.y, width, height).intersection(area);
            frame.render_stateful_widget(panel, panel_area, &mut self.settings);
        }
    }
}

/// Hands `key` to `app` and keeps `clock` in step with it.
///
/// Pause keys toggle the clock. Any other handled key while the clock is
/// stopped redraws the last frame, so changes show up without resuming.
pub fn dispatch_key<S>(app: &RefCell<App>, clock: &AnimationClock<S>, key: KeyEvent) -> AppAction
where
    S: FrameScheduler + 'static,
{
    let action = app.borrow_mut().handle_key(key);
    match action {
        AppAction::ToggleClock => {
            clock.toggle();
            tracing::info!(state = ?clock.state(), "toggled animation");
        }
        AppAction::Handled if !clock.is_running() => {
            clock.republish();
        }
        _ => {}
    }
    action
}
