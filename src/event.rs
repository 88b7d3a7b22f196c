//! Keyboard input.

use web_sys::wasm_bindgen::{closure::Closure, JsCast};

use crate::{error::Error, utils::get_document};

/// A key event.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct KeyEvent {
    /// The key code.
    pub code: KeyCode,
    /// Whether the control key is pressed.
    pub ctrl: bool,
    /// Whether the alt key is pressed.
    pub alt: bool,
    /// Whether the shift key is pressed.
    pub shift: bool,
}

impl KeyEvent {
    /// Constructs a key event without modifiers.
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            ctrl: false,
            alt: false,
            shift: false,
        }
    }

    /// Returns `true` if control, alt or meta-like modifiers are held.
    ///
    /// Shortcuts ignore such events so browser bindings keep working.
    pub fn has_command_modifier(&self) -> bool {
        self.ctrl || self.alt
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

/// Convert a [`web_sys::KeyboardEvent`] to a [`KeyEvent`].
impl From<web_sys::KeyboardEvent> for KeyEvent {
    fn from(event: web_sys::KeyboardEvent) -> Self {
        KeyEvent {
            code: KeyCode::from_key(&event.key()),
            ctrl: event.ctrl_key() || event.meta_key(),
            alt: event.alt_key(),
            shift: event.shift_key(),
        }
    }
}

/// A key code.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KeyCode {
    /// Normal letter key input.
    Char(char),
    /// Left arrow key
    Left,
    /// Right arrow key
    Right,
    /// Up arrow key
    Up,
    /// Down arrow key
    Down,
    /// Page up key
    PageUp,
    /// Page down key
    PageDown,
    /// Home key
    Home,
    /// End key
    End,
    /// Escape key
    Esc,
    /// Unidentified.
    Unidentified,
}

impl KeyCode {
    /// Maps a DOM `KeyboardEvent.key` value to a [`KeyCode`].
    pub fn from_key(key: &str) -> Self {
        let mut chars = key.chars();
        if let (Some(char), None) = (chars.next(), chars.next()) {
            return KeyCode::Char(char);
        }
        match key {
            "ArrowLeft" => KeyCode::Left,
            "ArrowRight" => KeyCode::Right,
            "ArrowUp" => KeyCode::Up,
            "ArrowDown" => KeyCode::Down,
            "PageUp" => KeyCode::PageUp,
            "PageDown" => KeyCode::PageDown,
            "Home" => KeyCode::Home,
            "End" => KeyCode::End,
            "Escape" => KeyCode::Esc,
            _ => KeyCode::Unidentified,
        }
    }
}

/// A `keydown` listener on the document.
///
/// The listener is removed when this value is dropped.
#[derive(Debug)]
pub struct KeyListener {
    closure: Closure<dyn FnMut(web_sys::KeyboardEvent)>,
}

impl KeyListener {
    /// Registers `callback` for every `keydown` event.
    pub fn new<F>(mut callback: F) -> Result<Self, Error>
    where
        F: FnMut(KeyEvent) + 'static,
    {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            callback(event.into());
        });
        get_document()?
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        Ok(Self { closure })
    }

    /// Keeps the listener registered for the rest of the page lifetime.
    pub fn forget(self) {
        std::mem::forget(self);
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        if let Ok(document) = get_document() {
            let _ = document.remove_event_listener_with_callback(
                "keydown",
                self.closure.as_ref().unchecked_ref(),
            );
        }
    }
}
