//! Widgets of the tile field and its controls.

pub mod hyperlink;
mod settings;
mod tiles;
mod title;

pub use hyperlink::Hyperlink;
pub use settings::{SettingsPanel, SettingsState};
pub use tiles::TileField;
pub use title::GradientTitle;
