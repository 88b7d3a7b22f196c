//! Animated sine-wave color tiles, rendered with [Ratatui] in the browser.
//!
//! A row of tiles oscillates over time. Every tile gets its color from a
//! sine-based RGB gradient and its height from a sine function of time whose
//! phase and frequency depend on the tile index. The pieces are:
//!
//! - [`gradient`]: the color gradient generator.
//! - [`height`]: the tile height function and its display transforms.
//! - [`clock`]: the animation clock publishing one timestamp per display
//!   refresh.
//! - [`params`] and [`frame`]: the tunable parameters and the per-frame
//!   computation reading a snapshot of them.
//! - [`App`], [`widgets`] and [`DomBackend`]: the presentation layer.
//!
//! [Ratatui]: https://ratatui.rs

pub mod app;
pub mod backend;
pub mod clock;
pub mod error;
pub mod event;
pub mod frame;
pub mod gradient;
pub mod height;
pub mod logging;
pub mod params;
mod render;
pub mod utils;
pub mod widgets;

// Re-export ratatui crate.
pub use ratatui;

pub use app::{App, AppAction};
pub use backend::dom::{DomBackend, DomBackendOptions};
pub use clock::{AnimationClock, AnimationFrameScheduler, ClockState, FrameScheduler};
pub use error::Error;
pub use render::RenderOnClock;
