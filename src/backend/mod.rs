//! ## Backend
//!
//! [`DomBackend`](dom::DomBackend) renders the cells of the terminal as HTML
//! elements: one `<pre>` per row holding one `<span>` per cell. Runs of cells
//! styled with the hyperlink modifier are wrapped in an `<a>` element.
//!
//! Each tile column is a stack of cells whose background is the tile color,
//! so the browser does the painting.

/// DOM backend.
pub mod dom;

/// Color handling.
mod color;
/// Backend utilities.
pub(crate) mod utils;
