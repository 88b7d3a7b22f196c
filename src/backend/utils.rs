use compact_str::{format_compact, CompactString};
use ratatui::{
    buffer::Cell,
    style::{Color, Modifier},
};
use web_sys::{Document, Element};

use crate::{backend::color::to_rgb, error::Error};

/// Creates a `<span>` showing `cell`.
pub(crate) fn create_span(document: &Document, cell: &Cell) -> Result<Element, Error> {
    let span = document.create_element("span")?;
    span.set_text_content(Some(cell.symbol()));
    span.set_attribute("style", &cell_css(cell))?;
    Ok(span)
}

/// Creates an `<a>` element linking to the text of `cells`.
pub(crate) fn create_anchor(document: &Document, cells: &[Cell]) -> Result<Element, Error> {
    let anchor = document.create_element("a")?;
    anchor.set_attribute("href", &link_target(cells))?;
    anchor.set_attribute("target", "_blank")?;
    if let Some(first) = cells.first() {
        anchor.set_attribute("style", &cell_css(first))?;
    }
    Ok(anchor)
}

/// Returns the concatenated symbols of `cells`, without surrounding blanks.
pub(crate) fn link_target(cells: &[Cell]) -> String {
    cells
        .iter()
        .map(Cell::symbol)
        .collect::<String>()
        .trim()
        .to_string()
}

fn css_color(color: Color, fallback: &str) -> CompactString {
    match to_rgb(color) {
        Some((r, g, b)) => format_compact!("rgb({r}, {g}, {b})"),
        None => fallback.into(),
    }
}

/// Converts the style of a cell to inline CSS.
pub(crate) fn cell_css(cell: &Cell) -> String {
    let mut css = format!(
        "color: {}; background-color: {};",
        css_color(cell.fg, "inherit"),
        css_color(cell.bg, "transparent"),
    );
    for (modifier, declaration) in [
        (Modifier::BOLD, " font-weight: bold;"),
        (Modifier::DIM, " opacity: 0.5;"),
        (Modifier::ITALIC, " font-style: italic;"),
        (Modifier::UNDERLINED, " text-decoration: underline;"),
        (Modifier::HIDDEN, " visibility: hidden;"),
        (Modifier::CROSSED_OUT, " text-decoration: line-through;"),
    ] {
        if cell.modifier.contains(modifier) {
            css.push_str(declaration);
        }
    }
    css
}
