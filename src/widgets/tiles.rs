use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
    widgets::Widget,
};

use crate::frame::TileFrame;

/// Renders the tiles of a [`TileFrame`] as vertical bars.
///
/// Tiles are spread evenly over the columns of the area and hang from the
/// top edge of their band, like `vh`-sized blocks in a flex row. Bar lengths
/// are the displayed heights (after halving and flipping) in proportion to
/// the band extent. Double-row mode stacks two bands.
#[derive(Debug, Clone, Copy)]
pub struct TileField<'a> {
    frame: &'a TileFrame,
    background: Color,
}

impl<'a> TileField<'a> {
    /// Constructs a new [`TileField`].
    pub fn new(frame: &'a TileFrame) -> Self {
        Self {
            frame,
            background: Color::Black,
        }
    }

    /// Sets the color of the cells no tile covers.
    pub fn background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Returns the index of the tile shown in `column` out of `columns`.
    fn tile_at(&self, column: u16, columns: u16) -> usize {
        column as usize * self.frame.len() / columns as usize
    }

    /// Returns the number of rows covered by `height` in a band of `rows`.
    fn covered_rows(&self, height: f64, rows: u16) -> u16 {
        let extent = self.frame.band_extent();
        if extent <= 0.0 {
            return 0;
        }
        ((height / extent).clamp(0.0, 1.0) * rows as f64).floor() as u16
    }

    fn render_band(&self, band: Rect, buf: &mut Buffer) {
        for column in 0..band.width {
            let tile = &self.frame.tiles[self.tile_at(column, band.width)];
            let covered = self.covered_rows(self.frame.displayed_height(tile), band.height);
            let color = tile.color.to_color();
            for row in 0..band.height {
                let bg = if row < covered { color } else { self.background };
                if let Some(cell) = buf.cell_mut(Position::new(band.x + column, band.y + row)) {
                    cell.set_symbol(" ").set_bg(bg);
                }
            }
        }
    }
}

impl Widget for TileField<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.frame.is_empty() || area.is_empty() {
            return;
        }
        if self.frame.transform.halve {
            let upper = area.height / 2;
            let top = Rect { height: upper, ..area };
            let bottom = Rect {
                y: area.y + upper,
                height: area.height - upper,
                ..area
            };
            self.render_band(top, buf);
            self.render_band(bottom, buf);
        } else {
            self.render_band(area, buf);
        }
    }
}
