//! Per-frame tile computation.
//!
//! Each frame follows the same cycle: take a snapshot of the
//! [`ParameterStore`], compute every tile from one sampled timestamp, and
//! publish the resulting [`TileFrame`] to the presentation layer.

use crate::{
    error::Error,
    gradient::{generate, ColorSequence, GradientParameters, Rgb},
    height::{height_for, HeightTransform},
    params::{ParameterStore, TILE_AMPLITUDE},
};

/// A tile of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileState {
    /// Position in `[0, resolution)`.
    pub index: u32,
    /// Gradient color.
    pub color: Rgb,
    /// Height before display transforms, in `[0, 2 * amplitude]`.
    pub height: f64,
}

/// Every tile of one frame, computed from a single timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileFrame {
    /// The sampled time in milliseconds since the Unix epoch.
    pub time: i64,
    /// Maximum base height of a tile.
    pub extent: f64,
    /// Display transforms selected when the frame was built.
    pub transform: HeightTransform,
    /// The tiles, ordered by index.
    pub tiles: Vec<TileState>,
}

impl TileFrame {
    /// Returns the number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Returns `true` if the frame has no tiles.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Returns the displayed extent of a tile band: halved in double-row mode.
    pub fn band_extent(&self) -> f64 {
        if self.transform.halve {
            self.extent / 2.0
        } else {
            self.extent
        }
    }

    /// Returns the height of `tile` after the display transforms, within
    /// `[0, band_extent]`.
    pub fn displayed_height(&self, tile: &TileState) -> f64 {
        self.transform.apply(tile.height, self.band_extent())
    }
}

/// Builds [`TileFrame`]s, caching the tile gradient between frames.
#[derive(Debug, Default)]
pub struct FrameBuilder {
    gradient: Option<(GradientParameters, ColorSequence)>,
    rebuilds: usize,
}

impl FrameBuilder {
    /// Constructs a new [`FrameBuilder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the colors for `params`, regenerating them only if the
    /// parameters changed since the previous call.
    pub fn colors(&mut self, params: &GradientParameters) -> &ColorSequence {
        if matches!(&self.gradient, Some((cached, _)) if cached != params) {
            self.gradient = None;
        }
        let (_, colors) = self.gradient.get_or_insert_with(|| {
            tracing::debug!(length = params.length, "rebuilding tile gradient");
            self.rebuilds += 1;
            (params.clone(), generate(params))
        });
        colors
    }

    /// Returns how many times the gradient has been generated.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    /// Computes the frame sampled at `time` from a snapshot of `store`.
    pub fn build(&mut self, store: &ParameterStore, time: i64) -> Result<TileFrame, Error> {
        let tile_params = store.tile_parameters(time);
        let transform = store.height_transform();
        let colors = self.colors(&store.gradient_parameters());
        let tiles = (0..tile_params.resolution)
            .map(|index| {
                Ok(TileState {
                    index,
                    color: colors.get(index as usize).unwrap_or_default(),
                    height: height_for(index, &tile_params)?,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(TileFrame {
            time,
            extent: 2.0 * TILE_AMPLITUDE,
            transform,
            tiles,
        })
    }
}
