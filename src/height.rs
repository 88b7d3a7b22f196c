//! Per-frame tile heights.

use std::f64::consts::{PI, TAU};

use crate::error::Error;

/// Divisor applied to the frequency factor.
///
/// Maps the `0..500` speed slider to oscillations of at most five cycles per
/// second.
pub const FREQUENCY_SCALE: f64 = 100_000.0;

/// Inputs of [`height_for`] besides the tile index.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TileAnimationParameters {
    /// Half of the maximum height, in display units.
    pub amplitude: f64,
    /// Oscillation speed, divided by [`FREQUENCY_SCALE`].
    pub frequency_factor: f64,
    /// Phase spread across the tile sequence, in multiples of π.
    pub phase_factor: f64,
    /// Frequency increase across the tile sequence.
    pub modulation_factor: f64,
    /// Number of tiles.
    pub resolution: u32,
    /// Milliseconds since the Unix epoch.
    pub time: i64,
}

impl TileAnimationParameters {
    /// Returns the oscillation frequency in cycles per millisecond.
    pub fn frequency(&self) -> f64 {
        self.frequency_factor / FREQUENCY_SCALE
    }

    /// Returns the frequency multiplier of the tile at `index`.
    pub fn modulation(&self, index: u32) -> Result<f64, Error> {
        Ok(1.0 + self.modulation_factor * self.position(index)?)
    }

    /// Returns the time in milliseconds after which the tile at `index`
    /// repeats, or `None` if it does not move.
    pub fn period(&self, index: u32) -> Result<Option<f64>, Error> {
        let rate = self.modulation(index)? * self.frequency();
        Ok((rate != 0.0).then(|| 1.0 / rate.abs()))
    }

    /// Normalized tile position in `[0, 1)`.
    fn position(&self, index: u32) -> Result<f64, Error> {
        if self.resolution == 0 {
            return Err(Error::invalid_parameter("resolution", self.resolution));
        }
        Ok(index as f64 / self.resolution as f64)
    }
}

/// Computes the height of the tile at `index`.
///
/// The result lies within `[0, 2 * amplitude]`. Fails with
/// [`Error::InvalidParameter`] if the resolution is zero.
pub fn height_for(index: u32, params: &TileAnimationParameters) -> Result<f64, Error> {
    let t = params.position(index)?;
    let modulation = 1.0 + params.modulation_factor * t;
    let phase = params.phase_factor * t * PI;
    let angle = TAU * modulation * params.frequency() * params.time as f64 + phase;
    Ok(params.amplitude * angle.sin() + params.amplitude)
}

/// Pointwise transforms applied after [`height_for`].
///
/// Halving runs before flipping, so a halved and flipped tile hangs from the
/// opposite edge of its (halved) band.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeightTransform {
    /// Divide the height by two.
    pub halve: bool,
    /// Mirror the height within the allotted extent.
    pub flip: bool,
}

impl HeightTransform {
    /// Constructs a new [`HeightTransform`].
    pub const fn new(halve: bool, flip: bool) -> Self {
        Self { halve, flip }
    }

    /// Applies the enabled transforms. `full_range` is the extent the height
    /// is flipped within.
    pub fn apply(&self, height: f64, full_range: f64) -> f64 {
        let height = if self.halve { halve(height) } else { height };
        if self.flip {
            flip(height, full_range)
        } else {
            height
        }
    }
}

/// Halves a height.
pub fn halve(height: f64) -> f64 {
    height / 2.0
}

/// Mirrors a height within `full_range`.
pub fn flip(height: f64, full_range: f64) -> f64 {
    full_range - height
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn params(resolution: u32, time: i64) -> TileAnimationParameters {
        TileAnimationParameters {
            amplitude: 50.0,
            resolution,
            time,
            ..Default::default()
        }
    }

    #[test]
    fn still_first_tile_sits_at_amplitude() {
        assert_eq!(height_for(0, &params(10, 0)).unwrap(), 50.0);
    }

    #[test]
    fn zero_resolution_is_rejected() {
        let error = height_for(0, &params(0, 0)).unwrap_err();
        assert!(matches!(
            error,
            Error::InvalidParameter {
                name: "resolution",
                ..
            }
        ));
    }

    #[test]
    fn phase_spreads_across_tiles() {
        let params = TileAnimationParameters {
            phase_factor: 1.0,
            ..params(4, 0)
        };
        // index 2 of 4: phase = 0.5π, sin = 1
        assert!((height_for(2, &params).unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn period_matches_modulated_frequency() {
        let params = TileAnimationParameters {
            frequency_factor: 100.0,
            modulation_factor: 2.0,
            phase_factor: 3.0,
            ..params(10, 123_456)
        };
        let base = params.period(0).unwrap().unwrap();
        assert!((base - 1000.0).abs() < 1e-9);
        let period = params.period(5).unwrap().unwrap();
        assert!((period - 500.0).abs() < 1e-9);

        let shifted = TileAnimationParameters {
            time: params.time + period.round() as i64,
            ..params
        };
        let before = height_for(5, &params).unwrap();
        let after = height_for(5, &shifted).unwrap();
        assert!((before - after).abs() < 1e-6, "{before} != {after}");
    }

    #[test]
    fn still_tiles_have_no_period() {
        assert_eq!(params(10, 0).period(3).unwrap(), None);
    }

    #[test]
    fn transforms_compose() {
        let both = HeightTransform::new(true, true);
        assert_eq!(both.apply(80.0, 50.0), 10.0);
        assert_eq!(HeightTransform::new(true, false).apply(80.0, 50.0), 40.0);
        assert_eq!(HeightTransform::new(false, true).apply(80.0, 100.0), 20.0);
        assert_eq!(HeightTransform::default().apply(80.0, 100.0), 80.0);
    }

    proptest! {
        #[test]
        fn height_stays_in_range(
            resolution in 1u32..=1000,
            index_ratio in 0.0f64..1.0,
            time in 0i64..4_000_000_000_000,
            amplitude in 0.0f64..500.0,
            frequency_factor in 0.0f64..=500.0,
            phase_factor in 0.0f64..=500.0,
            modulation_factor in 0.0f64..=50.0,
        ) {
            let index = (index_ratio * resolution as f64) as u32;
            let params = TileAnimationParameters {
                amplitude,
                frequency_factor,
                phase_factor,
                modulation_factor,
                resolution,
                time,
            };
            let height = height_for(index, &params).unwrap();
            prop_assert!(height >= 0.0 && height <= 2.0 * amplitude, "{}", height);
            prop_assert_eq!(height, height_for(index, &params).unwrap());
        }

        #[test]
        fn flip_is_an_involution(height in 0.0f64..=100.0, full_range in 0.0f64..=100.0) {
            let twice = flip(flip(height, full_range), full_range);
            prop_assert!((twice - height).abs() < 1e-9);
        }
    }
}
