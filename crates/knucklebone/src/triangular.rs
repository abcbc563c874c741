//! Bounded triangular sampling over ordered option indices.

use rand::Rng;
use rand_distr::{Distribution, Triangular};

use crate::error::{DiceError, Result};

/// Draw one value from a triangular distribution on `[min, max]` peaking at
/// `mode`.
///
/// # Errors
///
/// Returns [`DiceError::InvalidDistribution`] when
/// `min > max` or `mode` falls outside `[min, max]`.
pub fn sample_triangular<R: Rng + ?Sized>(
    min: f64,
    mode: f64,
    max: f64,
    rng: &mut R,
) -> Result<f64> {
    let dist = Triangular::new(min, max, mode).map_err(|err| DiceError::InvalidDistribution {
        min,
        mode,
        max,
        reason: err.to_string(),
    })?;
    Ok(dist.sample(rng))
}

/// Draw an index in `min..=max`, rounding a triangular sample half-to-even.
///
/// # Errors
///
/// Fails when `min > max` or `mode` falls outside `[min, max]`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn triangular_index<R: Rng + ?Sized>(
    min: usize,
    mode: f64,
    max: usize,
    rng: &mut R,
) -> Result<usize> {
    let sample = sample_triangular(min as f64, mode, max as f64, rng)?;
    let index = sample.round_ties_even() as usize;
    Ok(index.clamp(min, max))
}
