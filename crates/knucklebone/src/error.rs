//! Error types for dice construction and sampling.

/// Errors raised when a die or distribution is built from invalid parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiceError {
    /// A die must have at least one side.
    #[error("die must have at least one side (got {0})")]
    InvalidSides(u32),

    /// At least one die must be rolled per trial.
    #[error("at least one die must be rolled (got {0})")]
    InvalidCount(u32),

    /// The largest possible trial does not fit a `u32`.
    #[error("{count}d{sides} can total more than {max}", max = u32::MAX)]
    TotalOverflow {
        /// Faces on each die
        sides: u32,
        /// Dice summed per trial
        count: u32,
    },

    /// Triangular distribution parameters were rejected.
    #[error("invalid triangular distribution (min={min}, mode={mode}, max={max}): {reason}")]
    InvalidDistribution {
        /// Lower bound
        min: f64,
        /// Peak of the distribution
        mode: f64,
        /// Upper bound
        max: f64,
        /// Reason reported by the sampler
        reason: String,
    },
}

/// Result alias for dice operations.
pub type Result<T> = std::result::Result<T, DiceError>;
