//! Error types for the combat engine.
//!
//! Errors are raised at the call that detects the broken precondition and are
//! never logged or swallowed here; the caller decides how to present them.

use knucklebone::DiceError;

/// A character, monster or die was described with invalid parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A die in the configuration is invalid.
    #[error(transparent)]
    Dice(#[from] DiceError),

    /// No damage dice were supplied.
    #[error("no damage dice provided")]
    MissingDamageDice,

    /// No hit die was supplied.
    #[error("no hit die provided")]
    MissingHitDie,

    /// No armor class was supplied for a character that cannot derive one.
    #[error("no armor class provided")]
    MissingArmorClass,

    /// Characters start at level 1.
    #[error("level must be at least 1 (got {0})")]
    InvalidLevel(u32),

    /// Monster generation only covers challenge ratings up to the maximum.
    #[error("challenge rating {cr} is not supported (maximum {max})")]
    ChallengeRatingOutOfRange {
        /// Requested challenge rating
        cr: u32,
        /// Highest supported challenge rating
        max: u32,
    },

    /// A stat derived from the configuration leaves the `i32` range.
    #[error("{0} is out of range")]
    StatOverflow(&'static str),

    /// A stat table needs at least two options to spread a draw over.
    #[error("stat table needs at least two options (got {0})")]
    TooFewOptions(usize),
}

/// A request that cannot be given a meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Advantage and disadvantage were both requested.
    #[error("advantage and disadvantage cannot both be requested")]
    ConflictingRollModes,
}

/// Any error raised by the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Invalid construction parameters.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid request on a valid character.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<DiceError> for Error {
    fn from(err: DiceError) -> Self {
        Self::Config(ConfigError::Dice(err))
    }
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
