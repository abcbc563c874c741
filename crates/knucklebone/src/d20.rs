//! The attack die.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::die::{DiceRoll, Die, DieSpec};

/// How an attack roll is made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RollMode {
    /// One d20
    #[default]
    Normal,
    /// Two independent d20, keep the higher
    Advantage,
    /// Two independent d20, keep the lower
    Disadvantage,
}

impl RollMode {
    /// Translate a pair of advantage/disadvantage flags.
    ///
    /// Returns `None` when both flags are set.
    #[must_use]
    pub const fn from_flags(advantage: bool, disadvantage: bool) -> Option<Self> {
        match (advantage, disadvantage) {
            (false, false) => Some(Self::Normal),
            (true, false) => Some(Self::Advantage),
            (false, true) => Some(Self::Disadvantage),
            (true, true) => None,
        }
    }
}

impl fmt::Display for RollMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Advantage => write!(f, "advantage"),
            Self::Disadvantage => write!(f, "disadvantage"),
        }
    }
}

/// A single twenty-sided die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct D20 {
    die: Die,
}

impl D20 {
    /// Highest natural roll.
    pub const SIDES: u32 = 20;

    /// Create the die.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            die: Die::from_valid(DieSpec::single(Self::SIDES)),
        }
    }

    /// Roll `2n` times, keeping the better of each pair.
    pub fn roll_with_advantage<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<u32> {
        let first = self.roll(n, rng);
        let second = self.roll(n, rng);
        first.into_iter().zip(second).map(|(a, b)| a.max(b)).collect()
    }

    /// Roll `2n` times, keeping the worse of each pair.
    pub fn roll_with_disadvantage<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<u32> {
        let first = self.roll(n, rng);
        let second = self.roll(n, rng);
        first.into_iter().zip(second).map(|(a, b)| a.min(b)).collect()
    }

    /// Roll `n` attack dice in the given mode.
    pub fn roll_with<R: Rng + ?Sized>(&self, mode: RollMode, n: usize, rng: &mut R) -> Vec<u32> {
        match mode {
            RollMode::Normal => self.roll(n, rng),
            RollMode::Advantage => self.roll_with_advantage(n, rng),
            RollMode::Disadvantage => self.roll_with_disadvantage(n, rng),
        }
    }
}

impl Default for D20 {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceRoll for D20 {
    fn spec(&self) -> DieSpec {
        self.die.spec()
    }

    fn roll<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<u32> {
        self.die.roll(n, rng)
    }
}
