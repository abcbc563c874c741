//! Great Weapon Fighting dice.
//!
//! When a damage die shows a 1 or a 2 it is rerolled once and the new value
//! stands, even if it is again a 1 or a 2.

use std::fmt;

use rand::Rng;

use crate::die::{DiceRoll, DieSpec};
use crate::error::Result;

/// Dice that reroll low faces once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RerollDie {
    spec: DieSpec,
}

impl RerollDie {
    /// Faces at or below this value are rerolled.
    pub const REROLL_AT_OR_BELOW: u32 = 2;

    /// Build `count` rerolling dice with `sides` faces.
    ///
    /// # Errors
    ///
    /// Fails when either value is zero or the largest total overflows.
    pub fn new(sides: u32, count: u32) -> Result<Self> {
        Self::from_spec(DieSpec::new(sides, count))
    }

    /// Build from a configuration pair.
    ///
    /// # Errors
    ///
    /// Fails when either value is zero.
    pub fn from_spec(spec: DieSpec) -> Result<Self> {
        spec.validate()?;
        Ok(Self { spec })
    }
}

impl DiceRoll for RerollDie {
    fn spec(&self) -> DieSpec {
        self.spec
    }

    /// Each die is drawn as its own batch of `n`, low faces in that batch are
    /// redrawn once, then the per-die batches are summed elementwise.
    fn roll<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<u32> {
        let DieSpec { sides, count } = self.spec;
        let mut totals = vec![0u32; n];
        for _ in 0..count {
            let mut faces: Vec<u32> = (0..n).map(|_| rng.gen_range(1..=sides)).collect();
            for face in &mut faces {
                if *face <= Self::REROLL_AT_OR_BELOW {
                    *face = rng.gen_range(1..=sides);
                }
            }
            for (total, face) in totals.iter_mut().zip(faces) {
                *total += face;
            }
        }
        totals
    }
}

impl fmt::Display for RerollDie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.spec.fmt(f)
    }
}
