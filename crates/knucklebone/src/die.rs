//! Plain polyhedral dice.
//!
//! A [`Die`] is an immutable `(sides, count)` pair. Every roll is batched:
//! `roll(n)` returns `n` independent trials, each the sum of `count` uniform
//! draws from `1..=sides`.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{DiceError, Result};

/// Unvalidated `(sides, count)` description of a set of dice, e.g. `2d6`.
///
/// This is the shape stored in configurations. It is checked when a concrete
/// die is built from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DieSpec {
    /// Faces on each die
    pub sides: u32,
    /// Number of dice summed per trial
    pub count: u32,
}

impl DieSpec {
    /// Describe `count` dice with `sides` faces each.
    #[must_use]
    pub const fn new(sides: u32, count: u32) -> Self {
        Self { sides, count }
    }

    /// A single die with `sides` faces.
    #[must_use]
    pub const fn single(sides: u32) -> Self {
        Self::new(sides, 1)
    }

    /// Mean of one trial: `count * (sides + 1) / 2`.
    #[must_use]
    pub fn expected_value(&self) -> f64 {
        f64::from(self.count) * (f64::from(self.sides) + 1.0) / 2.0
    }

    /// Check that both sides and count are positive and that the largest
    /// trial, `count * sides`, fits a `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`DiceError::InvalidSides`], [`DiceError::InvalidCount`] or
    /// [`DiceError::TotalOverflow`].
    pub fn validate(&self) -> Result<()> {
        if self.sides == 0 {
            return Err(DiceError::InvalidSides(self.sides));
        }
        if self.count == 0 {
            return Err(DiceError::InvalidCount(self.count));
        }
        if self.count.checked_mul(self.sides).is_none() {
            return Err(DiceError::TotalOverflow {
                sides: self.sides,
                count: self.count,
            });
        }
        Ok(())
    }
}

impl fmt::Display for DieSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

/// Batched rolling shared by every die variant.
pub trait DiceRoll {
    /// The `(sides, count)` pair this die rolls.
    fn spec(&self) -> DieSpec;

    /// Roll `n` independent trials.
    ///
    /// Each element is the sum of `count` dice, so it lies in
    /// `count..=count * sides`.
    fn roll<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<u32>;

    /// Faces on each die.
    fn sides(&self) -> u32 {
        self.spec().sides
    }

    /// Dice summed per trial.
    fn count(&self) -> u32 {
        self.spec().count
    }

    /// Analytic mean of one plain trial.
    fn expected_value(&self) -> f64 {
        self.spec().expected_value()
    }

    /// Sum of `n` trials.
    fn sum_roll<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> u64 {
        self.roll(n, rng).into_iter().map(u64::from).sum()
    }

    /// Mean of `n` trials. Zero for an empty batch.
    #[allow(clippy::cast_precision_loss)]
    fn avg_roll<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> f64 {
        if n == 0 {
            return 0.0;
        }
        self.sum_roll(n, rng) as f64 / n as f64
    }
}

/// A plain set of identical dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Die {
    spec: DieSpec,
}

impl Die {
    /// Build `count` dice with `sides` faces.
    ///
    /// # Errors
    ///
    /// Fails when either value is zero.
    pub fn new(sides: u32, count: u32) -> Result<Self> {
        Self::from_spec(DieSpec::new(sides, count))
    }

    /// Build a die from a configuration pair.
    ///
    /// # Errors
    ///
    /// Fails when either value is zero.
    pub fn from_spec(spec: DieSpec) -> Result<Self> {
        spec.validate()?;
        Ok(Self { spec })
    }

    /// Construct from a spec that is known to be valid.
    pub(crate) const fn from_valid(spec: DieSpec) -> Self {
        Self { spec }
    }
}

impl DiceRoll for Die {
    fn spec(&self) -> DieSpec {
        self.spec
    }

    fn roll<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<u32> {
        let DieSpec { sides, count } = self.spec;
        (0..n)
            .map(|_| (0..count).map(|_| rng.gen_range(1..=sides)).sum())
            .collect()
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.spec.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    mod construction_tests {
        use super::*;

        #[test]
        fn zero_sides_rejected() {
            assert_eq!(Die::new(0, 1), Err(DiceError::InvalidSides(0)));
        }

        #[test]
        fn zero_count_rejected() {
            assert_eq!(Die::new(6, 0), Err(DiceError::InvalidCount(0)));
        }

        #[test]
        fn totals_beyond_u32_rejected() {
            assert_eq!(
                Die::new(u32::MAX, 2),
                Err(DiceError::TotalOverflow {
                    sides: u32::MAX,
                    count: 2
                })
            );
            assert!(DieSpec::new(2, u32::MAX / 2 + 1).validate().is_err());
        }

        #[test]
        fn largest_single_die_rolls() {
            let die = Die::new(u32::MAX, 1).unwrap();
            let rolls = die.roll(16, &mut ChaCha8Rng::seed_from_u64(1));
            assert_eq!(rolls.len(), 16);
            assert!(rolls.iter().all(|&v| v >= 1));
            assert_eq!(die.sum_roll(0, &mut ChaCha8Rng::seed_from_u64(1)), 0);
        }

        #[test]
        fn expected_value_of_two_d6() {
            let die = Die::new(6, 2).unwrap();
            assert!((die.expected_value() - 7.0).abs() < f64::EPSILON);
        }

        #[test]
        fn display_uses_dice_notation() {
            assert_eq!(Die::new(12, 1).unwrap().to_string(), "1d12");
            assert_eq!(DieSpec::new(6, 2).to_string(), "2d6");
        }

        #[test]
        fn spec_deserializes_from_json() {
            let spec: DieSpec = serde_json::from_str(r#"{"sides": 8, "count": 3}"#).unwrap();
            assert_eq!(spec, DieSpec::new(8, 3));
        }
    }

    mod rolling_tests {
        use super::*;

        #[test]
        fn seeded_rolls_are_reproducible() {
            let die = Die::new(20, 1).unwrap();
            let a = die.roll(64, &mut ChaCha8Rng::seed_from_u64(7));
            let b = die.roll(64, &mut ChaCha8Rng::seed_from_u64(7));
            assert_eq!(a, b);
        }

        #[test]
        fn empty_batch() {
            let die = Die::new(6, 1).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            assert!(die.roll(0, &mut rng).is_empty());
            assert_eq!(die.sum_roll(0, &mut rng), 0);
            assert_eq!(die.avg_roll(0, &mut rng), 0.0);
        }

        #[test]
        fn one_sided_die_is_constant() {
            let die = Die::new(1, 4).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(3);
            assert!(die.roll(100, &mut rng).iter().all(|&v| v == 4));
            assert_eq!(die.sum_roll(10, &mut rng), 40);
        }

        #[test]
        fn average_converges_on_expected_value() {
            let die = Die::new(6, 2).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(99);
            let avg = die.avg_roll(200_000, &mut rng);
            assert!((avg - 7.0).abs() < 0.05, "avg was {avg}");
        }
    }

    proptest! {
        #[test]
        fn prop_roll_length_and_bounds(
            sides in 1u32..=100,
            count in 1u32..=10,
            n in 0usize..200,
            seed in any::<u64>()
        ) {
            let die = Die::new(sides, count).unwrap();
            let rolls = die.roll(n, &mut ChaCha8Rng::seed_from_u64(seed));
            prop_assert_eq!(rolls.len(), n);
            for value in rolls {
                prop_assert!(value >= count);
                prop_assert!(value <= count * sides);
            }
        }
    }
}
