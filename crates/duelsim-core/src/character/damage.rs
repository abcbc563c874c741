//! Damage computation per character variant.
//!
//! Every variant shares the same base rule: each attack rolls its damage dice
//! once per die multiplier (zero on a miss, one on a hit, two on a critical)
//! and adds the damage bonus the same number of times. Variants differ in the
//! die they roll and in what they add on top, which is captured by
//! [`DamageComputer`].

use std::fmt;

use knucklebone::{DiceRoll, Die, DieSpec, RerollDie};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Result of one attack roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum HitOutcome {
    /// The attack missed (or rolled a natural 1)
    Miss = 0,
    /// The attack met the target's armor class
    Hit = 1,
    /// Natural 20: damage dice are rolled twice
    Critical = 2,
}

impl HitOutcome {
    /// Classify a natural d20 roll.
    ///
    /// A natural 20 is always a critical and a natural 1 always misses; only
    /// the rolls in between compare `natural + hit_bonus` against the armor
    /// class.
    #[must_use]
    pub fn classify(natural: u32, hit_bonus: i32, armor_class: i32) -> Self {
        match natural {
            20 => Self::Critical,
            1 => Self::Miss,
            _ => {
                #[allow(clippy::cast_possible_wrap)]
                let total = natural as i32 + hit_bonus;
                if total >= armor_class {
                    Self::Hit
                } else {
                    Self::Miss
                }
            }
        }
    }

    /// Number of damage-dice sets this outcome rolls (and bonus multiples it adds).
    #[must_use]
    pub const fn dice_multiplier(self) -> u32 {
        self as u32
    }
}

impl From<HitOutcome> for u8 {
    fn from(outcome: HitOutcome) -> Self {
        outcome as u8
    }
}

/// A damage die, plain or rerolling low faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamageDie {
    /// Ordinary dice
    Plain(Die),
    /// Great Weapon Fighting dice
    Reroll(RerollDie),
}

impl DamageDie {
    /// Build the die for `spec`, rerolling low faces when
    /// `great_weapon_fighting` is set.
    ///
    /// # Errors
    ///
    /// Fails when the spec has zero sides or count, or its largest total
    /// overflows.
    pub fn new(spec: DieSpec, great_weapon_fighting: bool) -> knucklebone::Result<Self> {
        if great_weapon_fighting {
            RerollDie::from_spec(spec).map(Self::Reroll)
        } else {
            Die::from_spec(spec).map(Self::Plain)
        }
    }
}

impl DiceRoll for DamageDie {
    fn spec(&self) -> DieSpec {
        match self {
            Self::Plain(die) => die.spec(),
            Self::Reroll(die) => die.spec(),
        }
    }

    fn roll<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<u32> {
        match self {
            Self::Plain(die) => die.roll(n, rng),
            Self::Reroll(die) => die.roll(n, rng),
        }
    }
}

impl fmt::Display for DamageDie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.spec().fmt(f)
    }
}

/// Turns a vector of hit outcomes into a vector of damage values.
///
/// Implementations are shared between clones of a character and across
/// replication threads, so they hold no mutable state.
pub trait DamageComputer: fmt::Debug + Send + Sync {
    /// The dice rolled per hit.
    fn dice(&self) -> DamageDie;

    /// Damage for each outcome, in order. Misses always deal zero.
    fn damage(&self, hits: &[HitOutcome], bonus: i32, rng: &mut dyn RngCore) -> Vec<f64>;
}

/// Dice plus bonus, applied once per die multiplier.
#[allow(clippy::cast_precision_loss)]
fn base_damage(die: &DamageDie, outcome: HitOutcome, bonus: i32, rng: &mut dyn RngCore) -> f64 {
    let multiplier = outcome.dice_multiplier();
    if multiplier == 0 {
        return 0.0;
    }
    let rolled = die.sum_roll(multiplier as usize, rng) as f64;
    rolled + f64::from(bonus) * f64::from(multiplier)
}

/// Plain dice and bonus, nothing else. Used by ordinary characters and
/// monsters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardDamage {
    die: DamageDie,
}

impl StandardDamage {
    /// Roll `spec` as plain dice.
    ///
    /// # Errors
    ///
    /// Fails when the spec has zero sides or count.
    pub fn new(spec: DieSpec) -> knucklebone::Result<Self> {
        Ok(Self {
            die: DamageDie::new(spec, false)?,
        })
    }
}

impl DamageComputer for StandardDamage {
    fn dice(&self) -> DamageDie {
        self.die
    }

    fn damage(&self, hits: &[HitOutcome], bonus: i32, rng: &mut dyn RngCore) -> Vec<f64> {
        hits.iter()
            .map(|&outcome| base_damage(&self.die, outcome, bonus, &mut *rng))
            .collect()
    }
}

/// Barbarian damage: optional Great Weapon Fighting dice, and Brutal Critical
/// extra dice on critical hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarbarianDamage {
    die: DamageDie,
    extra_die: DamageDie,
    brutal_critical_dice: u32,
}

impl BarbarianDamage {
    /// Damage for a barbarian wielding `spec`.
    ///
    /// `brutal_critical_dice` single dice of the weapon's kind are added to
    /// every critical hit.
    ///
    /// # Errors
    ///
    /// Fails when the spec has zero sides or count.
    pub fn new(
        spec: DieSpec,
        great_weapon_fighting: bool,
        brutal_critical_dice: u32,
    ) -> knucklebone::Result<Self> {
        let die = DamageDie::new(spec, great_weapon_fighting)?;
        let extra_die = DamageDie::new(DieSpec::single(spec.sides), great_weapon_fighting)?;
        Ok(Self {
            die,
            extra_die,
            brutal_critical_dice,
        })
    }

    /// Extra dice rolled on a critical hit.
    #[must_use]
    pub fn brutal_critical_dice(&self) -> u32 {
        self.brutal_critical_dice
    }
}

impl DamageComputer for BarbarianDamage {
    fn dice(&self) -> DamageDie {
        self.die
    }

    #[allow(clippy::cast_precision_loss)]
    fn damage(&self, hits: &[HitOutcome], bonus: i32, rng: &mut dyn RngCore) -> Vec<f64> {
        hits.iter()
            .map(|&outcome| {
                let base = base_damage(&self.die, outcome, bonus, &mut *rng);
                if outcome == HitOutcome::Critical {
                    let extra = self
                        .extra_die
                        .sum_roll(self.brutal_critical_dice as usize, &mut *rng);
                    base + extra as f64
                } else {
                    base
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    mod classify_tests {
        use super::*;

        #[test]
        fn natural_twenty_always_crits() {
            assert_eq!(HitOutcome::classify(20, -5, 40), HitOutcome::Critical);
        }

        #[test]
        fn natural_one_always_misses() {
            assert_eq!(HitOutcome::classify(1, 30, 2), HitOutcome::Miss);
        }

        #[test]
        fn meeting_armor_class_hits() {
            assert_eq!(HitOutcome::classify(12, 3, 15), HitOutcome::Hit);
            assert_eq!(HitOutcome::classify(11, 3, 15), HitOutcome::Miss);
        }

        #[test]
        fn numeric_view() {
            assert_eq!(u8::from(HitOutcome::Miss), 0);
            assert_eq!(u8::from(HitOutcome::Hit), 1);
            assert_eq!(u8::from(HitOutcome::Critical), 2);
        }

        proptest! {
            #[test]
            fn prop_naturals_override_armor_class(
                bonus in -10i32..=20,
                armor_class in -10i32..=40
            ) {
                prop_assert_eq!(HitOutcome::classify(20, bonus, armor_class), HitOutcome::Critical);
                prop_assert_eq!(HitOutcome::classify(1, bonus, armor_class), HitOutcome::Miss);
            }
        }
    }

    mod standard_tests {
        use super::*;

        #[test]
        fn misses_deal_nothing() {
            let computer = StandardDamage::new(DieSpec::new(6, 2)).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            let damage = computer.damage(&[HitOutcome::Miss; 50], 4, &mut rng);
            assert_eq!(damage.len(), 50);
            assert!(damage.iter().all(|&d| d == 0.0));
        }

        #[test]
        fn hits_and_crits_stay_in_range() {
            let computer = StandardDamage::new(DieSpec::new(8, 1)).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(2);
            let hits = computer.damage(&[HitOutcome::Hit; 200], 3, &mut rng);
            assert!(hits.iter().all(|&d| (4.0..=11.0).contains(&d)));
            let crits = computer.damage(&[HitOutcome::Critical; 200], 3, &mut rng);
            assert!(crits.iter().all(|&d| (8.0..=22.0).contains(&d)));
        }

        #[test]
        fn one_sided_die_is_exact() {
            let computer = StandardDamage::new(DieSpec::new(1, 2)).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(3);
            let damage = computer.damage(
                &[HitOutcome::Miss, HitOutcome::Hit, HitOutcome::Critical],
                5,
                &mut rng,
            );
            assert_eq!(damage, vec![0.0, 7.0, 14.0]);
        }

        #[test]
        fn invalid_dice_rejected() {
            assert!(StandardDamage::new(DieSpec::new(0, 1)).is_err());
        }
    }

    mod barbarian_tests {
        use super::*;

        #[test]
        fn brutal_critical_only_on_crits() {
            // d1 weapon so every die contributes exactly one point.
            let computer = BarbarianDamage::new(DieSpec::new(1, 1), false, 3).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(4);
            let damage = computer.damage(
                &[HitOutcome::Miss, HitOutcome::Hit, HitOutcome::Critical],
                2,
                &mut rng,
            );
            // crit: 2 dice + 2 * bonus + 3 brutal dice
            assert_eq!(damage, vec![0.0, 3.0, 9.0]);
        }

        #[test]
        fn extra_die_matches_weapon_kind() {
            let computer = BarbarianDamage::new(DieSpec::new(6, 2), true, 1).unwrap();
            assert!(matches!(computer.dice(), DamageDie::Reroll(_)));
            assert!(matches!(computer.extra_die, DamageDie::Reroll(_)));
            assert_eq!(computer.extra_die.spec(), DieSpec::new(6, 1));
        }

        #[test]
        fn crit_range_includes_brutal_dice() {
            let computer = BarbarianDamage::new(DieSpec::new(12, 1), false, 2).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(5);
            let damage = computer.damage(&[HitOutcome::Critical; 500], 0, &mut rng);
            assert!(damage.iter().all(|&d| (4.0..=48.0).contains(&d)));
        }
    }
}
