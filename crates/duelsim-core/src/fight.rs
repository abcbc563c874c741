//! One-on-one fight resolution.
//!
//! A fight does not alternate turns. Each side rolls its whole attack budget
//! against the other up front, and the outcome is read off the two damage
//! streams:
//!
//! 1. **Defeat index**: for each side, the first round at which the
//!    opponent's cumulative damage meets its hit points (the budget if never).
//! 2. **Tie**: both sides survive the whole budget.
//! 3. **Endurance**: otherwise the side defeated later wins.
//! 4. **Initiative**: equal defeat indices below the budget go to the higher
//!    initiative, re-rolling both sides while they are equal.
//!
//! # Example
//!
//! ```
//! use duelsim_core::character::{Character, MonsterConfig};
//! use duelsim_core::fight::{fight, DEFAULT_ROUNDS};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(3);
//! let mut zombie = Character::monster(MonsterConfig::new("Zombie", 4), &mut rng)?;
//! let mut ghoul = Character::monster(MonsterConfig::new("Ghoul", 4), &mut rng)?;
//!
//! let outcome = fight(&mut zombie, &mut ghoul, DEFAULT_ROUNDS, &mut rng);
//! assert!(["Zombie", "Ghoul", "Tie"].contains(&outcome.label()));
//! # Ok::<(), duelsim_core::Error>(())
//! ```

use std::cmp::Ordering;
use std::fmt;

use knucklebone::RollMode;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::character::Character;

/// Attack rounds each side gets when no budget is given.
pub const DEFAULT_ROUNDS: usize = 500;

/// Label reported when neither side falls.
pub const TIE_LABEL: &str = "Tie";

// =============================================================================
// Outcome types
// =============================================================================

/// What settled a decisive fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Decision {
    /// The winner was defeated in a later round, or not at all
    Endurance,
    /// Both fell in the same round and the winner acted first
    Initiative,
}

/// Result of one fight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FightOutcome {
    /// One side won
    Victory {
        /// Name of the winning character
        winner: String,
        /// How the fight was settled
        decided_by: Decision,
    },
    /// Neither side fell within the round budget
    Tie,
}

impl FightOutcome {
    /// Winner's name, or [`TIE_LABEL`].
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Victory { winner, .. } => winner,
            Self::Tie => TIE_LABEL,
        }
    }

    /// Winner's name, if there is one.
    #[must_use]
    pub fn winner(&self) -> Option<&str> {
        match self {
            Self::Victory { winner, .. } => Some(winner),
            Self::Tie => None,
        }
    }

    /// True if neither side fell.
    #[must_use]
    pub fn is_tie(&self) -> bool {
        matches!(self, Self::Tie)
    }
}

impl fmt::Display for FightOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A fight outcome together with both defeat indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FightReport {
    /// Who won, and how
    pub outcome: FightOutcome,
    /// Round the first character fell (`rounds` if it never did)
    pub first_defeated_at: usize,
    /// Round the second character fell (`rounds` if it never did)
    pub second_defeated_at: usize,
    /// Round budget the fight ran with
    pub rounds: usize,
}

// =============================================================================
// Resolution
// =============================================================================

/// First index at which the running total of `damage` reaches `hit_points`,
/// or `damage.len()` if it never does.
#[must_use]
pub fn defeat_index(hit_points: i32, damage: &[f64]) -> usize {
    let threshold = f64::from(hit_points);
    let mut total = 0.0;
    damage
        .iter()
        .position(|&dealt| {
            total += dealt;
            total >= threshold
        })
        .unwrap_or(damage.len())
}

/// Run one fight and report both defeat indices.
///
/// Initiative is only touched when the defeat indices are equal and below
/// the budget; both characters keep whatever initiative the tie-break left
/// them with.
pub fn simulate_fight<R: Rng + ?Sized>(
    first: &mut Character,
    second: &mut Character,
    rounds: usize,
    rng: &mut R,
) -> FightReport {
    let first_damage = first.attack(second, rounds, RollMode::Normal, rng);
    let second_damage = second.attack(first, rounds, RollMode::Normal, rng);

    let first_defeated_at = defeat_index(first.hit_points(), &second_damage);
    let second_defeated_at = defeat_index(second.hit_points(), &first_damage);

    let outcome = if first_defeated_at == rounds && second_defeated_at == rounds {
        FightOutcome::Tie
    } else {
        match first_defeated_at.cmp(&second_defeated_at) {
            Ordering::Greater => victory(first, Decision::Endurance),
            Ordering::Less => victory(second, Decision::Endurance),
            Ordering::Equal => {
                break_initiative_tie(first, second, rng);
                if first.initiative() > second.initiative() {
                    victory(first, Decision::Initiative)
                } else {
                    victory(second, Decision::Initiative)
                }
            }
        }
    };

    debug!(
        first = first.name(),
        second = second.name(),
        first_defeated_at,
        second_defeated_at,
        rounds,
        outcome = %outcome,
        "fight resolved"
    );

    FightReport {
        outcome,
        first_defeated_at,
        second_defeated_at,
        rounds,
    }
}

/// Run one fight and return only its outcome.
pub fn fight<R: Rng + ?Sized>(
    first: &mut Character,
    second: &mut Character,
    rounds: usize,
    rng: &mut R,
) -> FightOutcome {
    simulate_fight(first, second, rounds, rng).outcome
}

fn victory(winner: &Character, decided_by: Decision) -> FightOutcome {
    FightOutcome::Victory {
        winner: winner.name().to_owned(),
        decided_by,
    }
}

fn break_initiative_tie<R: Rng + ?Sized>(first: &mut Character, second: &mut Character, rng: &mut R) {
    let mut rerolls = 0u32;
    while first.initiative() == second.initiative() {
        first.roll_initiative(rng);
        second.roll_initiative(rng);
        rerolls += 1;
        trace!(
            rerolls,
            first = first.initiative(),
            second = second.initiative(),
            "initiative re-roll"
        );
    }
    if rerolls > 0 {
        debug!(rerolls, "initiative tie broken");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterConfig;
    use knucklebone::DieSpec;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn duelist(name: &str, constitution_modifier: i32, rng: &mut ChaCha8Rng) -> Character {
        Character::new(
            CharacterConfig {
                name: Some(name.into()),
                level: 1,
                armor_class: Some(12),
                strength_modifier: 3,
                constitution_modifier,
                hit_die: Some(DieSpec::single(6)),
                damage_dice: Some(DieSpec::single(8)),
                initiative_bonus: 0,
            },
            rng,
        )
        .unwrap()
    }

    mod defeat_index_tests {
        use super::*;

        #[test]
        fn first_round_reaching_hit_points() {
            assert_eq!(defeat_index(6, &[3.0, 3.0, 3.0]), 1);
            assert_eq!(defeat_index(7, &[3.0, 3.0, 3.0]), 2);
        }

        #[test]
        fn never_reached_is_length() {
            assert_eq!(defeat_index(10, &[3.0, 3.0, 3.0]), 3);
            assert_eq!(defeat_index(1, &[]), 0);
        }

        #[test]
        fn non_positive_hit_points_fall_immediately() {
            assert_eq!(defeat_index(0, &[0.0, 5.0]), 0);
            assert_eq!(defeat_index(-4, &[0.0]), 0);
        }
    }

    mod outcome_tests {
        use super::*;

        #[test]
        fn unreachable_hit_points_tie() {
            let mut rng = ChaCha8Rng::seed_from_u64(0);
            let mut a = duelist("Ann", 100_000, &mut rng);
            let mut b = duelist("Bo", 100_000, &mut rng);
            let report = simulate_fight(&mut a, &mut b, 20, &mut rng);
            assert_eq!(report.outcome, FightOutcome::Tie);
            assert_eq!(report.first_defeated_at, 20);
            assert_eq!(report.second_defeated_at, 20);
            assert_eq!(report.outcome.label(), TIE_LABEL);
        }

        #[test]
        fn longer_survivor_wins_on_endurance() {
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            let mut tank = duelist("Tank", 100_000, &mut rng);
            let mut glass = duelist("Glass", 0, &mut rng);
            let report = simulate_fight(&mut glass, &mut tank, DEFAULT_ROUNDS, &mut rng);
            assert_eq!(
                report.outcome,
                FightOutcome::Victory {
                    winner: "Tank".into(),
                    decided_by: Decision::Endurance
                }
            );
            assert_eq!(report.second_defeated_at, DEFAULT_ROUNDS);
            assert!(report.first_defeated_at < DEFAULT_ROUNDS);
        }

        #[test]
        fn simultaneous_defeat_goes_to_initiative() {
            let mut rng = ChaCha8Rng::seed_from_u64(2);
            for _ in 0..50 {
                // Hit points below zero fall in round 0 whatever happens.
                let mut a = duelist("Ann", -100, &mut rng);
                let mut b = duelist("Bo", -100, &mut rng);
                let report = simulate_fight(&mut a, &mut b, 10, &mut rng);
                assert_eq!(report.first_defeated_at, 0);
                assert_eq!(report.second_defeated_at, 0);
                let FightOutcome::Victory { winner, decided_by } = report.outcome else {
                    panic!("simultaneous defeat must not tie");
                };
                assert_eq!(decided_by, Decision::Initiative);
                assert_ne!(a.initiative(), b.initiative());
                let expected = if a.initiative() > b.initiative() { "Ann" } else { "Bo" };
                assert_eq!(winner, expected);
            }
        }

        #[test]
        fn zero_rounds_is_a_tie() {
            let mut rng = ChaCha8Rng::seed_from_u64(3);
            let mut a = duelist("Ann", -100, &mut rng);
            let mut b = duelist("Bo", 0, &mut rng);
            assert!(fight(&mut a, &mut b, 0, &mut rng).is_tie());
        }

        #[test]
        fn labels_come_from_participants() {
            let mut rng = ChaCha8Rng::seed_from_u64(4);
            let mut a = duelist("Ann", 1, &mut rng);
            let mut b = duelist("Bo", 1, &mut rng);
            for _ in 0..200 {
                let outcome = fight(&mut a, &mut b, 3, &mut rng);
                assert!(["Ann", "Bo", TIE_LABEL].contains(&outcome.label()));
                assert_eq!(outcome.winner().is_none(), outcome.is_tie());
            }
        }

        #[test]
        fn outcome_serializes() {
            let outcome = FightOutcome::Victory {
                winner: "Ann".into(),
                decided_by: Decision::Initiative,
            };
            let json = serde_json::to_string(&outcome).unwrap();
            let parsed: FightOutcome = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, outcome);
            assert_eq!(outcome.to_string(), "Ann");
        }
    }
}
