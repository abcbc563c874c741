//! # Duelsim Core
//!
//! Monte Carlo combat resolution for tabletop duels.
//!
//! This crate turns character stat blocks into batched attack rolls and
//! resolves one-on-one fights from them, so that thousands of replications
//! can answer questions like "is a shield worth more than a two-handed
//! weapon at level N?".
//!
//! ## Architecture
//!
//! - **Characters**: one shared record for plain characters, barbarians and
//!   generated monsters, each carrying its own damage computer
//! - **Progression**: level-up tables for fighters and barbarians
//! - **Fights**: defeat-index resolution with an initiative tie-break
//! - **Experiments**: parallel, seed-stable replication runners
//!
//! Dice live in the [`knucklebone`] crate, re-exported here.
//!
//! ## Usage
//!
//! ```
//! use duelsim_core::character::Character;
//! use duelsim_core::fight::{fight, DEFAULT_ROUNDS};
//! use duelsim_core::progression::fighter_config;
//! use knucklebone::DieSpec;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(11);
//!
//! let mut two_handed = fighter_config(5)?;
//! two_handed.name = Some("Longswordington".into());
//! two_handed.armor_class = Some(18);
//! two_handed.damage_dice = Some(DieSpec::single(10));
//!
//! let mut shielded = two_handed.clone();
//! shielded.name = Some("Shieldsworth".into());
//! shielded.armor_class = Some(20);
//! shielded.damage_dice = Some(DieSpec::single(8));
//!
//! let mut a = Character::new(two_handed, &mut rng)?;
//! let mut b = Character::new(shielded, &mut rng)?;
//! let outcome = fight(&mut a, &mut b, DEFAULT_ROUNDS, &mut rng);
//! println!("{outcome}");
//! # Ok::<(), duelsim_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export knucklebone for dice
pub use knucklebone;

pub mod character;
pub mod error;
pub mod experiment;
pub mod fight;
pub mod progression;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use character::{
    BarbarianConfig, Character, CharacterConfig, CharacterKind, HitOutcome, MonsterConfig,
};
pub use error::{ConfigError, DomainError, Error, Result};
pub use experiment::ExperimentConfig;
pub use fight::{fight, simulate_fight, Decision, FightOutcome, FightReport};
