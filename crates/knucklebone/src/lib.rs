//! # Knucklebone
//!
//! Batched dice for Monte Carlo studies of tabletop combat.
//!
//! Every roll produces a vector of independent trials in one call, and every
//! draw takes its random source explicitly, so a seeded generator makes a
//! whole study reproducible.
//!
//! - [`Die`]: `count` dice with `sides` faces, summed per trial
//! - [`D20`]: the attack die, with advantage and disadvantage
//! - [`RerollDie`]: Great Weapon Fighting dice that reroll 1s and 2s once
//! - [`triangular_index`]: bounded triangular draws over ordered options
//! - [`ScalarStats`], [`Tally`]: mergeable summaries of roll batches
//!
//! ## Quick Start
//!
//! ```
//! use knucklebone::{DiceRoll, Die, D20, RollMode};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//!
//! let greatsword = Die::new(6, 2)?;
//! let damage = greatsword.roll(1_000, &mut rng);
//! assert!(damage.iter().all(|&d| (2..=12).contains(&d)));
//!
//! let attacks = D20::new().roll_with(RollMode::Advantage, 1_000, &mut rng);
//! assert_eq!(attacks.len(), 1_000);
//! # Ok::<(), knucklebone::DiceError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod d20;
pub mod die;
pub mod error;
pub mod reroll;
pub mod stats;
pub mod triangular;

// Re-exports for convenience
pub use d20::{RollMode, D20};
pub use die::{DiceRoll, Die, DieSpec};
pub use error::{DiceError, Result};
pub use reroll::RerollDie;
pub use stats::{ScalarStats, Tally};
pub use triangular::{sample_triangular, triangular_index};
