//! Scenario tests for the combat engine.
//!
//! - `determinism.rs`: same seed, same results, whatever the thread count
//! - `integration.rs`: end-to-end checks across characters, fights and
//!   experiments
//! - `helpers.rs`: character factories and log setup

mod determinism;
mod helpers;

// Re-export for convenience
pub use helpers::*;
