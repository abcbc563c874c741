//! Factories for the characters the scenario tests keep reaching for.

use knucklebone::DieSpec;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use crate::character::{BarbarianConfig, Character, CharacterConfig, MonsterConfig};
use crate::progression::{barbarian_config, fighter_config};

// =============================================================================
// Setup
// =============================================================================

/// Route engine logs to the test harness. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Seeded stream for a test.
pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

// =============================================================================
// Character factories
// =============================================================================

/// A fighter from the progression table with the given name, armor class and
/// weapon.
pub fn fighter(
    name: &str,
    level: u32,
    armor_class: i32,
    weapon: DieSpec,
    rng: &mut ChaCha8Rng,
) -> Character {
    let config = CharacterConfig {
        name: Some(name.to_owned()),
        armor_class: Some(armor_class),
        damage_dice: Some(weapon),
        ..fighter_config(level).unwrap()
    };
    Character::new(config, rng).unwrap()
}

/// A Great Weapon Fighting barbarian from the progression table.
pub fn barbarian(name: &str, level: u32, weapon: DieSpec, rng: &mut ChaCha8Rng) -> Character {
    let config = BarbarianConfig {
        name: Some(name.to_owned()),
        armor_class: Some(14),
        damage_dice: Some(weapon),
        ..barbarian_config(level, true).unwrap()
    };
    Character::barbarian(config, rng).unwrap()
}

/// A generated monster.
pub fn monster(name: &str, challenge_rating: u32, rng: &mut ChaCha8Rng) -> Character {
    Character::monster(MonsterConfig::new(name, challenge_rating), rng).unwrap()
}
