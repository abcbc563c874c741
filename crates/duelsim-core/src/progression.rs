//! Level-up tables for the modelled classes.
//!
//! Both classes start from a strength-based build (+3 strength, +2
//! constitution) and spend every ability score improvement on one of those
//! two modifiers. The tables below give the cumulative increase at each
//! level breakpoint as `(strength, constitution)`.
//!
//! The templates leave armor class and weapon unset; callers fill those in.

use knucklebone::DieSpec;

use crate::character::{BarbarianConfig, CharacterConfig};
use crate::error::{ConfigError, Result};

/// Strength modifier before any improvement.
pub const BASE_STRENGTH_MODIFIER: i32 = 3;

/// Constitution modifier before any improvement.
pub const BASE_CONSTITUTION_MODIFIER: i32 = 2;

/// Fighters roll a d10 for hit points.
pub const FIGHTER_HIT_DIE: DieSpec = DieSpec::single(10);

/// `(first level, strength, constitution)`, ascending by level.
type Breakpoints = [(u32, i32, i32)];

const FIGHTER_IMPROVEMENTS: [(u32, i32, i32); 6] = [
    (1, 0, 0),
    (4, 1, 0),
    (6, 1, 1),
    (8, 2, 1),
    (12, 2, 2),
    (14, 2, 3),
];

const BARBARIAN_IMPROVEMENTS: [(u32, i32, i32); 5] =
    [(1, 0, 0), (4, 1, 0), (8, 1, 1), (12, 2, 1), (16, 2, 2)];

// Great Weapon Fighting takes the level-4 improvement.
const BARBARIAN_GWF_IMPROVEMENTS: [(u32, i32, i32); 5] =
    [(1, 0, 0), (4, 0, 0), (8, 1, 0), (12, 1, 1), (16, 2, 1)];

/// Cumulative `(strength, constitution)` increase at `level`.
fn improvements(level: u32, table: &Breakpoints) -> Result<(i32, i32)> {
    table
        .iter()
        .rev()
        .find(|(from, _, _)| level >= *from)
        .map(|&(_, strength, constitution)| (strength, constitution))
        .ok_or_else(|| ConfigError::InvalidLevel(level).into())
}

/// Fighter template: level, modifiers and a d10 hit die.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidLevel`] for level 0.
pub fn fighter_config(level: u32) -> Result<CharacterConfig> {
    let (strength, constitution) = improvements(level, &FIGHTER_IMPROVEMENTS)?;
    Ok(CharacterConfig {
        level,
        strength_modifier: BASE_STRENGTH_MODIFIER + strength,
        constitution_modifier: BASE_CONSTITUTION_MODIFIER + constitution,
        hit_die: Some(FIGHTER_HIT_DIE),
        ..CharacterConfig::default()
    })
}

/// Barbarian template, optionally trading the level-4 improvement for Great
/// Weapon Fighting.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidLevel`] for level 0.
pub fn barbarian_config(level: u32, great_weapon_fighting: bool) -> Result<BarbarianConfig> {
    let table: &Breakpoints = if great_weapon_fighting {
        &BARBARIAN_GWF_IMPROVEMENTS
    } else {
        &BARBARIAN_IMPROVEMENTS
    };
    let (strength, constitution) = improvements(level, table)?;
    Ok(BarbarianConfig {
        level,
        strength_modifier: BASE_STRENGTH_MODIFIER + strength,
        constitution_modifier: BASE_CONSTITUTION_MODIFIER + constitution,
        great_weapon_fighting,
        ..BarbarianConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighter_modifiers(level: u32) -> (i32, i32) {
        let config = fighter_config(level).unwrap();
        (config.strength_modifier, config.constitution_modifier)
    }

    fn barbarian_modifiers(level: u32, gwf: bool) -> (i32, i32) {
        let config = barbarian_config(level, gwf).unwrap();
        (config.strength_modifier, config.constitution_modifier)
    }

    mod fighter_tests {
        use super::*;

        #[test]
        fn breakpoints() {
            assert_eq!(fighter_modifiers(1), (3, 2));
            assert_eq!(fighter_modifiers(3), (3, 2));
            assert_eq!(fighter_modifiers(4), (4, 2));
            assert_eq!(fighter_modifiers(6), (4, 3));
            assert_eq!(fighter_modifiers(8), (5, 3));
            assert_eq!(fighter_modifiers(11), (5, 3));
            assert_eq!(fighter_modifiers(12), (5, 4));
            assert_eq!(fighter_modifiers(14), (5, 5));
            assert_eq!(fighter_modifiers(20), (5, 5));
        }

        #[test]
        fn template_fields() {
            let config = fighter_config(7).unwrap();
            assert_eq!(config.level, 7);
            assert_eq!(config.hit_die, Some(FIGHTER_HIT_DIE));
            assert_eq!(config.damage_dice, None);
            assert_eq!(config.armor_class, None);
        }
    }

    mod barbarian_tests {
        use super::*;

        #[test]
        fn breakpoints_without_feat() {
            assert_eq!(barbarian_modifiers(1, false), (3, 2));
            assert_eq!(barbarian_modifiers(4, false), (4, 2));
            assert_eq!(barbarian_modifiers(8, false), (4, 3));
            assert_eq!(barbarian_modifiers(12, false), (5, 3));
            assert_eq!(barbarian_modifiers(16, false), (5, 4));
            assert_eq!(barbarian_modifiers(20, false), (5, 4));
        }

        #[test]
        fn feat_delays_improvements() {
            assert_eq!(barbarian_modifiers(4, true), (3, 2));
            assert_eq!(barbarian_modifiers(8, true), (4, 2));
            assert_eq!(barbarian_modifiers(12, true), (4, 3));
            assert_eq!(barbarian_modifiers(16, true), (5, 3));
            assert!(barbarian_config(5, true).unwrap().great_weapon_fighting);
        }
    }

    #[test]
    fn level_zero_rejected() {
        assert_eq!(
            fighter_config(0).unwrap_err(),
            crate::Error::from(ConfigError::InvalidLevel(0))
        );
        assert!(barbarian_config(0, true).is_err());
    }
}
