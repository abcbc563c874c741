//! Barbarian variant: rage damage, Brutal Critical and the level-20 capstone.

use std::sync::Arc;

use knucklebone::{Die, DieSpec};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Blueprint, Character, CharacterKind, DEFAULT_NAME};
use crate::character::damage::BarbarianDamage;
use crate::error::{ConfigError, Result};

/// Barbarians always roll a d12 for hit points.
pub const BARBARIAN_HIT_DIE: DieSpec = DieSpec::single(12);

/// Level at which strength and constitution each gain the capstone bonus.
pub const CAPSTONE_LEVEL: u32 = 20;

/// Modifier increase granted at [`CAPSTONE_LEVEL`].
pub const CAPSTONE_BONUS: i32 = 2;

/// Options for a barbarian.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarbarianConfig {
    /// Display name
    pub name: Option<String>,
    /// Barbarian level (at least 1)
    pub level: u32,
    /// Armor class attacks must meet to hit
    pub armor_class: Option<i32>,
    /// Strength modifier before the capstone bonus
    pub strength_modifier: i32,
    /// Constitution modifier before the capstone bonus
    pub constitution_modifier: i32,
    /// Weapon damage dice
    pub damage_dice: Option<DieSpec>,
    /// Added to initiative rolls
    pub initiative_bonus: i32,
    /// Reroll 1s and 2s on damage dice once
    pub great_weapon_fighting: bool,
}

impl Default for BarbarianConfig {
    fn default() -> Self {
        Self {
            name: None,
            level: 1,
            armor_class: None,
            strength_modifier: 0,
            constitution_modifier: 0,
            damage_dice: None,
            initiative_bonus: 0,
            great_weapon_fighting: false,
        }
    }
}

/// Rage damage bonus by level.
#[must_use]
pub fn rage_bonus(level: u32) -> i32 {
    match level {
        0..=8 => 2,
        9..=15 => 3,
        _ => 4,
    }
}

/// Extra weapon dice rolled on a critical hit, by level.
#[must_use]
pub fn brutal_critical_dice(level: u32) -> u32 {
    match level {
        0..=8 => 0,
        9..=12 => 1,
        13..=16 => 2,
        _ => 3,
    }
}

impl Character {
    /// Build a raging barbarian.
    ///
    /// The rage bonus is folded into the damage bonus, and at level 20 the
    /// strength and constitution modifiers each gain +2 before anything is
    /// derived from them.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the level is zero, the armor class is
    /// missing, the damage dice are missing or invalid, or a derived stat
    /// overflows.
    pub fn barbarian<R: Rng + ?Sized>(config: BarbarianConfig, rng: &mut R) -> Result<Self> {
        let level = config.level;
        if level == 0 {
            return Err(ConfigError::InvalidLevel(level).into());
        }
        let armor_class = config.armor_class.ok_or(ConfigError::MissingArmorClass)?;
        let damage_dice = config.damage_dice.ok_or(ConfigError::MissingDamageDice)?;

        let capstone = if level == CAPSTONE_LEVEL {
            CAPSTONE_BONUS
        } else {
            0
        };
        let strength_modifier = config
            .strength_modifier
            .checked_add(capstone)
            .ok_or(ConfigError::StatOverflow("strength modifier"))?;
        let constitution_modifier = config
            .constitution_modifier
            .checked_add(capstone)
            .ok_or(ConfigError::StatOverflow("constitution modifier"))?;

        let rage_bonus = rage_bonus(level);
        let damage_bonus = strength_modifier
            .checked_add(rage_bonus)
            .ok_or(ConfigError::StatOverflow("damage bonus"))?;
        let brutal_dice = brutal_critical_dice(level);
        let damage = BarbarianDamage::new(damage_dice, config.great_weapon_fighting, brutal_dice)
            .map_err(ConfigError::from)?;
        let hit_die = Die::from_spec(BARBARIAN_HIT_DIE).map_err(ConfigError::from)?;

        Self::assemble(
            Blueprint {
                name: config.name.unwrap_or_else(|| DEFAULT_NAME.to_owned()),
                level,
                kind: CharacterKind::Barbarian {
                    rage_bonus,
                    great_weapon_fighting: config.great_weapon_fighting,
                    brutal_critical_dice: brutal_dice,
                },
                armor_class,
                strength_modifier,
                constitution_modifier,
                initiative_bonus: config.initiative_bonus,
                damage_bonus,
                hit_die,
                damage: Arc::new(damage),
            },
            rng,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{DamageDie, HitOutcome};
    use knucklebone::{DiceRoll, RollMode};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config(level: u32, great_weapon_fighting: bool) -> BarbarianConfig {
        BarbarianConfig {
            name: Some("Grog".into()),
            level,
            armor_class: Some(15),
            strength_modifier: 3,
            constitution_modifier: 2,
            damage_dice: Some(DieSpec::new(6, 2)),
            initiative_bonus: 0,
            great_weapon_fighting,
        }
    }

    #[test]
    fn rage_bonus_steps() {
        assert_eq!(rage_bonus(1), 2);
        assert_eq!(rage_bonus(8), 2);
        assert_eq!(rage_bonus(9), 3);
        assert_eq!(rage_bonus(15), 3);
        assert_eq!(rage_bonus(16), 4);
        assert_eq!(rage_bonus(20), 4);
    }

    #[test]
    fn brutal_critical_steps() {
        assert_eq!(brutal_critical_dice(8), 0);
        assert_eq!(brutal_critical_dice(9), 1);
        assert_eq!(brutal_critical_dice(12), 1);
        assert_eq!(brutal_critical_dice(13), 2);
        assert_eq!(brutal_critical_dice(16), 2);
        assert_eq!(brutal_critical_dice(17), 3);
    }

    #[test]
    fn level_nine_rage() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let barbarian = Character::barbarian(config(9, false), &mut rng).unwrap();
        assert!(matches!(
            barbarian.kind(),
            CharacterKind::Barbarian {
                rage_bonus: 3,
                brutal_critical_dice: 1,
                ..
            }
        ));
        assert_eq!(barbarian.damage_bonus(), 3 + 3);
    }

    #[test]
    fn capstone_applies_only_at_twenty() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let nineteen = Character::barbarian(config(19, false), &mut rng).unwrap();
        assert_eq!(nineteen.strength_modifier(), 3);
        assert_eq!(nineteen.constitution_modifier(), 2);

        let twenty = Character::barbarian(config(20, false), &mut rng).unwrap();
        assert_eq!(twenty.strength_modifier(), 5);
        assert_eq!(twenty.constitution_modifier(), 4);
        assert_eq!(twenty.damage_bonus(), 5 + 4);
        assert_eq!(twenty.hit_bonus(), 5 + 6);
    }

    #[test]
    fn capstone_overflow_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let config = BarbarianConfig {
            strength_modifier: i32::MAX - 1,
            ..config(20, false)
        };
        assert_eq!(
            Character::barbarian(config, &mut rng).unwrap_err(),
            crate::Error::from(ConfigError::StatOverflow("strength modifier"))
        );
    }

    #[test]
    fn hit_die_is_d12() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let barbarian = Character::barbarian(config(1, false), &mut rng).unwrap();
        assert_eq!(barbarian.hit_die(), DieSpec::single(12));
        assert_eq!(barbarian.hit_points(), 12 + 2);
    }

    #[test]
    fn great_weapon_fighting_selects_reroll_dice() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let plain = Character::barbarian(config(4, false), &mut rng).unwrap();
        let gwf = Character::barbarian(config(4, true), &mut rng).unwrap();
        assert!(matches!(plain.damage_dice(), DamageDie::Plain(_)));
        assert!(matches!(gwf.damage_dice(), DamageDie::Reroll(_)));
        assert_eq!(gwf.damage_dice().spec(), DieSpec::new(6, 2));
    }

    #[test]
    fn crits_gain_brutal_dice_at_high_level() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let barbarian = Character::barbarian(config(17, false), &mut rng).unwrap();
        let crits = barbarian.damage(&[HitOutcome::Critical; 300], &mut rng);
        // 4d6 + 3d6 + 2 * (3 + 4)
        assert!(crits.iter().all(|&d| (21.0..=56.0).contains(&d)));
    }

    #[test]
    fn missing_weapon_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let unarmed = BarbarianConfig {
            damage_dice: None,
            ..config(3, false)
        };
        assert_eq!(
            Character::barbarian(unarmed, &mut rng).unwrap_err(),
            crate::Error::from(ConfigError::MissingDamageDice)
        );
    }

    #[test]
    fn advantage_raises_mean_damage() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let barbarian = Character::barbarian(config(5, true), &mut rng).unwrap();
        let target = Character::barbarian(
            BarbarianConfig {
                armor_class: Some(17),
                ..config(5, false)
            },
            &mut rng,
        )
        .unwrap();
        #[allow(clippy::cast_precision_loss)]
        let mean = |v: Vec<f64>| v.iter().sum::<f64>() / v.len() as f64;
        let plain = mean(barbarian.attack(&target, 50_000, RollMode::Normal, &mut rng));
        let reckless = mean(barbarian.attack(&target, 50_000, RollMode::Advantage, &mut rng));
        assert!(reckless > plain);
    }
}
