//! Monsters generated from a challenge rating.
//!
//! Each stat is drawn independently from an ordered option table. The draw is
//! a rounded triangular sample over table indices whose bounds and peak track
//! the challenge rating, so weak monsters lean toward the front of each table
//! and strong ones toward the back without any hand-written per-rating tables.

use std::sync::Arc;

use knucklebone::{triangular_index, Die, DieSpec};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Blueprint, Character, CharacterKind};
use crate::character::damage::StandardDamage;
use crate::error::{ConfigError, Result};

/// Highest challenge rating the generator supports.
pub const MAX_CHALLENGE_RATING: u32 = 20;

/// How far below and above the challenge rating a draw may reach.
pub const CHALLENGE_RATING_SPREAD: u32 = 5;

/// Default monster name.
pub const DEFAULT_MONSTER_NAME: &str = "Monster";

/// Hit dice, weakest first.
pub const HIT_DIE_OPTIONS: [DieSpec; 4] = [
    DieSpec::single(6),
    DieSpec::single(8),
    DieSpec::single(10),
    DieSpec::single(12),
];

/// Strength and constitution modifiers.
pub const MODIFIER_OPTIONS: [i32; 10] = [-2, -1, 0, 1, 2, 3, 4, 5, 6, 7];

/// Armor classes.
pub const ARMOR_CLASS_OPTIONS: [i32; 12] = [10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21];

/// Initiative bonuses.
pub const INITIATIVE_BONUS_OPTIONS: [i32; 11] = [-2, -1, 0, 1, 2, 3, 4, 5, 6, 7, 8];

const DAMAGE_DIE_SIDES: [u32; 5] = [4, 6, 8, 10, 12];
const DAMAGE_DIE_COUNTS: [u32; 1] = [1];

/// Every damage die a monster may wield, ordered by expected value.
#[must_use]
pub fn damage_dice_options() -> Vec<DieSpec> {
    let mut options: Vec<DieSpec> = DAMAGE_DIE_SIDES
        .iter()
        .flat_map(|&sides| {
            DAMAGE_DIE_COUNTS
                .iter()
                .map(move |&count| DieSpec::new(sides, count))
        })
        .collect();
    options.sort_by(|a, b| a.expected_value().total_cmp(&b.expected_value()));
    options
}

/// Pick one entry of `options` for a monster of challenge rating `cr`.
///
/// With `L` options, the draw is a triangular sample over indices with
///
/// - `max = min(L - 1, cr + 5)`
/// - `min = min(max(0, cr - 5), max - 1)`
/// - `mode = clamp(cr * max / 20, min, max)`
///
/// rounded half-to-even.
///
/// # Errors
///
/// Fails when `cr` exceeds [`MAX_CHALLENGE_RATING`] or `options` has fewer
/// than two entries.
#[allow(clippy::cast_precision_loss)]
pub fn choose_value<'a, T, R: Rng + ?Sized>(
    cr: u32,
    options: &'a [T],
    rng: &mut R,
) -> Result<&'a T> {
    if cr > MAX_CHALLENGE_RATING {
        return Err(ConfigError::ChallengeRatingOutOfRange {
            cr,
            max: MAX_CHALLENGE_RATING,
        }
        .into());
    }
    if options.len() < 2 {
        return Err(ConfigError::TooFewOptions(options.len()).into());
    }

    let max_value = (options.len() - 1).min((cr + CHALLENGE_RATING_SPREAD) as usize);
    let min_value = (cr.saturating_sub(CHALLENGE_RATING_SPREAD) as usize).min(max_value - 1);
    let mode_value = (f64::from(cr) * max_value as f64 / f64::from(MAX_CHALLENGE_RATING))
        .clamp(min_value as f64, max_value as f64);

    let index = triangular_index(min_value, mode_value, max_value, rng)
        .map_err(ConfigError::from)?;
    Ok(&options[index])
}

/// A generated monster stat block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterStats {
    /// Hit die
    pub hit_die: DieSpec,
    /// Armor class
    pub armor_class: i32,
    /// Strength modifier
    pub strength_modifier: i32,
    /// Initiative bonus
    pub initiative_bonus: i32,
    /// Damage dice
    pub damage_dice: DieSpec,
    /// Constitution modifier
    pub constitution_modifier: i32,
}

impl MonsterStats {
    /// Draw every stat for challenge rating `cr`.
    ///
    /// When `armor_class` is given it is used as is and no armor class is
    /// drawn.
    ///
    /// # Errors
    ///
    /// Fails when `cr` exceeds [`MAX_CHALLENGE_RATING`].
    pub fn generate<R: Rng + ?Sized>(
        cr: u32,
        armor_class: Option<i32>,
        rng: &mut R,
    ) -> Result<Self> {
        let hit_die = *choose_value(cr, &HIT_DIE_OPTIONS, rng)?;
        let armor_class = match armor_class {
            Some(ac) => ac,
            None => *choose_value(cr, &ARMOR_CLASS_OPTIONS, rng)?,
        };
        let strength_modifier = *choose_value(cr, &MODIFIER_OPTIONS, rng)?;
        let initiative_bonus = *choose_value(cr, &INITIATIVE_BONUS_OPTIONS, rng)?;
        let damage_dice = *choose_value(cr, &damage_dice_options(), rng)?;
        let constitution_modifier = *choose_value(cr, &MODIFIER_OPTIONS, rng)?;

        Ok(Self {
            hit_die,
            armor_class,
            strength_modifier,
            initiative_bonus,
            damage_dice,
            constitution_modifier,
        })
    }
}

/// Options for a generated monster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterConfig {
    /// Display name
    pub name: String,
    /// Difficulty, `0..=20`
    pub challenge_rating: u32,
    /// Fixed armor class instead of a drawn one
    pub armor_class: Option<i32>,
}

impl Default for MonsterConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MONSTER_NAME.to_owned(),
            challenge_rating: 0,
            armor_class: None,
        }
    }
}

impl MonsterConfig {
    /// A monster named `name` at challenge rating `cr`.
    #[must_use]
    pub fn new(name: impl Into<String>, challenge_rating: u32) -> Self {
        Self {
            name: name.into(),
            challenge_rating,
            armor_class: None,
        }
    }

    /// Fix the armor class instead of drawing it.
    #[must_use]
    pub fn with_armor_class(mut self, armor_class: i32) -> Self {
        self.armor_class = Some(armor_class);
        self
    }
}

impl Character {
    /// Generate a monster. Its level equals its challenge rating.
    ///
    /// # Errors
    ///
    /// Fails when the challenge rating exceeds [`MAX_CHALLENGE_RATING`].
    pub fn monster<R: Rng + ?Sized>(config: MonsterConfig, rng: &mut R) -> Result<Self> {
        let cr = config.challenge_rating;
        let stats = MonsterStats::generate(cr, config.armor_class, rng)?;
        tracing::debug!(name = %config.name, cr, ?stats, "generated monster stat block");

        let hit_die = Die::from_spec(stats.hit_die).map_err(ConfigError::from)?;
        let damage = StandardDamage::new(stats.damage_dice).map_err(ConfigError::from)?;

        Self::assemble(
            Blueprint {
                name: config.name,
                level: cr,
                kind: CharacterKind::Monster {
                    challenge_rating: cr,
                },
                armor_class: stats.armor_class,
                strength_modifier: stats.strength_modifier,
                constitution_modifier: stats.constitution_modifier,
                initiative_bonus: stats.initiative_bonus,
                damage_bonus: stats.strength_modifier,
                hit_die,
                damage: Arc::new(damage),
            },
            rng,
        )
    }
}
