//! Character model and batched attack resolution.
//!
//! A [`Character`] is one shared record for every variant. What differs
//! between a plain character, a [`Barbarian`](CharacterKind::Barbarian) and a
//! [`Monster`](CharacterKind::Monster) is how the record is derived at
//! construction and which [`DamageComputer`] it carries.
//!
//! # Hit points
//!
//! Hit points are rolled once at construction and then serve as a fixed
//! threshold: a fight compares cumulative incoming damage against them rather
//! than decrementing them.
//!
//! # Example
//!
//! ```
//! use duelsim_core::character::{Character, CharacterConfig};
//! use knucklebone::{DieSpec, RollMode};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//! let fighter = Character::new(
//!     CharacterConfig {
//!         name: Some("Longswordington".into()),
//!         level: 5,
//!         armor_class: Some(18),
//!         strength_modifier: 4,
//!         hit_die: Some(DieSpec::single(10)),
//!         damage_dice: Some(DieSpec::single(10)),
//!         ..CharacterConfig::default()
//!     },
//!     &mut rng,
//! )?;
//!
//! let damage = fighter.attack(&fighter, 100, RollMode::Normal, &mut rng);
//! assert_eq!(damage.len(), 100);
//! # Ok::<(), duelsim_core::Error>(())
//! ```

pub mod barbarian;
pub mod damage;
pub mod monster;

use std::fmt;
use std::sync::Arc;

use knucklebone::{DiceRoll, Die, DieSpec, RollMode, D20};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, DomainError, Result};

pub use barbarian::BarbarianConfig;
pub use damage::{BarbarianDamage, DamageComputer, DamageDie, HitOutcome, StandardDamage};
pub use monster::{MonsterConfig, MonsterStats};

/// Name given to characters configured without one.
pub const DEFAULT_NAME: &str = "Anonymous";

/// Which variant a character was built as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterKind {
    /// An ordinary character with explicit stats
    Base,
    /// A raging barbarian
    Barbarian {
        /// Flat damage added to every hit while raging
        rage_bonus: i32,
        /// Whether damage dice reroll 1s and 2s once
        great_weapon_fighting: bool,
        /// Extra weapon dice rolled on a critical hit
        brutal_critical_dice: u32,
    },
    /// A monster derived from its challenge rating
    Monster {
        /// Difficulty the stat block was generated from
        challenge_rating: u32,
    },
}

impl fmt::Display for CharacterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "Character"),
            Self::Barbarian { .. } => write!(f, "Barbarian"),
            Self::Monster { .. } => write!(f, "Monster"),
        }
    }
}

/// Options for an ordinary character.
///
/// Hit die and damage dice have no sensible default and must be supplied;
/// [`Character::new`] rejects a configuration without them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Display name, [`DEFAULT_NAME`] when absent
    pub name: Option<String>,
    /// Character level (at least 1)
    pub level: u32,
    /// Armor class attacks must meet to hit
    pub armor_class: Option<i32>,
    /// Added to to-hit and damage
    pub strength_modifier: i32,
    /// Added to hit points once per level
    pub constitution_modifier: i32,
    /// Die rolled for hit points at each level after the first
    pub hit_die: Option<DieSpec>,
    /// Weapon damage dice
    pub damage_dice: Option<DieSpec>,
    /// Added to initiative rolls
    pub initiative_bonus: i32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            name: None,
            level: 1,
            armor_class: None,
            strength_modifier: 0,
            constitution_modifier: 0,
            hit_die: None,
            damage_dice: None,
            initiative_bonus: 0,
        }
    }
}

/// Everything a variant decides before hit points and initiative are rolled.
struct Blueprint {
    name: String,
    level: u32,
    kind: CharacterKind,
    armor_class: i32,
    strength_modifier: i32,
    constitution_modifier: i32,
    initiative_bonus: i32,
    damage_bonus: i32,
    hit_die: Die,
    damage: Arc<dyn DamageComputer>,
}

/// A combatant with fixed statistics and batched attack resolution.
#[derive(Debug, Clone)]
pub struct Character {
    name: String,
    level: u32,
    kind: CharacterKind,
    armor_class: i32,
    strength_modifier: i32,
    constitution_modifier: i32,
    initiative_bonus: i32,
    damage_bonus: i32,
    hit_die: Die,
    damage: Arc<dyn DamageComputer>,
    hit_points: i32,
    initiative: i32,
    d20: D20,
}

impl Character {
    /// Build an ordinary character, rolling its hit points and initiative.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the level is zero, the armor class is
    /// missing, either die is missing or invalid, or a derived stat
    /// overflows.
    pub fn new<R: Rng + ?Sized>(config: CharacterConfig, rng: &mut R) -> Result<Self> {
        if config.level == 0 {
            return Err(ConfigError::InvalidLevel(config.level).into());
        }
        let armor_class = config.armor_class.ok_or(ConfigError::MissingArmorClass)?;
        let hit_die = Die::from_spec(config.hit_die.ok_or(ConfigError::MissingHitDie)?)
            .map_err(ConfigError::from)?;
        let damage = StandardDamage::new(config.damage_dice.ok_or(ConfigError::MissingDamageDice)?)
            .map_err(ConfigError::from)?;

        Self::assemble(
            Blueprint {
                name: config.name.unwrap_or_else(|| DEFAULT_NAME.to_owned()),
                level: config.level,
                kind: CharacterKind::Base,
                armor_class,
                strength_modifier: config.strength_modifier,
                constitution_modifier: config.constitution_modifier,
                initiative_bonus: config.initiative_bonus,
                damage_bonus: config.strength_modifier,
                hit_die,
                damage: Arc::new(damage),
            },
            rng,
        )
    }

    /// Roll hit points and initiative for a finished blueprint.
    ///
    /// The largest d20 totals for to-hit and initiative must fit `i32`.
    fn assemble<R: Rng + ?Sized>(blueprint: Blueprint, rng: &mut R) -> Result<Self> {
        #[allow(clippy::cast_possible_wrap)]
        let natural_max = D20::SIDES as i32;
        proficiency_bonus(blueprint.level)
            .checked_add(blueprint.strength_modifier)
            .and_then(|bonus| bonus.checked_add(natural_max))
            .ok_or(ConfigError::StatOverflow("hit bonus"))?;
        blueprint
            .initiative_bonus
            .checked_add(natural_max)
            .ok_or(ConfigError::StatOverflow("initiative bonus"))?;

        let hit_points = roll_hit_points(
            &blueprint.hit_die,
            blueprint.level,
            blueprint.constitution_modifier,
            rng,
        )?;
        let mut character = Self {
            name: blueprint.name,
            level: blueprint.level,
            kind: blueprint.kind,
            armor_class: blueprint.armor_class,
            strength_modifier: blueprint.strength_modifier,
            constitution_modifier: blueprint.constitution_modifier,
            initiative_bonus: blueprint.initiative_bonus,
            damage_bonus: blueprint.damage_bonus,
            hit_die: blueprint.hit_die,
            damage: blueprint.damage,
            hit_points,
            initiative: 0,
            d20: D20::new(),
        };
        character.roll_initiative(rng);
        Ok(character)
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Level (the challenge rating for monsters).
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Variant this character was built as.
    #[must_use]
    pub fn kind(&self) -> CharacterKind {
        self.kind
    }

    /// Armor class.
    #[must_use]
    pub fn armor_class(&self) -> i32 {
        self.armor_class
    }

    /// Hit points rolled at construction.
    #[must_use]
    pub fn hit_points(&self) -> i32 {
        self.hit_points
    }

    /// Strength modifier.
    #[must_use]
    pub fn strength_modifier(&self) -> i32 {
        self.strength_modifier
    }

    /// Constitution modifier.
    #[must_use]
    pub fn constitution_modifier(&self) -> i32 {
        self.constitution_modifier
    }

    /// Bonus added to initiative rolls.
    #[must_use]
    pub fn initiative_bonus(&self) -> i32 {
        self.initiative_bonus
    }

    /// Current initiative.
    #[must_use]
    pub fn initiative(&self) -> i32 {
        self.initiative
    }

    /// Flat damage added per damage-dice multiple.
    #[must_use]
    pub fn damage_bonus(&self) -> i32 {
        self.damage_bonus
    }

    /// Proficiency bonus: `ceil(level / 4) + 1`.
    #[must_use]
    pub fn proficiency_bonus(&self) -> i32 {
        proficiency_bonus(self.level)
    }

    /// Static to-hit modifier: strength plus proficiency.
    #[must_use]
    pub fn hit_bonus(&self) -> i32 {
        self.strength_modifier + self.proficiency_bonus()
    }

    /// Hit die.
    #[must_use]
    pub fn hit_die(&self) -> DieSpec {
        self.hit_die.spec()
    }

    /// Damage dice.
    #[must_use]
    pub fn damage_dice(&self) -> DamageDie {
        self.damage.dice()
    }

    /// Multi-line summary of the character's statistics.
    #[must_use]
    pub fn stat_block(&self) -> String {
        self.to_string()
    }

    /// Roll a d20 plus the initiative bonus.
    pub fn roll_initiative<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let natural = self.d20.roll(1, rng).first().copied().unwrap_or(1);
        #[allow(clippy::cast_possible_wrap)]
        let natural = natural as i32;
        self.initiative = natural + self.initiative_bonus;
    }

    /// Roll `rolls` attacks against `target`.
    ///
    /// Each element is a [`HitOutcome`]: natural 20s are criticals and
    /// natural 1s are misses regardless of the target's armor class.
    pub fn hit<R: Rng + ?Sized>(
        &self,
        target: &Character,
        rolls: usize,
        mode: RollMode,
        rng: &mut R,
    ) -> Vec<HitOutcome> {
        let hit_bonus = self.hit_bonus();
        self.d20
            .roll_with(mode, rolls, rng)
            .into_iter()
            .map(|natural| HitOutcome::classify(natural, hit_bonus, target.armor_class))
            .collect()
    }

    /// Damage dealt by each outcome in `hits`.
    pub fn damage<R: Rng + ?Sized>(&self, hits: &[HitOutcome], rng: &mut R) -> Vec<f64> {
        self.damage.damage(hits, self.damage_bonus, &mut &mut *rng)
    }

    /// Roll `rolls` attacks against `target` and return the damage of each.
    pub fn attack<R: Rng + ?Sized>(
        &self,
        target: &Character,
        rolls: usize,
        mode: RollMode,
        rng: &mut R,
    ) -> Vec<f64> {
        let hits = self.hit(target, rolls, mode, rng);
        self.damage(&hits, rng)
    }

    /// [`attack`](Self::attack) taking separate advantage/disadvantage flags.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ConflictingRollModes`] when both flags are set.
    pub fn attack_with_flags<R: Rng + ?Sized>(
        &self,
        target: &Character,
        rolls: usize,
        advantage: bool,
        disadvantage: bool,
        rng: &mut R,
    ) -> Result<Vec<f64>> {
        let mode = roll_mode(advantage, disadvantage)?;
        Ok(self.attack(target, rolls, mode, rng))
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---{}---", self.kind)?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Level: {}", self.level)?;
        writeln!(f, "Hit Points: {}", self.hit_points)?;
        writeln!(f, "AC: {}", self.armor_class)?;
        writeln!(f, "Damage Dice: {}", self.damage_dice())?;
        writeln!(f, "Hit Die: {}", self.hit_die)?;
        writeln!(f, "Hit Bonus: {}", self.hit_bonus())?;
        writeln!(f, "Damage Bonus: {}", self.damage_bonus)?;
        writeln!(f, "Constitution Modifier: {}", self.constitution_modifier)?;
        write!(f, "Initiative: {}", self.initiative)
    }
}

/// Translate advantage/disadvantage flags, rejecting both at once.
///
/// # Errors
///
/// Returns [`DomainError::ConflictingRollModes`] when both flags are set.
pub fn roll_mode(advantage: bool, disadvantage: bool) -> Result<RollMode> {
    RollMode::from_flags(advantage, disadvantage)
        .ok_or_else(|| DomainError::ConflictingRollModes.into())
}

// ceil(level / 4) + 1 stays below 2^30 for any u32 level.
#[allow(clippy::cast_possible_wrap)]
fn proficiency_bonus(level: u32) -> i32 {
    (level.div_ceil(4) + 1) as i32
}

/// Maximum of the hit die at level 1, one roll per later level, plus the
/// constitution modifier for every level.
///
/// Summed in `i64`; a total outside `i32` is a [`ConfigError::StatOverflow`].
#[allow(clippy::cast_possible_truncation)]
fn roll_hit_points<R: Rng + ?Sized>(
    hit_die: &Die,
    level: u32,
    constitution_modifier: i32,
    rng: &mut R,
) -> Result<i32> {
    let overflow = || ConfigError::StatOverflow("hit points");
    let later_levels = i64::try_from(hit_die.sum_roll(level.saturating_sub(1) as usize, rng))
        .map_err(|_| overflow())?;
    let total = i64::from(hit_die.sides())
        .checked_add(later_levels)
        .and_then(|total| total.checked_add(i64::from(constitution_modifier) * i64::from(level)))
        .ok_or_else(overflow)?;
    i32::try_from(total).map_err(|_| overflow().into())
}
