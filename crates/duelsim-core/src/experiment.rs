//! Batch experiments behind the published comparisons.
//!
//! Each runner spreads its replications over the rayon pool and returns plain
//! serializable rows for a charting layer to draw.
//!
//! # Determinism
//!
//! A SHA-256 digest of (master seed, experiment label, level) keys a
//! [`ChaCha8Rng`], and every replication reads its own stream of that key.
//! Both steps are fixed algorithms, so results depend on
//! [`ExperimentConfig::seed`] only, never on thread count or toolchain.
//!
//! Summaries are built per chunk of work and merged afterwards. Floating
//! point summaries merge in chunk order; counts merge in any order.

use knucklebone::{DiceRoll, DieSpec, RollMode, ScalarStats, Tally};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::character::{Character, DamageDie, MonsterConfig};
use crate::error::Result;
use crate::fight::{fight, DEFAULT_ROUNDS};
use crate::progression::{barbarian_config, fighter_config};

/// Replications per experiment unless configured otherwise.
pub const DEFAULT_REPLICATIONS: usize = 10_000;

/// Greatsword damage dice.
pub const GREATSWORD: DieSpec = DieSpec::new(6, 2);

/// Greataxe damage dice.
pub const GREATAXE: DieSpec = DieSpec::new(12, 1);

/// Two-handed longsword damage dice.
pub const LONGSWORD_TWO_HANDED: DieSpec = DieSpec::single(10);

/// One-handed longsword damage dice.
pub const LONGSWORD_ONE_HANDED: DieSpec = DieSpec::single(8);

/// Armor class a shield adds.
pub const SHIELD_BONUS: i32 = 2;

/// Name of the two-handed fighter in [`shield_duel`].
pub const LONGSWORD_FIGHTER: &str = "Longswordington";

/// Name of the shield-bearing fighter in [`shield_duel`].
pub const SHIELD_FIGHTER: &str = "Shieldsworth";

/// Name of the monster both fighters face in [`shield_duel`].
pub const SHIELD_DUEL_MONSTER: &str = "Zombie";

/// Name of the monster in [`brutal_critical_comparison`].
pub const TRAINING_MONSTER: &str = "Target Dummy";

// Base armor class of an unarmored barbarian before constitution.
const UNARMORED_BASE: i32 = 10;

// Attacks per independently seeded chunk in attack-batch runners.
const ATTACK_CHUNK: usize = 1_024;

/// Replication settings shared by every runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Independent replications per data point
    pub replications: usize,
    /// Round budget for each fight
    pub rounds: usize,
    /// Master seed
    pub seed: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            replications: DEFAULT_REPLICATIONS,
            rounds: DEFAULT_ROUNDS,
            seed: 0,
        }
    }
}

impl ExperimentConfig {
    /// Config with the given master seed and default sizes.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Seeded stream for one replication.
    #[must_use]
    pub fn replication_rng(&self, label: &str, level: u32, replication: usize) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::from_seed(experiment_key(self.seed, label, level));
        rng.set_stream(replication as u64);
        rng
    }
}

/// ChaCha key for one (master seed, label, level) data point.
///
/// The label is length-prefixed so that no two inputs share a byte stream.
#[must_use]
pub fn experiment_key(seed: u64, label: &str, level: u32) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update((label.len() as u64).to_le_bytes());
    hasher.update(label.as_bytes());
    hasher.update(level.to_le_bytes());
    hasher.finalize().into()
}

// =============================================================================
// Great Weapon Fighting averages
// =============================================================================

/// Sampled average of one weapon's dice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiceAverage {
    /// Chart label, e.g. `Great Weapon Fighting 2d6`
    pub label: String,
    /// Dice rolled
    pub dice: DieSpec,
    /// Whether 1s and 2s were rerolled
    pub great_weapon_fighting: bool,
    /// Mean over all replications
    pub average: f64,
}

/// Average roll of the greatsword and greataxe, with and without Great
/// Weapon Fighting rerolls.
///
/// # Errors
///
/// Never fails for the built-in dice; the signature matches the other
/// runners.
pub fn great_weapon_averages(config: &ExperimentConfig) -> Result<Vec<DiceAverage>> {
    const LABEL: &str = "great_weapon_averages";
    info!(replications = config.replications, "great weapon averages started");

    let cases = [
        (GREATSWORD, false),
        (GREATSWORD, true),
        (GREATAXE, false),
        (GREATAXE, true),
    ];
    let rows = cases
        .into_par_iter()
        .enumerate()
        .map(|(index, (dice, great_weapon_fighting))| -> Result<DiceAverage> {
            let die = DamageDie::new(dice, great_weapon_fighting)?;
            let mut rng = config.replication_rng(LABEL, 0, index);
            let kind = if great_weapon_fighting {
                "Great Weapon Fighting"
            } else {
                "Vanilla"
            };
            Ok(DiceAverage {
                label: format!("{kind} {dice}"),
                dice,
                great_weapon_fighting,
                average: die.avg_roll(config.replications, &mut rng),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(rows = rows.len(), "great weapon averages finished");
    Ok(rows)
}

// =============================================================================
// Brutal Critical comparison
// =============================================================================

/// Per-attack damage of one weapon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDamage {
    /// Weapon dice, also the attacker's name
    pub dice: DieSpec,
    /// Damage per attack
    pub stats: ScalarStats,
}

/// One level of [`brutal_critical_comparison`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrutalCriticalRow {
    /// Barbarian level and training monster challenge rating
    pub level: u32,
    /// Training monster armor class
    pub armor_class: i32,
    /// Greatsword first, then greataxe
    pub weapons: Vec<WeaponDamage>,
}

/// Mean damage per reckless (advantage) attack of raging Great Weapon
/// Fighting barbarians wielding a greatsword and a greataxe, against a
/// training monster of matching challenge rating.
///
/// # Errors
///
/// Fails for level 0 or levels above the highest challenge rating.
pub fn brutal_critical_comparison(
    config: &ExperimentConfig,
    armor_class: i32,
    levels: &[u32],
) -> Result<Vec<BrutalCriticalRow>> {
    const LABEL: &str = "brutal_critical_comparison";
    info!(
        replications = config.replications,
        armor_class,
        levels = levels.len(),
        "brutal critical comparison started"
    );

    let rows = levels
        .par_iter()
        .map(|&level| -> Result<BrutalCriticalRow> {
            let mut rng = config.replication_rng(LABEL, level, 0);
            let dummy = Character::monster(
                MonsterConfig::new(TRAINING_MONSTER, level).with_armor_class(armor_class),
                &mut rng,
            )?;
            let template = barbarian_config(level, true)?;

            let weapons = [GREATSWORD, GREATAXE]
                .into_iter()
                .map(|dice| -> Result<WeaponDamage> {
                    let mut setup = template.clone();
                    setup.name = Some(dice.to_string());
                    setup.damage_dice = Some(dice);
                    setup.armor_class = Some(UNARMORED_BASE + setup.constitution_modifier);
                    let barbarian = Character::barbarian(setup, &mut rng)?;
                    let stats = attack_stats(
                        config,
                        &format!("{LABEL}/{dice}"),
                        level,
                        &barbarian,
                        &dummy,
                        RollMode::Advantage,
                    );
                    Ok(WeaponDamage { dice, stats })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(BrutalCriticalRow {
                level,
                armor_class,
                weapons,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(rows = rows.len(), "brutal critical comparison finished");
    Ok(rows)
}

/// Damage of `config.replications` attacks, rolled in [`ATTACK_CHUNK`]-sized
/// chunks on their own streams and merged in chunk order.
fn attack_stats(
    config: &ExperimentConfig,
    label: &str,
    level: u32,
    attacker: &Character,
    target: &Character,
    mode: RollMode,
) -> ScalarStats {
    let chunks: Vec<ScalarStats> = (0..config.replications.div_ceil(ATTACK_CHUNK))
        .into_par_iter()
        .map(|chunk| {
            let rolls = ATTACK_CHUNK.min(config.replications - chunk * ATTACK_CHUNK);
            let mut rng = config.replication_rng(label, level, chunk);
            ScalarStats::from_samples(attacker.attack(target, rolls, mode, &mut rng))
        })
        .collect();
    ScalarStats::merge_many(&chunks)
}

// =============================================================================
// Shield duel
// =============================================================================

/// Replicate a fight between freshly built characters and count outcomes.
///
/// `build` is called once per replication with that replication's stream,
/// so every fight starts from fresh hit point and initiative rolls.
///
/// # Errors
///
/// Returns the first error `build` reports.
pub fn fight_tally<F>(
    config: &ExperimentConfig,
    label: &str,
    level: u32,
    build: F,
) -> Result<Tally<String>>
where
    F: Fn(&mut ChaCha8Rng) -> Result<(Character, Character)> + Sync,
{
    (0..config.replications)
        .into_par_iter()
        .try_fold(Tally::new, |mut tally, replication| -> Result<Tally<String>> {
            let mut rng = config.replication_rng(label, level, replication);
            let (mut first, mut second) = build(&mut rng)?;
            let outcome = fight(&mut first, &mut second, config.rounds, &mut rng);
            tally.record(outcome.label().to_owned());
            Ok(tally)
        })
        .try_reduce(Tally::new, |a, b| Ok(a.merge(b)))
}

/// Outcome counts for one level of [`shield_duel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldDuelRow {
    /// Fighter level and monster challenge rating
    pub level: u32,
    /// Armor class without a shield
    pub armor_class: i32,
    /// Longsword fighter versus shield fighter
    pub duel: Tally<String>,
    /// Longsword fighter versus the monster
    pub longsword_vs_monster: Tally<String>,
    /// Shield fighter versus the monster
    pub shield_vs_monster: Tally<String>,
}

/// Base armor class of the fighters at `level`: `17 + floor(level / 4)`.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn fighter_armor_class(level: u32) -> i32 {
    17 + (level / 4) as i32
}

fn longsword_fighter<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Result<Character> {
    let mut config = fighter_config(level)?;
    config.name = Some(LONGSWORD_FIGHTER.to_owned());
    config.armor_class = Some(fighter_armor_class(level));
    config.damage_dice = Some(LONGSWORD_TWO_HANDED);
    Character::new(config, rng)
}

fn shield_fighter<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Result<Character> {
    let mut config = fighter_config(level)?;
    config.name = Some(SHIELD_FIGHTER.to_owned());
    config.armor_class = Some(fighter_armor_class(level) + SHIELD_BONUS);
    config.damage_dice = Some(LONGSWORD_ONE_HANDED);
    Character::new(config, rng)
}

fn zombie<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Result<Character> {
    Character::monster(MonsterConfig::new(SHIELD_DUEL_MONSTER, level), rng)
}

/// Two-handed longsword against longsword and shield, and each of them
/// against a monster of matching challenge rating.
///
/// # Errors
///
/// Fails for level 0 or levels above the highest challenge rating.
pub fn shield_duel(config: &ExperimentConfig, levels: &[u32]) -> Result<Vec<ShieldDuelRow>> {
    info!(
        replications = config.replications,
        rounds = config.rounds,
        levels = levels.len(),
        "shield duel started"
    );

    let rows = levels
        .iter()
        .map(|&level| -> Result<ShieldDuelRow> {
            let duel = fight_tally(config, "shield_duel/duel", level, |rng| {
                Ok((longsword_fighter(level, rng)?, shield_fighter(level, rng)?))
            })?;
            let longsword_vs_monster =
                fight_tally(config, "shield_duel/longsword", level, |rng| {
                    Ok((longsword_fighter(level, rng)?, zombie(level, rng)?))
                })?;
            let shield_vs_monster = fight_tally(config, "shield_duel/shield", level, |rng| {
                Ok((shield_fighter(level, rng)?, zombie(level, rng)?))
            })?;
            info!(level, duel = ?duel, "shield duel level finished");
            Ok(ShieldDuelRow {
                level,
                armor_class: fighter_armor_class(level),
                duel,
                longsword_vs_monster,
                shield_vs_monster,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(rows = rows.len(), "shield duel finished");
    Ok(rows)
}

// =============================================================================
// Damage profile
// =============================================================================

/// Summary of one attack batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageProfile {
    /// Mean, variance and range of damage per attack
    pub stats: ScalarStats,
    /// How often each damage value came up
    pub distribution: Tally<i64>,
}

/// Roll `rolls` attacks and summarise the damage.
#[allow(clippy::cast_possible_truncation)]
pub fn damage_profile<R: Rng + ?Sized>(
    attacker: &Character,
    target: &Character,
    rolls: usize,
    mode: RollMode,
    rng: &mut R,
) -> DamageProfile {
    let damage = attacker.attack(target, rolls, mode, rng);
    // Dice and bonuses are whole numbers.
    let distribution = damage.iter().map(|&value| value.round() as i64).collect();
    DamageProfile {
        stats: ScalarStats::from_samples(damage),
        distribution,
    }
}
