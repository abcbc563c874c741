//! # Duelsim Python Bindings
//!
//! PyO3 bindings exposing Duelsim Core to the Python charting scripts.
//!
//! ## Usage
//!
//! ```python
//! import numpy as np
//! from duelsim import _duelsim as ds
//!
//! fighter = ds.Character(
//!     name="Longswordington",
//!     level=5,
//!     ac=18,
//!     strength_modifier=4,
//!     hit_die=(10, 1),
//!     damage_dice=(10, 1),
//!     seed=7,
//! )
//! zombie = ds.Character.monster(name="Zombie", cr=5, seed=8)
//!
//! damage = fighter.attack(zombie, 10_000, advantage=True)
//! print(np.mean(damage))
//!
//! winners = [ds.fight(fighter, zombie) for _ in range(1_000)]
//! print(np.unique(winners, return_counts=True))
//! ```
//!
//! Every call that rolls dice accepts an optional `seed`; without one the
//! stream is seeded from the operating system.

use std::collections::BTreeMap;
use std::fmt;

use duelsim_core::character::{
    roll_mode, BarbarianConfig, Character, CharacterConfig, MonsterConfig,
};
use duelsim_core::experiment::{self, ExperimentConfig};
use duelsim_core::fight::DEFAULT_ROUNDS;
use knucklebone::{DieSpec, Tally};
use numpy::{PyArray1, ToPyArray};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Map any engine error to `ValueError`.
fn value_error(err: impl fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Seeded stream when a seed is given, OS entropy otherwise.
fn rng_from(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// `(sides, count)` tuple, as the scripts write dice.
fn die_spec(dice: Option<(u32, u32)>) -> Option<DieSpec> {
    dice.map(|(sides, count)| DieSpec::new(sides, count))
}

fn tally_dict<K: Ord + Clone>(tally: &Tally<K>) -> BTreeMap<K, u64> {
    tally.iter().map(|(key, count)| (key.clone(), count)).collect()
}

// =============================================================================
// Character
// =============================================================================

/// Character wrapper for Python.
#[pyclass(name = "Character")]
pub struct PyCharacter {
    inner: Character,
}

#[pymethods]
impl PyCharacter {
    /// Create an ordinary character.
    #[new]
    #[pyo3(signature = (
        name=None,
        level=1,
        ac=None,
        strength_modifier=0,
        constitution_modifier=0,
        hit_die=None,
        damage_dice=None,
        initiative_bonus=0,
        seed=None,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        name: Option<String>,
        level: u32,
        ac: Option<i32>,
        strength_modifier: i32,
        constitution_modifier: i32,
        hit_die: Option<(u32, u32)>,
        damage_dice: Option<(u32, u32)>,
        initiative_bonus: i32,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let config = CharacterConfig {
            name,
            level,
            armor_class: ac,
            strength_modifier,
            constitution_modifier,
            hit_die: die_spec(hit_die),
            damage_dice: die_spec(damage_dice),
            initiative_bonus,
        };
        let inner = Character::new(config, &mut rng_from(seed)).map_err(value_error)?;
        Ok(Self { inner })
    }

    /// Create a raging barbarian.
    #[staticmethod]
    #[pyo3(signature = (
        name=None,
        level=1,
        ac=None,
        strength_modifier=0,
        constitution_modifier=0,
        damage_dice=None,
        initiative_bonus=0,
        great_weapon_fighting=false,
        seed=None,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn barbarian(
        name: Option<String>,
        level: u32,
        ac: Option<i32>,
        strength_modifier: i32,
        constitution_modifier: i32,
        damage_dice: Option<(u32, u32)>,
        initiative_bonus: i32,
        great_weapon_fighting: bool,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let config = BarbarianConfig {
            name,
            level,
            armor_class: ac,
            strength_modifier,
            constitution_modifier,
            damage_dice: die_spec(damage_dice),
            initiative_bonus,
            great_weapon_fighting,
        };
        let inner = Character::barbarian(config, &mut rng_from(seed)).map_err(value_error)?;
        Ok(Self { inner })
    }

    /// Generate a monster from its challenge rating.
    #[staticmethod]
    #[pyo3(signature = (name=None, cr=0, ac=None, seed=None))]
    fn monster(
        name: Option<String>,
        cr: u32,
        ac: Option<i32>,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let mut config = MonsterConfig {
            challenge_rating: cr,
            armor_class: ac,
            ..MonsterConfig::default()
        };
        if let Some(name) = name {
            config.name = name;
        }
        let inner = Character::monster(config, &mut rng_from(seed)).map_err(value_error)?;
        Ok(Self { inner })
    }

    /// Build from a JSON configuration.
    ///
    /// `kind` is one of `character`, `barbarian` or `monster`.
    #[staticmethod]
    #[pyo3(signature = (kind, config, seed=None))]
    fn from_json(kind: &str, config: &str, seed: Option<u64>) -> PyResult<Self> {
        let mut rng = rng_from(seed);
        let inner = match kind.to_lowercase().as_str() {
            "character" => {
                let config: CharacterConfig = serde_json::from_str(config).map_err(value_error)?;
                Character::new(config, &mut rng)
            }
            "barbarian" => {
                let config: BarbarianConfig = serde_json::from_str(config).map_err(value_error)?;
                Character::barbarian(config, &mut rng)
            }
            "monster" => {
                let config: MonsterConfig = serde_json::from_str(config).map_err(value_error)?;
                Character::monster(config, &mut rng)
            }
            other => return Err(value_error(format!("unknown character kind: {other}"))),
        }
        .map_err(value_error)?;
        Ok(Self { inner })
    }

    /// Display name.
    #[getter]
    fn name(&self) -> &str {
        self.inner.name()
    }

    /// Hit points.
    #[getter]
    fn hp(&self) -> i32 {
        self.inner.hit_points()
    }

    /// Armor class.
    #[getter]
    fn ac(&self) -> i32 {
        self.inner.armor_class()
    }

    /// Level (challenge rating for monsters).
    #[getter]
    fn level(&self) -> u32 {
        self.inner.level()
    }

    /// Current initiative.
    #[getter]
    fn initiative(&self) -> i32 {
        self.inner.initiative()
    }

    /// Strength plus proficiency.
    #[getter]
    fn hit_bonus(&self) -> i32 {
        self.inner.hit_bonus()
    }

    /// Flat damage per damage-dice multiple.
    #[getter]
    fn damage_bonus(&self) -> i32 {
        self.inner.damage_bonus()
    }

    /// `Character`, `Barbarian` or `Monster`.
    #[getter]
    fn kind(&self) -> String {
        self.inner.kind().to_string()
    }

    /// Roll `rolls` attacks against `target` and return the damage of each.
    #[pyo3(signature = (target, rolls, advantage=false, disadvantage=false, seed=None))]
    fn attack<'py>(
        &self,
        py: Python<'py>,
        target: PyRef<'_, PyCharacter>,
        rolls: usize,
        advantage: bool,
        disadvantage: bool,
        seed: Option<u64>,
    ) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let mode = roll_mode(advantage, disadvantage).map_err(value_error)?;
        let damage = self
            .inner
            .attack(&target.inner, rolls, mode, &mut rng_from(seed));
        Ok(damage.to_pyarray(py))
    }

    /// Re-roll initiative.
    #[pyo3(signature = (seed=None))]
    fn roll_initiative(&mut self, seed: Option<u64>) {
        self.inner.roll_initiative(&mut rng_from(seed));
    }

    /// Multi-line stat summary.
    fn stat_block(&self) -> String {
        self.inner.stat_block()
    }

    fn __str__(&self) -> String {
        self.inner.stat_block()
    }

    fn __repr__(&self) -> String {
        format!(
            "Character(name={:?}, kind={}, level={}, hp={}, ac={})",
            self.inner.name(),
            self.inner.kind(),
            self.inner.level(),
            self.inner.hit_points(),
            self.inner.armor_class()
        )
    }
}

// =============================================================================
// Fights and experiments
// =============================================================================

/// Fight two characters; returns the winner's name or `"Tie"`.
///
/// Initiative changes from the tie-break are written back to both
/// characters.
#[pyfunction]
#[pyo3(signature = (a, b, rounds=DEFAULT_ROUNDS, seed=None))]
fn fight(
    a: &Bound<'_, PyCharacter>,
    b: &Bound<'_, PyCharacter>,
    rounds: usize,
    seed: Option<u64>,
) -> String {
    let mut first = a.borrow().inner.clone();
    let mut second = b.borrow().inner.clone();
    let outcome = duelsim_core::fight(&mut first, &mut second, rounds, &mut rng_from(seed));
    a.borrow_mut().inner = first;
    b.borrow_mut().inner = second;
    outcome.label().to_owned()
}

/// Average roll per weapon label, with and without Great Weapon Fighting.
#[pyfunction]
#[pyo3(signature = (replications=experiment::DEFAULT_REPLICATIONS, seed=0))]
fn great_weapon_averages(
    py: Python<'_>,
    replications: usize,
    seed: u64,
) -> PyResult<Vec<(String, f64)>> {
    let config = ExperimentConfig {
        replications,
        seed,
        ..ExperimentConfig::default()
    };
    let rows = py
        .allow_threads(|| experiment::great_weapon_averages(&config))
        .map_err(value_error)?;
    Ok(rows.into_iter().map(|row| (row.label, row.average)).collect())
}

/// `{level: {weapon: mean damage}}` for reckless GWF barbarians.
#[pyfunction]
#[pyo3(signature = (ac, levels, replications=experiment::DEFAULT_REPLICATIONS, seed=0))]
fn brutal_critical_comparison(
    py: Python<'_>,
    ac: i32,
    levels: Vec<u32>,
    replications: usize,
    seed: u64,
) -> PyResult<BTreeMap<u32, BTreeMap<String, f64>>> {
    let config = ExperimentConfig {
        replications,
        seed,
        ..ExperimentConfig::default()
    };
    let rows = py
        .allow_threads(|| experiment::brutal_critical_comparison(&config, ac, &levels))
        .map_err(value_error)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let means = row
                .weapons
                .iter()
                .map(|weapon| (weapon.dice.to_string(), weapon.stats.mean))
                .collect();
            (row.level, means)
        })
        .collect())
}

/// Outcome counts per level for the duel and both monster fights.
type ShieldDuelCounts = (
    BTreeMap<String, u64>,
    BTreeMap<String, u64>,
    BTreeMap<String, u64>,
);

/// `{level: (duel, longsword_vs_monster, shield_vs_monster)}` outcome counts.
#[pyfunction]
#[pyo3(signature = (
    levels,
    replications=experiment::DEFAULT_REPLICATIONS,
    rounds=DEFAULT_ROUNDS,
    seed=0,
))]
fn shield_duel(
    py: Python<'_>,
    levels: Vec<u32>,
    replications: usize,
    rounds: usize,
    seed: u64,
) -> PyResult<BTreeMap<u32, ShieldDuelCounts>> {
    let config = ExperimentConfig {
        replications,
        rounds,
        seed,
    };
    let rows = py
        .allow_threads(|| experiment::shield_duel(&config, &levels))
        .map_err(value_error)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            (
                row.level,
                (
                    tally_dict(&row.duel),
                    tally_dict(&row.longsword_vs_monster),
                    tally_dict(&row.shield_vs_monster),
                ),
            )
        })
        .collect())
}

/// `(mean, std_dev, {damage: count})` for one attack batch.
#[pyfunction]
#[pyo3(signature = (attacker, target, rolls, advantage=false, disadvantage=false, seed=None))]
fn damage_profile(
    attacker: PyRef<'_, PyCharacter>,
    target: PyRef<'_, PyCharacter>,
    rolls: usize,
    advantage: bool,
    disadvantage: bool,
    seed: Option<u64>,
) -> PyResult<(f64, f64, BTreeMap<i64, u64>)> {
    let mode = roll_mode(advantage, disadvantage).map_err(value_error)?;
    let profile = experiment::damage_profile(
        &attacker.inner,
        &target.inner,
        rolls,
        mode,
        &mut rng_from(seed),
    );
    Ok((
        profile.stats.mean,
        profile.stats.std_dev(),
        tally_dict(&profile.distribution),
    ))
}

/// Python module definition.
#[pymodule]
fn _duelsim(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyCharacter>()?;
    m.add_function(wrap_pyfunction!(fight, m)?)?;
    m.add_function(wrap_pyfunction!(great_weapon_averages, m)?)?;
    m.add_function(wrap_pyfunction!(brutal_critical_comparison, m)?)?;
    m.add_function(wrap_pyfunction!(shield_duel, m)?)?;
    m.add_function(wrap_pyfunction!(damage_profile, m)?)?;
    m.add("TIE", duelsim_core::fight::TIE_LABEL)?;
    Ok(())
}
