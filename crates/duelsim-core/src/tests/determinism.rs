//! Determinism checks.
//!
//! A fixed seed must reproduce fights, generated monsters and whole
//! experiments exactly, including when the rayon pool changes size.

use knucklebone::DieSpec;

use crate::character::MonsterStats;
use crate::experiment::{brutal_critical_comparison, shield_duel, ExperimentConfig};
use crate::fight::simulate_fight;

use super::helpers::{fighter, init_tracing, monster, seeded};

fn small_config(seed: u64) -> ExperimentConfig {
    ExperimentConfig {
        replications: 200,
        rounds: 100,
        seed,
    }
}

#[test]
fn fight_reports_reproduce() {
    init_tracing();
    let run = |seed| {
        let mut rng = seeded(seed);
        let mut a = fighter("Ann", 6, 18, DieSpec::single(10), &mut rng);
        let mut b = monster("Zombie", 6, &mut rng);
        (0..50)
            .map(|_| simulate_fight(&mut a, &mut b, 100, &mut rng))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(21), run(21));
}

#[test]
fn monster_stats_reproduce() {
    for cr in [0, 7, 20] {
        let a = MonsterStats::generate(cr, None, &mut seeded(99)).unwrap();
        let b = MonsterStats::generate(cr, None, &mut seeded(99)).unwrap();
        assert_eq!(a, b, "cr {cr}");
    }
}

#[test]
fn different_seeds_diverge() {
    let a = shield_duel(&small_config(1), &[3]).unwrap();
    let b = shield_duel(&small_config(2), &[3]).unwrap();
    assert_ne!(a, b);
}

#[test]
fn experiments_independent_of_thread_count() {
    init_tracing();
    let config = small_config(5);
    let run = |threads: usize| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
            .install(|| {
                (
                    shield_duel(&config, &[2, 10]).unwrap(),
                    brutal_critical_comparison(&config, 20, &[5, 15]).unwrap(),
                )
            })
    };
    assert_eq!(run(1), run(4));
}
