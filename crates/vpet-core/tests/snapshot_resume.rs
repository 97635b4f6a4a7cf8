//! Resuming from a snapshot must continue the simulation exactly.
//!
//! A simulation runs for a while, is captured, serialized and restored into
//! a fresh state sharing the same random source. Both copies then run the
//! same number of frames and must end with identical rosters.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use vpet_core::actions;
use vpet_core::{NoopEffects, SimulationConfig, SimulationState, Snapshot, run_tick};
use vpet_types::FoodKind;

fn run(state: &mut SimulationState, frames: u64) {
    for _ in 0..frames {
        let now = state.now();
        run_tick(state, &mut NoopEffects, now);
    }
}

fn config() -> SimulationConfig {
    SimulationConfig::parse(include_str!("../../../vpet-config.yaml")).unwrap()
}

#[test]
fn restored_state_continues_identically() {
    let config = config();
    let mut original = SimulationState::new(&config).unwrap();
    let starter = config.starter.clone().unwrap();
    let id = original
        .hatch(&starter.module, &starter.species, starter.version)
        .unwrap();

    let minutes = original.cadence().minutes(30);
    run(&mut original, minutes);
    actions::feed(&mut original, id, FoodKind::Hunger, 2).unwrap();
    actions::feed(&mut original, id, FoodKind::Strength, 1).unwrap();
    run(&mut original, 777);

    let json = Snapshot::capture(&original).to_json().unwrap();
    let mut resumed = SimulationState::new(&config).unwrap();
    resumed.rng = original.rng.clone();
    Snapshot::from_json(&json).unwrap().restore(&mut resumed).unwrap();
    assert_eq!(resumed.roster, original.roster);
    assert_eq!(resumed.now(), original.now());

    let more = original.cadence().minutes(90);
    run(&mut original, more);
    run(&mut resumed, more);
    assert_eq!(resumed.clock.tick(), original.clock.tick());
    assert_eq!(resumed.roster.pets, original.roster.pets);
    assert_eq!(resumed.roster.unlocks, original.roster.unlocks);
    // New messes get fresh ids; placement and size must still agree.
    assert_eq!(mess_layout(&resumed), mess_layout(&original));
}

fn mess_layout(state: &SimulationState) -> Vec<(i32, bool)> {
    state.roster.messes.iter().map(|m| (m.x, m.large)).collect()
}

#[test]
fn sample_config_hatches_and_evolves_the_starter() {
    let config = config();
    let mut state = SimulationState::new(&config).unwrap();
    let starter = config.starter.clone().unwrap();
    let id = state
        .hatch(&starter.module, &starter.species, starter.version)
        .unwrap();
    assert_eq!(state.roster.pet(id).unwrap().stage(), 0);

    let frames = state.cadence().minutes(11);
    run(&mut state, frames);
    assert_eq!(state.roster.pet(id).unwrap().stage(), 1);
}
