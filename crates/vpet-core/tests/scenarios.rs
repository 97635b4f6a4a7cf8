//! End-to-end lifecycle scenarios driven through the frame driver and the
//! action layer.
//!
//! Each scenario builds a small module in code, hatches a pet and runs whole
//! simulated minutes, checking the observable outcome (state, counters,
//! sounds, scene changes) rather than intermediate timers.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use vpet_core::actions;
use vpet_core::{RecordingEffects, SimulationConfig, SimulationState, run_tick};
use vpet_lifecycle::ModuleConfig;
use vpet_lifecycle::death::kill;
use vpet_types::{FoodKind, PetId, PetState, Ruleset, SaveWindow, Scene, SoundCue, SpeciesData};

fn baby() -> SpeciesData {
    SpeciesData {
        name: String::from("Koromon"),
        stage: 1,
        version: 1,
        time: 600,
        stomach: 4,
        hunger_loss: 3,
        strength_loss: 3,
        energy: 4,
        condition_hearts: 1,
        ..SpeciesData::default()
    }
}

fn adult() -> SpeciesData {
    SpeciesData {
        name: String::from("Greymon"),
        stage: 6,
        version: 1,
        stomach: 6,
        hunger_loss: 60,
        strength_loss: 60,
        energy: 10,
        ..SpeciesData::default()
    }
}

fn config(name: &str, tune: impl FnOnce(&mut ModuleConfig)) -> SimulationConfig {
    let mut module = ModuleConfig {
        name: name.to_owned(),
        monsters: vec![baby(), adult()],
        ..ModuleConfig::default()
    };
    tune(&mut module);
    let mut config = SimulationConfig {
        modules: vec![module],
        ..SimulationConfig::default()
    };
    config.simulation.dead_removal_ticks = 30;
    config
}

fn run(state: &mut SimulationState, fx: &mut RecordingEffects, frames: u64) {
    for _ in 0..frames {
        let now = state.now();
        run_tick(state, fx, now);
    }
}

fn run_minutes(state: &mut SimulationState, fx: &mut RecordingEffects, minutes: u32) {
    let frames = state.cadence().minutes(minutes);
    run(state, fx, frames);
}

fn pet_state(state: &SimulationState, id: PetId) -> PetState {
    state.roster.pet(id).unwrap().state
}

#[test]
fn overfed_pet_refuses_until_timer_runs_out() {
    let mut state = SimulationState::new(&config("DMC", |_| {})).unwrap();
    let id = state.hatch("DMC", "Koromon", 1).unwrap();
    let mut fx = RecordingEffects::new();

    assert!(actions::feed(&mut state, id, FoodKind::Hunger, 4).unwrap());
    assert!(!actions::feed(&mut state, id, FoodKind::Hunger, 1).unwrap());
    assert!(!actions::feed(&mut state, id, FoodKind::Hunger, 1).unwrap());
    let pet = state.roster.pet(id).unwrap();
    assert_eq!(pet.overfeed, 1);
    assert_eq!(pet.hunger, 4);

    // Hunger does not decay while the overfeed timer runs.
    let minutes = state.catalog.get("DMC").unwrap().overfeed_timer;
    run_minutes(&mut state, &mut fx, minutes);
    let pet = state.roster.pet(id).unwrap();
    assert_eq!(pet.overfeed_timer, 0);
    assert_eq!(pet.hunger, 4);

    assert!(!actions::feed(&mut state, id, FoodKind::Hunger, 1).unwrap());
    assert_eq!(state.roster.pet(id).unwrap().overfeed, 2);
}

#[test]
fn care_mistakes_kill_and_pet_is_removed() {
    let cfg = config("DMC", |m| {
        m.death_care_mistake = 1;
        m.meat_care_mistake_time = 1;
    });
    let mut state = SimulationState::new(&cfg).unwrap();
    let id = state.hatch("DMC", "Koromon", 1).unwrap();
    let mut fx = RecordingEffects::new();

    run_minutes(&mut state, &mut fx, 1);
    assert_eq!(pet_state(&state, id), PetState::Dead);
    assert_eq!(fx.count(SoundCue::Death), 1);
    assert_eq!(fx.count(SoundCue::Alarm), 1);

    // Dead pets ignore every action.
    assert!(!actions::feed(&mut state, id, FoodKind::Hunger, 1).unwrap());
    assert!(!actions::heal(&mut state, id).unwrap());
    assert!(!actions::press_save_button(&mut state, id).unwrap());
    assert_eq!(pet_state(&state, id), PetState::Dead);

    run(&mut state, &mut fx, 31);
    assert!(state.roster.is_empty());
    assert_eq!(fx.scenes, vec![Scene::Egg]);
}

#[test]
fn condition_hearts_floor_at_zero() {
    let cfg = config("DMC", |m| {
        m.use_condition_hearts = true;
        m.meat_care_mistake_time = 1;
        m.protein_care_mistake_time = 1;
    });
    let mut state = SimulationState::new(&cfg).unwrap();
    let id = state.hatch("DMC", "Koromon", 1).unwrap();
    assert_eq!(state.roster.pet(id).unwrap().condition_hearts, 1);
    let mut fx = RecordingEffects::new();

    // Two mistakes in the same minute against a single heart.
    run_minutes(&mut state, &mut fx, 1);
    let pet = state.roster.pet(id).unwrap();
    assert_eq!(pet.condition_hearts, 0);
    assert_eq!(pet.mistakes, 0);
    assert!(!pet.is_dead());
    assert_eq!(fx.count(SoundCue::Alarm), 1);
}

fn doomed_state() -> (SimulationState, PetId) {
    let cfg = config("DMC", |m| {
        m.death_care_mistake = 1;
        m.death_save_by_b_press = true;
    });
    let mut state = SimulationState::new(&cfg).unwrap();
    let id = state.hatch("DMC", "Koromon", 1).unwrap();
    let pet = state.roster.pet_mut(id).unwrap();
    pet.hunger = 4;
    pet.strength = 4;
    pet.mistakes = 1;
    (state, id)
}

#[test]
fn unanswered_save_window_expires_once() {
    let (mut state, id) = doomed_state();
    let mut fx = RecordingEffects::new();

    run_minutes(&mut state, &mut fx, 1);
    assert!(state.roster.pet(id).unwrap().button_save.is_armed());

    run_minutes(&mut state, &mut fx, 1);
    let pet = state.roster.pet(id).unwrap();
    assert!(pet.is_dead());
    assert_eq!(pet.button_save, SaveWindow::Spent);
    assert_eq!(fx.count(SoundCue::Death), 1);
}

#[test]
fn answered_save_window_holds_death_off() {
    let (mut state, id) = doomed_state();
    let mut fx = RecordingEffects::new();

    run_minutes(&mut state, &mut fx, 1);
    run(&mut state, &mut fx, 10);
    assert!(actions::press_save_button(&mut state, id).unwrap());
    assert!(!actions::press_save_button(&mut state, id).unwrap());

    run_minutes(&mut state, &mut fx, 1);
    assert!(!state.roster.pet(id).unwrap().is_dead());
    assert_eq!(fx.count(SoundCue::Death), 0);
}

#[test]
fn removed_adult_leaves_traited_egg() {
    let cfg = config("PenC", |m| m.ruleset = Ruleset::Penc);
    let mut state = SimulationState::new(&cfg).unwrap();
    let id = state.hatch("PenC", "Greymon", 1).unwrap();
    let mature = state.cadence().hours(48);
    {
        let pet = state.roster.pet_mut(id).unwrap();
        pet.age_timer = mature;
        pet.record.battles = 10;
        pet.record.win = 7;
        kill(pet, &[]);
    }
    let mut fx = RecordingEffects::new();

    run(&mut state, &mut fx, 30);
    assert_eq!(state.roster.pets.len(), 1);
    let now = state.now();
    let summary = run_tick(&mut state, &mut fx, now);
    assert_eq!(summary.removed, 1);
    assert_eq!(summary.traited_eggs, 1);
    assert!(state.roster.has_traited_egg("PenC@1"));

    let next = state.hatch("PenC", "Koromon", 1).unwrap();
    assert!(state.roster.pet(next).unwrap().traited);
    assert!(!state.roster.has_traited_egg("PenC@1"));
}

#[test]
fn losing_record_earns_no_traited_egg() {
    let cfg = config("PenC", |m| m.ruleset = Ruleset::Penc);
    let mut state = SimulationState::new(&cfg).unwrap();
    let id = state.hatch("PenC", "Greymon", 1).unwrap();
    let mature = state.cadence().hours(48);
    {
        let pet = state.roster.pet_mut(id).unwrap();
        pet.age_timer = mature;
        pet.record.battles = 10;
        pet.record.win = 3;
        kill(pet, &[]);
    }
    let mut fx = RecordingEffects::new();

    run(&mut state, &mut fx, 31);
    assert!(state.roster.is_empty());
    assert!(state.roster.traited_eggs.is_empty());
}

#[test]
fn cleaning_cheers_awake_pets() {
    let mut state = SimulationState::new(&config("DMC", |_| {})).unwrap();
    let id = state.hatch("DMC", "Koromon", 1).unwrap();
    let mut fx = RecordingEffects::new();

    assert!(actions::force_defecate(&mut state, id).unwrap());
    // The pooping script drops the mess once its animation completes.
    run(&mut state, &mut fx, 60);
    assert_eq!(state.roster.messes.len(), 1);

    assert_eq!(actions::clean_messes(&mut state, &mut fx), 1);
    assert!(state.roster.messes.is_empty());
    assert_eq!(pet_state(&state, id), PetState::Happy1);
    assert_eq!(actions::clean_messes(&mut state, &mut fx), 0);
}
