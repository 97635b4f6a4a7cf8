//! Pet construction, species swaps and behaviour-state transitions.
//!
//! A pet is built from a species sheet ([`set_data`]) plus a counter reset
//! ([`reset_variables`]). Evolution reuses the same two steps, so a freshly
//! evolved pet starts its new stage exactly like a freshly hatched one,
//! apart from the lifetime fields (age, weight, lifetime battle record,
//! traits) that carry over.

use rand::Rng;
use tracing::{debug, info, warn};
use vpet_types::{
    CareAccounting, CareTimers, ENEMY_STAGE_SLOTS, Pet, PetState, SaveWindow, SleepSchedule,
    SpeciesData,
};

use crate::config::ModuleConfig;
use crate::sleep::parse_schedule;

/// Frames before the first wander decision, lower bound.
pub const INITIAL_MOVE_TIMER_MIN: u32 = 60;

/// Frames before the first wander decision, upper bound.
pub const INITIAL_MOVE_TIMER_MAX: u32 = 120;

/// Create a pet of `species` belonging to `module`, standing at `x`.
pub fn create_pet(
    module: &ModuleConfig,
    species: &SpeciesData,
    traited: bool,
    x: i32,
    rng: &mut impl Rng,
) -> Pet {
    let mut pet = Pet {
        module: module.name.clone(),
        traited,
        ..Pet::default()
    };
    set_data(&mut pet, species);
    reset_variables(&mut pet, module);
    pet.motion.x = x;
    pet.motion.move_timer = rng.random_range(INITIAL_MOVE_TIMER_MIN..=INITIAL_MOVE_TIMER_MAX);

    info!(
        pet = %pet.id,
        name = pet.name(),
        module = %pet.module,
        stage = pet.stage(),
        traited,
        "Pet created"
    );
    pet
}

/// Write a species sheet into the pet and re-parse its sleep schedule.
///
/// A malformed bedtime is logged here, once, and the schedule is stored as
/// [`SleepSchedule::Invalid`] so that reads treat it as "never sleeps".
pub fn set_data(pet: &mut Pet, species: &SpeciesData) {
    pet.species = species.clone();
    pet.schedule = parse_schedule(species.sleeps.as_deref(), species.wakes.as_deref());
    if pet.schedule == SleepSchedule::Invalid {
        warn!(
            pet = %pet.id,
            name = pet.name(),
            sleeps = ?species.sleeps,
            wakes = ?species.wakes,
            "Unparsable sleep schedule, sleep gating disabled"
        );
    }
}

/// Reset every per-stage counter and apply the module defaults.
///
/// Lifetime fields (age, injuries, lifetime battle record, area, traits)
/// survive. Weight is raised to the new species' minimum and hunger is
/// clamped to the new stomach.
pub fn reset_variables(pet: &mut Pet, module: &ModuleConfig) {
    pet.timer = 0;
    pet.weight = pet.weight.max(pet.species.min_weight);
    pet.dp = pet.species.energy;
    pet.effort = 0;
    pet.sick = 0;
    pet.level = if pet.traited {
        module.traited_egg_starting_level.max(1)
    } else {
        1
    };
    pet.experience = 0;
    pet.record.battles = 0;
    pet.record.win = 0;
    pet.record.enemy_kills = [0; ENEMY_STAGE_SLOTS];
    pet.motion.animation_counter = 0;
    pet.motion.frame_counter = 0;
    pet.motion.frame_index = 0;
    pet.care = CareTimers::default();
    pet.starvation_counter = 0;
    pet.disturbance_penalty = 0;
    pet.overfeed_timer = 0;
    pet.protein_overdose = 0;
    pet.button_save = SaveWindow::Ready;
    pet.shake_save = SaveWindow::Ready;
    pet.egg_shakes = 0;
    pet.overfeed = 0;
    pet.sleep_disturbances = 0;
    pet.mistakes = 0;
    pet.hunger = pet.hunger.min(pet.species.stomach);

    if module.use_condition_hearts {
        pet.accounting = CareAccounting::ConditionHearts;
        pet.condition_hearts = pet.species.condition_hearts;
    } else {
        pet.accounting = CareAccounting::Mistakes;
        pet.condition_hearts = 0;
    }
}

/// Swap the pet into `target` in place and start the new stage.
///
/// The caller resolves `target` from the module first, so this never fails
/// and never leaves the pet half-evolved.
pub fn evolve_to(pet: &mut Pet, module: &ModuleConfig, target: &SpeciesData) {
    let from = pet.species.name.clone();
    set_data(pet, target);
    reset_variables(pet, module);
    set_state(pet, PetState::Happy1, false);
    info!(
        pet = %pet.id,
        from = %from,
        to = pet.name(),
        version = pet.version(),
        stage = pet.stage(),
        "Evolved"
    );
}

/// Move the pet into `state`.
///
/// No-op once the pet is dead. Re-entering the current state only resets
/// the animation when `force` is set. Returns whether a transition happened.
pub fn set_state(pet: &mut Pet, state: PetState, force: bool) -> bool {
    if pet.is_dead() || (pet.state == state && !force) {
        return false;
    }

    let previous = pet.state;
    pet.state = state;
    pet.motion.animation_counter = 0;
    pet.motion.frame_counter = 0;
    pet.motion.frame_index = 0;

    match state {
        PetState::Nap => {
            pet.sleep_started_at = Some(pet.age_timer);
            pet.sleep_timer = 0;
        }
        PetState::Idle => {
            pet.sleep_started_at = None;
            pet.sleep_timer = 0;
        }
        _ => {}
    }

    debug!(pet = %pet.id, name = pet.name(), from = %previous, to = %state, "State changed");
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use vpet_types::EvolutionPath;

    use super::*;

    pub(crate) fn test_module() -> ModuleConfig {
        ModuleConfig {
            name: String::from("DMC"),
            monsters: vec![test_species(), adult_species()],
            ..ModuleConfig::default()
        }
    }

    pub(crate) fn test_species() -> SpeciesData {
        SpeciesData {
            name: String::from("Agumon"),
            stage: 3,
            version: 1,
            attribute: String::from("Va"),
            sleeps: Some(String::from("21:00")),
            wakes: Some(String::from("07:00")),
            atk_main: 3,
            time: 60,
            poop_timer: 60,
            min_weight: 20,
            stomach: 4,
            hunger_loss: 30,
            strength_loss: 30,
            power: 30,
            energy: 10,
            heal_doses: 1,
            condition_hearts: 4,
            evolve: vec![EvolutionPath {
                to: String::from("Greymon"),
                ..EvolutionPath::default()
            }],
            ..SpeciesData::default()
        }
    }

    pub(crate) fn adult_species() -> SpeciesData {
        SpeciesData {
            name: String::from("Greymon"),
            stage: 4,
            version: 1,
            atk_main: 5,
            time: 1440,
            min_weight: 30,
            stomach: 6,
            hunger_loss: 45,
            strength_loss: 45,
            power: 60,
            energy: 14,
            ..SpeciesData::default()
        }
    }

    pub(crate) fn test_pet() -> Pet {
        let mut rng = SmallRng::seed_from_u64(42);
        create_pet(&test_module(), &test_species(), false, 96, &mut rng)
    }

    #[test]
    fn create_applies_species_and_defaults() {
        let pet = test_pet();
        assert_eq!(pet.name(), "Agumon");
        assert_eq!(pet.weight, 20);
        assert_eq!(pet.dp, 10);
        assert_eq!(pet.level, 1);
        assert_eq!(pet.state, PetState::Idle);
        assert_eq!(pet.motion.x, 96);
        assert!((INITIAL_MOVE_TIMER_MIN..=INITIAL_MOVE_TIMER_MAX).contains(&pet.motion.move_timer));
        assert!(matches!(pet.schedule, SleepSchedule::Window { .. }));
    }

    #[test]
    fn traited_pet_starts_at_module_level() {
        let module = ModuleConfig {
            traited_egg_starting_level: 3,
            ..test_module()
        };
        let mut rng = SmallRng::seed_from_u64(1);
        let pet = create_pet(&module, &test_species(), true, 0, &mut rng);
        assert_eq!(pet.level, 3);
    }

    #[test]
    fn hearts_module_selects_heart_accounting() {
        let module = ModuleConfig {
            use_condition_hearts: true,
            ..test_module()
        };
        let mut pet = test_pet();
        reset_variables(&mut pet, &module);
        assert_eq!(pet.accounting, CareAccounting::ConditionHearts);
        assert_eq!(pet.condition_hearts, 4);
    }

    #[test]
    fn bad_schedule_is_marked_invalid() {
        let mut pet = test_pet();
        let species = SpeciesData {
            sleeps: Some(String::from("25:99")),
            ..test_species()
        };
        set_data(&mut pet, &species);
        assert_eq!(pet.schedule, SleepSchedule::Invalid);
    }

    #[test]
    fn evolve_resets_stage_counters_and_keeps_lifetime() {
        let module = test_module();
        let mut pet = test_pet();
        pet.mistakes = 3;
        pet.effort = 12;
        pet.age = 4;
        pet.injuries = 2;
        pet.record.total_battles = 9;
        pet.record.battles = 9;
        pet.timer = 5_000;
        evolve_to(&mut pet, &module, &adult_species());
        assert_eq!(pet.name(), "Greymon");
        assert_eq!(pet.mistakes, 0);
        assert_eq!(pet.effort, 0);
        assert_eq!(pet.timer, 0);
        assert_eq!(pet.record.battles, 0);
        assert_eq!(pet.record.total_battles, 9);
        assert_eq!(pet.age, 4);
        assert_eq!(pet.injuries, 2);
        assert_eq!(pet.weight, 30);
        assert_eq!(pet.state, PetState::Happy1);
    }

    #[test]
    fn set_state_resets_counters_and_stamps_sleep() {
        let mut pet = test_pet();
        pet.age_timer = 777;
        pet.motion.animation_counter = 40;
        assert!(set_state(&mut pet, PetState::Nap, false));
        assert_eq!(pet.motion.animation_counter, 0);
        assert_eq!(pet.sleep_started_at, Some(777));
        assert!(!set_state(&mut pet, PetState::Nap, false));
        assert!(set_state(&mut pet, PetState::Idle, false));
        assert_eq!(pet.sleep_started_at, None);
    }

    #[test]
    fn dead_is_absorbing() {
        let mut pet = test_pet();
        assert!(set_state(&mut pet, PetState::Dead, false));
        assert!(!set_state(&mut pet, PetState::Idle, true));
        assert_eq!(pet.state, PetState::Dead);
    }
}
