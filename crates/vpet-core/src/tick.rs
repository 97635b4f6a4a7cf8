//! The frame driver: one call to [`run_tick`] advances every pet by one
//! frame.
//!
//! Each frame runs in this order:
//!
//! 1. **Clock** -- advance the frame counter.
//! 2. **Pets** -- for each pet in roster order: timers, save-window
//!    countdown, animation, state dispatch (wandering, sleeping, pooping),
//!    then the daily and once-per-minute checks.
//! 3. **Alarm** -- at most one alarm cue for the whole frame.
//! 4. **Removal** -- dead pets past the removal delay leave the roster and
//!    may leave a traited egg behind. An emptied roster returns to the egg
//!    scene.
//!
//! Pets are processed sequentially, so a mess dropped by one pet already
//! counts towards the overflow check of the next. A frame never fails:
//! problems are logged and the remaining pets are still processed.

use chrono::NaiveDateTime;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, warn};
use vpet_lifecycle::cadence::is_multiple;
use vpet_lifecycle::care::update_care_mistakes;
use vpet_lifecycle::death::{countdown_saves, is_ready_for_removal, update_death_check};
use vpet_lifecycle::hygiene::{defecate, pooping_step, update_pooping};
use vpet_lifecycle::needs::update_needs;
use vpet_lifecycle::pet::{create_pet, set_state};
use vpet_lifecycle::sleep::{check_wake_up, should_sleep, tick_back_to_sleep};
use vpet_lifecycle::{
    Cadence, InMemoryUnlocks, ModuleCatalog, PetError, qualifies_for_traited_egg,
    traited_egg_key, update_evolution,
};
use vpet_types::{Mess, Pet, PetId, PetState, Scene, SoundCue};

use crate::animation::{update_animation, wander};
use crate::clock::{ClockError, SimClock};
use crate::config::{ArenaConfig, SimulationConfig, SimulationSettings};
use crate::effects::{DigidexEntry, Effects};
use crate::roster::Roster;

/// Summary of one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Tick number that just ran.
    pub tick: u64,
    /// Pets alive after the frame.
    pub live_pets: usize,
    /// Dead pets still on the roster after the frame.
    pub dead_pets: usize,
    /// Messes on the field after the frame.
    pub messes: usize,
    /// Pets that evolved.
    pub evolutions: usize,
    /// Pets that died.
    pub deaths: usize,
    /// Dead pets removed from the roster.
    pub removed: usize,
    /// Traited eggs granted by removed pets.
    pub traited_eggs: usize,
    /// Whether the alarm cue sounded.
    pub alarm: bool,
}

/// Complete simulation state owned by the driver.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Frame counter and simulated time.
    pub clock: SimClock,
    /// Simulation settings.
    pub settings: SimulationSettings,
    /// Play-field geometry.
    pub arena: ArenaConfig,
    /// Loaded modules.
    pub catalog: ModuleCatalog,
    /// Pets and shared field state.
    pub roster: Roster,
    /// Random source for every roll in the simulation.
    pub rng: SmallRng,
}

impl SimulationState {
    /// Build an empty simulation from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] for a zero frame rate.
    pub fn new(config: &SimulationConfig) -> Result<Self, ClockError> {
        let settings = config.simulation.clone();
        let clock = SimClock::new(settings.ticks_per_second, settings.start_time)?;
        Ok(Self {
            clock,
            rng: SmallRng::seed_from_u64(settings.seed),
            settings,
            arena: config.arena,
            catalog: config.catalog(),
            roster: Roster::new(),
        })
    }

    /// Frame-rate arithmetic for this simulation.
    pub const fn cadence(&self) -> Cadence {
        self.clock.cadence()
    }

    /// Wall-clock time for the next frame: the local time in real-time mode,
    /// the simulated clock otherwise.
    pub fn now(&self) -> NaiveDateTime {
        if self.settings.realtime {
            chrono::Local::now().naive_local()
        } else {
            self.clock.now()
        }
    }

    /// Hatch a new pet of `species` in the middle of the arena.
    ///
    /// A traited egg earned for the species' module version is consumed and
    /// makes the new pet traited.
    ///
    /// # Errors
    ///
    /// Returns [`PetError::UnknownModule`] or [`PetError::UnknownSpecies`]
    /// when the species is not loaded.
    pub fn hatch(&mut self, module: &str, species: &str, version: u32) -> Result<PetId, PetError> {
        let module = self.catalog.get(module)?;
        let sheet = module.require_monster(species, version)?;
        let traited = self
            .roster
            .take_traited_egg(&format!("{}@{version}", module.name));
        let pet = create_pet(module, sheet, traited, self.arena.center_x(), &mut self.rng);
        Ok(self.roster.add_pet(pet))
    }
}

/// Per-frame values shared by every pet.
struct Frame<'a> {
    cadence: Cadence,
    settings: &'a SimulationSettings,
    arena: ArenaConfig,
    catalog: &'a ModuleCatalog,
    now: NaiveDateTime,
    live_pets: usize,
}

/// Shared state one pet may mutate during its frame.
struct Field<'a> {
    messes: &'a mut Vec<Mess>,
    unlocks: &'a mut InMemoryUnlocks,
    rng: &'a mut SmallRng,
}

/// What happened to one pet during its frame.
#[derive(Debug, Clone, Copy, Default)]
struct PetFrame {
    evolved: bool,
    died: bool,
    alarm: bool,
}

/// Run one frame.
///
/// `now` is the wall-clock time used for bedtime and wake-up checks; see
/// [`SimulationState::now`].
pub fn run_tick(
    state: &mut SimulationState,
    effects: &mut dyn Effects,
    now: NaiveDateTime,
) -> TickSummary {
    let SimulationState {
        clock,
        settings,
        arena,
        catalog,
        roster,
        rng,
    } = state;

    let mut summary = TickSummary::default();
    match clock.advance() {
        Ok(tick) => summary.tick = tick,
        Err(e) => {
            warn!(error = %e, "Clock stopped, frame skipped");
            summary.tick = clock.tick();
            return fill_counts(summary, roster);
        }
    }

    let frame = Frame {
        cadence: clock.cadence(),
        settings: &*settings,
        arena: *arena,
        catalog: &*catalog,
        now,
        live_pets: roster.live_count(),
    };
    let Roster {
        pets,
        messes,
        unlocks,
        ..
    } = &mut *roster;
    let mut field = Field {
        messes,
        unlocks,
        rng: &mut *rng,
    };

    for pet in pets.iter_mut() {
        let outcome = advance_pet(pet, &frame, &mut field, effects);
        if outcome.evolved {
            summary.evolutions = summary.evolutions.saturating_add(1);
        }
        if outcome.died {
            summary.deaths = summary.deaths.saturating_add(1);
        }
        summary.alarm |= outcome.alarm;
    }

    if summary.alarm {
        effects.play(SoundCue::Alarm);
    }

    remove_dead(roster, &frame, rng, effects, &mut summary);
    fill_counts(summary, roster)
}

fn fill_counts(mut summary: TickSummary, roster: &Roster) -> TickSummary {
    summary.live_pets = roster.live_count();
    summary.dead_pets = roster.dead_count();
    summary.messes = roster.messes.len();
    summary
}

fn advance_pet(
    pet: &mut Pet,
    frame: &Frame<'_>,
    field: &mut Field<'_>,
    effects: &mut dyn Effects,
) -> PetFrame {
    let mut out = PetFrame::default();
    let cadence = frame.cadence;

    if pet.is_dead() {
        pet.timer = pet.timer.saturating_add(1);
        return out;
    }

    pet.timer = pet.timer.saturating_add(1);
    pet.age_timer = pet.age_timer.saturating_add(1);
    countdown_saves(pet);
    update_animation(pet, cadence);

    let bedtime = should_sleep(pet, frame.now.time());
    match pet.state {
        PetState::Idle | PetState::Moving => {
            if bedtime && is_multiple(pet.timer, u64::from(cadence.fraction(2))) {
                set_state(pet, PetState::Tired, false);
            }
            wander(
                pet,
                cadence,
                frame.arena,
                frame.settings.idle_probability,
                bedtime,
                field.rng,
            );
        }
        PetState::Nap => {
            pet.sleep_timer = pet.sleep_timer.saturating_add(1);
            check_wake_up(pet, cadence, frame.settings.sleep_recovery_hours, frame.now.time());
        }
        PetState::Pooping => {
            if pooping_step(pet, cadence) {
                let mess = defecate(pet, field.rng);
                field.messes.push(mess);
                effects.play(SoundCue::Cancel);
            }
        }
        _ => {}
    }

    if cadence.on_day(pet.age_timer) {
        pet.age = pet.age.saturating_add(1);
        info!(pet = %pet.id, name = pet.name(), age = pet.age, "Aged a day");
    }

    if cadence.on_minute(pet.timer) {
        minute_checks(pet, frame, field, effects, bedtime, &mut out);
    }
    out
}

fn minute_checks(
    pet: &mut Pet,
    frame: &Frame<'_>,
    field: &mut Field<'_>,
    effects: &mut dyn Effects,
    bedtime: bool,
    out: &mut PetFrame,
) {
    let cadence = frame.cadence;
    let module = match frame.catalog.get(&pet.module) {
        Ok(module) => module,
        Err(e) => {
            warn!(pet = %pet.id, error = %e, "Minute checks skipped");
            return;
        }
    };

    if !matches!(pet.state, PetState::Nap | PetState::Dead) {
        if let Some(evolution) = update_evolution(pet, module, field.unlocks, cadence, bedtime) {
            effects.play(SoundCue::Evolution);
            effects.register_digidex(&DigidexEntry {
                name: evolution.to,
                module: module.name.clone(),
                version: evolution.version,
            });
            out.evolved = true;
        }
        update_needs(pet, cadence);
        update_pooping(
            pet,
            cadence,
            field.messes.len(),
            frame.live_pets,
            frame.settings.mess_per_pet_limit,
        );
        out.alarm = update_care_mistakes(pet, module, bedtime).alarm();
    }

    if pet.state != PetState::Nap && update_death_check(pet, module, cadence).is_some() {
        effects.play(SoundCue::Death);
        out.died = true;
    }

    tick_back_to_sleep(pet, bedtime);
}

fn remove_dead(
    roster: &mut Roster,
    frame: &Frame<'_>,
    rng: &mut SmallRng,
    effects: &mut dyn Effects,
    summary: &mut TickSummary,
) {
    let removal_ticks = frame.settings.dead_removal_ticks;
    if !roster.pets.iter().any(|p| is_ready_for_removal(p, removal_ticks)) {
        return;
    }

    let (removed, kept): (Vec<Pet>, Vec<Pet>) = std::mem::take(&mut roster.pets)
        .into_iter()
        .partition(|p| is_ready_for_removal(p, removal_ticks));
    roster.pets = kept;

    for pet in &removed {
        info!(pet = %pet.id, name = pet.name(), "Removed from roster");
        let ruleset = match frame.catalog.get(&pet.module) {
            Ok(module) => module.ruleset,
            Err(e) => {
                warn!(pet = %pet.id, error = %e, "Traited egg check skipped");
                continue;
            }
        };
        if qualifies_for_traited_egg(pet, ruleset, frame.cadence, rng)
            && roster.grant_traited_egg(&traited_egg_key(pet))
        {
            summary.traited_eggs = summary.traited_eggs.saturating_add(1);
        }
    }
    summary.removed = removed.len();

    if roster.pets.is_empty() {
        debug!("Roster empty, back to egg selection");
        effects.change_scene(Scene::Egg);
    }
}
