//! Bedtime schedule, waking and sleep disturbance.
//!
//! Schedules are parsed once into [`SleepSchedule`] when species data is
//! written. Reads never re-parse: an invalid schedule simply never asks the
//! pet to sleep.

use chrono::{NaiveTime, Timelike};
use tracing::{debug, info};
use vpet_types::{Pet, PetState, SleepSchedule};

use crate::cadence::Cadence;
use crate::config::ModuleConfig;
use crate::pet::set_state;

/// Format of the bedtime strings in species sheets.
const SCHEDULE_FORMAT: &str = "%H:%M";

/// Parse the `HH:MM` bedtime and wake-up strings of a species sheet.
///
/// Missing or blank strings mean the species has no schedule.
pub fn parse_schedule(sleeps: Option<&str>, wakes: Option<&str>) -> SleepSchedule {
    let (Some(sleeps), Some(wakes)) = (sleeps.map(str::trim), wakes.map(str::trim)) else {
        return SleepSchedule::Unscheduled;
    };
    if sleeps.is_empty() || wakes.is_empty() {
        return SleepSchedule::Unscheduled;
    }

    match (
        NaiveTime::parse_from_str(sleeps, SCHEDULE_FORMAT),
        NaiveTime::parse_from_str(wakes, SCHEDULE_FORMAT),
    ) {
        (Ok(sleep), Ok(wake)) => SleepSchedule::Window { sleep, wake },
        _ => SleepSchedule::Invalid,
    }
}

/// Whether `now` falls inside the schedule's sleep window.
///
/// Windows that cross midnight (bedtime later than wake-up) wrap around.
pub fn is_bedtime(schedule: SleepSchedule, now: NaiveTime) -> bool {
    match schedule {
        SleepSchedule::Window { sleep, wake } => {
            if sleep < wake {
                sleep <= now && now < wake
            } else {
                now >= sleep || now < wake
            }
        }
        SleepSchedule::Unscheduled | SleepSchedule::Invalid => false,
    }
}

/// Whether the pet's schedule says it should be asleep at `now`.
pub fn should_sleep(pet: &Pet, now: NaiveTime) -> bool {
    is_bedtime(pet.schedule, now)
}

/// Outcome of a natural wake-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakeUp {
    /// Whole hours slept.
    pub slept_hours: u64,
    /// Whether DP was restored.
    pub recovered: bool,
}

/// Wake a napping pet if the wall clock shows its wake-up minute.
///
/// A nap of at least `recovery_hours` restores DP to full.
pub fn check_wake_up(
    pet: &mut Pet,
    cadence: Cadence,
    recovery_hours: u64,
    now: NaiveTime,
) -> Option<WakeUp> {
    let SleepSchedule::Window { wake, .. } = pet.schedule else {
        return None;
    };
    if !pet.is_asleep() || now.hour() != wake.hour() || now.minute() != wake.minute() {
        return None;
    }

    let started = pet.sleep_started_at.unwrap_or(pet.age_timer);
    let slept_hours = cadence.whole_hours(pet.age_timer.saturating_sub(started));
    let recovered = slept_hours >= recovery_hours;
    if recovered {
        pet.dp = pet.species.energy;
    }
    set_state(pet, PetState::Idle, false);
    info!(pet = %pet.id, name = pet.name(), slept_hours, recovered, "Woke up");

    Some(WakeUp {
        slept_hours,
        recovered,
    })
}

/// Arm the back-to-sleep countdown from the module's grace period.
pub fn arm_back_to_sleep(pet: &mut Pet, module: &ModuleConfig) {
    pet.back_to_sleep = module.back_to_sleep_time;
}

/// Wake a napping pet by disturbing it.
///
/// Counts a disturbance, adds 2 to the disturbance penalty and arms the
/// back-to-sleep countdown. Returns `false` if the pet was not asleep.
pub fn disturb_sleep(pet: &mut Pet, module: &ModuleConfig) -> bool {
    if !pet.is_asleep() {
        return false;
    }
    set_state(pet, PetState::Idle, false);
    pet.sleep_disturbances = pet.sleep_disturbances.saturating_add(1);
    pet.disturbance_penalty = pet.disturbance_penalty.saturating_add(2);
    arm_back_to_sleep(pet, module);
    info!(
        pet = %pet.id,
        disturbances = pet.sleep_disturbances,
        penalty = pet.disturbance_penalty,
        "Sleep disturbed"
    );
    true
}

/// Put the pet to sleep (lights off).
///
/// Returns `false` if the pet is dead, an egg, or already asleep.
pub fn put_to_sleep(pet: &mut Pet) -> bool {
    if pet.is_dead() || pet.is_asleep() || pet.stage() == 0 {
        return false;
    }
    pet.back_to_sleep = 0;
    set_state(pet, PetState::Nap, false)
}

/// Advance the back-to-sleep countdown by one minute.
///
/// When it expires while the schedule still calls for sleep, the pet naps
/// again. Returns whether the pet fell back asleep.
pub fn tick_back_to_sleep(pet: &mut Pet, bedtime: bool) -> bool {
    if pet.back_to_sleep == 0 {
        return false;
    }
    pet.back_to_sleep = pet.back_to_sleep.saturating_sub(1);
    if pet.back_to_sleep == 0 && !pet.is_asleep() && bedtime {
        debug!(pet = %pet.id, "Falling back asleep");
        return set_state(pet, PetState::Nap, false);
    }
    false
}
