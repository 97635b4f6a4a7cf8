//! Death conditions, death saves and the dead state.
//!
//! A pet dies when any of these hold at a minute evaluation:
//! - injuries reach `death_max_injuries`
//! - it stayed sick longer than `death_sick_timer` minutes
//! - hunger or strength stayed empty longer than their death timers
//! - stage 4/5 with `death_stage45_mistake` mistakes after its evolution time
//! - a mature stage 6+ pet with `death_stage67_mistake` mistakes
//! - starvation ticks exceed `death_starvation_count` (when non-zero)
//! - mistakes reach `death_care_mistake`
//!
//! Modules can enable two save mechanics, checked button first. Each is a
//! [`SaveWindow`]: the first qualifying evaluation arms it and spares the
//! pet, and the countdown runs per frame. An expired window is spent and
//! no longer blocks death.

use tracing::{info, warn};
use vpet_types::{Pet, PetState, SaveWindow};

use crate::cadence::Cadence;
use crate::config::ModuleConfig;
use crate::pet::set_state;

/// Frames the player has to press the button once the save arms.
pub const BUTTON_SAVE_FRAMES: u32 = 100;

/// Frames the player has to shake the device once the save arms.
pub const SHAKE_SAVE_FRAMES: u32 = 50;

/// Egg shakes needed for the shook flag.
pub const SHAKEN_EGG_THRESHOLD: u32 = 99;

/// A condition that makes a pet die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// Too many injuries.
    Injuries,
    /// Sickness left untreated.
    Sickness,
    /// Hunger meter empty for too long.
    Hunger,
    /// Strength meter empty for too long.
    Weakness,
    /// Stage 4/5 pet with too many mistakes past its evolution time.
    StageMistakes,
    /// Mature adult with too many mistakes.
    AdultMistakes,
    /// Too many starvation ticks.
    Starvation,
    /// Care-mistake ceiling reached.
    CareMistakes,
}

impl core::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Injuries => write!(f, "injuries"),
            Self::Sickness => write!(f, "sickness"),
            Self::Hunger => write!(f, "hunger"),
            Self::Weakness => write!(f, "weakness"),
            Self::StageMistakes => write!(f, "stage_mistakes"),
            Self::AdultMistakes => write!(f, "adult_mistakes"),
            Self::Starvation => write!(f, "starvation"),
            Self::CareMistakes => write!(f, "care_mistakes"),
        }
    }
}

/// Which save mechanic spared a pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SaveKind {
    /// The button-press window.
    Button,
    /// The shake window.
    Shake,
}

/// Outcome of a death evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeathVerdict {
    /// No death condition holds (or the pet is asleep or already dead).
    Alive,
    /// A death condition holds but a save window is holding it off.
    Saved(SaveKind),
    /// The pet must die.
    Dead(Vec<DeathCause>),
}

/// List every death condition that currently holds. Does not mutate.
pub fn death_causes(pet: &Pet, module: &ModuleConfig, cadence: Cadence) -> Vec<DeathCause> {
    let mut causes = Vec::new();
    let stage = pet.stage();

    if pet.injuries >= module.death_max_injuries {
        causes.push(DeathCause::Injuries);
    }
    if pet.care.sick > module.death_sick_timer {
        causes.push(DeathCause::Sickness);
    }
    if pet.care.food > module.death_hunger_timer {
        causes.push(DeathCause::Hunger);
    }
    if pet.care.strength > module.death_strength_timer {
        causes.push(DeathCause::Weakness);
    }
    if matches!(stage, 4 | 5)
        && pet.mistakes >= module.death_stage45_mistake
        && pet.timer > cadence.minutes(pet.species.time)
    {
        causes.push(DeathCause::StageMistakes);
    }
    if stage >= 6 && pet.mistakes >= module.death_stage67_mistake && cadence.is_mature(pet.age_timer)
    {
        causes.push(DeathCause::AdultMistakes);
    }
    if module.death_starvation_count > 0 && pet.starvation_counter > module.death_starvation_count {
        causes.push(DeathCause::Starvation);
    }
    if pet.mistakes >= module.death_care_mistake {
        causes.push(DeathCause::CareMistakes);
    }

    causes
}

/// Whether a save window holds death off this evaluation.
///
/// Ready arms the window; a running window keeps holding; an expired one is
/// marked spent and lets the evaluation continue.
const fn hold_death(window: &mut SaveWindow, frames: u32) -> bool {
    match *window {
        SaveWindow::Ready => {
            *window = SaveWindow::Armed { remaining: frames };
            true
        }
        SaveWindow::Armed { remaining } if remaining > 0 => true,
        SaveWindow::Armed { .. } => {
            *window = SaveWindow::Spent;
            false
        }
        SaveWindow::Spent => false,
    }
}

/// Evaluate death conditions and save mechanics.
///
/// Sleeping and dead pets are never evaluated.
pub fn check_death_conditions(pet: &mut Pet, module: &ModuleConfig, cadence: Cadence) -> DeathVerdict {
    if matches!(pet.state, PetState::Nap | PetState::Dead) {
        return DeathVerdict::Alive;
    }

    let causes = death_causes(pet, module, cadence);
    if causes.is_empty() {
        return DeathVerdict::Alive;
    }

    if module.death_save_by_b_press && hold_death(&mut pet.button_save, BUTTON_SAVE_FRAMES) {
        return DeathVerdict::Saved(SaveKind::Button);
    }
    if module.death_save_by_shake && hold_death(&mut pet.shake_save, SHAKE_SAVE_FRAMES) {
        return DeathVerdict::Saved(SaveKind::Shake);
    }

    DeathVerdict::Dead(causes)
}

/// Put the pet into the dead state and restart its timer for removal.
pub fn kill(pet: &mut Pet, causes: &[DeathCause]) {
    if !set_state(pet, PetState::Dead, false) {
        return;
    }
    pet.timer = 0;
    let causes = causes.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
    info!(
        pet = %pet.id,
        name = pet.name(),
        stage = pet.stage(),
        age = pet.age,
        causes = %causes,
        "Pet died"
    );
}

/// Run the minute death check, killing the pet if no save holds.
///
/// Returns the causes when the pet died.
pub fn update_death_check(
    pet: &mut Pet,
    module: &ModuleConfig,
    cadence: Cadence,
) -> Option<Vec<DeathCause>> {
    match check_death_conditions(pet, module, cadence) {
        DeathVerdict::Alive => None,
        DeathVerdict::Saved(kind) => {
            warn!(pet = %pet.id, save = ?kind, "Death held off by save window");
            None
        }
        DeathVerdict::Dead(causes) => {
            kill(pet, &causes);
            Some(causes)
        }
    }
}

/// Advance armed save windows by one frame.
pub const fn countdown_saves(pet: &mut Pet) {
    pet.button_save.countdown();
    pet.shake_save.countdown();
}

/// Handle a button press: a running button window saves the pet.
pub fn press_save_button(pet: &mut Pet) -> bool {
    if pet.is_dead() || !pet.button_save.is_armed() {
        return false;
    }
    pet.button_save = SaveWindow::Ready;
    info!(pet = %pet.id, "Saved by button press");
    true
}

/// Handle a device shake.
///
/// Eggs count the shake towards the shook flag. Hatched pets use it to
/// answer a running shake window. Returns whether the shake registered.
pub fn shake(pet: &mut Pet) -> bool {
    if pet.is_dead() {
        return false;
    }
    if pet.stage() == 0 {
        pet.egg_shakes = pet.egg_shakes.saturating_add(1);
        return true;
    }
    if !pet.shake_save.is_armed() {
        return false;
    }
    pet.shake_save = SaveWindow::Ready;
    info!(pet = %pet.id, "Saved by shake");
    true
}

/// Whether a dead pet has waited long enough to leave the roster.
pub const fn is_ready_for_removal(pet: &Pet, dead_removal_ticks: u64) -> bool {
    pet.is_dead() && pet.timer > dead_removal_ticks
}
