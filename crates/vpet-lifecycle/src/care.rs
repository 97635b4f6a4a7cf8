//! Care-mistake accounting.
//!
//! Every simulated minute an unmet need advances its timer. Hunger and
//! strength produce a mistake exactly when their timer reaches the module's
//! grace period; staying awake past bedtime produces one every
//! `sleep_care_mistake_timer` minutes. Sickness only feeds the death rule.

use tracing::warn;
use vpet_types::{CareAccounting, CareMistakeKind, Pet, PetState};

use crate::config::ModuleConfig;

/// Mistakes recorded during one minute of care accounting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CareTick {
    /// Mistakes added this minute, in evaluation order.
    pub mistakes: Vec<CareMistakeKind>,
}

impl CareTick {
    /// Whether an alarm should sound (one per minute, however many mistakes).
    pub fn alarm(&self) -> bool {
        !self.mistakes.is_empty()
    }
}

/// Advance the unmet-need timers by one minute and record due mistakes.
pub fn update_care_mistakes(pet: &mut Pet, module: &ModuleConfig, bedtime: bool) -> CareTick {
    let mut tick = CareTick::default();

    if pet.hunger == 0 {
        pet.care.food = pet.care.food.saturating_add(1);
        if pet.care.food == module.meat_care_mistake_time {
            add_care_mistake(pet, CareMistakeKind::Hunger);
            tick.mistakes.push(CareMistakeKind::Hunger);
        }
    }

    if pet.strength == 0 {
        pet.care.strength = pet.care.strength.saturating_add(1);
        if pet.care.strength == module.protein_care_mistake_time {
            add_care_mistake(pet, CareMistakeKind::Strength);
            tick.mistakes.push(CareMistakeKind::Strength);
        }
    }

    if pet.sick > 0 {
        pet.care.sick = pet.care.sick.saturating_add(1);
    } else {
        pet.care.sick = 0;
    }

    if bedtime {
        pet.care.sleep = pet.care.sleep.saturating_add(1);
        if pet.care.sleep >= module.sleep_care_mistake_timer {
            add_care_mistake(pet, CareMistakeKind::Sleep);
            tick.mistakes.push(CareMistakeKind::Sleep);
            pet.care.sleep = 0;
        }
    }

    tick
}

/// Record one care mistake according to the pet's accounting mode.
///
/// Heart accounting removes a condition heart (never below zero) and leaves
/// the mistake count untouched.
pub fn add_care_mistake(pet: &mut Pet, kind: CareMistakeKind) {
    match pet.accounting {
        CareAccounting::ConditionHearts => {
            pet.condition_hearts = pet.condition_hearts.saturating_sub(1);
            warn!(
                pet = %pet.id,
                kind = %kind,
                hearts_left = pet.condition_hearts,
                "Care mistake"
            );
        }
        CareAccounting::Mistakes => {
            pet.mistakes = pet.mistakes.saturating_add(1);
            warn!(pet = %pet.id, kind = %kind, total = pet.mistakes, "Care mistake");
        }
    }
}

/// Whether the pet currently has an unmet need.
pub const fn need_care(pet: &Pet, bedtime: bool) -> bool {
    pet.species.stage != 0
        && !matches!(pet.state, PetState::Dead | PetState::Nap)
        && (pet.hunger == 0 || pet.strength == 0 || pet.sick > 0 || bedtime)
}

/// Whether the attention icon should show: an unmet need is still inside
/// its grace period.
pub const fn call_sign(pet: &Pet, module: &ModuleConfig, bedtime: bool) -> bool {
    if pet.species.stage == 0 || matches!(pet.state, PetState::Dead | PetState::Nap) {
        return false;
    }
    (pet.hunger == 0 && pet.care.food < module.meat_care_mistake_time)
        || (pet.strength == 0 && pet.care.strength < module.protein_care_mistake_time)
        || (bedtime && pet.care.sleep < module.sleep_care_mistake_timer)
}
