//! Defecation schedule, the pooping animation script and mess overflow.
//!
//! Once per minute a hatched pet checks two things: whether the play field
//! is so dirty that it gets sick (one sickness per overflow episode), and
//! whether its poop interval has elapsed. Mature adults go twice as often.

use rand::Rng;
use tracing::{debug, warn};
use vpet_types::{Mess, MessId, Pet, PetState};

use crate::battle::set_sick;
use crate::cadence::{Cadence, is_multiple};
use crate::pet::set_state;

/// Chance that a mess is a large one.
pub const LARGE_MESS_CHANCE: f64 = 0.2;

/// Pixels the pet shuffles sideways while pooping.
const WIGGLE_PX: i32 = 2;

/// Result of the minute hygiene check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoopCheck {
    /// The pet got sick from the mess overflow.
    pub overflow_sickness: bool,
    /// The pet started pooping.
    pub started_pooping: bool,
}

/// Run the minute hygiene check.
///
/// `mess_count` and `live_pets` describe the shared play field; sickness
/// triggers once `mess_count >= live_pets * mess_per_pet_limit`.
pub fn update_pooping(
    pet: &mut Pet,
    cadence: Cadence,
    mess_count: usize,
    live_pets: usize,
    mess_per_pet_limit: usize,
) -> PoopCheck {
    let mut check = PoopCheck::default();
    if pet.stage() == 0 || cadence.whole_minutes(pet.timer) < 1 {
        return check;
    }

    if mess_count >= live_pets.saturating_mul(mess_per_pet_limit) && pet.stage() >= 2 {
        if !pet.poop_count_flag {
            pet.poop_count_flag = true;
            set_sick(pet);
            check.overflow_sickness = true;
            warn!(pet = %pet.id, mess_count, injuries = pet.injuries, "Sick from mess overflow");
        }
    } else {
        pet.poop_count_flag = false;
    }

    let depletion = if pet.stage() >= 6 && cadence.is_mature(pet.age_timer) {
        2
    } else {
        1
    };
    let period = cadence
        .minutes(pet.species.poop_timer)
        .checked_div(depletion)
        .unwrap_or(0);
    if is_multiple(pet.timer, period) {
        check.started_pooping = set_state(pet, PetState::Pooping, false);
    }

    check
}

/// Advance the scripted pooping animation by one frame.
///
/// Returns `true` on the frame the mess should be dropped.
pub fn pooping_step(pet: &mut Pet, cadence: Cadence) -> bool {
    let frame = pet.motion.frame_counter;
    if frame == 0 || frame == cadence.scaled(6) {
        pet.motion.x = pet.motion.x.saturating_add(WIGGLE_PX);
    } else if frame == cadence.scaled(3) || frame == cadence.scaled(9) {
        pet.motion.x = pet.motion.x.saturating_sub(WIGGLE_PX);
    }
    pet.motion.animation_counter == cadence.scaled(15)
}

/// Drop a mess at the pet's position and return to idle.
///
/// Weight drops by one while above the species minimum.
pub fn defecate(pet: &mut Pet, rng: &mut impl Rng) -> Mess {
    let mess = Mess {
        id: MessId::new(),
        x: pet.motion.x,
        large: rng.random::<f64>() < LARGE_MESS_CHANCE,
    };
    if pet.weight > pet.species.min_weight {
        pet.weight = pet.weight.saturating_sub(1);
    }
    set_state(pet, PetState::Idle, false);
    debug!(pet = %pet.id, large = mess.large, weight = pet.weight, "Defecated");
    mess
}
