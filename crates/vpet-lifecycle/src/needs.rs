//! Hunger and strength decay, run once per simulated minute.
//!
//! - Hunger drops one point every `hunger_loss` minutes unless the pet is
//!   still digesting an overfeed. Decay on an empty meter counts as a
//!   starvation tick instead.
//! - Strength drops one point every `strength_loss` minutes while above 0.
//! - The overfeed refusal timer counts down by one minute.
//!
//! A zero interval disables the respective decay.

use vpet_types::{MAX_STRENGTH, Pet};

use crate::cadence::{Cadence, is_multiple};

/// What happened during one minute of need decay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeedsTick {
    /// A hunger point was lost.
    pub hunger_lost: bool,
    /// The hunger meter was already empty when it was due to drop.
    pub starved: bool,
    /// A strength point was lost.
    pub strength_lost: bool,
}

/// Apply one minute of need decay.
pub fn update_needs(pet: &mut Pet, cadence: Cadence) -> NeedsTick {
    let mut tick = NeedsTick::default();

    if is_multiple(pet.timer, cadence.minutes(pet.species.hunger_loss)) && pet.overfeed_timer == 0 {
        if pet.hunger > 0 {
            pet.hunger = pet.hunger.saturating_sub(1);
            tick.hunger_lost = true;
        } else {
            pet.starvation_counter = pet.starvation_counter.saturating_add(1);
            tick.starved = true;
        }
    }

    if is_multiple(pet.timer, cadence.minutes(pet.species.strength_loss)) && pet.strength > 0 {
        if pet.strength > MAX_STRENGTH {
            pet.strength = MAX_STRENGTH;
        } else {
            pet.strength = pet.strength.saturating_sub(1);
            tick.strength_lost = true;
        }
    }

    pet.overfeed_timer = pet.overfeed_timer.saturating_sub(1);

    tick
}
