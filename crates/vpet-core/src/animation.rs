//! Per-frame animation counters and ambient wandering.
//!
//! Neither touches needs or timers beyond the motion block; they only decide
//! which sprite frame shows, when a transient state ends, and where an idle
//! pet walks.

use rand::Rng;
use rand::seq::IndexedRandom;
use vpet_lifecycle::cadence::is_multiple;
use vpet_lifecycle::pet::set_state;
use vpet_lifecycle::{Cadence, need_care};
use vpet_types::{Direction, Pet, PetState};

use crate::config::ArenaConfig;

/// Sprite frames in one animation cycle.
pub const FRAMES_PER_CYCLE: u32 = 2;

/// Authored frame at which an egg starts its hatch animation.
pub const HATCH_FRAME: u64 = 1750;

/// Seconds a transient state (eat, happy, angry...) is shown.
pub const TRANSIENT_SECONDS: u32 = 4;

/// Chance that an idle pet shows a mood when its wander timer runs out.
pub const MOOD_CHANCE: f64 = 0.3;

/// Arena width the walking step sizes are authored for.
const AUTHORED_ARENA_WIDTH: u32 = 240;

/// Pixel steps a walking pet takes, before arena scaling.
const WALK_STEPS: [i32; 2] = [2, 6];

fn next_frame(index: u32) -> u32 {
    index
        .saturating_add(1)
        .checked_rem(FRAMES_PER_CYCLE)
        .unwrap_or(0)
}

/// Advance animation counters for one frame.
///
/// Ends transient states after [`TRANSIENT_SECONDS`] (eating leads to
/// happy, everything else to idle) and starts the hatch animation of an egg
/// whose scaled timer reached [`HATCH_FRAME`].
pub fn update_animation(pet: &mut Pet, cadence: Cadence) {
    let tps = cadence.ticks_per_second();
    if pet.state == PetState::Nope && is_multiple(pet.timer, cadence.second()) {
        pet.motion.direction = pet.motion.direction.flipped();
    }

    let motion = &mut pet.motion;
    motion.frame_counter = motion.frame_counter.saturating_add(1);
    if pet.state == PetState::Moving {
        if motion.frame_counter.checked_rem(cadence.fraction(3)) == Some(0) {
            motion.frame_index = next_frame(motion.frame_index);
        }
    } else if motion.frame_counter > tps.checked_div(2).unwrap_or(0) {
        motion.frame_counter = 0;
        motion.frame_index = next_frame(motion.frame_index);
    }

    motion.animation_counter = motion.animation_counter.saturating_add(1);
    if pet.state.is_transient()
        && motion.animation_counter > tps.saturating_mul(TRANSIENT_SECONDS)
    {
        let next = if pet.state == PetState::Eat {
            PetState::Happy1
        } else {
            PetState::Idle
        };
        set_state(pet, next, false);
    }

    let scaled_timer = pet
        .timer
        .saturating_mul(u64::from(tps))
        .checked_div(30)
        .unwrap_or(0);
    if pet.stage() == 0 && scaled_timer >= HATCH_FRAME {
        set_state(pet, PetState::Hatch, false);
    }
}

/// Run one frame of ambient wandering for an idle or walking pet.
///
/// When the wander timer runs out an idle pet may show a mood; otherwise it
/// picks between walking in a random direction and pausing. A walking pet
/// steps in time with its animation and turns around at the arena edges.
pub fn wander(
    pet: &mut Pet,
    cadence: Cadence,
    arena: ArenaConfig,
    idle_probability: f64,
    bedtime: bool,
    rng: &mut impl Rng,
) {
    if pet.stage() == 0 || !matches!(pet.state, PetState::Idle | PetState::Moving) {
        return;
    }

    pet.motion.move_timer = pet.motion.move_timer.saturating_sub(1);
    if pet.motion.move_timer == 0 {
        if pet.state == PetState::Idle && rng.random::<f64>() < MOOD_CHANCE {
            let mood = if pet.sick > 0 {
                PetState::Sick
            } else if need_care(pet, bedtime) {
                PetState::Angry
            } else {
                PetState::Happy1
            };
            set_state(pet, mood, false);
            pet.motion.move_timer = rng.random_range(60..=120);
            return;
        }

        if rng.random::<f64>() < 1.0 - idle_probability {
            set_state(pet, PetState::Moving, false);
            pet.motion.direction = if rng.random_bool(0.5) {
                Direction::Left
            } else {
                Direction::Right
            };
            pet.motion.move_timer = rng.random_range(20..=60);
        } else {
            set_state(pet, PetState::Idle, false);
            pet.motion.move_timer = rng.random_range(90..=180);
        }
    }

    if pet.state == PetState::Moving
        && pet.motion.frame_counter.checked_rem(cadence.fraction(3)) == Some(0)
    {
        step(pet, arena, rng);
    }
}

fn step(pet: &mut Pet, arena: ArenaConfig, rng: &mut impl Rng) {
    let scale = i32::try_from(arena.width.checked_div(AUTHORED_ARENA_WIDTH).unwrap_or(1))
        .unwrap_or(1)
        .max(1);
    let stride = WALK_STEPS.choose(rng).copied().unwrap_or(2);
    let delta = stride
        .saturating_mul(scale)
        .saturating_mul(pet.motion.direction.sign());
    let x = pet.motion.x.saturating_add(delta);
    let max_x = arena.max_x();

    if x <= 0 {
        pet.motion.x = 0;
        pet.motion.direction = Direction::Right;
    } else if x >= max_x {
        pet.motion.x = max_x;
        pet.motion.direction = Direction::Left;
    } else {
        pet.motion.x = x;
    }
}
