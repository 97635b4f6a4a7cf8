//! Experience and levels.
//!
//! Each stage caps the level a pet can reach ([`MAX_LEVEL`]). Experience
//! needed to reach level `n` is [`EXPERIENCE_LEVEL`]`[n]`; crossing it
//! levels up and carries the remainder over. At the stage cap experience is
//! pinned to zero, so nothing is banked for the next stage.

use tracing::info;
use vpet_types::Pet;

/// Highest level reachable in each stage.
pub const MAX_LEVEL: [u32; 11] = [1, 1, 3, 4, 6, 8, 10, 10, 10, 10, 10];

/// Experience required to reach each level (index = target level).
pub const EXPERIENCE_LEVEL: [u32; 11] = [0, 0, 100, 250, 450, 700, 1000, 1350, 1750, 2200, 2700];

/// Level cap for `stage`. Stages past the table use the last entry.
pub fn max_level(stage: u8) -> u32 {
    MAX_LEVEL
        .get(usize::from(stage))
        .or_else(|| MAX_LEVEL.last())
        .copied()
        .unwrap_or(1)
}

/// Experience needed to reach `level`, or `None` past the table.
pub fn experience_for(level: u32) -> Option<u32> {
    usize::try_from(level)
        .ok()
        .and_then(|i| EXPERIENCE_LEVEL.get(i))
        .copied()
}

/// Add `xp` experience. Returns whether the pet levelled up.
pub fn add_experience(pet: &mut Pet, xp: u32) -> bool {
    if pet.is_dead() {
        return false;
    }
    let cap = max_level(pet.stage());
    pet.experience = pet.experience.saturating_add(xp);
    if pet.level >= cap {
        pet.experience = 0;
        return false;
    }

    let Some(needed) = pet.level.checked_add(1).and_then(experience_for) else {
        return false;
    };
    if pet.experience < needed {
        return false;
    }

    pet.experience = pet.experience.saturating_sub(needed);
    pet.level = pet.level.saturating_add(1);
    if pet.level >= cap {
        pet.experience = 0;
    }
    info!(pet = %pet.id, level = pet.level, experience = pet.experience, "Level up");
    true
}
