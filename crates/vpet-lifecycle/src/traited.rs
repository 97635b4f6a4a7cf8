//! Traited-egg qualification.
//!
//! When a dead pet is removed from the roster it may leave a traited egg
//! behind for its module version. Each ruleset has its own condition:
//!
//! - **dmc**: stage 6 or 7, with a 4 in 11 roll.
//! - **penc**: stage 6 or later, mature, and a win ratio of at least 60%.
//! - **dmx**: mature; versions after 4 also need adventure area 45.

use rand::Rng;
use vpet_types::{Pet, Ruleset};

use crate::cadence::Cadence;

/// Minimum win ratio for a penc traited egg.
pub const PENC_MIN_WIN_RATIO: u32 = 60;

/// Adventure area a late dmx version must have reached.
pub const DMX_MIN_AREA: u32 = 45;

/// Key under which a traited egg is recorded: `module@version`.
pub fn traited_egg_key(pet: &Pet) -> String {
    format!("{}@{}", pet.module, pet.version())
}

/// Whether a pet leaving the roster earns a traited egg.
pub fn qualifies_for_traited_egg(
    pet: &Pet,
    ruleset: Ruleset,
    cadence: Cadence,
    rng: &mut impl Rng,
) -> bool {
    let stage = pet.stage();
    match ruleset {
        Ruleset::Dmc => matches!(stage, 6 | 7) && rng.random_range(0..=10_u32) <= 3,
        Ruleset::Penc => {
            stage >= 6
                && cadence.is_mature(pet.age_timer)
                && pet.record.win_ratio() >= PENC_MIN_WIN_RATIO
        }
        Ruleset::Dmx => {
            cadence.is_mature(pet.age_timer) && (pet.version() <= 4 || pet.record.area >= DMX_MIN_AREA)
        }
    }
}
