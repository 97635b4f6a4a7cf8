//! Shared type definitions for the virtual-pet lifecycle simulation.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace. It carries no simulation logic beyond small accessors;
//! the rules that mutate these types live in `vpet-lifecycle`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for pets and messes
//! - [`enums`] -- Behaviour states, rulesets, food and care vocabularies
//! - [`structs`] -- Species sheets, evolution paths and the [`Pet`] entity

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    CareAccounting, CareMistakeKind, Direction, FoodKind, PetState, Ruleset, Scene, SoundCue,
    UnlockKind,
};
pub use ids::{MessId, PetId};
pub use structs::{
    BattleRecord, Bounds, CareTimers, ENEMY_STAGE_SLOTS, EvolutionPath, MAX_STRENGTH, Mess, Motion,
    Pet, SaveWindow, SleepSchedule, SpeciesData, ratio_percent,
};
