//! Simulation clock, frame driver and player actions for the virtual-pet
//! simulation.
//!
//! This crate owns the roster and drives it one frame at a time. Per-pet
//! rules live in `vpet-lifecycle`; this crate sequences them, shares the
//! mess queue and unlocks between pets, and reports sounds and scene changes
//! through the [`Effects`] trait.
//!
//! # Modules
//!
//! - [`actions`] -- Player actions and queries against one pet by id.
//! - [`animation`] -- Idle animation, transient moods, wandering.
//! - [`clock`] -- Frame counter and simulated wall-clock time.
//! - [`config`] -- Configuration loading from `vpet-config.yaml`.
//! - [`effects`] -- [`Effects`] trait for sounds, scenes and the digidex.
//! - [`roster`] -- Pets, messes, traited eggs and unlocks.
//! - [`runner`] -- Async loop around the frame driver.
//! - [`snapshot`] -- JSON save and restore.
//! - [`tick`] -- The per-frame driver.
//!
//! [`Effects`]: effects::Effects

pub mod actions;
pub mod animation;
pub mod clock;
pub mod config;
pub mod effects;
pub mod roster;
pub mod runner;
pub mod snapshot;
pub mod tick;

// Re-export primary types at crate root for convenience.
pub use actions::ActionError;
pub use clock::{ClockError, SimClock};
pub use config::{ArenaConfig, ConfigError, SimulationConfig, SimulationSettings, StarterConfig};
pub use effects::{DigidexEntry, Effects, NoopEffects, RecordingEffects};
pub use roster::Roster;
pub use runner::{
    NoOpCallback, SimulationEndReason, SimulationResult, TickCallback, log_simulation_end,
    run_simulation,
};
pub use snapshot::{SNAPSHOT_VERSION, Snapshot, SnapshotError};
pub use tick::{SimulationState, TickSummary, run_tick};
