//! Pet lifecycle rules for the virtual-pet simulation.
//!
//! This crate holds the per-pet logic: everything that changes a [`Pet`]
//! in response to time passing or to a player action, without touching the
//! roster, the clock or any I/O. It sits between `vpet-types` (the data
//! model) and `vpet-core` (the frame driver and action facade).
//!
//! Functions take the pet, its [`ModuleConfig`] and a [`Cadence`], and
//! return a small result struct describing what happened. The caller
//! decides what follows from it (sounds, scene changes, digidex entries).
//!
//! # Modules
//!
//! - [`battle`] -- Power, attack and hp; training, battle and versus results
//! - [`cadence`] -- Frame-rate arithmetic ([`Cadence`])
//! - [`care`] -- Care mistakes, condition hearts, call sign
//! - [`config`] -- Module rules and monster sheets ([`ModuleConfig`], [`ModuleCatalog`])
//! - [`death`] -- Death conditions, save windows, egg shaking ([`DeathCause`])
//! - [`error`] -- Error types ([`PetError`])
//! - [`evolution`] -- Path selection, item and jogress evolutions ([`Evolution`])
//! - [`experience`] -- Experience and levels
//! - [`feeding`] -- Meat, protein, supplements and medicine
//! - [`hygiene`] -- Poop schedule, pooping script, mess overflow
//! - [`needs`] -- Hunger and strength decay
//! - [`pet`] -- Creation, species swaps and state transitions
//! - [`sleep`] -- Sleep schedule, wake-up, disturbance, back-to-sleep
//! - [`traited`] -- Traited-egg qualification
//! - [`unlocks`] -- Unlock registry ([`UnlockRegistry`], [`InMemoryUnlocks`])
//!
//! [`Pet`]: vpet_types::Pet

pub mod battle;
pub mod cadence;
pub mod care;
pub mod config;
pub mod death;
pub mod error;
pub mod evolution;
pub mod experience;
pub mod feeding;
pub mod hygiene;
pub mod needs;
pub mod pet;
pub mod sleep;
pub mod traited;
pub mod unlocks;

// Re-export primary types at crate root for convenience.
pub use battle::{BattleOutcome, can_battle, can_train, get_attack, get_hp, get_power};
pub use cadence::Cadence;
pub use care::{CareTick, call_sign, need_care};
pub use config::{ModuleCatalog, ModuleConfig, UnlockRule};
pub use death::{DeathCause, DeathVerdict, SaveKind};
pub use error::PetError;
pub use evolution::{Evolution, evolve_by_item, jogress, update_evolution};
pub use experience::add_experience;
pub use feeding::{feed, heal};
pub use hygiene::PoopCheck;
pub use needs::NeedsTick;
pub use pet::{create_pet, set_state};
pub use sleep::WakeUp;
pub use traited::{qualifies_for_traited_egg, traited_egg_key};
pub use unlocks::{InMemoryUnlocks, UnlockEntry, UnlockRegistry};
