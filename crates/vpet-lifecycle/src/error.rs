//! Error types for the vpet-lifecycle crate.
//!
//! Lifecycle operations that reference module data (species lookups,
//! evolution targets) can fail. A failed operation never leaves the pet
//! half-updated: lookups happen before any mutation.

/// Errors that can occur during pet lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PetError {
    /// The pet references a module that is not loaded.
    #[error("unknown module: {0}")]
    UnknownModule(String),

    /// A species lookup found no matching monster in the module.
    #[error("unknown species {name} (version {version}) in module {module}")]
    UnknownSpecies {
        /// Module that was searched.
        module: String,
        /// Species name that was requested.
        name: String,
        /// Species version that was requested.
        version: u32,
    },

    /// No externally triggered path matches the given trigger.
    #[error("{name} has no evolution path triggered by {trigger}")]
    NoMatchingPath {
        /// Current species name.
        name: String,
        /// The item or jogress partner that was offered.
        trigger: String,
    },

    /// The evolution target is special and its unlock key is not granted.
    #[error("evolution into {target} is locked behind {key}")]
    SpecialLocked {
        /// Target species name.
        target: String,
        /// The unlock key that is missing.
        key: String,
    },

    /// The evolution target is not at a later stage than the pet.
    #[error("{name} (stage {from}) cannot evolve into {target} (stage {to})")]
    StageRegression {
        /// Current species name.
        name: String,
        /// Target species name.
        target: String,
        /// Current stage.
        from: u8,
        /// Stage of the target species.
        to: u8,
    },

    /// The operation is not possible because the pet has died.
    #[error("pet {0} is dead")]
    PetDead(String),
}
