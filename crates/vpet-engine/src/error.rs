//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of start-up and shutdown so
//! `main` can propagate them with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: vpet_core::ConfigError,
    },

    /// Simulation clock initialization failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: vpet_core::ClockError,
    },

    /// Hatching the starter egg failed.
    #[error("pet error: {source}")]
    Pet {
        /// The underlying lifecycle error.
        #[from]
        source: vpet_lifecycle::PetError,
    },

    /// Loading or saving the snapshot failed.
    #[error("snapshot error: {source}")]
    Snapshot {
        /// The underlying snapshot error.
        #[from]
        source: vpet_core::SnapshotError,
    },

    /// No starter was configured and no module has an egg to hatch.
    #[error("no starter egg: configure `starter` or add a stage 0 monster")]
    NoStarter,
}
