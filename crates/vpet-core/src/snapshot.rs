//! Save and restore of the simulation state as JSON.
//!
//! A snapshot holds everything needed to resume exactly where the
//! simulation stopped: the frame counter, every pet, the mess queue, the
//! traited eggs and the unlocks. Configuration and the random source are not
//! part of it; the caller supplies them when restoring.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;
use vpet_lifecycle::InMemoryUnlocks;
use vpet_types::{Mess, Pet};

use crate::clock::{ClockError, SimClock};
use crate::roster::Roster;
use crate::tick::SimulationState;

/// Format version written into new snapshots.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors that can occur when saving or loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Failed to read or write the snapshot file.
    #[error("snapshot I/O failed: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The snapshot is not valid JSON for this layout.
    #[error("snapshot JSON is invalid: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The snapshot was written by an incompatible format version.
    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the snapshot.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },

    /// The restored clock could not be built.
    #[error("snapshot clock is invalid: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Persisted simulation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Format version.
    pub version: u32,
    /// Frame counter at capture time.
    pub tick: u64,
    /// All pets, including dead ones awaiting removal.
    pub pets: Vec<Pet>,
    /// Messes on the field.
    pub messes: Vec<Mess>,
    /// Traited eggs earned.
    pub traited_eggs: BTreeSet<String>,
    /// Granted unlocks.
    pub unlocks: InMemoryUnlocks,
}

impl Snapshot {
    /// Capture the current state.
    pub fn capture(state: &SimulationState) -> Self {
        let roster = &state.roster;
        Self {
            version: SNAPSHOT_VERSION,
            tick: state.clock.tick(),
            pets: roster.pets.clone(),
            messes: roster.messes.clone(),
            traited_eggs: roster.traited_eggs.clone(),
            unlocks: roster.unlocks.clone(),
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot, rejecting other format versions.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }

    /// Write the snapshot to `path`.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), tick = self.tick, pets = self.pets.len(), "Snapshot saved");
        Ok(())
    }

    /// Read a snapshot from `path`.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Replace the clock and roster of `state` with this snapshot.
    ///
    /// The frame rate and start time of `state` are kept.
    pub fn restore(self, state: &mut SimulationState) -> Result<(), SnapshotError> {
        state.clock = SimClock::from_parts(
            self.tick,
            state.clock.cadence().ticks_per_second(),
            state.clock.start(),
        )?;
        state.roster = Roster {
            pets: self.pets,
            messes: self.messes,
            traited_eggs: self.traited_eggs,
            unlocks: self.unlocks,
        };
        info!(tick = self.tick, pets = state.roster.pets.len(), "Snapshot restored");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vpet_lifecycle::ModuleConfig;
    use vpet_types::SpeciesData;

    use super::*;
    use crate::config::SimulationConfig;

    fn state() -> SimulationState {
        let config = SimulationConfig {
            modules: vec![ModuleConfig {
                name: String::from("DMC"),
                monsters: vec![SpeciesData {
                    name: String::from("Koromon"),
                    stage: 1,
                    version: 1,
                    stomach: 4,
                    sleeps: Some(String::from("20:00")),
                    wakes: Some(String::from("08:00")),
                    ..SpeciesData::default()
                }],
                ..ModuleConfig::default()
            }],
            ..SimulationConfig::default()
        };
        SimulationState::new(&config).unwrap()
    }

    #[test]
    fn json_round_trip_preserves_roster() {
        let mut original = state();
        original.hatch("DMC", "Koromon", 1).unwrap();
        original.roster.grant_traited_egg("DMC@1");
        let snapshot = Snapshot::capture(&original);

        let parsed = Snapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(parsed, snapshot);

        let mut restored = state();
        parsed.restore(&mut restored).unwrap();
        assert_eq!(restored.roster, original.roster);
        assert_eq!(restored.clock.tick(), original.clock.tick());
    }

    #[test]
    fn rejects_other_versions() {
        let mut snapshot = Snapshot::capture(&state());
        snapshot.version = SNAPSHOT_VERSION.saturating_add(1);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(matches!(
            Snapshot::from_json(&json),
            Err(SnapshotError::UnsupportedVersion { found: 2, expected: 1 })
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Snapshot::from_json("{\"version\": 1"),
            Err(SnapshotError::Json { .. })
        ));
    }
}
