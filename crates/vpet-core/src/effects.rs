//! Side-effect sink for sound, scene changes and the digidex.
//!
//! The simulation never plays audio or switches screens itself. It reports
//! those moments through [`Effects`], whose methods default to doing
//! nothing, so a presentation layer only overrides what it cares about.

use serde::{Deserialize, Serialize};
use vpet_types::{Scene, SoundCue};

/// A species seen for the first time, for the collection screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigidexEntry {
    /// Species name.
    pub name: String,
    /// Module the species belongs to.
    pub module: String,
    /// Species version.
    pub version: u32,
}

/// Receiver for outward-facing simulation events.
///
/// Calls are fire-and-forget; the simulation never depends on their result.
pub trait Effects {
    /// Play a sound cue.
    fn play(&mut self, _cue: SoundCue) {}

    /// Switch to another scene.
    fn change_scene(&mut self, _scene: Scene) {}

    /// Record a species in the digidex.
    fn register_digidex(&mut self, _entry: &DigidexEntry) {}
}

/// Discards every effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEffects;

impl Effects for NoopEffects {}

/// Keeps every effect in order, for tests and headless runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingEffects {
    /// Cues played.
    pub sounds: Vec<SoundCue>,
    /// Scenes requested.
    pub scenes: Vec<Scene>,
    /// Digidex entries registered.
    pub digidex: Vec<DigidexEntry>,
}

impl RecordingEffects {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `cue` was played.
    pub fn count(&self, cue: SoundCue) -> usize {
        self.sounds.iter().filter(|c| **c == cue).count()
    }
}

impl Effects for RecordingEffects {
    fn play(&mut self, cue: SoundCue) {
        self.sounds.push(cue);
    }

    fn change_scene(&mut self, scene: Scene) {
        self.scenes.push(scene);
    }

    fn register_digidex(&mut self, entry: &DigidexEntry) {
        self.digidex.push(entry.clone());
    }
}
