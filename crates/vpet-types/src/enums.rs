//! Enumeration types for the virtual-pet simulation.
//!
//! Behaviour states, ruleset tags, food kinds, care-mistake kinds and the
//! small closed vocabularies used at the boundary with presentation code
//! (sound cues, scenes, unlock categories).

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Behaviour state
// ---------------------------------------------------------------------------

/// The behaviour state a pet is currently in.
///
/// The state selects which animation plays and which per-frame handler the
/// driver dispatches to. [`PetState::Dead`] is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetState {
    /// Standing still, waiting for the next wander decision.
    #[default]
    Idle,
    /// Walking across the play field.
    Moving,
    /// Asleep.
    Nap,
    /// Drowsy because the sleep schedule says it is bedtime.
    Tired,
    /// Eating.
    Eat,
    /// Short celebration (after eating or evolving).
    Happy1,
    /// Celebration after winning a training session.
    Happy2,
    /// Celebration after winning a battle.
    Happy3,
    /// Angry (lost a training session, or a care call is pending).
    Angry,
    /// Showing the sickness animation.
    Sick,
    /// Refusing (overfed or cannot take the item).
    Nope,
    /// Defecating.
    Pooping,
    /// An egg about to hatch.
    Hatch,
    /// Dead. No further transitions are possible.
    Dead,
}

impl PetState {
    /// Whether the state reverts on its own after a few seconds.
    ///
    /// Everything except idle, moving, nap and dead is transient.
    pub const fn is_transient(self) -> bool {
        !matches!(self, Self::Idle | Self::Moving | Self::Nap | Self::Dead)
    }

    /// Lowercase name of the state, as used in logs and sprite lookups.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Moving => "moving",
            Self::Nap => "nap",
            Self::Tired => "tired",
            Self::Eat => "eat",
            Self::Happy1 => "happy1",
            Self::Happy2 => "happy2",
            Self::Happy3 => "happy3",
            Self::Angry => "angry",
            Self::Sick => "sick",
            Self::Nope => "nope",
            Self::Pooping => "pooping",
            Self::Hatch => "hatch",
            Self::Dead => "dead",
        }
    }
}

impl core::fmt::Display for PetState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Facing direction while wandering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Facing / walking towards decreasing x.
    #[default]
    Left,
    /// Facing / walking towards increasing x.
    Right,
}

impl Direction {
    /// The opposite direction.
    pub const fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit step along the x axis.
    pub const fn sign(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Rulesets
// ---------------------------------------------------------------------------

/// The rule family a module follows for power and traited-egg mechanics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ruleset {
    /// Digital Monster Color rules.
    #[default]
    Dmc,
    /// Pendulum Color rules.
    Penc,
    /// Digital Monster X rules.
    Dmx,
}

impl core::fmt::Display for Ruleset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Dmc => write!(f, "dmc"),
            Self::Penc => write!(f, "penc"),
            Self::Dmx => write!(f, "dmx"),
        }
    }
}

// ---------------------------------------------------------------------------
// Care
// ---------------------------------------------------------------------------

/// What a pet is being fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodKind {
    /// Meat: fills the hunger meter.
    Hunger,
    /// Protein: fills the strength meter and can restore DP.
    Strength,
    /// Battle supplement: only accepted by pets able to battle.
    Supplement,
}

/// The infraction a care mistake was recorded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CareMistakeKind {
    /// Hunger stayed empty for the full grace period.
    Hunger,
    /// Strength stayed empty for the full grace period.
    Strength,
    /// The pet stayed awake (lights on) past its bedtime.
    Sleep,
}

impl core::fmt::Display for CareMistakeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Hunger => write!(f, "hunger"),
            Self::Strength => write!(f, "strength"),
            Self::Sleep => write!(f, "sleep"),
        }
    }
}

/// How care mistakes are accounted for on a pet.
///
/// Chosen from the module configuration whenever the pet's counters are
/// reset. Exactly one accounting mode is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareAccounting {
    /// Each mistake increments the mistake counter.
    #[default]
    Mistakes,
    /// Each mistake removes one condition heart.
    ConditionHearts,
}

// ---------------------------------------------------------------------------
// Presentation boundary
// ---------------------------------------------------------------------------

/// A named sound cue requested from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    /// A pet evolved.
    Evolution,
    /// A pet died.
    Death,
    /// A care call is pending.
    Alarm,
    /// A pet defecated.
    Cancel,
}

impl SoundCue {
    /// Asset name of the cue.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Evolution => "evolution",
            Self::Death => "death",
            Self::Alarm => "alarm",
            Self::Cancel => "cancel",
        }
    }
}

/// A scene the core can ask the presentation layer to navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scene {
    /// Egg selection, shown when the last pet has been removed.
    Egg,
}

/// Category of an unlock declared by a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnlockKind {
    /// Granted when a pet evolves into one of the listed species.
    Evolution,
    /// Granted by the egg selection flow.
    Egg,
    /// Granted by adventure-mode progress.
    Adventure,
}

impl core::fmt::Display for UnlockKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Evolution => write!(f, "evolution"),
            Self::Egg => write!(f, "egg"),
            Self::Adventure => write!(f, "adventure"),
        }
    }
}
