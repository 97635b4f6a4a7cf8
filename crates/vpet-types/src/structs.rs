//! Core entity structs for the virtual-pet simulation.
//!
//! [`SpeciesData`] and [`EvolutionPath`] mirror the per-module monster
//! sheets. [`Pet`] is the live creature: species sheet, vitals, timers and
//! behaviour state. Every field is always present (no lazily-added
//! attributes) so that a serialized pet round-trips exactly.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::{CareAccounting, Direction, PetState};
use crate::ids::{MessId, PetId};

/// Number of enemy-stage slots tracked in [`BattleRecord::enemy_kills`].
pub const ENEMY_STAGE_SLOTS: usize = 11;

/// Highest value the strength meter can hold.
pub const MAX_STRENGTH: u32 = 4;

// ---------------------------------------------------------------------------
// Species sheets
// ---------------------------------------------------------------------------

/// An inclusive `[min, max]` range, written as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds(pub u32, pub u32);

impl Bounds {
    /// Whether `value` lies within the range (both ends inclusive).
    pub const fn contains(self, value: u32) -> bool {
        self.0 <= value && value <= self.1
    }
}

/// One candidate evolution out of a species.
///
/// Every predicate is optional; an absent predicate always holds. Paths are
/// evaluated in list order and the first fully-satisfied one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionPath {
    /// Name of the species this path evolves into.
    pub to: String,
    /// Version of the target species. Defaults to the current version.
    pub version: Option<u32>,
    /// Accepted care-mistake count.
    pub mistakes: Option<Bounds>,
    /// Accepted condition-heart count.
    pub condition_hearts: Option<Bounds>,
    /// Accepted training count (`effort / 4`).
    pub training: Option<Bounds>,
    /// Accepted overfeed count.
    pub overfeed: Option<Bounds>,
    /// Accepted level.
    pub level: Option<Bounds>,
    /// Accepted kills of stage-5 enemies.
    #[serde(alias = "stage-5")]
    pub stage5: Option<Bounds>,
    /// Accepted kills of stage-6 enemies.
    #[serde(alias = "stage-6")]
    pub stage6: Option<Bounds>,
    /// Accepted kills of stage-7 enemies.
    #[serde(alias = "stage-7")]
    pub stage7: Option<Bounds>,
    /// Accepted kills of stage-8 enemies.
    #[serde(alias = "stage-8")]
    pub stage8: Option<Bounds>,
    /// Accepted kills of stage-9 enemies.
    #[serde(alias = "stage-9")]
    pub stage9: Option<Bounds>,
    /// Accepted sleep-disturbance count.
    pub sleep_disturbances: Option<Bounds>,
    /// Accepted battle count for the current stage.
    pub battles: Option<Bounds>,
    /// Accepted win ratio in percent. Only checked once a battle was fought.
    pub win_ratio: Option<Bounds>,
    /// Partner species for a jogress (fusion) evolution. Never auto-selected.
    pub jogress: Option<String>,
    /// Item that triggers this evolution. Never auto-selected.
    pub item: Option<String>,
}

impl EvolutionPath {
    /// Whether the path needs an external trigger (jogress or item).
    pub const fn is_triggered(&self) -> bool {
        self.jogress.is_some() || self.item.is_some()
    }
}

/// Static data for one species within a module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesData {
    /// Species name.
    pub name: String,
    /// Growth stage (0 = egg).
    pub stage: u8,
    /// Module version the species belongs to.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Attribute tag (`Va`, `Da`, `Vi`, `Free`, ...).
    #[serde(default)]
    pub attribute: String,
    /// Whether the species is only reachable once its special key unlocks.
    #[serde(default)]
    pub special: bool,
    /// Unlock key guarding a special species.
    #[serde(default)]
    pub special_key: Option<String>,
    /// Bedtime as `HH:MM`.
    #[serde(default)]
    pub sleeps: Option<String>,
    /// Wake-up time as `HH:MM`.
    #[serde(default)]
    pub wakes: Option<String>,
    /// Main attack sprite index.
    #[serde(default)]
    pub atk_main: u32,
    /// Alternate attack sprite index (0 = same as main).
    #[serde(default)]
    pub atk_alt: u32,
    /// Minutes spent in this stage before evolution is considered.
    #[serde(default)]
    pub time: u32,
    /// Minutes between defecations.
    #[serde(default = "default_poop_timer")]
    pub poop_timer: u32,
    /// Weight floor.
    #[serde(default)]
    pub min_weight: u32,
    /// Hunger meter capacity.
    #[serde(default)]
    pub stomach: u32,
    /// Minutes per hunger point lost (0 disables decay).
    #[serde(default)]
    pub hunger_loss: u32,
    /// Minutes per strength point lost (0 disables decay).
    #[serde(default)]
    pub strength_loss: u32,
    /// Base battle power.
    #[serde(default)]
    pub power: u32,
    /// Maximum DP.
    #[serde(default)]
    pub energy: u32,
    /// Doses of medicine needed to cure one sickness.
    #[serde(default = "default_heal_doses")]
    pub heal_doses: u32,
    /// Base battle HP (0 = derive from the stage table).
    #[serde(default)]
    pub hp: u32,
    /// Condition hearts granted on reset.
    #[serde(default)]
    pub condition_hearts: u32,
    /// Whether this species may take part in a jogress. Module files may
    /// spell this `jogress_avaliable` and give it as `0`/`1`.
    #[serde(default, alias = "jogress_avaliable", deserialize_with = "bool_or_int")]
    pub jogress_available: bool,
    /// Ordered evolution candidates.
    #[serde(default)]
    pub evolve: Vec<EvolutionPath>,
}

const fn default_version() -> u32 {
    1
}

const fn default_poop_timer() -> u32 {
    60
}

const fn default_heal_doses() -> u32 {
    1
}

/// Read a flag written either as a boolean or as an integer (non-zero = set).
fn bool_or_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }
    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(set) => set,
        Flag::Int(n) => n != 0,
    })
}

impl SpeciesData {
    /// Alternate attack, falling back to the main attack when unset.
    pub const fn alt_attack(&self) -> u32 {
        if self.atk_alt == 0 {
            self.atk_main
        } else {
            self.atk_alt
        }
    }
}

// ---------------------------------------------------------------------------
// Pet components
// ---------------------------------------------------------------------------

/// A parsed bedtime window.
///
/// Produced once when species data is written into a pet, so malformed
/// strings are detected (and logged) at write time rather than every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepSchedule {
    /// The pet sleeps from `sleep` until `wake`, wrapping past midnight.
    Window {
        /// Bedtime.
        sleep: NaiveTime,
        /// Wake-up time.
        wake: NaiveTime,
    },
    /// The species has no bedtime (eggs, some specials).
    #[default]
    Unscheduled,
    /// The species sheet carried a time that could not be parsed.
    Invalid,
}

/// State of one death-save mechanic.
///
/// A qualifying death arms the window; while armed, death is suppressed.
/// An expired window is spent and never blocks again in the same episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveWindow {
    /// Unused; the next qualifying death arms it.
    #[default]
    Ready,
    /// Counting down; the player can still save the pet.
    Armed {
        /// Frames left in the window.
        remaining: u32,
    },
    /// Expired without a save.
    Spent,
}

impl SaveWindow {
    /// Whether the window is currently counting down.
    pub const fn is_armed(self) -> bool {
        matches!(self, Self::Armed { .. })
    }

    /// Advance an armed window by one frame.
    pub const fn countdown(&mut self) {
        if let Self::Armed { remaining } = self {
            *remaining = remaining.saturating_sub(1);
        }
    }
}

/// Minute counters for unmet needs, used for care-mistake accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CareTimers {
    /// Minutes spent with an empty hunger meter.
    pub food: u32,
    /// Minutes spent with an empty strength meter.
    pub strength: u32,
    /// Minutes spent sick.
    pub sick: u32,
    /// Minutes spent awake past bedtime.
    pub sleep: u32,
}

/// Battle statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattleRecord {
    /// Battles fought in the current stage.
    pub battles: u32,
    /// Battles won in the current stage.
    pub win: u32,
    /// Battles fought over the pet's whole life.
    pub total_battles: u32,
    /// Battles won over the pet's whole life.
    pub total_win: u32,
    /// Highest adventure area reached.
    pub area: u32,
    /// Enemies defeated, indexed by enemy stage.
    pub enemy_kills: [u32; ENEMY_STAGE_SLOTS],
}

/// Percentage of `wins` over `battles`, or 0 when no battle was fought.
pub fn ratio_percent(wins: u32, battles: u32) -> u32 {
    wins.saturating_mul(100).checked_div(battles).unwrap_or(0)
}

impl BattleRecord {
    /// Win ratio for the current stage, in percent.
    pub fn win_ratio(&self) -> u32 {
        ratio_percent(self.win, self.battles)
    }

    /// Lifetime win ratio, in percent.
    pub fn total_win_ratio(&self) -> u32 {
        ratio_percent(self.total_win, self.total_battles)
    }

    /// Kills recorded against enemies of `stage`. Out-of-range stages count 0.
    pub fn kills_at(&self, stage: usize) -> u32 {
        self.enemy_kills.get(stage).copied().unwrap_or(0)
    }
}

/// Animation counters and position on the play field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Motion {
    /// Frames spent in the current state.
    pub animation_counter: u32,
    /// Frames since the sprite frame last advanced.
    pub frame_counter: u32,
    /// Current sprite frame.
    pub frame_index: u32,
    /// Facing direction.
    pub direction: Direction,
    /// Horizontal position in pixels.
    pub x: i32,
    /// Frames until the next wander decision.
    pub move_timer: u32,
}

/// A mess left on the play field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mess {
    /// Identifier of the mess.
    pub id: MessId,
    /// Horizontal position in pixels.
    pub x: i32,
    /// Large messes take two cleaning slots on screen.
    pub large: bool,
}

// ---------------------------------------------------------------------------
// Pet
// ---------------------------------------------------------------------------

/// A live (or dead, awaiting removal) pet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    /// Roster identifier.
    pub id: PetId,
    /// Module (species family) the pet belongs to.
    pub module: String,
    /// Sheet of the current species.
    pub species: SpeciesData,
    /// Bedtime window parsed from the species sheet.
    pub schedule: SleepSchedule,
    /// Hatched from a traited egg.
    pub traited: bool,
    /// Shiny variant.
    pub shiny: bool,
    /// The egg was shaken enough before hatching.
    pub shook: bool,
    /// Active care-mistake accounting mode.
    pub accounting: CareAccounting,

    /// Hunger meter, `0..=stomach`.
    pub hunger: u32,
    /// Strength meter, `0..=4`.
    pub strength: u32,
    /// Weight in grams.
    pub weight: u32,
    /// Medicine doses still required (0 = healthy).
    pub sick: u32,
    /// Times the pet got sick or injured over its whole life. Evolution
    /// does not clear this counter.
    pub injuries: u32,
    /// Remaining condition hearts.
    pub condition_hearts: u32,
    /// Care mistakes in this stage.
    pub mistakes: u32,
    /// Battle energy, `0..=energy`.
    pub dp: u32,
    /// Training effort.
    pub effort: u32,
    /// Overfeed count in this stage.
    pub overfeed: u32,
    /// Times the pet was woken up in this stage.
    pub sleep_disturbances: u32,
    /// Protein fed in this stage.
    pub protein_overdose: u32,
    /// Penalty accumulated from sleep disturbances.
    pub disturbance_penalty: u32,
    /// Hunger decay ticks that found the meter already empty.
    pub starvation_counter: u32,

    /// Level within the current stage.
    pub level: u32,
    /// Experience towards the next level.
    pub experience: u32,
    /// Battle statistics.
    pub record: BattleRecord,

    /// Frames in the current stage; after death, frames spent dead.
    pub timer: u64,
    /// Frames since birth. Frozen at death.
    pub age_timer: u64,
    /// Age in days.
    pub age: u32,
    /// Unmet-need minute counters.
    pub care: CareTimers,
    /// Minutes during which the pet refuses more meat.
    pub overfeed_timer: u32,
    /// Minutes until a woken pet falls asleep again (0 = not armed).
    pub back_to_sleep: u32,
    /// Button-press death save.
    pub button_save: SaveWindow,
    /// Shake death save.
    pub shake_save: SaveWindow,
    /// Times the egg was shaken before hatching.
    pub egg_shakes: u32,
    /// Set while the mess overflow sickness has already been applied.
    pub poop_count_flag: bool,
    /// Frames spent asleep in the current nap.
    pub sleep_timer: u64,
    /// `age_timer` value at which the current nap started.
    pub sleep_started_at: Option<u64>,

    /// Behaviour state.
    pub state: PetState,
    /// Animation counters and position.
    pub motion: Motion,
}

impl Pet {
    /// Species name.
    pub fn name(&self) -> &str {
        &self.species.name
    }

    /// Growth stage.
    pub const fn stage(&self) -> u8 {
        self.species.stage
    }

    /// Module version of the current species.
    pub const fn version(&self) -> u32 {
        self.species.version
    }

    /// Whether the pet has died.
    pub const fn is_dead(&self) -> bool {
        matches!(self.state, PetState::Dead)
    }

    /// Whether the pet is asleep.
    pub const fn is_asleep(&self) -> bool {
        matches!(self.state, PetState::Nap)
    }

    /// Training count as used by evolution requirements.
    pub const fn trainings(&self) -> u32 {
        self.effort / 4
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let b = Bounds(2, 4);
        assert!(!b.contains(1));
        assert!(b.contains(2));
        assert!(b.contains(4));
        assert!(!b.contains(5));
    }

    #[test]
    fn species_defaults_fill_missing_fields() {
        let species: SpeciesData =
            serde_json::from_str(r#"{"name": "Botamon", "stage": 1}"#).unwrap();
        assert_eq!(species.poop_timer, 60);
        assert_eq!(species.heal_doses, 1);
        assert_eq!(species.version, 1);
        assert!(species.evolve.is_empty());
    }

    #[test]
    fn evolution_path_reads_ranges_as_arrays() {
        let path: EvolutionPath =
            serde_json::from_str(r#"{"to": "Agumon", "mistakes": [0, 3]}"#).unwrap();
        assert_eq!(path.mistakes, Some(Bounds(0, 3)));
        assert!(path.level.is_none());
        assert!(!path.is_triggered());
    }

    #[test]
    fn evolution_path_accepts_hyphenated_kill_keys() {
        let path: EvolutionPath = serde_json::from_str(
            r#"{"to": "MetalGreymon", "stage-5": [3, 9], "stage-9": [0, 1]}"#,
        )
        .unwrap();
        assert_eq!(path.stage5, Some(Bounds(3, 9)));
        assert_eq!(path.stage9, Some(Bounds(0, 1)));
        assert!(path.stage6.is_none());
    }

    #[test]
    fn jogress_flag_accepts_legacy_spelling_and_integers() {
        let legacy: SpeciesData =
            serde_json::from_str(r#"{"name": "Omnimon", "stage": 6, "jogress_avaliable": 1}"#).unwrap();
        assert!(legacy.jogress_available);

        let off: SpeciesData =
            serde_json::from_str(r#"{"name": "Agumon", "stage": 3, "jogress_available": 0}"#).unwrap();
        assert!(!off.jogress_available);

        let plain: SpeciesData =
            serde_json::from_str(r#"{"name": "Gabumon", "stage": 3, "jogress_available": true}"#).unwrap();
        assert!(plain.jogress_available);

        let missing: SpeciesData = serde_json::from_str(r#"{"name": "Botamon", "stage": 1}"#).unwrap();
        assert!(!missing.jogress_available);
    }

    #[test]
    fn alt_attack_falls_back_to_main() {
        let mut species = SpeciesData {
            atk_main: 7,
            ..SpeciesData::default()
        };
        assert_eq!(species.alt_attack(), 7);
        species.atk_alt = 9;
        assert_eq!(species.alt_attack(), 9);
    }

    #[test]
    fn save_window_counts_down_only_when_armed() {
        let mut w = SaveWindow::Armed { remaining: 1 };
        w.countdown();
        assert_eq!(w, SaveWindow::Armed { remaining: 0 });
        w.countdown();
        assert_eq!(w, SaveWindow::Armed { remaining: 0 });

        let mut ready = SaveWindow::Ready;
        ready.countdown();
        assert_eq!(ready, SaveWindow::Ready);
    }

    #[test]
    fn win_ratio_is_zero_without_battles() {
        let mut record = BattleRecord::default();
        assert_eq!(record.win_ratio(), 0);
        record.battles = 3;
        record.win = 2;
        assert_eq!(record.win_ratio(), 66);
        assert_eq!(record.kills_at(ENEMY_STAGE_SLOTS), 0);
    }

    #[test]
    fn pet_round_trips_through_json() {
        let pet = Pet {
            module: String::from("DMC"),
            hunger: 3,
            schedule: SleepSchedule::Window {
                sleep: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
                wake: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
            },
            button_save: SaveWindow::Armed { remaining: 12 },
            ..Pet::default()
        };
        let json = serde_json::to_string(&pet).unwrap();
        let back: Pet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pet);
    }
}
