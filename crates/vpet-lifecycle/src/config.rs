//! Per-module tunables and the module catalog.
//!
//! A module is a species family (one device, one roster of monsters). Its
//! [`ModuleConfig`] bundles every threshold the lifecycle rules consult:
//! care-mistake grace periods, death thresholds, training and feeding gains,
//! the ruleset tag, declared unlocks and the monster sheets. Missing keys in
//! a loaded file fall back to the [`Default`] values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vpet_types::{Ruleset, SpeciesData, UnlockKind};

use crate::error::PetError;

/// An unlock declared by a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockRule {
    /// Key recorded in the unlock registry.
    pub name: String,
    /// Category of the unlock.
    #[serde(rename = "type")]
    pub kind: UnlockKind,
    /// Species whose evolution grants this unlock.
    #[serde(default)]
    pub to: Vec<String>,
}

/// Tunables for one module.
///
/// Durations are in simulated minutes unless noted otherwise. Sickness
/// chances are percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Module name, as referenced by [`vpet_types::Pet::module`].
    pub name: String,
    /// Rule family for power and traited-egg mechanics.
    pub ruleset: Ruleset,
    /// Account care mistakes as lost condition hearts instead of a count.
    pub use_condition_hearts: bool,
    /// Level a pet hatched from a traited egg starts each stage at.
    pub traited_egg_starting_level: u32,
    /// Whether a sleeping pet can be fed.
    pub can_eat_sleeping: bool,
    /// Weight gained per meat.
    pub meat_weight_gain: u32,
    /// Weight gained per protein.
    pub protein_weight_gain: u32,
    /// DP restored by every fourth protein.
    pub protein_dp_gain: u32,
    /// Minutes a pet refuses meat after being overfed.
    pub overfeed_timer: u32,
    /// Minutes of empty hunger before a care mistake.
    pub meat_care_mistake_time: u32,
    /// Minutes of empty strength before a care mistake.
    pub protein_care_mistake_time: u32,
    /// Minutes awake past bedtime before a care mistake.
    pub sleep_care_mistake_timer: u32,
    /// Minutes before a woken pet falls asleep again.
    pub back_to_sleep_time: u32,
    /// Injuries within one stage that kill the pet.
    pub death_max_injuries: u32,
    /// Minutes of untreated sickness that kill the pet.
    pub death_sick_timer: u32,
    /// Minutes of empty hunger that kill the pet.
    pub death_hunger_timer: u32,
    /// Minutes of empty strength that kill the pet.
    pub death_strength_timer: u32,
    /// Mistakes that kill a stage 4/5 pet once its evolution time has passed.
    pub death_stage45_mistake: u32,
    /// Mistakes that kill a mature stage 6+ pet.
    pub death_stage67_mistake: u32,
    /// Starvation ticks that kill the pet (0 disables the rule).
    pub death_starvation_count: u32,
    /// Mistakes that kill the pet at any stage.
    pub death_care_mistake: u32,
    /// Enable the button-press death save.
    pub death_save_by_b_press: bool,
    /// Enable the shake death save.
    pub death_save_by_shake: bool,
    /// Whether shaking an egg 99 times grants the shook flag.
    pub enable_shaken_egg: bool,
    /// Effort gained per won training session.
    pub training_effort_gain: u32,
    /// Strength gained per training session.
    pub training_strength_gain: u32,
    /// Weight lost per won training session.
    pub training_weight_win: u32,
    /// Weight lost per lost training session.
    pub training_weight_lose: u32,
    /// Base sickness chance after a won battle, in percent.
    pub battle_base_sick_chance_win: u32,
    /// Base sickness chance after a lost battle, in percent.
    pub battle_base_sick_chance_lose: u32,
    /// Cap on protein overdose counted towards battle sickness.
    pub protein_overdose_max: u32,
    /// Cap on disturbance penalty counted towards battle sickness.
    pub disturbance_penalty_max: u32,
    /// Unlocks declared by the module.
    pub unlocks: Vec<UnlockRule>,
    /// Monster sheets.
    pub monsters: Vec<SpeciesData>,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            ruleset: Ruleset::Dmc,
            use_condition_hearts: false,
            traited_egg_starting_level: 1,
            can_eat_sleeping: false,
            meat_weight_gain: 1,
            protein_weight_gain: 2,
            protein_dp_gain: 1,
            overfeed_timer: 12,
            meat_care_mistake_time: 10,
            protein_care_mistake_time: 10,
            sleep_care_mistake_timer: 60,
            back_to_sleep_time: 10,
            death_max_injuries: 15,
            death_sick_timer: 360,
            death_hunger_timer: 720,
            death_strength_timer: 720,
            death_stage45_mistake: 5,
            death_stage67_mistake: 5,
            death_starvation_count: 0,
            death_care_mistake: 20,
            death_save_by_b_press: false,
            death_save_by_shake: false,
            enable_shaken_egg: false,
            training_effort_gain: 1,
            training_strength_gain: 1,
            training_weight_win: 2,
            training_weight_lose: 1,
            battle_base_sick_chance_win: 10,
            battle_base_sick_chance_lose: 20,
            protein_overdose_max: 3,
            disturbance_penalty_max: 20,
            unlocks: Vec::new(),
            monsters: Vec::new(),
        }
    }
}

impl ModuleConfig {
    /// Look up a monster sheet by name and version.
    pub fn monster(&self, name: &str, version: u32) -> Option<&SpeciesData> {
        self.monsters
            .iter()
            .find(|m| m.name == name && m.version == version)
    }

    /// Look up a monster sheet, failing with [`PetError::UnknownSpecies`].
    pub fn require_monster(&self, name: &str, version: u32) -> Result<&SpeciesData, PetError> {
        self.monster(name, version)
            .ok_or_else(|| PetError::UnknownSpecies {
                module: self.name.clone(),
                name: name.to_owned(),
                version,
            })
    }

    /// Evolution unlocks granted by evolving into `target`.
    pub fn evolution_unlocks<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a UnlockRule> {
        self.unlocks
            .iter()
            .filter(move |u| u.kind == UnlockKind::Evolution && u.to.iter().any(|t| t == target))
    }
}

/// All loaded modules, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleCatalog {
    modules: BTreeMap<String, ModuleConfig>,
}

impl ModuleCatalog {
    /// Build a catalog. Later entries replace earlier ones with the same name.
    pub fn new(modules: impl IntoIterator<Item = ModuleConfig>) -> Self {
        Self {
            modules: modules.into_iter().map(|m| (m.name.clone(), m)).collect(),
        }
    }

    /// Add or replace a module.
    pub fn insert(&mut self, module: ModuleConfig) {
        self.modules.insert(module.name.clone(), module);
    }

    /// Look up a module by name.
    pub fn get(&self, name: &str) -> Result<&ModuleConfig, PetError> {
        self.modules
            .get(name)
            .ok_or_else(|| PetError::UnknownModule(name.to_owned()))
    }

    /// Iterate over loaded modules in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleConfig> {
        self.modules.values()
    }

    /// Number of loaded modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no module is loaded.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
