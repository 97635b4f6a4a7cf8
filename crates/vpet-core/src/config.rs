//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `vpet-config.yaml` at the project
//! root. It holds the simulation settings (frame rate, seed, removal delay,
//! pacing), the arena geometry used for wandering, and the list of modules
//! with their monster sheets.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use vpet_lifecycle::{ModuleCatalog, ModuleConfig};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but holds an unusable value.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Frame rate, seed, bounds and pacing.
    #[serde(default)]
    pub simulation: SimulationSettings,

    /// Play-field geometry.
    #[serde(default)]
    pub arena: ArenaConfig,

    /// Egg hatched by the engine binary at start-up.
    #[serde(default)]
    pub starter: Option<StarterConfig>,

    /// Loaded modules.
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialize fine but cannot drive a simulation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.ticks_per_second == 0 {
            return Err(invalid("simulation.ticks_per_second must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.simulation.idle_probability) {
            return Err(invalid("simulation.idle_probability must lie in [0, 1]"));
        }
        if self.arena.pet_width > self.arena.width {
            return Err(invalid("arena.pet_width must not exceed arena.width"));
        }

        let mut seen = BTreeSet::new();
        for module in &self.modules {
            if module.name.is_empty() {
                return Err(invalid("module name must not be empty"));
            }
            if !seen.insert(module.name.as_str()) {
                return Err(invalid(&format!("duplicate module name: {}", module.name)));
            }
            if module.monsters.is_empty() {
                return Err(invalid(&format!("module {} has no monsters", module.name)));
            }
        }
        Ok(())
    }

    /// Build the module catalog from the configured modules.
    pub fn catalog(&self) -> ModuleCatalog {
        ModuleCatalog::new(self.modules.iter().cloned())
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

/// Simulation-wide settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationSettings {
    /// Frames per real second.
    #[serde(default = "default_ticks_per_second")]
    pub ticks_per_second: u32,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Stop the runner after this many frames (0 = unbounded).
    #[serde(default)]
    pub max_ticks: u64,

    /// Frames a dead pet stays on the roster before removal.
    #[serde(default = "default_dead_removal_ticks")]
    pub dead_removal_ticks: u64,

    /// Hours of sleep needed to restore DP on waking.
    #[serde(default = "default_sleep_recovery_hours")]
    pub sleep_recovery_hours: u64,

    /// Chance that a wander decision pauses instead of walking.
    #[serde(default = "default_idle_probability")]
    pub idle_probability: f64,

    /// Messes per live pet before the field makes pets sick.
    #[serde(default = "default_mess_per_pet_limit")]
    pub mess_per_pet_limit: usize,

    /// Pace frames by the wall clock and read the local time for sleep.
    #[serde(default)]
    pub realtime: bool,

    /// Simulated time of frame 0 when not running in real time.
    #[serde(default = "default_start_time")]
    pub start_time: NaiveDateTime,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            ticks_per_second: default_ticks_per_second(),
            seed: default_seed(),
            max_ticks: 0,
            dead_removal_ticks: default_dead_removal_ticks(),
            sleep_recovery_hours: default_sleep_recovery_hours(),
            idle_probability: default_idle_probability(),
            mess_per_pet_limit: default_mess_per_pet_limit(),
            realtime: false,
            start_time: default_start_time(),
        }
    }
}

/// Play-field geometry in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ArenaConfig {
    /// Width of the play field.
    #[serde(default = "default_arena_width")]
    pub width: u32,

    /// Width of one pet sprite.
    #[serde(default = "default_pet_width")]
    pub pet_width: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: default_arena_width(),
            pet_width: default_pet_width(),
        }
    }
}

impl ArenaConfig {
    /// Rightmost x a pet may stand at.
    pub fn max_x(self) -> i32 {
        i32::try_from(self.width.saturating_sub(self.pet_width)).unwrap_or(i32::MAX)
    }

    /// Middle of the walkable range.
    pub fn center_x(self) -> i32 {
        self.max_x().checked_div(2).unwrap_or(0)
    }
}

/// Species the engine hatches when it starts with an empty roster.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StarterConfig {
    /// Module name.
    pub module: String,
    /// Species name, normally a stage 0 egg.
    pub species: String,
    /// Species version.
    #[serde(default = "default_version")]
    pub version: u32,
}

const fn default_ticks_per_second() -> u32 {
    30
}

const fn default_seed() -> u64 {
    42
}

const fn default_dead_removal_ticks() -> u64 {
    9000
}

const fn default_sleep_recovery_hours() -> u64 {
    6
}

const fn default_idle_probability() -> f64 {
    0.6
}

const fn default_mess_per_pet_limit() -> usize {
    8
}

fn default_start_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap_or_default()
}

const fn default_arena_width() -> u32 {
    240
}

const fn default_pet_width() -> u32 {
    48
}

const fn default_version() -> u32 {
    1
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Timelike;
    use vpet_types::Ruleset;

    use super::*;

    const MINIMAL: &str = "
modules:
  - name: DMC
    ruleset: dmc
    monsters:
      - name: Botamon
        stage: 0
";

    #[test]
    fn defaults_fill_missing_sections() {
        let config = SimulationConfig::parse(MINIMAL).unwrap();
        assert_eq!(config.simulation, SimulationSettings::default());
        assert_eq!(config.simulation.ticks_per_second, 30);
        assert_eq!(config.simulation.dead_removal_ticks, 9000);
        assert_eq!(config.simulation.start_time.hour(), 12);
        assert_eq!(config.arena.max_x(), 192);
        assert!(config.starter.is_none());
    }

    #[test]
    fn module_defaults_apply() {
        let config = SimulationConfig::parse(MINIMAL).unwrap();
        let module = config.modules.first().unwrap();
        assert_eq!(module.ruleset, Ruleset::Dmc);
        assert_eq!(module.death_care_mistake, ModuleConfig::default().death_care_mistake);
        let egg = module.monster("Botamon", 1).unwrap();
        assert_eq!(egg.poop_timer, 60);
        assert_eq!(config.catalog().len(), 1);
    }

    #[test]
    fn rejects_zero_frame_rate() {
        let yaml = format!("simulation:\n  ticks_per_second: 0\n{MINIMAL}");
        assert!(matches!(
            SimulationConfig::parse(&yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_modules() {
        let yaml = "
modules:
  - name: DMC
    monsters: [{ name: Botamon, stage: 0 }]
  - name: DMC
    monsters: [{ name: Punimon, stage: 0 }]
";
        let err = SimulationConfig::parse(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate module name"));
    }

    #[test]
    fn rejects_empty_monster_list() {
        let yaml = "modules:\n  - name: PenC\n    ruleset: penc\n";
        assert!(matches!(
            SimulationConfig::parse(yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        assert!(matches!(
            SimulationConfig::parse("simulation: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = SimulationConfig::from_file(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
