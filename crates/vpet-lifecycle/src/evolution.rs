//! Evolution path selection and application.
//!
//! Automatic evolution runs once per minute for stages up to 5, once the
//! pet has spent `time` minutes in its stage and has no unmet need. The
//! species' path list is scanned in order and the first path whose
//! predicates all hold wins. Paths keyed by an item or a jogress partner
//! are skipped there and only taken through [`evolve_by_item`] and
//! [`jogress`].

use tracing::{info, warn};
use vpet_types::{Bounds, EvolutionPath, Pet, SpeciesData, UnlockKind};

use crate::cadence::Cadence;
use crate::care::need_care;
use crate::config::ModuleConfig;
use crate::death::SHAKEN_EGG_THRESHOLD;
use crate::error::PetError;
use crate::pet::evolve_to;
use crate::unlocks::UnlockRegistry;

/// Highest stage that still evolves automatically.
pub const MAX_AUTO_EVOLUTION_STAGE: u8 = 5;

/// A completed evolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evolution {
    /// Species before evolving.
    pub from: String,
    /// Species after evolving.
    pub to: String,
    /// Version of the new species.
    pub version: u32,
    /// Evolution unlocks newly granted by this evolution.
    pub unlocked: Vec<String>,
}

fn holds(range: Option<Bounds>, value: u32) -> bool {
    range.is_none_or(|r| r.contains(value))
}

/// Whether every predicate on `path` holds for the pet.
///
/// The win ratio is only checked once the pet has fought a battle.
pub fn path_matches(pet: &Pet, path: &EvolutionPath) -> bool {
    let kills = |stage| pet.record.kills_at(stage);
    holds(path.mistakes, pet.mistakes)
        && holds(path.condition_hearts, pet.condition_hearts)
        && holds(path.training, pet.trainings())
        && holds(path.overfeed, pet.overfeed)
        && holds(path.level, pet.level)
        && holds(path.stage5, kills(5))
        && holds(path.stage6, kills(6))
        && holds(path.stage7, kills(7))
        && holds(path.stage8, kills(8))
        && holds(path.stage9, kills(9))
        && holds(path.sleep_disturbances, pet.sleep_disturbances)
        && holds(path.battles, pet.record.battles)
        && (pet.record.battles == 0 || holds(path.win_ratio, pet.record.win_ratio()))
}

/// First automatically selectable path that matches, ignoring unlocks.
pub fn select_path<'a>(pet: &Pet, paths: &'a [EvolutionPath]) -> Option<&'a EvolutionPath> {
    paths
        .iter()
        .find(|p| !p.is_triggered() && path_matches(pet, p))
}

/// Whether the pet meets the time and care gates for automatic evolution.
pub fn is_due(pet: &Pet, cadence: Cadence, bedtime: bool) -> bool {
    pet.stage() <= MAX_AUTO_EVOLUTION_STAGE
        && cadence.whole_minutes(pet.timer) >= u64::from(pet.species.time)
        && !need_care(pet, bedtime)
}

fn target_version(pet: &Pet, path: &EvolutionPath) -> u32 {
    path.version.unwrap_or_else(|| pet.version())
}

/// Fail with [`PetError::SpecialLocked`] if the target is a locked special.
fn check_special(
    module: &ModuleConfig,
    unlocks: &impl UnlockRegistry,
    target: &str,
    version: u32,
) -> Result<(), PetError> {
    let species = module.require_monster(target, version)?;
    match species.special_key.as_deref() {
        Some(key)
            if species.special && !unlocks.is_unlocked(&module.name, UnlockKind::Evolution, key) =>
        {
            Err(PetError::SpecialLocked {
                target: target.to_owned(),
                key: key.to_owned(),
            })
        }
        _ => Ok(()),
    }
}

/// Fail with [`PetError::StageRegression`] unless `target` is at a later
/// stage than the pet.
fn check_stage(pet: &Pet, target: &SpeciesData) -> Result<(), PetError> {
    if target.stage > pet.stage() {
        Ok(())
    } else {
        Err(PetError::StageRegression {
            name: pet.name().to_owned(),
            target: target.name.clone(),
            from: pet.stage(),
            to: target.stage,
        })
    }
}

/// Evolve along `path`: grant unlocks, set the shook flag for shaken eggs,
/// and swap the species in.
///
/// The target is resolved and its stage checked before anything changes,
/// so an unknown or earlier-stage target leaves the pet untouched.
fn apply_path(
    pet: &mut Pet,
    module: &ModuleConfig,
    unlocks: &mut impl UnlockRegistry,
    path: &EvolutionPath,
) -> Result<Evolution, PetError> {
    let version = target_version(pet, path);
    let target = module.require_monster(&path.to, version)?;
    check_stage(pet, target)?;

    let unlocked = module
        .evolution_unlocks(&path.to)
        .filter(|rule| unlocks.unlock(&module.name, UnlockKind::Evolution, &rule.name))
        .map(|rule| rule.name.clone())
        .collect();

    if pet.stage() == 0 && module.enable_shaken_egg && pet.egg_shakes >= SHAKEN_EGG_THRESHOLD {
        pet.shook = true;
    }

    let from = pet.name().to_owned();
    evolve_to(pet, module, target);
    Ok(Evolution {
        from,
        to: path.to.clone(),
        version,
        unlocked,
    })
}

/// Run the minute evolution check.
///
/// Returns the evolution if one happened. Locked special targets and targets
/// that are not at a later stage are skipped in favour of later paths; an
/// unknown target aborts the check and leaves the pet unchanged.
pub fn update_evolution(
    pet: &mut Pet,
    module: &ModuleConfig,
    unlocks: &mut impl UnlockRegistry,
    cadence: Cadence,
    bedtime: bool,
) -> Option<Evolution> {
    if pet.is_dead() || !is_due(pet, cadence, bedtime) {
        return None;
    }

    let mut chosen = None;
    for path in &pet.species.evolve {
        if path.is_triggered() || !path_matches(pet, path) {
            continue;
        }
        let version = target_version(pet, path);
        match module
            .require_monster(&path.to, version)
            .and_then(|target| check_stage(pet, target))
        {
            Ok(()) => {}
            Err(e @ PetError::StageRegression { .. }) => {
                warn!(pet = %pet.id, error = %e, "Evolution path goes backwards, skipping");
                continue;
            }
            Err(e) => {
                warn!(pet = %pet.id, error = %e, "Evolution aborted");
                return None;
            }
        }
        if pet.stage() > 0 {
            match check_special(module, &*unlocks, &path.to, version) {
                Ok(()) => {}
                Err(PetError::SpecialLocked { target, key }) => {
                    info!(pet = %pet.id, target = %target, key = %key, "Special evolution locked, skipping");
                    continue;
                }
                Err(e) => {
                    warn!(pet = %pet.id, error = %e, "Evolution aborted");
                    return None;
                }
            }
        }
        chosen = Some(path.clone());
        break;
    }

    let path = chosen?;
    match apply_path(pet, module, unlocks, &path) {
        Ok(evolution) => Some(evolution),
        Err(e) => {
            warn!(pet = %pet.id, error = %e, "Evolution aborted");
            None
        }
    }
}

fn triggered_evolution(
    pet: &mut Pet,
    module: &ModuleConfig,
    unlocks: &mut impl UnlockRegistry,
    trigger: &str,
    pick: impl Fn(&EvolutionPath) -> bool,
) -> Result<Evolution, PetError> {
    if pet.is_dead() {
        return Err(PetError::PetDead(pet.name().to_owned()));
    }
    let path = pet
        .species
        .evolve
        .iter()
        .find(|p| pick(p))
        .cloned()
        .ok_or_else(|| PetError::NoMatchingPath {
            name: pet.name().to_owned(),
            trigger: trigger.to_owned(),
        })?;
    check_special(module, &*unlocks, &path.to, target_version(pet, &path))?;
    apply_path(pet, module, unlocks, &path)
}

/// Evolve by using `item` on the pet.
pub fn evolve_by_item(
    pet: &mut Pet,
    module: &ModuleConfig,
    unlocks: &mut impl UnlockRegistry,
    item: &str,
) -> Result<Evolution, PetError> {
    triggered_evolution(pet, module, unlocks, item, |p| p.item.as_deref() == Some(item))
}

/// Evolve by fusing with a `partner` species.
pub fn jogress(
    pet: &mut Pet,
    module: &ModuleConfig,
    unlocks: &mut impl UnlockRegistry,
    partner: &str,
) -> Result<Evolution, PetError> {
    if !pet.species.jogress_available {
        return Err(PetError::NoMatchingPath {
            name: pet.name().to_owned(),
            trigger: partner.to_owned(),
        });
    }
    triggered_evolution(pet, module, unlocks, partner, |p| {
        p.jogress.as_deref() == Some(partner)
    })
}
