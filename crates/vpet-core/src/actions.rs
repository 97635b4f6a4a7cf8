//! Player actions and queries on roster pets.
//!
//! Every entry point looks the pet up by [`PetId`] and resolves its module
//! before touching anything, so a missing pet or module leaves the roster
//! unchanged. The rules themselves live in `vpet-lifecycle`; this layer adds
//! the lookups, the shared state (mess queue, unlocks, RNG) and the effects.

use tracing::info;
use vpet_lifecycle::battle::{finish_battle, finish_training, finish_versus};
use vpet_lifecycle::death;
use vpet_lifecycle::evolution;
use vpet_lifecycle::experience;
use vpet_lifecycle::feeding;
use vpet_lifecycle::pet::set_state;
use vpet_lifecycle::sleep;
use vpet_lifecycle::{
    BattleOutcome, Evolution, ModuleConfig, PetError, call_sign, can_battle, can_train,
    get_attack, get_hp, get_power, need_care,
};
use vpet_types::{FoodKind, Pet, PetId, PetState, SoundCue};

use crate::effects::{DigidexEntry, Effects};
use crate::tick::SimulationState;

/// Errors returned by actions.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// No pet with this id is on the roster.
    #[error("pet not found: {0}")]
    PetNotFound(PetId),

    /// A lifecycle rule rejected the action.
    #[error("lifecycle error: {source}")]
    Pet {
        /// The underlying lifecycle error.
        #[from]
        source: PetError,
    },
}

fn pet_ref(state: &SimulationState, id: PetId) -> Result<&Pet, ActionError> {
    state.roster.pet(id).ok_or(ActionError::PetNotFound(id))
}

fn pet_mut(state: &mut SimulationState, id: PetId) -> Result<&mut Pet, ActionError> {
    state.roster.pet_mut(id).ok_or(ActionError::PetNotFound(id))
}

/// Resolve the pet and its module together.
fn with_module(
    state: &mut SimulationState,
    id: PetId,
) -> Result<(&mut Pet, &ModuleConfig), ActionError> {
    let pet = state.roster.pet_mut(id).ok_or(ActionError::PetNotFound(id))?;
    let module = state.catalog.get(&pet.module)?;
    Ok((pet, module))
}

fn whether_bedtime(state: &SimulationState, pet: &Pet) -> bool {
    sleep::should_sleep(pet, state.now().time())
}

// ---------------------------------------------------------------------------
// Care
// ---------------------------------------------------------------------------

/// Offer food. Returns whether the pet accepted it.
pub fn feed(
    state: &mut SimulationState,
    id: PetId,
    kind: FoodKind,
    amount: u32,
) -> Result<bool, ActionError> {
    let (pet, module) = with_module(state, id)?;
    Ok(feeding::feed(pet, module, kind, amount))
}

/// Give one dose of medicine. Returns `false` if the pet was not sick.
pub fn heal(state: &mut SimulationState, id: PetId) -> Result<bool, ActionError> {
    Ok(feeding::heal(pet_mut(state, id)?))
}

/// Start the pooping animation now.
pub fn force_defecate(state: &mut SimulationState, id: PetId) -> Result<bool, ActionError> {
    let pet = pet_mut(state, id)?;
    if pet.is_asleep() || pet.stage() == 0 {
        return Ok(false);
    }
    Ok(set_state(pet, PetState::Pooping, false))
}

/// Remove every mess from the field. Returns how many were cleaned.
pub fn clean_messes(state: &mut SimulationState, effects: &mut dyn Effects) -> usize {
    let cleaned = state.roster.clean_messes();
    if cleaned > 0 {
        for pet in state.roster.pets.iter_mut().filter(|p| !p.is_asleep()) {
            set_state(pet, PetState::Happy1, false);
        }
        effects.play(SoundCue::Cancel);
    }
    cleaned
}

/// Wake a sleeping pet (lights on). Returns `false` if it was awake.
pub fn disturb_sleep(state: &mut SimulationState, id: PetId) -> Result<bool, ActionError> {
    let (pet, module) = with_module(state, id)?;
    Ok(sleep::disturb_sleep(pet, module))
}

/// Put the pet to sleep (lights off).
pub fn put_to_sleep(state: &mut SimulationState, id: PetId) -> Result<bool, ActionError> {
    Ok(sleep::put_to_sleep(pet_mut(state, id)?))
}

/// Answer a running button save window.
pub fn press_save_button(state: &mut SimulationState, id: PetId) -> Result<bool, ActionError> {
    Ok(death::press_save_button(pet_mut(state, id)?))
}

/// Shake the device: counts towards a shaken egg or answers a shake window.
pub fn shake(state: &mut SimulationState, id: PetId) -> Result<bool, ActionError> {
    Ok(death::shake(pet_mut(state, id)?))
}

// ---------------------------------------------------------------------------
// Training and battle
// ---------------------------------------------------------------------------

/// Apply a training result.
pub fn train_result(state: &mut SimulationState, id: PetId, won: bool) -> Result<(), ActionError> {
    let (pet, module) = with_module(state, id)?;
    finish_training(pet, module, won);
    Ok(())
}

/// Apply an adventure battle result and roll for sickness.
pub fn battle_result(
    state: &mut SimulationState,
    id: PetId,
    won: bool,
    enemy_stage: u8,
    area: u32,
) -> Result<BattleOutcome, ActionError> {
    let pet = state.roster.pet_mut(id).ok_or(ActionError::PetNotFound(id))?;
    let module = state.catalog.get(&pet.module)?;
    Ok(finish_battle(pet, module, won, enemy_stage, area, &mut state.rng))
}

/// Apply a versus (pet against pet) result.
pub fn versus_result(state: &mut SimulationState, id: PetId, won: bool) -> Result<(), ActionError> {
    finish_versus(pet_mut(state, id)?, won);
    Ok(())
}

/// Award experience. Returns whether the pet levelled up.
pub fn add_experience(state: &mut SimulationState, id: PetId, xp: u32) -> Result<bool, ActionError> {
    Ok(experience::add_experience(pet_mut(state, id)?, xp))
}

// ---------------------------------------------------------------------------
// Triggered evolution
// ---------------------------------------------------------------------------

fn announce(effects: &mut dyn Effects, module: &str, evolution: &Evolution) {
    effects.play(SoundCue::Evolution);
    effects.register_digidex(&DigidexEntry {
        name: evolution.to.clone(),
        module: module.to_owned(),
        version: evolution.version,
    });
}

/// Evolve by using `item` on the pet.
pub fn evolve_by_item(
    state: &mut SimulationState,
    effects: &mut dyn Effects,
    id: PetId,
    item: &str,
) -> Result<Evolution, ActionError> {
    let pet = state.roster.pets.iter_mut().find(|p| p.id == id).ok_or(ActionError::PetNotFound(id))?;
    let module = state.catalog.get(&pet.module)?;
    let evolution = evolution::evolve_by_item(pet, module, &mut state.roster.unlocks, item)?;
    announce(effects, &module.name, &evolution);
    Ok(evolution)
}

/// Fuse the pet with a `partner` species.
pub fn jogress(
    state: &mut SimulationState,
    effects: &mut dyn Effects,
    id: PetId,
    partner: &str,
) -> Result<Evolution, ActionError> {
    let pet = state.roster.pets.iter_mut().find(|p| p.id == id).ok_or(ActionError::PetNotFound(id))?;
    let module = state.catalog.get(&pet.module)?;
    let evolution = evolution::jogress(pet, module, &mut state.roster.unlocks, partner)?;
    info!(pet = %id, partner, to = %evolution.to, "Jogress");
    announce(effects, &module.name, &evolution);
    Ok(evolution)
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Battle power with the ruleset bonus and an external `bonus`.
pub fn power(state: &SimulationState, id: PetId, bonus: u32) -> Result<u32, ActionError> {
    let pet = pet_ref(state, id)?;
    let ruleset = state.catalog.get(&pet.module)?.ruleset;
    Ok(get_power(pet, ruleset, bonus))
}

/// Attack strength.
pub fn attack(state: &SimulationState, id: PetId) -> Result<u32, ActionError> {
    Ok(get_attack(pet_ref(state, id)?))
}

/// Battle HP.
pub fn hp(state: &SimulationState, id: PetId) -> Result<u32, ActionError> {
    Ok(get_hp(pet_ref(state, id)?))
}

/// Whether the pet may go on an adventure battle.
pub fn battle_ready(state: &SimulationState, id: PetId) -> Result<bool, ActionError> {
    Ok(can_battle(pet_ref(state, id)?))
}

/// Whether the pet may train.
pub fn training_ready(state: &SimulationState, id: PetId) -> Result<bool, ActionError> {
    Ok(can_train(pet_ref(state, id)?))
}

/// Whether the pet has an unmet need right now.
pub fn needs_care(state: &SimulationState, id: PetId) -> Result<bool, ActionError> {
    let pet = pet_ref(state, id)?;
    Ok(need_care(pet, whether_bedtime(state, pet)))
}

/// Whether the attention icon should show.
pub fn calling(state: &SimulationState, id: PetId) -> Result<bool, ActionError> {
    let pet = pet_ref(state, id)?;
    let module = state.catalog.get(&pet.module)?;
    Ok(call_sign(pet, module, whether_bedtime(state, pet)))
}

/// Stage and lifetime win ratios, in percent.
pub fn win_ratios(state: &SimulationState, id: PetId) -> Result<(u32, u32), ActionError> {
    let record = pet_ref(state, id)?.record;
    Ok((record.win_ratio(), record.total_win_ratio()))
}
