//! Battle power, training and battle outcomes.
//!
//! Power is ruleset-specific:
//!
//! | ruleset | bonus on top of `power + bonus` |
//! |---------|---------------------------------|
//! | dmc     | effort >= 16: stage 3/4/5/6+ gives 5/8/15/25, doubled when traited |
//! | penc    | effort >= 16: 5/8/15/20 by stage; the same table again when traited; +10 when shook |
//! | dmx     | effort >= 16: +16 (version > 4) or +15; +10 at each of levels 3, 6, 9 |
//!
//! Losing a battle rolls for sickness against a chance built from the
//! module base rate plus protein overdose and disturbance penalty, clamped
//! to `[0.05, 0.5]`.

use rand::Rng;
use tracing::{debug, info};
use vpet_types::{ENEMY_STAGE_SLOTS, MAX_STRENGTH, Pet, PetState, Ruleset, SaveWindow};

use crate::config::ModuleConfig;
use crate::pet::set_state;

/// Effort needed before strength bonuses apply.
pub const EFFORT_BONUS_THRESHOLD: u32 = 16;

/// Lowest possible sickness chance after a battle.
pub const MIN_SICK_CHANCE: f64 = 0.05;

/// Highest possible sickness chance after a battle.
pub const MAX_SICK_CHANCE: f64 = 0.5;

/// Base attack by stage.
pub const ATK_LEVEL: [u32; 11] = [0, 0, 1, 2, 3, 4, 5, 5, 5, 5, 5];

/// Base HP by stage, used when the species sheet has none.
pub const HP_LEVEL: [u32; 11] = [0, 0, 6, 8, 10, 12, 14, 14, 14, 14, 14];

/// Look up a stage table, saturating at the last entry.
fn stage_value(table: &[u32; 11], stage: u8) -> u32 {
    table
        .get(usize::from(stage))
        .or_else(|| table.last())
        .copied()
        .unwrap_or(0)
}

/// Stage bonus table shared by the dmc and penc rulesets.
const fn stage_bonus(stage: u8, adult: u32) -> u32 {
    match stage {
        3 => 5,
        4 => 8,
        5 => 15,
        s if s >= 6 => adult,
        _ => 0,
    }
}

fn dmc_bonus(pet: &Pet) -> u32 {
    if pet.effort < EFFORT_BONUS_THRESHOLD {
        return 0;
    }
    let multiplier = if pet.traited { 2 } else { 1 };
    stage_bonus(pet.stage(), 25).saturating_mul(multiplier)
}

fn penc_bonus(pet: &Pet) -> u32 {
    let strength = if pet.effort >= EFFORT_BONUS_THRESHOLD {
        stage_bonus(pet.stage(), 20)
    } else {
        0
    };
    let traited = if pet.traited {
        stage_bonus(pet.stage(), 20)
    } else {
        0
    };
    let shaken = if pet.shook { 10 } else { 0 };
    strength.saturating_add(traited).saturating_add(shaken)
}

fn dmx_bonus(pet: &Pet) -> u32 {
    let mut bonus: u32 = 0;
    if pet.effort >= EFFORT_BONUS_THRESHOLD {
        bonus = if pet.version() > 4 { 16 } else { 15 };
    }
    for threshold in [3, 6, 9] {
        if pet.level >= threshold {
            bonus = bonus.saturating_add(10);
        }
    }
    bonus
}

/// Ruleset bonus power for the pet's current effort, stage and traits.
pub fn ruleset_bonus(ruleset: Ruleset, pet: &Pet) -> u32 {
    match ruleset {
        Ruleset::Dmc => dmc_bonus(pet),
        Ruleset::Penc => penc_bonus(pet),
        Ruleset::Dmx => dmx_bonus(pet),
    }
}

/// Battle power including an external `bonus` (e.g. supplements).
pub fn get_power(pet: &Pet, ruleset: Ruleset, bonus: u32) -> u32 {
    pet.species
        .power
        .saturating_add(bonus)
        .saturating_add(ruleset_bonus(ruleset, pet))
}

/// Attack strength: stage base plus one at level 4 and one at level 7.
pub fn get_attack(pet: &Pet) -> u32 {
    let mut attack = stage_value(&ATK_LEVEL, pet.stage());
    if pet.level >= 4 {
        attack = attack.saturating_add(1);
    }
    if pet.level >= 7 {
        attack = attack.saturating_add(1);
    }
    attack
}

/// Battle HP: species HP (or the stage table) plus 2 at levels 2, 5, 6, 10.
pub fn get_hp(pet: &Pet) -> u32 {
    let base = if pet.species.hp == 0 {
        stage_value(&HP_LEVEL, pet.stage())
    } else {
        pet.species.hp
    };
    [2, 5, 6, 10]
        .into_iter()
        .filter(|&l| pet.level >= l)
        .fold(base, |hp, _| hp.saturating_add(2))
}

/// Whether the pet can fight battles.
pub const fn can_battle(pet: &Pet) -> bool {
    pet.species.stage > 1 && pet.species.power > 0 && !pet.is_dead() && pet.species.atk_main > 0
}

/// Whether the pet can train.
pub const fn can_train(pet: &Pet) -> bool {
    pet.species.stage > 1 && !pet.is_dead() && pet.species.atk_main > 0
}

/// Make the pet sick (battle injury or mess overflow).
///
/// Sets the required medicine doses, counts an injury and re-enables the
/// button death save.
pub fn set_sick(pet: &mut Pet) {
    if pet.is_dead() {
        return;
    }
    pet.sick = pet.species.heal_doses;
    pet.injuries = pet.injuries.saturating_add(1);
    pet.button_save = SaveWindow::Ready;
    set_state(pet, PetState::Sick, false);
    info!(pet = %pet.id, injuries = pet.injuries, doses = pet.sick, "Pet got sick");
}

/// Apply the result of a training session.
pub fn finish_training(pet: &mut Pet, module: &ModuleConfig, won: bool) {
    if pet.is_dead() {
        return;
    }
    if won {
        set_state(pet, PetState::Happy2, false);
        pet.effort = pet.effort.saturating_add(module.training_effort_gain);
        pet.disturbance_penalty = pet.disturbance_penalty.saturating_sub(2);
    } else {
        set_state(pet, PetState::Angry, false);
    }

    pet.strength = pet
        .strength
        .saturating_add(module.training_strength_gain)
        .min(MAX_STRENGTH);

    let loss = if won {
        module.training_weight_win
    } else {
        module.training_weight_lose
    };
    pet.weight = pet.weight.saturating_sub(loss).max(pet.species.min_weight);
    debug!(pet = %pet.id, won, effort = pet.effort, strength = pet.strength, "Training finished");
}

/// Apply the result of a versus (pet against pet) battle.
///
/// Only the battle record changes; versus costs no DP and never sickens.
pub fn finish_versus(pet: &mut Pet, won: bool) {
    if pet.is_dead() {
        return;
    }
    pet.record.battles = pet.record.battles.saturating_add(1);
    pet.record.total_battles = pet.record.total_battles.saturating_add(1);
    if won {
        set_state(pet, PetState::Happy3, false);
        pet.record.win = pet.record.win.saturating_add(1);
        pet.record.total_win = pet.record.total_win.saturating_add(1);
    }
}

/// Sickness chance after a battle, as a probability.
///
/// `protein_overdose` and `disturbance_penalty` only count for a lost battle
/// and are each capped by the module.
pub fn sickness_chance(
    module: &ModuleConfig,
    won: bool,
    protein_overdose: u32,
    disturbance_penalty: u32,
) -> f64 {
    let percent = if won {
        module.battle_base_sick_chance_win
    } else {
        module
            .battle_base_sick_chance_lose
            .saturating_add(protein_overdose.min(module.protein_overdose_max).saturating_mul(10))
            .saturating_add(disturbance_penalty.min(module.disturbance_penalty_max))
    };
    (f64::from(percent) / 100.0).clamp(MIN_SICK_CHANCE, MAX_SICK_CHANCE)
}

/// Outcome of a battle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattleOutcome {
    /// The sickness chance that was rolled against.
    pub sick_chance: f64,
    /// Whether the pet got sick.
    pub got_sick: bool,
}

/// Apply the result of an adventure battle against an enemy of
/// `enemy_stage` in `area`.
pub fn finish_battle(
    pet: &mut Pet,
    module: &ModuleConfig,
    won: bool,
    enemy_stage: u8,
    area: u32,
    rng: &mut impl Rng,
) -> BattleOutcome {
    if pet.is_dead() {
        return BattleOutcome {
            sick_chance: 0.0,
            got_sick: false,
        };
    }

    pet.record.battles = pet.record.battles.saturating_add(1);
    pet.record.total_battles = pet.record.total_battles.saturating_add(1);
    pet.dp = pet.dp.saturating_sub(1);

    if won {
        set_state(pet, PetState::Happy3, false);
        pet.record.win = pet.record.win.saturating_add(1);
        pet.record.total_win = pet.record.total_win.saturating_add(1);
        if area > pet.record.area {
            debug!(pet = %pet.id, previous = pet.record.area, area, "Area record raised");
            pet.record.area = area;
        }
        let slot = usize::from(enemy_stage).min(ENEMY_STAGE_SLOTS.saturating_sub(1));
        if let Some(kills) = pet.record.enemy_kills.get_mut(slot) {
            *kills = kills.saturating_add(1);
        }
    } else {
        pet.protein_overdose = pet.protein_overdose.min(module.protein_overdose_max);
        pet.disturbance_penalty = pet.disturbance_penalty.min(module.disturbance_penalty_max);
    }

    let sick_chance = sickness_chance(module, won, pet.protein_overdose, pet.disturbance_penalty);
    let got_sick = rng.random::<f64>() < sick_chance;
    if got_sick {
        set_sick(pet);
    }

    info!(
        pet = %pet.id,
        won,
        enemy_stage,
        area,
        sick_chance,
        got_sick,
        "Battle finished"
    );
    BattleOutcome {
        sick_chance,
        got_sick,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::pet::tests::{test_module, test_pet};

    fn trained(stage: u8) -> Pet {
        let mut pet = test_pet();
        pet.species.stage = stage;
        pet.effort = 16;
        pet
    }

    #[test]
    fn dmc_table() {
        assert_eq!(get_power(&trained(3), Ruleset::Dmc, 0), 35);
        assert_eq!(get_power(&trained(5), Ruleset::Dmc, 0), 45);
        assert_eq!(get_power(&trained(7), Ruleset::Dmc, 0), 55);
        let mut traited = trained(4);
        traited.traited = true;
        assert_eq!(get_power(&traited, Ruleset::Dmc, 0), 46);
        let untrained = test_pet();
        assert_eq!(get_power(&untrained, Ruleset::Dmc, 3), 33);
    }

    #[test]
    fn penc_table_stacks_bonuses() {
        let mut pet = trained(6);
        assert_eq!(get_power(&pet, Ruleset::Penc, 0), 50);
        pet.traited = true;
        pet.shook = true;
        assert_eq!(get_power(&pet, Ruleset::Penc, 0), 80);
        pet.effort = 0;
        assert_eq!(get_power(&pet, Ruleset::Penc, 0), 60);
    }

    #[test]
    fn dmx_table_counts_levels() {
        let mut pet = trained(4);
        pet.level = 6;
        assert_eq!(get_power(&pet, Ruleset::Dmx, 0), 30 + 15 + 20);
        pet.species.version = 5;
        pet.level = 9;
        assert_eq!(get_power(&pet, Ruleset::Dmx, 0), 30 + 16 + 30);
    }

    #[test]
    fn attack_and_hp_scale_with_level() {
        let mut pet = test_pet();
        pet.level = 1;
        assert_eq!(get_attack(&pet), 2);
        assert_eq!(get_hp(&pet), 8);
        pet.level = 7;
        assert_eq!(get_attack(&pet), 4);
        assert_eq!(get_hp(&pet), 14);
        pet.species.hp = 20;
        pet.level = 10;
        assert_eq!(get_hp(&pet), 28);
    }

    #[test]
    fn training_win_adds_effort_and_clamps_strength() {
        let module = ModuleConfig {
            training_strength_gain: 3,
            ..test_module()
        };
        let mut pet = test_pet();
        pet.strength = 3;
        pet.disturbance_penalty = 1;
        pet.weight = 21;
        finish_training(&mut pet, &module, true);
        assert_eq!(pet.strength, MAX_STRENGTH);
        assert_eq!(pet.effort, module.training_effort_gain);
        assert_eq!(pet.disturbance_penalty, 0);
        assert_eq!(pet.weight, pet.species.min_weight);
        assert_eq!(pet.state, PetState::Happy2);
    }

    #[test]
    fn training_loss_makes_pet_angry() {
        let module = test_module();
        let mut pet = test_pet();
        finish_training(&mut pet, &module, false);
        assert_eq!(pet.state, PetState::Angry);
        assert_eq!(pet.effort, 0);
    }

    #[test]
    fn sickness_chance_is_clamped() {
        let module = test_module();
        assert!((sickness_chance(&module, true, 0, 0) - 0.1).abs() < f64::EPSILON);
        assert!((sickness_chance(&module, false, 100, 100) - MAX_SICK_CHANCE).abs() < f64::EPSILON);
        let gentle = ModuleConfig {
            battle_base_sick_chance_win: 0,
            ..test_module()
        };
        assert!((sickness_chance(&gentle, true, 0, 0) - MIN_SICK_CHANCE).abs() < f64::EPSILON);
    }

    #[test]
    fn won_battle_updates_record() {
        let module = test_module();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut pet = test_pet();
        pet.record.area = 3;
        finish_battle(&mut pet, &module, true, 5, 7, &mut rng);
        finish_battle(&mut pet, &module, true, 200, 2, &mut rng);
        assert_eq!(pet.record.battles, 2);
        assert_eq!(pet.record.win, 2);
        assert_eq!(pet.record.area, 7);
        assert_eq!(pet.record.kills_at(5), 1);
        assert_eq!(pet.record.kills_at(ENEMY_STAGE_SLOTS - 1), 1);
        assert_eq!(pet.dp, pet.species.energy - 2);
    }

    #[test]
    fn lost_battle_clamps_counters_in_place() {
        let module = test_module();
        let mut rng = SmallRng::seed_from_u64(7);
        let mut pet = test_pet();
        pet.protein_overdose = 50;
        pet.disturbance_penalty = 50;
        let outcome = finish_battle(&mut pet, &module, false, 3, 1, &mut rng);
        assert_eq!(pet.protein_overdose, module.protein_overdose_max);
        assert_eq!(pet.disturbance_penalty, module.disturbance_penalty_max);
        assert!((outcome.sick_chance - MAX_SICK_CHANCE).abs() < f64::EPSILON);
        assert_eq!(outcome.got_sick, pet.sick > 0);
    }

    #[test]
    fn set_sick_rearms_button_save() {
        let mut pet = test_pet();
        pet.button_save = SaveWindow::Spent;
        set_sick(&mut pet);
        assert_eq!(pet.sick, 1);
        assert_eq!(pet.injuries, 1);
        assert_eq!(pet.button_save, SaveWindow::Ready);
        assert_eq!(pet.state, PetState::Sick);
    }

    #[test]
    fn versus_costs_no_dp() {
        let mut pet = test_pet();
        finish_versus(&mut pet, true);
        finish_versus(&mut pet, false);
        assert_eq!(pet.record.total_battles, 2);
        assert_eq!(pet.record.total_win, 1);
        assert_eq!(pet.dp, pet.species.energy);
    }

    #[test]
    fn battle_eligibility() {
        let mut pet = test_pet();
        assert!(can_battle(&pet));
        assert!(can_train(&pet));
        pet.species.power = 0;
        assert!(!can_battle(&pet));
        assert!(can_train(&pet));
        pet.species.stage = 1;
        assert!(!can_train(&pet));
    }
}
