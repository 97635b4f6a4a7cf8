//! Feeding and medicine.

use tracing::{debug, info};
use vpet_types::{FoodKind, MAX_STRENGTH, Pet, PetState};

use crate::battle::can_battle;
use crate::config::ModuleConfig;
use crate::pet::set_state;
use crate::sleep::arm_back_to_sleep;

/// Weight at or above which food adds no more weight.
pub const MAX_WEIGHT_FOR_GAIN: u32 = 99;

/// Every this many proteins restores DP.
pub const PROTEINS_PER_DP: u32 = 4;

fn gain_weight(pet: &mut Pet, gain: u32) {
    if pet.stage() > 1 && pet.weight < MAX_WEIGHT_FOR_GAIN {
        pet.weight = pet.weight.saturating_add(gain);
    }
}

/// Offer `amount` of `kind` to the pet. Returns whether it was accepted.
///
/// Meat offered to a full (or still overfed) pet is refused; the first
/// refusal starts the overfeed timer and counts an overfeed. Protein is
/// always accepted and every fourth one restores DP. Supplements are only
/// accepted by pets able to battle.
pub fn feed(pet: &mut Pet, module: &ModuleConfig, kind: FoodKind, amount: u32) -> bool {
    if pet.is_dead() || (pet.is_asleep() && !module.can_eat_sleeping) {
        return false;
    }
    let was_asleep = pet.is_asleep();

    let accepted = match kind {
        FoodKind::Hunger => {
            if pet.hunger >= pet.species.stomach || pet.overfeed_timer > 0 {
                if pet.overfeed_timer == 0 {
                    pet.overfeed_timer = module.overfeed_timer;
                    pet.overfeed = pet.overfeed.saturating_add(1);
                    info!(pet = %pet.id, overfeed = pet.overfeed, "Overfed");
                }
                set_state(pet, PetState::Nope, false);
                false
            } else {
                set_state(pet, PetState::Eat, true);
                pet.hunger = pet.hunger.saturating_add(amount).min(pet.species.stomach);
                gain_weight(pet, module.meat_weight_gain);
                pet.care.food = 0;
                true
            }
        }
        FoodKind::Strength => {
            set_state(pet, PetState::Eat, false);
            pet.strength = pet.strength.saturating_add(amount).min(MAX_STRENGTH);
            pet.protein_overdose = pet.protein_overdose.saturating_add(1);
            gain_weight(pet, module.protein_weight_gain);
            if pet.dp < pet.species.energy && pet.protein_overdose.checked_rem(PROTEINS_PER_DP) == Some(0) {
                pet.dp = pet
                    .dp
                    .saturating_add(module.protein_dp_gain)
                    .min(pet.species.energy);
            }
            pet.care.strength = 0;
            true
        }
        FoodKind::Supplement => {
            if can_battle(pet) {
                set_state(pet, PetState::Eat, false);
                true
            } else {
                set_state(pet, PetState::Nope, false);
                false
            }
        }
    };

    if was_asleep && !pet.is_asleep() {
        arm_back_to_sleep(pet, module);
    }

    debug!(
        pet = %pet.id,
        food = ?kind,
        accepted,
        hunger = pet.hunger,
        strength = pet.strength,
        "Fed"
    );
    accepted
}

/// Give one dose of medicine. Returns `false` if the pet is not sick.
pub fn heal(pet: &mut Pet) -> bool {
    if pet.is_dead() || pet.sick == 0 {
        return false;
    }
    pet.sick = pet.sick.saturating_sub(1);
    if pet.sick == 0 {
        set_state(pet, PetState::Happy1, false);
        info!(pet = %pet.id, "Pet cured");
    }
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pet::tests::{test_module, test_pet};

    #[test]
    fn full_pet_refuses_meat_and_counts_overfeed() {
        let module = test_module();
        let mut pet = test_pet();
        pet.species.stomach = 5;
        pet.hunger = 5;
        assert!(!feed(&mut pet, &module, FoodKind::Hunger, 1));
        assert!(pet.overfeed_timer > 0);
        assert_eq!(pet.overfeed, 1);
        assert_eq!(pet.state, PetState::Nope);

        assert!(!feed(&mut pet, &module, FoodKind::Hunger, 1));
        assert_eq!(pet.overfeed, 1);
    }

    #[test]
    fn meat_fills_up_to_stomach() {
        let module = test_module();
        let mut pet = test_pet();
        pet.hunger = 3;
        pet.care.food = 4;
        assert!(feed(&mut pet, &module, FoodKind::Hunger, 5));
        assert_eq!(pet.hunger, pet.species.stomach);
        assert_eq!(pet.care.food, 0);
        assert_eq!(pet.weight, pet.species.min_weight + module.meat_weight_gain);
        assert_eq!(pet.state, PetState::Eat);
    }

    #[test]
    fn every_fourth_protein_restores_dp() {
        let module = test_module();
        let mut pet = test_pet();
        pet.dp = 0;
        for _ in 0..3 {
            feed(&mut pet, &module, FoodKind::Strength, 1);
        }
        assert_eq!(pet.dp, 0);
        feed(&mut pet, &module, FoodKind::Strength, 1);
        assert_eq!(pet.dp, module.protein_dp_gain);
        assert_eq!(pet.strength, MAX_STRENGTH);
    }

    #[test]
    fn sleeping_pet_refuses_unless_module_allows() {
        let mut pet = test_pet();
        pet.state = PetState::Nap;
        assert!(!feed(&mut pet, &test_module(), FoodKind::Strength, 1));

        let module = ModuleConfig {
            can_eat_sleeping: true,
            ..test_module()
        };
        assert!(feed(&mut pet, &module, FoodKind::Strength, 1));
        assert_eq!(pet.back_to_sleep, module.back_to_sleep_time);
    }

    #[test]
    fn supplement_requires_battle_ability() {
        let module = test_module();
        let mut pet = test_pet();
        assert!(feed(&mut pet, &module, FoodKind::Supplement, 1));
        pet.species.power = 0;
        assert!(!feed(&mut pet, &module, FoodKind::Supplement, 1));
    }

    #[test]
    fn heal_consumes_doses() {
        let mut pet = test_pet();
        assert!(!heal(&mut pet));
        pet.sick = 2;
        assert!(heal(&mut pet));
        assert_eq!(pet.sick, 1);
        assert!(heal(&mut pet));
        assert_eq!(pet.sick, 0);
    }
}
