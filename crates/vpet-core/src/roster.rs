//! The shared roster: pets, the mess queue, traited eggs and unlocks.
//!
//! Everything the pets of one device share lives here. The frame driver
//! borrows the fields separately so one pet can be mutated while it reads
//! the mess count and grants unlocks.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;
use vpet_lifecycle::InMemoryUnlocks;
use vpet_types::{Mess, Pet, PetId};

/// Pets and shared play-field state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    /// Pets in hatch order, including dead pets awaiting removal.
    pub pets: Vec<Pet>,
    /// Messes on the play field, oldest first.
    pub messes: Vec<Mess>,
    /// Traited eggs earned, keyed `module@version`.
    pub traited_eggs: BTreeSet<String>,
    /// Granted unlocks.
    pub unlocks: InMemoryUnlocks,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pet and return its id.
    pub fn add_pet(&mut self, pet: Pet) -> PetId {
        let id = pet.id;
        self.pets.push(pet);
        id
    }

    /// Look up a pet.
    pub fn pet(&self, id: PetId) -> Option<&Pet> {
        self.pets.iter().find(|p| p.id == id)
    }

    /// Look up a pet for mutation.
    pub fn pet_mut(&mut self, id: PetId) -> Option<&mut Pet> {
        self.pets.iter_mut().find(|p| p.id == id)
    }

    /// Number of pets that are not dead.
    pub fn live_count(&self) -> usize {
        self.pets.iter().filter(|p| !p.is_dead()).count()
    }

    /// Number of dead pets still on the roster.
    pub fn dead_count(&self) -> usize {
        self.pets.len().saturating_sub(self.live_count())
    }

    /// Whether the roster holds no pet at all.
    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }

    /// Remove every mess. Returns how many were cleaned.
    pub fn clean_messes(&mut self) -> usize {
        let cleaned = self.messes.len();
        self.messes.clear();
        if cleaned > 0 {
            info!(cleaned, "Messes cleaned");
        }
        cleaned
    }

    /// Record a traited egg. Returns `false` if it was already earned.
    pub fn grant_traited_egg(&mut self, key: &str) -> bool {
        let granted = self.traited_eggs.insert(key.to_owned());
        if granted {
            info!(key, "Traited egg granted");
        }
        granted
    }

    /// Whether a traited egg for `key` is available.
    pub fn has_traited_egg(&self, key: &str) -> bool {
        self.traited_eggs.contains(key)
    }

    /// Take a traited egg out of the set, for hatching.
    pub fn take_traited_egg(&mut self, key: &str) -> bool {
        self.traited_eggs.remove(key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vpet_types::{MessId, PetState};

    use super::*;

    #[test]
    fn lookup_by_id() {
        let mut roster = Roster::new();
        let a = roster.add_pet(Pet::default());
        let b = roster.add_pet(Pet::default());
        assert_ne!(a, b);
        assert_eq!(roster.pet(b).unwrap().id, b);
        roster.pet_mut(a).unwrap().hunger = 3;
        assert_eq!(roster.pet(a).unwrap().hunger, 3);
        assert!(roster.pet(PetId::new()).is_none());
    }

    #[test]
    fn counts_live_and_dead() {
        let mut roster = Roster::new();
        roster.add_pet(Pet::default());
        roster.add_pet(Pet {
            state: PetState::Dead,
            ..Pet::default()
        });
        assert_eq!(roster.live_count(), 1);
        assert_eq!(roster.dead_count(), 1);
    }

    #[test]
    fn cleaning_empties_the_field() {
        let mut roster = Roster::new();
        for x in [10, 40] {
            roster.messes.push(Mess {
                id: MessId::new(),
                x,
                large: false,
            });
        }
        assert_eq!(roster.clean_messes(), 2);
        assert_eq!(roster.clean_messes(), 0);
    }

    #[test]
    fn traited_eggs_are_granted_once() {
        let mut roster = Roster::new();
        assert!(roster.grant_traited_egg("DMC@1"));
        assert!(!roster.grant_traited_egg("DMC@1"));
        assert!(roster.has_traited_egg("DMC@1"));
        assert!(roster.take_traited_egg("DMC@1"));
        assert!(!roster.has_traited_egg("DMC@1"));
    }
}
