//! Tick callback that reports the roster once per simulated hour.

use tracing::{debug, info};
use vpet_core::{SimulationState, TickCallback, TickSummary};

/// Logs a roster summary every simulated hour and every death or evolution
/// as it happens.
pub struct HourlyLog {
    period: u64,
}

impl HourlyLog {
    /// Create a callback reporting every hour of `state`'s clock.
    pub fn new(state: &SimulationState) -> Self {
        Self {
            period: state.cadence().hours(1),
        }
    }
}

impl TickCallback for HourlyLog {
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState) -> bool {
        if summary.evolutions > 0 || summary.deaths > 0 || summary.removed > 0 {
            debug!(
                tick = summary.tick,
                evolutions = summary.evolutions,
                deaths = summary.deaths,
                removed = summary.removed,
                traited_eggs = summary.traited_eggs,
                "Roster changed"
            );
        }

        if summary.tick.checked_rem(self.period) == Some(0) {
            for pet in &state.roster.pets {
                info!(
                    tick = summary.tick,
                    pet = %pet.id,
                    name = pet.name(),
                    stage = pet.stage(),
                    state = %pet.state,
                    hunger = pet.hunger,
                    strength = pet.strength,
                    mistakes = pet.mistakes,
                    age = pet.age,
                    "Hourly report"
                );
            }
            info!(
                tick = summary.tick,
                time = %state.now(),
                live_pets = summary.live_pets,
                dead_pets = summary.dead_pets,
                messes = summary.messes,
                "Hourly summary"
            );
        }
        true
    }
}
