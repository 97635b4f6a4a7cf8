//! Simulation loop runner.
//!
//! [`run_simulation`] drives [`run_tick`] until the configured frame limit
//! or a stop condition is reached. In real-time mode frames are paced by a
//! tokio interval at the configured frame rate; otherwise frames run back to
//! back on the simulated clock.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use crate::effects::Effects;
use crate::tick::{self, SimulationState, TickSummary};

/// Why the run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// The configured frame limit was reached.
    MaxTicksReached,
    /// Every pet died and was removed.
    RosterEmpty,
    /// The callback asked to stop.
    Stopped,
}

/// Result of a simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any frame ran.
    pub final_summary: Option<TickSummary>,
    /// Total number of frames executed.
    pub total_ticks: u64,
}

/// Callback invoked after each frame.
pub trait TickCallback: Send {
    /// Called after a frame completes. Return `false` to stop the run.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState) -> bool;
}

/// A callback that never stops the run.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) -> bool {
        true
    }
}

/// Run frames until a termination condition is met.
///
/// The run ends when `max_ticks` frames have run (0 = no limit), when the
/// roster empties after having held pets, or when the callback returns
/// `false`.
pub async fn run_simulation(
    state: &mut SimulationState,
    effects: &mut dyn Effects,
    callback: &mut dyn TickCallback,
) -> SimulationResult {
    let max_ticks = state.settings.max_ticks;
    let tps = u64::from(state.cadence().ticks_per_second());
    let mut pacer = state.settings.realtime.then(|| {
        let period = Duration::from_micros(1_000_000_u64.checked_div(tps).unwrap_or(1).max(1));
        let mut pacer = interval(period);
        pacer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        pacer
    });

    info!(
        max_ticks,
        ticks_per_second = tps,
        realtime = state.settings.realtime,
        pets = state.roster.pets.len(),
        "Simulation starting"
    );

    let mut total_ticks: u64 = 0;
    let had_pets = !state.roster.is_empty();

    loop {
        if let Some(pacer) = pacer.as_mut() {
            pacer.tick().await;
        }

        let now = state.now();
        let summary = tick::run_tick(state, effects, now);
        total_ticks = total_ticks.saturating_add(1);

        let keep_going = callback.on_tick(&summary, state);

        let end_reason = if !keep_going {
            Some(SimulationEndReason::Stopped)
        } else if had_pets && state.roster.is_empty() {
            Some(SimulationEndReason::RosterEmpty)
        } else if max_ticks > 0 && total_ticks >= max_ticks {
            Some(SimulationEndReason::MaxTicksReached)
        } else {
            None
        };

        if let Some(end_reason) = end_reason {
            info!(tick = summary.tick, reason = ?end_reason, "Simulation stopping");
            return SimulationResult {
                end_reason,
                final_summary: Some(summary),
                total_ticks,
            };
        }

        if pacer.is_none() && total_ticks.checked_rem(tps.saturating_mul(60)) == Some(0) {
            tokio::task::yield_now().await;
        }
    }
}

/// Log the outcome of a run.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        live_pets = result.final_summary.as_ref().map(|s| s.live_pets),
        "Simulation ended"
    );
    if result.final_summary.is_none() {
        warn!("Simulation ended with no frames executed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use vpet_lifecycle::ModuleConfig;
    use vpet_types::SpeciesData;

    use super::*;
    use crate::config::SimulationConfig;
    use crate::effects::NoopEffects;

    fn state(max_ticks: u64, dead_removal_ticks: u64) -> SimulationState {
        let mut config = SimulationConfig {
            modules: vec![ModuleConfig {
                name: String::from("DMC"),
                monsters: vec![SpeciesData {
                    name: String::from("Koromon"),
                    stage: 1,
                    version: 1,
                    stomach: 4,
                    ..SpeciesData::default()
                }],
                ..ModuleConfig::default()
            }],
            ..SimulationConfig::default()
        };
        config.simulation.max_ticks = max_ticks;
        config.simulation.dead_removal_ticks = dead_removal_ticks;
        let mut state = SimulationState::new(&config).unwrap();
        state.hatch("DMC", "Koromon", 1).unwrap();
        state
    }

    #[tokio::test]
    async fn bounded_by_max_ticks() {
        let mut state = state(5, 9000);
        let result = run_simulation(&mut state, &mut NoopEffects, &mut NoOpCallback).await;
        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(state.clock.tick(), 5);
    }

    #[tokio::test]
    async fn callback_can_stop() {
        struct StopAfter(u64);
        impl TickCallback for StopAfter {
            fn on_tick(&mut self, summary: &TickSummary, _state: &SimulationState) -> bool {
                summary.tick < self.0
            }
        }

        let mut state = state(0, 9000);
        let result = run_simulation(&mut state, &mut NoopEffects, &mut StopAfter(3)).await;
        assert_eq!(result.end_reason, SimulationEndReason::Stopped);
        assert_eq!(result.total_ticks, 3);
    }

    #[tokio::test]
    async fn empty_roster_ends_run() {
        let mut state = state(0, 2);
        if let Some(pet) = state.roster.pets.first_mut() {
            vpet_lifecycle::death::kill(pet, &[]);
        }
        let result = run_simulation(&mut state, &mut NoopEffects, &mut NoOpCallback).await;
        assert_eq!(result.end_reason, SimulationEndReason::RosterEmpty);
        assert_eq!(result.total_ticks, 3);
    }
}
