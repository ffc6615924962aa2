use crate::schedule::CyclePlan;
use crate::state::SignalPhase;
use std::time::Duration;
use tracing::{info, warn};

pub mod clock;
pub mod observer;

use clock::PhaseClock;
use observer::{PhaseObserver, PhaseProgress};

pub const DEFAULT_REPORT_INTERVAL_SECS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    EmergencyOverride { index: usize },
    NormalCycle { index: usize },
    Complete,
}

/// Executes a [`CyclePlan`] one phase at a time.
///
/// `Idle -> EmergencyOverride* -> NormalCycle* -> Complete`. [`CycleRunner::next_phase`]
/// selects a phase and [`CycleRunner::run_phase`] holds it green; the runner only
/// moves past a phase once its countdown has finished. A caller may stop between
/// phases and rebuild a plan when new readings arrive.
#[derive(Debug)]
pub struct CycleRunner {
    plan: CyclePlan,
    report_interval_secs: u32,
    cursor: usize,
    state: RunnerState,
    pending: bool,
}

impl CycleRunner {
    pub fn new(plan: CyclePlan) -> Self {
        Self {
            plan,
            report_interval_secs: DEFAULT_REPORT_INTERVAL_SECS,
            cursor: 0,
            state: RunnerState::Idle,
            pending: false,
        }
    }

    /// Whole seconds between progress notices; sub-second values round up to one.
    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval_secs = u32::try_from(interval.as_secs())
            .unwrap_or(u32::MAX)
            .max(1);
        self
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn plan(&self) -> &CyclePlan {
        &self.plan
    }

    /// Phase selected by [`CycleRunner::next_phase`] that has not been run yet.
    pub fn pending_phase(&self) -> Option<&SignalPhase> {
        if self.pending {
            self.plan.phases().get(self.cursor)
        } else {
            None
        }
    }

    /// Select the next planned phase, or move to `Complete` when none remain.
    ///
    /// While a selected phase has not been run, this keeps returning it.
    pub fn next_phase(&mut self) -> Option<&SignalPhase> {
        if self.pending {
            return self.plan.phases().get(self.cursor);
        }
        if self.state == RunnerState::Complete {
            return None;
        }

        let emergency_count = self.plan.emergency_phases().len();
        let next_state = if self.cursor < emergency_count {
            RunnerState::EmergencyOverride { index: self.cursor }
        } else if self.cursor < self.plan.len() {
            RunnerState::NormalCycle {
                index: self.cursor - emergency_count,
            }
        } else {
            RunnerState::Complete
        };

        match (self.state, next_state) {
            (RunnerState::Idle, RunnerState::EmergencyOverride { .. }) => {
                warn!(roads = emergency_count, "Emergency override active");
            }
            (_, RunnerState::NormalCycle { index: 0 }) => {
                info!("Normal traffic signal cycle");
            }
            (_, RunnerState::Complete) => {
                info!(
                    phases = self.plan.len(),
                    total_secs = self.plan.total_duration_seconds(),
                    "Signal cycle complete"
                );
            }
            _ => {}
        }

        self.state = next_state;
        if next_state == RunnerState::Complete {
            return None;
        }

        self.pending = true;
        self.plan.phases().get(self.cursor)
    }

    /// Hold the current phase green for its full duration, reporting remaining
    /// time at each interval, then advance past it.
    ///
    /// Selects the next phase first if none is pending. Returns the phase that
    /// ran, or `None` once the plan is complete.
    pub fn run_phase<C, O>(&mut self, clock: &mut C, observer: &mut O) -> Option<SignalPhase>
    where
        C: PhaseClock + ?Sized,
        O: PhaseObserver + ?Sized,
    {
        let phase = self.next_phase()?.clone();
        observer.phase_started(&phase);

        let mut remaining = phase.duration_seconds;
        while remaining > 0 {
            observer.progress(&PhaseProgress {
                road: phase.road.clone(),
                kind: phase.kind,
                remaining_seconds: remaining,
            });
            let step = remaining.min(self.report_interval_secs);
            clock.sleep(Duration::from_secs(u64::from(step)));
            remaining -= step;
        }

        observer.phase_finished(&phase);
        self.pending = false;
        self.cursor += 1;
        Some(phase)
    }

    /// Run every remaining phase in order and return the phases executed.
    pub fn run<C, O>(&mut self, clock: &mut C, observer: &mut O) -> Vec<SignalPhase>
    where
        C: PhaseClock + ?Sized,
        O: PhaseObserver + ?Sized,
    {
        let mut executed = Vec::with_capacity(self.plan.len());
        while let Some(phase) = self.run_phase(clock, observer) {
            executed.push(phase);
        }
        executed
    }
}
