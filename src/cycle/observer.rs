use crate::intersection::Road;
use crate::state::{ActivePhase, ControllerState, PhaseKind, SignalPhase};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// Countdown notice emitted at the reporting cadence while a phase is green.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseProgress {
    pub road: Road,
    pub kind: PhaseKind,
    pub remaining_seconds: u32,
}

pub trait PhaseObserver {
    fn phase_started(&mut self, _phase: &SignalPhase) {}
    fn progress(&mut self, progress: &PhaseProgress);
    fn phase_finished(&mut self, _phase: &SignalPhase) {}
}

impl<A: PhaseObserver, B: PhaseObserver> PhaseObserver for (A, B) {
    fn phase_started(&mut self, phase: &SignalPhase) {
        self.0.phase_started(phase);
        self.1.phase_started(phase);
    }

    fn progress(&mut self, progress: &PhaseProgress) {
        self.0.progress(progress);
        self.1.progress(progress);
    }

    fn phase_finished(&mut self, phase: &SignalPhase) {
        self.0.phase_finished(phase);
        self.1.phase_finished(phase);
    }
}

#[derive(Debug, Default)]
pub struct LogObserver;

impl PhaseObserver for LogObserver {
    fn phase_started(&mut self, phase: &SignalPhase) {
        match phase.kind {
            PhaseKind::EmergencyOverride => info!(
                road = %phase.road,
                duration_secs = phase.duration_seconds,
                "Green signal override"
            ),
            PhaseKind::SpillbackLimited => info!(
                road = %phase.road,
                duration_secs = phase.duration_seconds,
                "Green limited (spillback prevention)"
            ),
            PhaseKind::Normal => info!(
                road = %phase.road,
                duration_secs = phase.duration_seconds,
                "Green"
            ),
        }
    }

    fn progress(&mut self, progress: &PhaseProgress) {
        info!(
            road = %progress.road,
            kind = %progress.kind,
            remaining_secs = progress.remaining_seconds,
            "Seconds remaining"
        );
    }
}

/// Publishes the active phase into [`ControllerState`] for subscribers.
#[derive(Debug, Clone)]
pub struct StateObserver {
    state: Arc<RwLock<ControllerState>>,
}

impl StateObserver {
    pub fn new(state: Arc<RwLock<ControllerState>>) -> Self {
        Self { state }
    }

    fn publish(&self, active: Option<ActivePhase>) {
        let mut guard = match self.state.write() {
            Ok(guard) => guard,
            Err(_) => {
                warn!("State lock poisoned while publishing active phase");
                return;
            }
        };
        if let Err(err) = guard.set_active_phase(active) {
            warn!(error = %err, "Failed to publish active phase");
        }
    }
}

impl PhaseObserver for StateObserver {
    fn phase_started(&mut self, phase: &SignalPhase) {
        self.publish(Some(ActivePhase {
            phase: phase.clone(),
            remaining_seconds: phase.duration_seconds,
        }));
    }

    fn progress(&mut self, progress: &PhaseProgress) {
        let current = match self.state.read() {
            Ok(guard) => guard.active_phase().map(|active| active.phase.clone()),
            Err(_) => None,
        };
        if let Some(phase) = current {
            self.publish(Some(ActivePhase {
                phase,
                remaining_seconds: progress.remaining_seconds,
            }));
        }
    }

    fn phase_finished(&mut self, _phase: &SignalPhase) {
        self.publish(None);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedEvent {
    Started(SignalPhase),
    Progress(PhaseProgress),
    Finished(SignalPhase),
}

/// Keeps every event in arrival order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Vec<ObservedEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress_events(&self) -> impl Iterator<Item = &PhaseProgress> {
        self.events.iter().filter_map(|event| match event {
            ObservedEvent::Progress(progress) => Some(progress),
            _ => None,
        })
    }
}

impl PhaseObserver for RecordingObserver {
    fn phase_started(&mut self, phase: &SignalPhase) {
        self.events.push(ObservedEvent::Started(phase.clone()));
    }

    fn progress(&mut self, progress: &PhaseProgress) {
        self.events.push(ObservedEvent::Progress(progress.clone()));
    }

    fn phase_finished(&mut self, phase: &SignalPhase) {
        self.events.push(ObservedEvent::Finished(phase.clone()));
    }
}
