use crate::error::AppError;
use crate::intersection::Road;
use crate::metrics::MetricsTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;

/// Validated sensor input for one road, fixed for the rest of the cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadReading {
    pub road: Road,
    pub vehicle_count: u32,
    pub has_emergency_vehicle: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrafficLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrafficLevel::Low => "Low",
            TrafficLevel::Medium => "Medium",
            TrafficLevel::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadMetrics {
    pub green_time_seconds: u32,
    pub traffic_level: TrafficLevel,
    pub spillback_risk: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    EmergencyOverride,
    SpillbackLimited,
    Normal,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PhaseKind::EmergencyOverride => "emergency override",
            PhaseKind::SpillbackLimited => "spillback limited",
            PhaseKind::Normal => "normal",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalPhase {
    pub road: Road,
    pub duration_seconds: u32,
    pub kind: PhaseKind,
}

/// Phase currently holding the green signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePhase {
    pub phase: SignalPhase,
    pub remaining_seconds: u32,
}

#[derive(Debug)]
pub struct ControllerState {
    metrics: Option<MetricsTable>,
    metrics_tx: watch::Sender<Option<MetricsTable>>,
    active_phase: Option<ActivePhase>,
    active_phase_tx: watch::Sender<Option<ActivePhase>>,
}

impl ControllerState {
    pub fn new() -> Self {
        let (metrics_tx, _metrics_rx) = watch::channel(None);
        let (active_phase_tx, _active_phase_rx) = watch::channel(None);
        Self {
            metrics: None,
            metrics_tx,
            active_phase: None,
            active_phase_tx,
        }
    }

    pub fn metrics(&self) -> Option<&MetricsTable> {
        self.metrics.as_ref()
    }

    pub fn subscribe_metrics(&self) -> watch::Receiver<Option<MetricsTable>> {
        self.metrics_tx.subscribe()
    }

    pub fn set_metrics(&mut self, metrics: MetricsTable) -> Result<(), AppError> {
        self.metrics = Some(metrics.clone());
        self.metrics_tx
            .send(Some(metrics))
            .map_err(|_| AppError::WatchSend)
    }

    pub fn active_phase(&self) -> Option<&ActivePhase> {
        self.active_phase.as_ref()
    }

    pub fn subscribe_active_phase(&self) -> watch::Receiver<Option<ActivePhase>> {
        self.active_phase_tx.subscribe()
    }

    /// Publish the phase holding green, or `None` once the intersection is idle.
    pub fn set_active_phase(&mut self, active: Option<ActivePhase>) -> Result<(), AppError> {
        self.active_phase = active.clone();
        self.active_phase_tx
            .send(active)
            .map_err(|_| AppError::WatchSend)
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_active_phase_updates_state_and_watch() {
        let mut state = ControllerState::new();
        let receiver = state.subscribe_active_phase();
        let active = ActivePhase {
            phase: SignalPhase {
                road: Road::new("Road C"),
                duration_seconds: 60,
                kind: PhaseKind::EmergencyOverride,
            },
            remaining_seconds: 55,
        };

        assert!(state.set_active_phase(Some(active.clone())).is_ok());

        assert_eq!(state.active_phase(), Some(&active));
        assert_eq!(*receiver.borrow(), Some(active));
    }

    #[test]
    fn set_metrics_keeps_latest_table() {
        let mut state = ControllerState::new();
        let receiver = state.subscribe_metrics();
        assert!(state.metrics().is_none());
        let table = MetricsTable::from_entries(vec![(
            Road::new("Road A"),
            crate::metrics::metrics_for(10, 30),
        )]);

        assert!(state.set_metrics(table.clone()).is_ok());

        assert_eq!(state.metrics(), Some(&table));
        assert_eq!(receiver.borrow().as_ref(), Some(&table));
    }

    #[test]
    fn clearing_active_phase_publishes_none() {
        let mut state = ControllerState::new();
        let receiver = state.subscribe_active_phase();

        assert!(state.set_active_phase(None).is_ok());

        assert!(state.active_phase().is_none());
        assert!(receiver.borrow().is_none());
    }

    #[test]
    fn send_without_subscribers_reports_watch_error() {
        let mut state = ControllerState::new();

        let result = state.set_active_phase(None);

        assert!(matches!(result, Err(AppError::WatchSend)));
    }

    #[test]
    fn phase_kind_serializes_snake_case() {
        let value = serde_json::to_value(PhaseKind::SpillbackLimited).expect("serialize kind");
        assert_eq!(value, serde_json::json!("spillback_limited"));
    }
}
