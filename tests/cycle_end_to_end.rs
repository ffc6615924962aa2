use smart_signal::controller::{prepare_cycle, publish_metrics, run_cycle};
use smart_signal::cycle::clock::SimulatedClock;
use smart_signal::cycle::observer::{ObservedEvent, RecordingObserver, StateObserver};
use smart_signal::error::{AppError, CycleError};
use smart_signal::intersection::{Intersection, RoadSpec};
use smart_signal::provider::mock::{MockProvider, MockReadingBehavior};
use smart_signal::report::{CycleReport, SummarySink, WriterSink};
use smart_signal::schedule::PlanOptions;
use smart_signal::state::{ControllerState, PhaseKind};
use std::sync::{Arc, RwLock};
use std::time::Duration;

fn reference_intersection() -> Result<Intersection, AppError> {
    Intersection::new(
        [("Road A", 30), ("Road B", 10), ("Road C", 50), ("Road D", 15)]
            .into_iter()
            .map(|(name, capacity)| RoadSpec {
                name: name.to_string(),
                downstream_capacity: Some(capacity),
            })
            .collect(),
    )
}

fn reference_provider() -> MockProvider {
    MockProvider::new(vec![
        MockReadingBehavior::with_reading(10, "no"),
        MockReadingBehavior::with_reading(80, "no"),
        MockReadingBehavior::with_reading(5, "yes"),
        MockReadingBehavior::with_reading(250, "no"),
    ])
}

#[derive(Default)]
struct CollectingSink {
    reports: Vec<CycleReport>,
}

impl SummarySink for CollectingSink {
    fn publish(&mut self, report: &CycleReport) -> Result<(), AppError> {
        self.reports.push(report.clone());
        Ok(())
    }
}

#[test]
fn reference_scenario_runs_emergency_then_prioritised_cycle() -> Result<(), AppError> {
    let intersection = reference_intersection()?;
    let mut provider = reference_provider();

    let prepared = prepare_cycle(&intersection, &mut provider, PlanOptions::default())?;

    let green: Vec<u32> = prepared
        .metrics
        .iter()
        .map(|(_, m)| m.green_time_seconds)
        .collect();
    assert_eq!(green, vec![20, 60, 15, 60]);

    let mut clock = SimulatedClock::new();
    let mut observer = RecordingObserver::new();
    let mut sink = CollectingSink::default();

    let report = run_cycle(
        prepared,
        Duration::from_secs(5),
        &mut clock,
        &mut observer,
        &mut sink,
    )?;

    let phases: Vec<(&str, u32, PhaseKind)> = report
        .phases
        .iter()
        .map(|p| (p.road.name(), p.duration_seconds, p.kind))
        .collect();
    assert_eq!(
        phases,
        vec![
            ("Road C", 60, PhaseKind::EmergencyOverride),
            ("Road A", 20, PhaseKind::Normal),
            ("Road B", 15, PhaseKind::SpillbackLimited),
            ("Road D", 15, PhaseKind::SpillbackLimited),
        ]
    );
    assert_eq!(clock.elapsed(), Duration::from_secs(110));

    let emergency_ticks: Vec<u32> = observer
        .progress_events()
        .filter(|p| p.kind == PhaseKind::EmergencyOverride)
        .map(|p| p.remaining_seconds)
        .collect();
    assert_eq!(emergency_ticks, (1..=12).rev().map(|n| n * 5).collect::<Vec<_>>());

    let started: Vec<&str> = observer
        .events
        .iter()
        .filter_map(|event| match event {
            ObservedEvent::Started(phase) => Some(phase.road.name()),
            _ => None,
        })
        .collect();
    assert_eq!(started, vec!["Road C", "Road A", "Road B", "Road D"]);

    assert_eq!(sink.reports.len(), 1);
    let spillback: Vec<bool> = report.rows.iter().map(|r| r.spillback_risk).collect();
    assert_eq!(spillback, vec![false, true, false, true]);
    assert_eq!(report.chart.bars[2].color, "#d62728");
    Ok(())
}

#[test]
fn invalid_reading_stops_cycle_before_any_phase() -> Result<(), AppError> {
    let intersection = reference_intersection()?;
    let mut provider = MockProvider::new(vec![
        MockReadingBehavior::with_reading(10, "no"),
        MockReadingBehavior::with_reading(-1, "no"),
    ]);

    let result = prepare_cycle(&intersection, &mut provider, PlanOptions::default());

    assert!(matches!(
        result,
        Err(AppError::Cycle(CycleError::InvalidReading { .. }))
    ));
    Ok(())
}

#[test]
fn state_subscribers_see_metrics_and_idle_after_cycle() -> Result<(), AppError> {
    let intersection = reference_intersection()?;
    let mut provider = reference_provider();
    let prepared = prepare_cycle(&intersection, &mut provider, PlanOptions::default())?;

    let state = Arc::new(RwLock::new(ControllerState::new()));
    let (metrics_rx, phase_rx) = {
        let guard = state.read().map_err(|_| AppError::StateLock)?;
        (guard.subscribe_metrics(), guard.subscribe_active_phase())
    };
    publish_metrics(&state, &prepared.metrics)?;
    assert_eq!(metrics_rx.borrow().as_ref().map(|m| m.len()), Some(4));

    let mut clock = SimulatedClock::new();
    let mut observer = (RecordingObserver::new(), StateObserver::new(Arc::clone(&state)));
    let mut sink = WriterSink::new(Vec::new(), false);

    run_cycle(
        prepared,
        Duration::from_secs(5),
        &mut clock,
        &mut observer,
        &mut sink,
    )?;

    assert!(phase_rx.borrow().is_none());
    let written = String::from_utf8(sink.into_inner()).unwrap_or_default();
    assert!(written.contains("Road C | Vehicles: 5 | Traffic Level: Low | Emergency: true"));
    Ok(())
}
