//! Glue between the input provider, the scheduling core, and the output sinks.

use crate::cycle::CycleRunner;
use crate::cycle::clock::PhaseClock;
use crate::cycle::observer::PhaseObserver;
use crate::error::AppError;
use crate::intersection::Intersection;
use crate::metrics::{MetricsTable, compute_metrics, highest_traffic};
use crate::provider::{ReadingProvider, ingest};
use crate::report::{CycleReport, SummarySink, build_report};
use crate::schedule::{CyclePlan, PlanOptions};
use crate::state::{ControllerState, RoadReading};
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};
use tracing::warn;

/// Everything a cycle needs, validated before the first phase turns green.
#[derive(Debug, Clone)]
pub struct PreparedCycle {
    pub readings: Vec<RoadReading>,
    pub metrics: MetricsTable,
    pub plan: CyclePlan,
}

pub fn prepare_cycle<P>(
    intersection: &Intersection,
    provider: &mut P,
    options: PlanOptions,
) -> Result<PreparedCycle, AppError>
where
    P: ReadingProvider + ?Sized,
{
    let readings = ingest(provider, intersection)?;

    if let Some(top) = highest_traffic(&readings) {
        warn!(
            road = %top.road,
            vehicles = top.vehicle_count,
            "Highest traffic detected"
        );
    }

    let metrics = compute_metrics(intersection, &readings)?;
    let plan = CyclePlan::build(intersection, &readings, &metrics, options)?;

    Ok(PreparedCycle {
        readings,
        metrics,
        plan,
    })
}

/// Store the metrics table in shared state so subscribers see it before the first phase.
pub fn publish_metrics(
    state: &Arc<RwLock<ControllerState>>,
    metrics: &MetricsTable,
) -> Result<(), AppError> {
    let mut guard = state.write().map_err(|_| AppError::StateLock)?;
    guard.set_metrics(metrics.clone())
}

/// Run the prepared plan to completion and hand the summary to the sink.
pub fn run_cycle<C, O, S>(
    prepared: PreparedCycle,
    report_interval: Duration,
    clock: &mut C,
    observer: &mut O,
    sink: &mut S,
) -> Result<CycleReport, AppError>
where
    C: PhaseClock + ?Sized,
    O: PhaseObserver + ?Sized,
    S: SummarySink + ?Sized,
{
    let PreparedCycle {
        readings,
        metrics,
        plan,
    } = prepared;

    let mut runner = CycleRunner::new(plan).with_report_interval(report_interval);
    let executed = runner.run(clock, observer);

    let report = build_report(&readings, &metrics, executed, SystemTime::now())?;
    sink.publish(&report)?;
    Ok(report)
}
