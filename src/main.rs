use smart_signal::config::{self, ClockMode, ReadingSection};
use smart_signal::controller::{PreparedCycle, prepare_cycle, publish_metrics, run_cycle};
use smart_signal::cycle::clock::{PhaseClock, SimulatedClock, ThreadClock};
use smart_signal::cycle::observer::{LogObserver, StateObserver};
use smart_signal::error::AppError;
use smart_signal::intersection::Intersection;
use smart_signal::provider::fixed::FixedProvider;
use smart_signal::provider::prompt::PromptProvider;
use smart_signal::report::WriterSink;
use smart_signal::schedule::PlanOptions;
use smart_signal::state::ControllerState;
use std::sync::{Arc, RwLock};
use tracing::Level;

fn init_tracing(level: &str) {
    let max_level = level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(max_level)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Ingest readings and plan the cycle. Prompting blocks on stdin, so callers
/// run this off the async workers.
fn prepare_from_config(
    fixed_readings: Option<Vec<ReadingSection>>,
    intersection: &Intersection,
    options: PlanOptions,
) -> Result<PreparedCycle, AppError> {
    match fixed_readings {
        Some(readings) => {
            tracing::info!(count = readings.len(), "Using configured readings");
            let mut provider = FixedProvider::new(&readings, intersection)?;
            prepare_cycle(intersection, &mut provider, options)
        }
        None => {
            tracing::info!("No readings configured, prompting on stdin");
            let mut provider = PromptProvider::stdio();
            prepare_cycle(intersection, &mut provider, options)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_default()?;
    init_tracing(&config.logging.level);
    tracing::info!(
        config_path = config::DEFAULT_CONFIG_PATH,
        app = %config.app.name,
        "smart-signal starting"
    );

    let intersection = config.intersection()?;
    let options = PlanOptions {
        emergency_in_normal_cycle: config.emergency_in_normal_cycle(),
    };
    let report_interval = config.report_interval()?;

    // All validation happens here, before any phase turns green.
    let fixed_readings = config.has_fixed_readings().then(|| config.readings.clone());
    let prepared = tokio::task::spawn_blocking(move || {
        prepare_from_config(fixed_readings, &intersection, options)
    })
    .await??;

    let state = Arc::new(RwLock::new(ControllerState::new()));
    let (_metrics_rx, mut phase_rx) = {
        let guard = state.read().map_err(|_| AppError::StateLock)?;
        (guard.subscribe_metrics(), guard.subscribe_active_phase())
    };
    publish_metrics(&state, &prepared.metrics)?;

    let watcher = tokio::spawn(async move {
        while phase_rx.changed().await.is_ok() {
            let active = phase_rx.borrow_and_update().clone();
            match active {
                Some(active) => tracing::debug!(
                    road = %active.phase.road,
                    kind = %active.phase.kind,
                    remaining_secs = active.remaining_seconds,
                    "Active phase updated"
                ),
                None => tracing::debug!("Intersection between phases"),
            }
        }
    });

    let mut clock: Box<dyn PhaseClock + Send> = match config.clock_mode() {
        ClockMode::Realtime => {
            let time_scale = config.time_scale()?;
            tracing::info!(time_scale, "Using real-time clock");
            Box::new(ThreadClock::new(time_scale))
        }
        ClockMode::Simulated => {
            tracing::info!("Using simulated clock");
            Box::new(SimulatedClock::new())
        }
    };
    let mut observer = (LogObserver, StateObserver::new(Arc::clone(&state)));
    let mut sink = WriterSink::stdout(config.chart_json());

    let report = tokio::task::spawn_blocking(move || {
        run_cycle(prepared, report_interval, &mut clock, &mut observer, &mut sink)
    })
    .await??;

    watcher.abort();
    tracing::info!(
        phases = report.phases.len(),
        completed_at = %report.completed_at,
        "smart-signal finished"
    );
    Ok(())
}
