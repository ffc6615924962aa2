use crate::error::CycleError;
use crate::intersection::Intersection;
use crate::metrics::MetricsTable;
use crate::schedule::priority::{self, Candidate};
use crate::state::{PhaseKind, RoadReading, SignalPhase};
use tracing::{debug, info};

pub const EMERGENCY_GREEN_SECONDS: u32 = 60;
pub const SPILLBACK_GREEN_SECONDS: u32 = 15;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlanOptions {
    /// Serve emergency roads again in the normal cycle after their override phase.
    pub emergency_in_normal_cycle: bool,
}

/// Ordered phases for one full pass of the intersection.
///
/// Emergency override phases come first, in road order, followed by the normal
/// cycle in priority order. The phase list cannot change once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclePlan {
    phases: Vec<SignalPhase>,
    emergency_count: usize,
}

impl CyclePlan {
    pub fn build(
        intersection: &Intersection,
        readings: &[RoadReading],
        metrics: &MetricsTable,
        options: PlanOptions,
    ) -> Result<Self, CycleError> {
        let candidates = collect_candidates(intersection, readings, metrics)?;

        let mut phases: Vec<SignalPhase> = candidates
            .iter()
            .filter(|c| c.has_emergency_vehicle)
            .map(|c| SignalPhase {
                road: c.road.clone(),
                duration_seconds: EMERGENCY_GREEN_SECONDS,
                kind: PhaseKind::EmergencyOverride,
            })
            .collect();
        let emergency_count = phases.len();

        for candidate in priority::order(candidates) {
            if candidate.has_emergency_vehicle && !options.emergency_in_normal_cycle {
                continue;
            }
            phases.push(normal_phase(candidate));
        }

        if let Some(road) = intersection
            .roads()
            .find(|road| !phases.iter().any(|phase| &phase.road == *road))
        {
            return Err(CycleError::IncompletePlan {
                road: road.to_string(),
            });
        }

        for (index, phase) in phases.iter().enumerate() {
            debug!(
                index,
                road = %phase.road,
                kind = %phase.kind,
                duration_secs = phase.duration_seconds,
                "Planned phase"
            );
        }
        info!(
            phases = phases.len(),
            emergency = emergency_count,
            "Cycle plan built"
        );

        Ok(Self {
            phases,
            emergency_count,
        })
    }

    pub fn phases(&self) -> &[SignalPhase] {
        &self.phases
    }

    pub fn emergency_phases(&self) -> &[SignalPhase] {
        &self.phases[..self.emergency_count]
    }

    pub fn normal_phases(&self) -> &[SignalPhase] {
        &self.phases[self.emergency_count..]
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn total_duration_seconds(&self) -> u32 {
        self.phases.iter().map(|phase| phase.duration_seconds).sum()
    }
}

fn normal_phase(candidate: Candidate) -> SignalPhase {
    if candidate.spillback_risk {
        SignalPhase {
            road: candidate.road,
            duration_seconds: SPILLBACK_GREEN_SECONDS,
            kind: PhaseKind::SpillbackLimited,
        }
    } else {
        SignalPhase {
            road: candidate.road,
            duration_seconds: candidate.green_time_seconds,
            kind: PhaseKind::Normal,
        }
    }
}

fn collect_candidates(
    intersection: &Intersection,
    readings: &[RoadReading],
    metrics: &MetricsTable,
) -> Result<Vec<Candidate>, CycleError> {
    intersection
        .roads()
        .map(|road| {
            let reading = readings.iter().find(|r| &r.road == road).ok_or_else(|| {
                CycleError::InvalidReading {
                    road: road.to_string(),
                    reason: "no reading supplied".to_string(),
                }
            })?;
            let road_metrics = metrics.get(road).ok_or_else(|| CycleError::MissingMetrics {
                road: road.to_string(),
            })?;
            Ok(Candidate {
                road: road.clone(),
                has_emergency_vehicle: reading.has_emergency_vehicle,
                spillback_risk: road_metrics.spillback_risk,
                green_time_seconds: road_metrics.green_time_seconds,
            })
        })
        .collect()
}
