use crate::error::CycleError;
use crate::intersection::{Intersection, Road};
use crate::state::{RoadMetrics, RoadReading};
use tracing::{debug, warn};

pub mod classify;
pub mod green_time;
pub mod spillback;

pub use classify::classify;
pub use green_time::compute_green_time;

/// Per-road metrics for one cycle, in the intersection's road order.
///
/// Built once by [`compute_metrics`] and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsTable {
    entries: Vec<(Road, RoadMetrics)>,
}

impl MetricsTable {
    pub fn get(&self, road: &Road) -> Option<&RoadMetrics> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == road)
            .map(|(_, metrics)| metrics)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Road, &RoadMetrics)> {
        self.entries.iter().map(|(road, metrics)| (road, metrics))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Table from precomputed entries, without cross-checking against an intersection.
    pub fn from_entries(entries: Vec<(Road, RoadMetrics)>) -> Self {
        Self { entries }
    }
}

pub fn metrics_for(vehicle_count: u32, downstream_capacity: u32) -> RoadMetrics {
    RoadMetrics {
        green_time_seconds: compute_green_time(vehicle_count),
        traffic_level: classify(vehicle_count),
        spillback_risk: spillback::detect(vehicle_count, downstream_capacity),
    }
}

/// Compute exactly one [`RoadMetrics`] per road of the intersection.
///
/// Readings may arrive in any order but must cover every road exactly once.
pub fn compute_metrics(
    intersection: &Intersection,
    readings: &[RoadReading],
) -> Result<MetricsTable, CycleError> {
    for (index, reading) in readings.iter().enumerate() {
        if intersection.position(&reading.road).is_none() {
            return Err(CycleError::UnknownRoad {
                road: reading.road.to_string(),
            });
        }
        if readings[..index].iter().any(|r| r.road == reading.road) {
            return Err(CycleError::InvalidReading {
                road: reading.road.to_string(),
                reason: "duplicate reading".to_string(),
            });
        }
    }

    let mut entries = Vec::with_capacity(intersection.len());
    for road in intersection.roads() {
        let reading = readings
            .iter()
            .find(|r| &r.road == road)
            .ok_or_else(|| CycleError::InvalidReading {
                road: road.to_string(),
                reason: "no reading supplied".to_string(),
            })?;
        let capacity = intersection
            .downstream_capacity(road)
            .ok_or_else(|| CycleError::MissingCapacityConfig {
                road: road.to_string(),
            })?;

        let metrics = metrics_for(reading.vehicle_count, capacity);
        if metrics.spillback_risk {
            warn!(
                road = %road,
                vehicles = reading.vehicle_count,
                downstream_capacity = capacity,
                "Spillback risk (downstream congested)"
            );
        }
        debug!(
            road = %road,
            green_time_secs = metrics.green_time_seconds,
            level = %metrics.traffic_level,
            "Road metrics computed"
        );
        entries.push((road.clone(), metrics));
    }

    Ok(MetricsTable { entries })
}

/// First road, in reading order, carrying the largest vehicle count.
pub fn highest_traffic(readings: &[RoadReading]) -> Option<&RoadReading> {
    readings.iter().fold(None, |best: Option<&RoadReading>, reading| match best {
        Some(current) if current.vehicle_count >= reading.vehicle_count => Some(current),
        _ => Some(reading),
    })
}
