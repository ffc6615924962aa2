use crate::error::{AppError, CycleError};
use crate::intersection::{Intersection, Road};
use crate::state::RoadReading;
use tracing::{debug, info};

pub mod fixed;
pub mod mock;
pub mod prompt;

/// Unvalidated input as delivered by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReading {
    pub vehicle_count: i64,
    pub emergency: String,
}

/// Source of per-road sensor input for one cycle.
pub trait ReadingProvider {
    fn read(&mut self, road: &Road) -> Result<RawReading, AppError>;
}

impl<P: ReadingProvider + ?Sized> ReadingProvider for Box<P> {
    fn read(&mut self, road: &Road) -> Result<RawReading, AppError> {
        (**self).read(road)
    }
}

/// Read and validate one reading per road, in the intersection's road order.
///
/// The first invalid reading aborts ingestion; no partial set is returned.
pub fn ingest<P>(provider: &mut P, intersection: &Intersection) -> Result<Vec<RoadReading>, AppError>
where
    P: ReadingProvider + ?Sized,
{
    let mut readings = Vec::with_capacity(intersection.len());
    for road in intersection.roads() {
        let raw = provider.read(road)?;
        let reading = validate_reading(road, &raw)?;
        debug!(
            road = %road,
            vehicles = reading.vehicle_count,
            emergency = reading.has_emergency_vehicle,
            "Reading accepted"
        );
        readings.push(reading);
    }
    info!(roads = readings.len(), "Sensor readings ingested");
    Ok(readings)
}

pub fn validate_reading(road: &Road, raw: &RawReading) -> Result<RoadReading, CycleError> {
    let vehicle_count = u32::try_from(raw.vehicle_count).map_err(|_| {
        let reason = if raw.vehicle_count < 0 {
            format!("negative vehicle count: {}", raw.vehicle_count)
        } else {
            format!("vehicle count out of range: {}", raw.vehicle_count)
        };
        CycleError::InvalidReading {
            road: road.to_string(),
            reason,
        }
    })?;
    let has_emergency_vehicle =
        parse_emergency_flag(&raw.emergency).ok_or_else(|| CycleError::InvalidReading {
            road: road.to_string(),
            reason: format!("malformed emergency flag: {:?}", raw.emergency),
        })?;

    Ok(RoadReading {
        road: road.clone(),
        vehicle_count,
        has_emergency_vehicle,
    })
}

/// Accepts yes/no, y/n and true/false in any case, ignoring surrounding whitespace.
pub fn parse_emergency_flag(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" => Some(true),
        "no" | "n" | "false" => Some(false),
        _ => None,
    }
}
