use crate::config::ReadingSection;
use crate::error::{AppError, CycleError};
use crate::intersection::{Intersection, Road};
use crate::provider::{RawReading, ReadingProvider};

/// Readings supplied up front, typically from the `[[readings]]` config section.
#[derive(Debug, Clone)]
pub struct FixedProvider {
    readings: Vec<(Road, RawReading)>,
}

impl FixedProvider {
    pub fn new(
        sections: &[ReadingSection],
        intersection: &Intersection,
    ) -> Result<Self, CycleError> {
        let mut readings = Vec::with_capacity(sections.len());
        for section in sections {
            let road = Road::new(section.road.trim());
            if intersection.position(&road).is_none() {
                return Err(CycleError::UnknownRoad {
                    road: section.road.clone(),
                });
            }
            if readings.iter().any(|(existing, _)| existing == &road) {
                return Err(CycleError::InvalidReading {
                    road: road.to_string(),
                    reason: "duplicate reading".to_string(),
                });
            }
            readings.push((
                road,
                RawReading {
                    vehicle_count: section.vehicles,
                    emergency: section.emergency.clone(),
                },
            ));
        }
        Ok(Self { readings })
    }
}

impl ReadingProvider for FixedProvider {
    fn read(&mut self, road: &Road) -> Result<RawReading, AppError> {
        self.readings
            .iter()
            .find(|(candidate, _)| candidate == road)
            .map(|(_, raw)| raw.clone())
            .ok_or_else(|| {
                CycleError::InvalidReading {
                    road: road.to_string(),
                    reason: "no reading configured".to_string(),
                }
                .into()
            })
    }
}
