use crate::error::AppError;
use crate::intersection::Road;
use crate::provider::{RawReading, ReadingProvider};

#[derive(Debug, Clone, Copy)]
pub struct MockReadingBehavior {
    pub read_ok: bool,
    pub vehicle_count: i64,
    pub emergency: &'static str,
}

impl MockReadingBehavior {
    pub fn ok() -> Self {
        Self {
            read_ok: true,
            vehicle_count: 0,
            emergency: "no",
        }
    }

    pub fn with_reading(vehicle_count: i64, emergency: &'static str) -> Self {
        Self {
            read_ok: true,
            vehicle_count,
            emergency,
        }
    }

    pub fn fail_read() -> Self {
        Self {
            read_ok: false,
            vehicle_count: 0,
            emergency: "no",
        }
    }
}

/// Replays scripted behaviours, one per `read` call, then falls back to an empty road.
pub struct MockProvider {
    behaviors: Vec<MockReadingBehavior>,
    next_index: usize,
    requested: Vec<String>,
}

impl MockProvider {
    pub fn new(behaviors: Vec<MockReadingBehavior>) -> Self {
        Self {
            behaviors,
            next_index: 0,
            requested: Vec::new(),
        }
    }

    /// Road names passed to `read`, in call order.
    pub fn requested(&self) -> &[String] {
        &self.requested
    }

    fn next_behavior(&mut self) -> MockReadingBehavior {
        let behavior = self
            .behaviors
            .get(self.next_index)
            .copied()
            .unwrap_or_else(MockReadingBehavior::ok);
        self.next_index += 1;
        behavior
    }
}

impl ReadingProvider for MockProvider {
    fn read(&mut self, road: &Road) -> Result<RawReading, AppError> {
        self.requested.push(road.name().to_string());
        let behavior = self.next_behavior();
        if behavior.read_ok {
            Ok(RawReading {
                vehicle_count: behavior.vehicle_count,
                emergency: behavior.emergency.to_string(),
            })
        } else {
            Err(AppError::Provider("mock read failed".to_string()))
        }
    }
}
