use crate::state::TrafficLevel;

pub const MEDIUM_TRAFFIC_THRESHOLD: u32 = 50;
pub const HIGH_TRAFFIC_THRESHOLD: u32 = 200;

/// Congestion band for a vehicle count. Thresholds belong to the upper band.
pub fn classify(vehicle_count: u32) -> TrafficLevel {
    if vehicle_count < MEDIUM_TRAFFIC_THRESHOLD {
        TrafficLevel::Low
    } else if vehicle_count < HIGH_TRAFFIC_THRESHOLD {
        TrafficLevel::Medium
    } else {
        TrafficLevel::High
    }
}
