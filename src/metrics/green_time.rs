//! Green time allotted to a road from its queued vehicle count.

pub const MIN_GREEN_SECONDS: u32 = 15;
pub const MAX_GREEN_SECONDS: u32 = 60;
pub const SECONDS_PER_VEHICLE: u32 = 2;

/// Two seconds per vehicle, clamped to `[MIN_GREEN_SECONDS, MAX_GREEN_SECONDS]`.
pub fn compute_green_time(vehicle_count: u32) -> u32 {
    vehicle_count
        .saturating_mul(SECONDS_PER_VEHICLE)
        .clamp(MIN_GREEN_SECONDS, MAX_GREEN_SECONDS)
}
