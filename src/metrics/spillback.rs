/// True when the queue exceeds what the downstream link can absorb.
pub fn detect(vehicle_count: u32, downstream_capacity: u32) -> bool {
    vehicle_count > downstream_capacity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_to_capacity_is_not_at_risk() {
        assert!(!detect(30, 30));
    }

    #[test]
    fn above_capacity_is_at_risk() {
        assert!(detect(31, 30));
        assert!(detect(1, 0));
    }

    #[test]
    fn empty_road_is_never_at_risk() {
        assert!(!detect(0, 0));
    }
}
