//! Normal-cycle ordering of roads.
//!
//! Roads are compared key by key; the first key that differs decides. Keys, in order:
//!
//! 1. emergency vehicle present (emergency roads first)
//! 2. spillback risk (roads without risk first)
//! 3. computed green time (longer first)
//!
//! Remaining ties keep their input order, which is why [`order`] relies on a stable sort.

use crate::intersection::Road;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub road: Road,
    pub has_emergency_vehicle: bool,
    pub spillback_risk: bool,
    pub green_time_seconds: u32,
}

pub type PriorityKey = fn(&Candidate, &Candidate) -> Ordering;

pub fn by_emergency(a: &Candidate, b: &Candidate) -> Ordering {
    b.has_emergency_vehicle.cmp(&a.has_emergency_vehicle)
}

pub fn by_spillback(a: &Candidate, b: &Candidate) -> Ordering {
    a.spillback_risk.cmp(&b.spillback_risk)
}

pub fn by_green_time(a: &Candidate, b: &Candidate) -> Ordering {
    b.green_time_seconds.cmp(&a.green_time_seconds)
}

pub const PRIORITY_KEYS: [PriorityKey; 3] = [by_emergency, by_spillback, by_green_time];

pub fn priority_cmp(a: &Candidate, b: &Candidate) -> Ordering {
    PRIORITY_KEYS
        .iter()
        .map(|key| key(a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

pub fn order(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(priority_cmp);
    candidates
}
