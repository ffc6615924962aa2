pub mod plan;
pub mod priority;

pub use plan::{CyclePlan, EMERGENCY_GREEN_SECONDS, PlanOptions, SPILLBACK_GREEN_SECONDS};
pub use priority::{Candidate, order, priority_cmp};
