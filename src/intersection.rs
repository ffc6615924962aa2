use crate::config::ConfigError;
use crate::error::{AppError, CycleError};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Road approaching the intersection, identified by its configured name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Road(String);

impl Road {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Road {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct RoadSpec {
    pub name: String,
    pub downstream_capacity: Option<u32>,
}

#[derive(Debug, Clone)]
struct Approach {
    road: Road,
    downstream_capacity: u32,
}

/// Ordered road set plus the downstream capacity table for one intersection.
///
/// The order given at construction is the natural enumeration order used for
/// emergency overrides, stable tie-breaks and reporting.
#[derive(Debug, Clone)]
pub struct Intersection {
    approaches: Vec<Approach>,
}

impl Intersection {
    pub fn new(specs: Vec<RoadSpec>) -> Result<Self, AppError> {
        if specs.is_empty() {
            return Err(ConfigError::Invalid("no roads configured".to_string()).into());
        }

        let mut seen = HashSet::new();
        let mut approaches = Vec::with_capacity(specs.len());
        for spec in specs {
            let name = spec.name.trim();
            if name.is_empty() {
                return Err(ConfigError::Invalid("road name must not be empty".to_string()).into());
            }
            if !seen.insert(name.to_string()) {
                return Err(ConfigError::Invalid(format!("duplicate road name: {name}")).into());
            }
            let downstream_capacity = spec.downstream_capacity.ok_or_else(|| {
                CycleError::MissingCapacityConfig {
                    road: name.to_string(),
                }
            })?;
            // Capacity of zero is legal: any queued vehicle is then at risk.
            approaches.push(Approach {
                road: Road::new(name),
                downstream_capacity,
            });
        }

        Ok(Self { approaches })
    }

    pub fn roads(&self) -> impl Iterator<Item = &Road> {
        self.approaches.iter().map(|approach| &approach.road)
    }

    pub fn len(&self) -> usize {
        self.approaches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.approaches.is_empty()
    }

    pub fn position(&self, road: &Road) -> Option<usize> {
        self.approaches
            .iter()
            .position(|approach| &approach.road == road)
    }

    pub fn downstream_capacity(&self, road: &Road) -> Option<u32> {
        self.approaches
            .iter()
            .find(|approach| &approach.road == road)
            .map(|approach| approach.downstream_capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, capacity: Option<u32>) -> RoadSpec {
        RoadSpec {
            name: name.to_string(),
            downstream_capacity: capacity,
        }
    }

    #[test]
    fn keeps_configured_order() -> Result<(), AppError> {
        let intersection = Intersection::new(vec![
            spec("Road B", Some(10)),
            spec("Road A", Some(30)),
        ])?;

        let names: Vec<&str> = intersection.roads().map(Road::name).collect();
        assert_eq!(names, vec!["Road B", "Road A"]);
        assert_eq!(intersection.len(), 2);
        assert!(!intersection.is_empty());
        assert_eq!(intersection.position(&Road::new("Road A")), Some(1));
        assert_eq!(
            intersection.downstream_capacity(&Road::new("Road B")),
            Some(10)
        );
        Ok(())
    }

    #[test]
    fn missing_capacity_is_rejected() {
        let result = Intersection::new(vec![spec("Road A", Some(30)), spec("Road C", None)]);

        match result {
            Err(AppError::Cycle(CycleError::MissingCapacityConfig { road })) => {
                assert_eq!(road, "Road C");
            }
            other => panic!("expected missing capacity error, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = Intersection::new(vec![spec("Road A", Some(30)), spec("Road A", Some(5))]);

        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::Invalid(_)))
        ));
    }

    #[test]
    fn empty_road_set_is_rejected() {
        assert!(Intersection::new(Vec::new()).is_err());
    }
}
