use std::collections::HashMap;

/// Full configuration for one scheduling week: the ordered day labels plus
/// every location and worker in play.
///
/// This is an immutable snapshot; the formulation reads it and allocates
/// fresh vectors and rows, nothing is mutated after construction.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    /// Day labels in scheduling order (the order fixes variable indexing)
    pub days: Vec<String>,
    pub locations: Vec<Location>,
    pub workers: Vec<Worker>,
}

/// A site with a minimum head-count per day
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    /// Day label -> minimum number of workers present that day
    pub requirements: HashMap<String, u32>,
}

/// A staff member with a weekly workload target and day preferences
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Worker {
    pub name: String,
    /// Desired working days per week; the solve treats this as a lower bound
    pub target_days: u32,
    /// Day label -> preference weight, higher = more preferred
    pub weights: HashMap<String, f64>,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requirements: HashMap::new(),
        }
    }

    pub fn require(mut self, day: impl Into<String>, count: u32) -> Self {
        self.requirements.insert(day.into(), count);
        self
    }
}

impl Worker {
    pub fn new(name: impl Into<String>, target_days: u32) -> Self {
        Self {
            name: name.into(),
            target_days,
            weights: HashMap::new(),
        }
    }

    pub fn prefer(mut self, day: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(day.into(), weight);
        self
    }
}
