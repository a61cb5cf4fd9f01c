//! Job model.
//!
//! A job is a fixed chain of operations; each operation runs on exactly one
//! machine for a fixed duration, and operation `k + 1` may not start before
//! operation `k` has finished.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 7

use serde::{Deserialize, Serialize};

/// One processing step of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Machine index (`0..machines`).
    pub machine: usize,
    /// Processing time.
    pub duration: i64,
}

impl Operation {
    /// Creates an operation.
    pub fn new(machine: usize, duration: i64) -> Self {
        Self { machine, duration }
    }
}

/// A job: an ordered sequence of operations.
///
/// In a classical job shop each job visits every machine exactly once,
/// so the number of operations equals the number of machines. This is
/// checked by [`crate::validation::validate_instance`], not here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Operations in technological order.
    pub operations: Vec<Operation>,
}

impl Job {
    /// Creates an empty job.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a job from `(machine, duration)` pairs.
    pub fn from_pairs(pairs: &[(usize, i64)]) -> Self {
        Self {
            name: String::new(),
            operations: pairs.iter().map(|&(m, d)| Operation::new(m, d)).collect(),
        }
    }

    /// Sets the job name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends an operation.
    pub fn with_operation(mut self, machine: usize, duration: i64) -> Self {
        self.operations.push(Operation::new(machine, duration));
        self
    }

    /// Total processing time across all operations, saturating at
    /// `i64::MAX`.
    pub fn total_duration(&self) -> i64 {
        self.operations
            .iter()
            .fold(0i64, |acc, o| acc.saturating_add(o.duration))
    }

    /// Number of operations.
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_builder() {
        let job = Job::new()
            .with_name("J0")
            .with_operation(0, 3)
            .with_operation(1, 2);

        assert_eq!(job.name, "J0");
        assert_eq!(job.operation_count(), 2);
        assert_eq!(job.operations[1], Operation::new(1, 2));
        assert_eq!(job.total_duration(), 5);
    }

    #[test]
    fn test_job_from_pairs() {
        let job = Job::from_pairs(&[(1, 2), (0, 4)]);
        assert_eq!(job.operations[0].machine, 1);
        assert_eq!(job.operations[1].duration, 4);
    }

    #[test]
    fn test_job_empty() {
        let job = Job::new();
        assert_eq!(job.total_duration(), 0);
        assert_eq!(job.operation_count(), 0);
    }
}
