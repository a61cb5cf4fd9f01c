//! Job shop instance.
//!
//! Read-only problem data consumed by the construction adapter. Node
//! identifiers used by the PACO model map onto `(job, operation)` pairs via
//! `node = job * machines + operation`.

use serde::{Deserialize, Serialize};

use super::{Job, Operation};

/// A job shop scheduling instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsspInstance {
    /// Instance name.
    #[serde(default)]
    pub name: String,
    /// Number of machines.
    pub machines: usize,
    /// Jobs, each with `machines` operations.
    pub jobs: Vec<Job>,
}

impl JsspInstance {
    /// Creates an instance with the given machine count and no jobs.
    pub fn new(machines: usize) -> Self {
        Self {
            name: String::new(),
            machines,
            jobs: Vec::new(),
        }
    }

    /// Sets the instance name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a job.
    pub fn with_job(mut self, job: Job) -> Self {
        self.jobs.push(job);
        self
    }

    /// Number of jobs.
    #[inline]
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Number of construction nodes (`machines * jobs`).
    #[inline]
    pub fn node_count(&self) -> usize {
        self.machines * self.jobs.len()
    }

    /// Encodes `(job, operation)` as a node identifier.
    #[inline]
    pub fn node_of(&self, job: usize, operation: usize) -> usize {
        job * self.machines + operation
    }

    /// Decodes a node identifier into `(job, operation)`.
    #[inline]
    pub fn decompose(&self, node: usize) -> (usize, usize) {
        (node / self.machines, node % self.machines)
    }

    /// The `operation`-th step of `job`, if it exists.
    pub fn operation(&self, job: usize, operation: usize) -> Option<&Operation> {
        self.jobs.get(job).and_then(|j| j.operations.get(operation))
    }

    /// Trivial makespan lower bound: the larger of the longest job and the
    /// most loaded machine.
    pub fn lower_bound(&self) -> i64 {
        let longest_job = self
            .jobs
            .iter()
            .map(Job::total_duration)
            .max()
            .unwrap_or(0);

        let mut load = vec![0i64; self.machines];
        for op in self.jobs.iter().flat_map(|j| j.operations.iter()) {
            if let Some(l) = load.get_mut(op.machine) {
                *l = l.saturating_add(op.duration);
            }
        }
        let busiest = load.into_iter().max().unwrap_or(0);

        longest_job.max(busiest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> JsspInstance {
        JsspInstance::new(2)
            .with_name("2x2")
            .with_job(Job::from_pairs(&[(0, 3), (1, 2)]))
            .with_job(Job::from_pairs(&[(1, 2), (0, 4)]))
    }

    #[test]
    fn test_node_encoding() {
        let inst = two_by_two();
        assert_eq!(inst.node_count(), 4);
        assert_eq!(inst.node_of(1, 0), 2);
        assert_eq!(inst.decompose(3), (1, 1));
        for node in 0..inst.node_count() {
            let (j, o) = inst.decompose(node);
            assert_eq!(inst.node_of(j, o), node);
        }
    }

    #[test]
    fn test_operation_lookup() {
        let inst = two_by_two();
        assert_eq!(inst.operation(1, 1), Some(&Operation::new(0, 4)));
        assert!(inst.operation(2, 0).is_none());
        assert!(inst.operation(0, 2).is_none());
    }

    #[test]
    fn test_lower_bound() {
        let inst = two_by_two();
        // jobs: 5, 6; machines: m0 = 3 + 4 = 7, m1 = 2 + 2 = 4
        assert_eq!(inst.lower_bound(), 7);
        assert_eq!(JsspInstance::new(3).lower_bound(), 0);
    }

    #[test]
    fn test_lower_bound_saturates() {
        let inst = JsspInstance::new(2)
            .with_job(Job::from_pairs(&[(0, i64::MAX), (1, i64::MAX)]))
            .with_job(Job::from_pairs(&[(1, 1), (0, 1)]));
        assert_eq!(inst.lower_bound(), i64::MAX);
    }

    #[test]
    fn test_instance_from_json() {
        let json = r#"{
            "machines": 2,
            "jobs": [
                {
                    "operations": [
                        { "machine": 0, "duration": 3 },
                        { "machine": 1, "duration": 2 }
                    ]
                },
                {
                    "name": "J1",
                    "operations": [
                        { "machine": 1, "duration": 2 },
                        { "machine": 0, "duration": 4 }
                    ]
                }
            ]
        }"#;
        let inst: JsspInstance = serde_json::from_str(json).unwrap();
        assert_eq!(inst.machines, 2);
        assert_eq!(inst.job_count(), 2);
        assert_eq!(inst.jobs[1].name, "J1");
        assert_eq!(inst.jobs[0], two_by_two().jobs[0]);
        assert_eq!(inst.lower_bound(), 7);
    }
}
