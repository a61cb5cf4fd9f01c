//! Schedule (Gantt chart) model.
//!
//! One row per machine, each row an ordered list of `(job, start, end)`
//! placements. Rows are filled left to right during construction, so the
//! length of a row doubles as that machine's next free slot.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};

/// A job operation placed on a machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledOperation {
    /// Job index.
    pub job: usize,
    /// Start time.
    pub start: i64,
    /// End time.
    pub end: i64,
}

impl ScheduledOperation {
    /// Creates a placement.
    pub fn new(job: usize, start: i64, end: i64) -> Self {
        Self { job, start, end }
    }

    /// Processing time (`end - start`).
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end - self.start
    }
}

/// A complete or partial job shop schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Per-machine rows in processing order.
    pub machines: Vec<Vec<ScheduledOperation>>,
    /// Latest end time over all rows.
    pub makespan: i64,
}

impl Schedule {
    /// Creates an empty schedule with room for `jobs` placements per machine.
    pub fn new(machines: usize, jobs: usize) -> Self {
        Self {
            machines: (0..machines).map(|_| Vec::with_capacity(jobs)).collect(),
            makespan: 0,
        }
    }

    /// Empties every row, keeping allocations.
    pub fn clear(&mut self) {
        for row in &mut self.machines {
            row.clear();
        }
        self.makespan = 0;
    }

    /// Appends a placement to a machine row.
    pub fn push(&mut self, machine: usize, operation: ScheduledOperation) {
        self.machines[machine].push(operation);
        self.makespan = self.makespan.max(operation.end);
    }

    /// Makespan recomputed from the rows.
    pub fn makespan(&self) -> i64 {
        self.machines
            .iter()
            .flat_map(|row| row.iter())
            .map(|op| op.end)
            .max()
            .unwrap_or(0)
    }

    /// Placements on a machine, in processing order.
    pub fn row(&self, machine: usize) -> &[ScheduledOperation] {
        self.machines.get(machine).map_or(&[], |r| r.as_slice())
    }

    /// All placements of a job as `(machine, placement)`, sorted by start.
    pub fn operations_for_job(&self, job: usize) -> Vec<(usize, ScheduledOperation)> {
        let mut ops: Vec<(usize, ScheduledOperation)> = self
            .machines
            .iter()
            .enumerate()
            .flat_map(|(m, row)| row.iter().filter(|op| op.job == job).map(move |op| (m, *op)))
            .collect();
        ops.sort_by_key(|(_, op)| op.start);
        ops
    }

    /// Completion time for a job (latest end of its placements).
    pub fn job_completion_time(&self, job: usize) -> Option<i64> {
        self.machines
            .iter()
            .flat_map(|row| row.iter())
            .filter(|op| op.job == job)
            .map(|op| op.end)
            .max()
    }

    /// Busy time over makespan for one machine.
    ///
    /// Returns `None` if the makespan is zero.
    pub fn machine_utilization(&self, machine: usize) -> Option<f64> {
        let horizon = self.makespan();
        if horizon <= 0 {
            return None;
        }
        let busy: i64 = self.row(machine).iter().map(ScheduledOperation::duration).sum();
        Some(busy as f64 / horizon as f64)
    }

    /// Number of placed operations.
    pub fn operation_count(&self) -> usize {
        self.machines.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new(2, 2);
        s.push(0, ScheduledOperation::new(0, 0, 3));
        s.push(1, ScheduledOperation::new(1, 0, 2));
        s.push(0, ScheduledOperation::new(1, 3, 7));
        s.push(1, ScheduledOperation::new(0, 3, 5));
        s
    }

    #[test]
    fn test_schedule_makespan() {
        let s = sample_schedule();
        assert_eq!(s.makespan, 7);
        assert_eq!(s.makespan(), 7);
    }

    #[test]
    fn test_rows() {
        let s = sample_schedule();
        assert_eq!(s.row(0), &[ScheduledOperation::new(0, 0, 3), ScheduledOperation::new(1, 3, 7)]);
        assert_eq!(s.row(1).len(), 2);
        assert!(s.row(9).is_empty());
    }

    #[test]
    fn test_operations_for_job() {
        let s = sample_schedule();
        let j1 = s.operations_for_job(1);
        assert_eq!(
            j1,
            vec![
                (1, ScheduledOperation::new(1, 0, 2)),
                (0, ScheduledOperation::new(1, 3, 7)),
            ]
        );
    }

    #[test]
    fn test_job_completion_time() {
        let s = sample_schedule();
        assert_eq!(s.job_completion_time(0), Some(5));
        assert_eq!(s.job_completion_time(1), Some(7));
        assert_eq!(s.job_completion_time(5), None);
    }

    #[test]
    fn test_machine_utilization() {
        let s = sample_schedule();
        // m0: 3 + 4 = 7 over 7
        assert!((s.machine_utilization(0).unwrap() - 1.0).abs() < 1e-10);
        // m1: 2 + 2 = 4 over 7
        assert!((s.machine_utilization(1).unwrap() - 4.0 / 7.0).abs() < 1e-10);
    }

    #[test]
    fn test_clear_keeps_rows() {
        let mut s = sample_schedule();
        s.clear();
        assert_eq!(s.machines.len(), 2);
        assert_eq!(s.operation_count(), 0);
        assert_eq!(s.makespan, 0);
        assert!(s.machine_utilization(0).is_none());
    }
}
