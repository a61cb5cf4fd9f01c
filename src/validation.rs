//! Input and solution validation for job shop instances.
//!
//! Checks structural integrity of an instance before construction, and of
//! a constructed individual afterwards. Detects:
//! - Empty instances
//! - Jobs with the wrong number of operations
//! - Machine references out of range or visited twice within a job
//! - Negative durations, or durations summing past `i64`
//! - Permutations that are not a bijection on the node set
//! - Gantt rows that overlap, are out of time order, or disagree with the
//!   instance or the permutation
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 7

use crate::aco::{Individual, JsspAdapter};
use crate::models::{JsspInstance, Schedule};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The instance has no machines or no jobs.
    EmptyInstance,
    /// A job does not have exactly one operation per machine.
    OperationCount,
    /// An operation references a machine that doesn't exist.
    InvalidMachineReference,
    /// A job visits the same machine more than once.
    DuplicateMachine,
    /// An operation has a negative duration.
    NegativeDuration,
    /// The durations sum past the range of schedule times.
    DurationOverflow,
    /// The permutation is not a bijection on `0..node_count`.
    InvalidPermutation,
    /// The schedule's shape does not match the instance.
    ScheduleShape,
    /// Two operations on one machine overlap or are out of time order.
    MachineConflict,
    /// A scheduled operation's length differs from the instance.
    DurationMismatch,
    /// A job's operations run out of order or overlap.
    PrecedenceViolation,
    /// The recorded makespan or objective is wrong.
    MakespanMismatch,
    /// The schedule is not the one the permutation produces.
    PermutationMismatch,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a job shop instance.
///
/// Checks:
/// 1. At least one machine and one job
/// 2. Every job has exactly `machines` operations
/// 3. Every machine reference is in range
/// 4. No job visits a machine twice
/// 5. No duration is negative
/// 6. The sum of all durations fits in `i64`, which bounds every start
///    and end time a schedule can reach
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_instance(instance: &JsspInstance) -> ValidationResult {
    let mut errors = Vec::new();

    if instance.machines == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInstance,
            "Instance has no machines",
        ));
    }
    if instance.jobs.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInstance,
            "Instance has no jobs",
        ));
    }

    let mut total: Option<i64> = Some(0);
    for (j, job) in instance.jobs.iter().enumerate() {
        if job.operations.len() != instance.machines {
            errors.push(ValidationError::new(
                ValidationErrorKind::OperationCount,
                format!(
                    "Job {j} has {} operations, expected {}",
                    job.operations.len(),
                    instance.machines
                ),
            ));
        }

        let mut visited = vec![false; instance.machines];
        for (o, op) in job.operations.iter().enumerate() {
            match visited.get_mut(op.machine) {
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidMachineReference,
                    format!("Job {j} operation {o} references unknown machine {}", op.machine),
                )),
                Some(true) => errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateMachine,
                    format!("Job {j} visits machine {} more than once", op.machine),
                )),
                Some(seen) => *seen = true,
            }
            if op.duration < 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NegativeDuration,
                    format!("Job {j} operation {o} has negative duration {}", op.duration),
                ));
            }
            total = total.and_then(|t| t.checked_add(op.duration.max(0)));
        }
    }

    if total.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::DurationOverflow,
            "Total processing time overflows i64",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a constructed individual against its instance.
///
/// Checks:
/// 1. The instance itself is valid
/// 2. The permutation is a bijection on `0..node_count`
/// 3. One row per machine, one entry per job in each row
/// 4. Rows are time-ordered and non-overlapping
/// 5. Every entry's length matches the instance duration
/// 6. Each job's operations follow its routing without overlap
/// 7. The makespan is positive and equals the latest end time (and the
///    objective)
/// 8. The schedule is exactly what the permutation decodes to
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_individual(
    instance: &JsspInstance,
    individual: &Individual<Schedule>,
) -> ValidationResult {
    validate_instance(instance)?;

    let mut errors = Vec::new();
    let n = instance.node_count();
    let schedule = &individual.solution;

    check_permutation(&individual.permutation, n, &mut errors);
    if !check_shape(instance, schedule, &mut errors) {
        return Err(errors);
    }
    check_rows(instance, schedule, &mut errors);
    check_jobs(instance, schedule, &mut errors);
    check_makespan(instance, individual, &mut errors);

    if errors.is_empty() {
        check_replay(instance, individual, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_permutation(permutation: &[usize], n: usize, errors: &mut Vec<ValidationError>) {
    if permutation.len() != n {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidPermutation,
            format!("Permutation has {} nodes, expected {n}", permutation.len()),
        ));
    }
    let mut seen = vec![false; n];
    for &v in permutation {
        match seen.get_mut(v) {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPermutation,
                format!("Permutation contains out-of-range node {v}"),
            )),
            Some(true) => errors.push(ValidationError::new(
                ValidationErrorKind::InvalidPermutation,
                format!("Permutation contains node {v} more than once"),
            )),
            Some(s) => *s = true,
        }
    }
}

/// Returns false if the shape is too broken for the remaining checks.
fn check_shape(
    instance: &JsspInstance,
    schedule: &Schedule,
    errors: &mut Vec<ValidationError>,
) -> bool {
    if schedule.machines.len() != instance.machines {
        errors.push(ValidationError::new(
            ValidationErrorKind::ScheduleShape,
            format!(
                "Schedule has {} machine rows, expected {}",
                schedule.machines.len(),
                instance.machines
            ),
        ));
        return false;
    }

    let mut ok = true;
    for (m, row) in schedule.machines.iter().enumerate() {
        let mut seen = vec![false; instance.job_count()];
        for entry in row {
            match seen.get_mut(entry.job) {
                Some(s) if !*s => *s = true,
                _ => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::ScheduleShape,
                        format!(
                            "Machine {m} has an invalid or repeated entry for job {}",
                            entry.job
                        ),
                    ));
                    ok = false;
                }
            }
        }
        if row.len() != instance.job_count() {
            errors.push(ValidationError::new(
                ValidationErrorKind::ScheduleShape,
                format!(
                    "Machine {m} has {} entries, expected {}",
                    row.len(),
                    instance.job_count()
                ),
            ));
            ok = false;
        }
    }
    ok
}

fn check_rows(instance: &JsspInstance, schedule: &Schedule, errors: &mut Vec<ValidationError>) {
    for (m, row) in schedule.machines.iter().enumerate() {
        for pair in row.windows(2) {
            if pair[1].start < pair[0].end {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MachineConflict,
                    format!(
                        "Machine {m}: job {} starts at {} before job {} ends at {}",
                        pair[1].job, pair[1].start, pair[0].job, pair[0].end
                    ),
                ));
            }
        }

        for entry in row {
            let expected = instance.jobs[entry.job]
                .operations
                .iter()
                .find(|op| op.machine == m)
                .map(|op| op.duration);
            if entry.start < 0 || expected != Some(entry.duration()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DurationMismatch,
                    format!(
                        "Machine {m}: job {} runs [{}, {}), expected duration {:?}",
                        entry.job, entry.start, entry.end, expected
                    ),
                ));
            }
        }
    }
}

fn check_jobs(instance: &JsspInstance, schedule: &Schedule, errors: &mut Vec<ValidationError>) {
    for (j, job) in instance.jobs.iter().enumerate() {
        let mut ready = 0;
        for (o, op) in job.operations.iter().enumerate() {
            let Some(entry) = schedule.row(op.machine).iter().find(|e| e.job == j) else {
                continue;
            };
            if entry.start < ready {
                errors.push(ValidationError::new(
                    ValidationErrorKind::PrecedenceViolation,
                    format!(
                        "Job {j} operation {o} starts at {} before its predecessor ends at {ready}",
                        entry.start
                    ),
                ));
            }
            ready = entry.end;
        }
    }
}

fn check_makespan(
    instance: &JsspInstance,
    individual: &Individual<Schedule>,
    errors: &mut Vec<ValidationError>,
) {
    let schedule = &individual.solution;
    let latest = schedule.makespan();
    let has_work = instance.jobs.iter().any(|j| j.total_duration() > 0);
    if has_work && latest <= 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::MakespanMismatch,
            format!("Makespan {latest} must be positive"),
        ));
    }
    if schedule.makespan != latest {
        errors.push(ValidationError::new(
            ValidationErrorKind::MakespanMismatch,
            format!(
                "Recorded makespan {} differs from latest end time {latest}",
                schedule.makespan
            ),
        ));
    }
    if individual.objective != latest as f64 {
        errors.push(ValidationError::new(
            ValidationErrorKind::MakespanMismatch,
            format!(
                "Objective {} differs from makespan {latest}",
                individual.objective
            ),
        ));
    }
}

fn check_replay(
    instance: &JsspInstance,
    individual: &Individual<Schedule>,
    errors: &mut Vec<ValidationError>,
) {
    let decoded = JsspAdapter::new(instance.clone())
        .and_then(|adapter| adapter.decode(&individual.permutation));
    match decoded {
        Ok(expected) if expected == individual.solution => {}
        Ok(_) => errors.push(ValidationError::new(
            ValidationErrorKind::PermutationMismatch,
            "Schedule differs from the one produced by the permutation",
        )),
        Err(e) => errors.push(ValidationError::new(
            ValidationErrorKind::PermutationMismatch,
            format!("Permutation cannot be replayed: {e}"),
        )),
    }
}
