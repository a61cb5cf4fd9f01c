//! Job shop construction adapter.
//!
//! Interprets node `v` as operation `v % machines` of job `v / machines`
//! and builds the Gantt chart while the permutation is being constructed,
//! so no separate decoding pass is needed.
//!
//! # Cost
//!
//! For a node whose job expects exactly that operation next:
//!
//! ```text
//! start = max(machine free time, job free time)
//! end   = start + duration
//! cost  = 2 + max(0, end - makespan) - 1 / (1 + (start - machine free time))
//! ```
//!
//! Moves that do not extend the makespan and leave the machine idle for
//! less time are cheaper. Any other node (an operation out of job order)
//! costs `f64::INFINITY`.
//!
//! # Reference
//! Blum & Sampels (2004), "An Ant Colony Optimization Algorithm for Shop
//! Scheduling Problems"

use super::model::ConstructionAdapter;
use crate::error::{PacoError, Result};
use crate::models::{JsspInstance, Schedule, ScheduledOperation};
use crate::validation::validate_instance;

/// Where an operation lands if appended in the current walk state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Job index.
    pub job: usize,
    /// Machine index.
    pub machine: usize,
    /// Start time.
    pub start: i64,
    /// End time.
    pub end: i64,
    /// Machine idle time before `start`.
    pub idle: i64,
}

/// Walk-scoped machine and job timelines.
#[derive(Debug, Clone)]
struct Timelines {
    machine_free: Vec<i64>,
    job_free: Vec<i64>,
    job_next: Vec<usize>,
    makespan: i64,
}

impl Timelines {
    fn new(machines: usize, jobs: usize) -> Self {
        Self {
            machine_free: vec![0; machines],
            job_free: vec![0; jobs],
            job_next: vec![0; jobs],
            makespan: 0,
        }
    }

    fn reset(&mut self) {
        self.machine_free.fill(0);
        self.job_free.fill(0);
        self.job_next.fill(0);
        self.makespan = 0;
    }

    fn probe(&self, instance: &JsspInstance, node: usize) -> Option<Placement> {
        let (job, op) = instance.decompose(node);
        if self.job_next.get(job) != Some(&op) {
            return None;
        }
        let operation = instance.operation(job, op)?;
        let machine_free = self.machine_free[operation.machine];
        let start = machine_free.max(self.job_free[job]);
        Some(Placement {
            job,
            machine: operation.machine,
            start,
            end: start + operation.duration,
            idle: start - machine_free,
        })
    }

    fn commit(&mut self, p: Placement, schedule: &mut Schedule) {
        self.job_next[p.job] += 1;
        self.job_free[p.job] = p.end;
        self.machine_free[p.machine] = p.end;
        self.makespan = self.makespan.max(p.end);
        schedule.push(p.machine, ScheduledOperation::new(p.job, p.start, p.end));
    }
}

/// PACO adapter for the job shop scheduling problem.
///
/// The produced [`Schedule`] is the side product of each walk and the
/// objective is its makespan.
#[derive(Debug, Clone)]
pub struct JsspAdapter {
    instance: JsspInstance,
    timelines: Timelines,
}

impl JsspAdapter {
    /// Creates an adapter for a validated instance.
    ///
    /// # Errors
    /// `InvalidArgument` listing every problem found by
    /// [`validate_instance`].
    pub fn new(instance: JsspInstance) -> Result<Self> {
        if let Err(errors) = validate_instance(&instance) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(PacoError::invalid_argument(messages.join("; ")));
        }
        let timelines = Timelines::new(instance.machines, instance.job_count());
        Ok(Self {
            instance,
            timelines,
        })
    }

    /// The instance being scheduled.
    pub fn instance(&self) -> &JsspInstance {
        &self.instance
    }

    /// Where `node` would land if appended now, or `None` if it is not the
    /// next operation of its job.
    pub fn placement(&self, node: usize) -> Option<Placement> {
        self.timelines.probe(&self.instance, node)
    }

    /// Replays `permutation` through the construction simulation.
    ///
    /// # Errors
    /// `InvalidArgument` if `permutation` is not a full, job-ordered
    /// sequence of the instance's nodes.
    pub fn decode(&self, permutation: &[usize]) -> Result<Schedule> {
        let n = self.instance.node_count();
        if permutation.len() != n {
            return Err(PacoError::invalid_argument(format!(
                "permutation has {} nodes, expected {n}",
                permutation.len()
            )));
        }

        let mut timelines = Timelines::new(self.instance.machines, self.instance.job_count());
        let mut schedule = self.create_solution();
        for (i, &node) in permutation.iter().enumerate() {
            let placement = timelines.probe(&self.instance, node).ok_or_else(|| {
                PacoError::invalid_argument(format!(
                    "node {node} at position {i} is not the next operation of its job"
                ))
            })?;
            timelines.commit(placement, &mut schedule);
        }
        Ok(schedule)
    }
}

impl ConstructionAdapter for JsspAdapter {
    type Solution = Schedule;

    fn node_count(&self) -> usize {
        self.instance.node_count()
    }

    fn create_solution(&self) -> Schedule {
        Schedule::new(self.instance.machines, self.instance.job_count())
    }

    fn begin(&mut self, solution: &mut Schedule) {
        self.timelines.reset();
        solution.clear();
        if solution.machines.len() != self.instance.machines {
            *solution = self.create_solution();
        }
    }

    fn cost_of_appending(&self, node: usize, _solution: &Schedule) -> f64 {
        match self.placement(node) {
            Some(p) => {
                let extension = (p.end - self.timelines.makespan).max(0) as f64;
                2.0 + extension - 1.0 / (1.0 + p.idle as f64)
            }
            None => f64::INFINITY,
        }
    }

    fn append(&mut self, node: usize, solution: &mut Schedule) -> Result<()> {
        let placement = self.placement(node).ok_or_else(|| {
            PacoError::invalid_state(format!("node {node} appended out of job order"))
        })?;
        self.timelines.commit(placement, solution);
        Ok(())
    }

    fn finish(&mut self, solution: &mut Schedule) -> f64 {
        solution.makespan = self.timelines.makespan;
        self.timelines.makespan as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aco::{PacoConfig, PacoModel};
    use crate::models::Job;
    use crate::validation::validate_individual;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    /// job0 = [(m0, 3), (m1, 2)], job1 = [(m1, 2), (m0, 4)]
    fn two_by_two() -> JsspInstance {
        JsspInstance::new(2)
            .with_job(Job::from_pairs(&[(0, 3), (1, 2)]))
            .with_job(Job::from_pairs(&[(1, 2), (0, 4)]))
    }

    /// 3 machines x 4 jobs with mixed routings.
    fn three_by_four() -> JsspInstance {
        JsspInstance::new(3)
            .with_name("small")
            .with_job(Job::from_pairs(&[(0, 3), (1, 2), (2, 2)]))
            .with_job(Job::from_pairs(&[(0, 2), (2, 1), (1, 4)]))
            .with_job(Job::from_pairs(&[(1, 4), (2, 3), (0, 1)]))
            .with_job(Job::from_pairs(&[(2, 2), (0, 5), (1, 3)]))
    }

    #[test]
    fn test_rejects_invalid_instance() {
        let inst = JsspInstance::new(2).with_job(Job::from_pairs(&[(0, 3)]));
        assert!(matches!(JsspAdapter::new(inst), Err(PacoError::InvalidArgument(_))));
    }

    #[test]
    fn test_initial_costs() {
        let mut adapter = JsspAdapter::new(two_by_two()).unwrap();
        let mut schedule = adapter.create_solution();
        adapter.begin(&mut schedule);

        // job0-op0: end 3, no idle -> 2 + 3 - 1
        assert_eq!(adapter.cost_of_appending(0, &schedule), 4.0);
        // job1-op0: end 2, no idle -> 2 + 2 - 1
        assert_eq!(adapter.cost_of_appending(2, &schedule), 3.0);
        // second operations are out of order
        assert_eq!(adapter.cost_of_appending(1, &schedule), f64::INFINITY);
        assert_eq!(adapter.cost_of_appending(3, &schedule), f64::INFINITY);
    }

    #[test]
    fn test_cost_rewards_no_idle_and_no_extension() {
        let mut adapter = JsspAdapter::new(two_by_two()).unwrap();
        let mut schedule = adapter.create_solution();
        adapter.begin(&mut schedule);
        adapter.append(0, &mut schedule).unwrap(); // m0: [0, 3)
        adapter.append(2, &mut schedule).unwrap(); // m1: [0, 2)

        // job0-op1 on m1: start 3, idle 1, end 5, extends makespan by 2
        let p = adapter.placement(1).unwrap();
        assert_eq!((p.machine, p.start, p.end, p.idle), (1, 3, 5, 1));
        assert_eq!(adapter.cost_of_appending(1, &schedule), 2.0 + 2.0 - 0.5);

        // job1-op1 on m0: start 3, no idle, end 7, extends by 4
        let p = adapter.placement(3).unwrap();
        assert_eq!((p.machine, p.start, p.end, p.idle), (0, 3, 7, 0));
        assert_eq!(adapter.cost_of_appending(3, &schedule), 2.0 + 4.0 - 1.0);
    }

    #[test]
    fn test_append_builds_expected_gantt() {
        let mut adapter = JsspAdapter::new(two_by_two()).unwrap();
        let mut schedule = adapter.create_solution();
        adapter.begin(&mut schedule);
        for node in [0, 2, 1, 3] {
            adapter.append(node, &mut schedule).unwrap();
        }
        let makespan = adapter.finish(&mut schedule);

        assert_eq!(makespan, 7.0);
        assert_eq!(schedule.makespan, 7);
        assert_eq!(
            schedule.row(0),
            &[ScheduledOperation::new(0, 0, 3), ScheduledOperation::new(1, 3, 7)]
        );
        assert_eq!(
            schedule.row(1),
            &[ScheduledOperation::new(1, 0, 2), ScheduledOperation::new(0, 3, 5)]
        );
    }

    #[test]
    fn test_append_out_of_order_fails() {
        let mut adapter = JsspAdapter::new(two_by_two()).unwrap();
        let mut schedule = adapter.create_solution();
        adapter.begin(&mut schedule);
        assert!(matches!(adapter.append(1, &mut schedule), Err(PacoError::InvalidState(_))));
        adapter.append(0, &mut schedule).unwrap();
        assert!(matches!(adapter.append(0, &mut schedule), Err(PacoError::InvalidState(_))));
    }

    #[test]
    fn test_begin_resets_state() {
        let mut adapter = JsspAdapter::new(two_by_two()).unwrap();
        let mut schedule = adapter.create_solution();
        adapter.begin(&mut schedule);
        adapter.append(0, &mut schedule).unwrap();
        adapter.begin(&mut schedule);
        assert_eq!(schedule.operation_count(), 0);
        assert_eq!(adapter.cost_of_appending(0, &schedule), 4.0);
        assert_eq!(adapter.cost_of_appending(1, &schedule), f64::INFINITY);
    }

    #[test]
    fn test_decode() {
        let adapter = JsspAdapter::new(two_by_two()).unwrap();
        let schedule = adapter.decode(&[2, 0, 3, 1]).unwrap();
        // m1: job1 [0, 2); m0: job0 [0, 3), job1 [3, 7); m1: job0 [3, 5)
        assert_eq!(schedule.makespan, 7);
        assert_eq!(schedule.row(1)[1], ScheduledOperation::new(0, 3, 5));

        assert!(matches!(adapter.decode(&[1, 0, 2, 3]), Err(PacoError::InvalidArgument(_))));
        assert!(matches!(adapter.decode(&[0, 0, 2, 3]), Err(PacoError::InvalidArgument(_))));
        assert!(matches!(adapter.decode(&[0, 2, 1]), Err(PacoError::InvalidArgument(_))));
    }

    #[test]
    fn test_walks_produce_valid_schedules() {
        let inst = three_by_four();
        let mut model = PacoModel::new(
            JsspAdapter::new(inst.clone()).unwrap(),
            PacoConfig::default().with_population_size(3),
        )
        .unwrap();

        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut ant = model.create_individual();
            model.apply(&mut ant, &mut rng).unwrap();

            assert!(validate_individual(&inst, &ant).is_ok(), "seed {seed}: {ant:?}");
            assert_eq!(ant.objective, ant.solution.makespan() as f64);
            assert!(ant.solution.makespan >= inst.lower_bound());
            assert_eq!(model.adapter().decode(&ant.permutation).unwrap(), ant.solution);
        }
    }

    #[test]
    fn test_two_by_two_walk_is_consistent() {
        let inst = two_by_two();
        let mut model = PacoModel::new(
            JsspAdapter::new(inst.clone()).unwrap(),
            PacoConfig::default().with_population_size(2).with_q0(0.0),
        )
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut ant = model.create_individual();

        for _ in 0..10 {
            model.apply(&mut ant, &mut rng).unwrap();
            let expected = model.adapter().decode(&ant.permutation).unwrap();
            assert_eq!(ant.solution, expected);
            assert_eq!(ant.solution.makespan, ant.solution.makespan());
            if ant.permutation == [0, 2, 1, 3] {
                assert_eq!(ant.solution.makespan, 7);
            }
        }
    }

    #[test]
    fn test_greedy_tie_takes_first_node() {
        // Both first operations cost 4; later job1-op1 and job0-op1 tie at 3.
        let inst = JsspInstance::new(2)
            .with_job(Job::from_pairs(&[(0, 3), (1, 2)]))
            .with_job(Job::from_pairs(&[(1, 3), (0, 2)]));
        let mut model = PacoModel::new(
            JsspAdapter::new(inst.clone()).unwrap(),
            PacoConfig::default().with_q0(1.0),
        )
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut ant = model.create_individual();
        model.apply(&mut ant, &mut rng).unwrap();

        assert_eq!(ant.permutation, vec![0, 2, 3, 1]);
        assert_eq!(ant.solution.makespan, 5);
        assert!(validate_individual(&inst, &ant).is_ok());
    }

    #[test]
    fn test_rejects_overflowing_instance() {
        let big = i64::MAX / 2 + 1;
        let inst = JsspInstance::new(2)
            .with_job(Job::from_pairs(&[(0, big), (1, big)]))
            .with_job(Job::from_pairs(&[(1, 1), (0, 1)]));
        assert!(matches!(JsspAdapter::new(inst), Err(PacoError::InvalidArgument(_))));
    }

    #[test]
    fn test_greedy_walk() {
        let inst = three_by_four();
        let mut model = PacoModel::new(
            JsspAdapter::new(inst.clone()).unwrap(),
            PacoConfig::default().with_q0(1.0),
        )
        .unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        let mut first = model.create_individual();
        let mut second = model.create_individual();
        model.apply(&mut first, &mut rng).unwrap();
        model.apply(&mut second, &mut rng).unwrap();

        // Greedy construction ignores randomness and pheromone.
        assert_eq!(first.permutation, second.permutation);
        assert!(validate_individual(&inst, &first).is_ok());
    }
}
