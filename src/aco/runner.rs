//! Iterated PACO driver.
//!
//! Repeats construction walks on a single [`PacoModel`] and keeps the best
//! individual seen. Each walk is integrated into the population before the
//! next one starts.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info};

use super::config::PacoConfig;
use super::model::{ConstructionAdapter, Individual, PacoModel};
use crate::error::{PacoError, Result};

/// Outcome of a [`PacoRunner::run`].
#[derive(Debug, Clone)]
pub struct PacoResult<S> {
    /// Best individual (lowest objective) over the run.
    pub best: Individual<S>,
    /// Number of walks performed.
    pub iterations: usize,
    /// Zero-based walk index at which `best` was found.
    pub best_iteration: usize,
}

impl<S> PacoResult<S> {
    /// Objective value of the best individual.
    pub fn best_objective(&self) -> f64 {
        self.best.objective
    }
}

/// Runs PACO for a fixed number of walks.
///
/// # Example
/// ```
/// use u_paco::aco::{JsspAdapter, PacoConfig, PacoRunner};
/// use u_paco::models::{Job, JsspInstance};
///
/// let instance = JsspInstance::new(2)
///     .with_job(Job::from_pairs(&[(0, 3), (1, 2)]))
///     .with_job(Job::from_pairs(&[(1, 2), (0, 4)]));
/// let config = PacoConfig::default().with_max_iterations(50).with_seed(42);
///
/// let result = PacoRunner::run(JsspAdapter::new(instance).unwrap(), &config).unwrap();
/// assert_eq!(result.iterations, 50);
/// assert!(result.best_objective() >= 7.0);
/// ```
pub struct PacoRunner;

impl PacoRunner {
    /// Builds a model around `adapter` and performs
    /// `config.max_iterations` walks.
    ///
    /// # Errors
    /// `InvalidArgument` if the configuration is invalid or requests zero
    /// walks; any `InvalidState` raised during a walk.
    pub fn run<A: ConstructionAdapter>(
        adapter: A,
        config: &PacoConfig,
    ) -> Result<PacoResult<A::Solution>> {
        if config.max_iterations == 0 {
            return Err(PacoError::invalid_argument("max_iterations must be > 0"));
        }

        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let mut model = PacoModel::new(adapter, config.clone())?;

        let mut ant = model.create_individual();
        let mut best = model.create_individual();
        let mut best_iteration = 0;

        for iteration in 0..config.max_iterations {
            model.apply(&mut ant, &mut rng)?;
            if ant.objective < best.objective {
                debug!(iteration, objective = ant.objective, "improved best individual");
                best.clone_from(&ant);
                best_iteration = iteration;
            }
        }

        info!(
            objective = best.objective,
            iterations = config.max_iterations,
            best_iteration,
            "PACO run finished"
        );

        Ok(PacoResult {
            best,
            iterations: config.max_iterations,
            best_iteration,
        })
    }
}
