//! PACO configuration.

use crate::error::{PacoError, Result};

use super::edges::MAX_EDGES_PER_NODE;

/// Configuration parameters for Population-based ACO.
///
/// # Examples
///
/// ```
/// use u_paco::aco::PacoConfig;
///
/// let config = PacoConfig::default()
///     .with_population_size(3)
///     .with_q0(0.3)
///     .with_beta(1.5)
///     .with_seed(42);
/// assert_eq!(config.population_size, 3);
/// assert!(config.validate(16).is_ok());
/// assert!(config.validate(1).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct PacoConfig {
    /// Number of individuals kept in the population (K). Also the upper
    /// bound of every edge count.
    pub population_size: usize,
    /// Probability of greedy (cost-minimising) selection at each step.
    pub q0: f64,
    /// Exponent on the heuristic term.
    pub beta: f64,
    /// Upper clamp on the pheromone term of the sampling weight.
    pub tau_max: f64,
    /// Number of construction walks performed by the runner.
    pub max_iterations: usize,
    /// Random seed for the runner (None for OS entropy).
    pub seed: Option<u64>,
}

impl Default for PacoConfig {
    fn default() -> Self {
        Self {
            population_size: 5,
            q0: 0.5,
            beta: 2.0,
            tau_max: 10.0,
            max_iterations: 1000,
            seed: None,
        }
    }
}

impl PacoConfig {
    /// Sets the population size (K).
    pub fn with_population_size(mut self, k: usize) -> Self {
        self.population_size = k;
        self
    }

    /// Sets the greedy-selection probability.
    pub fn with_q0(mut self, q0: f64) -> Self {
        self.q0 = q0;
        self
    }

    /// Sets the heuristic exponent.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the pheromone clamp.
    pub fn with_tau_max(mut self, tau_max: f64) -> Self {
        self.tau_max = tau_max;
        self
    }

    /// Sets the number of walks performed by the runner.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks the parameters for a problem with `node_count` nodes.
    ///
    /// # Errors
    /// `InvalidArgument` describing the first offending parameter.
    pub fn validate(&self, node_count: usize) -> Result<()> {
        if node_count <= 1 {
            return Err(PacoError::invalid_argument(format!(
                "permutation length must be > 1, got {node_count}"
            )));
        }
        if self.population_size == 0 || self.population_size > MAX_EDGES_PER_NODE {
            return Err(PacoError::invalid_argument(format!(
                "population size must be in 1..={MAX_EDGES_PER_NODE}, got {}",
                self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.q0) {
            return Err(PacoError::invalid_argument(format!(
                "q0 must be in [0, 1], got {}",
                self.q0
            )));
        }
        if !self.beta.is_finite() || self.beta < 0.0 {
            return Err(PacoError::invalid_argument(format!(
                "beta must be finite and >= 0, got {}",
                self.beta
            )));
        }
        if self.tau_max.is_nan() || self.tau_max <= 0.0 {
            return Err(PacoError::invalid_argument(format!(
                "tau_max must be > 0, got {}",
                self.tau_max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PacoConfig::default();
        assert!(config.validate(4).is_ok());
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_builder() {
        let config = PacoConfig::default()
            .with_population_size(7)
            .with_q0(0.9)
            .with_beta(3.0)
            .with_tau_max(2.5)
            .with_max_iterations(50)
            .with_seed(42);
        assert_eq!(config.population_size, 7);
        assert_eq!(config.q0, 0.9);
        assert_eq!(config.beta, 3.0);
        assert_eq!(config.tau_max, 2.5);
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_rejects_short_permutation() {
        let config = PacoConfig::default();
        assert!(matches!(config.validate(1), Err(PacoError::InvalidArgument(_))));
        assert!(matches!(config.validate(0), Err(PacoError::InvalidArgument(_))));
    }

    #[test]
    fn test_rejects_bad_parameters() {
        let bad = [
            PacoConfig::default().with_population_size(0),
            PacoConfig::default().with_q0(-0.1),
            PacoConfig::default().with_q0(1.5),
            PacoConfig::default().with_q0(f64::NAN),
            PacoConfig::default().with_beta(-1.0),
            PacoConfig::default().with_beta(f64::INFINITY),
            PacoConfig::default().with_tau_max(0.0),
            PacoConfig::default().with_tau_max(f64::NAN),
        ];
        for config in &bad {
            assert!(
                matches!(config.validate(4), Err(PacoError::InvalidArgument(_))),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_boundary_probabilities_accepted() {
        assert!(PacoConfig::default().with_q0(0.0).validate(4).is_ok());
        assert!(PacoConfig::default().with_q0(1.0).validate(4).is_ok());
        assert!(PacoConfig::default().with_beta(0.0).validate(4).is_ok());
    }
}
