//! Population-based construction model.
//!
//! Drives one ant's walk over the nodes `0..n`: at every step the next
//! unvisited node is chosen either greedily (probability `q0`, lowest cost
//! wins) or by sampling with weight
//!
//! ```text
//! w(c) = min(count(prev, c) + 1, tau_max) * (1 / (1 + cost(c)))^beta
//! ```
//!
//! where `count` is the occurrence of the edge in the current population and
//! `cost` comes from the problem adapter. Candidates with a non-finite cost
//! are never selected. After the walk the new individual replaces the oldest
//! population member and the edge multiset is updated to match.
//!
//! # Reference
//! Guntsch & Middendorf (2002), "A Population Based Approach for ACO"

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::candidates::CandidateSet;
use super::config::PacoConfig;
use super::edges::EdgeMultiset;
use super::population::Population;
use crate::error::{PacoError, Result};

/// Problem-specific hooks used during construction.
///
/// The adapter owns all walk-scoped state (e.g. machine timelines) and
/// resets it in [`begin`](Self::begin). The model never inspects
/// [`Solution`](Self::Solution) itself.
pub trait ConstructionAdapter {
    /// Side product built alongside the permutation (e.g. a schedule).
    type Solution: Clone + std::fmt::Debug;

    /// Permutation length `n`.
    fn node_count(&self) -> usize;

    /// A blank solution suitable for [`begin`](Self::begin).
    fn create_solution(&self) -> Self::Solution;

    /// Resets walk-scoped state and clears `solution`.
    fn begin(&mut self, solution: &mut Self::Solution);

    /// Cost of appending `node` next. Must be a pure function of the current
    /// walk state; `f64::INFINITY` marks a structurally invalid move.
    fn cost_of_appending(&self, node: usize, solution: &Self::Solution) -> f64;

    /// Appends `node`, advancing walk state and `solution`.
    ///
    /// # Errors
    /// `InvalidState` if `node` is not a valid move in the current state.
    fn append(&mut self, node: usize, solution: &mut Self::Solution) -> Result<()>;

    /// Completes `solution` and returns its objective value (lower = better).
    fn finish(&mut self, solution: &mut Self::Solution) -> f64;
}

/// A constructed solution: the node permutation, the adapter's side product,
/// and its objective value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual<S> {
    /// Nodes in visiting order.
    pub permutation: Vec<usize>,
    /// Adapter-built solution.
    pub solution: S,
    /// Objective value (lower = better).
    pub objective: f64,
}

impl<S> Individual<S> {
    /// Wraps a blank solution; the objective starts at infinity.
    pub fn new(solution: S, node_count: usize) -> Self {
        Self {
            permutation: Vec::with_capacity(node_count),
            solution,
            objective: f64::INFINITY,
        }
    }
}

/// Population-based ACO construction model.
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_paco::aco::{JsspAdapter, PacoConfig, PacoModel};
/// use u_paco::models::{Job, JsspInstance};
///
/// let instance = JsspInstance::new(2)
///     .with_job(Job::from_pairs(&[(0, 3), (1, 2)]))
///     .with_job(Job::from_pairs(&[(1, 2), (0, 4)]));
/// let config = PacoConfig::default().with_population_size(2);
/// let mut model = PacoModel::new(JsspAdapter::new(instance).unwrap(), config).unwrap();
///
/// let mut rng = SmallRng::seed_from_u64(42);
/// let mut ant = model.create_individual();
/// model.apply(&mut ant, &mut rng).unwrap();
/// assert_eq!(ant.permutation.len(), 4);
/// assert!(ant.objective >= 7.0);
/// ```
#[derive(Debug, Clone)]
pub struct PacoModel<A: ConstructionAdapter> {
    adapter: A,
    config: PacoConfig,
    candidates: CandidateSet,
    edges: EdgeMultiset,
    population: Population<Individual<A::Solution>>,
    /// Sampling weights aligned with candidate slots.
    weights: Vec<f64>,
}

impl<A: ConstructionAdapter> PacoModel<A> {
    /// Creates a model over `adapter.node_count()` nodes.
    ///
    /// # Errors
    /// `InvalidArgument` if the node count is <= 1 or `config` is invalid.
    pub fn new(adapter: A, config: PacoConfig) -> Result<Self> {
        let n = adapter.node_count();
        config.validate(n)?;

        let mut edges = EdgeMultiset::new(n, config.population_size)?;
        edges.clear();

        Ok(Self {
            adapter,
            candidates: CandidateSet::new(n),
            edges,
            population: Population::new(config.population_size),
            weights: Vec::with_capacity(n),
            config,
        })
    }

    /// A blank individual to pass to [`apply`](Self::apply).
    pub fn create_individual(&self) -> Individual<A::Solution> {
        Individual::new(self.adapter.create_solution(), self.node_count())
    }

    /// Builds a complete individual into `dest` and integrates it into the
    /// population.
    ///
    /// # Errors
    /// `InvalidState` if no feasible candidate remains during the walk or the
    /// edge multiset bookkeeping is inconsistent.
    pub fn apply<R: Rng>(
        &mut self,
        dest: &mut Individual<A::Solution>,
        rng: &mut R,
    ) -> Result<()> {
        self.construct(dest, rng)?;
        self.integrate(dest)
    }

    /// Builds a complete individual into `dest` without touching the
    /// population or edge multiset.
    pub fn construct<R: Rng>(
        &mut self,
        dest: &mut Individual<A::Solution>,
        rng: &mut R,
    ) -> Result<()> {
        self.candidates.fill();
        dest.permutation.clear();
        self.adapter.begin(&mut dest.solution);

        let mut prev = None;
        while !self.candidates.is_empty() {
            let node = self.select_next(prev, &dest.solution, rng)?;
            self.candidates.delete(node)?;
            self.adapter.append(node, &mut dest.solution)?;
            dest.permutation.push(node);
            prev = Some(node);
        }

        dest.objective = self.adapter.finish(&mut dest.solution);
        Ok(())
    }

    /// Adds a finished individual to the population, evicting the oldest
    /// member once full, and moves the edge multiset along with it.
    ///
    /// The edge multiset is updated before the population, and on any error
    /// both are left as they were.
    ///
    /// # Errors
    /// `InvalidArgument` if `individual` is not a permutation of `0..n`;
    /// `InvalidState` if the edge bookkeeping is inconsistent.
    pub fn integrate(&mut self, individual: &Individual<A::Solution>) -> Result<()> {
        let n = self.node_count();
        let mut seen = vec![false; n];
        let is_permutation = individual.permutation.len() == n
            && individual
                .permutation
                .iter()
                .all(|&v| v < n && !std::mem::replace(&mut seen[v], true));
        if !is_permutation {
            return Err(PacoError::invalid_argument(format!(
                "individual is not a permutation of 0..{n}"
            )));
        }

        if let Some(old) = self.population.next_evicted() {
            self.edges.remove_permutation(&old.permutation)?;
            if let Err(e) = self.edges.add_permutation(&individual.permutation) {
                self.edges.add_permutation(&old.permutation)?;
                return Err(e);
            }
        } else {
            self.edges.add_permutation(&individual.permutation)?;
        }
        let evicted = self.population.push(individual.clone());

        trace!(
            objective = individual.objective,
            evicted = evicted.is_some(),
            population = self.population.len(),
            "integrated individual"
        );
        Ok(())
    }

    /// Resets the population and edge multiset.
    pub fn reset(&mut self) {
        self.population.clear();
        self.edges.clear();
    }

    fn select_next<R: Rng>(
        &mut self,
        prev: Option<usize>,
        solution: &A::Solution,
        rng: &mut R,
    ) -> Result<usize> {
        let greedy = rng.random_bool(self.config.q0);

        self.weights.clear();
        let mut best: Option<(usize, f64)> = None;
        for i in 0..self.candidates.size() {
            let node = self.candidates.get(i);
            let cost = self.adapter.cost_of_appending(node, solution);
            let feasible = cost.is_finite();
            if feasible && best.map_or(true, |(_, c)| cost < c) {
                best = Some((node, cost));
            }
            if !greedy {
                let w = if feasible { self.weight(prev, node, cost) } else { 0.0 };
                self.weights.push(w);
            }
        }

        let Some((best_node, _)) = best else {
            return Err(PacoError::invalid_state(format!(
                "no feasible candidate among {} remaining nodes",
                self.candidates.size()
            )));
        };
        if greedy {
            return Ok(best_node);
        }

        let total: f64 = self.weights.iter().sum();
        if !(total > 0.0 && total.is_finite()) {
            return Ok(best_node);
        }

        let target = rng.random::<f64>() * total;
        let mut acc = 0.0;
        let mut last_positive = best_node;
        for (i, &w) in self.weights.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            acc += w;
            last_positive = self.candidates.get(i);
            if target < acc {
                return Ok(last_positive);
            }
        }
        Ok(last_positive)
    }

    /// Sampling weight of moving from `prev` to `node` at `cost`.
    #[inline]
    fn weight(&self, prev: Option<usize>, node: usize, cost: f64) -> f64 {
        let count = self.edges.edge_count(prev, node);
        let tau = ((count + 1) as f64).min(self.config.tau_max);
        let eta = (1.0 / (1.0 + cost.max(0.0))).powf(self.config.beta);
        tau * eta
    }

    /// Permutation length `n`.
    pub fn node_count(&self) -> usize {
        self.candidates.capacity()
    }

    /// The configuration.
    pub fn config(&self) -> &PacoConfig {
        &self.config
    }

    /// The problem adapter.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// The live edge multiset.
    pub fn edges(&self) -> &EdgeMultiset {
        &self.edges
    }

    /// Population members from oldest to newest.
    pub fn population(&self) -> impl Iterator<Item = &Individual<A::Solution>> + '_ {
        self.population.iter()
    }

    /// Number of population members.
    pub fn population_len(&self) -> usize {
        self.population.len()
    }
}
