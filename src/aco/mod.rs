//! Population-based Ant Colony Optimization.
//!
//! Instead of an explicit pheromone matrix, the pheromone on edge
//! `(i, j)` is the number of population members whose permutation contains
//! that edge. Adding an individual increments its edges and evicting one
//! decrements them, so pheromone never needs evaporation.
//!
//! # Components
//!
//! - [`CandidateSet`]: O(1) set of still-unvisited nodes for a walk
//! - [`EdgeMultiset`]: edge counts, dense matrix or sparse per-node lists
//! - [`Population`]: age-based FIFO of the last `K` individuals
//! - [`PacoModel`]: walk construction and population update
//! - [`ConstructionAdapter`]: problem hooks (cost, append, objective)
//! - [`JsspAdapter`]: job shop specialization building a Gantt chart
//! - [`PacoRunner`]: fixed-iteration driver
//!
//! # Reference
//! - Guntsch & Middendorf (2002), "A Population Based Approach for ACO"
//! - Dorigo & Stützle (2004), "Ant Colony Optimization", Ch. 3

mod candidates;
mod config;
pub mod edges;
mod jssp;
mod model;
mod population;
mod runner;

pub use candidates::CandidateSet;
pub use config::PacoConfig;
pub use edges::{DenseEdgeMultiset, EdgeMultiset, SparseEdgeMultiset};
pub use jssp::{JsspAdapter, Placement};
pub use model::{ConstructionAdapter, Individual, PacoModel};
pub use population::Population;
pub use runner::{PacoResult, PacoRunner};
