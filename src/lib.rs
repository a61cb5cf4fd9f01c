//! Population-based Ant Colony Optimization for job shop scheduling.
//!
//! Provides a generic PACO construction model driven by a problem adapter,
//! and a job shop adapter that builds the Gantt chart during construction.
//!
//! # Modules
//!
//! - **`aco`**: Candidate set, edge multiset, population, construction
//!   model, job shop adapter, and runner
//! - **`models`**: Domain types: `JsspInstance`, `Job`, `Operation`,
//!   `Schedule`, `ScheduledOperation`
//! - **`validation`**: Instance and solution integrity checks
//! - **`error`**: `PacoError` and the crate `Result` alias
//!
//! # Logging
//!
//! Emits `tracing` events (`debug`, `trace`, `info`); installing a
//! subscriber is left to the application.
//!
//! # References
//!
//! - Guntsch & Middendorf (2002), "A Population Based Approach for ACO"
//! - Blum & Sampels (2004), "An Ant Colony Optimization Algorithm for Shop
//!   Scheduling Problems"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod aco;
pub mod error;
pub mod models;
pub mod validation;

pub use error::{PacoError, Result};
