//! Genetic Algorithm engine for bounded real vectors.
//!
//! Minimizes a black-box [`Objective`] over a box `[lower, upper]^D`.
//! Users provide the dimension, per-gene [`Bounds`] and the objective; the
//! engine returns the best chromosome found and its value.
//!
//! # Core Types
//!
//! - [`Individual`]: a chromosome with shared bounds and bound-preserving
//!   creep mutation
//! - [`Population`]: `N` individuals with lazily cached evaluation and
//!   fitness, plus population-wide selection, crossover and mutation
//!
//! # Drivers
//!
//! - [`GaRunner`] with [`GaConfig`]: fixed operator set (roulette, blend
//!   crossover, creep mutation) and early stop on convergence
//! - [`ModularGa`]: pluggable [`SelectionStrategy`], [`CrossoverStrategy`]
//!   and [`MutationStrategy`] with optional elitism
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

mod config;
mod individual;
mod modular;
pub mod operators;
mod population;
mod runner;
mod selection;
mod types;

pub use config::{GaConfig, DEFAULT_BOUND};
pub use individual::{Bounds, Individual, Representation};
pub use modular::ModularGa;
pub use operators::{BlendCrossover, CreepMutation, CrossoverStrategy, MutationStrategy};
pub use population::Population;
pub use runner::{GaResult, GaRunner};
pub use selection::{Selection, SelectionStrategy};
pub use types::{arctan_fitness, FitnessScheme, Objective};
