//! Bounded real-vector genetic algorithm.
//!
//! A population-based stochastic optimizer that minimizes an arbitrary
//! real-valued objective over a box-bounded continuous search space:
//!
//! - **Individuals** are real chromosomes that never leave their bounds:
//!   explicit assignment is validated and mutation is a bound-preserving
//!   creep towards one of the bounds.
//! - **Populations** evaluate lazily and cache results until an operator
//!   changes them.
//! - **Drivers**: [`ga::GaRunner`] runs a fixed operator set with a
//!   convergence check; [`ga::ModularGa`] accepts pluggable strategies and
//!   elitism.
//!
//! All randomness flows through an explicit, seedable generator
//! (see [`random`]), so seeded runs are reproducible.
//!
//! # Example
//!
//! ```
//! use u_realga::ga::{GaConfig, GaRunner};
//!
//! let schaffer = |x: &[f64]| {
//!     let r2 = x[0] * x[0] + x[1] * x[1];
//!     0.5 + (r2.sqrt().sin().powi(2) - 0.5) / (1.0 + 0.001 * r2).powi(2)
//! };
//! let config = GaConfig::new(2)
//!     .with_uniform_bounds(-10.0, 10.0)
//!     .with_max_generations(20)
//!     .with_mutation_rate(0.1)
//!     .with_crossover_alpha(0.25)
//!     .with_seed(42);
//! let result = GaRunner::run(schaffer, &config).unwrap();
//! assert!(result.best_value < 0.5);
//! ```

pub mod error;
pub mod ga;
pub mod random;

pub use error::{GaError, Result};
