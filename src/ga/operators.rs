//! Crossover and mutation strategies for the modular driver.
//!
//! Each strategy declares the individual representations it supports; the
//! driver checks them against the population before the first generation.
//!
//! # Crossover
//!
//! - [`BlendCrossover`]: random-pairing blend crossover over a resampled
//!   candidate pool ([`Population::crossover`])
//!
//! # Mutation
//!
//! - [`CreepMutation`]: moves random genes part of the way towards one of
//!   their bounds ([`Population::mutate`])

use super::individual::Representation;
use super::population::Population;
use crate::error::{GaError, Result};
use rand::Rng;

// ============================================================================
// Strategy traits
// ============================================================================

/// A pluggable crossover operator.
pub trait CrossoverStrategy {
    /// Representations this strategy can recombine. An empty slice is
    /// compatible with nothing.
    fn compatible(&self) -> &[Representation];

    /// Recombines the population in place, preserving its size.
    fn cross<R: Rng>(&self, population: &mut Population, rng: &mut R) -> Result<()>;
}

/// A pluggable mutation operator.
pub trait MutationStrategy {
    /// Representations this strategy can mutate. An empty slice is
    /// compatible with nothing.
    fn compatible(&self) -> &[Representation];

    /// Checks the strategy's parameters against a population of
    /// `dimension` genes before any generation runs.
    fn check(&self, _dimension: usize) -> Result<()> {
        Ok(())
    }

    /// Mutates the population in place with the given magnitude in `[0, 1]`.
    fn mutate<R: Rng>(&self, population: &mut Population, magnitude: f64, rng: &mut R);
}

// ============================================================================
// Crossover operators
// ============================================================================

/// Blend crossover with probability `rate` and blending factor `alpha`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendCrossover {
    /// Probability that a pair is replaced by its children.
    pub rate: f64,
    /// Weight of the first parent in the first child.
    pub alpha: f64,
}

impl Default for BlendCrossover {
    fn default() -> Self {
        Self {
            rate: 0.9,
            alpha: 0.75,
        }
    }
}

impl BlendCrossover {
    /// Creates a blend crossover, rejecting rates or alphas outside `[0, 1]`.
    pub fn new(rate: f64, alpha: f64) -> Result<Self> {
        check_unit("crossover rate", rate)?;
        check_unit("crossover alpha", alpha)?;
        Ok(Self { rate, alpha })
    }
}

impl CrossoverStrategy for BlendCrossover {
    fn compatible(&self) -> &[Representation] {
        &[Representation::BoundedReal]
    }

    fn cross<R: Rng>(&self, population: &mut Population, rng: &mut R) -> Result<()> {
        population.crossover(self.rate, self.alpha, rng)
    }
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Creep mutation applied to each individual with probability `rate`.
///
/// `genes` fixes how many genes are mutated per individual; `None` redraws
/// the count uniformly from `1..=D` on every call.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreepMutation {
    pub rate: f64,
    pub genes: Option<usize>,
}

impl Default for CreepMutation {
    fn default() -> Self {
        Self {
            rate: 0.08,
            genes: None,
        }
    }
}

impl CreepMutation {
    /// Creates a creep mutation, rejecting rates outside `[0, 1]` and a
    /// fixed gene count of zero.
    pub fn new(rate: f64, genes: Option<usize>) -> Result<Self> {
        check_unit("mutation rate", rate)?;
        if genes == Some(0) {
            return Err(GaError::invalid("mutation gene count must be at least 1"));
        }
        Ok(Self { rate, genes })
    }
}

impl MutationStrategy for CreepMutation {
    fn compatible(&self) -> &[Representation] {
        &[Representation::BoundedReal]
    }

    fn check(&self, dimension: usize) -> Result<()> {
        match self.genes {
            Some(n) if n > dimension => Err(GaError::invalid(format!(
                "mutation gene count {n} exceeds dimension {dimension}"
            ))),
            _ => Ok(()),
        }
    }

    /// # Panics
    /// Panics if a fixed gene count exceeds the population's dimension.
    /// [`ModularGa::new`](super::ModularGa::new) rejects such a count up
    /// front via [`check`](MutationStrategy::check).
    fn mutate<R: Rng>(&self, population: &mut Population, magnitude: f64, rng: &mut R) {
        let dim = population.dimension();
        let genes = match self.genes {
            Some(n) => n,
            None => rng.random_range(1..=dim),
        };
        population.mutate(genes, self.rate, magnitude, rng);
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn check_unit(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GaError::invalid(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

// ============================================================================
// Tests
// ============================================================================
