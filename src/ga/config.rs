//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the monolithic
//! evolutionary loop run by [`GaRunner`](super::GaRunner).

use super::individual::Bounds;
use crate::error::{GaError, Result};

/// Default per-gene bound magnitude when none is configured.
pub const DEFAULT_BOUND: f64 = 1e9;

/// Configuration for the Genetic Algorithm.
///
/// Immutable for the duration of a run.
///
/// # Defaults
///
/// ```
/// use u_realga::ga::GaConfig;
///
/// let config = GaConfig::new(2);
/// assert_eq!(config.population_size, 200);
/// assert_eq!(config.max_generations, 10);
/// assert_eq!(config.lower_bound, vec![-1e9, -1e9]);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_realga::ga::GaConfig;
///
/// let config = GaConfig::new(2)
///     .with_bounds(vec![-10.0, -10.0], vec![10.0, 10.0])
///     .with_max_generations(20)
///     .with_mutation_rate(0.1)
///     .with_crossover_alpha(0.25)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GaConfig {
    /// Number of genes per chromosome.
    pub dimension: usize,

    /// Per-gene lower bounds; length must equal `dimension`.
    pub lower_bound: Vec<f64>,

    /// Per-gene upper bounds; length must equal `dimension`.
    pub upper_bound: Vec<f64>,

    /// Number of individuals in the population.
    ///
    /// Larger populations increase diversity but slow down each generation.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_generations: usize,

    /// Probability that a pair of parents is replaced by two children (0.0–1.0).
    pub crossover_rate: f64,

    /// Probability that an individual is mutated in a generation (0.0–1.0).
    pub mutation_rate: f64,

    /// Blending factor of the crossover (0.0–1.0).
    pub crossover_alpha: f64,

    /// The run stops early once `max - min` of the evaluation vector is at
    /// most this value.
    pub convergence_tolerance: f64,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl GaConfig {
    /// Creates a configuration for `dimension` genes with default parameters.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            lower_bound: vec![-DEFAULT_BOUND; dimension],
            upper_bound: vec![DEFAULT_BOUND; dimension],
            population_size: 200,
            max_generations: 10,
            crossover_rate: 0.9,
            mutation_rate: 0.08,
            crossover_alpha: 0.75,
            convergence_tolerance: 1e-6,
            seed: None,
        }
    }

    /// Sets per-gene bounds.
    pub fn with_bounds(mut self, lower: Vec<f64>, upper: Vec<f64>) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    /// Sets the same interval for every gene.
    pub fn with_uniform_bounds(self, lower: f64, upper: f64) -> Self {
        let dim = self.dimension;
        self.with_bounds(vec![lower; dim], vec![upper; dim])
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover blending factor.
    pub fn with_crossover_alpha(mut self, alpha: f64) -> Self {
        self.crossover_alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Sets the convergence tolerance.
    pub fn with_convergence_tolerance(mut self, tolerance: f64) -> Self {
        self.convergence_tolerance = tolerance.max(0.0);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds validated [`Bounds`] from the configured vectors.
    pub fn bounds(&self) -> Result<Bounds> {
        if self.lower_bound.len() != self.dimension || self.upper_bound.len() != self.dimension {
            return Err(GaError::invalid(format!(
                "bounds must have {} genes, got lower={} upper={}",
                self.dimension,
                self.lower_bound.len(),
                self.upper_bound.len()
            )));
        }
        Bounds::new(self.lower_bound.clone(), self.upper_bound.clone())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(GaError::invalid("dimension must be at least 1"));
        }
        self.bounds()?;
        if self.population_size < 2 {
            return Err(GaError::invalid("population_size must be at least 2"));
        }
        if self.max_generations == 0 {
            return Err(GaError::invalid("max_generations must be at least 1"));
        }
        for (name, value) in [
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
            ("crossover_alpha", self.crossover_alpha),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GaError::invalid(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        // NaN fails this comparison too
        if !(self.convergence_tolerance >= 0.0) {
            return Err(GaError::invalid("convergence_tolerance must be non-negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::new(3);
        assert_eq!(config.dimension, 3);
        assert_eq!(config.lower_bound, vec![-1e9; 3]);
        assert_eq!(config.upper_bound, vec![1e9; 3]);
        assert_eq!(config.population_size, 200);
        assert_eq!(config.max_generations, 10);
        assert!((config.crossover_rate - 0.9).abs() < 1e-10);
        assert!((config.mutation_rate - 0.08).abs() < 1e-10);
        assert!((config.crossover_alpha - 0.75).abs() < 1e-10);
        assert!((config.convergence_tolerance - 1e-6).abs() < 1e-15);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::new(2)
            .with_uniform_bounds(-10.0, 10.0)
            .with_population_size(100)
            .with_max_generations(20)
            .with_crossover_rate(0.8)
            .with_mutation_rate(0.1)
            .with_crossover_alpha(0.25)
            .with_convergence_tolerance(1e-3)
            .with_seed(42);

        assert_eq!(config.lower_bound, vec![-10.0, -10.0]);
        assert_eq!(config.upper_bound, vec![10.0, 10.0]);
        assert_eq!(config.population_size, 100);
        assert_eq!(config.max_generations, 20);
        assert!((config.crossover_rate - 0.8).abs() < 1e-10);
        assert!((config.mutation_rate - 0.1).abs() < 1e-10);
        assert!((config.crossover_alpha - 0.25).abs() < 1e-10);
        assert!((config.convergence_tolerance - 1e-3).abs() < 1e-15);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_clamp_rates() {
        let config = GaConfig::new(1)
            .with_crossover_rate(-0.5)
            .with_mutation_rate(2.0)
            .with_crossover_alpha(1.5)
            .with_convergence_tolerance(-1.0);

        assert!((config.crossover_rate - 0.0).abs() < 1e-10);
        assert!((config.mutation_rate - 1.0).abs() < 1e-10);
        assert!((config.crossover_alpha - 1.0).abs() < 1e-10);
        assert!((config.convergence_tolerance - 0.0).abs() < 1e-15);
    }

    #[test]
    fn test_validate_zero_dimension() {
        assert!(GaConfig::new(0).validate().is_err());
    }

    #[test]
    fn test_validate_bounds_length_mismatch() {
        let config = GaConfig::new(2).with_bounds(vec![0.0], vec![1.0, 1.0]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_inverted_bounds() {
        let config = GaConfig::new(1).with_uniform_bounds(1.0, -1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = GaConfig::new(2).with_population_size(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_generations() {
        let config = GaConfig::new(2).with_max_generations(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rate_set_directly() {
        let mut config = GaConfig::new(2);
        config.mutation_rate = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_nan_tolerance() {
        let mut config = GaConfig::new(2);
        config.convergence_tolerance = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bounds_built_from_config() {
        let config = GaConfig::new(2).with_bounds(vec![-1.0, 0.0], vec![1.0, 5.0]);
        let bounds = config.bounds().unwrap();
        assert_eq!(bounds.lower(), &[-1.0, 0.0]);
        assert_eq!(bounds.upper(), &[1.0, 5.0]);
    }
}
