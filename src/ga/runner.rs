//! GA evolutionary loop execution.
//!
//! [`GaRunner`] orchestrates the monolithic process with a fixed operator
//! set: initialization → (roulette selection → blend crossover → creep
//! mutation → convergence check) per generation → best individual.

use super::config::GaConfig;
use super::individual::Individual;
use super::population::Population;
use super::types::Objective;
use crate::error::Result;
use crate::random::from_seed_or_entropy;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of a GA optimization run.
///
/// Contains the best solution found, along with statistics about the
/// evolutionary process.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// The best individual in the final population.
    pub best: Individual,

    /// Objective value of `best`.
    pub best_value: f64,

    /// Total number of generations executed.
    pub generations: usize,

    /// Whether the run stopped because the population converged.
    pub converged: bool,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best objective value at each generation's measurement point.
    pub history: Vec<f64>,
}

impl GaResult {
    /// The best chromosome found.
    pub fn chromosome(&self) -> &[f64] {
        self.best.chromosome()
    }
}

/// Mutation magnitude for generation `generation` of `max_generations`:
/// `1 - u^exponent(progress)` with `u` uniform in `[0, 1)`.
pub(crate) fn adaptive_magnitude<R, F>(
    generation: usize,
    max_generations: usize,
    exponent: F,
    rng: &mut R,
) -> f64
where
    R: Rng,
    F: Fn(f64) -> f64,
{
    let remaining = 1.0 - generation as f64 / max_generations as f64;
    let u: f64 = rng.random();
    1.0 - u.powf(exponent(remaining))
}

/// Executes the monolithic GA loop.
///
/// # Usage
///
/// ```
/// use u_realga::ga::{GaConfig, GaRunner};
///
/// let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
/// let config = GaConfig::new(2)
///     .with_uniform_bounds(-5.0, 5.0)
///     .with_population_size(50)
///     .with_seed(42);
/// let result = GaRunner::run(sphere, &config).unwrap();
/// assert!(result.best_value >= 0.0);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA with a generator seeded from [`GaConfig::seed`].
    pub fn run<O>(objective: O, config: &GaConfig) -> Result<GaResult>
    where
        O: Objective + 'static,
    {
        let mut rng = from_seed_or_entropy(config.seed);
        Self::run_with_rng(objective, config, &mut rng)
    }

    /// Runs the GA drawing all randomness from `rng`.
    pub fn run_with_rng<O, R>(objective: O, config: &GaConfig, rng: &mut R) -> Result<GaResult>
    where
        O: Objective + 'static,
        R: Rng,
    {
        Self::run_inner(objective, config, None, rng)
    }

    /// Runs the GA with a cancellation token.
    ///
    /// The flag is checked at the start of each generation; once set, the
    /// run stops and returns the best individual of the current population.
    pub fn run_with_cancel<O>(
        objective: O,
        config: &GaConfig,
        cancel: Arc<AtomicBool>,
    ) -> Result<GaResult>
    where
        O: Objective + 'static,
    {
        let mut rng = from_seed_or_entropy(config.seed);
        Self::run_inner(objective, config, Some(cancel), &mut rng)
    }

    fn run_inner<O, R>(
        objective: O,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
        rng: &mut R,
    ) -> Result<GaResult>
    where
        O: Objective + 'static,
        R: Rng,
    {
        config.validate()?;
        let max_gen = config.max_generations;

        // 1. Initialize population
        let mut population = Population::new(objective, config.bounds()?, config.population_size, rng)?;

        let mut history = Vec::with_capacity(max_gen);
        let mut generations = 0;
        let mut converged = false;
        let mut cancelled = false;

        // 2. Evolutionary loop
        for gen in 1..=max_gen {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            let (magnitude, genes) = Self::step(&mut population, config, gen, rng)?;

            generations = gen;
            converged = population.convergent(config.convergence_tolerance);
            let (_, best_value) = population.best();
            history.push(best_value);
            tracing::debug!(generation = gen, magnitude, genes, best_value, "generation complete");

            if converged {
                break;
            }
        }

        // 3. Report the best of the final population
        let (best, best_value) = population.best();
        tracing::info!(generations, converged, cancelled, best_value, "ga run finished");

        Ok(GaResult {
            best: best.clone(),
            best_value,
            generations,
            converged,
            cancelled,
            history,
        })
    }

    /// One generation of selection, crossover and mutation.
    ///
    /// The number of mutated genes is redrawn from `1..=D` on every call.
    /// Returns the magnitude and the gene count used.
    fn step<R: Rng>(
        population: &mut Population,
        config: &GaConfig,
        generation: usize,
        rng: &mut R,
    ) -> Result<(f64, usize)> {
        let magnitude = adaptive_magnitude(generation, config.max_generations, |remaining| remaining, rng);

        population.select_roulette(rng);
        population.crossover(config.crossover_rate, config.crossover_alpha, rng)?;
        let genes = rng.random_range(1..=population.dimension());
        population.mutate(genes, config.mutation_rate, magnitude, rng);
        Ok((magnitude, genes))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use std::cell::Cell;
    use std::rc::Rc;

    fn sphere(x: &[f64]) -> f64 {
        x.iter().map(|v| v * v).sum()
    }

    fn config() -> GaConfig {
        GaConfig::new(3)
            .with_uniform_bounds(-5.0, 5.0)
            .with_population_size(60)
            .with_max_generations(15)
            .with_seed(42)
    }

    #[test]
    fn test_sphere_improves_on_random() {
        let result = GaRunner::run(sphere, &config()).unwrap();
        // a random point in [-5, 5]^3 averages 25
        assert!(result.best_value < 1.0, "got {}", result.best_value);
        assert!(result.generations >= 1 && result.generations <= 15);
        assert_eq!(result.history.len(), result.generations);
        assert_eq!(sphere(result.chromosome()), result.best_value);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let a = GaRunner::run(sphere, &config()).unwrap();
        let b = GaRunner::run(sphere, &config()).unwrap();
        assert_eq!(a.best_value, b.best_value);
        assert_eq!(a.chromosome(), b.chromosome());
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_invalid_config_rejected_before_evaluation() {
        let calls = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&calls);
        let objective = move |x: &[f64]| {
            counter.set(counter.get() + 1);
            sphere(x)
        };
        let config = config().with_population_size(1);
        let err = GaRunner::run(objective, &config).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_flat_objective_converges_immediately() {
        let flat = |_: &[f64]| 1.0;
        let result = GaRunner::run(flat, &config()).unwrap();
        assert!(result.converged);
        assert_eq!(result.generations, 1);
        assert_eq!(result.best_value, 1.0);
    }

    #[test]
    fn test_runs_full_budget_without_convergence() {
        let config = config().with_convergence_tolerance(0.0);
        let result = GaRunner::run(sphere, &config).unwrap();
        if !result.converged {
            assert_eq!(result.generations, 15);
        }
    }

    #[test]
    fn test_evaluates_once_per_individual_per_generation() {
        let calls = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&calls);
        let objective = move |x: &[f64]| {
            counter.set(counter.get() + 1);
            sphere(x)
        };
        let config = config().with_convergence_tolerance(0.0);
        let result = GaRunner::run(objective, &config).unwrap();
        // initial selection evaluates once, then one pass per generation
        assert_eq!(calls.get(), 60 * (result.generations + 1));
    }

    #[test]
    fn test_bounds_without_zero_fail_in_crossover() {
        let config = config().with_uniform_bounds(1.0, 5.0).with_crossover_rate(1.0);
        let err = GaRunner::run(sphere, &config).unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_cancellation_before_start() {
        let cancel = Arc::new(AtomicBool::new(true));
        let result = GaRunner::run_with_cancel(sphere, &config(), cancel).unwrap();
        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert!(result.history.is_empty());
    }

    #[test]
    fn test_mutated_gene_count_redrawn_each_generation() {
        let config = GaConfig::new(5)
            .with_uniform_bounds(-5.0, 5.0)
            .with_population_size(20)
            .with_max_generations(40);
        let mut rng = create_rng(42);
        let mut population =
            Population::new(sphere, config.bounds().unwrap(), config.population_size, &mut rng).unwrap();

        let counts: Vec<usize> = (1..=config.max_generations)
            .map(|gen| GaRunner::step(&mut population, &config, gen, &mut rng).unwrap().1)
            .collect();
        assert!(counts.iter().all(|c| (1..=5).contains(c)), "counts {counts:?}");
        let mut distinct = counts.clone();
        distinct.sort_unstable();
        distinct.dedup();
        assert!(distinct.len() > 1, "gene count never changed: {counts:?}");
    }

    #[test]
    fn test_adaptive_magnitude_range() {
        let mut rng = create_rng(42);
        for gen in 1..=10 {
            let m = adaptive_magnitude(gen, 10, |r| r, &mut rng);
            assert!((0.0..=1.0).contains(&m), "magnitude {m}");
        }
        // last generation: exponent 0, u^0 = 1
        assert_eq!(adaptive_magnitude(10, 10, |r| r, &mut rng), 0.0);
    }
}
