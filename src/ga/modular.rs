//! Modular GA driver with pluggable operators and elitism.
//!
//! [`ModularGa`] composes a [`SelectionStrategy`], a [`CrossoverStrategy`]
//! and a [`MutationStrategy`] around a [`Population`]. Construction fails
//! with [`ConfigError::Incompatible`] if any strategy does not declare
//! support for the population's representation, so an incompatible run
//! never starts. Strategy parameters that cannot fit the population's
//! dimension are rejected the same way with [`ConfigError::Invalid`].
//!
//! Per generation:
//!
//! 1. With elitism, clone the current best individual (this evaluates the
//!    population); otherwise evaluate explicitly.
//! 2. Select, then cross.
//! 3. Mutate with magnitude `1 - u^((1 - g/G)^3)`.
//! 4. With elitism, overwrite a uniformly random slot with the clone.
//!
//! The loop always runs the full generation budget.

use super::individual::Representation;
use super::operators::{CrossoverStrategy, MutationStrategy};
use super::population::Population;
use super::runner::{adaptive_magnitude, GaResult};
use super::selection::SelectionStrategy;
use super::types::{arctan_fitness, FitnessScheme};
use crate::error::{ConfigError, GaError, Result};
use rand::Rng;

/// Fails unless `representation` is one of `supported`.
fn ensure_compatible(
    operator: &'static str,
    supported: &[Representation],
    representation: Representation,
) -> Result<()> {
    if supported.contains(&representation) {
        Ok(())
    } else {
        Err(GaError::Configuration(ConfigError::Incompatible {
            operator,
            representation,
        }))
    }
}

/// A GA assembled from pluggable strategies.
///
/// # Examples
///
/// ```
/// use u_realga::ga::{BlendCrossover, Bounds, CreepMutation, ModularGa, Population, Selection};
/// use u_realga::random::create_rng;
///
/// let mut rng = create_rng(7);
/// let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
/// let population = Population::new(sphere, Bounds::uniform(2, -5.0, 5.0).unwrap(), 40, &mut rng).unwrap();
///
/// let mut ga = ModularGa::new(
///     population,
///     Selection::Roulette,
///     BlendCrossover::new(0.9, 0.25).unwrap(),
///     CreepMutation::new(0.1, None).unwrap(),
/// )
/// .unwrap();
/// let result = ga.run(10, true, &mut rng).unwrap();
/// assert_eq!(result.generations, 10);
/// ```
#[derive(Debug)]
pub struct ModularGa<S, C, M> {
    population: Population,
    selection: S,
    crossover: C,
    mutation: M,
}

impl<S, C, M> ModularGa<S, C, M>
where
    S: SelectionStrategy,
    C: CrossoverStrategy,
    M: MutationStrategy,
{
    /// Assembles a driver, checking every strategy against the population's
    /// representation.
    ///
    /// Fitness defaults to [`arctan_fitness`]; see
    /// [`with_fitness_transform`](Self::with_fitness_transform).
    pub fn new(mut population: Population, selection: S, crossover: C, mutation: M) -> Result<Self> {
        let representation = population.representation();
        ensure_compatible("selection", selection.compatible(), representation)?;
        ensure_compatible("crossover", crossover.compatible(), representation)?;
        ensure_compatible("mutation", mutation.compatible(), representation)?;
        mutation.check(population.dimension())?;

        population.set_fitness_scheme(FitnessScheme::Transform(arctan_fitness));
        Ok(Self {
            population,
            selection,
            crossover,
            mutation,
        })
    }

    /// Replaces the objective-to-fitness transform.
    ///
    /// The transform must be strictly positive and decreasing so that a
    /// smaller objective gets a larger selection weight.
    pub fn with_fitness_transform(mut self, transform: fn(f64) -> f64) -> Self {
        self.population
            .set_fitness_scheme(FitnessScheme::Transform(transform));
        self
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn population_mut(&mut self) -> &mut Population {
        &mut self.population
    }

    /// Consumes the driver, returning its population.
    pub fn into_population(self) -> Population {
        self.population
    }

    /// Reinitializes the population and evolves it for `generations`
    /// generations.
    ///
    /// `history` in the result holds the best objective value at the start
    /// of each generation, followed by the best value of the final
    /// population. With elitism it is non-increasing.
    pub fn run<R: Rng>(&mut self, generations: usize, elitism: bool, rng: &mut R) -> Result<GaResult> {
        if generations == 0 {
            return Err(GaError::invalid("generations must be at least 1"));
        }

        self.population.initialize(rng);
        let mut history = Vec::with_capacity(generations + 1);

        for gen in 1..=generations {
            let elite = if elitism {
                let (best, value) = self.population.best();
                history.push(value);
                Some(best.clone())
            } else {
                self.population.evaluate();
                let (_, value) = self.population.best();
                history.push(value);
                None
            };

            self.selection.select(&mut self.population, rng);
            self.crossover.cross(&mut self.population, rng)?;

            let magnitude = adaptive_magnitude(gen, generations, |remaining| remaining.powi(3), rng);
            self.mutation.mutate(&mut self.population, magnitude, rng);

            if let Some(elite) = elite {
                let slot = rng.random_range(0..self.population.len());
                self.population.replace(slot, elite)?;
            }

            tracing::debug!(
                generation = gen,
                magnitude,
                elitism,
                best_value = history[history.len() - 1],
                "generation complete"
            );
        }

        let (best, best_value) = self.population.best();
        history.push(best_value);
        tracing::info!(generations, elitism, best_value, "modular ga run finished");

        Ok(GaResult {
            best: best.clone(),
            best_value,
            generations,
            converged: false,
            cancelled: false,
            history,
        })
    }
}
