//! Fixed-size population with lazily cached evaluation.
//!
//! A [`Population`] owns `N` individuals, the objective they are scored
//! against, and two caches: the evaluation vector and the fitness
//! (selection weight) vector derived from it. Both caches are computed on
//! first access and dropped by every operator that changes membership or
//! chromosome content, so a cache is either absent or exactly consistent
//! with the current individuals.
//!
//! Selection and crossover write their result into a second slot buffer,
//! reusing its chromosome allocations, and then swap it with the active one.

use super::individual::{Bounds, Individual, Representation};
use super::types::{FitnessScheme, Objective};
use crate::error::{GaError, Result};
use rand::seq::{index, SliceRandom};
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// A slot in crossover's candidate pool.
enum Candidate {
    /// An unchanged parent, by index into the active slots.
    Parent(usize),
    Child(Individual),
}

/// The set of individuals evolved together.
///
/// # Examples
///
/// ```
/// use u_realga::ga::{Bounds, Population};
/// use u_realga::random::create_rng;
///
/// let mut rng = create_rng(42);
/// let bounds = Bounds::uniform(2, -5.0, 5.0).unwrap();
/// let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
/// let mut population = Population::new(sphere, bounds, 50, &mut rng).unwrap();
///
/// population.select_roulette(&mut rng);
/// population.crossover(0.9, 0.5, &mut rng).unwrap();
/// population.mutate(1, 0.1, 0.5, &mut rng);
///
/// let (best, value) = population.best();
/// assert_eq!(best.dimension(), 2);
/// assert!(value >= 0.0);
/// ```
pub struct Population {
    objective: Box<dyn Objective>,
    bounds: Arc<Bounds>,
    fitness_scheme: FitnessScheme,
    individuals: Vec<Individual>,
    buffer: Vec<Individual>,
    evaluation: Option<Vec<f64>>,
    fitness: Option<Vec<f64>>,
}

impl fmt::Debug for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Population")
            .field("size", &self.individuals.len())
            .field("bounds", &self.bounds)
            .field("fitness_scheme", &self.fitness_scheme)
            .field("evaluated", &self.evaluation.is_some())
            .finish_non_exhaustive()
    }
}

impl Population {
    /// Creates `size` individuals, each drawn uniformly within `bounds`.
    ///
    /// Fails with a configuration error when `size` is zero.
    pub fn new<O, R>(
        objective: O,
        bounds: impl Into<Arc<Bounds>>,
        size: usize,
        rng: &mut R,
    ) -> Result<Self>
    where
        O: Objective + 'static,
        R: Rng,
    {
        if size == 0 {
            return Err(GaError::invalid("population size must be at least 1"));
        }
        let bounds = bounds.into();
        let individuals: Vec<Individual> = (0..size)
            .map(|_| Individual::new(Arc::clone(&bounds)))
            .collect();
        let buffer = individuals.clone();
        let mut population = Self {
            objective: Box::new(objective),
            bounds,
            fitness_scheme: FitnessScheme::default(),
            individuals,
            buffer,
            evaluation: None,
            fitness: None,
        };
        population.initialize(rng);
        Ok(population)
    }

    /// Redraws every individual uniformly within the bounds.
    pub fn initialize<R: Rng>(&mut self, rng: &mut R) {
        for individual in &mut self.individuals {
            individual.initialize(rng);
        }
        self.invalidate();
    }

    /// Number of individuals, fixed for the population's lifetime.
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Always `false`; a population holds at least one individual.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.bounds.dimension()
    }

    pub fn bounds(&self) -> &Arc<Bounds> {
        &self.bounds
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    /// The encoding shared by every individual in this population.
    pub fn representation(&self) -> Representation {
        Representation::BoundedReal
    }

    pub fn fitness_scheme(&self) -> FitnessScheme {
        self.fitness_scheme
    }

    /// Changes how fitness is derived. The evaluation cache is kept.
    pub fn set_fitness_scheme(&mut self, scheme: FitnessScheme) {
        self.fitness_scheme = scheme;
        self.fitness = None;
    }

    /// Drops both caches.
    pub fn invalidate(&mut self) {
        self.evaluation = None;
        self.fitness = None;
    }

    /// Whether the evaluation cache is currently populated.
    pub fn is_evaluated(&self) -> bool {
        self.evaluation.is_some()
    }

    fn ensure_evaluation(&mut self) {
        if self.evaluation.is_none() {
            tracing::trace!(size = self.individuals.len(), "evaluating population");
            let objective = &self.objective;
            let values = self
                .individuals
                .iter()
                .map(|individual| objective.evaluate(individual.chromosome()))
                .collect();
            self.evaluation = Some(values);
        }
    }

    /// Objective value of each individual, in slot order.
    ///
    /// Computed at most once per population state.
    pub fn evaluation(&mut self) -> &[f64] {
        self.ensure_evaluation();
        self.evaluation.as_deref().unwrap_or(&[])
    }

    /// Normalized selection weight of each individual; sums to 1.
    pub fn fitness(&mut self) -> &[f64] {
        self.ensure_evaluation();
        if self.fitness.is_none() {
            let values = self.evaluation.as_deref().unwrap_or(&[]);
            self.fitness = Some(self.fitness_scheme.weights(values));
        }
        self.fitness.as_deref().unwrap_or(&[])
    }

    /// Fills both caches.
    pub fn evaluate(&mut self) {
        self.fitness();
    }

    /// The individual with the lowest objective value, and that value.
    ///
    /// Ties resolve to the first minimal slot.
    pub fn best(&mut self) -> (&Individual, f64) {
        self.ensure_evaluation();
        let values = self.evaluation.as_deref().unwrap_or(&[]);
        let mut best = 0;
        for (i, &value) in values.iter().enumerate().skip(1) {
            if value < values[best] {
                best = i;
            }
        }
        (&self.individuals[best], values[best])
    }

    /// `true` iff `max(evaluation) - min(evaluation) <= tolerance`.
    pub fn convergent(&mut self, tolerance: f64) -> bool {
        let (min, max) = self
            .evaluation()
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        max - min <= tolerance
    }

    /// Overwrites slot `index` with `individual`.
    ///
    /// Fails if the chromosome does not fit this population's bounds.
    ///
    /// # Panics
    /// Panics if `index >= self.len()`.
    pub fn replace(&mut self, index: usize, individual: Individual) -> Result<()> {
        self.bounds.check(individual.chromosome())?;
        self.individuals[index] = individual;
        self.invalidate();
        Ok(())
    }

    /// Rebuilds the population from the given slot indices, repetition
    /// allowed. This is the building block for custom selection strategies.
    ///
    /// # Panics
    /// Panics if `picks` does not yield exactly `len()` indices, or if an
    /// index is out of range. The population is unchanged in that case.
    pub fn reselect<I>(&mut self, picks: I)
    where
        I: IntoIterator<Item = usize>,
    {
        let n = self.individuals.len();
        let picks: Vec<usize> = picks.into_iter().collect();
        assert_eq!(picks.len(), n, "reselect needs exactly one pick per slot");
        assert!(picks.iter().all(|&p| p < n), "reselect pick out of range");
        for (slot, &pick) in self.buffer.iter_mut().zip(&picks) {
            slot.clone_from(&self.individuals[pick]);
        }
        std::mem::swap(&mut self.individuals, &mut self.buffer);
        self.invalidate();
    }

    /// Roulette-wheel selection with replacement.
    ///
    /// Draws `N` numbers in `[0, 1)`; each picks the first slot whose
    /// cumulative fitness is at least the draw.
    pub fn select_roulette<R: Rng>(&mut self, rng: &mut R) {
        let cumulative: Vec<f64> = self
            .fitness()
            .iter()
            .scan(0.0, |acc, &w| {
                *acc += w;
                Some(*acc)
            })
            .collect();
        // float drift can leave the last cumulative value just below 1
        let last = cumulative.len() - 1;
        let picks: Vec<usize> = (0..cumulative.len())
            .map(|_| {
                let draw: f64 = rng.random();
                cumulative.partition_point(|&c| c < draw).min(last)
            })
            .collect();
        self.reselect(picks);
    }

    /// Pairs each individual with a partner from a random permutation; with
    /// probability `rate` the pair is replaced by two children from
    /// [`cross_individuals`](Self::cross_individuals), otherwise both parents
    /// are kept. `N` of the resulting `2N` candidates are then drawn without
    /// replacement.
    ///
    /// On error the population is left unchanged. An `alpha` outside
    /// `[0, 1]` is rejected before any pairing.
    pub fn crossover<R: Rng>(&mut self, rate: f64, alpha: f64, rng: &mut R) -> Result<()> {
        check_alpha(alpha)?;
        let n = self.individuals.len();
        let mut partners: Vec<usize> = (0..n).collect();
        partners.shuffle(rng);

        let mut pool = Vec::with_capacity(2 * n);
        for (i, &j) in partners.iter().enumerate() {
            if rng.random::<f64>() < rate {
                let (a, b) =
                    Self::cross_individuals(&self.individuals[i], &self.individuals[j], alpha, rng)?;
                pool.push(Candidate::Child(a));
                pool.push(Candidate::Child(b));
            } else {
                pool.push(Candidate::Parent(i));
                pool.push(Candidate::Parent(j));
            }
        }

        let picks = index::sample(rng, pool.len(), n);
        for (slot, pick) in self.buffer.iter_mut().zip(picks.iter()) {
            match &pool[pick] {
                Candidate::Parent(i) => slot.clone_from(&self.individuals[*i]),
                Candidate::Child(child) => slot.clone_from(child),
            }
        }
        std::mem::swap(&mut self.individuals, &mut self.buffer);
        self.invalidate();
        Ok(())
    }

    /// Blends two parents into two children.
    ///
    /// A mask marks each gene with probability 0.5. At marked genes child A
    /// gets `alpha * a + (1 - alpha) * b` and child B gets
    /// `(1 - alpha) * a + alpha * b`. At unmarked genes both children get
    /// `0.0`: the blend is multiplied by the mask rather than falling back to
    /// a parent's value. Children are validated against their parent's
    /// bounds, so a zeroed gene outside the box is a
    /// [`ConstraintViolation`](crate::error::ConstraintViolation). An
    /// `alpha` outside `[0, 1]` is a configuration error.
    ///
    /// # Panics
    /// Panics if the parents differ in dimension.
    pub fn cross_individuals<R: Rng>(
        a: &Individual,
        b: &Individual,
        alpha: f64,
        rng: &mut R,
    ) -> Result<(Individual, Individual)> {
        check_alpha(alpha)?;
        assert_eq!(
            a.dimension(),
            b.dimension(),
            "parents must have equal dimension"
        );
        let dim = a.dimension();
        let mut genes_a = Vec::with_capacity(dim);
        let mut genes_b = Vec::with_capacity(dim);
        for (&x, &y) in a.chromosome().iter().zip(b.chromosome()) {
            if rng.random::<f64>() <= 0.5 {
                let (lo, hi) = (x.min(y), x.max(y));
                genes_a.push((alpha * x + (1.0 - alpha) * y).clamp(lo, hi));
                genes_b.push(((1.0 - alpha) * x + alpha * y).clamp(lo, hi));
            } else {
                genes_a.push(0.0);
                genes_b.push(0.0);
            }
        }
        let child_a = Individual::with_chromosome(Arc::clone(a.bounds()), genes_a)?;
        let child_b = Individual::with_chromosome(Arc::clone(b.bounds()), genes_b)?;
        Ok((child_a, child_b))
    }

    /// Creep-mutates `num` distinct random genes of each individual with
    /// probability `rate`, using magnitude `alpha`.
    ///
    /// Caches are dropped even when no individual ends up mutated.
    ///
    /// # Panics
    /// Panics unless `1 <= num <= dimension`.
    pub fn mutate<R: Rng>(&mut self, num: usize, rate: f64, alpha: f64, rng: &mut R) {
        let dim = self.dimension();
        assert!(
            (1..=dim).contains(&num),
            "mutation gene count {num} outside 1..={dim}"
        );
        self.invalidate();
        for individual in &mut self.individuals {
            if rng.random::<f64>() < rate {
                let positions = index::sample(rng, dim, num).into_vec();
                individual.mutate(&positions, alpha, rng);
            }
        }
    }
}

/// Blending factors outside `[0, 1]` would leave the parents' interval.
fn check_alpha(alpha: f64) -> Result<()> {
    if (0.0..=1.0).contains(&alpha) {
        Ok(())
    } else {
        Err(GaError::invalid(format!(
            "crossover alpha must be within [0, 1], got {alpha}"
        )))
    }
}
