//! Selection strategies for the GA.
//!
//! Selection rebuilds the whole population by sampling `N` individuals with
//! replacement. Different strategies provide different selection pressure;
//! all of them preserve the population size and favor lower objective
//! values.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::individual::Representation;
use super::population::Population;
use rand::Rng;

/// A pluggable selection operator for the modular driver.
pub trait SelectionStrategy {
    /// Representations this strategy can select from.
    ///
    /// Selection only looks at evaluation and fitness vectors, so the
    /// default accepts every representation.
    fn compatible(&self) -> &[Representation] {
        Representation::ALL
    }

    /// Replaces the population with `N` selected individuals.
    fn select<R: Rng>(&self, population: &mut Population, rng: &mut R);
}

/// Built-in selection strategies.
///
/// # Examples
///
/// ```
/// use u_realga::ga::Selection;
///
/// // Fitness-proportionate, the engine's default
/// let sel = Selection::default();
/// assert_eq!(sel, Selection::Roulette);
///
/// // Tournament with size 3 (moderate selection pressure)
/// let sel = Selection::Tournament(3);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Fitness-proportionate (roulette wheel) selection over the
    /// population's normalized fitness vector.
    ///
    /// **Warning**: Susceptible to super-individual dominance when
    /// fitness variance is high.
    #[default]
    Roulette,

    /// Tournament selection: pick `k` individuals at random, keep the one
    /// with the lowest objective value.
    ///
    /// Higher `k` = stronger selection pressure.
    /// - k=2: light pressure (good for diversity)
    /// - k=3-5: moderate pressure (typical)
    /// - k>5: strong pressure (risk of premature convergence)
    Tournament(usize),

    /// Linear rank selection.
    ///
    /// Individuals are sorted by objective value and the best of `n` gets
    /// weight `n`, the worst weight 1. Avoids the scaling problems of
    /// roulette selection.
    ///
    /// Reference: Baker (1985), "Adaptive Selection Methods for Genetic
    /// Algorithms"
    Rank,
}

impl SelectionStrategy for Selection {
    fn select<R: Rng>(&self, population: &mut Population, rng: &mut R) {
        match self {
            Selection::Roulette => population.select_roulette(rng),
            Selection::Tournament(k) => {
                let picks = tournament(population.evaluation(), *k, rng);
                population.reselect(picks);
            }
            Selection::Rank => {
                let picks = rank(population.evaluation(), rng);
                population.reselect(picks);
            }
        }
    }
}

/// `n` tournament winners, each the best of `k` uniform draws.
fn tournament<R: Rng>(values: &[f64], k: usize, rng: &mut R) -> Vec<usize> {
    let k = k.max(1);
    let n = values.len();
    (0..n)
        .map(|_| {
            let mut best = rng.random_range(0..n);
            for _ in 1..k {
                let idx = rng.random_range(0..n);
                if values[idx] < values[best] {
                    best = idx;
                }
            }
            best
        })
        .collect()
}

/// `n` draws under linear ranking; rank 0 (best) has weight `n`.
fn rank<R: Rng>(values: &[f64], rng: &mut R) -> Vec<usize> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    // cumulative[r] = sum of weights for ranks 0..=r
    let cumulative: Vec<f64> = (0..n)
        .scan(0.0, |acc, r| {
            *acc += (n - r) as f64;
            Some(*acc)
        })
        .collect();
    let total = (n * (n + 1)) as f64 / 2.0;

    (0..n)
        .map(|_| {
            let threshold = rng.random_range(0.0..total);
            let r = cumulative
                .partition_point(|&c| c <= threshold)
                .min(n - 1);
            order[r]
        })
        .collect()
}
