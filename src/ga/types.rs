//! Core contracts between the engine and the problem being solved.
//!
//! [`Objective`] is the black-box function to minimize; [`FitnessScheme`]
//! turns its values into selection weights.

use std::f64::consts::PI;

/// The function being minimized.
///
/// Implementations must be deterministic and free of side effects: the
/// population caches results and never re-evaluates an unchanged
/// chromosome. Chromosomes passed in always lie within the configured
/// bounds.
///
/// Any `Fn(&[f64]) -> f64` is an objective:
///
/// ```
/// use u_realga::ga::Objective;
///
/// let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
/// assert_eq!(sphere.evaluate(&[1.0, 2.0]), 5.0);
/// ```
pub trait Objective {
    /// Evaluates a chromosome. Lower is better.
    fn evaluate(&self, chromosome: &[f64]) -> f64;
}

impl<F> Objective for F
where
    F: Fn(&[f64]) -> f64,
{
    fn evaluate(&self, chromosome: &[f64]) -> f64 {
        self(chromosome)
    }
}

/// Default fitness transform for the modular driver: `atan(-v) + π`.
///
/// Strictly positive and strictly decreasing in `v`, so a smaller objective
/// always maps to a larger fitness.
pub fn arctan_fitness(value: f64) -> f64 {
    (-value).atan() + PI
}

/// How a population derives selection weights from its evaluation vector.
///
/// Both schemes normalize the weights to sum to 1.
#[derive(Debug, Clone, Copy, Default)]
pub enum FitnessScheme {
    /// `w_i = sum(|V|) - V_i`.
    ///
    /// Ill-conditioned when one value dominates `sum(|V|)`. An all-zero
    /// evaluation vector has no meaningful weights and yields the uniform
    /// distribution.
    #[default]
    AbsoluteSumComplement,

    /// `w_i = f(V_i)` for a positive, decreasing transform `f`.
    Transform(fn(f64) -> f64),
}

impl FitnessScheme {
    /// Normalized selection weights for an evaluation vector.
    pub fn weights(&self, evaluation: &[f64]) -> Vec<f64> {
        let raw: Vec<f64> = match self {
            FitnessScheme::AbsoluteSumComplement => {
                let total_abs: f64 = evaluation.iter().map(|v| v.abs()).sum();
                evaluation.iter().map(|&v| total_abs - v).collect()
            }
            FitnessScheme::Transform(f) => evaluation.iter().map(|&v| f(v)).collect(),
        };
        normalize(raw)
    }
}

fn normalize(mut weights: Vec<f64>) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total > 0.0 && total.is_finite() {
        for w in &mut weights {
            *w /= total;
        }
    } else if !weights.is_empty() {
        let uniform = 1.0 / weights.len() as f64;
        weights.iter_mut().for_each(|w| *w = uniform);
    }
    weights
}
