//! Bounded real-vector individuals.
//!
//! An [`Individual`] is a chromosome of `D` reals plus a shared reference to
//! its per-gene [`Bounds`]. The invariant
//! `lower[i] <= chromosome[i] <= upper[i]` holds at every observable point:
//! construction places the chromosome on the lower bound, [`Individual::initialize`]
//! samples inside the box, explicit assignment is validated, and creep
//! mutation only ever moves a gene part of the way towards one of its bounds.

use crate::error::{ConstraintViolation, GaError, Result};
use rand::Rng;
use std::sync::Arc;

/// Identifies how an individual encodes its genes.
///
/// Operator strategies declare which representations they can work on; a
/// driver refuses to start when a strategy does not support the
/// population's representation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Representation {
    /// A fixed-length vector of reals, each confined to a closed interval.
    BoundedReal,
}

impl Representation {
    /// Every representation known to the crate.
    pub const ALL: &'static [Representation] = &[Representation::BoundedReal];
}

/// Per-gene closed intervals `[lower[i], upper[i]]`.
///
/// # Examples
///
/// ```
/// use u_realga::ga::Bounds;
///
/// let bounds = Bounds::new(vec![-10.0, -10.0], vec![10.0, 10.0]).unwrap();
/// assert_eq!(bounds.dimension(), 2);
/// assert!(Bounds::new(vec![1.0], vec![0.0]).is_err());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Creates bounds from explicit lower and upper vectors.
    ///
    /// Fails when the vectors are empty, differ in length, contain a
    /// non-finite value, or have `lower[i] > upper[i]`.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self> {
        if lower.is_empty() {
            return Err(GaError::invalid("bounds must have at least one gene"));
        }
        if lower.len() != upper.len() {
            return Err(GaError::invalid(format!(
                "lower bound has {} genes but upper bound has {}",
                lower.len(),
                upper.len()
            )));
        }
        for (i, (&lo, &hi)) in lower.iter().zip(&upper).enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(GaError::invalid(format!("bounds of gene {i} must be finite")));
            }
            if lo > hi {
                return Err(GaError::invalid(format!(
                    "gene {i}: lower bound {lo} exceeds upper bound {hi}"
                )));
            }
        }
        Ok(Self { lower, upper })
    }

    /// Creates `dimension` identical intervals `[lower, upper]`.
    pub fn uniform(dimension: usize, lower: f64, upper: f64) -> Result<Self> {
        Self::new(vec![lower; dimension], vec![upper; dimension])
    }

    /// Number of genes.
    pub fn dimension(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Checks a whole chromosome against these bounds.
    pub fn check(&self, chromosome: &[f64]) -> std::result::Result<(), ConstraintViolation> {
        if chromosome.len() != self.dimension() {
            return Err(ConstraintViolation::DimensionMismatch {
                expected: self.dimension(),
                actual: chromosome.len(),
            });
        }
        for (gene, &value) in chromosome.iter().enumerate() {
            let (lower, upper) = (self.lower[gene], self.upper[gene]);
            // written so that NaN fails the check
            if !(value >= lower && value <= upper) {
                return Err(ConstraintViolation::OutOfBounds {
                    gene,
                    value,
                    lower,
                    upper,
                });
            }
        }
        Ok(())
    }
}

/// A candidate solution: a chromosome together with its bounds.
///
/// Siblings share one `Arc<Bounds>`; bounds are never modified after
/// construction.
#[derive(Debug, PartialEq)]
pub struct Individual {
    bounds: Arc<Bounds>,
    chromosome: Vec<f64>,
}

impl Clone for Individual {
    fn clone(&self) -> Self {
        Self {
            bounds: Arc::clone(&self.bounds),
            chromosome: self.chromosome.clone(),
        }
    }

    // Reuses the chromosome allocation; population slot buffers rely on it.
    fn clone_from(&mut self, source: &Self) {
        self.bounds.clone_from(&source.bounds);
        self.chromosome.clone_from(&source.chromosome);
    }
}

impl Individual {
    /// Creates an uninitialized individual.
    ///
    /// The placeholder chromosome sits on the lower bound so the bounds
    /// invariant already holds; call [`initialize`](Self::initialize) to
    /// draw a random one.
    pub fn new(bounds: Arc<Bounds>) -> Self {
        let chromosome = bounds.lower.clone();
        Self { bounds, chromosome }
    }

    /// Creates an individual with an explicit chromosome, validated against
    /// `bounds`.
    pub fn with_chromosome(bounds: Arc<Bounds>, chromosome: Vec<f64>) -> Result<Self> {
        let mut individual = Self::new(bounds);
        individual.set_chromosome(chromosome)?;
        Ok(individual)
    }

    /// Draws every gene uniformly from its interval:
    /// `lower[i] + (upper[i] - lower[i]) * u`, with `u` in `[0, 1)`.
    pub fn initialize<R: Rng>(&mut self, rng: &mut R) {
        let bounds = &self.bounds;
        for (gene, value) in self.chromosome.iter_mut().enumerate() {
            let (lower, upper) = (bounds.lower[gene], bounds.upper[gene]);
            let u: f64 = rng.random();
            *value = (lower + (upper - lower) * u).min(upper);
        }
    }

    pub fn dimension(&self) -> usize {
        self.chromosome.len()
    }

    pub fn bounds(&self) -> &Arc<Bounds> {
        &self.bounds
    }

    pub fn lower_bound(&self) -> &[f64] {
        self.bounds.lower()
    }

    pub fn upper_bound(&self) -> &[f64] {
        self.bounds.upper()
    }

    pub fn chromosome(&self) -> &[f64] {
        &self.chromosome
    }

    /// The encoding of this individual.
    pub fn representation(&self) -> Representation {
        Representation::BoundedReal
    }

    /// Replaces the chromosome.
    ///
    /// Fails with [`ConstraintViolation`] if the length differs from the
    /// dimension or any gene lies outside its bounds. Values are never
    /// clamped; on error the current chromosome is left untouched.
    pub fn set_chromosome(&mut self, chromosome: Vec<f64>) -> Result<()> {
        self.bounds.check(&chromosome)?;
        self.chromosome = chromosome;
        Ok(())
    }

    /// Creep mutation on the given gene positions.
    ///
    /// For each position, with probability 0.5 the gene moves towards its
    /// lower bound (`v -= (v - lower) * alpha`), otherwise towards its upper
    /// bound (`v += (upper - v) * alpha`). For `alpha` in `[0, 1]` the gene
    /// stays inside its interval.
    ///
    /// # Panics
    /// Panics if a position is not smaller than the dimension.
    pub fn mutate<R: Rng>(&mut self, positions: &[usize], alpha: f64, rng: &mut R) {
        for &pos in positions {
            let (lower, upper) = (self.bounds.lower[pos], self.bounds.upper[pos]);
            let value = self.chromosome[pos];
            let moved = if rng.random::<f64>() < 0.5 {
                value - (value - lower) * alpha
            } else {
                value + (upper - value) * alpha
            };
            // only rounding can push the result past a bound
            self.chromosome[pos] = moved.clamp(lower, upper);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn square(lo: f64, hi: f64) -> Arc<Bounds> {
        Arc::new(Bounds::uniform(2, lo, hi).unwrap())
    }

    #[test]
    fn test_bounds_rejects_length_mismatch() {
        let err = Bounds::new(vec![0.0, 0.0], vec![1.0]).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_bounds_rejects_inverted_interval() {
        assert!(Bounds::new(vec![0.0, 2.0], vec![1.0, 1.0]).is_err());
    }

    #[test]
    fn test_bounds_rejects_non_finite() {
        assert!(Bounds::new(vec![f64::NEG_INFINITY], vec![1.0]).is_err());
        assert!(Bounds::new(vec![0.0], vec![f64::NAN]).is_err());
    }

    #[test]
    fn test_bounds_rejects_empty() {
        assert!(Bounds::new(vec![], vec![]).is_err());
    }

    #[test]
    fn test_degenerate_interval_allowed() {
        let bounds = Arc::new(Bounds::new(vec![3.0], vec![3.0]).unwrap());
        let mut ind = Individual::new(bounds);
        let mut rng = create_rng(42);
        ind.initialize(&mut rng);
        assert_eq!(ind.chromosome(), &[3.0]);
    }

    #[test]
    fn test_new_is_within_bounds() {
        let ind = Individual::new(square(-1.0, 1.0));
        assert_eq!(ind.chromosome(), &[-1.0, -1.0]);
        assert_eq!(ind.dimension(), 2);
        assert_eq!(ind.representation(), Representation::BoundedReal);
    }

    #[test]
    fn test_set_chromosome_dimension_mismatch() {
        let mut ind = Individual::new(square(-1.0, 1.0));
        let err = ind.set_chromosome(vec![0.0, 0.0, 0.0]).unwrap_err();
        assert_eq!(
            err,
            GaError::ConstraintViolation(ConstraintViolation::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_set_chromosome_out_of_bounds_is_not_clamped() {
        let mut ind = Individual::new(square(-1.0, 1.0));
        ind.set_chromosome(vec![0.5, 0.5]).unwrap();
        let err = ind.set_chromosome(vec![0.0, 1.5]).unwrap_err();
        assert!(matches!(
            err,
            GaError::ConstraintViolation(ConstraintViolation::OutOfBounds { gene: 1, .. })
        ));
        // unchanged on failure
        assert_eq!(ind.chromosome(), &[0.5, 0.5]);
    }

    #[test]
    fn test_set_chromosome_rejects_nan() {
        let mut ind = Individual::new(square(-1.0, 1.0));
        assert!(ind.set_chromosome(vec![f64::NAN, 0.0]).is_err());
    }

    #[test]
    fn test_set_chromosome_accepts_bounds_inclusive() {
        let mut ind = Individual::new(square(-1.0, 1.0));
        assert!(ind.set_chromosome(vec![-1.0, 1.0]).is_ok());
    }

    #[test]
    fn test_mutate_alpha_one_hits_a_bound() {
        let mut rng = create_rng(7);
        let mut ind = Individual::with_chromosome(square(-4.0, 6.0), vec![1.0, 1.0]).unwrap();
        ind.mutate(&[0, 1], 1.0, &mut rng);
        for &v in ind.chromosome() {
            assert!(v == -4.0 || v == 6.0, "alpha=1 should land on a bound, got {v}");
        }
    }

    #[test]
    fn test_mutate_alpha_zero_is_identity() {
        let mut rng = create_rng(7);
        let mut ind = Individual::with_chromosome(square(-4.0, 6.0), vec![1.0, 2.0]).unwrap();
        ind.mutate(&[0, 1], 0.0, &mut rng);
        assert_eq!(ind.chromosome(), &[1.0, 2.0]);
    }

    #[test]
    fn test_mutate_only_touches_positions() {
        let mut rng = create_rng(11);
        let bounds = Arc::new(Bounds::uniform(4, 0.0, 10.0).unwrap());
        let mut ind = Individual::with_chromosome(bounds, vec![5.0; 4]).unwrap();
        ind.mutate(&[2], 0.5, &mut rng);
        assert_eq!(ind.chromosome()[0], 5.0);
        assert_eq!(ind.chromosome()[1], 5.0);
        assert_eq!(ind.chromosome()[3], 5.0);
        let v = ind.chromosome()[2];
        assert!(v == 2.5 || v == 7.5, "half-way creep expected, got {v}");
    }

    #[test]
    fn test_mutate_moves_both_directions() {
        let mut rng = create_rng(3);
        let bounds = Arc::new(Bounds::uniform(1, 0.0, 1.0).unwrap());
        let (mut down, mut up) = (0, 0);
        for _ in 0..200 {
            let mut ind = Individual::with_chromosome(Arc::clone(&bounds), vec![0.5]).unwrap();
            ind.mutate(&[0], 0.5, &mut rng);
            if ind.chromosome()[0] < 0.5 {
                down += 1;
            } else {
                up += 1;
            }
        }
        assert!(down > 50 && up > 50, "down={down}, up={up}");
    }

    #[test]
    fn test_clone_from_shares_bounds() {
        let bounds = square(-1.0, 1.0);
        let src = Individual::with_chromosome(Arc::clone(&bounds), vec![0.25, -0.25]).unwrap();
        let mut dst = Individual::new(square(-5.0, 5.0));
        dst.clone_from(&src);
        assert_eq!(dst, src);
        assert!(Arc::ptr_eq(dst.bounds(), &bounds));
    }

    proptest! {
        #[test]
        fn prop_initialize_within_bounds(
            seed in any::<u64>(),
            lo in -1e6f64..1e6,
            width in 0.0f64..1e6,
            dim in 1usize..16,
        ) {
            let bounds = Arc::new(Bounds::uniform(dim, lo, lo + width).unwrap());
            let mut ind = Individual::new(Arc::clone(&bounds));
            ind.initialize(&mut create_rng(seed));
            prop_assert!(bounds.check(ind.chromosome()).is_ok());
        }

        #[test]
        fn prop_mutate_within_bounds(
            seed in any::<u64>(),
            alpha in 0.0f64..=1.0,
            rounds in 1usize..20,
        ) {
            let mut rng = create_rng(seed);
            let bounds = Arc::new(Bounds::new(vec![-3.0, 0.0, 1e-9], vec![7.0, 1e-3, 1e9]).unwrap());
            let mut ind = Individual::new(Arc::clone(&bounds));
            ind.initialize(&mut rng);
            for _ in 0..rounds {
                ind.mutate(&[0, 1, 2], alpha, &mut rng);
                prop_assert!(bounds.check(ind.chromosome()).is_ok());
            }
        }
    }
}
