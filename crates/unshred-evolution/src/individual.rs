//! Candidate strip orders.
//!
//! An [`Individual`] pairs a permutation with the fitness the oracle gave it.
//! The fitness is a cache: genetic operators clear it whenever they touch the
//! genes, and the population re-evaluates exactly the individuals whose cache
//! is empty.
//!
//! | state | `fitness()` | `is_valid()` |
//! |-------|-------------|--------------|
//! | fresh, crossed or mutated | `None` | `false` |
//! | evaluated since last change | `Some(f)` | `true` |

use rand::{Rng, seq::index};
use serde::Serialize;

use crate::{error::PermutationError, permutation};

/// A single candidate strip order.
///
/// The genes are a permutation of `0..n`: position `i` holds the index of the
/// shredded strip placed at column `i`. Fitness is cached until a genetic
/// operator touches the genes, after which it must be recomputed by the oracle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Individual {
    genes: Vec<usize>,
    fitness: Option<f64>,
}

impl Individual {
    /// Creates an individual whose genes are a uniformly random permutation of `0..n`.
    ///
    /// The permutation is drawn as a random sample of `n` out of `n` indices
    /// without replacement. Fitness is unset.
    ///
    /// # Arguments
    ///
    /// * `n` - Number of genes (strips)
    /// * `rng` - Random number generator
    #[must_use]
    pub fn new_random<R>(n: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            genes: index::sample(rng, n, n).into_vec(),
            fitness: None,
        }
    }

    /// Creates an individual from explicit genes.
    ///
    /// # Returns
    ///
    /// An unevaluated individual, or the [`PermutationError`] describing why
    /// `genes` is not a permutation of `0..genes.len()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use unshred_evolution::Individual;
    ///
    /// let ind = Individual::from_genes(vec![2, 0, 1]).unwrap();
    /// assert!(!ind.is_valid());
    /// assert!(Individual::from_genes(vec![2, 2, 1]).is_err());
    /// ```
    pub fn from_genes(genes: Vec<usize>) -> Result<Self, PermutationError> {
        permutation::validate(&genes, genes.len())?;
        Ok(Self {
            genes,
            fitness: None,
        })
    }

    /// Returns the strip order: position `i` holds the strip placed at column `i`.
    #[must_use]
    pub fn genes(&self) -> &[usize] {
        &self.genes
    }

    /// Mutable access for genetic operators. Callers are responsible for
    /// keeping the genes a permutation and for invalidating fitness.
    pub(crate) fn genes_mut(&mut self) -> &mut [usize] {
        &mut self.genes
    }

    /// Returns the number of genes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Returns the cached fitness, or `None` if the genes changed since the
    /// last evaluation. Lower is better.
    #[must_use]
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Stores the oracle's score for the current genes.
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Clears the cached fitness.
    pub fn invalidate(&mut self) {
        self.fitness = None;
    }

    /// Returns `true` if the fitness is known.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.fitness.is_some()
    }
}
