use rand::Rng;

use crate::individual::Individual;

use super::Mutation;

/// Index-shuffle mutation as a [`Mutation`] strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShuffleIndexesMutation {
    /// Probability of swapping each position away
    pub gene_swap_probability: f64,
}

impl Mutation for ShuffleIndexesMutation {
    fn mutate<R>(&self, individual: &mut Individual, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        mutate(individual, self.gene_swap_probability, rng)
    }
}

/// Shuffles an individual's genes by random swaps.
///
/// Each position `i` is, with probability `indpb`, swapped with a position
/// drawn uniformly from the other `len - 1` positions. Swaps cannot break the
/// permutation invariant. Fitness is invalidated when at least one swap
/// happened; returns the number of swaps.
///
/// # Panics
///
/// Panics if `indpb` is not in `[0, 1]`.
pub fn mutate<R>(individual: &mut Individual, indpb: f64, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let swaps = shuffle_indexes(individual.genes_mut(), indpb, rng);
    if swaps > 0 {
        individual.invalidate();
    }
    swaps
}

/// Like [`mutate`], on a bare gene slice.
pub fn shuffle_indexes<R>(genes: &mut [usize], indpb: f64, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let len = genes.len();
    if len < 2 {
        return 0;
    }
    let mut swaps = 0;
    for i in 0..len {
        if rng.random_bool(indpb) {
            let mut j = rng.random_range(0..len - 1);
            if j >= i {
                j += 1;
            }
            genes.swap(i, j);
            swaps += 1;
        }
    }
    swaps
}
