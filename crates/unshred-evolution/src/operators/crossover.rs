//! Partially matched crossover (PMX).
//!
//! PMX exchanges a segment between two permutations and repairs the genes
//! outside the segment so that both children remain permutations:
//!
//! 1. Pick cut points `a < b`.
//! 2. Child 1 receives parent 2's segment `[a, b)`, child 2 receives parent 1's.
//! 3. Every other position keeps the child's own parent value, unless that
//!    value already sits in the transplanted segment. Such a conflict is
//!    resolved by following the segment mapping: if the value is found at
//!    position `j` of the donor segment, it is replaced by the receiving
//!    parent's value at `j`, repeatedly, until the value is free.
//!
//! # Example
//!
//! ```
//! use unshred_evolution::operators::crossover;
//!
//! let mut a = vec![1, 2, 3, 4, 5, 6, 7, 8];
//! let mut b = vec![3, 7, 5, 1, 6, 8, 2, 4];
//! crossover::pmx_at(&mut a, &mut b, 3, 6).unwrap();
//! assert_eq!(a, [4, 2, 3, 1, 6, 8, 7, 5]);
//! assert_eq!(b, [3, 7, 8, 4, 5, 6, 2, 1]);
//! ```
//!
//! # Degenerate cut ranges
//!
//! - Fewer than two genes: there is nothing to exchange, genes stay as they are.
//! - `a == b` (only reachable through [`pmx_at`]): the empty segment transplants
//!   nothing, genes stay as they are.
//! - `a == 0` and `b == len`: the whole sequence is the segment, so the parents
//!   simply trade genes.

use rand::Rng;

use crate::{
    error::{EvolutionError, PermutationError},
    individual::Individual,
    permutation::{self, PositionTable},
};

use super::Crossover;

/// PMX as a [`Crossover`] strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartiallyMatchedCrossover;

impl Crossover for PartiallyMatchedCrossover {
    fn crossover<R>(
        &self,
        a: &mut Individual,
        b: &mut Individual,
        rng: &mut R,
    ) -> Result<(), EvolutionError>
    where
        R: Rng + ?Sized,
    {
        crossover(a, b, rng)
    }
}

/// Applies PMX to two individuals in place with random cut points.
///
/// Both individuals lose their fitness. If the genes are not permutations of
/// the same value set, nothing is modified and
/// [`EvolutionError::InvalidPermutation`] is returned.
pub fn crossover<R>(
    a: &mut Individual,
    b: &mut Individual,
    rng: &mut R,
) -> Result<(), EvolutionError>
where
    R: Rng + ?Sized,
{
    permutation::check_same_value_set(a.genes(), b.genes())?;
    if let Some((start, end)) = random_cut_points(a.len(), rng) {
        pmx_at(a.genes_mut(), b.genes_mut(), start, end)?;
    }
    a.invalidate();
    b.invalidate();
    Ok(())
}

/// Draws cut points `0 <= start < end <= len`.
///
/// `start` is uniform over `0..=len` and `end` over the remaining `len`
/// values; equal draws are shifted so the segment is never empty. Returns
/// `None` when `len < 2`.
pub fn random_cut_points<R>(len: usize, rng: &mut R) -> Option<(usize, usize)>
where
    R: Rng + ?Sized,
{
    if len < 2 {
        return None;
    }
    let start = rng.random_range(0..=len);
    let end = rng.random_range(0..len);
    if end >= start {
        Some((start, end + 1))
    } else {
        Some((end, start))
    }
}

/// Applies PMX to two gene sequences in place using the segment `start..end`.
///
/// The sequences may hold any set of distinct values, as long as both hold
/// the same one.
pub fn pmx_at(
    genes1: &mut [usize],
    genes2: &mut [usize],
    start: usize,
    end: usize,
) -> Result<(), PermutationError> {
    let len = genes1.len();
    permutation::check_same_value_set(genes1, genes2)?;
    if start > end || end > len {
        return Err(PermutationError::InvalidCutPoints { start, end, len });
    }

    let parent1 = genes1.to_vec();
    let parent2 = genes2.to_vec();
    build_child(genes1, &parent1, &parent2, start, end)?;
    build_child(genes2, &parent2, &parent1, start, end)?;
    Ok(())
}

/// Writes into `child` the PMX offspring of `own` receiving `donor`'s segment.
fn build_child(
    child: &mut [usize],
    own: &[usize],
    donor: &[usize],
    start: usize,
    end: usize,
) -> Result<(), PermutationError> {
    let segment = start..end;
    let donor_positions = PositionTable::new(donor)?;

    child[segment.clone()].copy_from_slice(&donor[segment.clone()]);
    for i in (0..start).chain(end..own.len()) {
        let mut value = own[i];
        // The chain visits each segment position at most once, since `own`
        // is duplicate-free and `own[i]` lies outside the segment.
        while let Some(j) = donor_positions
            .position_of(value)
            .filter(|j| segment.contains(j))
        {
            value = own[j];
        }
        child[i] = value;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn assert_same_values(child: &[usize], parent: &[usize]) {
        let mut child = child.to_vec();
        let mut parent = parent.to_vec();
        child.sort_unstable();
        parent.sort_unstable();
        assert_eq!(child, parent);
    }

    #[test]
    fn test_reference_case() {
        let p1 = [1, 2, 3, 4, 5, 6, 7, 8];
        let p2 = [3, 7, 5, 1, 6, 8, 2, 4];
        let mut c1 = p1.to_vec();
        let mut c2 = p2.to_vec();
        pmx_at(&mut c1, &mut c2, 3, 6).unwrap();

        assert_eq!(c1[3..6], p2[3..6]);
        assert_eq!(c2[3..6], p1[3..6]);
        assert_eq!(c2[3..6], [4, 5, 6]);
        assert_same_values(&c1, &p1);
        assert_same_values(&c2, &p1);
        assert_eq!(c1, [4, 2, 3, 1, 6, 8, 7, 5]);
        assert_eq!(c2, [3, 7, 8, 4, 5, 6, 2, 1]);
    }

    #[test]
    fn test_every_cut_point_keeps_permutation() {
        let mut rng = Pcg32::seed_from_u64(10);
        for len in 0..12 {
            for _ in 0..20 {
                let p1 = Individual::new_random(len, &mut rng);
                let p2 = Individual::new_random(len, &mut rng);
                for start in 0..=len {
                    for end in start..=len {
                        let mut c1 = p1.genes().to_vec();
                        let mut c2 = p2.genes().to_vec();
                        pmx_at(&mut c1, &mut c2, start, end).unwrap();
                        assert_eq!(permutation::validate(&c1, len), Ok(()));
                        assert_eq!(permutation::validate(&c2, len), Ok(()));
                        assert_eq!(c1[start..end], p2.genes()[start..end]);
                        assert_eq!(c2[start..end], p1.genes()[start..end]);
                    }
                }
            }
        }
    }

    #[test]
    fn test_degenerate_segments() {
        let p1 = [0, 1, 2, 3, 4];
        let p2 = [4, 2, 0, 3, 1];

        for cut in 0..=p1.len() {
            let mut c1 = p1.to_vec();
            let mut c2 = p2.to_vec();
            pmx_at(&mut c1, &mut c2, cut, cut).unwrap();
            assert_eq!(c1, p1);
            assert_eq!(c2, p2);
        }

        let mut c1 = p1.to_vec();
        let mut c2 = p2.to_vec();
        pmx_at(&mut c1, &mut c2, 0, p1.len()).unwrap();
        assert_eq!(c1, p2);
        assert_eq!(c2, p1);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut a = vec![0, 1, 2];
        let mut b = vec![2, 1, 0];
        assert_eq!(
            pmx_at(&mut a, &mut b, 2, 1),
            Err(PermutationError::InvalidCutPoints {
                start: 2,
                end: 1,
                len: 3
            })
        );
        assert!(pmx_at(&mut a, &mut b, 0, 4).is_err());

        let mut dup = vec![0, 0, 2];
        assert!(matches!(
            pmx_at(&mut a, &mut dup, 0, 2),
            Err(PermutationError::Duplicate { .. })
        ));
        let mut other = vec![0, 1, 3];
        assert!(matches!(
            pmx_at(&mut a, &mut other, 0, 2),
            Err(PermutationError::ValueSetMismatch { .. })
        ));
        assert_eq!(a, [0, 1, 2]);
    }

    #[test]
    fn test_large_gene_values() {
        let mut a = vec![usize::MAX, 0, 1 << 40];
        let mut b = vec![0, 1 << 40, usize::MAX];
        pmx_at(&mut a, &mut b, 0, 1).unwrap();
        assert_eq!(a, [0, usize::MAX, 1 << 40]);
        assert_eq!(b, [usize::MAX, 1 << 40, 0]);

        let mut a = vec![usize::MAX, 0];
        let mut b = vec![0, usize::MAX];
        pmx_at(&mut a, &mut b, 0, 1).unwrap();
        assert_eq!(a, [0, usize::MAX]);
        assert_eq!(b, [usize::MAX, 0]);
    }

    #[test]
    fn test_random_cut_points_range() {
        let mut rng = Pcg32::seed_from_u64(11);
        assert_eq!(random_cut_points(0, &mut rng), None);
        assert_eq!(random_cut_points(1, &mut rng), None);
        let mut seen_full = false;
        for _ in 0..2000 {
            let (start, end) = random_cut_points(4, &mut rng).unwrap();
            assert!(start < end && end <= 4, "{start}..{end}");
            seen_full |= start == 0 && end == 4;
        }
        assert!(seen_full);
    }

    #[test]
    fn test_crossover_invalidates_fitness() {
        let mut rng = Pcg32::seed_from_u64(12);
        for _ in 0..100 {
            let mut a = Individual::new_random(16, &mut rng);
            let mut b = Individual::new_random(16, &mut rng);
            a.set_fitness(1.0);
            b.set_fitness(2.0);
            crossover(&mut a, &mut b, &mut rng).unwrap();
            assert!(!a.is_valid());
            assert!(!b.is_valid());
            assert_eq!(permutation::validate(a.genes(), 16), Ok(()));
            assert_eq!(permutation::validate(b.genes(), 16), Ok(()));
        }
    }

    #[test]
    fn test_crossover_rejects_mismatched_lengths() {
        let mut rng = Pcg32::seed_from_u64(13);
        let mut a = Individual::from_genes(vec![0, 1, 2]).unwrap();
        let mut b = Individual::from_genes(vec![1, 0]).unwrap();
        a.set_fitness(1.0);
        let err = crossover(&mut a, &mut b, &mut rng).unwrap_err();
        assert!(matches!(err, EvolutionError::InvalidPermutation(_)));
        assert_eq!(a.fitness(), Some(1.0));
    }
}
