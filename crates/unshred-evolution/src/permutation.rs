//! Permutation checks shared by individuals and genetic operators.

use std::collections::{HashMap, hash_map::Entry};

use crate::error::PermutationError;

/// Returns the identity permutation `[0, 1, ..., n - 1]`.
#[must_use]
pub fn identity(n: usize) -> Vec<usize> {
    (0..n).collect()
}

/// Checks that `genes` is a permutation of `0..n`.
///
/// # Examples
///
/// ```
/// use unshred_evolution::permutation;
///
/// assert!(permutation::validate(&[2, 0, 1], 3).is_ok());
/// assert!(permutation::validate(&[2, 2, 1], 3).is_err());
/// assert!(permutation::validate(&[0, 1, 3], 3).is_err());
/// ```
pub fn validate(genes: &[usize], n: usize) -> Result<(), PermutationError> {
    if genes.len() != n {
        return Err(PermutationError::LengthMismatch {
            expected: n,
            actual: genes.len(),
        });
    }
    let mut seen = vec![false; n];
    for (position, &value) in genes.iter().enumerate() {
        if value >= n {
            return Err(PermutationError::OutOfRange {
                value,
                position,
                len: n,
            });
        }
        if seen[value] {
            return Err(PermutationError::Duplicate { value, position });
        }
        seen[value] = true;
    }
    Ok(())
}

/// Checks that `a` and `b` are duplicate-free sequences over the same set of values.
///
/// Unlike [`validate`] the values need not be `0..n`; crossover works on any
/// pair of orderings of one value set.
pub fn check_same_value_set(a: &[usize], b: &[usize]) -> Result<(), PermutationError> {
    if a.len() != b.len() {
        return Err(PermutationError::LengthMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    let positions = PositionTable::new(a)?;
    PositionTable::new(b)?;
    // equal lengths and no duplicates in `b`, so containment implies equality
    if let Some(&value) = b.iter().find(|&&v| positions.position_of(v).is_none()) {
        return Err(PermutationError::ValueSetMismatch { value });
    }
    Ok(())
}

/// Maps each value of a duplicate-free sequence to its position.
///
/// Values are arbitrary: the table grows with the number of genes, not with
/// the largest value.
#[derive(Debug, Clone)]
pub(crate) struct PositionTable {
    positions: HashMap<usize, usize>,
}

impl PositionTable {
    pub(crate) fn new(genes: &[usize]) -> Result<Self, PermutationError> {
        let mut positions = HashMap::with_capacity(genes.len());
        for (position, &value) in genes.iter().enumerate() {
            match positions.entry(value) {
                Entry::Occupied(_) => {
                    return Err(PermutationError::Duplicate { value, position });
                }
                Entry::Vacant(entry) => {
                    entry.insert(position);
                }
            }
        }
        Ok(Self { positions })
    }

    pub(crate) fn position_of(&self, value: usize) -> Option<usize> {
        self.positions.get(&value).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_valid() {
        for n in 0..10 {
            assert_eq!(validate(&identity(n), n), Ok(()));
        }
    }

    #[test]
    fn test_validate_reports_defects() {
        assert_eq!(
            validate(&[0, 1], 3),
            Err(PermutationError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert_eq!(
            validate(&[0, 5, 1], 3),
            Err(PermutationError::OutOfRange {
                value: 5,
                position: 1,
                len: 3
            })
        );
        assert_eq!(
            validate(&[1, 0, 1], 3),
            Err(PermutationError::Duplicate {
                value: 1,
                position: 2
            })
        );
    }

    #[test]
    fn test_same_value_set() {
        assert_eq!(check_same_value_set(&[1, 2, 3], &[3, 1, 2]), Ok(()));
        assert_eq!(
            check_same_value_set(&[1, 2, 3], &[3, 1, 4]),
            Err(PermutationError::ValueSetMismatch { value: 4 })
        );
        assert_eq!(
            check_same_value_set(&[1, 2, 3], &[3, 3, 1]),
            Err(PermutationError::Duplicate {
                value: 3,
                position: 1
            })
        );
        assert!(check_same_value_set(&[1, 2], &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_position_table() {
        let table = PositionTable::new(&[3, 7, 5]).unwrap();
        assert_eq!(table.position_of(7), Some(1));
        assert_eq!(table.position_of(4), None);
        assert_eq!(table.position_of(100), None);
    }

    #[test]
    fn test_large_values() {
        let table = PositionTable::new(&[usize::MAX, 0, 1 << 40]).unwrap();
        assert_eq!(table.position_of(usize::MAX), Some(0));
        assert_eq!(table.position_of(1 << 40), Some(2));
        assert_eq!(
            check_same_value_set(&[usize::MAX, 1 << 40], &[1 << 40, usize::MAX]),
            Ok(())
        );
        assert!(matches!(
            PositionTable::new(&[usize::MAX, usize::MAX]),
            Err(PermutationError::Duplicate {
                value: usize::MAX,
                position: 1
            })
        ));
    }
}
