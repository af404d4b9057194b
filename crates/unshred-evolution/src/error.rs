use crate::{oracle::OracleError, params::ParamsError};

/// Reasons a gene sequence is not a usable permutation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PermutationError {
    #[display("expected {expected} genes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[display("gene {value} at position {position} is out of range 0..{len}")]
    OutOfRange {
        value: usize,
        position: usize,
        len: usize,
    },
    #[display("gene {value} appears more than once (again at position {position})")]
    Duplicate { value: usize, position: usize },
    #[display("parents do not hold the same set of values (gene {value} is missing from one)")]
    ValueSetMismatch { value: usize },
    #[display("invalid cut points {start}..{end} for {len} genes")]
    InvalidCutPoints { start: usize, end: usize, len: usize },
}

/// Errors that abort an evolution run.
///
/// None of these are recovered from: a corrupted permutation or a missing
/// fitness value invalidates every later generation.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum EvolutionError {
    #[display("invalid permutation: {_0}")]
    InvalidPermutation(PermutationError),
    #[display("invalid run parameters: {_0}")]
    InvalidParams(ParamsError),
    #[display("selection requires evaluated individuals, but individual #{index} has no fitness")]
    #[from(ignore)]
    Precondition { index: usize },
    #[display("oracle failed to evaluate individual #{index} in generation {generation}")]
    #[from(ignore)]
    OracleEvaluation {
        generation: usize,
        index: usize,
        source: OracleError,
    },
    #[display("population must keep {expected} individuals, got {actual}")]
    #[from(ignore)]
    PopulationSize { expected: usize, actual: usize },
    #[display("the run was aborted by an earlier error")]
    #[from(ignore)]
    Aborted,
}
