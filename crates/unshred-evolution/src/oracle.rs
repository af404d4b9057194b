//! Contract for the external fitness oracle.
//!
//! The oracle knows the shredded image. It scores a candidate strip order
//! (lower is better, `<= 0` is a perfect reconstruction) and can render an
//! order back to an image. The engine only ever calls
//! [`FitnessOracle::evaluate_solution`]; rendering the final answer is left to
//! the caller.

/// Failure reported by a [`FitnessOracle`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("{message}")]
pub struct OracleError {
    message: String,
}

impl OracleError {
    #[must_use]
    pub fn new<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Scores and renders candidate strip orders.
///
/// Implementations must behave as pure functions of the permutation: the
/// engine may evaluate distinct individuals concurrently from several threads.
pub trait FitnessOracle: Sync {
    /// Scores `permutation`. Lower is better; `0` or below means solved.
    fn evaluate_solution(&self, permutation: &[usize]) -> Result<f64, OracleError>;

    /// Renders or displays the image reconstructed with `permutation`.
    fn show_solution(&self, permutation: &[usize]) -> Result<(), OracleError>;
}

impl<T> FitnessOracle for &T
where
    T: FitnessOracle + ?Sized,
{
    fn evaluate_solution(&self, permutation: &[usize]) -> Result<f64, OracleError> {
        (**self).evaluate_solution(permutation)
    }

    fn show_solution(&self, permutation: &[usize]) -> Result<(), OracleError> {
        (**self).show_solution(permutation)
    }
}
