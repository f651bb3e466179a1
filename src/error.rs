use std::fmt;

/// Everything that can stop a reduction.
///
/// Row and column indices carried by the variants are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub enum LllError {
    /// The reduction factor is outside `(1/4, 1]`.
    InvalidAlpha(f64),
    /// Any other parameter that failed validation.
    InvalidParameter(String),
    /// A row of the input does not have the length of the first row.
    RaggedBasis { row: usize, expected: usize, found: usize },
    /// The input holds a NaN or an infinity.
    NonFinite { row: usize, col: usize },
    /// The Gram-Schmidt vector of this row vanished, so the rows are linearly dependent.
    Degenerate { index: usize },
    /// A squared norm overflowed, or the exchange denominator underflowed.
    NumericalInstability { k: usize, delta: f64 },
    /// The optional iteration cap was exceeded.
    NonConvergence { iterations: usize },
    /// The reduced state failed the size-reduction or Lovász check.
    InvariantViolation { k: usize, reason: String },
}

impl fmt::Display for LllError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LllError::InvalidAlpha(alpha) => {
                write!(f, "Invalid alpha: {} (must satisfy 1/4 < alpha <= 1)", alpha)
            }
            LllError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            LllError::RaggedBasis { row, expected, found } => write!(
                f,
                "Ragged basis: row {} has {} entries, expected {}",
                row, found, expected
            ),
            LllError::NonFinite { row, col } => {
                write!(f, "Non-finite entry at row {}, column {}", row, col)
            }
            LllError::Degenerate { index } => write!(
                f,
                "Degenerate basis: Gram-Schmidt vector {} has zero norm (rows are linearly dependent)",
                index
            ),
            LllError::NumericalInstability { k, delta } => {
                write!(f, "Numerical instability at k={}: squared norm {:e} out of range", k, delta)
            }
            LllError::NonConvergence { iterations } => {
                write!(f, "Did not converge within {} iterations", iterations)
            }
            LllError::InvariantViolation { k, reason } => {
                write!(f, "Reduced basis violates invariants at k={}: {}", k, reason)
            }
        }
    }
}

impl std::error::Error for LllError {}

pub type Result<T> = std::result::Result<T, LllError>;
