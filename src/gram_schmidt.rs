//! Classical Gram-Schmidt orthogonalization without normalisation.
//!
//! ```text
//! b*_1 = b_1
//! b*_i = b_i - sum_{j<i} mu_ij b*_j
//! mu_ij = <b_i, b*_j> / <b*_j, b*_j>
//! ```

use nalgebra::{DMatrix, DVector};

use crate::error::{LllError, Result};

/// Output of [`gram_schmidt`]. Rows of `orthogonal` are the `b*_i`.
#[derive(Debug, Clone, PartialEq)]
pub struct GramSchmidt {
    pub orthogonal: DMatrix<f64>,
    /// Strictly lower triangular; entries on and above the diagonal are zero.
    pub mu: DMatrix<f64>,
    /// `gammax[i] = |b*_i|^2`
    pub gammax: DVector<f64>,
}

/// Orthogonalize the rows of `basis`.
///
/// Fails with [`LllError::Degenerate`] when some `b*_i` has (numerically) zero
///
/// squared norm, i.e. the rows are not linearly independent, and with
///
/// [`LllError::NumericalInstability`] when a squared norm overflows.
pub fn gram_schmidt(basis: &DMatrix<f64>) -> Result<GramSchmidt> {
    let m = basis.nrows();
    let mut orthogonal = DMatrix::<f64>::zeros(m, basis.ncols());
    let mut mu = DMatrix::<f64>::zeros(m, m);
    let mut gammax = DVector::<f64>::zeros(m);

    for i in 0..m {
        let b_i = basis.row(i);
        let mut b_star = b_i.clone_owned();
        for j in 0..i {
            let mu_ij = b_i.dot(&orthogonal.row(j)) / gammax[j];
            mu[(i, j)] = mu_ij;
            b_star -= orthogonal.row(j) * mu_ij;
        }
        let norm_sq = b_star.norm_squared();
        let row_sq = b_i.norm_squared();
        if !norm_sq.is_finite() || !row_sq.is_finite() {
            return Err(LllError::NumericalInstability { k: i + 1, delta: norm_sq });
        }
        // Cancellation error on dependent rows is of order (m eps |b_i|)^2.
        if !(norm_sq > (m as f64 * f64::EPSILON).powi(2) * row_sq) {
            return Err(LllError::Degenerate { index: i + 1 });
        }
        gammax[i] = norm_sq;
        orthogonal.set_row(i, &b_star);
    }

    Ok(GramSchmidt { orthogonal, mu, gammax })
}
