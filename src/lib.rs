
//! LLL (Lenstra–Lenstra–Lovász) lattice basis reduction.
//!
//! The basis is a matrix whose rows are the lattice vectors. One classical
//! Gram-Schmidt pass seeds the reduction; afterwards the coefficients and the
//! squared Gram-Schmidt norms are updated in closed form on every exchange.
//!
//! ## Example
//!
//! ```rust
//! use lovasz::*;
//! use nalgebra::DMatrix;
//!
//! fn reduce_4d() -> Result<()> {
//!     let basis = DMatrix::from_row_slice(4, 4, &[
//!         -2, 7, 7, -5,
//!         3, -2, 6, -1,
//!         2, -8, -9, -7,
//!         8, -9, 6, -4,
//!     ]);
//!     let reduced = lll(&basis, 1)?;
//!     let expected = DMatrix::from_row_slice(4, 4, &[
//!         2.0, 3.0, 1.0, 1.0,
//!         2.0, 0.0, -2.0, -4.0,
//!         -2.0, 2.0, 3.0, -3.0,
//!         3.0, -2.0, 6.0, -1.0,
//!     ]);
//!     assert_eq!(expected, reduced);
//!     Ok(())
//! }
//! # reduce_4d().unwrap();
//!```

use nalgebra::{DMatrix, Scalar};
use num_traits::AsPrimitive;

pub mod error;
pub mod gram_schmidt;
pub mod observer;
pub mod params;
pub mod reducer;
pub mod rounding;

pub use error::{LllError, Result};
pub use gram_schmidt::{gram_schmidt, GramSchmidt};
pub use observer::{LogObserver, NoopObserver, Operation, Step, StepLog, StepObserver};
pub use params::LllParams;
pub use reducer::{Reducer, Reduction, ReductionStats};
pub use rounding::round_ties_down;

use observer::Tee;

/// Reduce `basis` with factor `alpha`, leaving every other parameter at its default.
///
/// Integer and floating point entries are accepted for both arguments; the
///
/// result is always `f64`. `alpha` must satisfy `1/4 < alpha <= 1`.
pub fn lll<T, A>(basis: &DMatrix<T>, alpha: A) -> Result<DMatrix<f64>>
where
    T: Scalar + AsPrimitive<f64>,
    A: AsPrimitive<f64>,
{
    let params = LllParams::new(alpha.as_());
    lll_with_params(basis, &params).map(|reduction| reduction.basis)
}

/// Reduce `basis` under `params`. With `params.verbose` every step is logged.
pub fn lll_with_params<T>(basis: &DMatrix<T>, params: &LllParams) -> Result<Reduction>
where
    T: Scalar + AsPrimitive<f64>,
{
    lll_observed(basis, params, &mut NoopObserver)
}

/// Reduce `basis` under `params`, reporting each reduce and exchange to `observer`.
pub fn lll_observed<T, O>(basis: &DMatrix<T>, params: &LllParams, observer: &mut O) -> Result<Reduction>
where
    T: Scalar + AsPrimitive<f64>,
    O: StepObserver + ?Sized,
{
    let working = promote(basis)?;
    let reducer = Reducer::new(working, params)?;
    if params.verbose {
        let mut tee = Tee { first: &mut LogObserver, second: observer };
        reducer.run(&mut tee)
    } else {
        reducer.run(observer)
    }
}

/// Copy `basis` into `f64`, rejecting NaN and infinities.
fn promote<T>(basis: &DMatrix<T>) -> Result<DMatrix<f64>>
where
    T: Scalar + AsPrimitive<f64>,
{
    let working: DMatrix<f64> = basis.map(|x| x.as_());
    for row in 0..working.nrows() {
        for col in 0..working.ncols() {
            if !working[(row, col)].is_finite() {
                return Err(LllError::NonFinite { row: row + 1, col: col + 1 });
            }
        }
    }
    Ok(working)
}

/// Build a basis from a sequence of row vectors.
pub fn basis_from_rows<T, R>(rows: &[R]) -> Result<DMatrix<f64>>
where
    T: AsPrimitive<f64>,
    R: AsRef<[T]>,
{
    let ncols = rows.first().map_or(0, |r| r.as_ref().len());
    for (i, row) in rows.iter().enumerate() {
        let found = row.as_ref().len();
        if found != ncols {
            return Err(LllError::RaggedBasis { row: i + 1, expected: ncols, found });
        }
    }
    Ok(DMatrix::from_row_iterator(
        rows.len(),
        ncols,
        rows.iter().flat_map(|r| r.as_ref().iter().map(|x| x.as_())),
    ))
}

/// The rows of `basis` as plain vectors.
pub fn basis_to_rows(basis: &DMatrix<f64>) -> Vec<Vec<f64>> {
    basis.row_iter().map(|r| r.iter().copied().collect()).collect()
}

/// Whether `basis` is size-reduced and satisfies the Lovász condition for `alpha`.
///
/// Orthogonalizes from scratch, so it is independent of any reducer state.
pub fn is_lll_reduced(basis: &DMatrix<f64>, alpha: f64, tolerance: f64) -> Result<bool> {
    params::validate_alpha(alpha)?;
    let gs = gram_schmidt(basis)?;
    let m = basis.nrows();
    for k in 1..m {
        if (0..k).any(|l| gs.mu[(k, l)].abs() > 0.5 + tolerance) {
            return Ok(false);
        }
        let mu = gs.mu[(k, k - 1)];
        if gs.gammax[k] < (alpha - mu * mu) * gs.gammax[k - 1] - tolerance * gs.gammax[k - 1] {
            return Ok(false);
        }
    }
    Ok(true)
}

// Tests
//-------------------------------------------------------------------------------
#[cfg(test)]
mod tests {

    use super::*;

    fn reference_basis() -> DMatrix<i64> {
        DMatrix::from_row_slice(4, 4, &[-2, 7, 7, -5, 3, -2, 6, -1, 2, -8, -9, -7, 8, -9, 6, -4])
    }

    const REFERENCE_LOG: [&str; 23] = [
        "[1] exchange k=2",
        "[2] reduce k=2 l=1 q=1",
        "[3] reduce k=3 l=2 q=-1",
        "[4] reduce k=3 l=1 q=-1",
        "[5] exchange k=4",
        "[6] reduce k=3 l=2 q=-1",
        "[7] exchange k=3",
        "[8] reduce k=2 l=1 q=1",
        "[9] reduce k=3 l=2 q=1",
        "[10] reduce k=3 l=1 q=-1",
        "[11] reduce k=4 l=3 q=-1",
        "[12] exchange k=4",
        "[13] reduce k=3 l=2 q=1",
        "[14] exchange k=3",
        "[15] exchange k=2",
        "[16] exchange k=3",
        "[17] reduce k=2 l=1 q=1",
        "[18] exchange k=2",
        "[19] exchange k=4",
        "[20] reduce k=3 l=2 q=1",
        "[21] exchange k=3",
        "[22] reduce k=2 l=1 q=-1",
        "[23] exchange k=2",
    ];

    #[test]
    fn reference_basis_4d() {
        let mut log = StepLog::new();
        let reduction = lll_observed(&reference_basis(), &LllParams::new(1.0), &mut log).unwrap();
        let expected = basis_from_rows(&[
            [2, 3, 1, 1],
            [2, 0, -2, -4],
            [-2, 2, 3, -3],
            [3, -2, 6, -1],
        ])
        .unwrap();
        assert_eq!(expected, reduction.basis);
        assert_eq!(log.len(), 23);
        assert_eq!(log.lines(), REFERENCE_LOG);
        assert_eq!(reduction.stats.steps(), 23);
        assert_eq!(reduction.stats.exchanges, 11);
    }

    #[test]
    fn integer_and_float_inputs_agree() {
        let ints = reference_basis();
        let floats = ints.map(|x| x as f64);
        assert_eq!(lll(&ints, 1).unwrap(), lll(&floats, 1.0).unwrap());
        assert_eq!(lll(&ints, 0.75f32).unwrap(), lll(&floats, 0.75).unwrap());
    }

    #[test]
    fn alpha_boundary() {
        let basis = reference_basis();
        assert_eq!(lll(&basis, 0.25), Err(LllError::InvalidAlpha(0.25)));
        assert!(lll(&basis, 0.250001).is_ok());
        assert!(lll(&basis, 1.0).is_ok());
        assert!(matches!(lll(&basis, 2), Err(LllError::InvalidAlpha(_))));
    }

    #[test]
    fn alpha_checked_before_rank() {
        let singular = DMatrix::from_row_slice(2, 2, &[1, 2, 2, 4]);
        assert_eq!(lll(&singular, 0.1), Err(LllError::InvalidAlpha(0.1)));
        assert_eq!(lll(&singular, 0.75), Err(LllError::Degenerate { index: 2 }));
    }

    #[test]
    fn non_finite_entries_rejected() {
        let basis = DMatrix::from_row_slice(2, 2, &[1.0, f64::NAN, 0.0, 1.0]);
        assert_eq!(lll(&basis, 0.75), Err(LllError::NonFinite { row: 1, col: 2 }));
    }

    #[test]
    fn rows_round_trip_through_matrix() {
        let rows = vec![vec![1, 2], vec![3, 4]];
        let basis = basis_from_rows(&rows).unwrap();
        assert_eq!(basis_to_rows(&basis), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);

        let ragged = vec![vec![1, 2], vec![3]];
        assert_eq!(
            basis_from_rows(&ragged),
            Err(LllError::RaggedBasis { row: 2, expected: 2, found: 1 })
        );
    }

    #[test]
    fn reduced_output_passes_independent_check() {
        let reduced = lll(&reference_basis(), 1).unwrap();
        assert!(is_lll_reduced(&reduced, 1.0, 1e-9).unwrap());
        assert!(!is_lll_reduced(&reference_basis().map(|x| x as f64), 0.75, 1e-9).unwrap());
    }

    #[test]
    fn verbose_logging_does_not_change_result() {
        let _ = simplelog::SimpleLogger::init(log::LevelFilter::Info, simplelog::Config::default());
        let quiet = lll_with_params(&reference_basis(), &LllParams::new(1.0)).unwrap();
        let mut log = StepLog::new();
        let loud = lll_observed(
            &reference_basis(),
            &LllParams::new(1.0).with_verbose(true),
            &mut log,
        )
        .unwrap();
        assert_eq!(quiet, loud);
        assert_eq!(log.lines(), REFERENCE_LOG);
    }
}
