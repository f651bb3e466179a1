//! The LLL state machine.
//!
//! The reducer takes one Gram-Schmidt decomposition up front and keeps `mu`
//! and the squared norms current through closed-form updates, so the main
//! loop never orthogonalizes again.

use nalgebra::{DMatrix, DVector};

use crate::error::{LllError, Result};
use crate::gram_schmidt::gram_schmidt;
use crate::observer::{Operation, Step, StepObserver};
use crate::params::LllParams;
use crate::rounding::round_ties_down;

/// Counters collected over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReductionStats {
    /// Reduce steps that changed the basis.
    pub reductions: usize,
    pub exchanges: usize,
    /// Passes of the main loop.
    pub iterations: usize,
}

impl ReductionStats {
    /// Number of records an observer received.
    pub fn steps(&self) -> usize {
        self.reductions + self.exchanges
    }
}

/// A reduced basis and how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub basis: DMatrix<f64>,
    pub stats: ReductionStats,
}

/// Working state of one reduction. All indices taken by the methods are 0-based.
#[derive(Debug, Clone)]
pub struct Reducer {
    basis: DMatrix<f64>,
    mu: DMatrix<f64>,
    gammax: DVector<f64>,
    params: LllParams,
    stats: ReductionStats,
}

impl Reducer {
    /// Validate `params` and orthogonalize `basis`, which the reducer takes ownership of.
    pub fn new(basis: DMatrix<f64>, params: &LllParams) -> Result<Self> {
        params.validate()?;
        let gs = gram_schmidt(&basis)?;
        Ok(Reducer {
            basis,
            mu: gs.mu,
            gammax: gs.gammax,
            params: params.clone(),
            stats: ReductionStats::default(),
        })
    }

    pub fn basis(&self) -> &DMatrix<f64> {
        &self.basis
    }

    pub fn mu(&self) -> &DMatrix<f64> {
        &self.mu
    }

    pub fn gammax(&self) -> &DVector<f64> {
        &self.gammax
    }

    pub fn stats(&self) -> ReductionStats {
        self.stats
    }

    fn next_iteration(&self) -> usize {
        self.stats.steps() + 1
    }

    /// Size-reduce row `k` against row `l < k`.
    ///
    /// Returns `false` without touching anything when `|mu[k, l]| <= 1/2`.
    pub fn reduce<O: StepObserver + ?Sized>(&mut self, k: usize, l: usize, observer: &mut O) -> bool {
        debug_assert!(l < k);
        let mu_kl = self.mu[(k, l)];
        if mu_kl.abs() <= 0.5 {
            return false;
        }
        let q = round_ties_down(mu_kl);

        for col in 0..self.basis.ncols() {
            let b_l = self.basis[(l, col)];
            self.basis[(k, col)] -= q * b_l;
        }
        for j in 0..l {
            let mu_lj = self.mu[(l, j)];
            self.mu[(k, j)] -= q * mu_lj;
        }
        self.mu[(k, l)] -= q;

        let step = Step {
            iteration: self.next_iteration(),
            op: Operation::Reduce { k: k + 1, l: l + 1, q },
        };
        self.stats.reductions += 1;
        observer.on_step(&step);
        true
    }

    /// Swap rows `k - 1` and `k` and repair `mu` and the squared norms in place.
    pub fn exchange<O: StepObserver + ?Sized>(&mut self, k: usize, observer: &mut O) -> Result<()> {
        debug_assert!(k >= 1);
        let m = self.basis.nrows();
        let nu = self.mu[(k, k - 1)];
        let g_prev = self.gammax[k - 1];
        let g_k = self.gammax[k];
        let delta = g_k + nu * nu * g_prev;
        if !delta.is_finite() || delta <= f64::MIN_POSITIVE {
            log::warn!("exchange at k={} hit delta={:e}", k + 1, delta);
            return Err(LllError::NumericalInstability { k: k + 1, delta });
        }

        self.basis.swap_rows(k - 1, k);

        self.mu[(k, k - 1)] = nu * g_prev / delta;
        self.gammax[k] = g_k * g_prev / delta;
        self.gammax[k - 1] = delta;

        for j in 0..k - 1 {
            self.mu.swap((k - 1, j), (k, j));
        }
        // Each row below uses the freshly updated mu[k, k-1] and mu[i, k].
        for i in k + 1..m {
            let xi = self.mu[(i, k)];
            self.mu[(i, k)] = self.mu[(i, k - 1)] - nu * self.mu[(i, k)];
            self.mu[(i, k - 1)] = self.mu[(k, k - 1)] * self.mu[(i, k)] + xi;
        }

        let step = Step { iteration: self.next_iteration(), op: Operation::Exchange { k: k + 1 } };
        self.stats.exchanges += 1;
        observer.on_step(&step);
        Ok(())
    }

    /// `gammax[k] >= (alpha - mu[k, k-1]^2) * gammax[k-1]`
    pub fn lovasz_holds(&self, k: usize) -> bool {
        let mu = self.mu[(k, k - 1)];
        self.gammax[k] >= (self.params.alpha - mu * mu) * self.gammax[k - 1]
    }

    /// Drive the state machine to termination and hand back the reduced basis.
    pub fn run<O: StepObserver + ?Sized>(mut self, observer: &mut O) -> Result<Reduction> {
        let m = self.basis.nrows();
        log::debug!(
            "LLL start: {} vectors of dimension {}, alpha={}",
            m,
            self.basis.ncols(),
            self.params.alpha
        );

        let mut k = 1;
        while k < m {
            if let Some(cap) = self.params.max_iterations {
                if self.stats.iterations >= cap {
                    log::warn!("LLL stopped after {} iterations at k={}", cap, k + 1);
                    return Err(LllError::NonConvergence { iterations: cap });
                }
            }
            self.stats.iterations += 1;

            self.reduce(k, k - 1, observer);
            if self.lovasz_holds(k) {
                for l in (0..k - 1).rev() {
                    self.reduce(k, l, observer);
                }
                k += 1;
            } else {
                self.exchange(k, observer)?;
                if k > 1 {
                    k -= 1;
                }
            }
        }

        if self.params.verify {
            self.check_invariants()?;
        }
        log::debug!(
            "LLL done: {} reductions, {} exchanges, {} iterations",
            self.stats.reductions,
            self.stats.exchanges,
            self.stats.iterations
        );
        Ok(Reduction { basis: self.basis, stats: self.stats })
    }

    /// Check size-reduction and the Lovász condition on the maintained state.
    pub fn check_invariants(&self) -> Result<()> {
        let tol = self.params.tolerance;
        let m = self.basis.nrows();
        for k in 1..m {
            for l in 0..k {
                let mu_kl = self.mu[(k, l)];
                if !(mu_kl.abs() <= 0.5 + tol) {
                    log::warn!("size-reduction broken at k={}, l={}", k + 1, l + 1);
                    return Err(LllError::InvariantViolation {
                        k: k + 1,
                        reason: format!("|mu[{}, {}]| = {} exceeds 1/2", k + 1, l + 1, mu_kl.abs()),
                    });
                }
            }
            let mu = self.mu[(k, k - 1)];
            let bound = (self.params.alpha - mu * mu) * self.gammax[k - 1];
            if !(self.gammax[k] >= bound - tol * self.gammax[k - 1]) {
                log::warn!("Lovász condition broken at k={}", k + 1);
                return Err(LllError::InvariantViolation {
                    k: k + 1,
                    reason: format!("gammax = {} is below {}", self.gammax[k], bound),
                });
            }
        }
        Ok(())
    }
}
