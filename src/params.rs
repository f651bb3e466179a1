use crate::error::{LllError, Result};

/// Default reduction factor, the usual textbook choice.
pub const DEFAULT_ALPHA: f64 = 0.75;
/// Default slack used when checking the reduced state.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Knobs for a single reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct LllParams {
    /// Lovász factor, `1/4 < alpha <= 1`. Closer to 1 gives a more reduced basis and a longer run.
    pub alpha: f64,
    /// Send every reduce/exchange step to the `log` facade.
    pub verbose: bool,
    /// Upper bound on main loop passes. `None` runs until the basis is reduced.
    pub max_iterations: Option<usize>,
    /// Check size-reduction and Lovász conditions on the final state.
    pub verify: bool,
    /// Slack allowed by the final check.
    pub tolerance: f64,
}

impl Default for LllParams {
    fn default() -> Self {
        LllParams {
            alpha: DEFAULT_ALPHA,
            verbose: false,
            max_iterations: None,
            verify: true,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl LllParams {
    pub fn new(alpha: f64) -> Self {
        LllParams { alpha, ..Default::default() }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Reject parameters before any work is done.
    pub fn validate(&self) -> Result<()> {
        validate_alpha(self.alpha)?;
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(LllError::InvalidParameter(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// `alpha` must lie in `(1/4, 1]`; NaN is rejected.
pub fn validate_alpha(alpha: f64) -> Result<()> {
    if alpha > 0.25 && alpha <= 1.0 {
        Ok(())
    } else {
        Err(LllError::InvalidAlpha(alpha))
    }
}
