//! Structured step records and the observers that receive them.

use std::fmt;

/// What a single step did. Indices are 1-based.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// Row `k` lost `q` copies of row `l`. `q` is integral and is the exact `f64` subtracted.
    Reduce { k: usize, l: usize, q: f64 },
    /// Rows `k - 1` and `k` were swapped.
    Exchange { k: usize },
}

/// One effective reduce or exchange, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub iteration: usize,
    pub op: Operation,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            Operation::Reduce { k, l, q } => {
                write!(f, "[{}] reduce k={} l={} q={}", self.iteration, k, l, q)
            }
            Operation::Exchange { k } => write!(f, "[{}] exchange k={}", self.iteration, k),
        }
    }
}

/// Receives every step the reducer performs, in order.
pub trait StepObserver {
    fn on_step(&mut self, step: &Step);
}

impl<F: FnMut(&Step)> StepObserver for F {
    fn on_step(&mut self, step: &Step) {
        self(step)
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {
    fn on_step(&mut self, _step: &Step) {}
}

/// Emits one `info` record per step on the `lovasz` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl StepObserver for LogObserver {
    fn on_step(&mut self, step: &Step) {
        log::info!(target: "lovasz", "{}", step);
    }
}

/// Keeps every step for later inspection.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StepLog {
    steps: Vec<Step>,
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
    pub fn len(&self) -> usize {
        self.steps.len()
    }
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
    pub fn exchanges(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.op, Operation::Exchange { .. }))
            .count()
    }
    /// The human-readable form, one line per step.
    pub fn lines(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.to_string()).collect()
    }
}

impl StepObserver for StepLog {
    fn on_step(&mut self, step: &Step) {
        self.steps.push(*step);
    }
}

/// Forwards each step to two observers.
pub(crate) struct Tee<'a, A: ?Sized, B: ?Sized> {
    pub first: &'a mut A,
    pub second: &'a mut B,
}

impl<A: StepObserver + ?Sized, B: StepObserver + ?Sized> StepObserver for Tee<'_, A, B> {
    fn on_step(&mut self, step: &Step) {
        self.first.on_step(step);
        self.second.on_step(step);
    }
}
