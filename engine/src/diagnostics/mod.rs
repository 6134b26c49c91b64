//! Row-level diagnostics.
//!
//! Validation problems never abort a run; the pipeline hands each one to a
//! [`DiagnosticsSink`] supplied by the caller. Three sinks are provided:
//!
//! - [`TracingSink`]: structured `warn` events through `tracing`
//! - [`CollectingSink`]: keeps every problem in memory
//! - any `FnMut(&ValidationProblem)` closure

use tracing::warn;

use crate::validation::ValidationProblem;

/// Receives row-level validation problems
pub trait DiagnosticsSink {
    /// Called once per failing column, in row then schema order
    fn report(&mut self, problem: &ValidationProblem);
}

impl<F> DiagnosticsSink for F
where
    F: FnMut(&ValidationProblem),
{
    fn report(&mut self, problem: &ValidationProblem) {
        self(problem)
    }
}

/// Emits each problem as a `tracing` warning
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn report(&mut self, problem: &ValidationProblem) {
        warn!(
            row = problem.row,
            column = %problem.column,
            data_type = %problem.data_type,
            kind = ?problem.kind,
            value = %problem.value,
            "{}",
            problem
        );
    }
}

/// Keeps every reported problem
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    problems: Vec<ValidationProblem>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn problems(&self) -> &[ValidationProblem] {
        &self.problems
    }

    pub fn into_problems(self) -> Vec<ValidationProblem> {
        self.problems
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Rows with at least one problem, ascending, without duplicates
    pub fn rejected_rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self.problems.iter().map(|p| p.row).collect();
        rows.sort_unstable();
        rows.dedup();
        rows
    }
}

impl DiagnosticsSink for CollectingSink {
    fn report(&mut self, problem: &ValidationProblem) {
        self.problems.push(problem.clone());
    }
}
