//! Assertions over the recorded call history.
//!
//! [`assert_repeated`] evaluates a repeat constraint against the count of
//! matching calls; [`assert_sequence`] verifies that a chain of filters can
//! be placed on the recorded log in order. Both render the same full-history
//! diagnostic report on failure.

mod repeat;
mod report;

use thiserror::Error;
use tracing::debug;

pub use repeat::RepeatConstraint;
pub use report::{AssertionReport, ExpectationFailure, HistoryLine, MAX_REPORT_CALLS};

use crate::error::ConfigurationError;
use crate::matching::ArgumentsPredicate;
use crate::recording::{CallFilter, CallRecorder};

/// Failure modes of an assertion evaluation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssertionError {
    /// The observed count did not satisfy the constraint.
    #[error(transparent)]
    Expectation(#[from] ExpectationFailure),

    /// Engine state was unreadable (poisoned lock).
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Asserts that the number of recorded calls matching `filter` and
/// `arguments` satisfies `constraint`.
///
/// `target` is the rendered call-site description shown in the report; the
/// caller (the configuration layer) supplies it because it knows the
/// expression the user wrote.
///
/// # Errors
///
/// - [`AssertionError::Expectation`] with the full diagnostic report when
///   the constraint is not satisfied.
/// - [`AssertionError::Configuration`] if engine state was poisoned.
pub fn assert_repeated(
    recorder: &CallRecorder,
    target: impl Into<String>,
    filter: &CallFilter,
    arguments: &ArgumentsPredicate,
    constraint: &RepeatConstraint,
) -> Result<(), AssertionError> {
    let observed = recorder.count(filter, arguments)?;
    if constraint.evaluate(observed) {
        return Ok(());
    }
    let history = recorder.all()?;
    let report = AssertionReport::new(target, constraint.to_string(), observed, &history);
    debug!(observed, expected = %constraint, "repeat assertion failed");
    Err(ExpectationFailure { report }.into())
}

/// One step of an ordered assertion: a call-site description plus the
/// filter and arguments predicate that a recorded call must satisfy.
#[derive(Debug)]
pub struct SequenceStep {
    target: String,
    filter: CallFilter,
    arguments: ArgumentsPredicate,
}

impl SequenceStep {
    /// Creates a step.
    #[must_use]
    pub fn new(
        target: impl Into<String>,
        filter: CallFilter,
        arguments: ArgumentsPredicate,
    ) -> Self {
        Self {
            target: target.into(),
            filter,
            arguments,
        }
    }
}

/// Asserts that calls matching the steps occurred in the given relative
/// order: there exist recorded calls `c1 < c2 < …` (in record order), one
/// per step, each matching its step. The scan is greedy, placing every step
/// at its earliest possible call.
///
/// # Errors
///
/// - [`AssertionError::Expectation`] naming the first step that could not
///   be placed, with the full history report. The report's observed count
///   is the number of calls matching that step anywhere in the log, which
///   distinguishes "never happened" from "happened too early".
/// - [`AssertionError::Configuration`] if engine state was poisoned.
pub fn assert_sequence(
    recorder: &CallRecorder,
    steps: &[SequenceStep],
) -> Result<(), AssertionError> {
    let history = recorder.all()?;
    let mut position = 0usize;
    for (index, step) in steps.iter().enumerate() {
        let matches_step = |call: &crate::call::CompletedCall| {
            step.filter.matches(call.member()) && step.arguments.matches(call.arguments())
        };
        let found = history[position..]
            .iter()
            .position(|call| matches_step(call));
        match found {
            Some(offset) => position += offset + 1,
            None => {
                let observed = history.iter().filter(|call| matches_step(call)).count() as u64;
                let expected = format!(
                    "as step {} of the expected call sequence",
                    index + 1
                );
                debug!(step = index + 1, observed, "sequence assertion failed");
                let report =
                    AssertionReport::new(step.target.clone(), expected, observed, &history);
                return Err(ExpectationFailure { report }.into());
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
