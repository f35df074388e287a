//! Assertion failure reports.
//!
//! A failed assertion surfaces an [`AssertionReport`]: the call under test,
//! the expected repeat description, the observed count, and an enumeration
//! of every call recorded on the fake instance (not only matching ones).
//! The full-history dump is intentional; it gives the engineer enough
//! context to see why a narrower filter did not match.
//!
//! The rendered text block is a de facto contract that other tooling may
//! parse or display verbatim; the structured form serializes for the same
//! reason.

use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::call::CompletedCall;

/// Maximum number of history lines rendered in one report. Further calls
/// are summarized in a final `… N more calls` line, never dropped silently.
pub const MAX_REPORT_CALLS: usize = 128;

/// One line of the call-history enumeration. Consecutive identical call
/// renderings collapse into a single line with `repeated` > 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLine {
    /// The rendered call, e.g. `Factory.create("widget")`.
    pub rendering: String,
    /// How many consecutive identical calls this line stands for.
    pub repeated: u64,
}

/// The structured content of an assertion failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct AssertionReport {
    /// Description of the call the assertion targeted.
    pub target: String,
    /// Description of the expected repeat constraint.
    pub expected: String,
    /// The observed matching-call count.
    pub observed: u64,
    /// The collapsed full-history enumeration, in record order.
    pub calls: Vec<HistoryLine>,
    /// Number of recorded calls omitted from `calls` by the report bound.
    pub omitted: u64,
}

impl AssertionReport {
    /// Builds a report over the instance's complete history.
    #[must_use]
    pub fn new(
        target: impl Into<String>,
        expected: impl Into<String>,
        observed: u64,
        history: &[impl AsRef<CompletedCall>],
    ) -> Self {
        let collapsed = collapse(history.iter().map(|call| call.as_ref().describe()));
        let omitted: u64 = collapsed
            .iter()
            .skip(MAX_REPORT_CALLS)
            .map(|line| line.repeated)
            .sum();
        let mut calls = collapsed;
        calls.truncate(MAX_REPORT_CALLS);
        Self {
            target: target.into(),
            expected: expected.into(),
            observed,
            calls,
            omitted,
        }
    }
}

/// Collapses consecutive identical renderings into [`HistoryLine`]s.
fn collapse(renderings: impl Iterator<Item = String>) -> Vec<HistoryLine> {
    let mut lines: Vec<HistoryLine> = Vec::new();
    for rendering in renderings {
        match lines.last_mut() {
            Some(last) if last.rendering == rendering => last.repeated += 1,
            _ => lines.push(HistoryLine {
                rendering,
                repeated: 1,
            }),
        }
    }
    lines
}

impl fmt::Display for AssertionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Assertion failed for the following call:")?;
        writeln!(f, "  {}", self.target)?;
        write!(
            f,
            "Expected to find it {} but found it {} times among the calls:",
            self.expected, self.observed
        )?;
        if self.calls.is_empty() {
            write!(f, "\n  (no calls were recorded on this fake)")?;
            return Ok(());
        }
        for (index, line) in self.calls.iter().enumerate() {
            let mut entry = format!("\n  {}. {}", index + 1, line.rendering);
            if line.repeated > 1 {
                let _ = write!(entry, " repeated {} times", line.repeated);
            }
            f.write_str(&entry)?;
        }
        if self.omitted > 0 {
            write!(f, "\n  … {} more calls", self.omitted)?;
        }
        Ok(())
    }
}

/// Raised when an observed call count does not satisfy its repeat
/// constraint. Never swallowed; carries the full diagnostic report.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{report}")]
pub struct ExpectationFailure {
    /// The diagnostic report.
    pub report: AssertionReport,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::call::{
        ArgValue, ArgumentList, CallOutcome, FakeHandle, MemberRef, PendingCall,
    };

    struct Factory;

    fn call(name: &str, values: Vec<ArgValue>) -> Arc<CompletedCall> {
        let mut builder = MemberRef::method::<Factory>(name);
        for (i, _) in values.iter().enumerate() {
            // Parameter types are irrelevant to rendering; names line up
            // positionally.
            builder = builder.parameter::<String>(format!("p{i}"));
        }
        let member = builder.build().unwrap();
        let names: Vec<String> = (0..values.len()).map(|i| format!("p{i}")).collect();
        let args = ArgumentList::new(names, values).unwrap();
        Arc::new(
            PendingCall::new(FakeHandle::new("Faked Factory"), member, args)
                .complete(CallOutcome::Returned(ArgValue::none())),
        )
    }

    #[test]
    fn test_consecutive_duplicates_collapse() {
        let history = vec![
            call("bar", vec![]),
            call("bar", vec![]),
            call("bar", vec![ArgValue::of("test".to_string())]),
            call("biz", vec![]),
        ];
        let report = AssertionReport::new("Factory.bar(\"\")", "repeat > 2", 0, &history);
        assert_eq!(report.calls.len(), 3);
        assert_eq!(report.calls[0].repeated, 2);
        assert_eq!(report.calls[1].repeated, 1);
        assert_eq!(report.calls[2].rendering, "Factory.biz()");
    }

    #[test]
    fn test_nonconsecutive_duplicates_do_not_collapse() {
        let history = vec![
            call("bar", vec![]),
            call("biz", vec![]),
            call("bar", vec![]),
        ];
        let report = AssertionReport::new("t", "never", 2, &history);
        assert_eq!(report.calls.len(), 3);
        assert!(report.calls.iter().all(|line| line.repeated == 1));
    }

    #[test]
    fn test_rendered_text_block() {
        let history = vec![
            call("bar", vec![]),
            call("bar", vec![]),
            call("bar", vec![ArgValue::of("test".to_string())]),
        ];
        let report =
            AssertionReport::new("Factory.bar(text: String) -> ()", "repeat > 2", 0, &history);
        let text = report.to_string();
        assert_eq!(
            text,
            "Assertion failed for the following call:\n  \
             Factory.bar(text: String) -> ()\n\
             Expected to find it repeat > 2 but found it 0 times among the calls:\n  \
             1. Factory.bar() repeated 2 times\n  \
             2. Factory.bar(\"test\")"
        );
    }

    #[test]
    fn test_empty_history_rendering() {
        let history: Vec<Arc<CompletedCall>> = Vec::new();
        let report = AssertionReport::new("Factory.bar()", "exactly once", 0, &history);
        let text = report.to_string();
        assert!(text.ends_with("(no calls were recorded on this fake)"));
    }

    #[test]
    fn test_report_bound_is_explicit() {
        let history: Vec<_> = (0..MAX_REPORT_CALLS + 5)
            .map(|i| call(&format!("m{i}"), vec![]))
            .collect();
        let report = AssertionReport::new("t", "never", 0, &history);
        assert_eq!(report.calls.len(), MAX_REPORT_CALLS);
        assert_eq!(report.omitted, 5);
        assert!(report.to_string().ends_with("… 5 more calls"));
    }

    #[test]
    fn test_failure_display_is_the_report() {
        let history = vec![call("bar", vec![])];
        let report = AssertionReport::new("Factory.bar()", "never", 1, &history);
        let failure = ExpectationFailure {
            report: report.clone(),
        };
        assert_eq!(failure.to_string(), report.to_string());
    }

    #[test]
    fn test_report_serializes() {
        let history = vec![call("bar", vec![]), call("bar", vec![])];
        let report = AssertionReport::new("Factory.bar()", "never", 2, &history);
        let json = serde_json::to_string(&report).unwrap();
        let back: AssertionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
        assert!(json.contains("repeated"));
    }
}
