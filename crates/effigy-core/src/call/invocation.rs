//! Invocations: one occurrence of a call on a fake instance.
//!
//! An invocation starts life as a [`PendingCall`] produced by the
//! interception boundary. Once the governing rule's behavior has run, the
//! call is completed with its [`CallOutcome`] and becomes an immutable
//! [`CompletedCall`] owned by the recorder.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::arguments::{ArgValue, ArgumentList};
use super::member::MemberRef;

static NEXT_FAKE_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one fake instance across rules, recordings, and reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FakeHandle {
    id: u64,
    name: String,
}

impl FakeHandle {
    /// Allocates a handle with a process-unique id and a human-readable name
    /// used in diagnostic reports (e.g. `Faked Factory`).
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NEXT_FAKE_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
        }
    }

    /// The process-unique instance id.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// The display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for FakeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The kind of failure a rule was configured to raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultInfo {
    message: String,
}

impl FaultInfo {
    /// Creates a fault description.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The configured failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FaultInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// What an invocation produced.
///
/// This is both the record attached to a completed call and the decision
/// handed back to the interception boundary: return a value, raise the
/// fault, or proceed to the real implementation (partial fakes). How the
/// base call is physically made is outside this engine.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum CallOutcome {
    /// A value (possibly the absent value for void members) was returned.
    Returned(ArgValue),
    /// The configured fault was raised.
    Raised(FaultInfo),
    /// The call proceeds to the base implementation.
    Base,
}

/// An invocation that has been intercepted but not yet completed.
#[derive(Debug, Clone)]
pub struct PendingCall {
    member: MemberRef,
    arguments: ArgumentList,
    fake: FakeHandle,
}

impl PendingCall {
    /// Creates a pending call targeting `member` on the fake identified by
    /// `fake`.
    #[must_use]
    pub fn new(fake: FakeHandle, member: MemberRef, arguments: ArgumentList) -> Self {
        Self {
            member,
            arguments,
            fake,
        }
    }

    /// The member being called.
    #[must_use]
    pub const fn member(&self) -> &MemberRef {
        &self.member
    }

    /// The argument values, in positional order.
    #[must_use]
    pub const fn arguments(&self) -> &ArgumentList {
        &self.arguments
    }

    /// The fake instance being called.
    #[must_use]
    pub const fn fake(&self) -> &FakeHandle {
        &self.fake
    }

    /// Completes the call with its outcome. The sequence number is assigned
    /// by the recorder at append time.
    #[must_use]
    pub fn complete(self, outcome: CallOutcome) -> CompletedCall {
        CompletedCall {
            member: self.member,
            arguments: self.arguments,
            fake: self.fake,
            outcome,
            sequence: 0,
        }
    }
}

/// A completed, immutable invocation.
#[derive(Debug, Clone)]
pub struct CompletedCall {
    member: MemberRef,
    arguments: ArgumentList,
    fake: FakeHandle,
    outcome: CallOutcome,
    sequence: u64,
}

impl CompletedCall {
    /// The member that was called.
    #[must_use]
    pub const fn member(&self) -> &MemberRef {
        &self.member
    }

    /// The argument values, in positional order.
    #[must_use]
    pub const fn arguments(&self) -> &ArgumentList {
        &self.arguments
    }

    /// The fake instance that was called.
    #[must_use]
    pub const fn fake(&self) -> &FakeHandle {
        &self.fake
    }

    /// The recorded outcome.
    #[must_use]
    pub const fn outcome(&self) -> &CallOutcome {
        &self.outcome
    }

    /// Position in the instance's log, assigned at append time. Stable for
    /// the lifetime of the fake; entries are never renumbered.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Renders the call the way reports enumerate history entries, e.g.
    /// `Factory.create("widget")`.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{}{}", self.member.qualified_name(), self.arguments.rendered())
    }

    pub(crate) fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }
}

impl fmt::Display for CompletedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
