//! The per-instance interception pipeline.
//!
//! A [`FakeEngine`] owns everything the engine keeps for one fake instance:
//! its rule book and its call log. The interception boundary hands each
//! intercepted call to [`FakeEngine::process`]:
//!
//! 1. the rule book selects the governing rule (consuming one use of it),
//! 2. the rule's behavior runs and produces the outcome,
//! 3. the completed call is appended to the recorder,
//! 4. the outcome goes back to the boundary: return a value, raise the
//!    fault, or proceed to the base implementation.
//!
//! Every step is synchronous and safe under concurrent callers. How the
//! interception is physically achieved, and how a base call is made, are
//! the boundary's concern, not this engine's.

use tracing::debug;

use crate::call::{ArgumentList, CallOutcome, FakeHandle, MemberRef, PendingCall};
use crate::error::ConfigurationError;
use crate::recording::CallRecorder;
use crate::rules::{RuleBehavior, RuleBook};

/// Rule book, call log, and identity of one fake instance.
#[derive(Debug)]
pub struct FakeEngine {
    handle: FakeHandle,
    rules: RuleBook,
    recorder: CallRecorder,
}

impl FakeEngine {
    /// Creates the engine for a fake named `name` (e.g. `Faked Factory`),
    /// with the default fallback behavior.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_fallback(name, RuleBehavior::return_default())
    }

    /// Creates the engine with a user-configured fallback behavior.
    #[must_use]
    pub fn with_fallback(name: impl Into<String>, fallback: RuleBehavior) -> Self {
        Self {
            handle: FakeHandle::new(name),
            rules: RuleBook::with_fallback_behavior(fallback),
            recorder: CallRecorder::new(),
        }
    }

    /// The instance handle.
    #[must_use]
    pub const fn handle(&self) -> &FakeHandle {
        &self.handle
    }

    /// The instance's rule book, for the configuration surface.
    #[must_use]
    pub const fn rule_book(&self) -> &RuleBook {
        &self.rules
    }

    /// The instance's call log, for queries and assertions.
    #[must_use]
    pub const fn recorder(&self) -> &CallRecorder {
        &self.recorder
    }

    /// Builds a pending call against this instance.
    #[must_use]
    pub fn begin_call(&self, member: MemberRef, arguments: ArgumentList) -> PendingCall {
        PendingCall::new(self.handle.clone(), member, arguments)
    }

    /// Runs the interception pipeline for one call.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::EngineStatePoisoned`] if engine state was
    /// poisoned; selection and recording themselves cannot fail.
    pub fn process(&self, call: PendingCall) -> Result<CallOutcome, ConfigurationError> {
        let rule = self.rules.select_and_consume(&call)?;
        let outcome = rule.behavior().apply(&call);
        debug!(
            fake = %self.handle,
            member = %call.member(),
            outcome = ?outcome,
            "call intercepted"
        );
        self.recorder.record(call.complete(outcome.clone()))?;
        Ok(outcome)
    }
}
