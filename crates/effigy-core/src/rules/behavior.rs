//! Configured rule behaviors.
//!
//! A behavior is what a selected rule does with the invocation: return the
//! member's default, return a fixed or computed value, raise a configured
//! fault, or signal that the call should proceed to the real implementation
//! (partial fakes). Applying a behavior is synchronous and never blocks.

use std::fmt;
use std::sync::Arc;

use crate::call::{ArgValue, CallOutcome, FaultInfo, PendingCall};

type ValueProducer = Arc<dyn Fn(&PendingCall) -> ArgValue + Send + Sync>;

/// What a rule does when it governs an invocation.
#[derive(Clone)]
pub struct RuleBehavior {
    kind: BehaviorKind,
}

#[derive(Clone)]
enum BehaviorKind {
    ReturnDefault,
    Return(ArgValue),
    Compute(ValueProducer),
    Raise(FaultInfo),
    CallBase,
}

impl RuleBehavior {
    /// Returns the default value for the member's return type (the absent
    /// value; unit for void members). This is the fallback rule's behavior
    /// when the user configured none.
    #[must_use]
    pub fn return_default() -> Self {
        Self {
            kind: BehaviorKind::ReturnDefault,
        }
    }

    /// Returns a fixed value.
    #[must_use]
    pub fn returns<T>(value: T) -> Self
    where
        T: PartialEq + fmt::Debug + Send + Sync + 'static,
    {
        Self {
            kind: BehaviorKind::Return(ArgValue::of(value)),
        }
    }

    /// Returns a pre-erased value.
    #[must_use]
    pub fn returns_value(value: ArgValue) -> Self {
        Self {
            kind: BehaviorKind::Return(value),
        }
    }

    /// Computes the return value from the invocation.
    #[must_use]
    pub fn computes<F>(producer: F) -> Self
    where
        F: Fn(&PendingCall) -> ArgValue + Send + Sync + 'static,
    {
        Self {
            kind: BehaviorKind::Compute(Arc::new(producer)),
        }
    }

    /// Raises the configured fault.
    #[must_use]
    pub fn raises(message: impl Into<String>) -> Self {
        Self {
            kind: BehaviorKind::Raise(FaultInfo::new(message)),
        }
    }

    /// Signals that the call proceeds to the base implementation.
    #[must_use]
    pub fn calls_base() -> Self {
        Self {
            kind: BehaviorKind::CallBase,
        }
    }

    /// Applies the behavior to a pending call, producing its outcome.
    #[must_use]
    pub fn apply(&self, call: &PendingCall) -> CallOutcome {
        match &self.kind {
            BehaviorKind::ReturnDefault => CallOutcome::Returned(ArgValue::none()),
            BehaviorKind::Return(value) => CallOutcome::Returned(value.clone()),
            BehaviorKind::Compute(producer) => CallOutcome::Returned(producer(call)),
            BehaviorKind::Raise(fault) => CallOutcome::Raised(fault.clone()),
            BehaviorKind::CallBase => CallOutcome::Base,
        }
    }

    /// Short description used when enumerating configured rules.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.kind {
            BehaviorKind::ReturnDefault => "returns the default value".to_string(),
            BehaviorKind::Return(value) => format!("returns {}", value.rendered()),
            BehaviorKind::Compute(_) => "computes a return value".to_string(),
            BehaviorKind::Raise(fault) => format!("raises '{fault}'"),
            BehaviorKind::CallBase => "calls the base implementation".to_string(),
        }
    }
}

impl fmt::Display for RuleBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl fmt::Debug for RuleBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleBehavior({self})")
    }
}
