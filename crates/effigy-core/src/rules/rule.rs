//! A single configured call rule: matching condition, behavior, and
//! remaining-use accounting.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::behavior::RuleBehavior;
use crate::call::{MemberRef, PendingCall, TypeToken};
use crate::error::ConfigurationError;
use crate::matching::ArgumentsPredicate;

/// The member-matching condition of a rule.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum MemberMatcher {
    /// Matches one member exactly, by declaring type and signature.
    Exact(MemberRef),
    /// Matches any member of any type.
    AnyMember,
    /// Matches any member whose declared return type is exactly the given
    /// type. Assignability is deliberately not consulted.
    AnyMemberReturning(TypeToken),
}

impl MemberMatcher {
    /// Applies the matcher to an invocation's member.
    #[must_use]
    pub fn matches(&self, member: &MemberRef) -> bool {
        match self {
            Self::Exact(expected) => expected == member,
            Self::AnyMember => true,
            Self::AnyMemberReturning(token) => member.return_type() == *token,
        }
    }
}

impl fmt::Display for MemberMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(member) => f.write_str(&member.qualified_name()),
            Self::AnyMember => f.write_str("any member"),
            Self::AnyMemberReturning(token) => {
                write!(f, "any member returning {}", token.display_name())
            },
        }
    }
}

/// A configured mapping from a call-matching condition to a behavior.
///
/// A rule with a finite remaining-use counter stops applying once the
/// counter reaches zero but stays enumerable for diagnostics.
#[derive(Debug)]
pub struct CallRule {
    matcher: MemberMatcher,
    arguments: ArgumentsPredicate,
    behavior: RuleBehavior,
    remaining: Option<AtomicU64>,
}

impl CallRule {
    /// Starts a rule matching `member` exactly.
    #[must_use]
    pub fn for_member(member: MemberRef) -> CallRuleBuilder {
        CallRuleBuilder::new(MemberMatcher::Exact(member))
    }

    /// Starts a rule matching any member.
    #[must_use]
    pub fn for_any_member() -> CallRuleBuilder {
        CallRuleBuilder::new(MemberMatcher::AnyMember)
    }

    /// Starts a rule matching any member returning exactly `T`.
    #[must_use]
    pub fn for_any_member_returning<T: 'static>() -> CallRuleBuilder {
        CallRuleBuilder::new(MemberMatcher::AnyMemberReturning(TypeToken::of::<T>()))
    }

    /// The member-matching condition.
    #[must_use]
    pub const fn matcher(&self) -> &MemberMatcher {
        &self.matcher
    }

    /// The arguments predicate.
    #[must_use]
    pub const fn arguments(&self) -> &ArgumentsPredicate {
        &self.arguments
    }

    /// The configured behavior.
    #[must_use]
    pub const fn behavior(&self) -> &RuleBehavior {
        &self.behavior
    }

    /// Remaining uses: `None` for unlimited, otherwise the current counter
    /// value (zero once exhausted).
    #[must_use]
    pub fn remaining_uses(&self) -> Option<u64> {
        self.remaining
            .as_ref()
            .map(|counter| counter.load(Ordering::Acquire))
    }

    /// Returns `true` once a finite counter has reached zero.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining_uses() == Some(0)
    }

    /// Member and argument applicability (selection steps 2 and 3). Does not
    /// consult or consume the use counter.
    #[must_use]
    pub fn matches(&self, call: &PendingCall) -> bool {
        self.matcher.matches(call.member()) && self.arguments.matches(call.arguments())
    }

    /// Attempts to consume one use. Always succeeds for unlimited rules.
    /// For finite rules the decrement is a compare-and-swap: when two
    /// threads race for the final use, exactly one succeeds and the other
    /// continues its scan.
    #[must_use]
    pub fn try_consume(&self) -> bool {
        match &self.remaining {
            None => true,
            Some(counter) => counter
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
                .is_ok(),
        }
    }

    /// The unlimited catch-all rule backing every book's fallback slot.
    pub(crate) fn catch_all(behavior: RuleBehavior) -> Self {
        Self {
            matcher: MemberMatcher::AnyMember,
            arguments: ArgumentsPredicate::any(),
            behavior,
            remaining: None,
        }
    }

    /// One-line description used when enumerating configured rules.
    #[must_use]
    pub fn describe(&self) -> String {
        let uses = match self.remaining_uses() {
            None => String::new(),
            Some(n) => format!(" [{n} uses left]"),
        };
        format!("{} {} {}{uses}", self.matcher, self.arguments, self.behavior)
    }
}

impl fmt::Display for CallRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Builder for [`CallRule`] values; the configuration layer's rule surface.
#[derive(Debug)]
pub struct CallRuleBuilder {
    matcher: MemberMatcher,
    arguments: ArgumentsPredicate,
    behavior: RuleBehavior,
    uses: Option<u64>,
}

impl CallRuleBuilder {
    fn new(matcher: MemberMatcher) -> Self {
        Self {
            matcher,
            arguments: ArgumentsPredicate::any(),
            behavior: RuleBehavior::return_default(),
            uses: None,
        }
    }

    /// Sets the arguments predicate. Defaults to match-anything.
    #[must_use]
    pub fn with_arguments(mut self, arguments: ArgumentsPredicate) -> Self {
        self.arguments = arguments;
        self
    }

    /// Sets the behavior. Defaults to returning the member's default value.
    #[must_use]
    pub fn with_behavior(mut self, behavior: RuleBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Limits the rule to `uses` applications.
    #[must_use]
    pub fn limited_to(mut self, uses: u64) -> Self {
        self.uses = Some(uses);
        self
    }

    /// Finishes the rule.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::ZeroUseRule`] if the rule was limited to zero
    /// uses; such a rule could never apply.
    pub fn build(self) -> Result<CallRule, ConfigurationError> {
        if self.uses == Some(0) {
            return Err(ConfigurationError::ZeroUseRule {
                member: self.matcher.to_string(),
            });
        }
        Ok(CallRule {
            matcher: self.matcher,
            arguments: self.arguments,
            behavior: self.behavior,
            remaining: self.uses.map(AtomicU64::new),
        })
    }
}
