//! The ordered rule collection governing one fake instance.
//!
//! Rules are scanned most-recently-added first, so re-configuring a call
//! narrows or overrides earlier, broader configurations without removing
//! them ("last configuration wins"). A catch-all fallback rule is always
//! present and always last in precedence; selection therefore never fails.
//!
//! Matching ambiguity is not an error condition anywhere in this engine:
//! when several rules would apply, precedence order resolves the choice
//! deterministically and silently.

use std::sync::{Arc, RwLock};

use tracing::{debug, trace};

use super::behavior::RuleBehavior;
use super::rule::CallRule;
use crate::call::PendingCall;
use crate::error::ConfigurationError;

/// The ordered set of rules for one fake instance, plus the fallback.
#[derive(Debug)]
pub struct RuleBook {
    /// Configured rules in addition order; scanned in reverse.
    rules: RwLock<Vec<Arc<CallRule>>>,
    fallback: Arc<CallRule>,
}

impl RuleBook {
    /// Creates a book whose fallback returns the member's default value.
    #[must_use]
    pub fn new() -> Self {
        Self::with_fallback_behavior(RuleBehavior::return_default())
    }

    /// Creates a book with a user-configured fallback behavior.
    #[must_use]
    pub fn with_fallback_behavior(behavior: RuleBehavior) -> Self {
        Self {
            rules: RwLock::new(Vec::new()),
            fallback: Arc::new(CallRule::catch_all(behavior)),
        }
    }

    /// Appends a rule, giving it the highest precedence. The addition is
    /// immediately visible to invocations on any thread.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::EngineStatePoisoned`] if the book lock was
    /// poisoned.
    pub fn add(&self, rule: CallRule) -> Result<Arc<CallRule>, ConfigurationError> {
        let rule = Arc::new(rule);
        let mut rules = self
            .rules
            .write()
            .map_err(|_| ConfigurationError::EngineStatePoisoned)?;
        rules.push(Arc::clone(&rule));
        debug!(rule = %rule, position = rules.len(), "rule added");
        Ok(rule)
    }

    /// Selects the single rule governing `call` and consumes one use of it.
    ///
    /// Per-rule applicability is checked in fixed order: remaining uses,
    /// member match, arguments predicate. The first applicable rule in
    /// precedence order wins; a rule whose final use is consumed by a
    /// concurrent invocation between the match and the decrement is treated
    /// as exhausted and the scan continues. When no configured rule applies
    /// the fallback governs the call.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::EngineStatePoisoned`] if the book lock was
    /// poisoned. Selection itself cannot fail.
    pub fn select_and_consume(
        &self,
        call: &PendingCall,
    ) -> Result<Arc<CallRule>, ConfigurationError> {
        let rules = self
            .rules
            .read()
            .map_err(|_| ConfigurationError::EngineStatePoisoned)?;
        for (position, rule) in rules.iter().enumerate().rev() {
            if rule.is_exhausted() {
                trace!(position, "rule exhausted, skipped");
                continue;
            }
            if !rule.matches(call) {
                continue;
            }
            if rule.try_consume() {
                debug!(
                    member = %call.member(),
                    position,
                    remaining = ?rule.remaining_uses(),
                    "rule selected"
                );
                return Ok(Arc::clone(rule));
            }
            trace!(position, "lost race for final use, skipped");
        }
        debug!(member = %call.member(), "no configured rule applies, fallback selected");
        Ok(Arc::clone(&self.fallback))
    }

    /// Snapshots all rules in precedence order (highest first), with the
    /// fallback last. Exhausted rules are included for diagnostics.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::EngineStatePoisoned`] if the book lock was
    /// poisoned.
    pub fn rules(&self) -> Result<Vec<Arc<CallRule>>, ConfigurationError> {
        let rules = self
            .rules
            .read()
            .map_err(|_| ConfigurationError::EngineStatePoisoned)?;
        let mut snapshot: Vec<Arc<CallRule>> = rules.iter().rev().cloned().collect();
        snapshot.push(Arc::clone(&self.fallback));
        Ok(snapshot)
    }

    /// The always-present catch-all rule.
    #[must_use]
    pub fn fallback(&self) -> &Arc<CallRule> {
        &self.fallback
    }

    /// Number of configured rules, excluding the fallback.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::EngineStatePoisoned`] if the book lock was
    /// poisoned.
    pub fn len(&self) -> Result<usize, ConfigurationError> {
        let rules = self
            .rules
            .read()
            .map_err(|_| ConfigurationError::EngineStatePoisoned)?;
        Ok(rules.len())
    }

    /// Returns `true` when no rule has been configured.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::EngineStatePoisoned`] if the book lock was
    /// poisoned.
    pub fn is_empty(&self) -> Result<bool, ConfigurationError> {
        Ok(self.len()? == 0)
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::new()
    }
}
