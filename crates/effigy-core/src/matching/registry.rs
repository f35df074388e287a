//! Explicit registration of argument predicates per member.
//!
//! The configuration layer can register a factory producing the arguments
//! predicate to use for a given member, replacing attribute/reflection
//! discovery of custom validators with a plain table lookup. Unregistered
//! members fall back to the match-anything predicate.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::predicate::ArgumentsPredicate;
use crate::call::MemberRef;
use crate::error::ConfigurationError;

type PredicateFactory = Arc<dyn Fn() -> ArgumentsPredicate + Send + Sync>;

/// Table mapping member identity to an arguments-predicate factory.
///
/// Registration is internally synchronized and immediately visible to
/// lookups from any thread.
#[derive(Default)]
pub struct ValidatorRegistry {
    factories: RwLock<HashMap<MemberRef, PredicateFactory>>,
}

impl ValidatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the factory for `member`.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::EngineStatePoisoned`] if the table lock was
    /// poisoned.
    pub fn register<F>(&self, member: MemberRef, factory: F) -> Result<(), ConfigurationError>
    where
        F: Fn() -> ArgumentsPredicate + Send + Sync + 'static,
    {
        let mut factories = self
            .factories
            .write()
            .map_err(|_| ConfigurationError::EngineStatePoisoned)?;
        factories.insert(member, Arc::new(factory));
        Ok(())
    }

    /// Produces the registered predicate for `member`, or the
    /// match-anything predicate when none is registered.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::EngineStatePoisoned`] if the table lock was
    /// poisoned.
    pub fn predicate_for(
        &self,
        member: &MemberRef,
    ) -> Result<ArgumentsPredicate, ConfigurationError> {
        let factories = self
            .factories
            .read()
            .map_err(|_| ConfigurationError::EngineStatePoisoned)?;
        Ok(factories
            .get(member)
            .map_or_else(ArgumentsPredicate::any, |factory| factory()))
    }

    /// Number of registered members.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::EngineStatePoisoned`] if the table lock was
    /// poisoned.
    pub fn len(&self) -> Result<usize, ConfigurationError> {
        let factories = self
            .factories
            .read()
            .map_err(|_| ConfigurationError::EngineStatePoisoned)?;
        Ok(factories.len())
    }

    /// Returns `true` when no member is registered.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::EngineStatePoisoned`] if the table lock was
    /// poisoned.
    pub fn is_empty(&self) -> Result<bool, ConfigurationError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::{ArgValue, ArgumentList};
    use crate::matching::validator::ArgumentValidator;

    struct Factory;

    fn member() -> MemberRef {
        MemberRef::method::<Factory>("create")
            .parameter::<String>("name")
            .build()
            .unwrap()
    }

    #[test]
    fn test_unregistered_member_matches_anything() {
        let registry = ValidatorRegistry::new();
        let pred = registry.predicate_for(&member()).unwrap();
        assert!(pred.matches(&ArgumentList::empty()));
    }

    #[test]
    fn test_registered_factory_is_used() {
        let registry = ValidatorRegistry::new();
        registry
            .register(member(), || {
                ArgumentsPredicate::positional(vec![ArgumentValidator::equal_to(
                    "w".to_string(),
                )])
            })
            .unwrap();

        let pred = registry.predicate_for(&member()).unwrap();
        let args =
            ArgumentList::new(["name"], vec![ArgValue::of("w".to_string())]).unwrap();
        let other =
            ArgumentList::new(["name"], vec![ArgValue::of("v".to_string())]).unwrap();
        assert!(pred.matches(&args));
        assert!(!pred.matches(&other));
        assert_eq!(registry.len().unwrap(), 1);
    }

    #[test]
    fn test_reregistration_replaces() {
        let registry = ValidatorRegistry::new();
        registry
            .register(member(), ArgumentsPredicate::any)
            .unwrap();
        registry
            .register(member(), || {
                ArgumentsPredicate::freeform(|_| false, "nothing")
            })
            .unwrap();
        assert_eq!(registry.len().unwrap(), 1);
        let pred = registry.predicate_for(&member()).unwrap();
        assert!(!pred.matches(&ArgumentList::empty()));
    }
}
