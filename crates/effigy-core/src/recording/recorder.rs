//! The append-only call log of one fake instance.
//!
//! Completed invocations are appended in completion order and never
//! mutated, reordered, or truncated; the log lives as long as the fake.
//! Queries snapshot the log, so re-querying without an intervening append
//! yields identical results, and re-querying after more appends yields a
//! superset consistent with earlier results (entries are never renumbered).

use std::sync::{Arc, RwLock};

use tracing::debug;

use super::filter::CallFilter;
use crate::call::CompletedCall;
use crate::error::ConfigurationError;
use crate::matching::ArgumentsPredicate;

/// Append-only, time-ordered log of completed invocations.
#[derive(Debug, Default)]
pub struct CallRecorder {
    calls: RwLock<Vec<Arc<CompletedCall>>>,
}

impl CallRecorder {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a completed invocation, assigning its stable sequence
    /// number. Safe to call during interception, including re-entrantly
    /// completed calls; ordering among concurrent completions is total but
    /// unspecified beyond being a real-time interleaving.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::EngineStatePoisoned`] if the log lock was
    /// poisoned.
    pub fn record(
        &self,
        call: CompletedCall,
    ) -> Result<Arc<CompletedCall>, ConfigurationError> {
        let mut calls = self
            .calls
            .write()
            .map_err(|_| ConfigurationError::EngineStatePoisoned)?;
        let sequence = calls.len() as u64;
        let call = Arc::new(call.with_sequence(sequence));
        calls.push(Arc::clone(&call));
        debug!(call = %call, sequence, "call recorded");
        Ok(call)
    }

    /// Snapshots every recorded call in append order.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::EngineStatePoisoned`] if the log lock was
    /// poisoned.
    pub fn all(&self) -> Result<Vec<Arc<CompletedCall>>, ConfigurationError> {
        let calls = self
            .calls
            .read()
            .map_err(|_| ConfigurationError::EngineStatePoisoned)?;
        Ok(calls.clone())
    }

    /// Snapshots the append-ordered subsequence whose member matches
    /// `filter` and whose arguments satisfy `predicate`.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::EngineStatePoisoned`] if the log lock was
    /// poisoned.
    pub fn matching(
        &self,
        filter: &CallFilter,
        predicate: &ArgumentsPredicate,
    ) -> Result<Vec<Arc<CompletedCall>>, ConfigurationError> {
        let calls = self
            .calls
            .read()
            .map_err(|_| ConfigurationError::EngineStatePoisoned)?;
        Ok(calls
            .iter()
            .filter(|call| filter.matches(call.member()) && predicate.matches(call.arguments()))
            .cloned()
            .collect())
    }

    /// Number of recorded calls matching the filter and predicate.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::EngineStatePoisoned`] if the log lock was
    /// poisoned.
    pub fn count(
        &self,
        filter: &CallFilter,
        predicate: &ArgumentsPredicate,
    ) -> Result<u64, ConfigurationError> {
        Ok(self.matching(filter, predicate)?.len() as u64)
    }

    /// Total number of recorded calls.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::EngineStatePoisoned`] if the log lock was
    /// poisoned.
    pub fn len(&self) -> Result<usize, ConfigurationError> {
        let calls = self
            .calls
            .read()
            .map_err(|_| ConfigurationError::EngineStatePoisoned)?;
        Ok(calls.len())
    }

    /// Returns `true` when nothing has been recorded yet.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::EngineStatePoisoned`] if the log lock was
    /// poisoned.
    pub fn is_empty(&self) -> Result<bool, ConfigurationError> {
        Ok(self.len()? == 0)
    }
}
