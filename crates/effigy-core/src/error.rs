//! Configuration-time error taxonomy.
//!
//! Configuration errors are raised before any invocation occurs, when a rule
//! or member description is self-contradictory or malformed. They are always
//! surfaced immediately and never retried. Assertion failures are a separate
//! taxon ([`ExpectationFailure`](crate::assertion::ExpectationFailure)) and
//! carry their own diagnostic report.
//!
//! Matching ambiguity is deliberately absent from this taxonomy: when two
//! configured rules both apply to an invocation, precedence order resolves
//! the choice silently (see
//! [`RuleBook::select_and_consume`](crate::rules::RuleBook::select_and_consume)).

use thiserror::Error;

/// Errors raised while configuring rules, members, or argument predicates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// A positional arguments predicate was built with a validator count that
    /// does not match the member's declared parameter count.
    #[error(
        "validator count {validators} does not match parameter count {parameters} for {member}"
    )]
    ValidatorCountMismatch {
        /// Rendered name of the member the predicate was built for.
        member: String,
        /// Number of validators supplied.
        validators: usize,
        /// Number of parameters the member declares.
        parameters: usize,
    },

    /// A rule was configured with an explicit remaining-use count of zero.
    ///
    /// Exhaustion to zero through use is normal; configuring a rule that can
    /// never apply is rejected up front.
    #[error("rule for {member} configured with zero remaining uses")]
    ZeroUseRule {
        /// Rendered description of the rule's member matcher.
        member: String,
    },

    /// A repeat constraint range has a lower bound above its upper bound.
    #[error("repeat range is empty: lower bound {lower} exceeds upper bound {upper}")]
    InvalidRepeatRange {
        /// The lower bound supplied.
        lower: u64,
        /// The upper bound supplied.
        upper: u64,
    },

    /// An argument list was built with a name count that does not match its
    /// value count.
    #[error("argument list has {names} parameter names but {values} values")]
    ArgumentArityMismatch {
        /// Number of parameter names supplied.
        names: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// A member was declared with more parameters than the engine supports.
    #[error("member declares {count} parameters, maximum is {max}")]
    TooManyParameters {
        /// Number of parameters declared.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// A member was declared with two parameters of the same name.
    #[error("duplicate parameter name '{name}'")]
    DuplicateParameter {
        /// The repeated name.
        name: String,
    },

    /// A member was declared with an empty name.
    #[error("member name must not be empty")]
    EmptyMemberName,

    /// A lock guarding engine state was poisoned by a panicking writer.
    ///
    /// This indicates a bug in the calling test, not in the engine; it is
    /// surfaced rather than silently ignored.
    #[error("engine state lock poisoned")]
    EngineStatePoisoned,
}
