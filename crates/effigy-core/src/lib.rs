//! Call-interception and call-matching engine for the effigy test-double
//! framework.
//!
//! When a caller invokes a member on a fake object, this engine decides
//! which single user-configured rule governs the invocation, applies that
//! rule's behavior, and records the completed call for later assertions.
//!
//! # Architecture
//!
//! ```text
//! PendingCall (from the interception boundary)
//!       |
//!       v
//! RuleBook::select_and_consume     most-recent-first scan, fallback last
//!       |
//!       v
//! RuleBehavior::apply              return / compute / raise / call base
//!       |
//!       v
//! CallRecorder::record             append-only completion log
//!       |
//!       v
//! assert_repeated / assert_sequence
//! ```
//!
//! The engine is a library surface: proxy generation, expression-to-member
//! resolution, and container wiring are collaborators that produce the
//! [`call::PendingCall`] values this crate consumes and consume the
//! [`call::CallOutcome`] values it returns.
//!
//! # Concurrency
//!
//! Fake instances may be invoked from multiple threads. Rule selection and
//! use-counter consumption form one atomic unit per rule; rule addition and
//! call recording are internally synchronized; nothing blocks beyond lock
//! acquisition and nothing performs I/O.
//!
//! # Example
//!
//! ```rust
//! use effigy_core::assertion::{assert_repeated, RepeatConstraint};
//! use effigy_core::call::{ArgValue, ArgumentList, CallOutcome, MemberRef};
//! use effigy_core::engine::FakeEngine;
//! use effigy_core::matching::{ArgumentsPredicate, ArgumentValidator};
//! use effigy_core::recording::CallFilter;
//! use effigy_core::rules::{CallRule, RuleBehavior};
//!
//! struct Factory;
//! struct Widget;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = FakeEngine::new("Faked Factory");
//! let create = MemberRef::method::<Factory>("create")
//!     .parameter::<String>("name")
//!     .returning::<Widget>()
//!     .build()?;
//!
//! // configure: create("gear") returns a canned id
//! engine.rule_book().add(
//!     CallRule::for_member(create.clone())
//!         .with_arguments(ArgumentsPredicate::positional_for(
//!             &create,
//!             vec![ArgumentValidator::equal_to("gear".to_string())],
//!         )?)
//!         .with_behavior(RuleBehavior::returns(7u32))
//!         .build()?,
//! )?;
//!
//! // invoke
//! let args = ArgumentList::for_member(&create, vec![ArgValue::of("gear".to_string())])?;
//! let outcome = engine.process(engine.begin_call(create.clone(), args))?;
//! assert_eq!(outcome, CallOutcome::Returned(ArgValue::of(7u32)));
//!
//! // assert
//! assert_repeated(
//!     engine.recorder(),
//!     "Factory.create(\"gear\")",
//!     &CallFilter::Exact(create),
//!     &ArgumentsPredicate::any(),
//!     &RepeatConstraint::once(),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod assertion;
pub mod call;
pub mod engine;
mod error;
pub mod matching;
pub mod recording;
pub mod rules;

pub use assertion::{
    assert_repeated, assert_sequence, AssertionError, AssertionReport, ExpectationFailure,
    RepeatConstraint, SequenceStep,
};
pub use call::{
    ArgValue, ArgumentList, CallOutcome, CompletedCall, FakeHandle, FaultInfo, MemberKind,
    MemberRef, PendingCall, TypeToken,
};
pub use engine::FakeEngine;
pub use error::ConfigurationError;
pub use matching::{ArgumentValidator, ArgumentsPredicate, ValidatorRegistry};
pub use recording::{CallFilter, CallRecorder};
pub use rules::{CallRule, MemberMatcher, RuleBehavior, RuleBook};
