//! Call rules: matching conditions bound to behaviors, and the ordered
//! rule book that selects the single rule governing each invocation.

mod behavior;
mod book;
mod rule;

pub use behavior::RuleBehavior;
pub use book::RuleBook;
pub use rule::{CallRule, CallRuleBuilder, MemberMatcher};
