//! The invocation data model: type identity, member references, dynamic
//! argument values, and pending/completed calls.
//!
//! Everything in this module is produced at the interception boundary (or by
//! the configuration layer from resolved call expressions) and consumed by
//! the matching, recording, and assertion machinery.

mod arguments;
mod invocation;
mod member;
mod type_token;

pub use arguments::{ArgValue, ArgumentList, MAX_RENDERED_LEN, NULL_RENDERING};
pub use invocation::{CallOutcome, CompletedCall, FakeHandle, FaultInfo, PendingCall};
pub use member::{MemberKind, MemberRef, MemberRefBuilder, Parameter, MAX_PARAMETERS};
pub use type_token::TypeToken;
