//! Call-history recording: the per-instance append-only log and the member
//! filters used to query it.

mod filter;
mod recorder;

pub use filter::CallFilter;
pub use recorder::CallRecorder;
