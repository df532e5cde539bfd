//! Schedule computation engine.
//!
//! Pure integer arithmetic over already-fetched snapshots. No I/O, no clock
//! reads: `now` is always passed in.

mod inputs;
mod result;
mod schedule;

pub use inputs::{ScheduleInputs, DEFAULT_FALLBACK_COMMUTE_MINUTES};
pub use result::{Breakdown, ScheduleResult};
pub use schedule::{compute_schedule, estimate, ProvisionalEstimate};
