//! Thin orchestration over the repository: input validation and timestamp
//! assignment, nothing else. Error kinds pass through unchanged.

mod class;
mod document;

pub use class::ClassService;
pub use document::DocumentService;

use chrono::{DateTime, SubsecRound, Utc};

/// Current time truncated to microseconds, the precision the storage layer
/// round-trips.
fn now_micros() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
