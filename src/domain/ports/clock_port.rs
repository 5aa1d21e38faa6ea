//! Port definition for wall-clock time.

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait ClockPort: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}
