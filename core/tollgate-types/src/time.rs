//! Day arithmetic shared by the service crates.

use chrono::{DateTime, Utc};

/// Whole days from `now` until `end`, rounded up, never negative.
///
/// A window that closes one second from now still counts as one day; a
/// closed window counts as zero.
#[must_use]
pub fn days_remaining_ceil(now: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let secs = (end - now).num_seconds();
    if secs <= 0 {
        0
    } else {
        (secs + 86_399) / 86_400
    }
}
