//! Expiration timestamps.
//!
//! Every input form is reduced to whole seconds since the Unix epoch before
//! it reaches the canonical string.  Fractional seconds are truncated toward
//! zero, never rounded.

use chrono::{DateTime, Utc};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Integer epoch seconds (UTC). Negative values are valid and always expired
/// against present-day clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Expires(i64);

impl Expires {
    /// Wrap a raw epoch-seconds value.
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    /// The expiry `ttl_secs` seconds after `now`.
    pub fn after(now: DateTime<Utc>, ttl_secs: i64) -> Self {
        Self(now.timestamp().saturating_add(ttl_secs))
    }

    /// Epoch seconds.
    pub const fn as_secs(self) -> i64 {
        self.0
    }

    /// True when this expiry lies strictly after `now`.
    ///
    /// `now` is compared at whole-second resolution, so an expiry equal to the
    /// current second counts as expired.
    pub fn is_after(self, now: DateTime<Utc>) -> bool {
        self.0 > now.timestamp()
    }
}

impl fmt::Display for Expires {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Expires {
    fn from(secs: i64) -> Self {
        Self(secs)
    }
}

impl From<i32> for Expires {
    fn from(secs: i32) -> Self {
        Self(i64::from(secs))
    }
}

impl From<u32> for Expires {
    fn from(secs: u32) -> Self {
        Self(i64::from(secs))
    }
}

impl From<f64> for Expires {
    fn from(secs: f64) -> Self {
        // `as` saturates on overflow and maps NaN to 0.
        Self(secs.trunc() as i64)
    }
}

impl From<DateTime<Utc>> for Expires {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at.timestamp())
    }
}

impl From<SystemTime> for Expires {
    fn from(at: SystemTime) -> Self {
        match at.duration_since(UNIX_EPOCH) {
            Ok(d) => Self(i64::try_from(d.as_secs()).unwrap_or(i64::MAX)),
            Err(e) => {
                // Before the epoch: truncate toward zero like the other forms.
                let before = i64::try_from(e.duration().as_secs()).unwrap_or(i64::MAX);
                Self(-before)
            }
        }
    }
}
