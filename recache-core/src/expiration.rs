//! Expiration values and their conversion to absolute instants.
//!
//! Expiration can be supplied in several shapes (relative seconds, a
//! duration, an absolute instant, an HTTP-date string) plus two sentinels
//! that overload the numeric range: `0` means "do not cache" and `-1`
//! means "never expire". All stored instants are UTC.

use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;
use tracing::warn;

/// Numeric sentinel disabling caching entirely.
pub const DO_NOT_CACHE: i64 = 0;
/// Numeric sentinel disabling expiration.
pub const NEVER_EXPIRE: i64 = -1;

/// An expiration time in any of the supported shapes.
///
/// `Seconds(0)` and a zero [`Duration`] compare numerically equal to
/// [`Expiration::DoNotCache`], and `Seconds(-1)` to
/// [`Expiration::NeverExpire`]; the named variants exist so call sites
/// can state intent without magic numbers.
#[derive(Clone, Debug, PartialEq)]
pub enum Expiration {
    /// Never store the entry (sentinel `0`).
    DoNotCache,
    /// Store the entry without expiration (sentinel `-1`).
    NeverExpire,
    /// Relative time in seconds from now.
    Seconds(i64),
    /// Relative duration from now.
    Duration(Duration),
    /// Absolute UTC instant.
    At(DateTime<Utc>),
    /// An HTTP-date (RFC 2822 style) string, parsed lazily.
    HttpDate(String),
}

impl Expiration {
    /// Whether this value numerically equals the do-not-cache sentinel.
    ///
    /// Unparseable shapes (dates, strings) are treated as "not zero".
    pub fn is_do_not_cache(&self) -> bool {
        match self {
            Expiration::DoNotCache => true,
            Expiration::Seconds(secs) => *secs == DO_NOT_CACHE,
            Expiration::Duration(duration) => duration.is_zero(),
            _ => false,
        }
    }

    /// Whether this value numerically equals the never-expire sentinel.
    pub fn is_never_expire(&self) -> bool {
        match self {
            Expiration::NeverExpire => true,
            Expiration::Seconds(secs) => *secs == NEVER_EXPIRE,
            _ => false,
        }
    }
}

impl From<i64> for Expiration {
    fn from(seconds: i64) -> Self {
        Expiration::Seconds(seconds)
    }
}

impl From<Duration> for Expiration {
    fn from(duration: Duration) -> Self {
        Expiration::Duration(duration)
    }
}

impl From<DateTime<Utc>> for Expiration {
    fn from(instant: DateTime<Utc>) -> Self {
        Expiration::At(instant)
    }
}

impl From<&str> for Expiration {
    fn from(value: &str) -> Self {
        Expiration::HttpDate(value.to_owned())
    }
}

/// Convert an expiration value in any supported shape to an absolute
/// UTC instant.
///
/// `None` and the never-expire sentinel yield `None` (no expiration).
/// The do-not-cache sentinel yields the current instant (immediate
/// expiry). Unparseable HTTP-date strings yield `None` and are logged.
pub fn get_expiration_datetime(expire_after: Option<&Expiration>) -> Option<DateTime<Utc>> {
    let expire_after = expire_after?;
    if expire_after.is_never_expire() {
        return None;
    }
    if expire_after.is_do_not_cache() {
        return Some(Utc::now());
    }
    match expire_after {
        Expiration::HttpDate(value) => parse_http_date(value),
        Expiration::At(instant) => Some(*instant),
        // Values too large to represent as an instant never expire.
        Expiration::Seconds(seconds) => seconds
            .checked_mul(1000)
            .map(TimeDelta::milliseconds)
            .and_then(|delta| Utc::now().checked_add_signed(delta)),
        Expiration::Duration(duration) => TimeDelta::from_std(*duration)
            .ok()
            .and_then(|delta| Utc::now().checked_add_signed(delta)),
        // Sentinels handled above
        Expiration::DoNotCache | Expiration::NeverExpire => None,
    }
}

/// Convert an expiration value to the number of whole seconds remaining,
/// rounding up. Returns [`NEVER_EXPIRE`] when there is no expiration.
pub fn get_expiration_seconds(expire_after: Option<&Expiration>) -> i64 {
    match get_expiration_datetime(expire_after) {
        Some(expires) => {
            let millis = (expires - Utc::now()).num_milliseconds();
            millis.div_euclid(1000) + i64::from(millis.rem_euclid(1000) > 0)
        }
        None => NEVER_EXPIRE,
    }
}

/// Attempt to parse an HTTP (RFC 2822 compatible) timestamp.
///
/// The weekday name is optional in RFC 2822 and servers sometimes send
/// one that does not match the date; a mismatched weekday is ignored
/// rather than rejecting the whole timestamp.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc2822(value).or_else(|error| match value.split_once(',') {
        Some((_, rest)) => DateTime::parse_from_rfc2822(rest.trim()),
        None => Err(error),
    });
    match parsed {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(_) => {
            warn!(timestamp = value, "failed to parse timestamp");
            None
        }
    }
}
