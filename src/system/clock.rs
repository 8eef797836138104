//! Wall-clock time keeping for the watch face
//!
//! The engine only sees the monotonic [`Instant`] clock. The host
//! provides a wall-clock reference (from its RTC, a time service, or the
//! companion link) plus the local UTC offset, and [`WallClock`]
//! interpolates between updates.

use chrono::{DateTime, NaiveDateTime};
use embassy_time::Instant;

/// Wall-clock reference point
pub struct TimeReference {
    /// Clock time
    time: NaiveDateTime,
    /// Related system time
    instant: Instant,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            time: NaiveDateTime::UNIX_EPOCH,
            instant: Instant::from_ticks(0),
        }
    }
}

impl TimeReference {
    /// Create new time reference from NaiveDateTime
    pub fn from_datetime(time: NaiveDateTime) -> Self {
        Self {
            time,
            instant: Instant::now(),
        }
    }
}

/// Wall clock derived from a host-provided reference
pub struct WallClock {
    reference: TimeReference,
    /// Offset of local time from the reference, in seconds
    offset_seconds: i32,
}

impl WallClock {
    /// Create a clock with no reference yet; reads start at the Unix
    /// epoch until the host supplies one.
    pub fn new() -> Self {
        Self {
            reference: TimeReference::default(),
            offset_seconds: 0,
        }
    }

    /// Update time reference
    pub fn set_reference(&mut self, reference: TimeReference) {
        self.reference = reference;
    }

    /// Set the local UTC offset in seconds
    pub fn set_offset(&mut self, offset_seconds: i32) {
        self.offset_seconds = offset_seconds;
    }

    /// Current local time
    pub fn now(&self) -> NaiveDateTime {
        self.at(Instant::now())
    }

    /// Local time at the given instant
    pub fn at(&self, instant: Instant) -> NaiveDateTime {
        let elapsed_ms = instant.duration_since(self.reference.instant).as_millis() as i64;
        let millis = self.reference.time.and_utc().timestamp_millis()
            + self.offset_seconds as i64 * 1_000
            + elapsed_ms;
        DateTime::from_timestamp_millis(millis)
            .map(|t| t.naive_utc())
            .unwrap_or(NaiveDateTime::UNIX_EPOCH)
    }

    /// Milliseconds since the Unix epoch at local time, saturated at zero
    /// for pre-epoch references
    pub fn epoch_ms(&self) -> u64 {
        self.now().and_utc().timestamp_millis().max(0) as u64
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}
