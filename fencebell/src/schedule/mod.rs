//! Arrival time-of-day windows.
//!
//! Decides whether a wall-clock time falls within a configured number of
//! minutes of a record's daily arrival time. The comparison is symmetric
//! (arrival ± window) and truncates both sides to whole seconds.
//!
//! # Midnight
//!
//! The window does not wrap across midnight: 23:59 and 00:01 measure as
//! nearly a full day apart, not two minutes. Arrival times are daily
//! recurring targets and the date component of "now" is discarded before
//! the comparison.

use chrono::{NaiveTime, Timelike};

/// Default alert window in minutes when no configuration is present.
pub const DEFAULT_WINDOW_MINUTES: u32 = 10;

/// Check whether `now` is within `window_minutes` of `arrival`.
///
/// Both times are reduced to whole seconds since midnight, then compared
/// as an absolute difference. The boundary is inclusive on both sides:
/// exactly `window_minutes` away still qualifies.
///
/// A window of zero qualifies only when the truncated times are equal.
/// Negative windows cannot be expressed; the settings boundary rejects
/// them before values reach this function.
#[inline]
pub fn is_within_window(arrival: NaiveTime, now: NaiveTime, window_minutes: u32) -> bool {
    let arrival_secs = arrival.num_seconds_from_midnight();
    let now_secs = now.num_seconds_from_midnight();

    arrival_secs.abs_diff(now_secs) <= window_minutes.saturating_mul(60)
}

/// A validated alert window around a daily arrival time.
///
/// Wraps the minute count so the evaluator carries one copy of the
/// configured tolerance instead of threading a bare integer around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertWindow {
    minutes: u32,
}

impl AlertWindow {
    /// Create a window spanning the given number of minutes on each side.
    pub fn from_minutes(minutes: u32) -> Self {
        Self { minutes }
    }

    /// Window size in minutes.
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Check whether `now` qualifies against `arrival` under this window.
    pub fn contains(&self, arrival: NaiveTime, now: NaiveTime) -> bool {
        is_within_window(arrival, now, self.minutes)
    }
}

impl Default for AlertWindow {
    fn default() -> Self {
        Self {
            minutes: DEFAULT_WINDOW_MINUTES,
        }
    }
}
