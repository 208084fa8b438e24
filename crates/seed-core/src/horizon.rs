//! The rolling time window all generated timestamps must fall in.

use chrono::{DateTime, Duration, Utc};

/// Default horizon length in days.
pub const DEFAULT_HORIZON_DAYS: i64 = 90;

/// A rolling generation window ending at a fixed instant ("now" for a real
/// run, any instant for reproducible tests).
///
/// Day offsets are counted from [`Horizon::start`], so offset 0 is the
/// oldest eligible day and offset [`Horizon::days`] is the end of the
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    end: DateTime<Utc>,
    days: i64,
}

impl Horizon {
    /// A horizon of [`DEFAULT_HORIZON_DAYS`] days ending at the current time.
    pub fn ending_now() -> Self {
        Self::ending_at(Utc::now())
    }

    /// A horizon of [`DEFAULT_HORIZON_DAYS`] days ending at `end`.
    pub fn ending_at(end: DateTime<Utc>) -> Self {
        Self {
            end,
            days: DEFAULT_HORIZON_DAYS,
        }
    }

    /// Length of the window in days.
    pub fn days(&self) -> i64 {
        self.days
    }

    /// Oldest instant inside the window.
    pub fn start(&self) -> DateTime<Utc> {
        self.end - Duration::days(self.days)
    }

    /// Newest instant inside the window.
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// The instant `offset` whole days after [`Horizon::start`].
    pub fn day(&self, offset: i64) -> DateTime<Utc> {
        self.start() + Duration::days(offset)
    }

    /// The instant `age_days` before the end of the window. Parents must
    /// have been created before this cutoff to satisfy a minimum-age policy.
    pub fn age_cutoff(&self, age_days: i64) -> DateTime<Utc> {
        self.end - Duration::days(age_days)
    }

    /// Whether `at` falls inside the window (inclusive on both ends).
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start() && at <= self.end
    }

    /// Pull `at` back to the end of the window if it overshot. Time-of-day
    /// re-randomization on the last day can land minutes past "now".
    pub fn clamp_end(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        if at > self.end {
            self.end
        } else {
            at
        }
    }
}
