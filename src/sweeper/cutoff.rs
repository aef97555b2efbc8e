//! Age cutoff: 23:59:59 local time on the calendar day N days before today.
//!
//! Anchoring to 23:59:59 rather than the exact current instant keeps every
//! entry checked during one run on the same boundary, regardless of how far
//! the wall clock advances while the run is in progress.

use std::fmt;
use std::time::SystemTime;

use chrono::{
    DateTime, Days, FixedOffset, LocalResult, NaiveDate, NaiveTime, Offset, SecondsFormat,
    TimeDelta, TimeZone,
};

use crate::sweeper::clock::Clock;

/// Seconds from midnight to 23:59:59.
const END_OF_DAY_SECS: i64 = 86_399;

/// Day counts are clamped to this magnitude before date arithmetic.
pub const MAX_CUTOFF_DAYS: i64 = 1_000_000;

/// Absolute boundary below which an entry counts as old.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoff {
    days: i64,
    at: DateTime<FixedOffset>,
}

impl Cutoff {
    /// Day count this cutoff was derived from.
    #[must_use]
    pub const fn days(&self) -> i64 {
        self.days
    }

    /// The boundary with the local offset it was computed in.
    #[must_use]
    pub const fn at(&self) -> DateTime<FixedOffset> {
        self.at
    }

    #[must_use]
    pub fn instant(&self) -> SystemTime {
        SystemTime::from(self.at)
    }

    /// Strictly earlier than the boundary; equal is not expired.
    #[must_use]
    pub fn is_expired(&self, timestamp: SystemTime) -> bool {
        timestamp < self.instant()
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.at.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

/// Cutoff for `days` relative to the clock's current day.
pub fn compute_cutoff(clock: &dyn Clock, days: i64) -> Cutoff {
    cutoff_at(&clock.now(), days)
}

/// Cutoff for `days` relative to the calendar day containing `now`.
///
/// Days are counted on the local calendar, so a DST change in between never
/// moves the boundary off 23:59:59. Negative `days` yield a boundary in the
/// future.
pub fn cutoff_at<Tz: TimeZone>(now: &DateTime<Tz>, days: i64) -> Cutoff {
    let date = shift_date(now.date_naive(), days.clamp(-MAX_CUTOFF_DAYS, MAX_CUTOFF_DAYS));
    let at = end_of_day(&now.timezone(), date, now.offset().fix());
    Cutoff {
        days,
        at: at.with_timezone(&at.offset().fix()),
    }
}

fn shift_date(today: NaiveDate, days: i64) -> NaiveDate {
    let step = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        today.checked_sub_days(step)
    } else {
        today.checked_add_days(step)
    };
    shifted.unwrap_or(if days >= 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// 23:59:59 local time on `date`.
///
/// A repeated hour resolves to the earlier instant; a skipped one applies
/// `fallback`, the offset in force when the cutoff was requested.
fn end_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate, fallback: FixedOffset) -> DateTime<Tz> {
    let naive = date.and_time(NaiveTime::MIN) + TimeDelta::seconds(END_OF_DAY_SECS);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => {
            let offset = i64::from(fallback.local_minus_utc());
            tz.from_utc_datetime(&(naive - TimeDelta::seconds(offset)))
        }
    }
}
