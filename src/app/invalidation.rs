//! Day-rollover invalidation policy
//!
//! Category identifiers and cluster content are only meaningful within one news
//! cycle, so cached data is discarded whenever a new index belongs to a
//! different calendar day (local time) than the last stored one. Freshness is
//! always derived from timestamps and never persisted.

use chrono::{Local, NaiveDate, TimeZone};

/// Whether cached data may be mixed with a newly fetched index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Same news day; keep the cache
    Fresh,
    /// Different news day; wipe before persisting new data
    Stale,
}

impl Freshness {
    /// Assess cached data last synced at `last` against an index published at `new`
    pub fn assess(last: Option<i64>, new: i64) -> Self {
        if should_invalidate(last, new) {
            Freshness::Stale
        } else {
            Freshness::Fresh
        }
    }

    /// Assess cached data against the current time
    pub fn as_of_now(last: Option<i64>) -> Self {
        Self::assess(last, chrono::Utc::now().timestamp())
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Freshness::Stale)
    }
}

/// True when `new` falls on a different local calendar day than `last`
///
/// Without a previous sync there is nothing to invalidate.
pub fn should_invalidate(last: Option<i64>, new: i64) -> bool {
    should_invalidate_in(&Local, last, new)
}

/// [`should_invalidate`] evaluated in an explicit time zone
///
/// A timestamp that cannot be placed on a calendar day in `tz` counts as a
/// different day.
pub fn should_invalidate_in<Tz: TimeZone>(tz: &Tz, last: Option<i64>, new: i64) -> bool {
    let Some(last) = last else {
        return false;
    };

    match (calendar_day(tz, last), calendar_day(tz, new)) {
        (Some(previous), Some(current)) => previous != current,
        _ => true,
    }
}

fn calendar_day<Tz: TimeZone>(tz: &Tz, timestamp: i64) -> Option<NaiveDate> {
    tz.timestamp_opt(timestamp, 0)
        .earliest()
        .map(|dt| dt.date_naive())
}
