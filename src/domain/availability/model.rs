//! Date-range value type and the blocked-range entity

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{DomainError, DomainResult};

/// Closed interval of calendar dates, `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `start > end` as an invalid argument.
    pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        Self::checked(start, end).ok_or_else(|| {
            DomainError::InvalidArgument(format!(
                "start date {} is after end date {}",
                start, end
            ))
        })
    }

    /// Like [`new`](Self::new) but returns `None` for an empty range.
    pub fn checked(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Portion of `self` strictly before `cut`: `[self.start, cut.start - 1]`.
    pub fn left_residual(&self, cut: &DateRange) -> Option<DateRange> {
        if self.start >= cut.start {
            return None;
        }
        let end = cut.start.pred_opt()?.min(self.end);
        DateRange::checked(self.start, end)
    }

    /// Portion of `self` strictly after `cut`: `[cut.end + 1, self.end]`.
    pub fn right_residual(&self, cut: &DateRange) -> Option<DateRange> {
        if self.end <= cut.end {
            return None;
        }
        let start = cut.end.succ_opt()?.max(self.start);
        DateRange::checked(start, self.end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// A persisted period during which a room cannot be booked.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockedRange {
    pub id: i32,
    pub room_id: i32,
    pub range: DateRange,
    pub created_at: DateTime<Utc>,
}

impl BlockedRange {
    pub fn new(id: i32, room_id: i32, range: DateRange) -> Self {
        Self {
            id,
            room_id,
            range,
            created_at: Utc::now(),
        }
    }
}

/// Ephemeral input of a block/unblock call.
#[derive(Debug, Clone)]
pub struct BlockRequest {
    pub room_id: i32,
    pub range: DateRange,
    /// Rate plans of the room; only used to build the sync payload.
    pub rate_plan_codes: Vec<String>,
}

// ── Tests ──────────────────────────────────────────────────────
