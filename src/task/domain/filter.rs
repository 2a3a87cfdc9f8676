//! Optional filters applied when listing a user's tasks.

use super::{Task, TaskDomainError, TaskStatus};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

/// Expected layout of a calendar-day filter.
const DAY_FORMAT: &str = "%Y-%m-%d";

/// Half-open UTC window `[start, end)` covering one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DayWindow {
    /// Builds the window from midnight UTC of `day` to midnight of the next.
    #[must_use]
    pub fn for_day(day: NaiveDate) -> Self {
        let start = day.and_time(NaiveTime::MIN).and_utc();
        let end = start
            .checked_add_signed(TimeDelta::days(1))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { start, end }
    }

    /// Returns the inclusive lower bound.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the exclusive upper bound.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns `true` when `instant` falls inside the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Filter for listing tasks. Absent fields do not restrict the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    status: Option<TaskStatus>,
    day: Option<NaiveDate>,
}

impl TaskFilter {
    /// Creates a filter that matches every live task.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: None,
            day: None,
        }
    }

    /// Restricts results to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts results to tasks dated within one UTC calendar day.
    #[must_use]
    pub const fn with_day(mut self, day: NaiveDate) -> Self {
        self.day = Some(day);
        self
    }

    /// Returns the status restriction, if any.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the day restriction, if any.
    #[must_use]
    pub const fn day(&self) -> Option<NaiveDate> {
        self.day
    }

    /// Returns the UTC window for the day restriction, if any.
    #[must_use]
    pub fn day_window(&self) -> Option<DayWindow> {
        self.day.map(DayWindow::for_day)
    }

    /// Returns `true` when `task` satisfies every present restriction.
    ///
    /// Soft-deletion and ownership are not considered here; repositories
    /// apply those before the filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let status_matches = self.status.is_none_or(|status| task.status() == status);
        let day_matches = self
            .day_window()
            .is_none_or(|window| task.date().is_some_and(|at| window.contains(at)));
        status_matches && day_matches
    }
}

/// Parses a `YYYY-MM-DD` calendar day.
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidDateFilter`] when the value is not a
/// zero-padded ISO calendar date.
pub fn parse_day(raw: &str) -> Result<NaiveDate, TaskDomainError> {
    let is_padded = raw.len() == 10
        && raw.char_indices().all(|(index, ch)| match index {
            4 | 7 => ch == '-',
            _ => ch.is_ascii_digit(),
        });
    if !is_padded {
        return Err(TaskDomainError::InvalidDateFilter(raw.to_owned()));
    }

    NaiveDate::parse_from_str(raw, DAY_FORMAT)
        .map_err(|_| TaskDomainError::InvalidDateFilter(raw.to_owned()))
}
