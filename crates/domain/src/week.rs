// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule week boundaries and duty-night placement.
//!
//! A schedule week always starts on a Monday and covers seven nights.
//! Duty Watch nights are the week's Tuesday and Thursday.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::{Date, Duration, Weekday};

/// The weekdays on which a Duty Watch night occurs.
pub const DUTY_NIGHT_WEEKDAYS: [Weekday; 2] = [Weekday::Tuesday, Weekday::Thursday];

/// A validated schedule week, identified by its Monday start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleWeek {
    /// The Monday this week starts on.
    week_start: Date,
}

impl ScheduleWeek {
    /// Creates a `ScheduleWeek` from a date that must already be a Monday.
    ///
    /// Use this at API boundaries where a non-Monday input indicates a
    /// caller error rather than a date to be adjusted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidWeekStart` if the date is not a Monday.
    pub fn from_monday(week_start: Date) -> Result<Self, DomainError> {
        if week_start.weekday() == Weekday::Monday {
            Ok(Self { week_start })
        } else {
            Err(DomainError::InvalidWeekStart {
                week_start,
                weekday: week_start.weekday(),
            })
        }
    }

    /// Creates the `ScheduleWeek` containing an arbitrary date by snapping
    /// back to that week's Monday.
    #[must_use]
    pub fn starting(date: Date) -> Self {
        let days_from_monday = i64::from(date.weekday().number_days_from_monday());
        Self {
            week_start: date.saturating_sub(Duration::days(days_from_monday)),
        }
    }

    /// Returns the Monday this week starts on.
    #[must_use]
    pub const fn week_start(&self) -> Date {
        self.week_start
    }

    /// Returns the exclusive end of the week (the following Monday).
    #[must_use]
    pub fn week_end(&self) -> Date {
        self.week_start.saturating_add(Duration::days(7))
    }

    /// Returns whether a date falls inside this week.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        date >= self.week_start && date < self.week_end()
    }

    /// Returns the duty nights (Tuesday and Thursday) of this week.
    #[must_use]
    pub fn duty_nights(&self) -> [Date; 2] {
        [
            self.week_start.saturating_add(Duration::days(1)),
            self.week_start.saturating_add(Duration::days(3)),
        ]
    }

    /// Returns whether a date is one of this week's duty nights.
    #[must_use]
    pub fn is_duty_night(&self, date: Date) -> bool {
        self.contains(date) && DUTY_NIGHT_WEEKDAYS.contains(&date.weekday())
    }

    /// Validates that a night date is a duty night within this week.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The date falls outside this week
    /// - The date is not a Tuesday or Thursday
    pub fn validate_night(&self, night_date: Date) -> Result<(), DomainError> {
        if !self.contains(night_date) {
            return Err(DomainError::NightOutsideWeek {
                night_date,
                week_start: self.week_start,
            });
        }
        if !DUTY_NIGHT_WEEKDAYS.contains(&night_date.weekday()) {
            return Err(DomainError::NotADutyNight {
                night_date,
                weekday: night_date.weekday(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for ScheduleWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.week_start)
    }
}
