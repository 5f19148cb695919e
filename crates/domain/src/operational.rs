// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operational date calculations.
//!
//! The operational day runs from 3 a.m. to 3 a.m. in the unit's timezone
//! instead of midnight to midnight, so a duty night running past midnight
//! still counts as the previous day's operations.
//!
//! ## Invariants
//!
//! - Before the rollover hour, the operational date is the previous calendar
//!   day in the configured timezone.
//! - The operational week always starts on a Monday.
//! - Duty Watch nights are operational Tuesdays and Thursdays.

use crate::error::DomainError;
use crate::week::{DUTY_NIGHT_WEEKDAYS, ScheduleWeek};
use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;
use time::{Date, Month};

/// The default timezone for operational date calculations.
pub const DEFAULT_TIMEZONE: &str = "America/Winnipeg";

/// The hour at which a new operational day begins (3 a.m.).
pub const OPERATIONAL_DAY_START_HOUR: u32 = 3;

/// Configuration for operational date calculations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationalConfig {
    /// IANA timezone identifier.
    pub timezone: String,
    /// Local hour at which the operational day rolls over.
    pub day_start_hour: u32,
}

impl Default for OperationalConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            day_start_hour: OPERATIONAL_DAY_START_HOUR,
        }
    }
}

/// Calculates the operational date for a UTC timestamp.
///
/// If the local time is before the rollover hour, the operational date is
/// the previous calendar day.
///
/// # Errors
///
/// Returns an error if:
/// - The configured timezone is invalid
/// - The resulting date cannot be represented
pub fn operational_date(
    timestamp: DateTime<Utc>,
    config: &OperationalConfig,
) -> Result<Date, DomainError> {
    let tz: Tz = config
        .timezone
        .parse()
        .map_err(|_| DomainError::InvalidTimezone(config.timezone.clone()))?;

    let local = timestamp.with_timezone(&tz);
    let local_date = if local.hour() < config.day_start_hour {
        local.date_naive().pred_opt().ok_or_else(|| {
            DomainError::DateParseError {
                date_string: local.date_naive().to_string(),
                error: String::from("date underflow computing operational date"),
            }
        })?
    } else {
        local.date_naive()
    };

    to_time_date(local_date)
}

/// Calculates the operational week containing a UTC timestamp.
///
/// # Errors
///
/// Returns an error if the operational date cannot be calculated.
pub fn operational_week(
    timestamp: DateTime<Utc>,
    config: &OperationalConfig,
) -> Result<ScheduleWeek, DomainError> {
    let date = operational_date(timestamp, config)?;
    Ok(ScheduleWeek::starting(date))
}

/// Returns whether a date is a Duty Watch night (Tuesday or Thursday).
#[must_use]
pub fn is_duty_watch_night(date: Date) -> bool {
    DUTY_NIGHT_WEEKDAYS.contains(&date.weekday())
}

/// Converts a chrono naive date to a `time::Date`.
fn to_time_date(date: chrono::NaiveDate) -> Result<Date, DomainError> {
    let month = Month::try_from(u8::try_from(date.month()).unwrap_or(0)).map_err(|e| {
        DomainError::DateParseError {
            date_string: date.to_string(),
            error: e.to_string(),
        }
    })?;
    Date::from_calendar_date(date.year(), month, u8::try_from(date.day()).unwrap_or(0)).map_err(
        |e| DomainError::DateParseError {
            date_string: date.to_string(),
            error: e.to_string(),
        },
    )
}

/// Parses an ISO 8601 date string (YYYY-MM-DD).
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_iso_date(date_string: &str) -> Result<Date, DomainError> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    Date::parse(date_string, &format).map_err(|e| DomainError::DateParseError {
        date_string: date_string.to_string(),
        error: e.to_string(),
    })
}
