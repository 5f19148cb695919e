// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, ScheduleWeek};
use time::macros::date;

#[test]
fn test_from_monday_accepts_monday() {
    let week = ScheduleWeek::from_monday(date!(2025 - 06 - 02)).unwrap();
    assert_eq!(week.week_start(), date!(2025 - 06 - 02));
}

#[test]
fn test_from_monday_rejects_other_weekdays() {
    let result = ScheduleWeek::from_monday(date!(2025 - 06 - 04));
    assert!(matches!(
        result,
        Err(DomainError::InvalidWeekStart { .. })
    ));
}

#[test]
fn test_starting_snaps_back_to_monday() {
    // Thursday → Monday of the same week
    let week = ScheduleWeek::starting(date!(2025 - 06 - 05));
    assert_eq!(week.week_start(), date!(2025 - 06 - 02));

    // Sunday belongs to the week started six days earlier
    let week = ScheduleWeek::starting(date!(2025 - 06 - 08));
    assert_eq!(week.week_start(), date!(2025 - 06 - 02));

    // Monday maps to itself
    let week = ScheduleWeek::starting(date!(2025 - 06 - 02));
    assert_eq!(week.week_start(), date!(2025 - 06 - 02));
}

#[test]
fn test_contains_covers_exactly_seven_days() {
    let week = ScheduleWeek::from_monday(date!(2025 - 06 - 02)).unwrap();
    assert!(week.contains(date!(2025 - 06 - 02)));
    assert!(week.contains(date!(2025 - 06 - 08)));
    assert!(!week.contains(date!(2025 - 06 - 01)));
    assert!(!week.contains(date!(2025 - 06 - 09)));
}

#[test]
fn test_duty_nights_are_tuesday_and_thursday() {
    let week = ScheduleWeek::from_monday(date!(2025 - 06 - 02)).unwrap();
    assert_eq!(
        week.duty_nights(),
        [date!(2025 - 06 - 03), date!(2025 - 06 - 05)]
    );
    assert!(week.is_duty_night(date!(2025 - 06 - 03)));
    assert!(week.is_duty_night(date!(2025 - 06 - 05)));
    assert!(!week.is_duty_night(date!(2025 - 06 - 04)));
}

#[test]
fn test_validate_night_rejects_dates_outside_week() {
    let week = ScheduleWeek::from_monday(date!(2025 - 06 - 02)).unwrap();
    // A Tuesday, but the following week's
    let result = week.validate_night(date!(2025 - 06 - 10));
    assert!(matches!(
        result,
        Err(DomainError::NightOutsideWeek { .. })
    ));
}

#[test]
fn test_validate_night_rejects_non_duty_weekdays() {
    let week = ScheduleWeek::from_monday(date!(2025 - 06 - 02)).unwrap();
    let result = week.validate_night(date!(2025 - 06 - 04));
    assert!(matches!(result, Err(DomainError::NotADutyNight { .. })));
}

#[test]
fn test_validate_night_accepts_duty_nights() {
    let week = ScheduleWeek::from_monday(date!(2025 - 06 - 02)).unwrap();
    assert!(week.validate_night(date!(2025 - 06 - 03)).is_ok());
    assert!(week.validate_night(date!(2025 - 06 - 05)).is_ok());
}
