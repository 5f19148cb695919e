// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::ScheduleStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Duty role code is empty or invalid.
    InvalidDutyRoleCode(String),
    /// Position code is empty or invalid.
    InvalidPositionCode(String),
    /// Position name is empty or invalid.
    InvalidPositionName(String),
    /// Position capacity must be at least 1.
    InvalidMaxSlots {
        /// The invalid capacity value.
        max_slots: u32,
    },
    /// Duty role does not exist.
    DutyRoleNotFound(String),
    /// Position does not exist within the duty role.
    PositionNotFound {
        /// The duty role code.
        duty_role: String,
        /// The position code.
        position: String,
    },
    /// Duty role already exists.
    DuplicateDutyRole(String),
    /// Position already exists within the duty role.
    DuplicatePosition {
        /// The duty role code.
        duty_role: String,
        /// The position code.
        position: String,
    },
    /// Schedule status string is not recognized.
    InvalidScheduleStatus(String),
    /// Assignment status string is not recognized.
    InvalidAssignmentStatus(String),
    /// Override type string is not recognized.
    InvalidOverrideType(String),
    /// Week start date must be a Monday.
    InvalidWeekStart {
        /// The invalid week start date.
        week_start: time::Date,
        /// The actual weekday.
        weekday: time::Weekday,
    },
    /// Night date falls outside the schedule week.
    NightOutsideWeek {
        /// The night date.
        night_date: time::Date,
        /// The week start date.
        week_start: time::Date,
    },
    /// Night date is not a duty night for the role.
    NotADutyNight {
        /// The night date.
        night_date: time::Date,
        /// The actual weekday.
        weekday: time::Weekday,
    },
    /// Member already holds an assignment in this schedule.
    MemberAlreadyAssigned {
        /// The member identifier.
        member_id: i64,
    },
    /// Position has no open slots left.
    PositionFull {
        /// The position code.
        position: String,
        /// The position capacity.
        max_slots: u32,
    },
    /// Assignment does not exist in this schedule.
    AssignmentNotFound {
        /// The assignment identifier.
        assignment_id: i64,
    },
    /// Override does not exist in this schedule.
    OverrideNotFound {
        /// The override identifier.
        override_id: i64,
    },
    /// Replace/remove override targets a member not in the base roster.
    OverrideTargetNotFound {
        /// The position code.
        position: String,
        /// The targeted base member.
        base_member_id: i64,
    },
    /// An active replace/remove override already exists for this target.
    DuplicateOverride {
        /// The night date.
        night_date: time::Date,
        /// The position code.
        position: String,
        /// The targeted base member.
        base_member_id: i64,
    },
    /// The requested lifecycle transition is not permitted.
    IllegalTransition {
        /// The current schedule status.
        from: ScheduleStatus,
        /// The requested schedule status.
        to: ScheduleStatus,
    },
    /// The mutation is not permitted in the schedule's current status.
    MutationNotAllowed {
        /// The attempted action.
        action: String,
        /// The current schedule status.
        status: ScheduleStatus,
    },
    /// Publish is blocked because required positions are unfilled.
    PublishBlocked {
        /// The required positions with no active assignment.
        missing: Vec<String>,
    },
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Timezone identifier is not recognized.
    InvalidTimezone(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDutyRoleCode(msg) => write!(f, "Invalid duty role code: {msg}"),
            Self::InvalidPositionCode(msg) => write!(f, "Invalid position code: {msg}"),
            Self::InvalidPositionName(msg) => write!(f, "Invalid position name: {msg}"),
            Self::InvalidMaxSlots { max_slots } => {
                write!(
                    f,
                    "Invalid position capacity: {max_slots}. Must be at least 1"
                )
            }
            Self::DutyRoleNotFound(code) => write!(f, "Duty role '{code}' not found"),
            Self::PositionNotFound {
                duty_role,
                position,
            } => {
                write!(
                    f,
                    "Position '{position}' not found in duty role '{duty_role}'"
                )
            }
            Self::DuplicateDutyRole(code) => write!(f, "Duty role '{code}' already exists"),
            Self::DuplicatePosition {
                duty_role,
                position,
            } => {
                write!(
                    f,
                    "Position '{position}' already exists in duty role '{duty_role}'"
                )
            }
            Self::InvalidScheduleStatus(msg) => write!(f, "Invalid schedule status: {msg}"),
            Self::InvalidAssignmentStatus(msg) => {
                write!(f, "Invalid assignment status: {msg}")
            }
            Self::InvalidOverrideType(msg) => write!(f, "Invalid override type: {msg}"),
            Self::InvalidWeekStart {
                week_start,
                weekday,
            } => {
                write!(
                    f,
                    "Week start must be a Monday, but {week_start} is a {weekday}"
                )
            }
            Self::NightOutsideWeek {
                night_date,
                week_start,
            } => {
                write!(
                    f,
                    "Night {night_date} falls outside the week starting {week_start}"
                )
            }
            Self::NotADutyNight {
                night_date,
                weekday,
            } => {
                write!(
                    f,
                    "Night {night_date} is a {weekday}, not a duty night (Tuesday/Thursday)"
                )
            }
            Self::MemberAlreadyAssigned { member_id } => {
                write!(f, "Member {member_id} is already assigned to this schedule")
            }
            Self::PositionFull {
                position,
                max_slots,
            } => {
                write!(f, "Position '{position}' is full (max {max_slots} slots)")
            }
            Self::AssignmentNotFound { assignment_id } => {
                write!(f, "Assignment {assignment_id} not found in this schedule")
            }
            Self::OverrideNotFound { override_id } => {
                write!(f, "Override {override_id} not found in this schedule")
            }
            Self::OverrideTargetNotFound {
                position,
                base_member_id,
            } => {
                write!(
                    f,
                    "Member {base_member_id} has no base assignment for position '{position}'"
                )
            }
            Self::DuplicateOverride {
                night_date,
                position,
                base_member_id,
            } => {
                write!(
                    f,
                    "An override already targets member {base_member_id} at position '{position}' on {night_date}"
                )
            }
            Self::IllegalTransition { from, to } => {
                write!(f, "Cannot transition schedule from {from} to {to}")
            }
            Self::MutationNotAllowed { action, status } => {
                write!(f, "Cannot {action} while the schedule is {status}")
            }
            Self::PublishBlocked { missing } => {
                write!(
                    f,
                    "Cannot publish: required positions unfilled: {}",
                    missing.join(", ")
                )
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
        }
    }
}

impl std::error::Error for DomainError {}
