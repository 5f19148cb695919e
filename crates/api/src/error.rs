// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use duty_roster::CoreError;
use duty_roster_domain::DomainError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidDutyRoleCode(msg) => ApiError::InvalidInput {
            field: String::from("duty_role"),
            message: msg,
        },
        DomainError::InvalidPositionCode(msg) => ApiError::InvalidInput {
            field: String::from("position"),
            message: msg,
        },
        DomainError::InvalidPositionName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidMaxSlots { max_slots } => ApiError::InvalidInput {
            field: String::from("max_slots"),
            message: format!("Invalid position capacity: {max_slots}. Must be at least 1"),
        },
        DomainError::DutyRoleNotFound(code) => ApiError::ResourceNotFound {
            resource_type: String::from("Duty role"),
            message: format!("Duty role '{code}' does not exist"),
        },
        DomainError::PositionNotFound {
            duty_role,
            position,
        } => ApiError::ResourceNotFound {
            resource_type: String::from("Position"),
            message: format!("Position '{position}' does not exist in duty role '{duty_role}'"),
        },
        DomainError::DuplicateDutyRole(code) => ApiError::DomainRuleViolation {
            rule: String::from("unique_duty_role"),
            message: format!("Duty role '{code}' already exists"),
        },
        DomainError::DuplicatePosition {
            duty_role,
            position,
        } => ApiError::DomainRuleViolation {
            rule: String::from("unique_position"),
            message: format!("Position '{position}' already exists in duty role '{duty_role}'"),
        },
        DomainError::InvalidScheduleStatus(msg) => ApiError::InvalidInput {
            field: String::from("status"),
            message: msg,
        },
        DomainError::InvalidAssignmentStatus(msg) => ApiError::InvalidInput {
            field: String::from("status"),
            message: msg,
        },
        DomainError::InvalidOverrideType(msg) => ApiError::InvalidInput {
            field: String::from("override_type"),
            message: msg,
        },
        DomainError::InvalidWeekStart {
            week_start,
            weekday,
        } => ApiError::InvalidInput {
            field: String::from("week_start"),
            message: format!("Week start must be a Monday, but {week_start} is a {weekday}"),
        },
        DomainError::NightOutsideWeek {
            night_date,
            week_start,
        } => ApiError::InvalidInput {
            field: String::from("night_date"),
            message: format!("Night {night_date} falls outside the week starting {week_start}"),
        },
        DomainError::NotADutyNight {
            night_date,
            weekday,
        } => ApiError::InvalidInput {
            field: String::from("night_date"),
            message: format!("Night {night_date} is a {weekday}, not a duty night"),
        },
        DomainError::MemberAlreadyAssigned { member_id } => ApiError::DomainRuleViolation {
            rule: String::from("one_assignment_per_member"),
            message: format!("Member {member_id} is already assigned to this schedule"),
        },
        DomainError::PositionFull {
            position,
            max_slots,
        } => ApiError::DomainRuleViolation {
            rule: String::from("position_capacity"),
            message: format!("Position '{position}' is full (max {max_slots} slots)"),
        },
        DomainError::AssignmentNotFound { assignment_id } => ApiError::ResourceNotFound {
            resource_type: String::from("Assignment"),
            message: format!("Assignment {assignment_id} not found in this schedule"),
        },
        DomainError::OverrideNotFound { override_id } => ApiError::ResourceNotFound {
            resource_type: String::from("Override"),
            message: format!("Override {override_id} not found in this schedule"),
        },
        DomainError::OverrideTargetNotFound {
            position,
            base_member_id,
        } => ApiError::DomainRuleViolation {
            rule: String::from("override_targets_base_member"),
            message: format!(
                "Member {base_member_id} has no base assignment for position '{position}'"
            ),
        },
        DomainError::DuplicateOverride {
            night_date,
            position,
            base_member_id,
        } => ApiError::DomainRuleViolation {
            rule: String::from("one_override_per_target"),
            message: format!(
                "An override already targets member {base_member_id} at position '{position}' on {night_date}"
            ),
        },
        DomainError::IllegalTransition { from, to } => ApiError::DomainRuleViolation {
            rule: String::from("schedule_lifecycle"),
            message: format!("Cannot transition schedule from {from} to {to}"),
        },
        DomainError::MutationNotAllowed { action, status } => ApiError::DomainRuleViolation {
            rule: String::from("schedule_lifecycle"),
            message: format!("Cannot {action} while the schedule is {status}"),
        },
        DomainError::PublishBlocked { missing } => ApiError::DomainRuleViolation {
            rule: String::from("required_positions_filled"),
            message: format!(
                "Cannot publish: required positions unfilled: {}",
                missing.join(", ")
            ),
        },
        DomainError::DateParseError { date_string, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Failed to parse date '{date_string}': {error}"),
        },
        DomainError::InvalidTimezone(tz) => ApiError::InvalidInput {
            field: String::from("timezone"),
            message: format!("Invalid timezone: {tz}"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Internal(msg) => ApiError::Internal {
            message: format!("Internal error: {msg}"),
        },
    }
}
