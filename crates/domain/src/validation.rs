// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation-boundary validation rules.
//!
//! These functions are pure, deterministic, and have no side effects. They
//! reject ill-formed mutations before any state change; the resolver itself
//! never validates and degrades to no-ops instead (see `resolver`).

use crate::error::DomainError;
use crate::types::{Assignment, DutyPosition, NightOverride, OverrideAction, PositionCode};
use crate::week::ScheduleWeek;

/// Validates that a member does not already hold an assignment in the
/// schedule.
///
/// # Errors
///
/// Returns `DomainError::MemberAlreadyAssigned` if any assignment (active or
/// released) belongs to the member.
pub fn validate_member_not_assigned(
    member_id: i64,
    assignments: &[Assignment],
) -> Result<(), DomainError> {
    if assignments
        .iter()
        .any(|a| a.member.member_id == member_id)
    {
        return Err(DomainError::MemberAlreadyAssigned { member_id });
    }
    Ok(())
}

/// Validates that a position has an open slot for one more active
/// assignment.
///
/// Released assignments do not count toward capacity.
///
/// # Errors
///
/// Returns `DomainError::PositionFull` if the active count has reached the
/// position's capacity.
pub fn validate_position_capacity(
    position: &DutyPosition,
    assignments: &[Assignment],
) -> Result<(), DomainError> {
    let active = assignments
        .iter()
        .filter(|a| &a.position == position.code() && a.status.is_active())
        .count();
    if active >= position.max_slots() as usize {
        return Err(DomainError::PositionFull {
            position: position.code().value().to_string(),
            max_slots: position.max_slots(),
        });
    }
    Ok(())
}

/// Validates a new night override against the schedule week, the base
/// roster, and the existing override set.
///
/// Rules:
/// - The night must be a duty night inside the schedule week.
/// - A replace/remove must target a member currently holding a base
///   assignment for the position.
/// - At most one replace/remove override may target the same
///   `(night, position, base member)`.
///
/// The shape rules of the distilled model (replace/remove require a base
/// member, replace/add require an incoming member) are carried by
/// [`OverrideAction`] itself and need no checks here.
///
/// # Errors
///
/// Returns an error if any rule above is violated.
pub fn validate_new_override(
    week: &ScheduleWeek,
    candidate: &NightOverride,
    assignments: &[Assignment],
    existing: &[NightOverride],
) -> Result<(), DomainError> {
    week.validate_night(candidate.night_date)?;

    if let Some(base_member_id) = candidate.action.base_member_id() {
        validate_override_target(&candidate.position, base_member_id, assignments)?;

        let duplicate = existing.iter().any(|o| {
            o.night_date == candidate.night_date
                && o.position == candidate.position
                && o.action.base_member_id() == Some(base_member_id)
        });
        if duplicate {
            return Err(DomainError::DuplicateOverride {
                night_date: candidate.night_date,
                position: candidate.position.value().to_string(),
                base_member_id,
            });
        }
    }

    Ok(())
}

/// Validates that a replace/remove override targets a member present in the
/// base assignment set for the position.
///
/// # Errors
///
/// Returns `DomainError::OverrideTargetNotFound` if no base assignment for
/// the position belongs to the member.
fn validate_override_target(
    position: &PositionCode,
    base_member_id: i64,
    assignments: &[Assignment],
) -> Result<(), DomainError> {
    let present = assignments
        .iter()
        .any(|a| &a.position == position && a.member.member_id == base_member_id);
    if present {
        Ok(())
    } else {
        Err(DomainError::OverrideTargetNotFound {
            position: position.value().to_string(),
            base_member_id,
        })
    }
}
