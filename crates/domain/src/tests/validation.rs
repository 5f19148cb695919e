// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Assignment, AssignmentStatus, DomainError, DutyPosition, Member, NightOverride,
    OverrideAction, PositionCode, ScheduleWeek, validate_member_not_assigned,
    validate_new_override, validate_position_capacity,
};
use time::macros::date;

fn member(id: i64) -> Member {
    Member::new(id, "Test", "Member", "AB")
}

fn assignment(id: i64, member_id: i64, position: &str, status: AssignmentStatus) -> Assignment {
    Assignment::with_id(id, member(member_id), PositionCode::new(position), status)
}

fn week() -> ScheduleWeek {
    ScheduleWeek::from_monday(date!(2025 - 06 - 02)).unwrap()
}

#[test]
fn test_member_not_assigned_accepts_new_member() {
    let assignments = vec![assignment(1, 10, "OOW", AssignmentStatus::Assigned)];
    assert!(validate_member_not_assigned(11, &assignments).is_ok());
}

#[test]
fn test_member_not_assigned_rejects_duplicate() {
    let assignments = vec![assignment(1, 10, "OOW", AssignmentStatus::Assigned)];
    assert_eq!(
        validate_member_not_assigned(10, &assignments),
        Err(DomainError::MemberAlreadyAssigned { member_id: 10 })
    );
}

#[test]
fn test_member_not_assigned_counts_released_rows() {
    // A released row still blocks re-adding the member; restore it instead
    let assignments = vec![assignment(1, 10, "OOW", AssignmentStatus::Released)];
    assert!(validate_member_not_assigned(10, &assignments).is_err());
}

#[test]
fn test_capacity_accepts_open_slot() {
    let position = DutyPosition::new(PositionCode::new("OOW"), "OOW", 2, true, 0).unwrap();
    let assignments = vec![assignment(1, 10, "OOW", AssignmentStatus::Assigned)];
    assert!(validate_position_capacity(&position, &assignments).is_ok());
}

#[test]
fn test_capacity_rejects_full_position() {
    let position = DutyPosition::new(PositionCode::new("OOW"), "OOW", 2, true, 0).unwrap();
    let assignments = vec![
        assignment(1, 10, "OOW", AssignmentStatus::Assigned),
        assignment(2, 11, "OOW", AssignmentStatus::Confirmed),
    ];
    assert_eq!(
        validate_position_capacity(&position, &assignments),
        Err(DomainError::PositionFull {
            position: String::from("OOW"),
            max_slots: 2,
        })
    );
}

#[test]
fn test_capacity_ignores_released_assignments() {
    let position = DutyPosition::new(PositionCode::new("OOW"), "OOW", 1, true, 0).unwrap();
    let assignments = vec![assignment(1, 10, "OOW", AssignmentStatus::Released)];
    assert!(validate_position_capacity(&position, &assignments).is_ok());
}

#[test]
fn test_new_override_accepts_valid_replace() {
    let assignments = vec![assignment(1, 10, "OOW", AssignmentStatus::Assigned)];
    let candidate = NightOverride::new(
        date!(2025 - 06 - 03),
        PositionCode::new("OOW"),
        OverrideAction::Replace {
            base_member_id: 10,
            member: member(12),
        },
    );
    assert!(validate_new_override(&week(), &candidate, &assignments, &[]).is_ok());
}

#[test]
fn test_new_override_rejects_night_outside_week() {
    let candidate = NightOverride::new(
        date!(2025 - 06 - 10),
        PositionCode::new("OOW"),
        OverrideAction::Add { member: member(12) },
    );
    assert!(matches!(
        validate_new_override(&week(), &candidate, &[], &[]),
        Err(DomainError::NightOutsideWeek { .. })
    ));
}

#[test]
fn test_new_override_rejects_non_duty_night() {
    let candidate = NightOverride::new(
        date!(2025 - 06 - 04),
        PositionCode::new("OOW"),
        OverrideAction::Add { member: member(12) },
    );
    assert!(matches!(
        validate_new_override(&week(), &candidate, &[], &[]),
        Err(DomainError::NotADutyNight { .. })
    ));
}

#[test]
fn test_new_override_rejects_absent_base_member() {
    let assignments = vec![assignment(1, 10, "OOW", AssignmentStatus::Assigned)];
    let candidate = NightOverride::new(
        date!(2025 - 06 - 03),
        PositionCode::new("OOW"),
        OverrideAction::Remove { base_member_id: 99 },
    );
    assert!(matches!(
        validate_new_override(&week(), &candidate, &assignments, &[]),
        Err(DomainError::OverrideTargetNotFound { .. })
    ));
}

#[test]
fn test_new_override_rejects_duplicate_target() {
    let assignments = vec![assignment(1, 10, "OOW", AssignmentStatus::Assigned)];
    let existing = vec![NightOverride::with_id(
        100,
        date!(2025 - 06 - 03),
        PositionCode::new("OOW"),
        OverrideAction::Remove { base_member_id: 10 },
    )];
    let candidate = NightOverride::new(
        date!(2025 - 06 - 03),
        PositionCode::new("OOW"),
        OverrideAction::Replace {
            base_member_id: 10,
            member: member(12),
        },
    );
    assert!(matches!(
        validate_new_override(&week(), &candidate, &assignments, &existing),
        Err(DomainError::DuplicateOverride { .. })
    ));
}

#[test]
fn test_new_override_allows_same_target_on_other_night() {
    let assignments = vec![assignment(1, 10, "OOW", AssignmentStatus::Assigned)];
    let existing = vec![NightOverride::with_id(
        100,
        date!(2025 - 06 - 03),
        PositionCode::new("OOW"),
        OverrideAction::Remove { base_member_id: 10 },
    )];
    let candidate = NightOverride::new(
        date!(2025 - 06 - 05),
        PositionCode::new("OOW"),
        OverrideAction::Remove { base_member_id: 10 },
    );
    assert!(validate_new_override(&week(), &candidate, &assignments, &existing).is_ok());
}

#[test]
fn test_new_override_add_never_checks_base_roster() {
    let candidate = NightOverride::new(
        date!(2025 - 06 - 03),
        PositionCode::new("OOW"),
        OverrideAction::Add { member: member(12) },
    );
    assert!(validate_new_override(&week(), &candidate, &[], &[]).is_ok());
}
