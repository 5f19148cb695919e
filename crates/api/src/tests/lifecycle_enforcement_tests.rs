// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    scheduler, staffed_state, test_cause, test_metadata, test_state,
};
use crate::{
    ApiError, DeleteAssignmentRequest, delete_assignment, publish_readiness, publish_schedule,
    revert_schedule,
};
use duty_roster_domain::ScheduleStatus;

#[test]
fn test_publish_staffed_schedule() {
    let metadata = test_metadata();
    let state = staffed_state();

    let result = publish_schedule(&metadata, &state, &scheduler(), test_cause()).unwrap();

    assert_eq!(result.new_state.status, ScheduleStatus::Published);
    assert_eq!(result.response.status, "published");
}

#[test]
fn test_publish_unstaffed_schedule_is_blocked() {
    let metadata = test_metadata();
    let state = test_state();

    let result = publish_schedule(&metadata, &state, &scheduler(), test_cause());

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "required_positions_filled"
    ));
}

#[test]
fn test_readiness_reports_missing_required() {
    let metadata = test_metadata();
    let state = test_state();

    let readiness = publish_readiness(&metadata, &state).unwrap();

    assert!(!readiness.can_publish);
    assert_eq!(readiness.missing_required, vec![String::from("OOW")]);
}

#[test]
fn test_readiness_reports_ready_when_staffed() {
    let metadata = test_metadata();
    let state = staffed_state();

    let readiness = publish_readiness(&metadata, &state).unwrap();

    assert!(readiness.can_publish);
    assert!(readiness.missing_required.is_empty());
}

#[test]
fn test_revert_then_delete_assignment() {
    let metadata = test_metadata();
    let state = staffed_state();

    let published = publish_schedule(&metadata, &state, &scheduler(), test_cause()).unwrap();

    // Deleting from a published schedule is a lifecycle violation
    let blocked = delete_assignment(
        &metadata,
        &published.new_state,
        &DeleteAssignmentRequest { assignment_id: 1 },
        &scheduler(),
        test_cause(),
    );
    assert!(matches!(
        blocked,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "schedule_lifecycle"
    ));

    let reverted = revert_schedule(
        &metadata,
        &published.new_state,
        &scheduler(),
        test_cause(),
    )
    .unwrap();
    assert_eq!(reverted.new_state.status, ScheduleStatus::Draft);

    let deleted = delete_assignment(
        &metadata,
        &reverted.new_state,
        &DeleteAssignmentRequest { assignment_id: 1 },
        &scheduler(),
        test_cause(),
    )
    .unwrap();
    assert_eq!(deleted.new_state.assignments.len(), 1);
}

#[test]
fn test_revert_draft_is_rejected() {
    let metadata = test_metadata();
    let state = staffed_state();

    let result = revert_schedule(&metadata, &state, &scheduler(), test_cause());

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "schedule_lifecycle"
    ));
}
