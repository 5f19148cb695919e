// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    admin, assign_request, scheduler, staffed_state, test_cause, test_metadata, test_state,
};
use crate::{
    AddOverrideRequest, ApiError, CreateDutyPositionRequest, CreateDutyRoleRequest,
    DeleteAssignmentRequest, RemoveOverrideRequest, SetAssignmentStatusRequest, assign_member,
    create_duty_position, create_duty_role, delete_assignment, list_duty_roles, list_positions,
    remove_override, set_assignment_status,
};
use crate::add_override;
use duty_roster::CatalogMetadata;

#[test]
fn test_create_duty_role_returns_normalized_code() {
    let metadata: CatalogMetadata = CatalogMetadata::new();
    let request = CreateDutyRoleRequest {
        code: String::from("dds"),
        name: String::from("Duty Day Staff"),
        display_order: 1,
    };

    let (result, response) = create_duty_role(&metadata, &request, &admin(), test_cause()).unwrap();

    assert_eq!(response.code, "DDS");
    assert_eq!(result.new_metadata.duty_roles.len(), 1);
    assert_eq!(result.audit_event.action.name, "CreateDutyRole");
}

#[test]
fn test_create_duty_position_requires_existing_role() {
    let metadata: CatalogMetadata = CatalogMetadata::new();
    let request = CreateDutyPositionRequest {
        duty_role: String::from("DUTY_WATCH"),
        code: String::from("OOW"),
        name: String::from("Officer of the Watch"),
        max_slots: 2,
        required: true,
        display_order: 1,
    };

    let result = create_duty_position(&metadata, &request, &admin(), test_cause());

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_create_duty_position_succeeds() {
    let metadata: CatalogMetadata = test_metadata();
    let request = CreateDutyPositionRequest {
        duty_role: String::from("duty_watch"),
        code: String::from("bmow"),
        name: String::from("Boatswain's Mate of the Watch"),
        max_slots: 1,
        required: true,
        display_order: 3,
    };

    let (result, response) =
        create_duty_position(&metadata, &request, &admin(), test_cause()).unwrap();

    assert_eq!(response.code, "BMOW");
    assert_eq!(result.new_metadata.positions.len(), 3);
}

#[test]
fn test_assign_member_returns_new_state() {
    let metadata = test_metadata();
    let state = test_state();

    let result = assign_member(
        &metadata,
        &state,
        &assign_request(10, "OOW"),
        &scheduler(),
        test_cause(),
    )
    .unwrap();

    assert_eq!(result.new_state.assignments.len(), 1);
    assert_eq!(result.response.member_id, 10);
    assert_eq!(result.response.position, "OOW");
    assert_eq!(result.audit_event.action.name, "AssignMember");
}

#[test]
fn test_assign_member_without_position_uses_default_slot() {
    let mut metadata = test_metadata();
    // DDS-style single-slot role keyed by the sentinel position
    let dds = duty_roster_domain::DutyRole::new("DDS", "Duty Day Staff", 1);
    metadata.duty_roles.push(dds.clone());
    metadata.positions.push((
        dds.clone(),
        duty_roster_domain::DutyPosition::new(
            duty_roster_domain::PositionCode::default_slot(),
            "Duty Day Staff",
            1,
            true,
            1,
        )
        .unwrap(),
    ));
    let state = duty_roster::State::new(
        dds,
        duty_roster_domain::ScheduleWeek::from_monday(time::macros::date!(2025 - 06 - 02))
            .unwrap(),
    );

    let request = crate::AssignMemberRequest {
        member_id: 20,
        first_name: String::from("Dana"),
        last_name: String::from("Drake"),
        rank: String::from("PO2"),
        position: None,
    };

    let result = assign_member(&metadata, &state, &request, &scheduler(), test_cause()).unwrap();

    assert_eq!(result.response.position, "DEFAULT");
    assert!(result.new_state.assignments[0].position.is_default_slot());
}

#[test]
fn test_assign_member_full_position_is_domain_rule_violation() {
    let metadata = test_metadata();
    let state = staffed_state();

    let result = assign_member(
        &metadata,
        &state,
        &assign_request(12, "OOW"),
        &scheduler(),
        test_cause(),
    );

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { ref rule, .. }) if rule == "position_capacity"
    ));
}

#[test]
fn test_delete_assignment_succeeds_in_draft() {
    let metadata = test_metadata();
    let state = staffed_state();

    let result = delete_assignment(
        &metadata,
        &state,
        &DeleteAssignmentRequest { assignment_id: 1 },
        &scheduler(),
        test_cause(),
    )
    .unwrap();

    assert_eq!(result.new_state.assignments.len(), 1);
}

#[test]
fn test_set_assignment_status_parses_status_string() {
    let metadata = test_metadata();
    let state = staffed_state();

    let result = set_assignment_status(
        &metadata,
        &state,
        &SetAssignmentStatusRequest {
            assignment_id: 1,
            status: String::from("released"),
        },
        &scheduler(),
        test_cause(),
    )
    .unwrap();

    assert_eq!(
        result.new_state.assignments[0].status,
        duty_roster_domain::AssignmentStatus::Released
    );
}

#[test]
fn test_set_assignment_status_rejects_unknown_status() {
    let metadata = test_metadata();
    let state = staffed_state();

    let result = set_assignment_status(
        &metadata,
        &state,
        &SetAssignmentStatusRequest {
            assignment_id: 1,
            status: String::from("retired"),
        },
        &scheduler(),
        test_cause(),
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_add_override_replace_shape() {
    let metadata = test_metadata();
    let state = staffed_state();

    let request = AddOverrideRequest {
        night_date: String::from("2025-06-03"),
        position: Some(String::from("OOW")),
        override_type: String::from("replace"),
        base_member_id: Some(10),
        member_id: Some(12),
        first_name: Some(String::from("Casey")),
        last_name: Some(String::from("Cole")),
        rank: Some(String::from("MS")),
    };

    let result = add_override(&metadata, &state, &request, &scheduler(), test_cause()).unwrap();

    assert_eq!(result.new_state.overrides.len(), 1);
    assert_eq!(result.response.override_type, "replace");
    assert_eq!(result.response.position, "OOW");
}

#[test]
fn test_add_override_replace_without_base_member_is_rejected() {
    let metadata = test_metadata();
    let state = staffed_state();

    let request = AddOverrideRequest {
        night_date: String::from("2025-06-03"),
        position: Some(String::from("OOW")),
        override_type: String::from("replace"),
        base_member_id: None,
        member_id: Some(12),
        first_name: Some(String::from("Casey")),
        last_name: Some(String::from("Cole")),
        rank: Some(String::from("MS")),
    };

    let result = add_override(&metadata, &state, &request, &scheduler(), test_cause());

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "base_member_id"
    ));
}

#[test]
fn test_add_override_add_without_member_is_rejected() {
    let metadata = test_metadata();
    let state = staffed_state();

    let request = AddOverrideRequest {
        night_date: String::from("2025-06-03"),
        position: Some(String::from("OOW")),
        override_type: String::from("add"),
        base_member_id: None,
        member_id: None,
        first_name: None,
        last_name: None,
        rank: None,
    };

    let result = add_override(&metadata, &state, &request, &scheduler(), test_cause());

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "member_id"
    ));
}

#[test]
fn test_add_override_unknown_type_is_rejected() {
    let metadata = test_metadata();
    let state = staffed_state();

    let request = AddOverrideRequest {
        night_date: String::from("2025-06-03"),
        position: Some(String::from("OOW")),
        override_type: String::from("swap"),
        base_member_id: Some(10),
        member_id: Some(12),
        first_name: None,
        last_name: None,
        rank: None,
    };

    let result = add_override(&metadata, &state, &request, &scheduler(), test_cause());

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "override_type"
    ));
}

#[test]
fn test_add_override_bad_date_is_rejected() {
    let metadata = test_metadata();
    let state = staffed_state();

    let request = AddOverrideRequest {
        night_date: String::from("June 3rd"),
        position: Some(String::from("OOW")),
        override_type: String::from("remove"),
        base_member_id: Some(10),
        member_id: None,
        first_name: None,
        last_name: None,
        rank: None,
    };

    let result = add_override(&metadata, &state, &request, &scheduler(), test_cause());

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_remove_override_round_trip() {
    let metadata = test_metadata();
    let state = staffed_state();

    let request = AddOverrideRequest {
        night_date: String::from("2025-06-03"),
        position: Some(String::from("OOW")),
        override_type: String::from("remove"),
        base_member_id: Some(10),
        member_id: None,
        first_name: None,
        last_name: None,
        rank: None,
    };
    let added = add_override(&metadata, &state, &request, &scheduler(), test_cause()).unwrap();

    // As re-read from storage
    let mut stored = added.new_state;
    stored.overrides[0].override_id = Some(7);

    let removed = remove_override(
        &metadata,
        &stored,
        &RemoveOverrideRequest { override_id: 7 },
        &scheduler(),
        test_cause(),
    )
    .unwrap();

    assert!(removed.new_state.overrides.is_empty());
}

#[test]
fn test_list_duty_roles_is_ordered() {
    let mut metadata = test_metadata();
    metadata
        .duty_roles
        .push(duty_roster_domain::DutyRole::new("DDS", "Duty Day Staff", 1));

    let response = list_duty_roles(&metadata);

    let codes: Vec<&str> = response.duty_roles.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["DDS", "DUTY_WATCH"]);
}

#[test]
fn test_list_positions_is_ordered_and_complete() {
    let metadata = test_metadata();

    let response = list_positions(&metadata, "duty_watch").unwrap();

    assert_eq!(response.duty_role, "DUTY_WATCH");
    let codes: Vec<&str> = response.positions.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(codes, vec!["OOW", "QM"]);
    assert_eq!(response.positions[0].max_slots, 2);
    assert!(response.positions[0].required);
}

#[test]
fn test_list_positions_unknown_role_fails() {
    let metadata = test_metadata();

    let result = list_positions(&metadata, "GALLEY");

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}
