// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{AssignMemberRequest, AuthenticatedActor, Role};
use duty_roster::{CatalogMetadata, State};
use duty_roster_audit::Cause;
use duty_roster_domain::{
    Assignment, AssignmentStatus, DutyPosition, DutyRole, Member, PositionCode, ScheduleWeek,
};
use time::macros::date;

pub fn admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin-1"), Role::Admin)
}

pub fn scheduler() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("sched-1"), Role::Scheduler)
}

pub fn test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test request"))
}

pub fn duty_watch_role() -> DutyRole {
    DutyRole::new("DUTY_WATCH", "Duty Watch", 2)
}

pub fn test_metadata() -> CatalogMetadata {
    let mut metadata: CatalogMetadata = CatalogMetadata::new();
    let role: DutyRole = duty_watch_role();
    metadata.duty_roles.push(role.clone());
    metadata.positions.push((
        role.clone(),
        DutyPosition::new(PositionCode::new("OOW"), "Officer of the Watch", 2, true, 1).unwrap(),
    ));
    metadata.positions.push((
        role,
        DutyPosition::new(PositionCode::new("QM"), "Quartermaster", 1, false, 2).unwrap(),
    ));
    metadata
}

pub fn test_state() -> State {
    State::new(
        duty_watch_role(),
        ScheduleWeek::from_monday(date!(2025 - 06 - 02)).unwrap(),
    )
}

pub fn staffed_state() -> State {
    let mut state: State = test_state();
    state.assignments.push(Assignment::with_id(
        1,
        Member::new(10, "Alex", "Archer", "LS"),
        PositionCode::new("OOW"),
        AssignmentStatus::Assigned,
    ));
    state.assignments.push(Assignment::with_id(
        2,
        Member::new(11, "Blake", "Barnes", "AB"),
        PositionCode::new("OOW"),
        AssignmentStatus::Assigned,
    ));
    state
}

pub fn assign_request(member_id: i64, position: &str) -> AssignMemberRequest {
    AssignMemberRequest {
        member_id,
        first_name: String::from("Test"),
        last_name: String::from("Member"),
        rank: String::from("AB"),
        position: Some(position.to_string()),
    }
}
