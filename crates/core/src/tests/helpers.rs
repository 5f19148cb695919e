// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CatalogMetadata, State};
use duty_roster_audit::{Actor, Cause};
use duty_roster_domain::{
    Assignment, AssignmentStatus, DutyPosition, DutyRole, Member, PositionCode, ScheduleWeek,
};
use time::macros::date;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("admin-123"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Admin request"))
}

pub fn duty_watch_role() -> DutyRole {
    DutyRole::new("DUTY_WATCH", "Duty Watch", 2)
}

pub fn create_test_metadata() -> CatalogMetadata {
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

pub fn create_test_member(member_id: i64, last_name: &str) -> Member {
    Member::new(member_id, "Test", last_name, "AB")
}

pub fn create_test_state() -> State {
    State::new(
        duty_watch_role(),
        ScheduleWeek::from_monday(date!(2025 - 06 - 02)).unwrap(),
    )
}

pub fn create_staffed_state() -> State {
    let mut state: State = create_test_state();
    state.assignments.push(Assignment::with_id(
        1,
        create_test_member(10, "Archer"),
        PositionCode::new("OOW"),
        AssignmentStatus::Assigned,
    ));
    state.assignments.push(Assignment::with_id(
        2,
        create_test_member(11, "Barnes"),
        PositionCode::new("OOW"),
        AssignmentStatus::Assigned,
    ));
    state
}
