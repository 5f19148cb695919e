// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;
use duty_roster::{CatalogMetadata, Command, State, TransitionResult, apply, apply_catalog};
use duty_roster_audit::{Actor, Cause};
use duty_roster_domain::{DutyRole, Member, PositionCode, ScheduleWeek};
use time::macros::date;

pub fn test_actor() -> Actor {
    Actor::new(String::from("admin-123"), String::from("admin"))
}

pub fn test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Test request"))
}

pub fn test_week() -> ScheduleWeek {
    ScheduleWeek::from_monday(date!(2025 - 06 - 02)).unwrap()
}

pub fn test_member(member_id: i64, last_name: &str) -> Member {
    Member::new(member_id, "Test", last_name, "AB")
}

/// Creates an in-memory persistence seeded with the DUTY_WATCH role and its
/// OOW (2 slots, required) and QM (1 slot, optional) positions.
pub fn seeded_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let mut metadata: CatalogMetadata = CatalogMetadata::new();

    let role_result = apply_catalog(
        &metadata,
        Command::CreateDutyRole {
            code: String::from("DUTY_WATCH"),
            name: String::from("Duty Watch"),
            display_order: 2,
        },
        test_actor(),
        test_cause(),
    )
    .unwrap();
    persistence.persist_catalog(&role_result).unwrap();
    metadata = role_result.new_metadata;

    for (code, name, max_slots, required, order) in [
        ("OOW", "Officer of the Watch", 2_u32, true, 1),
        ("QM", "Quartermaster", 1_u32, false, 2),
    ] {
        let position_result = apply_catalog(
            &metadata,
            Command::CreateDutyPosition {
                duty_role: DutyRole::new("DUTY_WATCH", "Duty Watch", 2),
                code: PositionCode::new(code),
                name: name.to_string(),
                max_slots,
                required,
                display_order: order,
            },
            test_actor(),
            test_cause(),
        )
        .unwrap();
        persistence.persist_catalog(&position_result).unwrap();
        metadata = position_result.new_metadata;
    }

    persistence
}

/// Applies a command against the current stored state and persists the
/// transition, returning the event ID.
pub fn apply_and_persist(persistence: &mut Persistence, command: Command) -> i64 {
    let metadata: CatalogMetadata = persistence.get_catalog_metadata().unwrap();
    let state: State = persistence
        .get_current_state("DUTY_WATCH", test_week())
        .unwrap();
    let result: TransitionResult =
        apply(&metadata, &state, command, test_actor(), test_cause()).unwrap();
    persistence.persist_transition(&result).unwrap()
}

/// Assigns a member to a position through the full command path.
pub fn assign(persistence: &mut Persistence, member_id: i64, last_name: &str, position: &str) {
    apply_and_persist(
        persistence,
        Command::AssignMember {
            member: test_member(member_id, last_name),
            position: PositionCode::new(position),
        },
    );
}
