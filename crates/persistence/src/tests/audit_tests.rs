// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Persistence, PersistenceError};
use crate::tests::helpers::{assign, seeded_persistence, test_week};
use time::macros::date;

#[test]
fn test_every_transition_is_audited() {
    let mut persistence: Persistence = seeded_persistence();
    assign(&mut persistence, 10, "Archer", "OOW");

    let timeline = persistence
        .get_audit_timeline("DUTY_WATCH", test_week())
        .unwrap();

    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0].action.name, "AssignMember");
    assert_eq!(timeline[0].actor.id, "admin-123");
    assert_eq!(timeline[0].week_start, Some(date!(2025 - 06 - 02)));
}

#[test]
fn test_timeline_is_oldest_first() {
    let mut persistence: Persistence = seeded_persistence();
    assign(&mut persistence, 10, "Archer", "OOW");
    assign(&mut persistence, 11, "Barnes", "QM");

    let timeline = persistence
        .get_audit_timeline("DUTY_WATCH", test_week())
        .unwrap();

    assert_eq!(timeline.len(), 2);
    assert!(timeline[0].event_id < timeline[1].event_id);
    assert!(
        timeline[0]
            .action
            .details
            .as_ref()
            .unwrap()
            .contains("Archer")
    );
}

#[test]
fn test_event_round_trips_by_id() {
    let mut persistence: Persistence = seeded_persistence();
    assign(&mut persistence, 10, "Archer", "OOW");

    let timeline = persistence
        .get_audit_timeline("DUTY_WATCH", test_week())
        .unwrap();
    let event_id: i64 = timeline[0].event_id.unwrap();

    let event = persistence.get_audit_event(event_id).unwrap();

    assert_eq!(event, timeline[0]);
    assert!(event.before.data.contains("assignments_count=0"));
    assert!(event.after.data.contains("assignments_count=1"));
}

#[test]
fn test_missing_event_is_not_found() {
    let mut persistence: Persistence = seeded_persistence();

    let result = persistence.get_audit_event(999);

    assert_eq!(result, Err(PersistenceError::EventNotFound(999)));
}

#[test]
fn test_catalog_events_do_not_pollute_week_timelines() {
    let mut persistence: Persistence = seeded_persistence();
    assign(&mut persistence, 10, "Archer", "OOW");

    // Three catalog events exist, but the week timeline only has the
    // assignment
    let timeline = persistence
        .get_audit_timeline("DUTY_WATCH", test_week())
        .unwrap();

    assert_eq!(timeline.len(), 1);
}
