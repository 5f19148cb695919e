// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{scheduler, staffed_state, test_cause, test_metadata};
use crate::{AddOverrideRequest, ApiError, add_override, base_roster, night_roster};

fn tuesday_replace_request() -> AddOverrideRequest {
    AddOverrideRequest {
        night_date: String::from("2025-06-03"),
        position: Some(String::from("OOW")),
        override_type: String::from("replace"),
        base_member_id: Some(10),
        member_id: Some(12),
        first_name: Some(String::from("Casey")),
        last_name: Some(String::from("Cole")),
        rank: Some(String::from("MS")),
    }
}

#[test]
fn test_base_roster_view() {
    let state = staffed_state();

    let view = base_roster(&state);

    assert_eq!(view.duty_role, "DUTY_WATCH");
    assert_eq!(view.week_start, "2025-06-02");
    assert_eq!(view.night_date, None);
    assert_eq!(view.status, "draft");
    assert_eq!(view.active_count, 2);
    assert!(!view.has_overrides);

    let oow = &view.positions[0];
    assert_eq!(oow.position, "OOW");
    assert_eq!(oow.slots.len(), 2);
    assert_eq!(oow.slots[0].member_id, 10);
    assert_eq!(oow.slots[0].source_kind, "base");
    assert!(!oow.slots[0].is_override);
    assert!(oow.slots[0].active);
}

#[test]
fn test_night_roster_applies_overrides() {
    let metadata = test_metadata();
    let state = staffed_state();
    let with_override = add_override(
        &metadata,
        &state,
        &tuesday_replace_request(),
        &scheduler(),
        test_cause(),
    )
    .unwrap();

    let view = night_roster(&with_override.new_state, "2025-06-03").unwrap();

    assert_eq!(view.night_date.as_deref(), Some("2025-06-03"));
    assert!(view.has_overrides);
    let oow = &view.positions[0];
    assert_eq!(oow.slots[0].member_id, 12);
    assert_eq!(oow.slots[0].source_kind, "override-replace");
    assert!(oow.slots[0].is_override);
    // The base view still shows the original member
    let base = base_roster(&with_override.new_state);
    assert_eq!(base.positions[0].slots[0].member_id, 10);
    assert!(!base.has_overrides);
}

#[test]
fn test_night_roster_other_night_is_untouched() {
    let metadata = test_metadata();
    let state = staffed_state();
    let with_override = add_override(
        &metadata,
        &state,
        &tuesday_replace_request(),
        &scheduler(),
        test_cause(),
    )
    .unwrap();

    let view = night_roster(&with_override.new_state, "2025-06-05").unwrap();

    assert!(!view.has_overrides);
    assert_eq!(view.positions[0].slots[0].member_id, 10);
}

#[test]
fn test_night_roster_rejects_bad_date() {
    let state = staffed_state();

    let result = night_roster(&state, "tonight");

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}
