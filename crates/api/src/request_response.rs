// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response DTOs for the API boundary.
//!
//! These DTOs are distinct from domain types and represent the API contract.
//! They carry plain strings and numbers so callers never construct domain
//! types directly. Read views serialize straight onto the wire; mutation
//! requests are wrapped by the server with actor and cause fields.

use duty_roster_domain::{EffectiveSlot, ResolvedRoster, ScheduleStatus};
use serde::{Deserialize, Serialize};

/// API request to create a new duty role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDutyRoleRequest {
    /// The role code (e.g. "DDS", "`DUTY_WATCH`").
    pub code: String,
    /// Human-readable role name.
    pub name: String,
    /// Ordering hint for catalog listings.
    pub display_order: i32,
}

/// API response for a successful duty role creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDutyRoleResponse {
    /// The created role code (normalized).
    pub code: String,
    /// A success message.
    pub message: String,
}

/// API request to create a new position within a duty role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDutyPositionRequest {
    /// The duty role code this position belongs to.
    pub duty_role: String,
    /// The position code, unique within the role.
    pub code: String,
    /// Human-readable position name.
    pub name: String,
    /// Capacity (at least 1).
    pub max_slots: u32,
    /// Whether the position must be filled before publish.
    pub required: bool,
    /// Stable ordering for roster views.
    pub display_order: i32,
}

/// API response for a successful position creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDutyPositionResponse {
    /// The duty role code.
    pub duty_role: String,
    /// The created position code (normalized).
    pub code: String,
    /// A success message.
    pub message: String,
}

/// API request to add a member to the base roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignMemberRequest {
    /// The member's canonical identifier.
    pub member_id: i64,
    /// The member's first name (display).
    pub first_name: String,
    /// The member's last name (display).
    pub last_name: String,
    /// The member's rank (display).
    pub rank: String,
    /// The position code to fill. Empty for single-slot roles.
    pub position: Option<String>,
}

/// API response for a successful assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignMemberResponse {
    /// The assigned member.
    pub member_id: i64,
    /// The position filled (normalized).
    pub position: String,
    /// A success message.
    pub message: String,
}

/// API request to hard-delete a base assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAssignmentRequest {
    /// The assignment to delete.
    pub assignment_id: i64,
}

/// API request to toggle an assignment's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetAssignmentStatusRequest {
    /// The assignment to update.
    pub assignment_id: i64,
    /// The new status ("assigned", "confirmed", "released").
    pub status: String,
}

/// API response for assignment mutations with no richer payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentMutationResponse {
    /// The affected assignment.
    pub assignment_id: i64,
    /// A success message.
    pub message: String,
}

/// API request to add a night override.
///
/// The override shape rules live here: `replace`/`remove` require
/// `base_member_id`, `replace`/`add` require the incoming member fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOverrideRequest {
    /// The calendar night (ISO 8601 date).
    pub night_date: String,
    /// The position code. Empty for single-slot roles.
    pub position: Option<String>,
    /// The override type ("replace", "add", "remove").
    pub override_type: String,
    /// The targeted base member (replace/remove).
    pub base_member_id: Option<i64>,
    /// The incoming member (replace/add).
    pub member_id: Option<i64>,
    /// The incoming member's first name.
    pub first_name: Option<String>,
    /// The incoming member's last name.
    pub last_name: Option<String>,
    /// The incoming member's rank.
    pub rank: Option<String>,
}

/// API response for a successful override creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOverrideResponse {
    /// The night the override applies to.
    pub night_date: String,
    /// The override type.
    pub override_type: String,
    /// The position targeted (normalized).
    pub position: String,
    /// A success message.
    pub message: String,
}

/// API request to remove a night override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOverrideRequest {
    /// The override to remove.
    pub override_id: i64,
}

/// API response for a successful override removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveOverrideResponse {
    /// The removed override.
    pub override_id: i64,
    /// A success message.
    pub message: String,
}

/// API response for a lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleResponse {
    /// The duty role code.
    pub duty_role: String,
    /// The week start date (ISO 8601).
    pub week_start: String,
    /// The schedule status after the transition.
    pub status: String,
    /// A success message.
    pub message: String,
}

/// One resolved slot in a roster view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    /// The member's canonical identifier.
    pub member_id: i64,
    /// The member's first name.
    pub first_name: String,
    /// The member's last name.
    pub last_name: String,
    /// The member's rank.
    pub rank: String,
    /// Where the slot came from ("base", "override-add", "override-replace").
    pub source_kind: String,
    /// Whether the slot was produced by an override.
    pub is_override: bool,
    /// Whether the slot counts toward the active roster.
    pub active: bool,
}

/// The slots of one position in a roster view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSlotsView {
    /// The position code.
    pub position: String,
    /// The effective slots, in roster order.
    pub slots: Vec<SlotView>,
}

/// A resolved roster view for the base week or a specific night.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterResponse {
    /// The duty role code.
    pub duty_role: String,
    /// The week start date (ISO 8601).
    pub week_start: String,
    /// The night resolved, if this is a night view.
    pub night_date: Option<String>,
    /// The schedule status.
    pub status: String,
    /// Slots grouped by position.
    pub positions: Vec<PositionSlotsView>,
    /// Count of active slots across all positions.
    pub active_count: usize,
    /// Whether any override targeted this night.
    pub has_overrides: bool,
}

/// API response for publish readiness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Required positions with zero active assignments.
    pub missing_required: Vec<String>,
    /// Positions whose active count exceeds capacity.
    pub over_capacity: Vec<String>,
    /// Whether the schedule may be published.
    pub can_publish: bool,
}

/// One duty role in a catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyRoleView {
    /// The role code.
    pub code: String,
    /// The role name.
    pub name: String,
    /// Ordering hint.
    pub display_order: i32,
}

/// API response listing all duty roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDutyRolesResponse {
    /// The duty roles, in display order.
    pub duty_roles: Vec<DutyRoleView>,
}

/// One position in a catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionView {
    /// The position code.
    pub code: String,
    /// The position name.
    pub name: String,
    /// Capacity.
    pub max_slots: u32,
    /// Whether required for publish.
    pub required: bool,
    /// Ordering hint.
    pub display_order: i32,
}

/// API response listing a duty role's positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPositionsResponse {
    /// The duty role code.
    pub duty_role: String,
    /// The positions, ordered by display order.
    pub positions: Vec<PositionView>,
}

/// Builds a roster view from a resolved roster.
pub(crate) fn roster_to_response(
    duty_role: &str,
    week_start: time::Date,
    night_date: Option<time::Date>,
    status: ScheduleStatus,
    roster: &ResolvedRoster,
) -> RosterResponse {
    let positions: Vec<PositionSlotsView> = roster
        .slots_by_position
        .iter()
        .map(|(position, slots)| PositionSlotsView {
            position: position.value().to_string(),
            slots: slots.iter().map(slot_to_view).collect(),
        })
        .collect();

    RosterResponse {
        duty_role: duty_role.to_string(),
        week_start: week_start.to_string(),
        night_date: night_date.map(|d| d.to_string()),
        status: status.to_string(),
        positions,
        active_count: roster.active_count,
        has_overrides: roster.has_overrides,
    }
}

fn slot_to_view(slot: &EffectiveSlot) -> SlotView {
    SlotView {
        member_id: slot.member.member_id,
        first_name: slot.member.first_name.clone(),
        last_name: slot.member.last_name.clone(),
        rank: slot.member.rank.clone(),
        source_kind: slot.source_kind().to_string(),
        is_override: slot.is_override(),
        active: slot.is_active(),
    }
}
