// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use duty_roster_domain::{
    AssignmentStatus, DutyRole, Member, OverrideAction, PositionCode,
};
use time::Date;

/// A command represents user or system intent as data only.
///
/// Commands are the only way to request state changes. Catalog commands
/// (`CreateDutyRole`, `CreateDutyPosition`) operate on global metadata via
/// `apply_catalog`; all others operate on a schedule-scoped `State` via
/// `apply`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a new duty role in the catalog.
    CreateDutyRole {
        /// The role code (e.g. "DDS", "`DUTY_WATCH`").
        code: String,
        /// Human-readable role name.
        name: String,
        /// Ordering hint for catalog listings.
        display_order: i32,
    },
    /// Create a new position within a duty role.
    CreateDutyPosition {
        /// The duty role this position belongs to.
        duty_role: DutyRole,
        /// The position code, unique within the role.
        code: PositionCode,
        /// Human-readable position name.
        name: String,
        /// Capacity (at least 1).
        max_slots: u32,
        /// Whether the position must be filled before publish.
        required: bool,
        /// Stable ordering for roster views.
        display_order: i32,
    },
    /// Add a member to the base (week-level) roster.
    AssignMember {
        /// The member to assign.
        member: Member,
        /// The position to fill. Single-slot roles use the default sentinel.
        position: PositionCode,
    },
    /// Hard-delete a base assignment. Draft schedules only.
    DeleteAssignment {
        /// The assignment to delete.
        assignment_id: i64,
    },
    /// Toggle an assignment's status (mark unfilled / mark filled /
    /// confirm). Allowed in draft and published schedules.
    SetAssignmentStatus {
        /// The assignment to update.
        assignment_id: i64,
        /// The new status.
        status: AssignmentStatus,
    },
    /// Layer a per-night override on the schedule.
    AddNightOverride {
        /// The calendar night the override applies to.
        night_date: Date,
        /// The position the override targets.
        position: PositionCode,
        /// The delta to apply.
        action: OverrideAction,
    },
    /// Remove a night override ("revert" in the UI).
    RemoveNightOverride {
        /// The override to remove.
        override_id: i64,
    },
    /// Publish a draft schedule. Blocked while required positions are
    /// unfilled.
    PublishSchedule,
    /// Revert a published schedule to draft. No precondition.
    RevertToDraft,
}
