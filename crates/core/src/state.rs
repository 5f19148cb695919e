// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use duty_roster_audit::{AuditEvent, StateSnapshot};
use duty_roster_domain::{
    Assignment, DutyPosition, DutyRole, NightOverride, PositionCode, ScheduleStatus, ScheduleWeek,
};

/// Catalog metadata tracking which duty roles and positions exist.
///
/// This is separate from the scoped `State` and represents global system
/// configuration maintained by administrators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMetadata {
    /// All duty roles that have been created.
    pub duty_roles: Vec<DutyRole>,
    /// All positions per duty role.
    pub positions: Vec<(DutyRole, DutyPosition)>,
}

impl CatalogMetadata {
    /// Creates a new empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            duty_roles: Vec::new(),
            positions: Vec::new(),
        }
    }

    /// Checks if a duty role exists.
    #[must_use]
    pub fn has_duty_role(&self, duty_role: &DutyRole) -> bool {
        self.duty_roles.contains(duty_role)
    }

    /// Checks if a position exists within a duty role.
    #[must_use]
    pub fn has_position(&self, duty_role: &DutyRole, code: &PositionCode) -> bool {
        self.positions
            .iter()
            .any(|(r, p)| r == duty_role && p.code() == code)
    }

    /// Returns the positions of a duty role, ordered by display order.
    #[must_use]
    pub fn positions_for(&self, duty_role: &DutyRole) -> Vec<DutyPosition> {
        let mut positions: Vec<DutyPosition> = self
            .positions
            .iter()
            .filter(|(r, _)| r == duty_role)
            .map(|(_, p)| p.clone())
            .collect();
        positions.sort_by_key(DutyPosition::display_order);
        positions
    }

    /// Adds a duty role.
    pub(crate) fn add_duty_role(&mut self, duty_role: DutyRole) {
        self.duty_roles.push(duty_role);
    }

    /// Adds a position to a duty role.
    pub(crate) fn add_position(&mut self, duty_role: DutyRole, position: DutyPosition) {
        self.positions.push((duty_role, position));
    }
}

impl Default for CatalogMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// The complete schedule state scoped to a single `(duty_role, week)` pair.
///
/// There is at most one schedule per duty role and week; the scoped state is
/// that schedule. A state that was never written is an empty draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// The duty role this state is scoped to.
    pub duty_role: DutyRole,
    /// The week this state is scoped to.
    pub week: ScheduleWeek,
    /// The schedule lifecycle status.
    pub status: ScheduleStatus,
    /// Base assignments in creation order.
    pub assignments: Vec<Assignment>,
    /// Night overrides in creation order.
    pub overrides: Vec<NightOverride>,
}

impl State {
    /// Creates a new empty draft state for a duty role and week.
    ///
    /// # Arguments
    ///
    /// * `duty_role` - The duty role this state is scoped to
    /// * `week` - The week this state is scoped to
    #[must_use]
    pub const fn new(duty_role: DutyRole, week: ScheduleWeek) -> Self {
        Self {
            duty_role,
            week,
            status: ScheduleStatus::Draft,
            assignments: Vec::new(),
            overrides: Vec::new(),
        }
    }

    /// Converts the state to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(format!(
            "duty_role={},week_start={},status={},assignments_count={},overrides_count={}",
            self.duty_role.code(),
            self.week.week_start(),
            self.status,
            self.assignments.len(),
            self.overrides.len()
        ))
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: State,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// The result of a catalog operation.
///
/// Catalog operations modify global metadata, not scoped schedule state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogResult {
    /// The new catalog metadata after the operation.
    pub new_metadata: CatalogMetadata,
    /// The audit event recording this operation.
    pub audit_event: AuditEvent,
}
