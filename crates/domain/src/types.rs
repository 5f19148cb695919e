// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents the lifecycle state of a weekly schedule.
///
/// Draft schedules are fully editable. Published schedules accept only
/// status toggles and night overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ScheduleStatus {
    /// Initial state after creation. Full editing allowed.
    #[default]
    Draft,
    /// Visible to the unit. Base roster locked except status toggles;
    /// night overrides remain the adjustment mechanism.
    Published,
}

impl FromStr for ScheduleStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            _ => Err(DomainError::InvalidScheduleStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ScheduleStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - Draft → Published (publish)
    /// - Published → Draft (revert)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Published) | (Self::Published, Self::Draft)
        )
    }

    /// Returns whether base assignments may be deleted in this status.
    ///
    /// Hard deletion of base assignments is draft-only. Creation and
    /// status toggling are allowed in either status.
    #[must_use]
    pub const fn allows_base_deletion(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns whether night overrides may be created or removed.
    ///
    /// Overrides are explicitly the mechanism for adjusting an already
    /// published schedule, so both statuses allow them.
    #[must_use]
    pub const fn allows_override_mutations(&self) -> bool {
        matches!(self, Self::Draft | Self::Published)
    }
}

/// Represents the status of a base assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AssignmentStatus {
    /// Member is on the roster.
    #[default]
    Assigned,
    /// Member has confirmed their slot.
    Confirmed,
    /// Slot released for this week ("marked unfilled"). The row is kept so
    /// the release is visible and reversible.
    Released,
}

impl FromStr for AssignmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assigned" => Ok(Self::Assigned),
            "confirmed" => Ok(Self::Confirmed),
            "released" => Ok(Self::Released),
            _ => Err(DomainError::InvalidAssignmentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AssignmentStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Confirmed => "confirmed",
            Self::Released => "released",
        }
    }

    /// Returns whether this assignment counts toward the active roster.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Released)
    }
}

/// Represents a position code within a duty role.
///
/// Codes are normalized to uppercase for case-insensitive uniqueness.
/// Single-slot roles (e.g. DDS) that carry no explicit position rows use the
/// reserved [`PositionCode::DEFAULT_CODE`] sentinel instead of a nullable
/// position.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PositionCode {
    /// The code value (uppercase).
    value: String,
}

impl PositionCode {
    /// The reserved code for the implicit single slot of roles without
    /// explicit position rows.
    pub const DEFAULT_CODE: &'static str = "DEFAULT";

    /// Creates a new `PositionCode`, normalized to uppercase.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_uppercase(),
        }
    }

    /// Returns the sentinel code for single-slot roles.
    #[must_use]
    pub fn default_slot() -> Self {
        Self::new(Self::DEFAULT_CODE)
    }

    /// Returns the code value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns whether this is the single-slot sentinel.
    #[must_use]
    pub fn is_default_slot(&self) -> bool {
        self.value == Self::DEFAULT_CODE
    }
}

impl std::fmt::Display for PositionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Represents a duty role (e.g. DDS, `DUTY_WATCH`) scheduled per week.
///
/// A duty role has a canonical numeric ID (`duty_role_id`) assigned by the
/// persistence layer as well as a human-readable code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DutyRole {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the role has not been persisted yet.
    duty_role_id: Option<i64>,
    /// The role code (e.g. "DDS", "`DUTY_WATCH`"). Normalized to uppercase.
    code: String,
    /// Human-readable role name.
    name: String,
    /// Ordering hint for catalog listings.
    display_order: i32,
}

// Two DutyRoles are equal if they have the same code, regardless of their IDs
impl PartialEq for DutyRole {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for DutyRole {}

impl std::hash::Hash for DutyRole {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl DutyRole {
    /// Creates a new `DutyRole` without a persisted ID.
    ///
    /// Role codes are normalized to uppercase to ensure case-insensitive
    /// uniqueness.
    #[must_use]
    pub fn new(code: &str, name: &str, display_order: i32) -> Self {
        Self {
            duty_role_id: None,
            code: code.to_uppercase(),
            name: name.to_string(),
            display_order,
        }
    }

    /// Creates a `DutyRole` with an existing persisted ID.
    #[must_use]
    pub fn with_id(duty_role_id: i64, code: &str, name: &str, display_order: i32) -> Self {
        Self {
            duty_role_id: Some(duty_role_id),
            code: code.to_uppercase(),
            name: name.to_string(),
            display_order,
        }
    }

    /// Returns the canonical numeric identifier if persisted.
    #[must_use]
    pub const fn duty_role_id(&self) -> Option<i64> {
        self.duty_role_id
    }

    /// Returns the role code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the display order.
    #[must_use]
    pub const fn display_order(&self) -> i32 {
        self.display_order
    }
}

/// Represents a named slot within a duty role, with a capacity.
///
/// Positions are configured by administrators and are immutable from the
/// resolver's viewpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyPosition {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the position has not been persisted yet.
    duty_position_id: Option<i64>,
    /// The position code, unique within the duty role.
    code: PositionCode,
    /// Human-readable position name.
    name: String,
    /// Capacity (always at least 1).
    max_slots: u32,
    /// Whether the position must be filled before publish.
    required: bool,
    /// Stable ordering for roster views.
    display_order: i32,
}

impl DutyPosition {
    /// Creates a new `DutyPosition` without a persisted ID.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The position name is empty
    /// - `max_slots` is zero
    pub fn new(
        code: PositionCode,
        name: &str,
        max_slots: u32,
        required: bool,
        display_order: i32,
    ) -> Result<Self, DomainError> {
        if name.is_empty() {
            return Err(DomainError::InvalidPositionName(String::from(
                "Position name cannot be empty",
            )));
        }
        if max_slots == 0 {
            return Err(DomainError::InvalidMaxSlots { max_slots });
        }
        Ok(Self {
            duty_position_id: None,
            code,
            name: name.to_string(),
            max_slots,
            required,
            display_order,
        })
    }

    /// Creates a `DutyPosition` with an existing persisted ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the field constraints of [`DutyPosition::new`]
    /// are violated.
    pub fn with_id(
        duty_position_id: i64,
        code: PositionCode,
        name: &str,
        max_slots: u32,
        required: bool,
        display_order: i32,
    ) -> Result<Self, DomainError> {
        let mut position = Self::new(code, name, max_slots, required, display_order)?;
        position.duty_position_id = Some(duty_position_id);
        Ok(position)
    }

    /// Returns the canonical numeric identifier if persisted.
    #[must_use]
    pub const fn duty_position_id(&self) -> Option<i64> {
        self.duty_position_id
    }

    /// Returns the position code.
    #[must_use]
    pub const fn code(&self) -> &PositionCode {
        &self.code
    }

    /// Returns the position name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the capacity.
    #[must_use]
    pub const fn max_slots(&self) -> u32 {
        self.max_slots
    }

    /// Returns whether the position must be filled before publish.
    #[must_use]
    pub const fn required(&self) -> bool {
        self.required
    }

    /// Returns the display order.
    #[must_use]
    pub const fn display_order(&self) -> i32 {
        self.display_order
    }
}

/// Denormalized member display data carried on assignments and overrides.
///
/// Member lookup is an external collaborator; the roster only ever needs
/// these display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// The member's canonical identifier.
    pub member_id: i64,
    /// The member's first name.
    pub first_name: String,
    /// The member's last name.
    pub last_name: String,
    /// The member's rank (display only).
    pub rank: String,
}

impl Member {
    /// Creates a new `Member`.
    #[must_use]
    pub fn new(member_id: i64, first_name: &str, last_name: &str, rank: &str) -> Self {
        Self {
            member_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            rank: rank.to_string(),
        }
    }
}

/// A week-level roster entry: one member holding one position for the whole
/// week unless overridden per night.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the assignment has not been persisted yet.
    pub assignment_id: Option<i64>,
    /// The assigned member.
    pub member: Member,
    /// The position held. Single-slot roles use the default sentinel.
    pub position: PositionCode,
    /// The assignment status.
    pub status: AssignmentStatus,
}

impl Assignment {
    /// Creates a new `Assignment` without a persisted ID, in the default
    /// `Assigned` status.
    #[must_use]
    pub const fn new(member: Member, position: PositionCode) -> Self {
        Self {
            assignment_id: None,
            member,
            position,
            status: AssignmentStatus::Assigned,
        }
    }

    /// Creates an `Assignment` with an existing persisted ID.
    #[must_use]
    pub const fn with_id(
        assignment_id: i64,
        member: Member,
        position: PositionCode,
        status: AssignmentStatus,
    ) -> Self {
        Self {
            assignment_id: Some(assignment_id),
            member,
            position,
            status,
        }
    }
}

/// The delta applied by a night override.
///
/// The shape invariants (replace/remove require a base member, replace/add
/// require an incoming member) are carried by the variant itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "override_type", rename_all = "snake_case")]
pub enum OverrideAction {
    /// Swap a named base member for another member, this night only.
    Replace {
        /// The base member being replaced.
        base_member_id: i64,
        /// The incoming member.
        member: Member,
    },
    /// Add an extra member beyond the base roster, this night only.
    Add {
        /// The incoming member.
        member: Member,
    },
    /// Drop a named base member, this night only.
    Remove {
        /// The base member being dropped.
        base_member_id: i64,
    },
}

impl OverrideAction {
    /// Returns the wire name of this override type.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Replace { .. } => "replace",
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
        }
    }

    /// Returns the targeted base member, if this action targets one.
    #[must_use]
    pub const fn base_member_id(&self) -> Option<i64> {
        match self {
            Self::Replace { base_member_id, .. } | Self::Remove { base_member_id } => {
                Some(*base_member_id)
            }
            Self::Add { .. } => None,
        }
    }

    /// Returns the incoming member, if this action brings one in.
    #[must_use]
    pub const fn incoming_member(&self) -> Option<&Member> {
        match self {
            Self::Replace { member, .. } | Self::Add { member } => Some(member),
            Self::Remove { .. } => None,
        }
    }
}

/// A per-calendar-night adjustment layered on top of the base roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightOverride {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the override has not been persisted yet.
    pub override_id: Option<i64>,
    /// The calendar night this override applies to.
    pub night_date: time::Date,
    /// The position this override targets.
    pub position: PositionCode,
    /// The delta to apply.
    pub action: OverrideAction,
}

impl NightOverride {
    /// Creates a new `NightOverride` without a persisted ID.
    #[must_use]
    pub const fn new(night_date: time::Date, position: PositionCode, action: OverrideAction) -> Self {
        Self {
            override_id: None,
            night_date,
            position,
            action,
        }
    }

    /// Creates a `NightOverride` with an existing persisted ID.
    #[must_use]
    pub const fn with_id(
        override_id: i64,
        night_date: time::Date,
        position: PositionCode,
        action: OverrideAction,
    ) -> Self {
        Self {
            override_id: Some(override_id),
            night_date,
            position,
            action,
        }
    }
}
