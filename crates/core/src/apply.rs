// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{CatalogMetadata, CatalogResult, State, TransitionResult};
use duty_roster_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use duty_roster_domain::{
    Assignment, DomainError, DutyPosition, DutyRole, NightOverride, ScheduleStatus,
    evaluate_publish_readiness, resolve_base, validate_member_not_assigned, validate_new_override,
    validate_position_capacity,
};

/// Applies a catalog command to the metadata, producing new metadata and an
/// audit event.
///
/// Catalog commands (`CreateDutyRole`, `CreateDutyPosition`) operate on
/// global metadata.
///
/// # Arguments
///
/// * `metadata` - The current catalog metadata (immutable)
/// * `command` - The catalog command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Returns
///
/// * `Ok(CatalogResult)` containing the new metadata and audit event
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The command violates domain rules
/// - A non-catalog command is passed
pub fn apply_catalog(
    metadata: &CatalogMetadata,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<CatalogResult, CoreError> {
    match command {
        Command::CreateDutyRole {
            code,
            name,
            display_order,
        } => {
            if code.is_empty() {
                return Err(CoreError::DomainViolation(DomainError::InvalidDutyRoleCode(
                    String::from("Duty role code cannot be empty"),
                )));
            }

            let duty_role: DutyRole = DutyRole::new(&code, &name, display_order);

            // Check for duplicate
            if metadata.has_duty_role(&duty_role) {
                return Err(CoreError::DomainViolation(DomainError::DuplicateDutyRole(
                    duty_role.code().to_string(),
                )));
            }

            let mut new_metadata: CatalogMetadata = metadata.clone();
            new_metadata.add_duty_role(duty_role.clone());

            let before: StateSnapshot =
                StateSnapshot::new(format!("duty_roles_count={}", metadata.duty_roles.len()));
            let after: StateSnapshot = StateSnapshot::new(format!(
                "duty_roles_count={}",
                new_metadata.duty_roles.len()
            ));

            let action: Action = Action::new(
                String::from("CreateDutyRole"),
                Some(format!("Created duty role '{}'", duty_role.code())),
            );

            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                before,
                after,
                duty_role.code().to_string(),
                None,
            );

            Ok(CatalogResult {
                new_metadata,
                audit_event,
            })
        }
        Command::CreateDutyPosition {
            duty_role,
            code,
            name,
            max_slots,
            required,
            display_order,
        } => {
            // Check the duty role exists
            if !metadata.has_duty_role(&duty_role) {
                return Err(CoreError::DomainViolation(DomainError::DutyRoleNotFound(
                    duty_role.code().to_string(),
                )));
            }

            // Check for duplicate
            if metadata.has_position(&duty_role, &code) {
                return Err(CoreError::DomainViolation(DomainError::DuplicatePosition {
                    duty_role: duty_role.code().to_string(),
                    position: code.value().to_string(),
                }));
            }

            // Field constraints (name, capacity) are enforced by the constructor
            let position: DutyPosition =
                DutyPosition::new(code, &name, max_slots, required, display_order)?;

            let mut new_metadata: CatalogMetadata = metadata.clone();
            new_metadata.add_position(duty_role.clone(), position.clone());

            let before: StateSnapshot =
                StateSnapshot::new(format!("positions_count={}", metadata.positions.len()));
            let after: StateSnapshot = StateSnapshot::new(format!(
                "positions_count={}",
                new_metadata.positions.len()
            ));

            let action: Action = Action::new(
                String::from("CreateDutyPosition"),
                Some(format!(
                    "Created position '{}' in duty role '{}'",
                    position.code(),
                    duty_role.code()
                )),
            );

            let audit_event: AuditEvent = AuditEvent::new(
                actor,
                cause,
                action,
                before,
                after,
                duty_role.code().to_string(),
                None,
            );

            Ok(CatalogResult {
                new_metadata,
                audit_event,
            })
        }
        _ => Err(CoreError::Internal(String::from(
            "apply_catalog called with a schedule-scoped command",
        ))),
    }
}

/// Applies a command to the current schedule state, producing a new state
/// and audit event.
///
/// This function handles schedule-scoped commands within a
/// `(duty_role, week)` scope and enforces the lifecycle gates:
/// base deletion is draft-only, overrides and status toggles work in both
/// states, publish requires readiness.
///
/// # Arguments
///
/// * `metadata` - The catalog metadata (for validation)
/// * `state` - The current state (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new state and audit event
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The command violates domain rules
/// - The duty role or position does not exist
/// - The schedule's lifecycle status forbids the mutation
#[allow(clippy::too_many_lines)]
pub fn apply(
    metadata: &CatalogMetadata,
    state: &State,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::AssignMember { member, position } => {
            // Validate duty role exists
            if !metadata.has_duty_role(&state.duty_role) {
                return Err(CoreError::DomainViolation(DomainError::DutyRoleNotFound(
                    state.duty_role.code().to_string(),
                )));
            }

            // Validate position exists in the role's catalog
            let Some(catalog_position) = metadata
                .positions_for(&state.duty_role)
                .into_iter()
                .find(|p| p.code() == &position)
            else {
                return Err(CoreError::DomainViolation(DomainError::PositionNotFound {
                    duty_role: state.duty_role.code().to_string(),
                    position: position.value().to_string(),
                }));
            };

            validate_member_not_assigned(member.member_id, &state.assignments)?;
            validate_position_capacity(&catalog_position, &state.assignments)?;

            let action: Action = Action::new(
                String::from("AssignMember"),
                Some(format!(
                    "Assigned member {} {} to position '{}'",
                    member.first_name, member.last_name, position
                )),
            );

            let assignment: Assignment = Assignment::new(member, position);

            let before: StateSnapshot = state.to_snapshot();
            let mut new_state: State = state.clone();
            new_state.assignments.push(assignment);
            let after: StateSnapshot = new_state.to_snapshot();

            let audit_event: AuditEvent = build_event(state, actor, cause, action, before, after);

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::DeleteAssignment { assignment_id } => {
            // Hard deletion is draft-only; published schedules release instead
            if !state.status.allows_base_deletion() {
                return Err(CoreError::DomainViolation(DomainError::MutationNotAllowed {
                    action: String::from("delete an assignment"),
                    status: state.status,
                }));
            }

            let index: usize = find_assignment(state, assignment_id)?;

            let before: StateSnapshot = state.to_snapshot();
            let mut new_state: State = state.clone();
            let removed: Assignment = new_state.assignments.remove(index);
            let after: StateSnapshot = new_state.to_snapshot();

            let action: Action = Action::new(
                String::from("DeleteAssignment"),
                Some(format!(
                    "Deleted assignment {} (member {} {})",
                    assignment_id, removed.member.first_name, removed.member.last_name
                )),
            );

            let audit_event: AuditEvent = build_event(state, actor, cause, action, before, after);

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::SetAssignmentStatus {
            assignment_id,
            status,
        } => {
            // Status toggling is the release mechanism and works in both
            // lifecycle states
            let index: usize = find_assignment(state, assignment_id)?;

            let before: StateSnapshot = state.to_snapshot();
            let mut new_state: State = state.clone();
            let previous = new_state.assignments[index].status;
            new_state.assignments[index].status = status;
            let after: StateSnapshot = new_state.to_snapshot();

            let action: Action = Action::new(
                String::from("SetAssignmentStatus"),
                Some(format!(
                    "Assignment {assignment_id} status {previous} -> {status}"
                )),
            );

            let audit_event: AuditEvent = build_event(state, actor, cause, action, before, after);

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::AddNightOverride {
            night_date,
            position,
            action,
        } => {
            if !state.status.allows_override_mutations() {
                return Err(CoreError::DomainViolation(DomainError::MutationNotAllowed {
                    action: String::from("add an override"),
                    status: state.status,
                }));
            }

            let night_override: NightOverride =
                NightOverride::new(night_date, position, action);

            validate_new_override(
                &state.week,
                &night_override,
                &state.assignments,
                &state.overrides,
            )?;

            let before: StateSnapshot = state.to_snapshot();
            let mut new_state: State = state.clone();
            new_state.overrides.push(night_override.clone());
            let after: StateSnapshot = new_state.to_snapshot();

            let audit_action: Action = Action::new(
                String::from("AddNightOverride"),
                Some(format!(
                    "Added {} override for position '{}' on {}",
                    night_override.action.kind(),
                    night_override.position,
                    night_override.night_date
                )),
            );

            let audit_event: AuditEvent =
                build_event(state, actor, cause, audit_action, before, after);

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::RemoveNightOverride { override_id } => {
            let index: usize = state
                .overrides
                .iter()
                .position(|o| o.override_id == Some(override_id))
                .ok_or(CoreError::DomainViolation(DomainError::OverrideNotFound {
                    override_id,
                }))?;

            let before: StateSnapshot = state.to_snapshot();
            let mut new_state: State = state.clone();
            let removed: NightOverride = new_state.overrides.remove(index);
            let after: StateSnapshot = new_state.to_snapshot();

            let action: Action = Action::new(
                String::from("RemoveNightOverride"),
                Some(format!(
                    "Removed {} override {} for {}",
                    removed.action.kind(),
                    override_id,
                    removed.night_date
                )),
            );

            let audit_event: AuditEvent = build_event(state, actor, cause, action, before, after);

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::PublishSchedule => {
            if !state.status.can_transition_to(ScheduleStatus::Published) {
                return Err(CoreError::DomainViolation(DomainError::IllegalTransition {
                    from: state.status,
                    to: ScheduleStatus::Published,
                }));
            }

            // Publish gate: every required position needs an active assignment
            let positions = metadata.positions_for(&state.duty_role);
            let readiness =
                evaluate_publish_readiness(&positions, &resolve_base(&state.assignments));
            if !readiness.can_publish() {
                return Err(CoreError::DomainViolation(DomainError::PublishBlocked {
                    missing: readiness.missing_required,
                }));
            }

            let before: StateSnapshot = state.to_snapshot();
            let mut new_state: State = state.clone();
            new_state.status = ScheduleStatus::Published;
            let after: StateSnapshot = new_state.to_snapshot();

            let action: Action = Action::new(
                String::from("PublishSchedule"),
                Some(format!(
                    "Published {} schedule for week {}",
                    state.duty_role.code(),
                    state.week.week_start()
                )),
            );

            let audit_event: AuditEvent = build_event(state, actor, cause, action, before, after);

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::RevertToDraft => {
            if !state.status.can_transition_to(ScheduleStatus::Draft) {
                return Err(CoreError::DomainViolation(DomainError::IllegalTransition {
                    from: state.status,
                    to: ScheduleStatus::Draft,
                }));
            }

            let before: StateSnapshot = state.to_snapshot();
            let mut new_state: State = state.clone();
            new_state.status = ScheduleStatus::Draft;
            let after: StateSnapshot = new_state.to_snapshot();

            let action: Action = Action::new(
                String::from("RevertToDraft"),
                Some(format!(
                    "Reverted {} schedule for week {} to draft",
                    state.duty_role.code(),
                    state.week.week_start()
                )),
            );

            let audit_event: AuditEvent = build_event(state, actor, cause, action, before, after);

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::CreateDutyRole { .. } | Command::CreateDutyPosition { .. } => Err(
            CoreError::Internal(String::from("apply called with a catalog command")),
        ),
    }
}

/// Builds the audit event for a schedule-scoped transition.
fn build_event(
    state: &State,
    actor: Actor,
    cause: Cause,
    action: Action,
    before: StateSnapshot,
    after: StateSnapshot,
) -> AuditEvent {
    AuditEvent::new(
        actor,
        cause,
        action,
        before,
        after,
        state.duty_role.code().to_string(),
        Some(state.week.week_start()),
    )
}

/// Finds an assignment index by ID.
fn find_assignment(state: &State, assignment_id: i64) -> Result<usize, CoreError> {
    state
        .assignments
        .iter()
        .position(|a| a.assignment_id == Some(assignment_id))
        .ok_or(CoreError::DomainViolation(
            DomainError::AssignmentNotFound { assignment_id },
        ))
}
