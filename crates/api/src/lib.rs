// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod request_response;

#[cfg(test)]
mod tests;

use duty_roster::{
    CatalogMetadata, CatalogResult, Command, State, TransitionResult, apply, apply_catalog,
};
use duty_roster_audit::{Actor, AuditEvent, Cause};
use duty_roster_domain::{
    AssignmentStatus, DutyRole, Member, OverrideAction, PositionCode, evaluate_publish_readiness,
    parse_iso_date, resolve_base, resolve_night,
};
use std::str::FromStr;
use tracing::debug;

pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use request_response::{
    AddOverrideRequest, AddOverrideResponse, AssignMemberRequest, AssignMemberResponse,
    AssignmentMutationResponse, CreateDutyPositionRequest, CreateDutyPositionResponse,
    CreateDutyRoleRequest, CreateDutyRoleResponse, DeleteAssignmentRequest, DutyRoleView,
    LifecycleResponse, ListDutyRolesResponse, ListPositionsResponse, PositionSlotsView,
    PositionView, ReadinessResponse, RemoveOverrideRequest, RemoveOverrideResponse,
    RosterResponse, SetAssignmentStatusRequest, SlotView,
};

use request_response::roster_to_response;

/// Actor roles for authorization.
///
/// Roles determine what actions an authenticated actor may perform.
/// Roles apply only to system operators, never to unit members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: operators with structural authority.
    ///
    /// Admins may perform:
    /// - catalog changes (duty roles, positions)
    /// - every scheduling action a Scheduler may perform
    Admin,
    /// Scheduler role: operators maintaining weekly rosters.
    ///
    /// Schedulers may:
    /// - assign and release members
    /// - manage night overrides
    /// - publish and revert schedules
    ///
    /// Schedulers are not unit members. They are trusted operators entering
    /// roster data on behalf of the unit.
    Scheduler,
}

/// An authenticated actor with an associated role.
///
/// This represents a system operator who has been authenticated and
/// has permission to perform certain actions based on their role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this authenticated actor into an audit Actor.
    ///
    /// This is used when recording audit events to attribute actions
    /// to the authenticated operator.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        let actor_type: String = match self.role {
            Role::Admin => String::from("admin"),
            Role::Scheduler => String::from("scheduler"),
        };
        Actor::new(self.id.clone(), actor_type)
    }
}

/// Stub authentication function.
///
/// This is a minimal placeholder: real authentication is an external
/// collaborator. In a full deployment this would validate credentials,
/// check tokens, or integrate with an identity provider.
///
/// # Arguments
///
/// * `actor_id` - The identifier of the actor to authenticate
/// * `role` - The role to assign to the actor
///
/// # Returns
///
/// An authenticated actor if successful.
///
/// # Errors
///
/// Returns an error if authentication fails.
pub fn authenticate_stub(actor_id: String, role: Role) -> Result<AuthenticatedActor, AuthError> {
    if actor_id.is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("Actor ID cannot be empty"),
        });
    }
    Ok(AuthenticatedActor::new(actor_id, role))
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor is authorized to change the duty catalog.
    ///
    /// Only Admin actors may create duty roles and positions.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_catalog(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Scheduler => Err(AuthError::Unauthorized {
                action: String::from("manage_catalog"),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if an actor is authorized to edit rosters.
    ///
    /// Admin and Scheduler actors may edit rosters.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor holds neither role.
    pub const fn authorize_edit_roster(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin | Role::Scheduler => Ok(()),
        }
    }
}

/// The result of an API operation that includes both the response and the
/// audit event.
///
/// This ensures that successful API operations always produce an audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResult<T> {
    /// The API response.
    pub response: T,
    /// The audit event generated by this operation.
    pub audit_event: AuditEvent,
    /// The new state after the operation.
    pub new_state: State,
}

/// Creates a new duty role via the API boundary with authorization.
///
/// # Arguments
///
/// * `metadata` - The current catalog metadata
/// * `request` - The API request
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The role code is invalid or already exists
pub fn create_duty_role(
    metadata: &CatalogMetadata,
    request: &CreateDutyRoleRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<(CatalogResult, CreateDutyRoleResponse), ApiError> {
    AuthorizationService::authorize_manage_catalog(authenticated_actor)?;

    let command: Command = Command::CreateDutyRole {
        code: request.code.clone(),
        name: request.name.clone(),
        display_order: request.display_order,
    };

    let result: CatalogResult = apply_catalog(
        metadata,
        command,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    debug!(code = %request.code, "Created duty role");

    let code: String = result.audit_event.duty_role_code.clone();
    let response: CreateDutyRoleResponse = CreateDutyRoleResponse {
        message: format!("Created duty role '{code}'"),
        code,
    };

    Ok((result, response))
}

/// Creates a new duty position via the API boundary with authorization.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The duty role does not exist
/// - The position is invalid or already exists
pub fn create_duty_position(
    metadata: &CatalogMetadata,
    request: &CreateDutyPositionRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<(CatalogResult, CreateDutyPositionResponse), ApiError> {
    AuthorizationService::authorize_manage_catalog(authenticated_actor)?;

    let duty_role: DutyRole = find_duty_role(metadata, &request.duty_role)?;
    let code: PositionCode = PositionCode::new(&request.code);

    let command: Command = Command::CreateDutyPosition {
        duty_role: duty_role.clone(),
        code: code.clone(),
        name: request.name.clone(),
        max_slots: request.max_slots,
        required: request.required,
        display_order: request.display_order,
    };

    let result: CatalogResult = apply_catalog(
        metadata,
        command,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    debug!(duty_role = %duty_role.code(), code = %code, "Created duty position");

    let response: CreateDutyPositionResponse = CreateDutyPositionResponse {
        duty_role: duty_role.code().to_string(),
        message: format!(
            "Created position '{}' in duty role '{}'",
            code,
            duty_role.code()
        ),
        code: code.value().to_string(),
    };

    Ok((result, response))
}

/// Adds a member to the base roster via the API boundary.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized
/// - The position does not exist, is full, or the member is already assigned
pub fn assign_member(
    metadata: &CatalogMetadata,
    state: &State,
    request: &AssignMemberRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<AssignMemberResponse>, ApiError> {
    AuthorizationService::authorize_edit_roster(authenticated_actor)?;

    let position: PositionCode = parse_position(request.position.as_deref());
    let member: Member = Member::new(
        request.member_id,
        &request.first_name,
        &request.last_name,
        &request.rank,
    );

    let command: Command = Command::AssignMember {
        member,
        position: position.clone(),
    };

    let result: TransitionResult = apply(
        metadata,
        state,
        command,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let response: AssignMemberResponse = AssignMemberResponse {
        member_id: request.member_id,
        position: position.value().to_string(),
        message: format!(
            "Assigned member {} to position '{position}'",
            request.member_id
        ),
    };

    Ok(ApiResult {
        response,
        audit_event: result.audit_event,
        new_state: result.new_state,
    })
}

/// Hard-deletes a base assignment via the API boundary. Draft only.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, the assignment does not
/// exist, or the schedule is published.
pub fn delete_assignment(
    metadata: &CatalogMetadata,
    state: &State,
    request: &DeleteAssignmentRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<AssignmentMutationResponse>, ApiError> {
    AuthorizationService::authorize_edit_roster(authenticated_actor)?;

    let command: Command = Command::DeleteAssignment {
        assignment_id: request.assignment_id,
    };

    let result: TransitionResult = apply(
        metadata,
        state,
        command,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let response: AssignmentMutationResponse = AssignmentMutationResponse {
        assignment_id: request.assignment_id,
        message: format!("Deleted assignment {}", request.assignment_id),
    };

    Ok(ApiResult {
        response,
        audit_event: result.audit_event,
        new_state: result.new_state,
    })
}

/// Toggles an assignment's status via the API boundary.
///
/// This is the mark-unfilled / mark-filled flow and works in both lifecycle
/// states.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, the status string is
/// invalid, or the assignment does not exist.
pub fn set_assignment_status(
    metadata: &CatalogMetadata,
    state: &State,
    request: &SetAssignmentStatusRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<AssignmentMutationResponse>, ApiError> {
    AuthorizationService::authorize_edit_roster(authenticated_actor)?;

    let status: AssignmentStatus =
        AssignmentStatus::from_str(&request.status).map_err(translate_domain_error)?;

    let command: Command = Command::SetAssignmentStatus {
        assignment_id: request.assignment_id,
        status,
    };

    let result: TransitionResult = apply(
        metadata,
        state,
        command,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let response: AssignmentMutationResponse = AssignmentMutationResponse {
        assignment_id: request.assignment_id,
        message: format!(
            "Assignment {} marked {status}",
            request.assignment_id
        ),
    };

    Ok(ApiResult {
        response,
        audit_event: result.audit_event,
        new_state: result.new_state,
    })
}

/// Adds a night override via the API boundary.
///
/// The override shape rules are enforced here: `replace`/`remove` require
/// `base_member_id`, `replace`/`add` require the incoming member fields.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, the request shape is
/// invalid, or the override violates domain rules.
pub fn add_override(
    metadata: &CatalogMetadata,
    state: &State,
    request: &AddOverrideRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<AddOverrideResponse>, ApiError> {
    AuthorizationService::authorize_edit_roster(authenticated_actor)?;

    let night_date: time::Date =
        parse_iso_date(&request.night_date).map_err(translate_domain_error)?;
    let position: PositionCode = parse_position(request.position.as_deref());
    let action: OverrideAction = parse_override_action(request)?;
    let override_type: String = action.kind().to_string();

    let command: Command = Command::AddNightOverride {
        night_date,
        position: position.clone(),
        action,
    };

    let result: TransitionResult = apply(
        metadata,
        state,
        command,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let response: AddOverrideResponse = AddOverrideResponse {
        night_date: night_date.to_string(),
        position: position.value().to_string(),
        message: format!(
            "Added {override_type} override for '{position}' on {night_date}"
        ),
        override_type,
    };

    Ok(ApiResult {
        response,
        audit_event: result.audit_event,
        new_state: result.new_state,
    })
}

/// Removes a night override via the API boundary.
///
/// # Errors
///
/// Returns an error if the actor is not authorized or the override does not
/// exist.
pub fn remove_override(
    metadata: &CatalogMetadata,
    state: &State,
    request: &RemoveOverrideRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<RemoveOverrideResponse>, ApiError> {
    AuthorizationService::authorize_edit_roster(authenticated_actor)?;

    let command: Command = Command::RemoveNightOverride {
        override_id: request.override_id,
    };

    let result: TransitionResult = apply(
        metadata,
        state,
        command,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let response: RemoveOverrideResponse = RemoveOverrideResponse {
        override_id: request.override_id,
        message: format!("Removed override {}", request.override_id),
    };

    Ok(ApiResult {
        response,
        audit_event: result.audit_event,
        new_state: result.new_state,
    })
}

/// Publishes a draft schedule via the API boundary.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, the schedule is not a
/// draft, or required positions are unfilled.
pub fn publish_schedule(
    metadata: &CatalogMetadata,
    state: &State,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<LifecycleResponse>, ApiError> {
    AuthorizationService::authorize_edit_roster(authenticated_actor)?;

    let result: TransitionResult = apply(
        metadata,
        state,
        Command::PublishSchedule,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let response: LifecycleResponse = lifecycle_response(&result.new_state, "Published");

    Ok(ApiResult {
        response,
        audit_event: result.audit_event,
        new_state: result.new_state,
    })
}

/// Reverts a published schedule to draft via the API boundary.
///
/// # Errors
///
/// Returns an error if the actor is not authorized or the schedule is not
/// published.
pub fn revert_schedule(
    metadata: &CatalogMetadata,
    state: &State,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<LifecycleResponse>, ApiError> {
    AuthorizationService::authorize_edit_roster(authenticated_actor)?;

    let result: TransitionResult = apply(
        metadata,
        state,
        Command::RevertToDraft,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let response: LifecycleResponse = lifecycle_response(&result.new_state, "Reverted");

    Ok(ApiResult {
        response,
        audit_event: result.audit_event,
        new_state: result.new_state,
    })
}

/// Resolves the base (week) roster view. No overrides applied, no audit
/// event.
#[must_use]
pub fn base_roster(state: &State) -> RosterResponse {
    let roster = resolve_base(&state.assignments);
    roster_to_response(
        state.duty_role.code(),
        state.week.week_start(),
        None,
        state.status,
        &roster,
    )
}

/// Resolves the effective roster view for one night.
///
/// # Errors
///
/// Returns an error if the night date string is not a valid date.
pub fn night_roster(state: &State, night_date: &str) -> Result<RosterResponse, ApiError> {
    let night: time::Date = parse_iso_date(night_date).map_err(translate_domain_error)?;
    let roster = resolve_night(&state.assignments, &state.overrides, night);
    Ok(roster_to_response(
        state.duty_role.code(),
        state.week.week_start(),
        Some(night),
        state.status,
        &roster,
    ))
}

/// Evaluates publish readiness for a schedule.
///
/// # Errors
///
/// Returns an error if the schedule's duty role is not in the catalog.
pub fn publish_readiness(
    metadata: &CatalogMetadata,
    state: &State,
) -> Result<ReadinessResponse, ApiError> {
    let duty_role: DutyRole = find_duty_role(metadata, state.duty_role.code())?;
    let positions = metadata.positions_for(&duty_role);
    let readiness =
        evaluate_publish_readiness(&positions, &resolve_base(&state.assignments));
    Ok(ReadinessResponse {
        can_publish: readiness.can_publish(),
        missing_required: readiness.missing_required,
        over_capacity: readiness.over_capacity,
    })
}

/// Lists all duty roles, in display order.
#[must_use]
pub fn list_duty_roles(metadata: &CatalogMetadata) -> ListDutyRolesResponse {
    let mut duty_roles: Vec<DutyRoleView> = metadata
        .duty_roles
        .iter()
        .map(|role| DutyRoleView {
            code: role.code().to_string(),
            name: role.name().to_string(),
            display_order: role.display_order(),
        })
        .collect();
    duty_roles.sort_by_key(|role| role.display_order);
    ListDutyRolesResponse { duty_roles }
}

/// Lists a duty role's positions, ordered by display order.
///
/// # Errors
///
/// Returns an error if the duty role does not exist.
pub fn list_positions(
    metadata: &CatalogMetadata,
    duty_role_code: &str,
) -> Result<ListPositionsResponse, ApiError> {
    let duty_role: DutyRole = find_duty_role(metadata, duty_role_code)?;
    let positions: Vec<PositionView> = metadata
        .positions_for(&duty_role)
        .iter()
        .map(|position| PositionView {
            code: position.code().value().to_string(),
            name: position.name().to_string(),
            max_slots: position.max_slots(),
            required: position.required(),
            display_order: position.display_order(),
        })
        .collect();
    Ok(ListPositionsResponse {
        duty_role: duty_role.code().to_string(),
        positions,
    })
}

/// Looks up a duty role in the catalog by code.
fn find_duty_role(metadata: &CatalogMetadata, code: &str) -> Result<DutyRole, ApiError> {
    let normalized: String = code.to_uppercase();
    metadata
        .duty_roles
        .iter()
        .find(|role| role.code() == normalized)
        .cloned()
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Duty role"),
            message: format!("Duty role '{normalized}' does not exist"),
        })
}

/// Maps an optional position string to a code, defaulting single-slot roles
/// to the reserved sentinel.
fn parse_position(position: Option<&str>) -> PositionCode {
    match position {
        Some(code) if !code.is_empty() => PositionCode::new(code),
        _ => PositionCode::default_slot(),
    }
}

/// Builds an override action from the request, enforcing the shape rules.
fn parse_override_action(request: &AddOverrideRequest) -> Result<OverrideAction, ApiError> {
    let incoming_member = || -> Result<Member, ApiError> {
        let member_id: i64 = request.member_id.ok_or_else(|| ApiError::InvalidInput {
            field: String::from("member_id"),
            message: format!(
                "Override type '{}' requires an incoming member",
                request.override_type
            ),
        })?;
        Ok(Member::new(
            member_id,
            request.first_name.as_deref().unwrap_or(""),
            request.last_name.as_deref().unwrap_or(""),
            request.rank.as_deref().unwrap_or(""),
        ))
    };

    let base_member_id = || -> Result<i64, ApiError> {
        request.base_member_id.ok_or_else(|| ApiError::InvalidInput {
            field: String::from("base_member_id"),
            message: format!(
                "Override type '{}' requires a base member",
                request.override_type
            ),
        })
    };

    match request.override_type.as_str() {
        "replace" => Ok(OverrideAction::Replace {
            base_member_id: base_member_id()?,
            member: incoming_member()?,
        }),
        "add" => Ok(OverrideAction::Add {
            member: incoming_member()?,
        }),
        "remove" => Ok(OverrideAction::Remove {
            base_member_id: base_member_id()?,
        }),
        other => Err(ApiError::InvalidInput {
            field: String::from("override_type"),
            message: format!("Unknown override type: {other}"),
        }),
    }
}

/// Builds a lifecycle response from the new state.
fn lifecycle_response(state: &State, verb: &str) -> LifecycleResponse {
    LifecycleResponse {
        duty_role: state.duty_role.code().to_string(),
        week_start: state.week.week_start().to_string(),
        status: state.status.to_string(),
        message: format!(
            "{verb} {} schedule for week {}",
            state.duty_role.code(),
            state.week.week_start()
        ),
    }
}
