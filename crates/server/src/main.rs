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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use duty_roster::{CatalogMetadata, State, TransitionResult};
use duty_roster_api::{
    AddOverrideRequest, ApiError, ApiResult, AssignMemberRequest, AuthenticatedActor,
    CreateDutyPositionRequest, CreateDutyRoleRequest, DeleteAssignmentRequest,
    ListDutyRolesResponse, ListPositionsResponse, ReadinessResponse, RemoveOverrideRequest,
    Role, RosterResponse, SetAssignmentStatusRequest, add_override, assign_member,
    authenticate_stub, base_roster, create_duty_position, create_duty_role, delete_assignment,
    list_duty_roles, list_positions, night_roster, publish_readiness, publish_schedule,
    remove_override, revert_schedule, set_assignment_status,
};
use duty_roster_audit::{AuditEvent, Cause};
use duty_roster_domain::{
    DomainError, OperationalConfig, ScheduleWeek, evaluate_publish_readiness,
    is_duty_watch_night, operational_date, operational_week, parse_iso_date, resolve_base,
};
use duty_roster_persistence::{Persistence, PersistenceError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Duty Roster Server - HTTP server for the Duty Roster System
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// IANA timezone for operational-date calculations
    #[arg(short, long, default_value = duty_roster_domain::DEFAULT_TIMEZONE)]
    timezone: String,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access, plus the operational-date configuration.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for the catalog, schedules, and audit events.
    persistence: Arc<Mutex<Persistence>>,
    /// Operational-date configuration (timezone, rollover hour).
    operational: OperationalConfig,
}

/// API request for creating a duty role.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateDutyRoleApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The duty role code (e.g. "DDS", "`DUTY_WATCH`").
    code: String,
    /// Human-readable role name.
    name: String,
    /// Ordering hint for catalog listings.
    display_order: i32,
}

/// API request for creating a duty position.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateDutyPositionApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The duty role code this position belongs to.
    duty_role: String,
    /// The position code.
    code: String,
    /// Human-readable position name.
    name: String,
    /// Capacity (at least 1).
    max_slots: u32,
    /// Whether the position must be filled before publish.
    required: bool,
    /// Stable ordering for roster views.
    display_order: i32,
}

/// API request for assigning a member to the base roster.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct AssignMemberApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The duty role code.
    duty_role: String,
    /// The week start date (ISO 8601 Monday).
    week_start: String,
    /// The member's canonical identifier.
    member_id: i64,
    /// The member's first name.
    first_name: String,
    /// The member's last name.
    last_name: String,
    /// The member's rank.
    rank: String,
    /// The position code. Omit for single-slot roles.
    position: Option<String>,
}

/// API request for deleting a base assignment.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct DeleteAssignmentApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The duty role code.
    duty_role: String,
    /// The week start date (ISO 8601 Monday).
    week_start: String,
    /// The assignment to delete.
    assignment_id: i64,
}

/// API request for toggling an assignment's status.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SetAssignmentStatusApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The duty role code.
    duty_role: String,
    /// The week start date (ISO 8601 Monday).
    week_start: String,
    /// The assignment to update.
    assignment_id: i64,
    /// The new status ("assigned", "confirmed", "released").
    status: String,
}

/// API request for adding a night override.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct AddOverrideApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The duty role code.
    duty_role: String,
    /// The week start date (ISO 8601 Monday).
    week_start: String,
    /// The calendar night (ISO 8601 date).
    night_date: String,
    /// The position code. Omit for single-slot roles.
    position: Option<String>,
    /// The override type ("replace", "add", "remove").
    override_type: String,
    /// The targeted base member (replace/remove).
    base_member_id: Option<i64>,
    /// The incoming member (replace/add).
    member_id: Option<i64>,
    /// The incoming member's first name.
    first_name: Option<String>,
    /// The incoming member's last name.
    last_name: Option<String>,
    /// The incoming member's rank.
    rank: Option<String>,
}

/// API request for removing a night override.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RemoveOverrideApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The duty role code.
    duty_role: String,
    /// The week start date (ISO 8601 Monday).
    week_start: String,
    /// The override to remove.
    override_id: i64,
}

/// API request for publish and revert operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct LifecycleApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The duty role code.
    duty_role: String,
    /// The week start date (ISO 8601 Monday).
    week_start: String,
}

/// API response for write operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WriteResponse {
    /// Success indicator.
    success: bool,
    /// Optional message.
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    /// The event ID of the persisted audit event.
    #[serde(skip_serializing_if = "Option::is_none")]
    event_id: Option<i64>,
}

/// Query parameters for roster views.
#[derive(Debug, Deserialize)]
struct RosterQuery {
    /// The duty role code.
    duty_role: String,
    /// The week start date (ISO 8601 Monday).
    week_start: String,
}

/// Query parameters for the night roster view.
#[derive(Debug, Deserialize)]
struct NightRosterQuery {
    /// The duty role code.
    duty_role: String,
    /// The week start date (ISO 8601 Monday).
    week_start: String,
    /// The night date (ISO 8601).
    night_date: String,
}

/// Query parameters for tonight's roster.
#[derive(Debug, Deserialize)]
struct TonightQuery {
    /// The duty role code.
    duty_role: String,
}

/// Query parameters for listing positions.
#[derive(Debug, Deserialize)]
struct PositionsQuery {
    /// The duty role code.
    duty_role: String,
}

/// Query parameters for listing a week's schedules.
#[derive(Debug, Deserialize)]
struct SchedulesQuery {
    /// The week start date (ISO 8601 Monday).
    week_start: String,
}

/// API response for tonight's roster.
#[derive(Debug, Clone, Serialize)]
struct TonightApiResponse {
    /// The operational date (3 a.m. rollover applied).
    operational_date: String,
    /// Whether tonight is a Duty Watch night (Tuesday/Thursday).
    is_duty_watch_night: bool,
    /// The resolved roster for tonight.
    roster: RosterResponse,
}

/// Summary of one schedule in a week listing.
#[derive(Debug, Clone, Serialize)]
struct ScheduleSummary {
    /// The duty role code.
    duty_role: String,
    /// The schedule status.
    status: String,
    /// Count of active base slots.
    active_count: usize,
    /// Required positions with zero active assignments.
    missing_required: Vec<String>,
}

/// API response for a week's schedule listing.
#[derive(Debug, Clone, Serialize)]
struct SchedulesApiResponse {
    /// The week start date (ISO 8601 Monday).
    week_start: String,
    /// The week's schedules, in duty role display order.
    schedules: Vec<ScheduleSummary>,
}

/// Serializable representation of an `AuditEvent` for JSON responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuditEventResponse {
    /// The event ID.
    event_id: Option<i64>,
    /// The actor ID.
    actor_id: String,
    /// The actor type.
    actor_type: String,
    /// The cause ID.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The action name.
    action_name: String,
    /// Optional action details.
    action_details: Option<String>,
    /// State before the transition.
    before_snapshot: String,
    /// State after the transition.
    after_snapshot: String,
    /// The duty role scope.
    duty_role: String,
    /// The week scope (absent for catalog events).
    week_start: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthenticationFailed { .. } => Self {
                status: StatusCode::UNAUTHORIZED,
                message: err.to_string(),
            },
            ApiError::Unauthorized { .. } => Self {
                status: StatusCode::FORBIDDEN,
                message: err.to_string(),
            },
            ApiError::DomainRuleViolation { .. } => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: err.to_string(),
            },
            ApiError::InvalidInput { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            ApiError::ResourceNotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ApiError::Internal { .. } => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: err.to_string(),
            },
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        if matches!(
            err,
            PersistenceError::NotFound(_) | PersistenceError::EventNotFound(_)
        ) {
            return Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            };
        }
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
        }
    }
}

/// Parses a role string into a Role enum.
fn parse_role(role_str: &str) -> Result<Role, HttpError> {
    match role_str.to_lowercase().as_str() {
        "admin" => Ok(Role::Admin),
        "scheduler" => Ok(Role::Scheduler),
        _ => Err(HttpError {
            status: StatusCode::BAD_REQUEST,
            message: format!("Invalid role: '{role_str}'. Must be 'admin' or 'scheduler'"),
        }),
    }
}

/// Authenticates an actor from request fields.
fn authenticate(actor_id: &str, actor_role: &str) -> Result<AuthenticatedActor, HttpError> {
    let role: Role = parse_role(actor_role)?;
    authenticate_stub(actor_id.to_string(), role).map_err(|e| HttpError {
        status: StatusCode::UNAUTHORIZED,
        message: e.to_string(),
    })
}

/// Parses a week start string into a validated schedule week.
fn parse_week(week_start: &str) -> Result<ScheduleWeek, HttpError> {
    let date = parse_iso_date(week_start).map_err(domain_input_error)?;
    ScheduleWeek::from_monday(date).map_err(domain_input_error)
}

/// Maps a domain parse/validation error to a 400 response.
fn domain_input_error(err: DomainError) -> HttpError {
    HttpError {
        status: StatusCode::BAD_REQUEST,
        message: err.to_string(),
    }
}

/// Loads the catalog metadata and scoped schedule state for a request.
async fn load_metadata_and_state(
    app_state: &AppState,
    duty_role: &str,
    week: ScheduleWeek,
) -> Result<(CatalogMetadata, State), HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let metadata: CatalogMetadata = persistence.get_catalog_metadata()?;
    let state: State = persistence.get_current_state(duty_role, week)?;
    drop(persistence);
    Ok((metadata, state))
}

/// Persists a transition built from an API result.
async fn persist_api_result<T>(
    app_state: &AppState,
    result: &ApiResult<T>,
) -> Result<i64, HttpError> {
    let transition: TransitionResult = TransitionResult {
        new_state: result.new_state.clone(),
        audit_event: result.audit_event.clone(),
    };
    let mut persistence = app_state.persistence.lock().await;
    let event_id: i64 = persistence.persist_transition(&transition)?;
    drop(persistence);
    Ok(event_id)
}

/// Handler for POST `/duty_roles` endpoint.
///
/// Creates a new duty role in the catalog.
async fn handle_create_duty_role(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateDutyRoleApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        code = %req.code,
        "Handling create_duty_role request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let mut persistence = app_state.persistence.lock().await;
    let metadata: CatalogMetadata = persistence.get_catalog_metadata()?;
    drop(persistence);

    let request: CreateDutyRoleRequest = CreateDutyRoleRequest {
        code: req.code,
        name: req.name,
        display_order: req.display_order,
    };

    let (result, response) = create_duty_role(&metadata, &request, &actor, cause)?;

    let mut persistence = app_state.persistence.lock().await;
    let event_id: i64 = persistence.persist_catalog(&result)?;
    drop(persistence);

    info!(event_id, code = %response.code, "Successfully created duty role");

    Ok(Json(WriteResponse {
        success: true,
        message: Some(response.message),
        event_id: Some(event_id),
    }))
}

/// Handler for GET `/duty_roles` endpoint.
///
/// Lists all duty roles.
async fn handle_list_duty_roles(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListDutyRolesResponse>, HttpError> {
    info!("Handling list_duty_roles request");

    let mut persistence = app_state.persistence.lock().await;
    let metadata: CatalogMetadata = persistence.get_catalog_metadata()?;
    drop(persistence);

    Ok(Json(list_duty_roles(&metadata)))
}

/// Handler for POST `/duty_positions` endpoint.
///
/// Creates a new position within a duty role.
async fn handle_create_duty_position(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateDutyPositionApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        duty_role = %req.duty_role,
        code = %req.code,
        "Handling create_duty_position request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let mut persistence = app_state.persistence.lock().await;
    let metadata: CatalogMetadata = persistence.get_catalog_metadata()?;
    drop(persistence);

    let request: CreateDutyPositionRequest = CreateDutyPositionRequest {
        duty_role: req.duty_role,
        code: req.code,
        name: req.name,
        max_slots: req.max_slots,
        required: req.required,
        display_order: req.display_order,
    };

    let (result, response) = create_duty_position(&metadata, &request, &actor, cause)?;

    let mut persistence = app_state.persistence.lock().await;
    let event_id: i64 = persistence.persist_catalog(&result)?;
    drop(persistence);

    info!(
        event_id,
        duty_role = %response.duty_role,
        code = %response.code,
        "Successfully created duty position"
    );

    Ok(Json(WriteResponse {
        success: true,
        message: Some(response.message),
        event_id: Some(event_id),
    }))
}

/// Handler for GET `/duty_positions` endpoint.
///
/// Lists the positions of a duty role.
async fn handle_list_duty_positions(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<PositionsQuery>,
) -> Result<Json<ListPositionsResponse>, HttpError> {
    info!(duty_role = %query.duty_role, "Handling list_duty_positions request");

    let mut persistence = app_state.persistence.lock().await;
    let metadata: CatalogMetadata = persistence.get_catalog_metadata()?;
    drop(persistence);

    Ok(Json(list_positions(&metadata, &query.duty_role)?))
}

/// Handler for POST `/assign_member` endpoint.
///
/// Adds a member to the base roster.
async fn handle_assign_member(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AssignMemberApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        duty_role = %req.duty_role,
        week_start = %req.week_start,
        member_id = req.member_id,
        "Handling assign_member request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let week: ScheduleWeek = parse_week(&req.week_start)?;

    let (metadata, state) = load_metadata_and_state(&app_state, &req.duty_role, week).await?;

    let request: AssignMemberRequest = AssignMemberRequest {
        member_id: req.member_id,
        first_name: req.first_name,
        last_name: req.last_name,
        rank: req.rank,
        position: req.position,
    };

    let result = assign_member(&metadata, &state, &request, &actor, cause)?;
    let event_id: i64 = persist_api_result(&app_state, &result).await?;

    info!(event_id, member_id = req.member_id, "Successfully assigned member");

    Ok(Json(WriteResponse {
        success: true,
        message: Some(result.response.message),
        event_id: Some(event_id),
    }))
}

/// Handler for POST `/delete_assignment` endpoint.
///
/// Hard-deletes a base assignment (draft schedules only).
async fn handle_delete_assignment(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<DeleteAssignmentApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        duty_role = %req.duty_role,
        assignment_id = req.assignment_id,
        "Handling delete_assignment request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let week: ScheduleWeek = parse_week(&req.week_start)?;

    let (metadata, state) = load_metadata_and_state(&app_state, &req.duty_role, week).await?;

    let request: DeleteAssignmentRequest = DeleteAssignmentRequest {
        assignment_id: req.assignment_id,
    };

    let result = delete_assignment(&metadata, &state, &request, &actor, cause)?;
    let event_id: i64 = persist_api_result(&app_state, &result).await?;

    info!(event_id, assignment_id = req.assignment_id, "Successfully deleted assignment");

    Ok(Json(WriteResponse {
        success: true,
        message: Some(result.response.message),
        event_id: Some(event_id),
    }))
}

/// Handler for POST `/set_assignment_status` endpoint.
///
/// Toggles an assignment's status (mark unfilled / mark filled / confirm).
async fn handle_set_assignment_status(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SetAssignmentStatusApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        duty_role = %req.duty_role,
        assignment_id = req.assignment_id,
        status = %req.status,
        "Handling set_assignment_status request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let week: ScheduleWeek = parse_week(&req.week_start)?;

    let (metadata, state) = load_metadata_and_state(&app_state, &req.duty_role, week).await?;

    let request: SetAssignmentStatusRequest = SetAssignmentStatusRequest {
        assignment_id: req.assignment_id,
        status: req.status,
    };

    let result = set_assignment_status(&metadata, &state, &request, &actor, cause)?;
    let event_id: i64 = persist_api_result(&app_state, &result).await?;

    Ok(Json(WriteResponse {
        success: true,
        message: Some(result.response.message),
        event_id: Some(event_id),
    }))
}

/// Handler for POST `/add_override` endpoint.
///
/// Layers a per-night override on the schedule.
async fn handle_add_override(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AddOverrideApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        duty_role = %req.duty_role,
        night_date = %req.night_date,
        override_type = %req.override_type,
        "Handling add_override request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let week: ScheduleWeek = parse_week(&req.week_start)?;

    let (metadata, state) = load_metadata_and_state(&app_state, &req.duty_role, week).await?;

    let request: AddOverrideRequest = AddOverrideRequest {
        night_date: req.night_date,
        position: req.position,
        override_type: req.override_type,
        base_member_id: req.base_member_id,
        member_id: req.member_id,
        first_name: req.first_name,
        last_name: req.last_name,
        rank: req.rank,
    };

    let result = add_override(&metadata, &state, &request, &actor, cause)?;
    let event_id: i64 = persist_api_result(&app_state, &result).await?;

    info!(event_id, "Successfully added override");

    Ok(Json(WriteResponse {
        success: true,
        message: Some(result.response.message),
        event_id: Some(event_id),
    }))
}

/// Handler for POST `/remove_override` endpoint.
///
/// Removes ("reverts") a night override.
async fn handle_remove_override(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RemoveOverrideApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        duty_role = %req.duty_role,
        override_id = req.override_id,
        "Handling remove_override request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let week: ScheduleWeek = parse_week(&req.week_start)?;

    let (metadata, state) = load_metadata_and_state(&app_state, &req.duty_role, week).await?;

    let request: RemoveOverrideRequest = RemoveOverrideRequest {
        override_id: req.override_id,
    };

    let result = remove_override(&metadata, &state, &request, &actor, cause)?;
    let event_id: i64 = persist_api_result(&app_state, &result).await?;

    Ok(Json(WriteResponse {
        success: true,
        message: Some(result.response.message),
        event_id: Some(event_id),
    }))
}

/// Handler for POST `/publish` endpoint.
///
/// Publishes a draft schedule.
async fn handle_publish(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LifecycleApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        duty_role = %req.duty_role,
        week_start = %req.week_start,
        "Handling publish request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let week: ScheduleWeek = parse_week(&req.week_start)?;

    let (metadata, state) = load_metadata_and_state(&app_state, &req.duty_role, week).await?;

    let result = publish_schedule(&metadata, &state, &actor, cause)?;
    let event_id: i64 = persist_api_result(&app_state, &result).await?;

    info!(event_id, "Successfully published schedule");

    Ok(Json(WriteResponse {
        success: true,
        message: Some(result.response.message),
        event_id: Some(event_id),
    }))
}

/// Handler for POST `/revert` endpoint.
///
/// Reverts a published schedule to draft.
async fn handle_revert(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LifecycleApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        duty_role = %req.duty_role,
        week_start = %req.week_start,
        "Handling revert request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let week: ScheduleWeek = parse_week(&req.week_start)?;

    let (metadata, state) = load_metadata_and_state(&app_state, &req.duty_role, week).await?;

    let result = revert_schedule(&metadata, &state, &actor, cause)?;
    let event_id: i64 = persist_api_result(&app_state, &result).await?;

    Ok(Json(WriteResponse {
        success: true,
        message: Some(result.response.message),
        event_id: Some(event_id),
    }))
}

/// Handler for GET `/roster/base` endpoint.
///
/// Returns the base (week) roster with no overrides applied.
async fn handle_base_roster(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<RosterQuery>,
) -> Result<Json<RosterResponse>, HttpError> {
    info!(
        duty_role = %query.duty_role,
        week_start = %query.week_start,
        "Handling base_roster request"
    );

    let week: ScheduleWeek = parse_week(&query.week_start)?;
    let mut persistence = app_state.persistence.lock().await;
    let state: State = persistence.get_current_state(&query.duty_role, week)?;
    drop(persistence);

    Ok(Json(base_roster(&state)))
}

/// Handler for GET `/roster/night` endpoint.
///
/// Returns the effective roster for one night, overrides applied.
async fn handle_night_roster(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<NightRosterQuery>,
) -> Result<Json<RosterResponse>, HttpError> {
    info!(
        duty_role = %query.duty_role,
        week_start = %query.week_start,
        night_date = %query.night_date,
        "Handling night_roster request"
    );

    let week: ScheduleWeek = parse_week(&query.week_start)?;
    let mut persistence = app_state.persistence.lock().await;
    let state: State = persistence.get_current_state(&query.duty_role, week)?;
    drop(persistence);

    Ok(Json(night_roster(&state, &query.night_date)?))
}

/// Handler for GET `/roster/tonight` endpoint.
///
/// Resolves tonight's roster at the current operational date.
async fn handle_tonight_roster(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<TonightQuery>,
) -> Result<Json<TonightApiResponse>, HttpError> {
    info!(duty_role = %query.duty_role, "Handling tonight_roster request");

    let now = chrono::Utc::now();
    let tonight = operational_date(now, &app_state.operational).map_err(|e| HttpError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        message: e.to_string(),
    })?;
    let week: ScheduleWeek =
        operational_week(now, &app_state.operational).map_err(|e| HttpError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        })?;

    let mut persistence = app_state.persistence.lock().await;
    let state: State = persistence.get_current_state(&query.duty_role, week)?;
    drop(persistence);

    let roster: RosterResponse = night_roster(&state, &tonight.to_string())?;

    Ok(Json(TonightApiResponse {
        operational_date: tonight.to_string(),
        is_duty_watch_night: is_duty_watch_night(tonight),
        roster,
    }))
}

/// Handler for GET `/readiness` endpoint.
///
/// Reports publish readiness for a schedule.
async fn handle_readiness(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<RosterQuery>,
) -> Result<Json<ReadinessResponse>, HttpError> {
    info!(
        duty_role = %query.duty_role,
        week_start = %query.week_start,
        "Handling readiness request"
    );

    let week: ScheduleWeek = parse_week(&query.week_start)?;
    let (metadata, state) = load_metadata_and_state(&app_state, &query.duty_role, week).await?;

    Ok(Json(publish_readiness(&metadata, &state)?))
}

/// Handler for GET `/schedules` endpoint.
///
/// Lists a week's schedules with summary counts.
async fn handle_list_schedules(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<SchedulesQuery>,
) -> Result<Json<SchedulesApiResponse>, HttpError> {
    info!(week_start = %query.week_start, "Handling list_schedules request");

    let week: ScheduleWeek = parse_week(&query.week_start)?;

    let mut persistence = app_state.persistence.lock().await;
    let metadata: CatalogMetadata = persistence.get_catalog_metadata()?;
    let mut schedules: Vec<ScheduleSummary> = Vec::new();
    for (duty_role, status) in persistence.list_schedules_for_week(week)? {
        let state: State = persistence.get_current_state(duty_role.code(), week)?;
        let roster = resolve_base(&state.assignments);
        let readiness =
            evaluate_publish_readiness(&metadata.positions_for(&duty_role), &roster);
        schedules.push(ScheduleSummary {
            duty_role: duty_role.code().to_string(),
            status: status.to_string(),
            active_count: roster.active_count,
            missing_required: readiness.missing_required,
        });
    }
    drop(persistence);

    Ok(Json(SchedulesApiResponse {
        week_start: week.week_start().to_string(),
        schedules,
    }))
}

/// Handler for GET `/audit/timeline` endpoint.
///
/// Lists a schedule's audit events, oldest first.
async fn handle_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<RosterQuery>,
) -> Result<Json<Vec<AuditEventResponse>>, HttpError> {
    info!(
        duty_role = %query.duty_role,
        week_start = %query.week_start,
        "Handling audit_timeline request"
    );

    let week: ScheduleWeek = parse_week(&query.week_start)?;
    let mut persistence = app_state.persistence.lock().await;
    let events: Vec<AuditEvent> = persistence.get_audit_timeline(&query.duty_role, week)?;
    drop(persistence);

    Ok(Json(events.iter().map(audit_event_to_response).collect()))
}

/// Handler for GET `/audit/event/{event_id}` endpoint.
///
/// Fetches a single audit event.
async fn handle_audit_event(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<AuditEventResponse>, HttpError> {
    info!(event_id, "Handling audit_event request");

    let mut persistence = app_state.persistence.lock().await;
    let event: AuditEvent = persistence.get_audit_event(event_id)?;
    drop(persistence);

    Ok(Json(audit_event_to_response(&event)))
}

/// Converts an `AuditEvent` to an `AuditEventResponse`.
fn audit_event_to_response(event: &AuditEvent) -> AuditEventResponse {
    AuditEventResponse {
        event_id: event.event_id,
        actor_id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
        cause_id: event.cause.id.clone(),
        cause_description: event.cause.description.clone(),
        action_name: event.action.name.clone(),
        action_details: event.action.details.clone(),
        before_snapshot: event.before.data.clone(),
        after_snapshot: event.after.data.clone(),
        duty_role: event.duty_role_code.clone(),
        week_start: event.week_start.map(|d| d.to_string()),
    }
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/duty_roles", post(handle_create_duty_role))
        .route("/duty_roles", get(handle_list_duty_roles))
        .route("/duty_positions", post(handle_create_duty_position))
        .route("/duty_positions", get(handle_list_duty_positions))
        .route("/assign_member", post(handle_assign_member))
        .route("/delete_assignment", post(handle_delete_assignment))
        .route("/set_assignment_status", post(handle_set_assignment_status))
        .route("/add_override", post(handle_add_override))
        .route("/remove_override", post(handle_remove_override))
        .route("/publish", post(handle_publish))
        .route("/revert", post(handle_revert))
        .route("/roster/base", get(handle_base_roster))
        .route("/roster/night", get(handle_night_roster))
        .route("/roster/tonight", get(handle_tonight_roster))
        .route("/readiness", get(handle_readiness))
        .route("/schedules", get(handle_list_schedules))
        .route("/audit/timeline", get(handle_audit_timeline))
        .route("/audit/event/{event_id}", get(handle_audit_event))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Duty Roster Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        operational: OperationalConfig {
            timezone: args.timezone,
            day_start_hour: duty_roster_domain::OPERATIONAL_DAY_START_HOUR,
        },
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use tower::ServiceExt;

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            operational: OperationalConfig::default(),
        }
    }

    async fn post_json<T: Serialize>(app: Router, uri: &str, body: &T) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn get_uri(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn duty_role_request(code: &str) -> CreateDutyRoleApiRequest {
        CreateDutyRoleApiRequest {
            actor_id: String::from("admin1"),
            actor_role: String::from("admin"),
            cause_id: String::from("bootstrap"),
            cause_description: String::from("Create duty role"),
            code: code.to_string(),
            name: String::from("Duty Watch"),
            display_order: 2,
        }
    }

    fn position_request(code: &str, max_slots: u32, required: bool) -> CreateDutyPositionApiRequest {
        CreateDutyPositionApiRequest {
            actor_id: String::from("admin1"),
            actor_role: String::from("admin"),
            cause_id: String::from("bootstrap"),
            cause_description: String::from("Create position"),
            duty_role: String::from("DUTY_WATCH"),
            code: code.to_string(),
            name: code.to_string(),
            max_slots,
            required,
            display_order: 1,
        }
    }

    fn assign_request(member_id: i64, last_name: &str) -> AssignMemberApiRequest {
        AssignMemberApiRequest {
            actor_id: String::from("sched1"),
            actor_role: String::from("scheduler"),
            cause_id: String::from("roster"),
            cause_description: String::from("Assign member"),
            duty_role: String::from("DUTY_WATCH"),
            week_start: String::from("2025-06-02"),
            member_id,
            first_name: String::from("Test"),
            last_name: last_name.to_string(),
            rank: String::from("AB"),
            position: Some(String::from("OOW")),
        }
    }

    /// Seeds a DUTY_WATCH role with a required two-slot OOW position.
    async fn seed_catalog(app: &Router) {
        let response = post_json(app.clone(), "/duty_roles", &duty_role_request("DUTY_WATCH")).await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response =
            post_json(app.clone(), "/duty_positions", &position_request("OOW", 2, true)).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_duty_role_as_admin_succeeds() {
        let app: Router = build_router(create_test_app_state());

        let response = post_json(app, "/duty_roles", &duty_role_request("DUTY_WATCH")).await;

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: WriteResponse = body_json(response).await;
        assert!(body.success);
        assert!(body.event_id.unwrap() > 0);
    }

    #[tokio::test]
    async fn test_create_duty_role_as_scheduler_is_forbidden() {
        let app: Router = build_router(create_test_app_state());

        let mut request = duty_role_request("DUTY_WATCH");
        request.actor_role = String::from("scheduler");

        let response = post_json(app, "/duty_roles", &request).await;

        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_assign_and_read_base_roster() {
        let app: Router = build_router(create_test_app_state());
        seed_catalog(&app).await;

        let response = post_json(app.clone(), "/assign_member", &assign_request(10, "Archer")).await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = get_uri(
            app,
            "/roster/base?duty_role=DUTY_WATCH&week_start=2025-06-02",
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let roster: RosterResponse = body_json(response).await;
        assert_eq!(roster.active_count, 1);
        assert_eq!(roster.positions[0].position, "OOW");
        assert_eq!(roster.positions[0].slots[0].member_id, 10);
        assert!(!roster.has_overrides);
    }

    #[tokio::test]
    async fn test_night_override_changes_only_that_night() {
        let app: Router = build_router(create_test_app_state());
        seed_catalog(&app).await;

        post_json(app.clone(), "/assign_member", &assign_request(10, "Archer")).await;

        let override_request = AddOverrideApiRequest {
            actor_id: String::from("sched1"),
            actor_role: String::from("scheduler"),
            cause_id: String::from("override"),
            cause_description: String::from("Tuesday swap"),
            duty_role: String::from("DUTY_WATCH"),
            week_start: String::from("2025-06-02"),
            night_date: String::from("2025-06-03"),
            position: Some(String::from("OOW")),
            override_type: String::from("replace"),
            base_member_id: Some(10),
            member_id: Some(12),
            first_name: Some(String::from("Casey")),
            last_name: Some(String::from("Cole")),
            rank: Some(String::from("MS")),
        };
        let response = post_json(app.clone(), "/add_override", &override_request).await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        // Tuesday shows the replacement
        let response = get_uri(
            app.clone(),
            "/roster/night?duty_role=DUTY_WATCH&week_start=2025-06-02&night_date=2025-06-03",
        )
        .await;
        let tuesday: RosterResponse = body_json(response).await;
        assert!(tuesday.has_overrides);
        assert_eq!(tuesday.positions[0].slots[0].member_id, 12);
        assert_eq!(tuesday.positions[0].slots[0].source_kind, "override-replace");

        // Thursday is untouched
        let response = get_uri(
            app,
            "/roster/night?duty_role=DUTY_WATCH&week_start=2025-06-02&night_date=2025-06-05",
        )
        .await;
        let thursday: RosterResponse = body_json(response).await;
        assert!(!thursday.has_overrides);
        assert_eq!(thursday.positions[0].slots[0].member_id, 10);
    }

    #[tokio::test]
    async fn test_publish_blocked_until_required_filled() {
        let app: Router = build_router(create_test_app_state());
        seed_catalog(&app).await;

        let publish_request = LifecycleApiRequest {
            actor_id: String::from("sched1"),
            actor_role: String::from("scheduler"),
            cause_id: String::from("publish"),
            cause_description: String::from("Publish week"),
            duty_role: String::from("DUTY_WATCH"),
            week_start: String::from("2025-06-02"),
        };

        // Empty roster: blocked
        let response = post_json(app.clone(), "/publish", &publish_request).await;
        assert_eq!(response.status(), HttpStatusCode::UNPROCESSABLE_ENTITY);

        // Readiness names the missing position
        let response = get_uri(
            app.clone(),
            "/readiness?duty_role=DUTY_WATCH&week_start=2025-06-02",
        )
        .await;
        let readiness: ReadinessResponse = body_json(response).await;
        assert!(!readiness.can_publish);
        assert_eq!(readiness.missing_required, vec![String::from("OOW")]);

        // Staff the position and publish
        post_json(app.clone(), "/assign_member", &assign_request(10, "Archer")).await;
        let response = post_json(app.clone(), "/publish", &publish_request).await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        // Schedules listing reflects the published status
        let response = get_uri(app, "/schedules?week_start=2025-06-02").await;
        let body: serde_json::Value = body_json(response).await;
        assert_eq!(body["schedules"][0]["status"], "published");
    }

    #[tokio::test]
    async fn test_week_start_must_be_monday() {
        let app: Router = build_router(create_test_app_state());
        seed_catalog(&app).await;

        let mut request = assign_request(10, "Archer");
        request.week_start = String::from("2025-06-04");

        let response = post_json(app, "/assign_member", &request).await;

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_audit_timeline_records_mutations() {
        let app: Router = build_router(create_test_app_state());
        seed_catalog(&app).await;

        post_json(app.clone(), "/assign_member", &assign_request(10, "Archer")).await;

        let response = get_uri(
            app.clone(),
            "/audit/timeline?duty_role=DUTY_WATCH&week_start=2025-06-02",
        )
        .await;
        let timeline: Vec<AuditEventResponse> = body_json(response).await;
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].action_name, "AssignMember");

        let event_id = timeline[0].event_id.unwrap();
        let response = get_uri(app, &format!("/audit/event/{event_id}")).await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let event: AuditEventResponse = body_json(response).await;
        assert_eq!(event.actor_id, "sched1");
    }

    #[tokio::test]
    async fn test_unknown_duty_role_is_not_found() {
        let app: Router = build_router(create_test_app_state());

        let response = get_uri(
            app,
            "/roster/base?duty_role=GALLEY&week_start=2025-06-02",
        )
        .await;

        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }
}
