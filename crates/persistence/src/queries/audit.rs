// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event lookups and timelines.

use diesel::prelude::*;
use diesel::SqliteConnection;
use duty_roster_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use duty_roster_domain::parse_iso_date;

use crate::data_models::{ActionData, ActorData, AuditEventRow, CauseData, StateSnapshotData};
use crate::diesel_schema;
use crate::error::PersistenceError;

/// Fetches a single audit event by ID.
///
/// # Errors
///
/// Returns `PersistenceError::EventNotFound` if no event has the ID.
pub fn get_audit_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<AuditEvent, PersistenceError> {
    let row: Option<AuditEventRow> = diesel_schema::audit_events::table
        .filter(diesel_schema::audit_events::event_id.eq(event_id))
        .select((
            diesel_schema::audit_events::event_id,
            diesel_schema::audit_events::duty_role_code,
            diesel_schema::audit_events::week_start,
            diesel_schema::audit_events::actor_json,
            diesel_schema::audit_events::cause_json,
            diesel_schema::audit_events::action_json,
            diesel_schema::audit_events::before_snapshot_json,
            diesel_schema::audit_events::after_snapshot_json,
        ))
        .first(conn)
        .optional()?;

    row.map_or_else(
        || Err(PersistenceError::EventNotFound(event_id)),
        row_to_event,
    )
}

/// Fetches the audit timeline for a schedule scope, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is corrupt.
pub fn get_audit_timeline(
    conn: &mut SqliteConnection,
    duty_role_code: &str,
    week_start: &str,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = diesel_schema::audit_events::table
        .filter(diesel_schema::audit_events::duty_role_code.eq(duty_role_code))
        .filter(diesel_schema::audit_events::week_start.eq(week_start))
        .order(diesel_schema::audit_events::event_id.asc())
        .select((
            diesel_schema::audit_events::event_id,
            diesel_schema::audit_events::duty_role_code,
            diesel_schema::audit_events::week_start,
            diesel_schema::audit_events::actor_json,
            diesel_schema::audit_events::cause_json,
            diesel_schema::audit_events::action_json,
            diesel_schema::audit_events::before_snapshot_json,
            diesel_schema::audit_events::after_snapshot_json,
        ))
        .load(conn)?;

    rows.into_iter().map(row_to_event).collect()
}

/// Converts an audit event row back to an `AuditEvent`.
fn row_to_event(row: AuditEventRow) -> Result<AuditEvent, PersistenceError> {
    let (
        event_id,
        duty_role_code,
        week_start,
        actor_json,
        cause_json,
        action_json,
        before_json,
        after_json,
    ) = row;

    let actor: ActorData = serde_json::from_str(&actor_json)?;
    let cause: CauseData = serde_json::from_str(&cause_json)?;
    let action: ActionData = serde_json::from_str(&action_json)?;
    let before: StateSnapshotData = serde_json::from_str(&before_json)?;
    let after: StateSnapshotData = serde_json::from_str(&after_json)?;

    let week_start: Option<time::Date> = week_start
        .map(|s| {
            parse_iso_date(&s).map_err(|e| PersistenceError::CorruptRow {
                table: String::from("audit_events"),
                message: e.to_string(),
            })
        })
        .transpose()?;

    Ok(AuditEvent::new(
        Actor::new(actor.id, actor.actor_type),
        Cause::new(cause.id, cause.description),
        Action::new(action.name, action.details),
        StateSnapshot::new(before.data),
        StateSnapshot::new(after.data),
        duty_role_code,
        week_start,
    )
    .with_event_id(event_id))
}
