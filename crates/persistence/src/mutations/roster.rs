// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule upsert and roster row synchronization.
//!
//! A transition's new state is written back as an ID diff against the
//! stored rows: rows whose IDs are absent from the new state are deleted,
//! rows with matching IDs are updated, and rows without IDs (new entities)
//! are inserted. Inserts receive fresh, monotonically increasing row IDs,
//! so creation order survives every sync and reads stay deterministic.

use diesel::prelude::*;
use diesel::SqliteConnection;
use duty_roster::{State, TransitionResult};
use duty_roster_domain::{Assignment, NightOverride};
use tracing::debug;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema;
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::queries::catalog::lookup_duty_role_id;

/// Persists a transition result: schedule row, assignment and override
/// synchronization, and the audit event, atomically.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `result` - The transition result to persist
///
/// # Returns
///
/// The event ID assigned to the persisted audit event.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<i64, PersistenceError> {
    conn.transaction(|conn| {
        let schedule_id: i64 = upsert_schedule(conn, &result.new_state)?;

        sync_assignments(conn, schedule_id, &result.new_state.assignments)?;
        sync_overrides(conn, schedule_id, &result.new_state.overrides)?;

        let event_id: i64 = persist_audit_event(conn, &result.audit_event)?;

        debug!(
            event_id,
            schedule_id,
            duty_role = %result.new_state.duty_role.code(),
            week_start = %result.new_state.week.week_start(),
            "Persisted transition"
        );

        Ok(event_id)
    })
}

/// Creates the schedule row on first write and keeps its status current.
fn upsert_schedule(
    conn: &mut SqliteConnection,
    state: &State,
) -> Result<i64, PersistenceError> {
    let duty_role_id: i64 = lookup_duty_role_id(conn, state.duty_role.code())?;
    let week_start: String = state.week.week_start().to_string();

    let existing: Option<i64> = diesel_schema::schedules::table
        .filter(diesel_schema::schedules::duty_role_id.eq(duty_role_id))
        .filter(diesel_schema::schedules::week_start.eq(&week_start))
        .select(diesel_schema::schedules::schedule_id)
        .first(conn)
        .optional()?;

    if let Some(schedule_id) = existing {
        diesel::update(
            diesel_schema::schedules::table
                .filter(diesel_schema::schedules::schedule_id.eq(schedule_id)),
        )
        .set(diesel_schema::schedules::status.eq(state.status.as_str()))
        .execute(conn)?;
        return Ok(schedule_id);
    }

    diesel::insert_into(diesel_schema::schedules::table)
        .values((
            diesel_schema::schedules::duty_role_id.eq(duty_role_id),
            diesel_schema::schedules::week_start.eq(&week_start),
            diesel_schema::schedules::status.eq(state.status.as_str()),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}

/// Synchronizes assignment rows with the new state via an ID diff.
fn sync_assignments(
    conn: &mut SqliteConnection,
    schedule_id: i64,
    assignments: &[Assignment],
) -> Result<(), PersistenceError> {
    let kept_ids: Vec<i64> = assignments.iter().filter_map(|a| a.assignment_id).collect();

    diesel::delete(
        diesel_schema::assignments::table
            .filter(diesel_schema::assignments::schedule_id.eq(schedule_id))
            .filter(diesel_schema::assignments::assignment_id.ne_all(&kept_ids)),
    )
    .execute(conn)?;

    for assignment in assignments {
        if let Some(assignment_id) = assignment.assignment_id {
            diesel::update(
                diesel_schema::assignments::table
                    .filter(diesel_schema::assignments::assignment_id.eq(assignment_id)),
            )
            .set((
                diesel_schema::assignments::position_code.eq(assignment.position.value()),
                diesel_schema::assignments::status.eq(assignment.status.as_str()),
            ))
            .execute(conn)?;
        } else {
            diesel::insert_into(diesel_schema::assignments::table)
                .values((
                    diesel_schema::assignments::schedule_id.eq(schedule_id),
                    diesel_schema::assignments::member_id.eq(assignment.member.member_id),
                    diesel_schema::assignments::first_name.eq(&assignment.member.first_name),
                    diesel_schema::assignments::last_name.eq(&assignment.member.last_name),
                    diesel_schema::assignments::rank.eq(&assignment.member.rank),
                    diesel_schema::assignments::position_code.eq(assignment.position.value()),
                    diesel_schema::assignments::status.eq(assignment.status.as_str()),
                ))
                .execute(conn)?;
        }
    }

    Ok(())
}

/// Synchronizes override rows with the new state via an ID diff.
///
/// Overrides are immutable once created, so the diff only inserts and
/// deletes.
fn sync_overrides(
    conn: &mut SqliteConnection,
    schedule_id: i64,
    overrides: &[NightOverride],
) -> Result<(), PersistenceError> {
    let kept_ids: Vec<i64> = overrides.iter().filter_map(|o| o.override_id).collect();

    diesel::delete(
        diesel_schema::night_overrides::table
            .filter(diesel_schema::night_overrides::schedule_id.eq(schedule_id))
            .filter(diesel_schema::night_overrides::override_id.ne_all(&kept_ids)),
    )
    .execute(conn)?;

    for night_override in overrides {
        if night_override.override_id.is_some() {
            continue;
        }

        let incoming = night_override.action.incoming_member();

        diesel::insert_into(diesel_schema::night_overrides::table)
            .values((
                diesel_schema::night_overrides::schedule_id.eq(schedule_id),
                diesel_schema::night_overrides::night_date
                    .eq(night_override.night_date.to_string()),
                diesel_schema::night_overrides::position_code
                    .eq(night_override.position.value()),
                diesel_schema::night_overrides::override_type.eq(night_override.action.kind()),
                diesel_schema::night_overrides::base_member_id
                    .eq(night_override.action.base_member_id()),
                diesel_schema::night_overrides::member_id.eq(incoming.map(|m| m.member_id)),
                diesel_schema::night_overrides::first_name
                    .eq(incoming.map(|m| m.first_name.clone())),
                diesel_schema::night_overrides::last_name
                    .eq(incoming.map(|m| m.last_name.clone())),
                diesel_schema::night_overrides::rank.eq(incoming.map(|m| m.rank.clone())),
            ))
            .execute(conn)?;
    }

    Ok(())
}
