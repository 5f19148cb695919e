// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule state loading.
//!
//! Assignments and overrides are returned ordered by their row IDs
//! ascending, which is creation order. The resolver applies overrides in the
//! order supplied, so this ordering is what makes first-override-wins
//! deterministic across reads.

use diesel::prelude::*;
use diesel::SqliteConnection;
use duty_roster::State;
use duty_roster_domain::{
    Assignment, AssignmentStatus, DutyRole, Member, NightOverride, OverrideAction, PositionCode,
    ScheduleStatus, ScheduleWeek, parse_iso_date,
};
use std::str::FromStr;

use crate::diesel_schema;
use crate::error::PersistenceError;

/// Finds a schedule row for a duty role and week.
///
/// # Errors
///
/// Returns an error if the query fails or the stored status is corrupt.
pub fn find_schedule(
    conn: &mut SqliteConnection,
    duty_role_id: i64,
    week_start: &str,
) -> Result<Option<(i64, ScheduleStatus)>, PersistenceError> {
    let row: Option<(i64, String)> = diesel_schema::schedules::table
        .filter(diesel_schema::schedules::duty_role_id.eq(duty_role_id))
        .filter(diesel_schema::schedules::week_start.eq(week_start))
        .select((
            diesel_schema::schedules::schedule_id,
            diesel_schema::schedules::status,
        ))
        .first(conn)
        .optional()?;

    row.map(|(schedule_id, status)| {
        let status: ScheduleStatus =
            ScheduleStatus::from_str(&status).map_err(|e| PersistenceError::CorruptRow {
                table: String::from("schedules"),
                message: e.to_string(),
            })?;
        Ok((schedule_id, status))
    })
    .transpose()
}

/// Loads a schedule's base assignments in creation order.
///
/// # Errors
///
/// Returns an error if the query fails or a stored status is corrupt.
pub fn load_assignments(
    conn: &mut SqliteConnection,
    schedule_id: i64,
) -> Result<Vec<Assignment>, PersistenceError> {
    let rows: Vec<(i64, i64, String, String, String, String, String)> =
        diesel_schema::assignments::table
            .filter(diesel_schema::assignments::schedule_id.eq(schedule_id))
            .order(diesel_schema::assignments::assignment_id.asc())
            .select((
                diesel_schema::assignments::assignment_id,
                diesel_schema::assignments::member_id,
                diesel_schema::assignments::first_name,
                diesel_schema::assignments::last_name,
                diesel_schema::assignments::rank,
                diesel_schema::assignments::position_code,
                diesel_schema::assignments::status,
            ))
            .load(conn)?;

    rows.into_iter()
        .map(
            |(assignment_id, member_id, first_name, last_name, rank, position_code, status)| {
                let status: AssignmentStatus = AssignmentStatus::from_str(&status).map_err(|e| {
                    PersistenceError::CorruptRow {
                        table: String::from("assignments"),
                        message: e.to_string(),
                    }
                })?;
                Ok(Assignment::with_id(
                    assignment_id,
                    Member::new(member_id, &first_name, &last_name, &rank),
                    PositionCode::new(&position_code),
                    status,
                ))
            },
        )
        .collect()
}

/// Loads a schedule's night overrides in creation order.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row has an inconsistent
/// shape for its override type.
pub fn load_overrides(
    conn: &mut SqliteConnection,
    schedule_id: i64,
) -> Result<Vec<NightOverride>, PersistenceError> {
    type OverrideRow = (
        i64,
        String,
        String,
        String,
        Option<i64>,
        Option<i64>,
        Option<String>,
        Option<String>,
        Option<String>,
    );

    let rows: Vec<OverrideRow> = diesel_schema::night_overrides::table
        .filter(diesel_schema::night_overrides::schedule_id.eq(schedule_id))
        .order(diesel_schema::night_overrides::override_id.asc())
        .select((
            diesel_schema::night_overrides::override_id,
            diesel_schema::night_overrides::night_date,
            diesel_schema::night_overrides::position_code,
            diesel_schema::night_overrides::override_type,
            diesel_schema::night_overrides::base_member_id,
            diesel_schema::night_overrides::member_id,
            diesel_schema::night_overrides::first_name,
            diesel_schema::night_overrides::last_name,
            diesel_schema::night_overrides::rank,
        ))
        .load(conn)?;

    rows.into_iter().map(row_to_override).collect()
}

/// Loads the complete schedule state for a duty role and week.
///
/// A `(duty_role, week)` pair with no schedule row is an empty draft; the
/// schedule row is created lazily on first write.
///
/// # Errors
///
/// Returns an error if any query fails or a stored row is corrupt.
pub fn load_state(
    conn: &mut SqliteConnection,
    duty_role: &DutyRole,
    week: ScheduleWeek,
) -> Result<State, PersistenceError> {
    let duty_role_id: i64 =
        duty_role
            .duty_role_id()
            .ok_or_else(|| PersistenceError::CorruptRow {
                table: String::from("duty_roles"),
                message: String::from("row without duty_role_id"),
            })?;

    let mut state: State = State::new(duty_role.clone(), week);

    if let Some((schedule_id, status)) =
        find_schedule(conn, duty_role_id, &week.week_start().to_string())?
    {
        state.status = status;
        state.assignments = load_assignments(conn, schedule_id)?;
        state.overrides = load_overrides(conn, schedule_id)?;
    }

    Ok(state)
}

/// Lists all schedules for a week with their duty roles and statuses.
///
/// # Errors
///
/// Returns an error if the query fails or a stored status is corrupt.
pub fn list_schedules_for_week(
    conn: &mut SqliteConnection,
    week_start: &str,
) -> Result<Vec<(DutyRole, ScheduleStatus)>, PersistenceError> {
    let rows: Vec<(i64, String, String, i32, String)> = diesel_schema::schedules::table
        .inner_join(diesel_schema::duty_roles::table)
        .filter(diesel_schema::schedules::week_start.eq(week_start))
        .order(diesel_schema::duty_roles::display_order.asc())
        .select((
            diesel_schema::duty_roles::duty_role_id,
            diesel_schema::duty_roles::code,
            diesel_schema::duty_roles::name,
            diesel_schema::duty_roles::display_order,
            diesel_schema::schedules::status,
        ))
        .load(conn)?;

    rows.into_iter()
        .map(|(duty_role_id, code, name, display_order, status)| {
            let status: ScheduleStatus =
                ScheduleStatus::from_str(&status).map_err(|e| PersistenceError::CorruptRow {
                    table: String::from("schedules"),
                    message: e.to_string(),
                })?;
            Ok((
                DutyRole::with_id(duty_role_id, &code, &name, display_order),
                status,
            ))
        })
        .collect()
}

/// Converts an override row back to a domain override.
#[allow(clippy::type_complexity)]
fn row_to_override(
    row: (
        i64,
        String,
        String,
        String,
        Option<i64>,
        Option<i64>,
        Option<String>,
        Option<String>,
        Option<String>,
    ),
) -> Result<NightOverride, PersistenceError> {
    let (
        override_id,
        night_date,
        position_code,
        override_type,
        base_member_id,
        member_id,
        first_name,
        last_name,
        rank,
    ) = row;

    let corrupt = |message: String| PersistenceError::CorruptRow {
        table: String::from("night_overrides"),
        message,
    };

    let night_date: time::Date =
        parse_iso_date(&night_date).map_err(|e| corrupt(e.to_string()))?;

    let incoming_member = || -> Result<Member, PersistenceError> {
        let member_id: i64 = member_id
            .ok_or_else(|| corrupt(format!("{override_type} override without member_id")))?;
        Ok(Member::new(
            member_id,
            first_name.as_deref().unwrap_or(""),
            last_name.as_deref().unwrap_or(""),
            rank.as_deref().unwrap_or(""),
        ))
    };

    let required_base = || -> Result<i64, PersistenceError> {
        base_member_id
            .ok_or_else(|| corrupt(format!("{override_type} override without base_member_id")))
    };

    let action: OverrideAction = match override_type.as_str() {
        "replace" => OverrideAction::Replace {
            base_member_id: required_base()?,
            member: incoming_member()?,
        },
        "add" => OverrideAction::Add {
            member: incoming_member()?,
        },
        "remove" => OverrideAction::Remove {
            base_member_id: required_base()?,
        },
        other => return Err(corrupt(format!("unknown override type '{other}'"))),
    };

    Ok(NightOverride::with_id(
        override_id,
        night_date,
        PositionCode::new(&position_code),
        action,
    ))
}
