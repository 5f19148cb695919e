// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Duty role and position catalog reads.

use diesel::prelude::*;
use diesel::SqliteConnection;
use duty_roster::CatalogMetadata;
use duty_roster_domain::{DutyPosition, DutyRole, PositionCode};

use crate::diesel_schema;
use crate::error::PersistenceError;

/// Looks up a duty role by code.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the role does not exist.
pub fn lookup_duty_role(
    conn: &mut SqliteConnection,
    code: &str,
) -> Result<DutyRole, PersistenceError> {
    let row: Option<(i64, String, String, i32)> = diesel_schema::duty_roles::table
        .filter(diesel_schema::duty_roles::code.eq(code))
        .select((
            diesel_schema::duty_roles::duty_role_id,
            diesel_schema::duty_roles::code,
            diesel_schema::duty_roles::name,
            diesel_schema::duty_roles::display_order,
        ))
        .first(conn)
        .optional()?;

    row.map_or_else(
        || Err(PersistenceError::NotFound(format!("Duty role '{code}'"))),
        |(duty_role_id, code, name, display_order)| {
            Ok(DutyRole::with_id(duty_role_id, &code, &name, display_order))
        },
    )
}

/// Lists all duty roles, ordered by display order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_duty_roles(conn: &mut SqliteConnection) -> Result<Vec<DutyRole>, PersistenceError> {
    let rows: Vec<(i64, String, String, i32)> = diesel_schema::duty_roles::table
        .order(diesel_schema::duty_roles::display_order.asc())
        .select((
            diesel_schema::duty_roles::duty_role_id,
            diesel_schema::duty_roles::code,
            diesel_schema::duty_roles::name,
            diesel_schema::duty_roles::display_order,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(duty_role_id, code, name, display_order)| {
            DutyRole::with_id(duty_role_id, &code, &name, display_order)
        })
        .collect())
}

/// Lists the positions of a duty role, ordered by display order.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row violates position
/// constraints.
pub fn list_positions(
    conn: &mut SqliteConnection,
    duty_role_id: i64,
) -> Result<Vec<DutyPosition>, PersistenceError> {
    let rows: Vec<(i64, String, String, i32, i32, i32)> = diesel_schema::duty_positions::table
        .filter(diesel_schema::duty_positions::duty_role_id.eq(duty_role_id))
        .order(diesel_schema::duty_positions::display_order.asc())
        .select((
            diesel_schema::duty_positions::duty_position_id,
            diesel_schema::duty_positions::code,
            diesel_schema::duty_positions::name,
            diesel_schema::duty_positions::max_slots,
            diesel_schema::duty_positions::required,
            diesel_schema::duty_positions::display_order,
        ))
        .load(conn)?;

    rows.into_iter()
        .map(|(duty_position_id, code, name, max_slots, required, display_order)| {
            DutyPosition::with_id(
                duty_position_id,
                PositionCode::new(&code),
                &name,
                u32::try_from(max_slots).unwrap_or(0),
                required != 0,
                display_order,
            )
            .map_err(|e| PersistenceError::CorruptRow {
                table: String::from("duty_positions"),
                message: e.to_string(),
            })
        })
        .collect()
}

/// Loads the complete catalog metadata.
///
/// # Errors
///
/// Returns an error if any query fails.
pub fn get_catalog_metadata(
    conn: &mut SqliteConnection,
) -> Result<CatalogMetadata, PersistenceError> {
    let mut metadata: CatalogMetadata = CatalogMetadata::new();

    for duty_role in list_duty_roles(conn)? {
        let duty_role_id: i64 = duty_role.duty_role_id().ok_or_else(|| {
            PersistenceError::CorruptRow {
                table: String::from("duty_roles"),
                message: String::from("row without duty_role_id"),
            }
        })?;
        for position in list_positions(conn, duty_role_id)? {
            metadata.positions.push((duty_role.clone(), position));
        }
        metadata.duty_roles.push(duty_role);
    }

    Ok(metadata)
}

/// Looks up a duty role's canonical ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the role does not exist.
pub fn lookup_duty_role_id(
    conn: &mut SqliteConnection,
    code: &str,
) -> Result<i64, PersistenceError> {
    lookup_duty_role(conn, code)?.duty_role_id().ok_or_else(|| {
        PersistenceError::CorruptRow {
            table: String::from("duty_roles"),
            message: String::from("row without duty_role_id"),
        }
    })
}
