// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Duty role and position inserts.

use diesel::prelude::*;
use diesel::SqliteConnection;
use duty_roster::CatalogResult;
use tracing::debug;

use crate::diesel_schema;
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::queries::catalog::lookup_duty_role_id;

/// Persists a catalog result (duty role or position creation).
///
/// The new entity is read from the result's metadata based on the action
/// name; catalog results always append the created entity last.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `result` - The catalog result to persist
///
/// # Returns
///
/// The event ID assigned to the persisted audit event.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub fn persist_catalog(
    conn: &mut SqliteConnection,
    result: &CatalogResult,
) -> Result<i64, PersistenceError> {
    conn.transaction(|conn| {
        match result.audit_event.action.name.as_str() {
            "CreateDutyRole" => {
                let duty_role = result.new_metadata.duty_roles.last().ok_or_else(|| {
                    PersistenceError::Other(String::from(
                        "CreateDutyRole result without a new duty role",
                    ))
                })?;

                diesel::insert_into(diesel_schema::duty_roles::table)
                    .values((
                        diesel_schema::duty_roles::code.eq(duty_role.code()),
                        diesel_schema::duty_roles::name.eq(duty_role.name()),
                        diesel_schema::duty_roles::display_order.eq(duty_role.display_order()),
                    ))
                    .execute(conn)?;

                debug!(code = %duty_role.code(), "Inserted duty role");
            }
            "CreateDutyPosition" => {
                let (duty_role, position) =
                    result.new_metadata.positions.last().ok_or_else(|| {
                        PersistenceError::Other(String::from(
                            "CreateDutyPosition result without a new position",
                        ))
                    })?;

                let duty_role_id: i64 = lookup_duty_role_id(conn, duty_role.code())?;

                diesel::insert_into(diesel_schema::duty_positions::table)
                    .values((
                        diesel_schema::duty_positions::duty_role_id.eq(duty_role_id),
                        diesel_schema::duty_positions::code.eq(position.code().value()),
                        diesel_schema::duty_positions::name.eq(position.name()),
                        diesel_schema::duty_positions::max_slots
                            .eq(i32::try_from(position.max_slots()).unwrap_or(i32::MAX)),
                        diesel_schema::duty_positions::required.eq(i32::from(position.required())),
                        diesel_schema::duty_positions::display_order.eq(position.display_order()),
                    ))
                    .execute(conn)?;

                debug!(
                    duty_role = %duty_role.code(),
                    code = %position.code(),
                    "Inserted duty position"
                );
            }
            other => {
                return Err(PersistenceError::Other(format!(
                    "Unexpected catalog action '{other}'"
                )));
            }
        }

        persist_audit_event(conn, &result.audit_event)
    })
}
