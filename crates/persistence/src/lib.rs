// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Duty Roster System.
//!
//! This crate provides database persistence for the duty catalog, weekly
//! schedules, and audit events. It is built on Diesel over `SQLite`.
//!
//! ## Storage model
//!
//! The canonical tables (`duty_roles`, `duty_positions`, `schedules`,
//! `assignments`, `night_overrides`) are authoritative; `audit_events` is an
//! append-only history. A transition is persisted as an ID diff of the new
//! state against the stored rows plus one audit event, in one transaction.
//!
//! Assignments and overrides are always read back ordered by row ID
//! ascending (creation order). The roster resolver applies overrides in the
//! order supplied, so this ordering is what keeps first-override-wins
//! semantics stable across reads.
//!
//! ## Testing
//!
//! `SQLite` requires no external infrastructure; all tests run against
//! uniquely named in-memory databases for deterministic isolation.

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use duty_roster::{CatalogMetadata, CatalogResult, State, TransitionResult};
use duty_roster_audit::AuditEvent;
use duty_roster_domain::{DutyPosition, DutyRole, ScheduleStatus, ScheduleWeek};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique sequential
/// ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the duty catalog, schedules, and audit events.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite`
    /// database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_test_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite`
    /// database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Loads the complete catalog metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_catalog_metadata(&mut self) -> Result<CatalogMetadata, PersistenceError> {
        queries::catalog::get_catalog_metadata(&mut self.conn)
    }

    /// Persists a catalog result (duty role or position creation).
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn persist_catalog(&mut self, result: &CatalogResult) -> Result<i64, PersistenceError> {
        mutations::catalog::persist_catalog(&mut self.conn, result)
    }

    /// Looks up a duty role by code.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the role does not exist.
    pub fn lookup_duty_role(&mut self, code: &str) -> Result<DutyRole, PersistenceError> {
        queries::catalog::lookup_duty_role(&mut self.conn, code)
    }

    /// Lists all duty roles, ordered by display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_duty_roles(&mut self) -> Result<Vec<DutyRole>, PersistenceError> {
        queries::catalog::list_duty_roles(&mut self.conn)
    }

    /// Lists the positions of a duty role, ordered by display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the role does not exist or the query fails.
    pub fn list_positions(&mut self, code: &str) -> Result<Vec<DutyPosition>, PersistenceError> {
        let duty_role_id: i64 = queries::catalog::lookup_duty_role_id(&mut self.conn, code)?;
        queries::catalog::list_positions(&mut self.conn, duty_role_id)
    }

    // ========================================================================
    // Schedules
    // ========================================================================

    /// Loads the schedule state for a duty role and week.
    ///
    /// A pair with no schedule row yet is an empty draft; the row is created
    /// lazily on first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the duty role does not exist or a query fails.
    pub fn get_current_state(
        &mut self,
        duty_role_code: &str,
        week: ScheduleWeek,
    ) -> Result<State, PersistenceError> {
        let duty_role: DutyRole = queries::catalog::lookup_duty_role(&mut self.conn, duty_role_code)?;
        queries::roster::load_state(&mut self.conn, &duty_role, week)
    }

    /// Persists a transition result atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn persist_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<i64, PersistenceError> {
        mutations::roster::persist_transition(&mut self.conn, result)
    }

    /// Lists all schedules for a week with their duty roles and statuses.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_schedules_for_week(
        &mut self,
        week: ScheduleWeek,
    ) -> Result<Vec<(DutyRole, ScheduleStatus)>, PersistenceError> {
        queries::roster::list_schedules_for_week(&mut self.conn, &week.week_start().to_string())
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Fetches a single audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::EventNotFound` if no event has the ID.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut self.conn, event_id)
    }

    /// Fetches the audit timeline for a schedule scope, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_audit_timeline(
        &mut self,
        duty_role_code: &str,
        week: ScheduleWeek,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::get_audit_timeline(
            &mut self.conn,
            duty_role_code,
            &week.week_start().to_string(),
        )
    }
}
