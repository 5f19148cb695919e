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

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

use duty_roster_domain::{DomainError, DutyRole, PositionCode};

// Re-export public types and functions
pub use apply::{apply, apply_catalog};
pub use command::Command;
pub use error::CoreError;
pub use state::{CatalogMetadata, CatalogResult, State, TransitionResult};

/// Validates that a duty role exists in the catalog.
///
/// This is a read-only validation that does not create audit events.
///
/// # Arguments
///
/// * `metadata` - The catalog metadata to check
/// * `duty_role` - The duty role to validate
///
/// # Returns
///
/// * `Ok(())` if the duty role exists
/// * `Err(DomainError::DutyRoleNotFound)` if the duty role does not exist
///
/// # Errors
///
/// Returns an error if the duty role has not been created.
pub fn validate_duty_role_exists(
    metadata: &CatalogMetadata,
    duty_role: &DutyRole,
) -> Result<(), DomainError> {
    if !metadata.has_duty_role(duty_role) {
        return Err(DomainError::DutyRoleNotFound(duty_role.code().to_string()));
    }
    Ok(())
}

/// Validates that a position exists within a duty role.
///
/// This is a read-only validation that does not create audit events.
/// This function also validates that the duty role exists.
///
/// # Arguments
///
/// * `metadata` - The catalog metadata to check
/// * `duty_role` - The duty role to check within
/// * `position` - The position code to validate
///
/// # Returns
///
/// * `Ok(())` if both the duty role and position exist
/// * `Err(DomainError::DutyRoleNotFound)` if the duty role does not exist
/// * `Err(DomainError::PositionNotFound)` if the position does not exist
///
/// # Errors
///
/// Returns an error if:
/// - The duty role has not been created
/// - The position has not been created in the duty role
pub fn validate_position_exists(
    metadata: &CatalogMetadata,
    duty_role: &DutyRole,
    position: &PositionCode,
) -> Result<(), DomainError> {
    // First validate the duty role exists
    validate_duty_role_exists(metadata, duty_role)?;

    // Then validate the position exists in that role
    if !metadata.has_position(duty_role, position) {
        return Err(DomainError::PositionNotFound {
            duty_role: duty_role.code().to_string(),
            position: position.value().to_string(),
        });
    }
    Ok(())
}
