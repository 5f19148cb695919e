// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;

#[test]
fn test_in_memory_databases_are_isolated() {
    let mut first: Persistence = Persistence::new_in_memory().unwrap();
    let mut second: Persistence = Persistence::new_in_memory().unwrap();

    // Both start empty and independent
    assert!(first.list_duty_roles().unwrap().is_empty());
    assert!(second.list_duty_roles().unwrap().is_empty());
}

#[test]
fn test_migrations_create_empty_catalog() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let metadata = persistence.get_catalog_metadata().unwrap();

    assert!(metadata.duty_roles.is_empty());
    assert!(metadata.positions.is_empty());
}

#[test]
fn test_unknown_duty_role_is_not_found() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let result = persistence.lookup_duty_role("DUTY_WATCH");

    assert!(matches!(result, Err(crate::PersistenceError::NotFound(_))));
}
