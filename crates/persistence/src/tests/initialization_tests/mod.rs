// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Every other persistence test also exercises connection establishment,
//! migrations and foreign key enforcement through `new_in_memory()`.

use critterbase_domain::EntityKind;

use super::store_with_critter;
use crate::SqlitePersistence;

#[test]
fn test_persistence_initialization() {
    let result: Result<SqlitePersistence, crate::error::PersistenceError> =
        SqlitePersistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_key_enforcement_is_enabled() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let (mut db1, _) = store_with_critter();
    let mut db2 = SqlitePersistence::new_in_memory().unwrap();

    assert_eq!(db1.count_rows(EntityKind::Critter).unwrap(), 1);
    assert_eq!(db2.count_rows(EntityKind::Critter).unwrap(), 0);
}

#[test]
fn test_migrations_create_every_table() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    for kind in [
        EntityKind::Critter,
        EntityKind::Capture,
        EntityKind::Mortality,
        EntityKind::Location,
        EntityKind::Marking,
        EntityKind::QualitativeMeasurement,
        EntityKind::QuantitativeMeasurement,
        EntityKind::CollectionUnit,
        EntityKind::Family,
        EntityKind::FamilyParent,
        EntityKind::FamilyChild,
    ] {
        assert_eq!(persistence.count_rows(kind).unwrap(), 0, "{kind} table missing");
    }
}
