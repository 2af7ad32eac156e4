// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for Critterbase.
//!
//! This crate stores critters, their capture, mortality and marking events,
//! measurements, collection units, family relations and the taxon-scoped
//! definitions those rows reference. It is built on Diesel over `SQLite`.
//!
//! ## Transactions
//!
//! Every public mutation runs in its own database transaction. Bulk
//! mutations run their whole payload in a single immediate transaction
//! bounded by a `Deadline`; an error anywhere, including an expired
//! deadline, rolls everything back.
//!
//! This crate performs no network calls. Hierarchy resolution and
//! eligibility checks happen in the API layer before a transaction opens.
//!
//! ## Testing Philosophy
//!
//! - Tests run against unique shared in-memory databases
//! - Foreign key enforcement is verified at startup, tests rely on it

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

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use critterbase_domain::{
    BulkCounts, BulkCreate, BulkDelete, BulkUpdate, Capture, CaptureCreate, Critter, Definition,
    DefinitionKind, EntityKind, Location, Marking, MarkingBodyLocationDefinition, Mortality,
    QualitativeMeasurementDefinition, QuantitativeMeasurementDefinition, StepOutcome, TaxonId,
};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;
use uuid::Uuid;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use mutations::Deadline;

/// Persistence adapter over one `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

/// Type alias for the server state.
pub type SqlitePersistence = Persistence;

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;

        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;

        backend::sqlite::enable_wal_mode(&mut conn)?;

        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Bulk mutations
    // ========================================================================

    /// Inserts a bulk payload in one transaction.
    ///
    /// Critter rows must carry their scientific names.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error or `TransactionTimeout`.
    /// Nothing is written on error.
    pub fn bulk_create(
        &mut self,
        payload: &BulkCreate,
        deadline: Deadline,
    ) -> Result<BulkCounts, PersistenceError> {
        let outcomes: Vec<StepOutcome> = self.run_bounded(deadline, |conn| {
            mutations::bulk::run_bulk_create(conn, payload, &deadline)
        })?;
        let counts: BulkCounts = BulkCounts::from_outcomes(outcomes);
        info!(created = ?counts.created, "Bulk create committed");
        Ok(counts)
    }

    /// Applies a bulk update and its accompanying deletes in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RequiredPropertyMissing` for an update row without its id,
    /// otherwise the first failing step's error or `TransactionTimeout`.
    /// Nothing is written on error.
    pub fn bulk_update(
        &mut self,
        payload: &BulkUpdate,
        deletes: &BulkDelete,
        deadline: Deadline,
    ) -> Result<BulkCounts, PersistenceError> {
        let outcomes: Vec<StepOutcome> = self.run_bounded(deadline, |conn| {
            mutations::bulk::run_bulk_update(conn, payload, deletes, &deadline)
        })?;
        let counts: BulkCounts = BulkCounts::from_outcomes(outcomes);
        info!(updated = ?counts.updated, deleted = ?counts.deleted, "Bulk update committed");
        Ok(counts)
    }

    /// Deletes every listed row in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for any missing id, `ConstraintViolation` for a
    /// still-referenced row, or `TransactionTimeout`. Nothing is deleted on
    /// error.
    pub fn bulk_delete(
        &mut self,
        deletes: &BulkDelete,
        deadline: Deadline,
    ) -> Result<BulkCounts, PersistenceError> {
        let outcomes: Vec<StepOutcome> = self.run_bounded(deadline, |conn| {
            mutations::bulk::run_bulk_delete(conn, deletes, &deadline)
        })?;
        let counts: BulkCounts = BulkCounts::from_outcomes(outcomes);
        info!(deleted = ?counts.deleted, "Bulk delete committed");
        Ok(counts)
    }

    /// Runs `body` in an immediate transaction bounded by `deadline`.
    ///
    /// The deadline is checked again after `body` returns, so work that
    /// overran the budget is rolled back instead of committed.
    fn run_bounded<T>(
        &mut self,
        deadline: Deadline,
        body: impl FnOnce(&mut SqliteConnection) -> Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        deadline.check()?;
        backend::sqlite::set_busy_timeout(&mut self.conn, deadline.remaining())?;
        self.conn.immediate_transaction(|conn| {
            let value: T = body(conn)?;
            deadline.check()?;
            Ok(value)
        })
    }

    // ========================================================================
    // Single-entity mutations
    // ========================================================================

    /// Creates one capture with its inline locations.
    ///
    /// Applies the same location mirror default as bulk create.
    ///
    /// # Errors
    ///
    /// Returns an error if the critter does not exist or a write fails.
    pub fn create_capture(&mut self, create: &CaptureCreate) -> Result<Capture, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            let capture_id: Uuid = mutations::captures::insert_capture(conn, create)?;
            queries::entities::get_capture(conn, capture_id)
        })
    }

    // ========================================================================
    // Definition administration
    // ========================================================================

    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_marking_body_location(
        &mut self,
        itis_tsn: TaxonId,
        body_location: &str,
        description: Option<&str>,
    ) -> Result<MarkingBodyLocationDefinition, PersistenceError> {
        mutations::definitions::insert_marking_body_location(
            &mut self.conn,
            itis_tsn,
            body_location,
            description,
        )
    }

    /// # Errors
    ///
    /// Returns an error if an insert fails.
    pub fn add_qualitative_definition(
        &mut self,
        itis_tsn: TaxonId,
        measurement_name: &str,
        options: &[(&str, i32)],
    ) -> Result<QualitativeMeasurementDefinition, PersistenceError> {
        self.conn.transaction(|conn| {
            mutations::definitions::insert_qualitative_definition(
                conn,
                itis_tsn,
                measurement_name,
                options,
            )
        })
    }

    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_quantitative_definition(
        &mut self,
        itis_tsn: TaxonId,
        measurement_name: &str,
        range: (Option<f64>, Option<f64>),
        unit: Option<&str>,
    ) -> Result<QuantitativeMeasurementDefinition, PersistenceError> {
        mutations::definitions::insert_quantitative_definition(
            &mut self.conn,
            itis_tsn,
            measurement_name,
            range,
            unit,
        )
    }

    /// # Errors
    ///
    /// Returns an error if an insert fails.
    pub fn add_collection_category(
        &mut self,
        category_name: &str,
        taxa: &[TaxonId],
    ) -> Result<Uuid, PersistenceError> {
        self.conn.transaction(|conn| {
            mutations::definitions::insert_collection_category(conn, category_name, taxa)
        })
    }

    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_collection_unit(
        &mut self,
        category_id: Uuid,
        unit_name: &str,
    ) -> Result<Uuid, PersistenceError> {
        mutations::definitions::insert_collection_unit(&mut self.conn, category_id, unit_name)
    }

    // ========================================================================
    // Definition queries
    // ========================================================================

    /// Definitions of `kind` owned by any taxon in `chain`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn definitions_for_chain(
        &mut self,
        kind: DefinitionKind,
        chain: &[TaxonId],
    ) -> Result<Vec<Definition>, PersistenceError> {
        queries::definitions::definitions_for_chain(&mut self.conn, kind, chain)
    }

    /// Of `marking_ids`, those whose body location belongs outside `chain`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn markings_outside_chain(
        &mut self,
        chain: &[TaxonId],
        marking_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, PersistenceError> {
        queries::definitions::markings_outside_chain(&mut self.conn, chain, marking_ids)
    }

    /// Owning taxon of each known body-location definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn body_location_owners(
        &mut self,
        body_location_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, TaxonId>, PersistenceError> {
        queries::definitions::body_location_owners(&mut self.conn, body_location_ids)
    }

    // ========================================================================
    // Entity queries
    // ========================================================================

    /// # Errors
    ///
    /// Returns `NotFound` if the critter does not exist.
    pub fn get_critter(&mut self, critter_id: Uuid) -> Result<Critter, PersistenceError> {
        queries::entities::get_critter(&mut self.conn, critter_id)
    }

    /// Taxon of each existing critter in `critter_ids`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn critter_taxa(
        &mut self,
        critter_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, TaxonId>, PersistenceError> {
        queries::entities::critter_taxa(&mut self.conn, critter_ids)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the capture does not exist.
    pub fn get_capture(&mut self, capture_id: Uuid) -> Result<Capture, PersistenceError> {
        queries::entities::get_capture(&mut self.conn, capture_id)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the location does not exist.
    pub fn get_location(&mut self, location_id: Uuid) -> Result<Location, PersistenceError> {
        queries::entities::get_location(&mut self.conn, location_id)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the mortality does not exist.
    pub fn get_mortality(&mut self, mortality_id: Uuid) -> Result<Mortality, PersistenceError> {
        queries::entities::get_mortality(&mut self.conn, mortality_id)
    }

    /// # Errors
    ///
    /// Returns `NotFound` if the marking does not exist.
    pub fn get_marking(&mut self, marking_id: Uuid) -> Result<Marking, PersistenceError> {
        queries::entities::get_marking(&mut self.conn, marking_id)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_captures_for_critter(
        &mut self,
        critter_id: Uuid,
    ) -> Result<Vec<Capture>, PersistenceError> {
        queries::entities::list_captures_for_critter(&mut self.conn, critter_id)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_mortalities_for_critter(
        &mut self,
        critter_id: Uuid,
    ) -> Result<Vec<Mortality>, PersistenceError> {
        queries::entities::list_mortalities_for_critter(&mut self.conn, critter_id)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_markings_for_critter(
        &mut self,
        critter_id: Uuid,
    ) -> Result<Vec<Marking>, PersistenceError> {
        queries::entities::list_markings_for_critter(&mut self.conn, critter_id)
    }

    /// Number of stored rows of one kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_rows(&mut self, kind: EntityKind) -> Result<i64, PersistenceError> {
        queries::entities::count_rows(&mut self.conn, kind)
    }
}
