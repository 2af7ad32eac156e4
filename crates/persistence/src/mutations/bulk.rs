// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transactional bulk mutation engine.
//!
//! Each `run_*` function expects to be called inside a transaction that
//! the caller owns. Steps run in dependency order, check the deadline
//! before every row or batched insert, and return pure `StepOutcome`s.
//! Any error, including an expired deadline, propagates out so the
//! caller's transaction rolls back and no counts are reported. The caller
//! checks the deadline once more before committing, so a final step that
//! overruns the budget still rolls back.
//!
//! ## Create order
//!
//! 1. critters, captures (with inline locations), mortalities (with inline
//!    location)
//! 2. collection-unit links, locations, markings, qualitative and
//!    quantitative measurements, families, family parents, family children
//!
//! Phase 2 kinds only depend on phase 1 rows, except family links which
//! depend on families and therefore follow them. They are issued one after
//! another: a single `SQLite` connection executes one statement at a time,
//! so concurrent issue inside one transaction is not possible.
//!
//! ## Delete order
//!
//! Dependent rows go first: markings, measurements, collection-unit links,
//! family links, then captures and mortalities.

use std::time::{Duration, Instant};

use critterbase_domain::{
    BulkCreate, BulkDelete, BulkUpdate, EntityKind, RowOp, StepOutcome,
};
use diesel::SqliteConnection;
use tracing::debug;
use uuid::Uuid;

use crate::error::PersistenceError;
use crate::mutations::captures::{delete_capture, insert_capture, update_capture};
use crate::mutations::collection_units::{
    delete_collection_unit_link, insert_collection_unit_links, update_collection_unit_link,
};
use crate::mutations::critters::{insert_critters, update_critter};
use crate::mutations::families::{
    delete_family_child, delete_family_parent, insert_families, insert_family_children,
    insert_family_parents,
};
use crate::mutations::locations::{insert_locations, update_location};
use crate::mutations::markings::{delete_marking, insert_markings, update_marking};
use crate::mutations::measurements::{
    delete_qualitative_measurement, delete_quantitative_measurement,
    insert_qualitative_measurements, insert_quantitative_measurements,
    update_qualitative_measurement, update_quantitative_measurement,
};
use crate::mutations::mortalities::{delete_mortality, insert_mortality, update_mortality};

/// Point in time after which a bulk transaction must give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// A deadline `budget` from now. A budget too large to represent never
    /// expires.
    #[must_use]
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(budget),
        }
    }

    /// A deadline that never expires.
    #[must_use]
    pub const fn none() -> Self {
        Self { at: None }
    }

    /// Time left before expiry.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.at
            .map_or(Duration::MAX, |at| at.saturating_duration_since(Instant::now()))
    }

    /// # Errors
    ///
    /// Returns `TransactionTimeout` once the deadline has passed.
    pub fn check(&self) -> Result<(), PersistenceError> {
        match self.at {
            Some(at) if Instant::now() >= at => Err(PersistenceError::TransactionTimeout),
            _ => Ok(()),
        }
    }
}

fn required_id(
    kind: EntityKind,
    index: usize,
    field: &str,
    id: Option<Uuid>,
) -> Result<Uuid, PersistenceError> {
    id.ok_or_else(|| PersistenceError::RequiredPropertyMissing {
        kind,
        index,
        field: field.to_string(),
    })
}

type InsertFn<C> = fn(&mut SqliteConnection, &[C]) -> Result<usize, PersistenceError>;
type UpdateFn<P> = fn(&mut SqliteConnection, Uuid, &P) -> Result<(), PersistenceError>;
type DeleteFn = fn(&mut SqliteConnection, Uuid) -> Result<(), PersistenceError>;

/// Applies explicit per-row operations in order.
fn apply_row_ops<C, P>(
    conn: &mut SqliteConnection,
    kind: EntityKind,
    ops: &[RowOp<C, P>],
    insert: InsertFn<C>,
    update: UpdateFn<P>,
    delete: DeleteFn,
    deadline: &Deadline,
) -> Result<Vec<StepOutcome>, PersistenceError> {
    let (mut created, mut updated, mut deleted): (usize, usize, usize) = (0, 0, 0);
    for op in ops {
        deadline.check()?;
        match op {
            RowOp::Create(row) => created += insert(conn, std::slice::from_ref(row))?,
            RowOp::Update { id, patch } => {
                update(conn, *id, patch)?;
                updated += 1;
            }
            RowOp::Delete { id } => {
                delete(conn, *id)?;
                deleted += 1;
            }
        }
    }
    debug!(%kind, created, updated, deleted, "Applied row operations");
    Ok(vec![
        StepOutcome::created(kind, created),
        StepOutcome::updated(kind, updated),
        StepOutcome::deleted(kind, deleted),
    ])
}

/// Inserts every row of a bulk create payload.
///
/// Critter rows must carry their scientific names.
///
/// # Errors
///
/// Returns the first failing step's error, or `TransactionTimeout`.
pub fn run_bulk_create(
    conn: &mut SqliteConnection,
    payload: &BulkCreate,
    deadline: &Deadline,
) -> Result<Vec<StepOutcome>, PersistenceError> {
    let mut outcomes: Vec<StepOutcome> = Vec::with_capacity(11);

    // Phase 1
    deadline.check()?;
    let critters: usize = insert_critters(conn, &payload.critters)?;
    outcomes.push(StepOutcome::created(EntityKind::Critter, critters));

    for capture in &payload.captures {
        deadline.check()?;
        insert_capture(conn, capture)?;
    }
    outcomes.push(StepOutcome::created(EntityKind::Capture, payload.captures.len()));

    for mortality in &payload.mortalities {
        deadline.check()?;
        insert_mortality(conn, mortality)?;
    }
    outcomes.push(StepOutcome::created(
        EntityKind::Mortality,
        payload.mortalities.len(),
    ));
    debug!(critters, captures = payload.captures.len(), "Bulk create phase 1 complete");

    // Phase 2
    deadline.check()?;
    let links: usize = insert_collection_unit_links(conn, &payload.collection_units)?;
    outcomes.push(StepOutcome::created(EntityKind::CollectionUnit, links));

    deadline.check()?;
    let locations: usize = insert_locations(conn, &payload.locations)?;
    outcomes.push(StepOutcome::created(EntityKind::Location, locations));

    deadline.check()?;
    let markings: usize = insert_markings(conn, &payload.markings)?;
    outcomes.push(StepOutcome::created(EntityKind::Marking, markings));

    deadline.check()?;
    let qualitative: usize =
        insert_qualitative_measurements(conn, &payload.qualitative_measurements)?;
    outcomes.push(StepOutcome::created(
        EntityKind::QualitativeMeasurement,
        qualitative,
    ));

    deadline.check()?;
    let quantitative: usize =
        insert_quantitative_measurements(conn, &payload.quantitative_measurements)?;
    outcomes.push(StepOutcome::created(
        EntityKind::QuantitativeMeasurement,
        quantitative,
    ));

    deadline.check()?;
    let families: usize = insert_families(conn, &payload.families)?;
    outcomes.push(StepOutcome::created(EntityKind::Family, families));

    deadline.check()?;
    let parents: usize = insert_family_parents(conn, &payload.family_parents)?;
    outcomes.push(StepOutcome::created(EntityKind::FamilyParent, parents));

    deadline.check()?;
    let children: usize = insert_family_children(conn, &payload.family_children)?;
    outcomes.push(StepOutcome::created(EntityKind::FamilyChild, children));
    debug!(markings, locations, families, "Bulk create phase 2 complete");

    Ok(outcomes)
}

/// Applies every row of a bulk update payload, then its deletes.
///
/// # Errors
///
/// Returns the first failing step's error, including `NotFound` for an
/// update addressing a missing row, or `TransactionTimeout`.
pub fn run_bulk_update(
    conn: &mut SqliteConnection,
    payload: &BulkUpdate,
    deletes: &BulkDelete,
    deadline: &Deadline,
) -> Result<Vec<StepOutcome>, PersistenceError> {
    let mut outcomes: Vec<StepOutcome> = Vec::new();

    for (index, update) in payload.critters.iter().enumerate() {
        deadline.check()?;
        let id: Uuid = required_id(EntityKind::Critter, index, "critter_id", update.critter_id)?;
        update_critter(conn, id, update)?;
    }
    outcomes.push(StepOutcome::updated(EntityKind::Critter, payload.critters.len()));

    for (index, update) in payload.collection_units.iter().enumerate() {
        deadline.check()?;
        let id: Uuid = required_id(
            EntityKind::CollectionUnit,
            index,
            "critter_collection_unit_id",
            update.critter_collection_unit_id,
        )?;
        update_collection_unit_link(conn, id, update.collection_unit_id)?;
    }
    outcomes.push(StepOutcome::updated(
        EntityKind::CollectionUnit,
        payload.collection_units.len(),
    ));

    for (index, update) in payload.locations.iter().enumerate() {
        deadline.check()?;
        let id: Uuid = required_id(EntityKind::Location, index, "location_id", update.location_id)?;
        update_location(conn, id, &update.patch)?;
    }
    outcomes.push(StepOutcome::updated(EntityKind::Location, payload.locations.len()));

    for (index, update) in payload.captures.iter().enumerate() {
        deadline.check()?;
        let id: Uuid = required_id(EntityKind::Capture, index, "capture_id", update.capture_id)?;
        update_capture(conn, id, update)?;
    }
    outcomes.push(StepOutcome::updated(EntityKind::Capture, payload.captures.len()));

    for (index, update) in payload.mortalities.iter().enumerate() {
        deadline.check()?;
        let id: Uuid =
            required_id(EntityKind::Mortality, index, "mortality_id", update.mortality_id)?;
        update_mortality(conn, id, update)?;
    }
    outcomes.push(StepOutcome::updated(
        EntityKind::Mortality,
        payload.mortalities.len(),
    ));

    outcomes.extend(apply_row_ops(
        conn,
        EntityKind::Marking,
        &payload.markings,
        insert_markings,
        update_marking,
        delete_marking,
        deadline,
    )?);

    outcomes.extend(apply_row_ops(
        conn,
        EntityKind::QualitativeMeasurement,
        &payload.qualitative_measurements,
        insert_qualitative_measurements,
        update_qualitative_measurement,
        delete_qualitative_measurement,
        deadline,
    )?);

    outcomes.extend(apply_row_ops(
        conn,
        EntityKind::QuantitativeMeasurement,
        &payload.quantitative_measurements,
        insert_quantitative_measurements,
        update_quantitative_measurement,
        delete_quantitative_measurement,
        deadline,
    )?);

    outcomes.extend(run_bulk_delete(conn, deletes, deadline)?);
    Ok(outcomes)
}

fn delete_each<T: Copy>(
    conn: &mut SqliteConnection,
    kind: EntityKind,
    items: &[T],
    delete: fn(&mut SqliteConnection, T) -> Result<(), PersistenceError>,
    deadline: &Deadline,
) -> Result<StepOutcome, PersistenceError> {
    for item in items {
        deadline.check()?;
        delete(conn, *item)?;
    }
    Ok(StepOutcome::deleted(kind, items.len()))
}

/// Deletes every listed row. A missing id aborts the whole batch.
///
/// # Errors
///
/// Returns `NotFound` for a missing id, `ConstraintViolation` when a row is
/// still referenced, or `TransactionTimeout`.
pub fn run_bulk_delete(
    conn: &mut SqliteConnection,
    deletes: &BulkDelete,
    deadline: &Deadline,
) -> Result<Vec<StepOutcome>, PersistenceError> {
    let outcomes: Vec<StepOutcome> = vec![
        delete_each(conn, EntityKind::Marking, &deletes.markings, delete_marking, deadline)?,
        delete_each(
            conn,
            EntityKind::QualitativeMeasurement,
            &deletes.qualitative_measurements,
            delete_qualitative_measurement,
            deadline,
        )?,
        delete_each(
            conn,
            EntityKind::QuantitativeMeasurement,
            &deletes.quantitative_measurements,
            delete_quantitative_measurement,
            deadline,
        )?,
        delete_each(
            conn,
            EntityKind::CollectionUnit,
            &deletes.collection_units,
            delete_collection_unit_link,
            deadline,
        )?,
        delete_each(
            conn,
            EntityKind::FamilyParent,
            &deletes.family_parents,
            delete_family_parent,
            deadline,
        )?,
        delete_each(
            conn,
            EntityKind::FamilyChild,
            &deletes.family_children,
            delete_family_child,
            deadline,
        )?,
        delete_each(conn, EntityKind::Capture, &deletes.captures, delete_capture, deadline)?,
        delete_each(
            conn,
            EntityKind::Mortality,
            &deletes.mortalities,
            delete_mortality,
            deadline,
        )?,
    ];
    Ok(outcomes)
}
