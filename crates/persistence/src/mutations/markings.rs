// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use critterbase_domain::{MarkingCreate, MarkingPatch};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;
use uuid::Uuid;

use crate::data_models::{MarkingRow, id_text, optional_id_text, optional_timestamp_text};
use crate::diesel_schema::marking;
use crate::error::PersistenceError;

fn marking_row(create: &MarkingCreate) -> Result<MarkingRow, PersistenceError> {
    Ok(MarkingRow {
        marking_id: id_text(create.marking_id.unwrap_or_else(Uuid::new_v4)),
        critter_id: id_text(create.critter_id),
        capture_id: optional_id_text(create.capture_id),
        mortality_id: optional_id_text(create.mortality_id),
        taxon_marking_body_location_id: optional_id_text(create.taxon_marking_body_location_id),
        identifier: create.identifier.clone(),
        frequency: create.frequency,
        frequency_unit: create.frequency_unit.clone(),
        attached_timestamp: optional_timestamp_text(create.attached_timestamp)?,
        removed_timestamp: optional_timestamp_text(create.removed_timestamp)?,
        comment: create.comment.clone(),
    })
}

/// Inserts markings in one statement.
///
/// Body-location eligibility is not checked here; callers verify it
/// against the critter's hierarchy before opening the transaction.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_markings(
    conn: &mut SqliteConnection,
    creates: &[MarkingCreate],
) -> Result<usize, PersistenceError> {
    if creates.is_empty() {
        return Ok(0);
    }
    let rows: Vec<MarkingRow> = creates
        .iter()
        .map(marking_row)
        .collect::<Result<_, _>>()?;
    let inserted: usize = diesel::insert_into(marking::table)
        .values(&rows)
        .execute(conn)?;
    debug!(inserted, "Inserted markings");
    Ok(inserted)
}

/// Applies a marking patch. `None` fields keep their stored value.
///
/// # Errors
///
/// Returns `NotFound` if the marking does not exist.
pub fn update_marking(
    conn: &mut SqliteConnection,
    marking_id: Uuid,
    patch: &MarkingPatch,
) -> Result<(), PersistenceError> {
    let mut row: MarkingRow = marking::table
        .find(id_text(marking_id))
        .select(MarkingRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("marking", marking_id))?;

    if patch.capture_id.is_some() {
        row.capture_id = optional_id_text(patch.capture_id);
    }
    if patch.mortality_id.is_some() {
        row.mortality_id = optional_id_text(patch.mortality_id);
    }
    if patch.taxon_marking_body_location_id.is_some() {
        row.taxon_marking_body_location_id =
            optional_id_text(patch.taxon_marking_body_location_id);
    }
    if patch.identifier.is_some() {
        row.identifier.clone_from(&patch.identifier);
    }
    if patch.frequency.is_some() {
        row.frequency = patch.frequency;
    }
    if patch.frequency_unit.is_some() {
        row.frequency_unit.clone_from(&patch.frequency_unit);
    }
    if patch.attached_timestamp.is_some() {
        row.attached_timestamp = optional_timestamp_text(patch.attached_timestamp)?;
    }
    if patch.removed_timestamp.is_some() {
        row.removed_timestamp = optional_timestamp_text(patch.removed_timestamp)?;
    }
    if patch.comment.is_some() {
        row.comment.clone_from(&patch.comment);
    }

    diesel::update(marking::table.find(id_text(marking_id)))
        .set(&row)
        .execute(conn)?;
    Ok(())
}

/// Deletes one marking.
///
/// # Errors
///
/// Returns `NotFound` if the marking does not exist.
pub fn delete_marking(conn: &mut SqliteConnection, marking_id: Uuid) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(marking::table.find(id_text(marking_id))).execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::not_found("marking", marking_id));
    }
    Ok(())
}
