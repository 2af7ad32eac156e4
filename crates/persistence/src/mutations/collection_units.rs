// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use critterbase_domain::CollectionUnitLinkCreate;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use crate::data_models::{CritterCollectionUnitRow, id_text};
use crate::diesel_schema::critter_collection_unit;
use crate::error::PersistenceError;

/// Links critters to collection units in one statement.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_collection_unit_links(
    conn: &mut SqliteConnection,
    creates: &[CollectionUnitLinkCreate],
) -> Result<usize, PersistenceError> {
    if creates.is_empty() {
        return Ok(0);
    }
    let rows: Vec<CritterCollectionUnitRow> = creates
        .iter()
        .map(|create| CritterCollectionUnitRow {
            critter_collection_unit_id: id_text(
                create.critter_collection_unit_id.unwrap_or_else(Uuid::new_v4),
            ),
            critter_id: id_text(create.critter_id),
            collection_unit_id: id_text(create.collection_unit_id),
        })
        .collect();
    Ok(diesel::insert_into(critter_collection_unit::table)
        .values(&rows)
        .execute(conn)?)
}

/// Moves a critter's link to a different collection unit.
///
/// # Errors
///
/// Returns `NotFound` if the link does not exist.
pub fn update_collection_unit_link(
    conn: &mut SqliteConnection,
    link_id: Uuid,
    collection_unit_id: Option<Uuid>,
) -> Result<(), PersistenceError> {
    let mut row: CritterCollectionUnitRow = critter_collection_unit::table
        .find(id_text(link_id))
        .select(CritterCollectionUnitRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("critter collection unit", link_id))?;

    if let Some(unit_id) = collection_unit_id {
        row.collection_unit_id = id_text(unit_id);
    }

    diesel::update(critter_collection_unit::table.find(id_text(link_id)))
        .set(&row)
        .execute(conn)?;
    Ok(())
}

/// # Errors
///
/// Returns `NotFound` if the link does not exist.
pub fn delete_collection_unit_link(
    conn: &mut SqliteConnection,
    link_id: Uuid,
) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(critter_collection_unit::table.find(id_text(link_id))).execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::not_found("critter collection unit", link_id));
    }
    Ok(())
}
