// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Location writes, including application of location slot plans.

use critterbase_domain::{Location, LocationCreate, LocationPatch, LocationSlotAction};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;
use uuid::Uuid;

use crate::data_models::{LocationRow, id_text, parse_id};
use crate::diesel_schema::{capture, location, mortality};
use crate::error::PersistenceError;
use crate::queries::entities::get_location;

/// Inserts one location and returns its id.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_location(
    conn: &mut SqliteConnection,
    create: &LocationCreate,
) -> Result<Uuid, PersistenceError> {
    let row: LocationRow = LocationRow::from_create(create);
    diesel::insert_into(location::table)
        .values(&row)
        .execute(conn)?;
    parse_id("location.location_id", &row.location_id)
}

/// Inserts locations in one statement.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_locations(
    conn: &mut SqliteConnection,
    creates: &[LocationCreate],
) -> Result<usize, PersistenceError> {
    if creates.is_empty() {
        return Ok(0);
    }
    let rows: Vec<LocationRow> = creates.iter().map(LocationRow::from_create).collect();
    Ok(diesel::insert_into(location::table)
        .values(&rows)
        .execute(conn)?)
}

/// Overlays a patch onto a stored location in place.
///
/// # Errors
///
/// Returns `NotFound` if the location does not exist.
pub fn update_location(
    conn: &mut SqliteConnection,
    location_id: Uuid,
    patch: &LocationPatch,
) -> Result<(), PersistenceError> {
    let current: Location = get_location(conn, location_id)?;
    let mut row: LocationRow = LocationRow::from_create(&patch.apply_to(&current));
    row.location_id = id_text(location_id);

    diesel::update(location::table.find(id_text(location_id)))
        .set(&row)
        .execute(conn)?;

    debug!(%location_id, "Updated location in place");
    Ok(())
}

/// Inserts a copy of `from` with `patch` overlaid and returns the copy's id.
///
/// # Errors
///
/// Returns `NotFound` if `from` does not exist.
pub fn fork_location(
    conn: &mut SqliteConnection,
    from: Uuid,
    patch: &LocationPatch,
) -> Result<Uuid, PersistenceError> {
    let shared: Location = get_location(conn, from)?;
    let forked: Uuid = insert_location(conn, &patch.apply_to(&shared))?;
    debug!(%from, %forked, "Forked shared location");
    Ok(forked)
}

/// Applies one slot decision and returns the id the slot should hold.
///
/// # Errors
///
/// Returns an error if a referenced location is missing or a write fails.
pub fn apply_slot_action(
    conn: &mut SqliteConnection,
    action: LocationSlotAction,
    current: Option<Uuid>,
    patch: Option<&LocationPatch>,
) -> Result<Option<Uuid>, PersistenceError> {
    let Some(patch) = patch else {
        return Ok(current);
    };

    match action {
        LocationSlotAction::Untouched => Ok(current),
        LocationSlotAction::Insert => Ok(Some(insert_location(conn, &patch.to_create())?)),
        LocationSlotAction::Fork { from } => Ok(Some(fork_location(conn, from, patch)?)),
        LocationSlotAction::UpdateInPlace(location_id) => {
            update_location(conn, location_id, patch)?;
            Ok(Some(location_id))
        }
    }
}

/// Deletes a location if no capture or mortality references it any more.
///
/// Returns whether a row was deleted.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn delete_location_if_unreferenced(
    conn: &mut SqliteConnection,
    location_id: Uuid,
) -> Result<bool, PersistenceError> {
    let id: String = id_text(location_id);

    let capture_refs: i64 = capture::table
        .filter(
            capture::capture_location_id
                .eq(&id)
                .or(capture::release_location_id.eq(&id)),
        )
        .count()
        .get_result(conn)?;
    let mortality_refs: i64 = mortality::table
        .filter(mortality::location_id.eq(&id))
        .count()
        .get_result(conn)?;

    if capture_refs + mortality_refs > 0 {
        return Ok(false);
    }

    let deleted: usize = diesel::delete(location::table.find(&id)).execute(conn)?;
    Ok(deleted > 0)
}
