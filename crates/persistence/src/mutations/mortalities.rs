// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use critterbase_domain::{
    LocationSlotAction, MortalityCreate, MortalityUpdate, plan_single_location_update,
};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;
use uuid::Uuid;

use crate::data_models::{
    MortalityRow, id_text, optional_id_text, parse_optional_id, timestamp_text,
};
use crate::diesel_schema::mortality;
use crate::error::PersistenceError;
use crate::mutations::locations::{
    apply_slot_action, delete_location_if_unreferenced, insert_location,
};

/// Inserts one mortality with its inline location and returns its id.
///
/// # Errors
///
/// Returns an error if an insert fails.
pub fn insert_mortality(
    conn: &mut SqliteConnection,
    create: &MortalityCreate,
) -> Result<Uuid, PersistenceError> {
    let location_id: Option<Uuid> = create
        .location
        .as_ref()
        .map(|location| insert_location(conn, location))
        .transpose()?;

    let mortality_id: Uuid = create.mortality_id.unwrap_or_else(Uuid::new_v4);
    let row: MortalityRow = MortalityRow {
        mortality_id: id_text(mortality_id),
        critter_id: id_text(create.critter_id),
        location_id: optional_id_text(location_id),
        mortality_timestamp: timestamp_text(create.mortality_timestamp)?,
        mortality_comment: create.mortality_comment.clone(),
    };

    diesel::insert_into(mortality::table)
        .values(&row)
        .execute(conn)?;

    debug!(%mortality_id, "Inserted mortality");
    Ok(mortality_id)
}

/// Applies a mortality patch. The location is updated in place when
/// present and inserted otherwise.
///
/// # Errors
///
/// Returns `NotFound` if the mortality does not exist.
pub fn update_mortality(
    conn: &mut SqliteConnection,
    mortality_id: Uuid,
    update: &MortalityUpdate,
) -> Result<(), PersistenceError> {
    let mut row: MortalityRow = mortality::table
        .find(id_text(mortality_id))
        .select(MortalityRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("mortality", mortality_id))?;

    let current: Option<Uuid> =
        parse_optional_id("mortality.location_id", row.location_id.as_deref())?;
    let action: LocationSlotAction =
        plan_single_location_update(current, update.location.is_some());
    let location_id: Option<Uuid> =
        apply_slot_action(conn, action, current, update.location.as_ref())?;

    row.location_id = optional_id_text(location_id);
    if let Some(ts) = update.mortality_timestamp {
        row.mortality_timestamp = timestamp_text(ts)?;
    }
    if update.mortality_comment.is_some() {
        row.mortality_comment.clone_from(&update.mortality_comment);
    }

    diesel::update(mortality::table.find(id_text(mortality_id)))
        .set(&row)
        .execute(conn)?;

    debug!(%mortality_id, "Updated mortality");
    Ok(())
}

/// Deletes a mortality and its location if nothing else references it.
///
/// # Errors
///
/// Returns `NotFound` if the mortality does not exist, or
/// `ConstraintViolation` if markings or measurements still reference it.
pub fn delete_mortality(
    conn: &mut SqliteConnection,
    mortality_id: Uuid,
) -> Result<(), PersistenceError> {
    let row: MortalityRow = mortality::table
        .find(id_text(mortality_id))
        .select(MortalityRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("mortality", mortality_id))?;

    diesel::delete(mortality::table.find(&row.mortality_id)).execute(conn)?;

    if let Some(location_id) =
        parse_optional_id("mortality.location_id", row.location_id.as_deref())?
    {
        delete_location_if_unreferenced(conn, location_id)?;
    }

    debug!(%mortality_id, "Deleted mortality");
    Ok(())
}
