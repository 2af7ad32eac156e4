// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capture writes.
//!
//! Captures are the only entity with two location slots. Creation applies
//! the mirror default and updates apply the shared-location plan; both
//! decisions come from `critterbase_domain::location_share`.

use critterbase_domain::{
    CaptureCreate, CaptureLocationMirror, CaptureLocationPlan, CaptureUpdate,
    plan_capture_location_create, plan_capture_location_update,
};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;
use uuid::Uuid;

use crate::data_models::{
    CaptureRow, id_text, optional_id_text, optional_timestamp_text, parse_optional_id,
    timestamp_text,
};
use crate::diesel_schema::capture;
use crate::error::PersistenceError;
use crate::mutations::locations::{
    apply_slot_action, delete_location_if_unreferenced, insert_location,
};

/// Inserts one capture with its inline locations and returns its id.
///
/// When only one of the two locations is supplied both slots point at the
/// same new row.
///
/// # Errors
///
/// Returns an error if an insert fails, including a dangling critter id.
pub fn insert_capture(
    conn: &mut SqliteConnection,
    create: &CaptureCreate,
) -> Result<Uuid, PersistenceError> {
    let mirror: CaptureLocationMirror = plan_capture_location_create(
        create.capture_location.is_some(),
        create.release_location.is_some(),
    );

    let (capture_location_id, release_location_id): (Option<Uuid>, Option<Uuid>) =
        match (mirror, &create.capture_location, &create.release_location) {
            (CaptureLocationMirror::ReleaseMirrorsCapture, Some(location), _)
            | (CaptureLocationMirror::CaptureMirrorsRelease, _, Some(location)) => {
                let shared: Uuid = insert_location(conn, location)?;
                (Some(shared), Some(shared))
            }
            (CaptureLocationMirror::Separate, Some(capture_location), Some(release_location)) => (
                Some(insert_location(conn, capture_location)?),
                Some(insert_location(conn, release_location)?),
            ),
            _ => (None, None),
        };

    let capture_id: Uuid = create.capture_id.unwrap_or_else(Uuid::new_v4);
    let row: CaptureRow = CaptureRow {
        capture_id: id_text(capture_id),
        critter_id: id_text(create.critter_id),
        capture_location_id: optional_id_text(capture_location_id),
        release_location_id: optional_id_text(release_location_id),
        capture_timestamp: timestamp_text(create.capture_timestamp)?,
        release_timestamp: optional_timestamp_text(create.release_timestamp)?,
        capture_comment: create.capture_comment.clone(),
        release_comment: create.release_comment.clone(),
    };

    diesel::insert_into(capture::table)
        .values(&row)
        .execute(conn)?;

    debug!(%capture_id, ?mirror, "Inserted capture");
    Ok(capture_id)
}

/// Applies a capture patch, including its location slots.
///
/// The current slot ids are read here, on the caller's connection, so the
/// aliasing decision and the write share one transaction. A previous
/// location that neither slot holds afterwards is deleted once nothing
/// else references it.
///
/// # Errors
///
/// Returns `NotFound` if the capture does not exist.
pub fn update_capture(
    conn: &mut SqliteConnection,
    capture_id: Uuid,
    update: &CaptureUpdate,
) -> Result<(), PersistenceError> {
    let mut row: CaptureRow = capture::table
        .find(id_text(capture_id))
        .select(CaptureRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("capture", capture_id))?;

    let current_capture: Option<Uuid> =
        parse_optional_id("capture.capture_location_id", row.capture_location_id.as_deref())?;
    let current_release: Option<Uuid> =
        parse_optional_id("capture.release_location_id", row.release_location_id.as_deref())?;

    let plan: CaptureLocationPlan = plan_capture_location_update(
        current_capture,
        current_release,
        update.capture_location.is_some(),
        update.release_location.is_some(),
    );
    debug!(%capture_id, ?plan, "Applying capture location plan");

    let capture_location_id: Option<Uuid> = apply_slot_action(
        conn,
        plan.capture,
        current_capture,
        update.capture_location.as_ref(),
    )?;
    let release_location_id: Option<Uuid> = apply_slot_action(
        conn,
        plan.release,
        current_release,
        update.release_location.as_ref(),
    )?;

    row.capture_location_id = optional_id_text(capture_location_id);
    row.release_location_id = optional_id_text(release_location_id);
    if let Some(ts) = update.capture_timestamp {
        row.capture_timestamp = timestamp_text(ts)?;
    }
    if update.release_timestamp.is_some() {
        row.release_timestamp = optional_timestamp_text(update.release_timestamp)?;
    }
    if update.capture_comment.is_some() {
        row.capture_comment.clone_from(&update.capture_comment);
    }
    if update.release_comment.is_some() {
        row.release_comment.clone_from(&update.release_comment);
    }

    diesel::update(capture::table.find(id_text(capture_id)))
        .set(&row)
        .execute(conn)?;

    // A shared row that both slots forked away from is no longer held here.
    let mut released: Vec<Uuid> = [current_capture, current_release]
        .into_iter()
        .flatten()
        .filter(|id| Some(*id) != capture_location_id && Some(*id) != release_location_id)
        .collect();
    released.dedup();
    for location_id in released {
        if delete_location_if_unreferenced(conn, location_id)? {
            debug!(%capture_id, %location_id, "Dropped location no slot still holds");
        }
    }

    Ok(())
}

/// Deletes a capture and any of its locations left unreferenced.
///
/// # Errors
///
/// Returns `NotFound` if the capture does not exist, or
/// `ConstraintViolation` if markings or measurements still reference it.
pub fn delete_capture(conn: &mut SqliteConnection, capture_id: Uuid) -> Result<(), PersistenceError> {
    let row: CaptureRow = capture::table
        .find(id_text(capture_id))
        .select(CaptureRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("capture", capture_id))?;

    diesel::delete(capture::table.find(&row.capture_id)).execute(conn)?;

    let mut slots: Vec<Uuid> = [
        parse_optional_id("capture.capture_location_id", row.capture_location_id.as_deref())?,
        parse_optional_id("capture.release_location_id", row.release_location_id.as_deref())?,
    ]
    .into_iter()
    .flatten()
    .collect();
    slots.dedup();

    for location_id in slots {
        delete_location_if_unreferenced(conn, location_id)?;
    }

    debug!(%capture_id, "Deleted capture");
    Ok(())
}
