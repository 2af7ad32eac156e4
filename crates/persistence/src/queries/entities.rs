// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Entity lookups by id.

use std::collections::HashMap;

use critterbase_domain::{Capture, Critter, EntityKind, Location, Marking, Mortality, TaxonId};
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use crate::data_models::{
    CaptureRow, CritterRow, LocationRow, MarkingRow, MortalityRow, id_text, parse_id,
};
use crate::diesel_schema::{
    capture, critter, critter_collection_unit, location, marking, measurement_qualitative,
    measurement_quantitative, mortality,
};
use crate::error::PersistenceError;

/// Loads one critter.
///
/// # Errors
///
/// Returns `NotFound` if no critter has this id.
pub fn get_critter(conn: &mut SqliteConnection, critter_id: Uuid) -> Result<Critter, PersistenceError> {
    critter::table
        .find(id_text(critter_id))
        .select(CritterRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("critter", critter_id))?
        .try_into()
}

/// Maps each existing critter id to its taxon. Unknown ids are absent.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn critter_taxa(
    conn: &mut SqliteConnection,
    critter_ids: &[Uuid],
) -> Result<HashMap<Uuid, TaxonId>, PersistenceError> {
    let ids: Vec<String> = critter_ids.iter().copied().map(id_text).collect();
    let rows: Vec<(String, i64)> = critter::table
        .filter(critter::critter_id.eq_any(ids))
        .select((critter::critter_id, critter::itis_tsn))
        .load(conn)?;

    rows.into_iter()
        .map(|(id, tsn)| Ok((parse_id("critter.critter_id", &id)?, TaxonId::new(tsn))))
        .collect()
}

/// Loads one location.
///
/// # Errors
///
/// Returns `NotFound` if no location has this id.
pub fn get_location(
    conn: &mut SqliteConnection,
    location_id: Uuid,
) -> Result<Location, PersistenceError> {
    location::table
        .find(id_text(location_id))
        .select(LocationRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("location", location_id))?
        .try_into()
}

/// Loads one capture.
///
/// # Errors
///
/// Returns `NotFound` if no capture has this id.
pub fn get_capture(conn: &mut SqliteConnection, capture_id: Uuid) -> Result<Capture, PersistenceError> {
    capture::table
        .find(id_text(capture_id))
        .select(CaptureRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("capture", capture_id))?
        .try_into()
}

/// Loads one mortality.
///
/// # Errors
///
/// Returns `NotFound` if no mortality has this id.
pub fn get_mortality(
    conn: &mut SqliteConnection,
    mortality_id: Uuid,
) -> Result<Mortality, PersistenceError> {
    mortality::table
        .find(id_text(mortality_id))
        .select(MortalityRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("mortality", mortality_id))?
        .try_into()
}

/// Loads one marking.
///
/// # Errors
///
/// Returns `NotFound` if no marking has this id.
pub fn get_marking(conn: &mut SqliteConnection, marking_id: Uuid) -> Result<Marking, PersistenceError> {
    marking::table
        .find(id_text(marking_id))
        .select(MarkingRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("marking", marking_id))?
        .try_into()
}

/// Captures of one critter, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row does not decode.
pub fn list_captures_for_critter(
    conn: &mut SqliteConnection,
    critter_id: Uuid,
) -> Result<Vec<Capture>, PersistenceError> {
    capture::table
        .filter(capture::critter_id.eq(id_text(critter_id)))
        .order(capture::capture_timestamp.asc())
        .select(CaptureRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Capture::try_from)
        .collect()
}

/// Mortalities of one critter.
///
/// # Errors
///
/// Returns an error if the query fails or a row does not decode.
pub fn list_mortalities_for_critter(
    conn: &mut SqliteConnection,
    critter_id: Uuid,
) -> Result<Vec<Mortality>, PersistenceError> {
    mortality::table
        .filter(mortality::critter_id.eq(id_text(critter_id)))
        .order(mortality::mortality_timestamp.asc())
        .select(MortalityRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Mortality::try_from)
        .collect()
}

/// Markings of one critter.
///
/// # Errors
///
/// Returns an error if the query fails or a row does not decode.
pub fn list_markings_for_critter(
    conn: &mut SqliteConnection,
    critter_id: Uuid,
) -> Result<Vec<Marking>, PersistenceError> {
    marking::table
        .filter(marking::critter_id.eq(id_text(critter_id)))
        .order(marking::marking_id.asc())
        .select(MarkingRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Marking::try_from)
        .collect()
}

/// Number of rows currently stored for an entity kind.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_rows(conn: &mut SqliteConnection, kind: EntityKind) -> Result<i64, PersistenceError> {
    use crate::diesel_schema::{family, family_child, family_parent};

    let count: i64 = match kind {
        EntityKind::Critter => critter::table.count().get_result(conn)?,
        EntityKind::Capture => capture::table.count().get_result(conn)?,
        EntityKind::Mortality => mortality::table.count().get_result(conn)?,
        EntityKind::Location => location::table.count().get_result(conn)?,
        EntityKind::Marking => marking::table.count().get_result(conn)?,
        EntityKind::QualitativeMeasurement => {
            measurement_qualitative::table.count().get_result(conn)?
        }
        EntityKind::QuantitativeMeasurement => {
            measurement_quantitative::table.count().get_result(conn)?
        }
        EntityKind::CollectionUnit => critter_collection_unit::table.count().get_result(conn)?,
        EntityKind::Family => family::table.count().get_result(conn)?,
        EntityKind::FamilyParent => family_parent::table.count().get_result(conn)?,
        EntityKind::FamilyChild => family_child::table.count().get_result(conn)?,
    };
    Ok(count)
}
