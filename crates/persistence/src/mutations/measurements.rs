// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Qualitative and quantitative measurement writes.

use critterbase_domain::{
    QualitativeMeasurementCreate, QualitativeMeasurementPatch, QuantitativeMeasurementCreate,
    QuantitativeMeasurementPatch,
};
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use crate::data_models::{
    QualitativeMeasurementRow, QuantitativeMeasurementRow, id_text, optional_id_text,
    optional_timestamp_text,
};
use crate::diesel_schema::{measurement_qualitative, measurement_quantitative};
use crate::error::PersistenceError;

// ============================================================================
// Qualitative
// ============================================================================

/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_qualitative_measurements(
    conn: &mut SqliteConnection,
    creates: &[QualitativeMeasurementCreate],
) -> Result<usize, PersistenceError> {
    if creates.is_empty() {
        return Ok(0);
    }
    let rows: Vec<QualitativeMeasurementRow> = creates
        .iter()
        .map(|create| {
            Ok(QualitativeMeasurementRow {
                measurement_qualitative_id: id_text(
                    create.measurement_qualitative_id.unwrap_or_else(Uuid::new_v4),
                ),
                critter_id: id_text(create.critter_id),
                taxon_measurement_id: id_text(create.taxon_measurement_id),
                qualitative_option_id: id_text(create.qualitative_option_id),
                capture_id: optional_id_text(create.capture_id),
                mortality_id: optional_id_text(create.mortality_id),
                measurement_comment: create.measurement_comment.clone(),
                measured_timestamp: optional_timestamp_text(create.measured_timestamp)?,
            })
        })
        .collect::<Result<_, PersistenceError>>()?;
    Ok(diesel::insert_into(measurement_qualitative::table)
        .values(&rows)
        .execute(conn)?)
}

/// # Errors
///
/// Returns `NotFound` if the measurement does not exist.
pub fn update_qualitative_measurement(
    conn: &mut SqliteConnection,
    measurement_id: Uuid,
    patch: &QualitativeMeasurementPatch,
) -> Result<(), PersistenceError> {
    let mut row: QualitativeMeasurementRow = measurement_qualitative::table
        .find(id_text(measurement_id))
        .select(QualitativeMeasurementRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("qualitative measurement", measurement_id))?;

    if let Some(option_id) = patch.qualitative_option_id {
        row.qualitative_option_id = id_text(option_id);
    }
    if patch.measurement_comment.is_some() {
        row.measurement_comment.clone_from(&patch.measurement_comment);
    }
    if patch.measured_timestamp.is_some() {
        row.measured_timestamp = optional_timestamp_text(patch.measured_timestamp)?;
    }

    diesel::update(measurement_qualitative::table.find(id_text(measurement_id)))
        .set(&row)
        .execute(conn)?;
    Ok(())
}

/// # Errors
///
/// Returns `NotFound` if the measurement does not exist.
pub fn delete_qualitative_measurement(
    conn: &mut SqliteConnection,
    measurement_id: Uuid,
) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(measurement_qualitative::table.find(id_text(measurement_id)))
            .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::not_found(
            "qualitative measurement",
            measurement_id,
        ));
    }
    Ok(())
}

// ============================================================================
// Quantitative
// ============================================================================

/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_quantitative_measurements(
    conn: &mut SqliteConnection,
    creates: &[QuantitativeMeasurementCreate],
) -> Result<usize, PersistenceError> {
    if creates.is_empty() {
        return Ok(0);
    }
    let rows: Vec<QuantitativeMeasurementRow> = creates
        .iter()
        .map(|create| {
            Ok(QuantitativeMeasurementRow {
                measurement_quantitative_id: id_text(
                    create.measurement_quantitative_id.unwrap_or_else(Uuid::new_v4),
                ),
                critter_id: id_text(create.critter_id),
                taxon_measurement_id: id_text(create.taxon_measurement_id),
                value: create.value,
                capture_id: optional_id_text(create.capture_id),
                mortality_id: optional_id_text(create.mortality_id),
                measurement_comment: create.measurement_comment.clone(),
                measured_timestamp: optional_timestamp_text(create.measured_timestamp)?,
            })
        })
        .collect::<Result<_, PersistenceError>>()?;
    Ok(diesel::insert_into(measurement_quantitative::table)
        .values(&rows)
        .execute(conn)?)
}

/// # Errors
///
/// Returns `NotFound` if the measurement does not exist.
pub fn update_quantitative_measurement(
    conn: &mut SqliteConnection,
    measurement_id: Uuid,
    patch: &QuantitativeMeasurementPatch,
) -> Result<(), PersistenceError> {
    let mut row: QuantitativeMeasurementRow = measurement_quantitative::table
        .find(id_text(measurement_id))
        .select(QuantitativeMeasurementRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("quantitative measurement", measurement_id))?;

    if let Some(value) = patch.value {
        row.value = value;
    }
    if patch.measurement_comment.is_some() {
        row.measurement_comment.clone_from(&patch.measurement_comment);
    }
    if patch.measured_timestamp.is_some() {
        row.measured_timestamp = optional_timestamp_text(patch.measured_timestamp)?;
    }

    diesel::update(measurement_quantitative::table.find(id_text(measurement_id)))
        .set(&row)
        .execute(conn)?;
    Ok(())
}

/// # Errors
///
/// Returns `NotFound` if the measurement does not exist.
pub fn delete_quantitative_measurement(
    conn: &mut SqliteConnection,
    measurement_id: Uuid,
) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(measurement_quantitative::table.find(id_text(measurement_id)))
            .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::not_found(
            "quantitative measurement",
            measurement_id,
        ));
    }
    Ok(())
}
