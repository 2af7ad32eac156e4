// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::bulk::{BulkCreate, BulkUpdate, EntityKind, RowOp};
use crate::error::DomainError;
use crate::types::{LocationCreate, LocationPatch};

/// Validates the structure of a bulk create payload.
///
/// This checks field constraints only. Referential integrity is left to
/// the database and taxon eligibility to the marking validator.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` naming the first offending array
/// index and field.
pub fn validate_bulk_create(payload: &BulkCreate) -> Result<(), DomainError> {
    for (index, location) in payload.locations.iter().enumerate() {
        validate_coordinates(EntityKind::Location, index, "", location.latitude, location.longitude)?;
    }

    for (index, capture) in payload.captures.iter().enumerate() {
        validate_inline_location(index, "capture_location", capture.capture_location.as_ref())?;
        validate_inline_location(index, "release_location", capture.release_location.as_ref())?;
        if capture
            .release_timestamp
            .is_some_and(|release| release < capture.capture_timestamp)
        {
            return Err(DomainError::InvalidField {
                kind: EntityKind::Capture,
                index,
                field: String::from("release_timestamp"),
                reason: String::from("release cannot precede capture"),
            });
        }
    }

    for (index, mortality) in payload.mortalities.iter().enumerate() {
        if let Some(location) = &mortality.location {
            validate_coordinates(
                EntityKind::Mortality,
                index,
                "location.",
                location.latitude,
                location.longitude,
            )?;
        }
    }

    for (index, family) in payload.families.iter().enumerate() {
        if family.family_label.trim().is_empty() {
            return Err(DomainError::InvalidField {
                kind: EntityKind::Family,
                index,
                field: String::from("family_label"),
                reason: String::from("cannot be empty"),
            });
        }
    }

    for (index, measurement) in payload.quantitative_measurements.iter().enumerate() {
        validate_finite(
            EntityKind::QuantitativeMeasurement,
            index,
            measurement.value,
        )?;
    }

    Ok(())
}

/// Validates that every id-keyed row of a bulk update carries its id.
///
/// # Errors
///
/// Returns `DomainError::RequiredPropertyMissing` for the first row without
/// its primary id, or `DomainError::InvalidField` for out-of-range values.
pub fn validate_bulk_update(payload: &BulkUpdate) -> Result<(), DomainError> {
    require_ids(EntityKind::Critter, "critter_id", &payload.critters, |row| {
        row.critter_id.is_some()
    })?;
    require_ids(
        EntityKind::CollectionUnit,
        "critter_collection_unit_id",
        &payload.collection_units,
        |row| row.critter_collection_unit_id.is_some(),
    )?;
    require_ids(EntityKind::Location, "location_id", &payload.locations, |row| {
        row.location_id.is_some()
    })?;
    require_ids(EntityKind::Capture, "capture_id", &payload.captures, |row| {
        row.capture_id.is_some()
    })?;
    require_ids(
        EntityKind::Mortality,
        "mortality_id",
        &payload.mortalities,
        |row| row.mortality_id.is_some(),
    )?;

    for (index, location) in payload.locations.iter().enumerate() {
        validate_patch_coordinates(EntityKind::Location, index, "", &location.patch)?;
    }
    for (index, capture) in payload.captures.iter().enumerate() {
        if let Some(patch) = &capture.capture_location {
            validate_patch_coordinates(EntityKind::Capture, index, "capture_location.", patch)?;
        }
        if let Some(patch) = &capture.release_location {
            validate_patch_coordinates(EntityKind::Capture, index, "release_location.", patch)?;
        }
    }
    for (index, mortality) in payload.mortalities.iter().enumerate() {
        if let Some(patch) = &mortality.location {
            validate_patch_coordinates(EntityKind::Mortality, index, "location.", patch)?;
        }
    }
    for (index, op) in payload.quantitative_measurements.iter().enumerate() {
        let value: Option<f64> = match op {
            RowOp::Create(create) => Some(create.value),
            RowOp::Update { patch, .. } => patch.value,
            RowOp::Delete { .. } => None,
        };
        if let Some(value) = value {
            validate_finite(EntityKind::QuantitativeMeasurement, index, value)?;
        }
    }

    Ok(())
}

fn require_ids<T>(
    kind: EntityKind,
    field: &'static str,
    rows: &[T],
    has_id: impl Fn(&T) -> bool,
) -> Result<(), DomainError> {
    match rows.iter().position(|row| !has_id(row)) {
        Some(index) => Err(DomainError::RequiredPropertyMissing { kind, index, field }),
        None => Ok(()),
    }
}

fn validate_inline_location(
    index: usize,
    slot: &str,
    location: Option<&LocationCreate>,
) -> Result<(), DomainError> {
    location.map_or(Ok(()), |location| {
        validate_coordinates(
            EntityKind::Capture,
            index,
            &format!("{slot}."),
            location.latitude,
            location.longitude,
        )
    })
}

fn validate_patch_coordinates(
    kind: EntityKind,
    index: usize,
    prefix: &str,
    patch: &LocationPatch,
) -> Result<(), DomainError> {
    validate_coordinates(kind, index, prefix, patch.latitude, patch.longitude)
}

/// Validates latitude and longitude ranges.
fn validate_coordinates(
    kind: EntityKind,
    index: usize,
    prefix: &str,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<(), DomainError> {
    if let Some(latitude) = latitude.filter(|lat| !(-90.0..=90.0).contains(lat)) {
        return Err(DomainError::InvalidField {
            kind,
            index,
            field: format!("{prefix}latitude"),
            reason: format!("{latitude} is outside -90..=90"),
        });
    }
    if let Some(longitude) = longitude.filter(|lon| !(-180.0..=180.0).contains(lon)) {
        return Err(DomainError::InvalidField {
            kind,
            index,
            field: format!("{prefix}longitude"),
            reason: format!("{longitude} is outside -180..=180"),
        });
    }
    Ok(())
}

fn validate_finite(kind: EntityKind, index: usize, value: f64) -> Result<(), DomainError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DomainError::InvalidField {
            kind,
            index,
            field: String::from("value"),
            reason: String::from("must be a finite number"),
        })
    }
}
