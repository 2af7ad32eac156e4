// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and column codecs.
//!
//! Ids are stored as hyphenated UUID text and timestamps as RFC 3339 text.
//! Rows convert into domain records through `TryFrom`, failing with
//! `SerializationError` when a stored value does not decode.
//!
//! Changeset types use `treat_none_as_null`: updates load the current row,
//! overlay the patch, and write every column back.

use critterbase_domain::{
    Capture, CollectionCategoryDefinition, Critter, Location, LocationCreate,
    Marking, MarkingBodyLocationDefinition, Mortality, QualitativeOption,
    QuantitativeMeasurementDefinition, Sex, TaxonId,
};
use diesel::prelude::*;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::diesel_schema::{
    capture, critter, critter_collection_unit, family, family_child, family_parent, location,
    marking, measurement_qualitative, measurement_quantitative, mortality,
    xref_taxon_marking_body_location, xref_taxon_measurement_qualitative,
    xref_taxon_measurement_qualitative_option, xref_taxon_measurement_quantitative,
};
use crate::error::PersistenceError;

// ============================================================================
// Column codecs
// ============================================================================

pub fn id_text(id: Uuid) -> String {
    id.hyphenated().to_string()
}

pub fn optional_id_text(id: Option<Uuid>) -> Option<String> {
    id.map(id_text)
}

pub fn parse_id(column: &str, value: &str) -> Result<Uuid, PersistenceError> {
    Uuid::parse_str(value).map_err(|e| {
        PersistenceError::SerializationError(format!("{column} holds invalid id '{value}': {e}"))
    })
}

pub fn parse_optional_id(
    column: &str,
    value: Option<&str>,
) -> Result<Option<Uuid>, PersistenceError> {
    value.map(|v| parse_id(column, v)).transpose()
}

pub fn timestamp_text(ts: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(ts.format(&Rfc3339)?)
}

pub fn optional_timestamp_text(
    ts: Option<OffsetDateTime>,
) -> Result<Option<String>, PersistenceError> {
    ts.map(timestamp_text).transpose()
}

pub fn parse_timestamp(column: &str, value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        PersistenceError::SerializationError(format!(
            "{column} holds invalid timestamp '{value}': {e}"
        ))
    })
}

pub fn parse_optional_timestamp(
    column: &str,
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(|v| parse_timestamp(column, v)).transpose()
}

// ============================================================================
// Critters
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = critter)]
#[diesel(primary_key(critter_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(treat_none_as_default_value = false)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CritterRow {
    pub critter_id: String,
    pub itis_tsn: i64,
    pub itis_scientific_name: String,
    pub sex: String,
    pub wlh_id: Option<String>,
    pub animal_id: Option<String>,
    pub critter_comment: Option<String>,
}

impl TryFrom<CritterRow> for Critter {
    type Error = PersistenceError;

    fn try_from(row: CritterRow) -> Result<Self, Self::Error> {
        let sex: Sex = row.sex.parse().map_err(|e| {
            PersistenceError::SerializationError(format!("critter.sex: {e}"))
        })?;
        Ok(Self {
            critter_id: parse_id("critter.critter_id", &row.critter_id)?,
            itis_tsn: TaxonId::new(row.itis_tsn),
            itis_scientific_name: row.itis_scientific_name,
            sex,
            wlh_id: row.wlh_id,
            animal_id: row.animal_id,
            critter_comment: row.critter_comment,
        })
    }
}

// ============================================================================
// Locations
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = location)]
#[diesel(primary_key(location_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(treat_none_as_default_value = false)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LocationRow {
    pub location_id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub coordinate_uncertainty: Option<f64>,
    pub coordinate_uncertainty_unit: Option<String>,
    pub elevation: Option<f64>,
    pub temperature: Option<f64>,
    pub location_comment: Option<String>,
}

impl LocationRow {
    /// Builds a row from a create payload, assigning an id when none is given.
    pub fn from_create(create: &LocationCreate) -> Self {
        Self {
            location_id: id_text(create.location_id.unwrap_or_else(Uuid::new_v4)),
            latitude: create.latitude,
            longitude: create.longitude,
            coordinate_uncertainty: create.coordinate_uncertainty,
            coordinate_uncertainty_unit: create.coordinate_uncertainty_unit.clone(),
            elevation: create.elevation,
            temperature: create.temperature,
            location_comment: create.location_comment.clone(),
        }
    }
}

impl TryFrom<LocationRow> for Location {
    type Error = PersistenceError;

    fn try_from(row: LocationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            location_id: parse_id("location.location_id", &row.location_id)?,
            latitude: row.latitude,
            longitude: row.longitude,
            coordinate_uncertainty: row.coordinate_uncertainty,
            coordinate_uncertainty_unit: row.coordinate_uncertainty_unit,
            elevation: row.elevation,
            temperature: row.temperature,
            location_comment: row.location_comment,
        })
    }
}

// ============================================================================
// Captures and mortalities
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = capture)]
#[diesel(primary_key(capture_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(treat_none_as_default_value = false)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CaptureRow {
    pub capture_id: String,
    pub critter_id: String,
    pub capture_location_id: Option<String>,
    pub release_location_id: Option<String>,
    pub capture_timestamp: String,
    pub release_timestamp: Option<String>,
    pub capture_comment: Option<String>,
    pub release_comment: Option<String>,
}

impl TryFrom<CaptureRow> for Capture {
    type Error = PersistenceError;

    fn try_from(row: CaptureRow) -> Result<Self, Self::Error> {
        Ok(Self {
            capture_id: parse_id("capture.capture_id", &row.capture_id)?,
            critter_id: parse_id("capture.critter_id", &row.critter_id)?,
            capture_location_id: parse_optional_id(
                "capture.capture_location_id",
                row.capture_location_id.as_deref(),
            )?,
            release_location_id: parse_optional_id(
                "capture.release_location_id",
                row.release_location_id.as_deref(),
            )?,
            capture_timestamp: parse_timestamp(
                "capture.capture_timestamp",
                &row.capture_timestamp,
            )?,
            release_timestamp: parse_optional_timestamp(
                "capture.release_timestamp",
                row.release_timestamp.as_deref(),
            )?,
            capture_comment: row.capture_comment,
            release_comment: row.release_comment,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = mortality)]
#[diesel(primary_key(mortality_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(treat_none_as_default_value = false)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MortalityRow {
    pub mortality_id: String,
    pub critter_id: String,
    pub location_id: Option<String>,
    pub mortality_timestamp: String,
    pub mortality_comment: Option<String>,
}

impl TryFrom<MortalityRow> for Mortality {
    type Error = PersistenceError;

    fn try_from(row: MortalityRow) -> Result<Self, Self::Error> {
        Ok(Self {
            mortality_id: parse_id("mortality.mortality_id", &row.mortality_id)?,
            critter_id: parse_id("mortality.critter_id", &row.critter_id)?,
            location_id: parse_optional_id("mortality.location_id", row.location_id.as_deref())?,
            mortality_timestamp: parse_timestamp(
                "mortality.mortality_timestamp",
                &row.mortality_timestamp,
            )?,
            mortality_comment: row.mortality_comment,
        })
    }
}

// ============================================================================
// Markings
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = marking)]
#[diesel(primary_key(marking_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(treat_none_as_default_value = false)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MarkingRow {
    pub marking_id: String,
    pub critter_id: String,
    pub capture_id: Option<String>,
    pub mortality_id: Option<String>,
    pub taxon_marking_body_location_id: Option<String>,
    pub identifier: Option<String>,
    pub frequency: Option<f64>,
    pub frequency_unit: Option<String>,
    pub attached_timestamp: Option<String>,
    pub removed_timestamp: Option<String>,
    pub comment: Option<String>,
}

impl TryFrom<MarkingRow> for Marking {
    type Error = PersistenceError;

    fn try_from(row: MarkingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            marking_id: parse_id("marking.marking_id", &row.marking_id)?,
            critter_id: parse_id("marking.critter_id", &row.critter_id)?,
            capture_id: parse_optional_id("marking.capture_id", row.capture_id.as_deref())?,
            mortality_id: parse_optional_id("marking.mortality_id", row.mortality_id.as_deref())?,
            taxon_marking_body_location_id: parse_optional_id(
                "marking.taxon_marking_body_location_id",
                row.taxon_marking_body_location_id.as_deref(),
            )?,
            identifier: row.identifier,
            frequency: row.frequency,
            frequency_unit: row.frequency_unit,
            attached_timestamp: parse_optional_timestamp(
                "marking.attached_timestamp",
                row.attached_timestamp.as_deref(),
            )?,
            removed_timestamp: parse_optional_timestamp(
                "marking.removed_timestamp",
                row.removed_timestamp.as_deref(),
            )?,
            comment: row.comment,
        })
    }
}

// ============================================================================
// Measurements
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = measurement_qualitative)]
#[diesel(primary_key(measurement_qualitative_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(treat_none_as_default_value = false)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QualitativeMeasurementRow {
    pub measurement_qualitative_id: String,
    pub critter_id: String,
    pub taxon_measurement_id: String,
    pub qualitative_option_id: String,
    pub capture_id: Option<String>,
    pub mortality_id: Option<String>,
    pub measurement_comment: Option<String>,
    pub measured_timestamp: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = measurement_quantitative)]
#[diesel(primary_key(measurement_quantitative_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(treat_none_as_default_value = false)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuantitativeMeasurementRow {
    pub measurement_quantitative_id: String,
    pub critter_id: String,
    pub taxon_measurement_id: String,
    pub value: f64,
    pub capture_id: Option<String>,
    pub mortality_id: Option<String>,
    pub measurement_comment: Option<String>,
    pub measured_timestamp: Option<String>,
}

// ============================================================================
// Collection units and families
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = critter_collection_unit)]
#[diesel(primary_key(critter_collection_unit_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CritterCollectionUnitRow {
    pub critter_collection_unit_id: String,
    pub critter_id: String,
    pub collection_unit_id: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = family)]
#[diesel(treat_none_as_default_value = false)]
pub struct NewFamily {
    pub family_id: String,
    pub family_label: String,
    pub family_comment: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = family_parent)]
pub struct NewFamilyParent {
    pub family_id: String,
    pub parent_critter_id: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = family_child)]
pub struct NewFamilyChild {
    pub family_id: String,
    pub child_critter_id: String,
}

// ============================================================================
// Taxon-scoped definitions
// ============================================================================

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = xref_taxon_marking_body_location)]
#[diesel(treat_none_as_default_value = false)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MarkingBodyLocationRow {
    pub taxon_marking_body_location_id: String,
    pub itis_tsn: i64,
    pub body_location: String,
    pub description: Option<String>,
}

impl TryFrom<MarkingBodyLocationRow> for MarkingBodyLocationDefinition {
    type Error = PersistenceError;

    fn try_from(row: MarkingBodyLocationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            taxon_marking_body_location_id: parse_id(
                "xref_taxon_marking_body_location.taxon_marking_body_location_id",
                &row.taxon_marking_body_location_id,
            )?,
            itis_tsn: TaxonId::new(row.itis_tsn),
            body_location: row.body_location,
            description: row.description,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = xref_taxon_measurement_qualitative)]
#[diesel(treat_none_as_default_value = false)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QualitativeDefinitionRow {
    pub taxon_measurement_id: String,
    pub itis_tsn: i64,
    pub measurement_name: String,
    pub measurement_desc: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = xref_taxon_measurement_qualitative_option)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QualitativeOptionRow {
    pub qualitative_option_id: String,
    pub taxon_measurement_id: String,
    pub option_label: String,
    pub option_value: i32,
}

impl TryFrom<QualitativeOptionRow> for QualitativeOption {
    type Error = PersistenceError;

    fn try_from(row: QualitativeOptionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            qualitative_option_id: parse_id(
                "xref_taxon_measurement_qualitative_option.qualitative_option_id",
                &row.qualitative_option_id,
            )?,
            option_label: row.option_label,
            option_value: row.option_value,
        })
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = xref_taxon_measurement_quantitative)]
#[diesel(treat_none_as_default_value = false)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuantitativeDefinitionRow {
    pub taxon_measurement_id: String,
    pub itis_tsn: i64,
    pub measurement_name: String,
    pub measurement_desc: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub unit: Option<String>,
}

impl TryFrom<QuantitativeDefinitionRow> for QuantitativeMeasurementDefinition {
    type Error = PersistenceError;

    fn try_from(row: QuantitativeDefinitionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            taxon_measurement_id: parse_id(
                "xref_taxon_measurement_quantitative.taxon_measurement_id",
                &row.taxon_measurement_id,
            )?,
            itis_tsn: TaxonId::new(row.itis_tsn),
            measurement_name: row.measurement_name,
            measurement_desc: row.measurement_desc,
            min_value: row.min_value,
            max_value: row.max_value,
            unit: row.unit,
        })
    }
}

/// A collection category as seen through one of its taxon links.
pub type CollectionCategoryLinkRow = (String, i64, String, Option<String>);

pub fn collection_category_from_link(
    (category_id, itis_tsn, category_name, description): CollectionCategoryLinkRow,
) -> Result<CollectionCategoryDefinition, PersistenceError> {
    Ok(CollectionCategoryDefinition {
        collection_category_id: parse_id("collection_category.collection_category_id", &category_id)?,
        itis_tsn: TaxonId::new(itis_tsn),
        category_name,
        description,
    })
}
