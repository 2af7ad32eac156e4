// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::taxon::TaxonId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

/// Recorded sex of a critter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
    Hermaphroditic,
}

impl Sex {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown => "Unknown",
            Self::Hermaphroditic => "Hermaphroditic",
        }
    }
}

impl FromStr for Sex {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            "Unknown" => Ok(Self::Unknown),
            "Hermaphroditic" => Ok(Self::Hermaphroditic),
            _ => Err(DomainError::InvalidSex(s.to_string())),
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Persisted records
// ============================================================================

/// A tracked individual animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Critter {
    pub critter_id: Uuid,
    pub itis_tsn: TaxonId,
    pub itis_scientific_name: String,
    pub sex: Sex,
    pub wlh_id: Option<String>,
    pub animal_id: Option<String>,
    pub critter_comment: Option<String>,
}

/// A geographic record referenced by capture and mortality events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub location_id: Uuid,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub coordinate_uncertainty: Option<f64>,
    pub coordinate_uncertainty_unit: Option<String>,
    pub elevation: Option<f64>,
    pub temperature: Option<f64>,
    pub location_comment: Option<String>,
}

/// A capture event.
///
/// `capture_location_id` and `release_location_id` may reference the same
/// location row. That aliasing is the default when only one location was
/// supplied at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    pub capture_id: Uuid,
    pub critter_id: Uuid,
    pub capture_location_id: Option<Uuid>,
    pub release_location_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub capture_timestamp: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub release_timestamp: Option<OffsetDateTime>,
    pub capture_comment: Option<String>,
    pub release_comment: Option<String>,
}

impl Capture {
    /// Whether both location slots currently reference the same row.
    #[must_use]
    pub fn locations_aliased(&self) -> bool {
        matches!(
            (self.capture_location_id, self.release_location_id),
            (Some(capture), Some(release)) if capture == release
        )
    }
}

/// A mortality event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mortality {
    pub mortality_id: Uuid,
    pub critter_id: Uuid,
    pub location_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub mortality_timestamp: OffsetDateTime,
    pub mortality_comment: Option<String>,
}

/// A physical marker attached to a critter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marking {
    pub marking_id: Uuid,
    pub critter_id: Uuid,
    pub capture_id: Option<Uuid>,
    pub mortality_id: Option<Uuid>,
    pub taxon_marking_body_location_id: Option<Uuid>,
    pub identifier: Option<String>,
    pub frequency: Option<f64>,
    pub frequency_unit: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub attached_timestamp: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub removed_timestamp: Option<OffsetDateTime>,
    pub comment: Option<String>,
}

/// Link between a critter and a collection unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CritterCollectionUnit {
    pub critter_collection_unit_id: Uuid,
    pub critter_id: Uuid,
    pub collection_unit_id: Uuid,
}

// ============================================================================
// Taxon-scoped definitions
// ============================================================================

/// Body location a marking may be attached to, owned by one taxon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkingBodyLocationDefinition {
    pub taxon_marking_body_location_id: Uuid,
    pub itis_tsn: TaxonId,
    pub body_location: String,
    pub description: Option<String>,
}

/// One selectable value of a qualitative measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualitativeOption {
    pub qualitative_option_id: Uuid,
    pub option_label: String,
    pub option_value: i32,
}

/// Qualitative measurement definition with its option set attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualitativeMeasurementDefinition {
    pub taxon_measurement_id: Uuid,
    pub itis_tsn: TaxonId,
    pub measurement_name: String,
    pub measurement_desc: Option<String>,
    pub options: Vec<QualitativeOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitativeMeasurementDefinition {
    pub taxon_measurement_id: Uuid,
    pub itis_tsn: TaxonId,
    pub measurement_name: String,
    pub measurement_desc: Option<String>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub unit: Option<String>,
}

/// Collection category made available to a taxon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionCategoryDefinition {
    pub collection_category_id: Uuid,
    pub itis_tsn: TaxonId,
    pub category_name: String,
    pub description: Option<String>,
}

/// The kinds of definition a taxon inherits from its ancestors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    MarkingBodyLocation,
    QualitativeMeasurement,
    QuantitativeMeasurement,
    CollectionUnitCategory,
}

impl DefinitionKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MarkingBodyLocation => "marking_body_location",
            Self::QualitativeMeasurement => "qualitative_measurement",
            Self::QuantitativeMeasurement => "quantitative_measurement",
            Self::CollectionUnitCategory => "collection_unit_category",
        }
    }
}

impl std::fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A definition row usable by a taxon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Definition {
    MarkingBodyLocation(MarkingBodyLocationDefinition),
    QualitativeMeasurement(QualitativeMeasurementDefinition),
    QuantitativeMeasurement(QuantitativeMeasurementDefinition),
    CollectionUnitCategory(CollectionCategoryDefinition),
}

impl Definition {
    /// The taxon that owns this definition.
    #[must_use]
    pub const fn owner(&self) -> TaxonId {
        match self {
            Self::MarkingBodyLocation(d) => d.itis_tsn,
            Self::QualitativeMeasurement(d) => d.itis_tsn,
            Self::QuantitativeMeasurement(d) => d.itis_tsn,
            Self::CollectionUnitCategory(d) => d.itis_tsn,
        }
    }
}

// ============================================================================
// Create inputs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritterCreate {
    pub critter_id: Option<Uuid>,
    pub itis_tsn: TaxonId,
    /// Filled from the taxonomic authority when omitted.
    pub itis_scientific_name: Option<String>,
    #[serde(default)]
    pub sex: Sex,
    pub wlh_id: Option<String>,
    pub animal_id: Option<String>,
    pub critter_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationCreate {
    pub location_id: Option<Uuid>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub coordinate_uncertainty: Option<f64>,
    pub coordinate_uncertainty_unit: Option<String>,
    pub elevation: Option<f64>,
    pub temperature: Option<f64>,
    pub location_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureCreate {
    pub capture_id: Option<Uuid>,
    pub critter_id: Uuid,
    pub capture_location: Option<LocationCreate>,
    pub release_location: Option<LocationCreate>,
    #[serde(with = "time::serde::rfc3339")]
    pub capture_timestamp: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub release_timestamp: Option<OffsetDateTime>,
    pub capture_comment: Option<String>,
    pub release_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortalityCreate {
    pub mortality_id: Option<Uuid>,
    pub critter_id: Uuid,
    pub location: Option<LocationCreate>,
    #[serde(with = "time::serde::rfc3339")]
    pub mortality_timestamp: OffsetDateTime,
    pub mortality_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkingCreate {
    pub marking_id: Option<Uuid>,
    pub critter_id: Uuid,
    pub capture_id: Option<Uuid>,
    pub mortality_id: Option<Uuid>,
    pub taxon_marking_body_location_id: Option<Uuid>,
    pub identifier: Option<String>,
    pub frequency: Option<f64>,
    pub frequency_unit: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub attached_timestamp: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub removed_timestamp: Option<OffsetDateTime>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitativeMeasurementCreate {
    pub measurement_qualitative_id: Option<Uuid>,
    pub critter_id: Uuid,
    pub taxon_measurement_id: Uuid,
    pub qualitative_option_id: Uuid,
    pub capture_id: Option<Uuid>,
    pub mortality_id: Option<Uuid>,
    pub measurement_comment: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub measured_timestamp: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitativeMeasurementCreate {
    pub measurement_quantitative_id: Option<Uuid>,
    pub critter_id: Uuid,
    pub taxon_measurement_id: Uuid,
    pub value: f64,
    pub capture_id: Option<Uuid>,
    pub mortality_id: Option<Uuid>,
    pub measurement_comment: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub measured_timestamp: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionUnitLinkCreate {
    pub critter_collection_unit_id: Option<Uuid>,
    pub critter_id: Uuid,
    pub collection_unit_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyCreate {
    pub family_id: Option<Uuid>,
    pub family_label: String,
    pub family_comment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FamilyParentLink {
    pub family_id: Uuid,
    pub parent_critter_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FamilyChildLink {
    pub family_id: Uuid,
    pub child_critter_id: Uuid,
}

// ============================================================================
// Update inputs
//
// `None` leaves a column unchanged.
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CritterUpdate {
    pub critter_id: Option<Uuid>,
    pub itis_tsn: Option<TaxonId>,
    pub itis_scientific_name: Option<String>,
    pub sex: Option<Sex>,
    pub wlh_id: Option<String>,
    pub animal_id: Option<String>,
    pub critter_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationPatch {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub coordinate_uncertainty: Option<f64>,
    pub coordinate_uncertainty_unit: Option<String>,
    pub elevation: Option<f64>,
    pub temperature: Option<f64>,
    pub location_comment: Option<String>,
}

impl LocationPatch {
    /// Overlays this patch onto an existing location's attributes.
    #[must_use]
    pub fn apply_to(&self, base: &Location) -> LocationCreate {
        LocationCreate {
            location_id: None,
            latitude: self.latitude.or(base.latitude),
            longitude: self.longitude.or(base.longitude),
            coordinate_uncertainty: self.coordinate_uncertainty.or(base.coordinate_uncertainty),
            coordinate_uncertainty_unit: self
                .coordinate_uncertainty_unit
                .clone()
                .or_else(|| base.coordinate_uncertainty_unit.clone()),
            elevation: self.elevation.or(base.elevation),
            temperature: self.temperature.or(base.temperature),
            location_comment: self
                .location_comment
                .clone()
                .or_else(|| base.location_comment.clone()),
        }
    }

    /// Converts this patch into a fresh location payload.
    #[must_use]
    pub fn to_create(&self) -> LocationCreate {
        LocationCreate {
            location_id: None,
            latitude: self.latitude,
            longitude: self.longitude,
            coordinate_uncertainty: self.coordinate_uncertainty,
            coordinate_uncertainty_unit: self.coordinate_uncertainty_unit.clone(),
            elevation: self.elevation,
            temperature: self.temperature,
            location_comment: self.location_comment.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub location_id: Option<Uuid>,
    #[serde(flatten)]
    pub patch: LocationPatch,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CaptureUpdate {
    pub capture_id: Option<Uuid>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub capture_timestamp: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub release_timestamp: Option<OffsetDateTime>,
    pub capture_comment: Option<String>,
    pub release_comment: Option<String>,
    pub capture_location: Option<LocationPatch>,
    pub release_location: Option<LocationPatch>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MortalityUpdate {
    pub mortality_id: Option<Uuid>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub mortality_timestamp: Option<OffsetDateTime>,
    pub mortality_comment: Option<String>,
    pub location: Option<LocationPatch>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarkingPatch {
    pub capture_id: Option<Uuid>,
    pub mortality_id: Option<Uuid>,
    pub taxon_marking_body_location_id: Option<Uuid>,
    pub identifier: Option<String>,
    pub frequency: Option<f64>,
    pub frequency_unit: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub attached_timestamp: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub removed_timestamp: Option<OffsetDateTime>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QualitativeMeasurementPatch {
    pub qualitative_option_id: Option<Uuid>,
    pub measurement_comment: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub measured_timestamp: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuantitativeMeasurementPatch {
    pub value: Option<f64>,
    pub measurement_comment: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub measured_timestamp: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollectionUnitLinkUpdate {
    pub critter_collection_unit_id: Option<Uuid>,
    pub collection_unit_id: Option<Uuid>,
}
