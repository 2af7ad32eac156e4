// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk mutation payloads and result counts.
//!
//! A bulk payload is request-scoped: it exists only to drive one database
//! transaction and is never persisted as a whole.

use crate::types::{
    CaptureCreate, CaptureUpdate, CollectionUnitLinkCreate, CollectionUnitLinkUpdate,
    CritterCreate, CritterUpdate, FamilyChildLink, FamilyCreate, FamilyParentLink, LocationCreate,
    LocationUpdate, MarkingCreate, MarkingPatch, MortalityCreate, MortalityUpdate,
    QualitativeMeasurementCreate, QualitativeMeasurementPatch, QuantitativeMeasurementCreate,
    QuantitativeMeasurementPatch,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// The entity kinds a bulk payload can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "critters")]
    Critter,
    #[serde(rename = "captures")]
    Capture,
    #[serde(rename = "mortalities")]
    Mortality,
    #[serde(rename = "locations")]
    Location,
    #[serde(rename = "markings")]
    Marking,
    #[serde(rename = "qualitative_measurements")]
    QualitativeMeasurement,
    #[serde(rename = "quantitative_measurements")]
    QuantitativeMeasurement,
    #[serde(rename = "collection_units")]
    CollectionUnit,
    #[serde(rename = "families")]
    Family,
    #[serde(rename = "family_parents")]
    FamilyParent,
    #[serde(rename = "family_children")]
    FamilyChild,
}

impl EntityKind {
    /// The payload array name for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critter => "critters",
            Self::Capture => "captures",
            Self::Mortality => "mortalities",
            Self::Location => "locations",
            Self::Marking => "markings",
            Self::QualitativeMeasurement => "qualitative_measurements",
            Self::QuantitativeMeasurement => "quantitative_measurements",
            Self::CollectionUnit => "collection_units",
            Self::Family => "families",
            Self::FamilyParent => "family_parents",
            Self::FamilyChild => "family_children",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An explicit per-row operation.
///
/// Rows never infer create-versus-update from whether an id happens to be
/// present; the variant states the intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RowOp<C, P> {
    Create(C),
    Update { id: Uuid, patch: P },
    Delete { id: Uuid },
}

impl<C, P> RowOp<C, P> {
    /// The phase this operation is counted under.
    #[must_use]
    pub const fn phase(&self) -> MutationPhase {
        match self {
            Self::Create(_) => MutationPhase::Created,
            Self::Update { .. } => MutationPhase::Updated,
            Self::Delete { .. } => MutationPhase::Deleted,
        }
    }
}

pub type MarkingOp = RowOp<MarkingCreate, MarkingPatch>;
pub type QualitativeMeasurementOp = RowOp<QualitativeMeasurementCreate, QualitativeMeasurementPatch>;
pub type QuantitativeMeasurementOp =
    RowOp<QuantitativeMeasurementCreate, QuantitativeMeasurementPatch>;

/// Rows to insert in one transaction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkCreate {
    pub critters: Vec<CritterCreate>,
    pub captures: Vec<CaptureCreate>,
    pub mortalities: Vec<MortalityCreate>,
    pub locations: Vec<LocationCreate>,
    pub markings: Vec<MarkingCreate>,
    pub qualitative_measurements: Vec<QualitativeMeasurementCreate>,
    pub quantitative_measurements: Vec<QuantitativeMeasurementCreate>,
    pub collection_units: Vec<CollectionUnitLinkCreate>,
    pub families: Vec<FamilyCreate>,
    pub family_parents: Vec<FamilyParentLink>,
    pub family_children: Vec<FamilyChildLink>,
}

impl BulkCreate {
    /// Input array length per entity kind, including empty arrays.
    #[must_use]
    pub fn lengths(&self) -> BTreeMap<EntityKind, usize> {
        BTreeMap::from([
            (EntityKind::Critter, self.critters.len()),
            (EntityKind::Capture, self.captures.len()),
            (EntityKind::Mortality, self.mortalities.len()),
            (EntityKind::Location, self.locations.len()),
            (EntityKind::Marking, self.markings.len()),
            (
                EntityKind::QualitativeMeasurement,
                self.qualitative_measurements.len(),
            ),
            (
                EntityKind::QuantitativeMeasurement,
                self.quantitative_measurements.len(),
            ),
            (EntityKind::CollectionUnit, self.collection_units.len()),
            (EntityKind::Family, self.families.len()),
            (EntityKind::FamilyParent, self.family_parents.len()),
            (EntityKind::FamilyChild, self.family_children.len()),
        ])
    }
}

/// Rows to update in one transaction.
///
/// Id-keyed kinds must carry their primary id. Markings and measurements use
/// explicit `RowOp` variants.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkUpdate {
    pub critters: Vec<CritterUpdate>,
    pub collection_units: Vec<CollectionUnitLinkUpdate>,
    pub locations: Vec<LocationUpdate>,
    pub captures: Vec<CaptureUpdate>,
    pub mortalities: Vec<MortalityUpdate>,
    pub markings: Vec<MarkingOp>,
    pub qualitative_measurements: Vec<QualitativeMeasurementOp>,
    pub quantitative_measurements: Vec<QuantitativeMeasurementOp>,
}

/// Explicit id lists to delete in one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkDelete {
    pub markings: Vec<Uuid>,
    pub collection_units: Vec<Uuid>,
    pub captures: Vec<Uuid>,
    pub mortalities: Vec<Uuid>,
    pub qualitative_measurements: Vec<Uuid>,
    pub quantitative_measurements: Vec<Uuid>,
    pub family_parents: Vec<FamilyParentLink>,
    pub family_children: Vec<FamilyChildLink>,
}

impl BulkDelete {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markings.is_empty()
            && self.collection_units.is_empty()
            && self.captures.is_empty()
            && self.mortalities.is_empty()
            && self.qualitative_measurements.is_empty()
            && self.quantitative_measurements.is_empty()
            && self.family_parents.is_empty()
            && self.family_children.is_empty()
    }
}

/// Which result bucket a step is counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationPhase {
    Created,
    Updated,
    Deleted,
}

/// The result of one step of a bulk transaction.
///
/// Steps return outcomes instead of mutating shared counters; the outcomes
/// are folded into `BulkCounts` only after the transaction commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub phase: MutationPhase,
    pub kind: EntityKind,
    pub count: usize,
}

impl StepOutcome {
    #[must_use]
    pub const fn created(kind: EntityKind, count: usize) -> Self {
        Self {
            phase: MutationPhase::Created,
            kind,
            count,
        }
    }

    #[must_use]
    pub const fn updated(kind: EntityKind, count: usize) -> Self {
        Self {
            phase: MutationPhase::Updated,
            kind,
            count,
        }
    }

    #[must_use]
    pub const fn deleted(kind: EntityKind, count: usize) -> Self {
        Self {
            phase: MutationPhase::Deleted,
            kind,
            count,
        }
    }
}

/// Per-kind row counts of a committed bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BulkCounts {
    pub created: BTreeMap<EntityKind, usize>,
    pub updated: BTreeMap<EntityKind, usize>,
    pub deleted: BTreeMap<EntityKind, usize>,
}

impl BulkCounts {
    /// Folds step outcomes into per-kind totals.
    #[must_use]
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = StepOutcome>,
    {
        let mut counts: Self = Self::default();
        for outcome in outcomes {
            let bucket: &mut BTreeMap<EntityKind, usize> = match outcome.phase {
                MutationPhase::Created => &mut counts.created,
                MutationPhase::Updated => &mut counts.updated,
                MutationPhase::Deleted => &mut counts.deleted,
            };
            *bucket.entry(outcome.kind).or_insert(0) += outcome.count;
        }
        counts
    }

    #[must_use]
    pub fn created_of(&self, kind: EntityKind) -> usize {
        self.created.get(&kind).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn updated_of(&self, kind: EntityKind) -> usize {
        self.updated.get(&kind).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn deleted_of(&self, kind: EntityKind) -> usize {
        self.deleted.get(&kind).copied().unwrap_or(0)
    }
}
