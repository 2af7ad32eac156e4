// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod bulk;
mod error;
mod location_share;
mod taxon;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use bulk::{
    BulkCounts, BulkCreate, BulkDelete, BulkUpdate, EntityKind, MarkingOp, MutationPhase,
    QualitativeMeasurementOp, QuantitativeMeasurementOp, RowOp, StepOutcome,
};
pub use error::DomainError;
pub use location_share::{
    CaptureLocationMirror, CaptureLocationPlan, LocationSlotAction, plan_capture_location_create,
    plan_capture_location_update, plan_single_location_update,
};
pub use taxon::{HierarchyChain, TaxonId, parse_hierarchy};
pub use types::{
    Capture, CaptureCreate, CaptureUpdate, CollectionCategoryDefinition, CollectionUnitLinkCreate,
    CollectionUnitLinkUpdate, Critter, CritterCollectionUnit, CritterCreate, CritterUpdate,
    Definition, DefinitionKind, FamilyChildLink, FamilyCreate, FamilyParentLink, Location,
    LocationCreate, LocationPatch, LocationUpdate, Marking, MarkingBodyLocationDefinition,
    MarkingCreate, MarkingPatch, Mortality, MortalityCreate, MortalityUpdate,
    QualitativeMeasurementCreate, QualitativeMeasurementDefinition, QualitativeMeasurementPatch,
    QualitativeOption, QuantitativeMeasurementCreate, QuantitativeMeasurementDefinition,
    QuantitativeMeasurementPatch, Sex,
};
pub use validation::{validate_bulk_create, validate_bulk_update};
