// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use critterbase_domain::{
    BulkCounts, BulkDelete, BulkUpdate, Capture, Critter, Definition, DefinitionKind, Marking,
    Mortality, TaxonId,
};
use critterbase_taxonomy::TaxonRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API response for a committed bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResponse {
    /// Always true; failures are reported as errors instead.
    pub success: bool,
    /// Rows created, updated and deleted per entity kind.
    pub counts: BulkCounts,
}

impl From<BulkCounts> for BulkResponse {
    fn from(counts: BulkCounts) -> Self {
        Self {
            success: true,
            counts,
        }
    }
}

/// API request for a bulk update.
///
/// Deletes listed here are applied in the same transaction as the updates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkUpdateRequest {
    pub updates: BulkUpdate,
    pub deletes: BulkDelete,
}

/// API request to check stored markings against a taxon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyMarkingsRequest {
    /// The taxon the markings must be eligible for.
    pub itis_tsn: TaxonId,
    /// The markings to check.
    pub markings: Vec<Uuid>,
}

/// API query for the definitions a taxon inherits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonDefinitionsQuery {
    pub tsn: TaxonId,
    pub kind: DefinitionKind,
}

/// API response listing inherited definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonDefinitionsResponse {
    pub tsn: TaxonId,
    pub kind: DefinitionKind,
    /// Definitions owned by the taxon or any of its ancestors.
    pub definitions: Vec<Definition>,
}

/// API response for a resolved taxon hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyResponse {
    pub tsn: TaxonId,
    pub scientific_name: String,
    /// Ancestor chain, root first, ending with `tsn`.
    pub hierarchy: Vec<TaxonId>,
}

/// API query for a taxon name search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonSearchQuery {
    pub name: String,
}

/// API response for a taxon name search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonSearchResponse {
    pub taxa: Vec<TaxonRecord>,
}

/// A critter with its events and markings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritterDetail {
    #[serde(flatten)]
    pub critter: Critter,
    pub captures: Vec<Capture>,
    pub mortalities: Vec<Mortality>,
    pub markings: Vec<Marking>,
}
