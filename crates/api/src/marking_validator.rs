// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Taxon eligibility of marking body locations.
//!
//! A marking may only sit on a body location owned by a member of its
//! critter's ancestor chain. The database does not enforce this; every
//! write path that can place a marking runs through this validator first.

use std::collections::{BTreeSet, HashMap};

use critterbase_domain::{HierarchyChain, TaxonId};
use critterbase_taxonomy::HierarchyResolver;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::SharedPersistence;
use crate::error::{ApiError, translate_persistence_error, translate_taxonomy_error};

/// Outcome of checking stored markings against a taxon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkingVerification {
    /// True exactly when `invalid_markings` is empty.
    pub verified: bool,
    /// Markings whose body location belongs outside the taxon's chain.
    pub invalid_markings: Vec<Uuid>,
}

impl MarkingVerification {
    fn from_invalid(invalid_markings: Vec<Uuid>) -> Self {
        Self {
            verified: invalid_markings.is_empty(),
            invalid_markings,
        }
    }
}

/// A marking that is about to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMarking {
    /// Position within the payload array, reported back on failure.
    pub index: usize,
    pub critter_id: Uuid,
    pub body_location_id: Uuid,
}

/// Checks marking body locations against critter hierarchies.
#[derive(Clone)]
pub struct MarkingValidator {
    resolver: HierarchyResolver,
    persistence: SharedPersistence,
}

impl MarkingValidator {
    #[must_use]
    pub const fn new(resolver: HierarchyResolver, persistence: SharedPersistence) -> Self {
        Self {
            resolver,
            persistence,
        }
    }

    /// Checks stored markings against the chain of `tsn`.
    ///
    /// Ids that match no marking, and markings without a body location,
    /// are never reported as invalid.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain cannot be resolved, even when
    /// `marking_ids` is empty, or if the query fails.
    pub async fn verify(
        &self,
        tsn: TaxonId,
        marking_ids: &[Uuid],
    ) -> Result<MarkingVerification, ApiError> {
        let chain: HierarchyChain = self
            .resolver
            .resolve(tsn)
            .await
            .map_err(translate_taxonomy_error)?;
        if marking_ids.is_empty() {
            return Ok(MarkingVerification::from_invalid(Vec::new()));
        }

        self.verify_against(&chain, marking_ids).await
    }

    /// Checks stored markings against an already resolved chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn verify_against(
        &self,
        chain: &HierarchyChain,
        marking_ids: &[Uuid],
    ) -> Result<MarkingVerification, ApiError> {
        let invalid: Vec<Uuid> = {
            let mut persistence = self.persistence.lock().await;
            persistence
                .markings_outside_chain(chain.as_slice(), marking_ids)
                .map_err(translate_persistence_error)?
        };

        info!(
            tsn = %chain.taxon(),
            checked = marking_ids.len(),
            invalid = invalid.len(),
            "Verified markings against hierarchy"
        );
        Ok(MarkingVerification::from_invalid(invalid))
    }

    /// Checks markings that are not yet stored.
    ///
    /// A critter's taxon is taken from `known_taxa` when present, and from
    /// the database otherwise. Markings whose critter or body location is
    /// unknown are skipped; the write itself rejects those references.
    ///
    /// Returns the payload indices of the offending markings.
    ///
    /// # Errors
    ///
    /// Returns an error if a needed chain cannot be resolved or a query
    /// fails.
    pub async fn verify_pending(
        &self,
        pending: &[PendingMarking],
        known_taxa: &HashMap<Uuid, TaxonId>,
    ) -> Result<Vec<usize>, ApiError> {
        if pending.is_empty() {
            return Ok(Vec::new());
        }

        let body_location_ids: Vec<Uuid> = pending
            .iter()
            .map(|marking| marking.body_location_id)
            .collect::<BTreeSet<Uuid>>()
            .into_iter()
            .collect();
        let stored_critters: Vec<Uuid> = pending
            .iter()
            .map(|marking| marking.critter_id)
            .filter(|critter_id| !known_taxa.contains_key(critter_id))
            .collect::<BTreeSet<Uuid>>()
            .into_iter()
            .collect();

        let (owners, stored_taxa): (HashMap<Uuid, TaxonId>, HashMap<Uuid, TaxonId>) = {
            let mut persistence = self.persistence.lock().await;
            let owners = persistence
                .body_location_owners(&body_location_ids)
                .map_err(translate_persistence_error)?;
            let stored_taxa = if stored_critters.is_empty() {
                HashMap::new()
            } else {
                persistence
                    .critter_taxa(&stored_critters)
                    .map_err(translate_persistence_error)?
            };
            (owners, stored_taxa)
        };

        let critter_taxon = |critter_id: &Uuid| -> Option<TaxonId> {
            known_taxa
                .get(critter_id)
                .or_else(|| stored_taxa.get(critter_id))
                .copied()
        };

        let taxa: Vec<TaxonId> = pending
            .iter()
            .filter_map(|marking| critter_taxon(&marking.critter_id))
            .collect();
        let chains: HashMap<TaxonId, HierarchyChain> = self
            .resolver
            .resolve_many(&taxa)
            .await
            .map_err(translate_taxonomy_error)?;

        let mut offending: Vec<usize> = Vec::new();
        for marking in pending {
            let (Some(owner), Some(tsn)) = (
                owners.get(&marking.body_location_id),
                critter_taxon(&marking.critter_id),
            ) else {
                continue;
            };
            let chain: &HierarchyChain = chains.get(&tsn).ok_or_else(|| ApiError::InvalidHierarchy {
                message: format!("no hierarchy available for taxon {tsn}"),
            })?;
            if !chain.contains(*owner) {
                debug!(
                    index = marking.index,
                    %tsn,
                    owner = %owner,
                    "Marking body location outside critter hierarchy"
                );
                offending.push(marking.index);
            }
        }

        Ok(offending)
    }
}
