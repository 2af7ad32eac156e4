// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk mutation coordination.
//!
//! ## Validate, then mutate
//!
//! Every network round trip to the taxonomic authority happens before the
//! persistence lock is taken and before the transaction opens:
//!
//! 1. payload structure (required ids, value ranges)
//! 2. critter taxa, resolved in one batch; missing scientific names are
//!    filled from the authority
//! 3. marking body locations against their critters' hierarchies
//! 4. for critter taxon changes, the critter's stored markings against the
//!    new hierarchy
//!
//! Only then is the payload handed to the persistence layer, which applies
//! it in a single transaction bounded by the remaining time budget.

use std::collections::HashMap;
use std::time::Duration;

use critterbase_domain::{
    BulkCounts, BulkCreate, BulkDelete, BulkUpdate, EntityKind, Marking, RowOp, TaxonId,
    validate_bulk_create, validate_bulk_update,
};
use critterbase_persistence::{Deadline, PersistenceError};
use critterbase_taxonomy::{HierarchyResolver, ResolvedTaxon};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::SharedPersistence;
use crate::error::{
    ApiError, translate_domain_error, translate_persistence_error, translate_taxonomy_error,
};
use crate::marking_validator::{MarkingValidator, MarkingVerification, PendingMarking};

/// Default time budget for one bulk call.
pub const DEFAULT_BULK_TIME_BUDGET: Duration = Duration::from_secs(30);

/// Tunables for bulk operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOptions {
    /// Wall-clock budget for a whole call, validation included.
    pub time_budget: Duration,
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self {
            time_budget: DEFAULT_BULK_TIME_BUDGET,
        }
    }
}

/// Drives bulk create, update and delete requests.
#[derive(Clone)]
pub struct BulkMutationCoordinator {
    resolver: HierarchyResolver,
    markings: MarkingValidator,
    persistence: SharedPersistence,
    options: BulkOptions,
}

impl BulkMutationCoordinator {
    #[must_use]
    pub fn new(
        resolver: HierarchyResolver,
        persistence: SharedPersistence,
        options: BulkOptions,
    ) -> Self {
        Self {
            markings: MarkingValidator::new(resolver.clone(), persistence.clone()),
            resolver,
            persistence,
            options,
        }
    }

    #[must_use]
    pub const fn options(&self) -> BulkOptions {
        self.options
    }

    /// Creates every row of `payload` in one transaction.
    ///
    /// # Errors
    ///
    /// Returns the first validation, hierarchy, eligibility or storage
    /// error. Nothing is written on error.
    pub async fn bulk_create(&self, mut payload: BulkCreate) -> Result<BulkCounts, ApiError> {
        let deadline: Deadline = Deadline::after(self.options.time_budget);

        validate_bulk_create(&payload).map_err(translate_domain_error)?;
        self.fill_scientific_names(&mut payload).await?;

        let known_taxa: HashMap<Uuid, TaxonId> = payload
            .critters
            .iter()
            .filter_map(|critter| critter.critter_id.map(|id| (id, critter.itis_tsn)))
            .collect();
        let pending: Vec<PendingMarking> = payload
            .markings
            .iter()
            .enumerate()
            .filter_map(|(index, marking)| {
                marking
                    .taxon_marking_body_location_id
                    .map(|body_location_id| PendingMarking {
                        index,
                        critter_id: marking.critter_id,
                        body_location_id,
                    })
            })
            .collect();
        self.reject_ineligible_markings(&pending, &known_taxa).await?;

        let counts: BulkCounts = {
            let mut persistence = self.persistence.lock().await;
            persistence
                .bulk_create(&payload, deadline)
                .map_err(translate_bulk_error)?
        };

        info!(
            critters = counts.created_of(EntityKind::Critter),
            markings = counts.created_of(EntityKind::Marking),
            "Bulk create complete"
        );
        Ok(counts)
    }

    /// Applies `payload` and `deletes` in one transaction.
    ///
    /// # Errors
    ///
    /// Returns the first validation, hierarchy, eligibility or storage
    /// error. Nothing is written on error.
    pub async fn bulk_update(
        &self,
        mut payload: BulkUpdate,
        deletes: BulkDelete,
    ) -> Result<BulkCounts, ApiError> {
        let deadline: Deadline = Deadline::after(self.options.time_budget);

        validate_bulk_update(&payload).map_err(translate_domain_error)?;
        let new_taxa: HashMap<Uuid, TaxonId> = self.resolve_taxon_changes(&mut payload).await?;
        self.verify_taxon_changes(&new_taxa, &payload, &deletes).await?;
        let pending: Vec<PendingMarking> = self.pending_marking_changes(&payload).await;
        self.reject_ineligible_markings(&pending, &new_taxa).await?;

        let counts: BulkCounts = {
            let mut persistence = self.persistence.lock().await;
            persistence
                .bulk_update(&payload, &deletes, deadline)
                .map_err(translate_bulk_error)?
        };

        info!(updated = ?counts.updated, deleted = ?counts.deleted, "Bulk update complete");
        Ok(counts)
    }

    /// Deletes every listed row in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for any missing id, `DomainRuleViolation`
    /// if a row is still referenced, or `TransactionTimeout`. Nothing is
    /// deleted on error.
    pub async fn bulk_delete(&self, deletes: BulkDelete) -> Result<BulkCounts, ApiError> {
        let deadline: Deadline = Deadline::after(self.options.time_budget);

        let counts: BulkCounts = {
            let mut persistence = self.persistence.lock().await;
            persistence
                .bulk_delete(&deletes, deadline)
                .map_err(translate_bulk_error)?
        };

        info!(deleted = ?counts.deleted, "Bulk delete complete");
        Ok(counts)
    }

    /// Resolves every critter taxon in one batch and fills missing names.
    async fn fill_scientific_names(&self, payload: &mut BulkCreate) -> Result<(), ApiError> {
        let tsns: Vec<TaxonId> = payload.critters.iter().map(|c| c.itis_tsn).collect();
        let resolved: HashMap<TaxonId, ResolvedTaxon> = self
            .resolver
            .resolve_taxa(&tsns)
            .await
            .map_err(translate_taxonomy_error)?;

        for (index, critter) in payload.critters.iter_mut().enumerate() {
            let taxon: &ResolvedTaxon =
                resolved
                    .get(&critter.itis_tsn)
                    .ok_or_else(|| ApiError::InvalidHierarchy {
                        message: format!(
                            "critters[{index}]: taxon {} is unknown to the authority",
                            critter.itis_tsn
                        ),
                    })?;
            if critter.itis_scientific_name.is_none() {
                critter.itis_scientific_name = Some(taxon.scientific_name.clone());
            }
        }
        Ok(())
    }

    /// Resolves the new taxa of critter updates that change taxon.
    ///
    /// Returns each changed critter's new taxon.
    async fn resolve_taxon_changes(
        &self,
        payload: &mut BulkUpdate,
    ) -> Result<HashMap<Uuid, TaxonId>, ApiError> {
        let tsns: Vec<TaxonId> = payload
            .critters
            .iter()
            .filter_map(|critter| critter.itis_tsn)
            .collect();
        if tsns.is_empty() {
            return Ok(HashMap::new());
        }

        let resolved: HashMap<TaxonId, ResolvedTaxon> = self
            .resolver
            .resolve_taxa(&tsns)
            .await
            .map_err(translate_taxonomy_error)?;

        let mut changed: HashMap<Uuid, TaxonId> = HashMap::new();
        for (index, critter) in payload.critters.iter_mut().enumerate() {
            let (Some(critter_id), Some(tsn)) = (critter.critter_id, critter.itis_tsn) else {
                continue;
            };
            let taxon: &ResolvedTaxon =
                resolved.get(&tsn).ok_or_else(|| ApiError::InvalidHierarchy {
                    message: format!("critters[{index}]: taxon {tsn} is unknown to the authority"),
                })?;
            if critter.itis_scientific_name.is_none() {
                critter.itis_scientific_name = Some(taxon.scientific_name.clone());
            }
            changed.insert(critter_id, tsn);
        }
        Ok(changed)
    }

    /// Checks that critters changing taxon keep only eligible markings.
    ///
    /// Markings deleted or moved to another body location in the same
    /// request are not held against the new taxon.
    async fn verify_taxon_changes(
        &self,
        new_taxa: &HashMap<Uuid, TaxonId>,
        payload: &BulkUpdate,
        deletes: &BulkDelete,
    ) -> Result<(), ApiError> {
        let mut superseded: Vec<Uuid> = deletes.markings.clone();
        for op in &payload.markings {
            match op {
                RowOp::Delete { id } => superseded.push(*id),
                RowOp::Update { id, patch } if patch.taxon_marking_body_location_id.is_some() => {
                    superseded.push(*id);
                }
                _ => {}
            }
        }

        for (critter_id, tsn) in new_taxa {
            let stored: Vec<Marking> = {
                let mut persistence = self.persistence.lock().await;
                persistence
                    .list_markings_for_critter(*critter_id)
                    .map_err(translate_persistence_error)?
            };
            let marking_ids: Vec<Uuid> = stored
                .iter()
                .map(|marking| marking.marking_id)
                .filter(|id| !superseded.contains(id))
                .collect();
            if marking_ids.is_empty() {
                continue;
            }

            let chain = self
                .resolver
                .resolve(*tsn)
                .await
                .map_err(translate_taxonomy_error)?;
            let verification: MarkingVerification =
                self.markings.verify_against(&chain, &marking_ids).await?;
            if !verification.verified {
                warn!(
                    %critter_id,
                    %tsn,
                    invalid = ?verification.invalid_markings,
                    "Taxon change would leave markings outside the new hierarchy"
                );
                return Err(ApiError::DomainRuleViolation {
                    rule: String::from("marking_body_location_taxon"),
                    message: format!(
                        "critter {critter_id} cannot change to taxon {tsn}: markings {:?} use body locations outside its hierarchy",
                        verification.invalid_markings
                    ),
                });
            }
        }
        Ok(())
    }

    /// Marking creates and body-location changes in an update payload.
    async fn pending_marking_changes(&self, payload: &BulkUpdate) -> Vec<PendingMarking> {
        let mut pending: Vec<PendingMarking> = Vec::new();
        for (index, op) in payload.markings.iter().enumerate() {
            match op {
                RowOp::Create(create) => {
                    if let Some(body_location_id) = create.taxon_marking_body_location_id {
                        pending.push(PendingMarking {
                            index,
                            critter_id: create.critter_id,
                            body_location_id,
                        });
                    }
                }
                RowOp::Update { id, patch } => {
                    let Some(body_location_id) = patch.taxon_marking_body_location_id else {
                        continue;
                    };
                    let stored: Result<Marking, PersistenceError> = {
                        let mut persistence = self.persistence.lock().await;
                        persistence.get_marking(*id)
                    };
                    // A missing marking fails inside the transaction with NotFound.
                    if let Ok(stored) = stored {
                        pending.push(PendingMarking {
                            index,
                            critter_id: stored.critter_id,
                            body_location_id,
                        });
                    }
                }
                RowOp::Delete { .. } => {}
            }
        }
        pending
    }

    async fn reject_ineligible_markings(
        &self,
        pending: &[PendingMarking],
        known_taxa: &HashMap<Uuid, TaxonId>,
    ) -> Result<(), ApiError> {
        let offending: Vec<usize> = self.markings.verify_pending(pending, known_taxa).await?;
        match offending.first() {
            None => Ok(()),
            Some(first) => {
                debug!(?offending, "Rejecting bulk payload with ineligible markings");
                Err(ApiError::DomainRuleViolation {
                    rule: String::from("marking_body_location_taxon"),
                    message: format!(
                        "markings[{first}] uses a body location outside its critter's hierarchy ({} offending)",
                        offending.len()
                    ),
                })
            }
        }
    }
}

fn translate_bulk_error(err: PersistenceError) -> ApiError {
    if err == PersistenceError::TransactionTimeout {
        warn!("Bulk transaction exceeded its time budget and was rolled back");
    }
    translate_persistence_error(err)
}
