// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Resolution of taxon ids into ancestor chains.
//!
//! ## Lookup policy
//!
//! Single and batch lookups deliberately treat missing taxa differently:
//!
//! - `resolve` fails with `InvalidHierarchy` when the authority has no record
//! - `resolve_many` silently omits ids the authority did not return
//!
//! Callers of the batch form decide what a missing entry means for them.
//!
//! Nothing is cached. Every call is a live round trip, batching is the
//! latency mitigation.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use critterbase_domain::{HierarchyChain, TaxonId};
use serde::Serialize;
use tracing::{debug, warn};

use crate::client::{TaxonRecord, TaxonomyAuthority};
use crate::error::TaxonomyError;

/// A taxon as resolved for use by this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTaxon {
    pub tsn: TaxonId,
    pub scientific_name: String,
    pub chain: HierarchyChain,
}

/// Turns taxon ids into validated ancestor chains.
#[derive(Clone)]
pub struct HierarchyResolver {
    authority: Arc<dyn TaxonomyAuthority>,
}

impl HierarchyResolver {
    #[must_use]
    pub fn new(authority: Arc<dyn TaxonomyAuthority>) -> Self {
        Self { authority }
    }

    /// The authority this resolver queries.
    #[must_use]
    pub fn authority(&self) -> &dyn TaxonomyAuthority {
        self.authority.as_ref()
    }

    /// Resolves one taxon into its chain, root first, ending with `tsn`.
    ///
    /// # Errors
    ///
    /// - `InvalidHierarchy` if the authority has no record for `tsn` or the
    ///   chain string is malformed
    /// - `IntegrityMismatch` if the chain does not end with `tsn`
    /// - `ExternalServiceUnreachable` on transport failure
    pub async fn resolve(&self, tsn: TaxonId) -> Result<HierarchyChain, TaxonomyError> {
        Ok(self.resolve_taxon(tsn).await?.chain)
    }

    /// Resolves one taxon, keeping the authority's scientific name.
    ///
    /// # Errors
    ///
    /// Same as `resolve`.
    pub async fn resolve_taxon(&self, tsn: TaxonId) -> Result<ResolvedTaxon, TaxonomyError> {
        debug!(%tsn, "Resolving taxon hierarchy");

        let record: TaxonRecord = self.authority.search_by_tsn(tsn).await?.ok_or_else(|| {
            TaxonomyError::InvalidHierarchy(format!("no record for taxon {tsn}"))
        })?;

        to_resolved(tsn, record)
    }

    /// Resolves several taxa in one batched call.
    ///
    /// Input ids are de-duplicated. Ids the authority does not return are
    /// omitted from the map rather than raising an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the batched call itself fails.
    pub async fn resolve_many(
        &self,
        tsns: &[TaxonId],
    ) -> Result<HashMap<TaxonId, HierarchyChain>, TaxonomyError> {
        Ok(self
            .resolve_taxa(tsns)
            .await?
            .into_iter()
            .map(|(tsn, taxon)| (tsn, taxon.chain))
            .collect())
    }

    /// Batched form of `resolve_taxon`, with the same omission policy as
    /// `resolve_many`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the batched call itself fails.
    pub async fn resolve_taxa(
        &self,
        tsns: &[TaxonId],
    ) -> Result<HashMap<TaxonId, ResolvedTaxon>, TaxonomyError> {
        let unique: Vec<TaxonId> = tsns
            .iter()
            .copied()
            .collect::<BTreeSet<TaxonId>>()
            .into_iter()
            .collect();

        if unique.is_empty() {
            return Ok(HashMap::new());
        }

        debug!(count = unique.len(), "Resolving taxon hierarchies in batch");
        let records: Vec<TaxonRecord> = self.authority.search_by_tsns(&unique).await?;

        let mut resolved: HashMap<TaxonId, ResolvedTaxon> = HashMap::with_capacity(records.len());
        for record in records {
            let tsn: TaxonId = record.tsn;
            if !unique.contains(&tsn) {
                continue;
            }
            match to_resolved(tsn, record) {
                Ok(taxon) => {
                    resolved.insert(tsn, taxon);
                }
                Err(e) => warn!(%tsn, error = %e, "Dropping taxon with unusable hierarchy"),
            }
        }

        let missing: usize = unique.len() - resolved.len();
        if missing > 0 {
            debug!(missing, "Batch hierarchy lookup omitted unknown taxa");
        }

        Ok(resolved)
    }
}

fn to_resolved(tsn: TaxonId, record: TaxonRecord) -> Result<ResolvedTaxon, TaxonomyError> {
    let chain: HierarchyChain = HierarchyChain::parse(tsn, &record.hierarchy)?;
    Ok(ResolvedTaxon {
        tsn,
        scientific_name: record.scientific_name,
        chain,
    })
}
