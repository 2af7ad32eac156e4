// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-process taxonomic authority over a fixed record set.
//!
//! Used by tests across the workspace and for running the server without
//! network access to the real authority.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use critterbase_domain::TaxonId;

use crate::client::{TaxonRecord, TaxonomyAuthority};
use crate::error::TaxonomyError;

#[derive(Debug, Default)]
pub struct InMemoryAuthority {
    records: BTreeMap<TaxonId, TaxonRecord>,
    unreachable: bool,
    calls: AtomicUsize,
}

impl InMemoryAuthority {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a taxon whose ancestors are `ancestors`, root first.
    #[must_use]
    pub fn with_taxon(mut self, tsn: i64, scientific_name: &str, ancestors: &[i64]) -> Self {
        let mut hierarchy: String = String::from("$");
        for ancestor in ancestors.iter().chain(std::iter::once(&tsn)) {
            hierarchy.push_str(&format!("{ancestor}$"));
        }
        self.with_record(TaxonRecord {
            tsn: TaxonId::new(tsn),
            scientific_name: scientific_name.to_string(),
            rank: None,
            hierarchy,
        })
    }

    /// Adds a record verbatim, including malformed hierarchies.
    #[must_use]
    pub fn with_record(mut self, record: TaxonRecord) -> Self {
        self.records.insert(record.tsn, record);
        self
    }

    /// Makes every call fail at the transport level.
    #[must_use]
    pub const fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Number of round trips served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin_call(&self) -> Result<(), TaxonomyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(TaxonomyError::ExternalServiceUnreachable(String::from(
                "connection refused",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TaxonomyAuthority for InMemoryAuthority {
    async fn search_by_tsn(&self, tsn: TaxonId) -> Result<Option<TaxonRecord>, TaxonomyError> {
        self.begin_call()?;
        Ok(self.records.get(&tsn).cloned())
    }

    async fn search_by_tsns(&self, tsns: &[TaxonId]) -> Result<Vec<TaxonRecord>, TaxonomyError> {
        self.begin_call()?;
        Ok(tsns
            .iter()
            .filter_map(|tsn| self.records.get(tsn).cloned())
            .collect())
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<TaxonRecord>, TaxonomyError> {
        self.begin_call()?;
        let needle: String = name.trim().to_lowercase();
        Ok(self
            .records
            .values()
            .filter(|record| record.scientific_name.to_lowercase() == needle)
            .cloned()
            .collect())
    }
}
