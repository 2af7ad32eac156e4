// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Taxon identifiers and ancestor chains.
//!
//! A `TaxonId` is the serial number assigned by the external taxonomic
//! authority. This system never owns taxonomic truth; it only derives
//! short-lived `HierarchyChain` values from the authority's responses.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Delimiter used by the authority's ancestor-chain encoding.
const HIERARCHY_DELIMITER: char = '$';

/// A Taxonomic Serial Number issued by the taxonomic authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxonId(i64);

impl TaxonId {
    /// Wraps a raw serial number.
    #[must_use]
    pub const fn new(tsn: i64) -> Self {
        Self(tsn)
    }

    /// Returns the raw serial number.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TaxonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TaxonId {
    fn from(tsn: i64) -> Self {
        Self(tsn)
    }
}

impl FromStr for TaxonId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| DomainError::InvalidHierarchy(format!("'{s}' is not a TSN: {e}")))
    }
}

/// Parses the authority's dollar-delimited ancestor string into taxon ids.
///
/// Empty tokens are skipped and order is preserved, so `"$1$2$"` yields
/// `[1, 2]` and `"$7$"` yields `[7]`.
///
/// # Errors
///
/// Returns `DomainError::InvalidHierarchy` if a non-empty token is not an
/// integer.
pub fn parse_hierarchy(raw: &str) -> Result<Vec<TaxonId>, DomainError> {
    raw.split(HIERARCHY_DELIMITER)
        .filter(|token| !token.trim().is_empty())
        .map(TaxonId::from_str)
        .collect()
}

/// Ordered ancestor chain, root-most first, ending with the queried taxon.
///
/// Construction enforces that the chain is non-empty and that its final
/// element is the taxon it was requested for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HierarchyChain(Vec<TaxonId>);

impl HierarchyChain {
    /// Builds a chain for `requested` from an ordered list of ids.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IntegrityMismatch` if the list is empty or does
    /// not end with `requested`.
    pub fn new(requested: TaxonId, ids: Vec<TaxonId>) -> Result<Self, DomainError> {
        match ids.last() {
            Some(last) if *last == requested => Ok(Self(ids)),
            last => Err(DomainError::IntegrityMismatch {
                requested,
                found: last.copied(),
            }),
        }
    }

    /// Parses a raw authority string and validates it against `requested`.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is malformed or fails the integrity check.
    pub fn parse(requested: TaxonId, raw: &str) -> Result<Self, DomainError> {
        Self::new(requested, parse_hierarchy(raw)?)
    }

    /// The taxon this chain was resolved for.
    #[must_use]
    pub fn taxon(&self) -> TaxonId {
        // Non-empty by construction.
        self.0[self.0.len() - 1]
    }

    /// All ancestors, excluding the taxon itself.
    #[must_use]
    pub fn ancestors(&self) -> &[TaxonId] {
        &self.0[..self.0.len() - 1]
    }

    #[must_use]
    pub fn contains(&self, tsn: TaxonId) -> bool {
        self.0.contains(&tsn)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[TaxonId] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Raw serial numbers, for use in `IN (...)` filters.
    #[must_use]
    pub fn raw_ids(&self) -> Vec<i64> {
        self.0.iter().map(|tsn| tsn.value()).collect()
    }
}
