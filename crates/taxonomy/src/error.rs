// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Errors raised while talking to the taxonomic authority.

use critterbase_domain::{DomainError, TaxonId};
use thiserror::Error;

/// Taxonomy resolution errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxonomyError {
    /// The authority has no usable record, or returned something unreadable.
    #[error("Invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    /// The authority returned a chain that does not end in the requested taxon.
    #[error("Hierarchy integrity mismatch for taxon {requested}: chain ends with {found:?}")]
    IntegrityMismatch {
        requested: TaxonId,
        found: Option<TaxonId>,
    },

    /// The authority could not be reached or answered with a failure status.
    #[error("Taxonomic authority unreachable: {0}")]
    ExternalServiceUnreachable(String),
}

impl From<DomainError> for TaxonomyError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::IntegrityMismatch { requested, found } => {
                Self::IntegrityMismatch { requested, found }
            }
            other => Self::InvalidHierarchy(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for TaxonomyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidHierarchy(format!("undecodable authority response: {err}"))
        } else {
            Self::ExternalServiceUnreachable(err.to_string())
        }
    }
}
