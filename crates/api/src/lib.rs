// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for Critterbase.
//!
//! This crate sits between the HTTP server and the lower layers. It owns
//! the rules that need both the taxonomic authority and the database:
//! hierarchy-scoped definition lookup, marking eligibility, and the
//! validate-then-mutate flow of bulk operations. Errors from every lower
//! layer are translated into `ApiError` explicitly.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use std::sync::Arc;

use critterbase_persistence::SqlitePersistence;
use tokio::sync::Mutex;

mod bulk;
mod error;
mod handlers;
mod lookup;
mod marking_validator;
mod request_response;

#[cfg(test)]
mod tests;

/// The persistence handle shared by request handlers.
///
/// Holding the lock serializes database access; it is never held across a
/// call to the taxonomic authority.
pub type SharedPersistence = Arc<Mutex<SqlitePersistence>>;

pub use bulk::{BulkMutationCoordinator, BulkOptions, DEFAULT_BULK_TIME_BUDGET};
pub use error::{
    ApiError, translate_domain_error, translate_persistence_error, translate_taxonomy_error,
};
pub use handlers::{create_capture, get_critter_detail, search_taxa, taxon_hierarchy};
pub use lookup::HierarchyScopedLookup;
pub use marking_validator::{MarkingValidator, MarkingVerification, PendingMarking};
pub use request_response::{
    BulkResponse, BulkUpdateRequest, CritterDetail, HierarchyResponse, TaxonDefinitionsQuery,
    TaxonDefinitionsResponse, TaxonSearchQuery, TaxonSearchResponse, VerifyMarkingsRequest,
};
