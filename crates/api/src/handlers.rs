// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Single-entity and taxonomy request handlers.
//!
//! Handlers that only touch the database take the persistence handle
//! directly; the caller owns locking. Taxonomy handlers only talk to the
//! authority.

use critterbase_domain::{
    BulkCreate, Capture, CaptureCreate, Critter, TaxonId, validate_bulk_create,
};
use critterbase_persistence::SqlitePersistence;
use critterbase_taxonomy::{HierarchyResolver, ResolvedTaxon, TaxonRecord};
use tracing::info;
use uuid::Uuid;

use crate::error::{
    ApiError, translate_domain_error, translate_persistence_error, translate_taxonomy_error,
};
use crate::request_response::{CritterDetail, HierarchyResponse, TaxonSearchResponse};

/// Loads a critter with its captures, mortalities and markings.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the critter does not exist.
pub fn get_critter_detail(
    persistence: &mut SqlitePersistence,
    critter_id: Uuid,
) -> Result<CritterDetail, ApiError> {
    let critter: Critter = persistence
        .get_critter(critter_id)
        .map_err(translate_persistence_error)?;

    Ok(CritterDetail {
        critter,
        captures: persistence
            .list_captures_for_critter(critter_id)
            .map_err(translate_persistence_error)?,
        mortalities: persistence
            .list_mortalities_for_critter(critter_id)
            .map_err(translate_persistence_error)?,
        markings: persistence
            .list_markings_for_critter(critter_id)
            .map_err(translate_persistence_error)?,
    })
}

/// Creates one capture with its inline locations.
///
/// The location mirror default is the same as for bulk create: a single
/// supplied location fills both slots.
///
/// # Errors
///
/// Returns `InvalidInput` for out-of-range values, or a translated storage
/// error such as an unknown critter.
pub fn create_capture(
    persistence: &mut SqlitePersistence,
    request: &CaptureCreate,
) -> Result<Capture, ApiError> {
    validate_bulk_create(&BulkCreate {
        captures: vec![request.clone()],
        ..BulkCreate::default()
    })
    .map_err(translate_domain_error)?;

    let capture: Capture = persistence
        .create_capture(request)
        .map_err(translate_persistence_error)?;

    info!(
        capture_id = %capture.capture_id,
        critter_id = %capture.critter_id,
        aliased = capture.locations_aliased(),
        "Created capture"
    );
    Ok(capture)
}

/// Resolves a taxon's ancestor chain.
///
/// # Errors
///
/// Returns a translated taxonomy error if the chain cannot be resolved.
pub async fn taxon_hierarchy(
    resolver: &HierarchyResolver,
    tsn: TaxonId,
) -> Result<HierarchyResponse, ApiError> {
    let taxon: ResolvedTaxon = resolver
        .resolve_taxon(tsn)
        .await
        .map_err(translate_taxonomy_error)?;

    Ok(HierarchyResponse {
        tsn: taxon.tsn,
        scientific_name: taxon.scientific_name,
        hierarchy: taxon.chain.as_slice().to_vec(),
    })
}

/// Searches the authority by scientific name.
///
/// # Errors
///
/// Returns `InvalidInput` for a blank name, or a translated taxonomy error.
pub async fn search_taxa(
    resolver: &HierarchyResolver,
    name: &str,
) -> Result<TaxonSearchResponse, ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("Search name cannot be empty"),
        });
    }

    let taxa: Vec<TaxonRecord> = resolver
        .authority()
        .search_by_name(name)
        .await
        .map_err(translate_taxonomy_error)?;
    Ok(TaxonSearchResponse { taxa })
}
