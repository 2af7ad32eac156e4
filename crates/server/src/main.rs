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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use critterbase_api::{
    ApiError, BulkMutationCoordinator, BulkOptions, BulkResponse, BulkUpdateRequest,
    CritterDetail, HierarchyResponse, HierarchyScopedLookup, MarkingValidator,
    MarkingVerification, SharedPersistence, TaxonDefinitionsQuery, TaxonDefinitionsResponse,
    TaxonSearchQuery, TaxonSearchResponse, VerifyMarkingsRequest, create_capture,
    get_critter_detail, search_taxa, taxon_hierarchy,
};
use critterbase_domain::{BulkCreate, BulkDelete, Capture, CaptureCreate, Definition, TaxonId};
use critterbase_persistence::SqlitePersistence;
use critterbase_taxonomy::{
    DEFAULT_AUTHORITY_URL, HierarchyClient, HierarchyResolver, TaxonomyAuthority,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Critterbase Server - HTTP server for wildlife telemetry records
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Base URL of the taxonomic authority's search endpoint
    #[arg(long, default_value = DEFAULT_AUTHORITY_URL)]
    taxonomy_url: String,

    /// Timeout for a single taxonomic authority request, in seconds
    #[arg(long, default_value_t = 10)]
    taxonomy_timeout_secs: u64,

    /// Time budget for one bulk request, in seconds
    #[arg(long, default_value_t = 30)]
    bulk_timeout_secs: u64,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind a single Mutex. The lookup, validator
/// and coordinator share it and take the lock only after any taxonomic
/// authority calls have completed.
#[derive(Clone)]
struct AppState {
    persistence: SharedPersistence,
    resolver: HierarchyResolver,
    lookup: HierarchyScopedLookup,
    markings: MarkingValidator,
    bulk: BulkMutationCoordinator,
}

impl AppState {
    fn new(
        persistence: SqlitePersistence,
        authority: Arc<dyn TaxonomyAuthority>,
        options: BulkOptions,
    ) -> Self {
        let persistence: SharedPersistence = Arc::new(Mutex::new(persistence));
        let resolver: HierarchyResolver = HierarchyResolver::new(authority);
        Self {
            lookup: HierarchyScopedLookup::new(resolver.clone(), persistence.clone()),
            markings: MarkingValidator::new(resolver.clone(), persistence.clone()),
            bulk: BulkMutationCoordinator::new(resolver.clone(), persistence.clone(), options),
            resolver,
            persistence,
        }
    }
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::InvalidInput { .. }
            | ApiError::RequiredPropertyMissing { .. }
            | ApiError::InvalidHierarchy { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } | ApiError::NoDefinitionsFound { .. } => {
                StatusCode::NOT_FOUND
            }
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::TransactionTimeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::ExternalServiceUnreachable { .. } | ApiError::IntegrityMismatch { .. } => {
                warn!(error = %err, "Taxonomic authority failure");
                StatusCode::BAD_GATEWAY
            }
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Handler for POST `/api/bulk` endpoint.
///
/// Creates every row of the payload in one transaction.
async fn handle_bulk_create(
    AxumState(app_state): AxumState<AppState>,
    Json(payload): Json<BulkCreate>,
) -> Result<Json<BulkResponse>, HttpError> {
    info!(
        critters = payload.critters.len(),
        captures = payload.captures.len(),
        markings = payload.markings.len(),
        "Handling bulk create request"
    );

    let response: BulkResponse = app_state.bulk.bulk_create(payload).await?.into();
    Ok(Json(response))
}

/// Handler for PATCH `/api/bulk` endpoint.
///
/// Applies updates and the accompanying deletes in one transaction.
async fn handle_bulk_update(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BulkUpdateRequest>,
) -> Result<Json<BulkResponse>, HttpError> {
    info!(
        critters = req.updates.critters.len(),
        markings = req.updates.markings.len(),
        has_deletes = !req.deletes.is_empty(),
        "Handling bulk update request"
    );

    let response: BulkResponse = app_state
        .bulk
        .bulk_update(req.updates, req.deletes)
        .await?
        .into();
    Ok(Json(response))
}

/// Handler for DELETE `/api/bulk` endpoint.
async fn handle_bulk_delete(
    AxumState(app_state): AxumState<AppState>,
    Json(deletes): Json<BulkDelete>,
) -> Result<Json<BulkResponse>, HttpError> {
    info!("Handling bulk delete request");

    let response: BulkResponse = app_state.bulk.bulk_delete(deletes).await?.into();
    Ok(Json(response))
}

/// Handler for POST `/api/markings/verify` endpoint.
async fn handle_verify_markings(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<VerifyMarkingsRequest>,
) -> Result<Json<MarkingVerification>, HttpError> {
    info!(
        tsn = %req.itis_tsn,
        markings = req.markings.len(),
        "Handling verify markings request"
    );

    let verification: MarkingVerification = app_state
        .markings
        .verify(req.itis_tsn, &req.markings)
        .await?;
    Ok(Json(verification))
}

/// Handler for GET `/api/xref/taxon-definitions` endpoint.
async fn handle_taxon_definitions(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<TaxonDefinitionsQuery>,
) -> Result<Json<TaxonDefinitionsResponse>, HttpError> {
    info!(tsn = %query.tsn, kind = %query.kind, "Handling taxon definitions request");

    let definitions: Vec<Definition> = app_state
        .lookup
        .definitions_for_taxon(query.tsn, query.kind)
        .await?;
    Ok(Json(TaxonDefinitionsResponse {
        tsn: query.tsn,
        kind: query.kind,
        definitions,
    }))
}

/// Handler for GET `/api/taxonomy/hierarchy/{tsn}` endpoint.
async fn handle_taxon_hierarchy(
    AxumState(app_state): AxumState<AppState>,
    Path(tsn): Path<TaxonId>,
) -> Result<Json<HierarchyResponse>, HttpError> {
    info!(%tsn, "Handling taxon hierarchy request");

    Ok(Json(taxon_hierarchy(&app_state.resolver, tsn).await?))
}

/// Handler for GET `/api/taxonomy/search` endpoint.
async fn handle_taxon_search(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<TaxonSearchQuery>,
) -> Result<Json<TaxonSearchResponse>, HttpError> {
    info!(name = %query.name, "Handling taxon search request");

    Ok(Json(search_taxa(&app_state.resolver, &query.name).await?))
}

/// Handler for GET `/api/critters/{critter_id}` endpoint.
async fn handle_get_critter(
    AxumState(app_state): AxumState<AppState>,
    Path(critter_id): Path<Uuid>,
) -> Result<Json<CritterDetail>, HttpError> {
    info!(%critter_id, "Handling get critter request");

    let mut persistence = app_state.persistence.lock().await;
    let detail: CritterDetail = get_critter_detail(&mut persistence, critter_id)?;
    drop(persistence);

    Ok(Json(detail))
}

/// Handler for POST `/api/captures` endpoint.
async fn handle_create_capture(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CaptureCreate>,
) -> Result<Json<Capture>, HttpError> {
    info!(critter_id = %req.critter_id, "Handling create capture request");

    let mut persistence = app_state.persistence.lock().await;
    let capture: Capture = create_capture(&mut persistence, &req)?;
    drop(persistence);

    Ok(Json(capture))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/api/bulk",
            post(handle_bulk_create)
                .patch(handle_bulk_update)
                .delete(handle_bulk_delete),
        )
        .route("/api/markings/verify", post(handle_verify_markings))
        .route("/api/xref/taxon-definitions", get(handle_taxon_definitions))
        .route("/api/taxonomy/hierarchy/{tsn}", get(handle_taxon_hierarchy))
        .route("/api/taxonomy/search", get(handle_taxon_search))
        .route("/api/critters/{critter_id}", get(handle_get_critter))
        .route("/api/captures", post(handle_create_capture))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Critterbase Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    info!(url = %args.taxonomy_url, "Using taxonomic authority");
    let authority: HierarchyClient = HierarchyClient::new(
        &args.taxonomy_url,
        Duration::from_secs(args.taxonomy_timeout_secs),
    )?;

    let options: BulkOptions = BulkOptions {
        time_budget: Duration::from_secs(args.bulk_timeout_secs),
    };
    let app_state: AppState = AppState::new(persistence, Arc::new(authority), options);

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
