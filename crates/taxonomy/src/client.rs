// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP client for the external taxonomic authority.
//!
//! The authority exposes a Solr-style JSON search endpoint. Each document
//! carries the taxon's serial number, its scientific name, its rank and its
//! ancestor chain encoded as a dollar-delimited string. This module does no
//! interpretation beyond decoding; chain parsing and integrity checks live
//! in the resolver.

use std::time::Duration;

use async_trait::async_trait;
use critterbase_domain::TaxonId;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TaxonomyError;

/// Default public endpoint of the authority.
pub const DEFAULT_AUTHORITY_URL: &str = "https://services.itis.gov/";

/// One taxon as reported by the authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonRecord {
    pub tsn: TaxonId,
    pub scientific_name: String,
    pub rank: Option<String>,
    /// Raw ancestor chain, e.g. `"$1$2$3$"`.
    pub hierarchy: String,
}

/// The operations consumed from the taxonomic authority.
///
/// `HierarchyClient` implements this over HTTP; `InMemoryAuthority`
/// implements it over a fixed record set.
#[async_trait]
pub trait TaxonomyAuthority: Send + Sync {
    /// Looks up a single taxon by serial number.
    async fn search_by_tsn(&self, tsn: TaxonId) -> Result<Option<TaxonRecord>, TaxonomyError>;

    /// Looks up several taxa in one round trip. Unknown ids are absent from
    /// the result.
    async fn search_by_tsns(&self, tsns: &[TaxonId]) -> Result<Vec<TaxonRecord>, TaxonomyError>;

    /// Searches taxa by scientific name.
    async fn search_by_name(&self, name: &str) -> Result<Vec<TaxonRecord>, TaxonomyError>;
}

#[derive(Debug, Deserialize)]
struct SolrEnvelope {
    response: SolrResponse,
}

#[derive(Debug, Deserialize)]
struct SolrResponse {
    #[serde(default)]
    docs: Vec<SolrDoc>,
}

#[derive(Debug, Deserialize)]
struct SolrDoc {
    tsn: String,
    #[serde(rename = "nameWOInd")]
    name_without_indicators: String,
    rank: Option<String>,
    #[serde(rename = "hierarchyTSN", default)]
    hierarchy_tsn: Vec<String>,
}

/// Decodes a Solr search body into taxon records.
///
/// # Errors
///
/// Returns `TaxonomyError::InvalidHierarchy` if the body is not a search
/// envelope or a document carries a non-numeric serial number.
pub(crate) fn records_from_solr(body: &str) -> Result<Vec<TaxonRecord>, TaxonomyError> {
    let envelope: SolrEnvelope = serde_json::from_str(body).map_err(|e| {
        TaxonomyError::InvalidHierarchy(format!("undecodable authority response: {e}"))
    })?;

    envelope
        .response
        .docs
        .into_iter()
        .map(|doc| {
            let tsn: TaxonId = doc.tsn.parse()?;
            Ok(TaxonRecord {
                tsn,
                scientific_name: doc.name_without_indicators,
                rank: doc.rank,
                hierarchy: doc.hierarchy_tsn.into_iter().next().unwrap_or_default(),
            })
        })
        .collect()
}

/// Escapes Solr query syntax characters in a free-text term.
fn escape_solr_term(term: &str) -> String {
    let mut escaped: String = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(
            c,
            ' ' | '+' | '-' | '!' | '(' | ')' | '{' | '}' | '[' | ']' | '^' | '"' | '~' | '*'
                | '?' | ':' | '\\' | '/'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// HTTP client for the taxonomic authority.
#[derive(Debug, Clone)]
pub struct HierarchyClient {
    client: Client,
    base_url: String,
}

impl HierarchyClient {
    /// Creates a client for the authority at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TaxonomyError> {
        let client: Client = Client::builder()
            .user_agent(concat!("critterbase/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| TaxonomyError::ExternalServiceUnreachable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Runs one Solr query and decodes the documents.
    async fn query(&self, q: &str, rows: usize) -> Result<Vec<TaxonRecord>, TaxonomyError> {
        debug!(query = %q, rows, "Querying taxonomic authority");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("wt", "json"), ("q", q), ("rows", &rows.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TaxonomyError::ExternalServiceUnreachable(format!(
                "authority responded with status {status}"
            )));
        }

        let body: String = response.text().await?;
        records_from_solr(&body)
    }
}

#[async_trait]
impl TaxonomyAuthority for HierarchyClient {
    async fn search_by_tsn(&self, tsn: TaxonId) -> Result<Option<TaxonRecord>, TaxonomyError> {
        let records: Vec<TaxonRecord> = self.query(&format!("tsn:{tsn}"), 1).await?;
        Ok(records.into_iter().find(|record| record.tsn == tsn))
    }

    async fn search_by_tsns(&self, tsns: &[TaxonId]) -> Result<Vec<TaxonRecord>, TaxonomyError> {
        if tsns.is_empty() {
            return Ok(Vec::new());
        }

        let terms: Vec<String> = tsns.iter().map(ToString::to_string).collect();
        let q: String = format!("tsn:({})", terms.join(" OR "));
        self.query(&q, tsns.len()).await
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<TaxonRecord>, TaxonomyError> {
        let q: String = format!("nameWOInd:{}", escape_solr_term(name.trim()));
        self.query(&q, 50).await
    }
}
