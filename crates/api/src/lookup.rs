// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Taxon-scoped definition lookup.
//!
//! A taxon may use every definition owned by any member of its ancestor
//! chain. The chain is resolved live from the authority before the
//! persistence lock is taken.

use critterbase_domain::{Definition, DefinitionKind, HierarchyChain, TaxonId};
use critterbase_taxonomy::HierarchyResolver;
use tracing::{debug, info};

use crate::SharedPersistence;
use crate::error::{ApiError, translate_persistence_error, translate_taxonomy_error};

/// Looks up the definitions a taxon inherits from its hierarchy.
#[derive(Clone)]
pub struct HierarchyScopedLookup {
    resolver: HierarchyResolver,
    persistence: SharedPersistence,
}

impl HierarchyScopedLookup {
    #[must_use]
    pub const fn new(resolver: HierarchyResolver, persistence: SharedPersistence) -> Self {
        Self {
            resolver,
            persistence,
        }
    }

    /// Every definition of `kind` owned by `tsn` or one of its ancestors.
    ///
    /// Qualitative measurement definitions carry their option sets.
    ///
    /// # Errors
    ///
    /// - `NoDefinitionsFound` if nothing in the chain owns a definition of
    ///   this kind
    /// - `InvalidHierarchy`, `IntegrityMismatch` or
    ///   `ExternalServiceUnreachable` if the chain cannot be resolved
    pub async fn definitions_for_taxon(
        &self,
        tsn: TaxonId,
        kind: DefinitionKind,
    ) -> Result<Vec<Definition>, ApiError> {
        let chain: HierarchyChain = self
            .resolver
            .resolve(tsn)
            .await
            .map_err(translate_taxonomy_error)?;
        debug!(%tsn, %kind, depth = chain.len(), "Resolved chain for definition lookup");

        let definitions: Vec<Definition> = {
            let mut persistence = self.persistence.lock().await;
            persistence
                .definitions_for_chain(kind, chain.as_slice())
                .map_err(translate_persistence_error)?
        };

        if definitions.is_empty() {
            return Err(ApiError::NoDefinitionsFound { tsn, kind });
        }

        info!(%tsn, %kind, count = definitions.len(), "Resolved taxon definitions");
        Ok(definitions)
    }
}
