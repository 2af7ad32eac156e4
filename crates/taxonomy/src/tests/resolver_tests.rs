// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashMap;
use std::sync::Arc;

use critterbase_domain::{HierarchyChain, TaxonId};

use crate::{HierarchyResolver, InMemoryAuthority, TaxonRecord, TaxonomyError};

const MOOSE: i64 = 180_703;
const CERVIDAE: i64 = 180_692;
const ANIMALIA: i64 = 202_423;

fn moose_authority() -> InMemoryAuthority {
    InMemoryAuthority::new()
        .with_taxon(ANIMALIA, "Animalia", &[])
        .with_taxon(CERVIDAE, "Cervidae", &[ANIMALIA])
        .with_taxon(MOOSE, "Alces alces", &[ANIMALIA, CERVIDAE])
}

fn resolver_over(authority: InMemoryAuthority) -> (HierarchyResolver, Arc<InMemoryAuthority>) {
    let authority: Arc<InMemoryAuthority> = Arc::new(authority);
    (HierarchyResolver::new(authority.clone()), authority)
}

#[tokio::test]
async fn test_resolve_returns_chain_ending_with_requested_taxon() {
    let (resolver, _) = resolver_over(moose_authority());

    let chain: HierarchyChain = resolver.resolve(TaxonId::new(MOOSE)).await.unwrap();

    assert_eq!(chain.raw_ids(), vec![ANIMALIA, CERVIDAE, MOOSE]);
    assert_eq!(chain.taxon(), TaxonId::new(MOOSE));
}

#[tokio::test]
async fn test_resolve_root_taxon_is_singleton() {
    let (resolver, _) = resolver_over(moose_authority());

    let chain: HierarchyChain = resolver.resolve(TaxonId::new(ANIMALIA)).await.unwrap();

    assert_eq!(chain.raw_ids(), vec![ANIMALIA]);
}

#[tokio::test]
async fn test_resolve_unknown_taxon_is_invalid_hierarchy() {
    let (resolver, _) = resolver_over(moose_authority());

    let result: Result<HierarchyChain, TaxonomyError> = resolver.resolve(TaxonId::new(1)).await;

    assert!(matches!(result, Err(TaxonomyError::InvalidHierarchy(_))));
}

#[tokio::test]
async fn test_resolve_detects_chain_ending_elsewhere() {
    let authority: InMemoryAuthority = InMemoryAuthority::new().with_record(TaxonRecord {
        tsn: TaxonId::new(10),
        scientific_name: String::from("Broken"),
        rank: None,
        hierarchy: String::from("$1$2$3$"),
    });
    let (resolver, _) = resolver_over(authority);

    let result: Result<HierarchyChain, TaxonomyError> = resolver.resolve(TaxonId::new(10)).await;

    assert_eq!(
        result,
        Err(TaxonomyError::IntegrityMismatch {
            requested: TaxonId::new(10),
            found: Some(TaxonId::new(3)),
        })
    );
}

#[tokio::test]
async fn test_resolve_propagates_transport_failure() {
    let (resolver, _) = resolver_over(moose_authority().unreachable());

    let result: Result<HierarchyChain, TaxonomyError> =
        resolver.resolve(TaxonId::new(MOOSE)).await;

    assert!(matches!(
        result,
        Err(TaxonomyError::ExternalServiceUnreachable(_))
    ));
}

#[tokio::test]
async fn test_resolve_many_omits_unknown_taxa() {
    let (resolver, _) = resolver_over(moose_authority());

    let chains: HashMap<TaxonId, HierarchyChain> = resolver
        .resolve_many(&[TaxonId::new(MOOSE), TaxonId::new(999_999)])
        .await
        .unwrap();

    assert_eq!(chains.len(), 1);
    assert!(chains.contains_key(&TaxonId::new(MOOSE)));
}

#[tokio::test]
async fn test_resolve_many_deduplicates_in_one_call() {
    let (resolver, authority) = resolver_over(moose_authority());

    let chains: HashMap<TaxonId, HierarchyChain> = resolver
        .resolve_many(&[
            TaxonId::new(MOOSE),
            TaxonId::new(CERVIDAE),
            TaxonId::new(MOOSE),
        ])
        .await
        .unwrap();

    assert_eq!(chains.len(), 2);
    assert_eq!(authority.call_count(), 1);
}

#[tokio::test]
async fn test_resolve_many_empty_input_makes_no_call() {
    let (resolver, authority) = resolver_over(moose_authority());

    let chains: HashMap<TaxonId, HierarchyChain> = resolver.resolve_many(&[]).await.unwrap();

    assert!(chains.is_empty());
    assert_eq!(authority.call_count(), 0);
}

#[tokio::test]
async fn test_resolve_many_drops_inconsistent_records() {
    let authority: InMemoryAuthority = moose_authority().with_record(TaxonRecord {
        tsn: TaxonId::new(10),
        scientific_name: String::from("Broken"),
        rank: None,
        hierarchy: String::from("$1$2$"),
    });
    let (resolver, _) = resolver_over(authority);

    let chains: HashMap<TaxonId, HierarchyChain> = resolver
        .resolve_many(&[TaxonId::new(10), TaxonId::new(MOOSE)])
        .await
        .unwrap();

    assert_eq!(chains.len(), 1);
    assert!(chains.contains_key(&TaxonId::new(MOOSE)));
}

#[tokio::test]
async fn test_resolve_taxa_keeps_scientific_name() {
    let (resolver, _) = resolver_over(moose_authority());

    let taxa = resolver.resolve_taxa(&[TaxonId::new(MOOSE)]).await.unwrap();

    assert_eq!(taxa[&TaxonId::new(MOOSE)].scientific_name, "Alces alces");
}
