// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use critterbase_domain::{Capture, CaptureCreate, LocationCreate, TaxonId};
use uuid::Uuid;

use super::helpers::{ANIMALIA, CERVIDAE, Fixture, MOOSE, capture_time};
use crate::{
    ApiError, CritterDetail, HierarchyResponse, create_capture, get_critter_detail, search_taxa,
    taxon_hierarchy,
};

fn capture_request(critter_id: Uuid, release: Option<LocationCreate>) -> CaptureCreate {
    CaptureCreate {
        capture_id: None,
        critter_id,
        capture_location: None,
        release_location: release,
        capture_timestamp: capture_time(),
        release_timestamp: None,
        capture_comment: Some(String::from("net gun")),
        release_comment: None,
    }
}

#[tokio::test]
async fn test_create_capture_mirrors_single_location() {
    let fixture = Fixture::new();
    let critter_id: Uuid = fixture.seed_critter(MOOSE).await;
    let mut persistence = fixture.persistence.lock().await;

    let capture: Capture = create_capture(
        &mut persistence,
        &capture_request(
            critter_id,
            Some(LocationCreate {
                latitude: Some(52.1),
                longitude: Some(-124.3),
                ..LocationCreate::default()
            }),
        ),
    )
    .unwrap();

    assert!(capture.locations_aliased());
}

#[tokio::test]
async fn test_create_capture_for_unknown_critter_fails() {
    let fixture = Fixture::new();
    let mut persistence = fixture.persistence.lock().await;

    let result = create_capture(&mut persistence, &capture_request(Uuid::new_v4(), None));

    assert!(matches!(result, Err(ApiError::DomainRuleViolation { .. })));
}

#[tokio::test]
async fn test_critter_detail_gathers_events() {
    let fixture = Fixture::new();
    let critter_id: Uuid = fixture.seed_critter(MOOSE).await;
    let ear: Uuid = fixture.body_location(CERVIDAE, "Left ear").await;
    fixture.seed_marking(critter_id, ear).await;
    let mut persistence = fixture.persistence.lock().await;
    create_capture(&mut persistence, &capture_request(critter_id, None)).unwrap();

    let detail: CritterDetail = get_critter_detail(&mut persistence, critter_id).unwrap();

    assert_eq!(detail.critter.critter_id, critter_id);
    assert_eq!(detail.captures.len(), 1);
    assert!(detail.mortalities.is_empty());
    assert_eq!(detail.markings.len(), 1);
}

#[tokio::test]
async fn test_critter_detail_for_missing_critter() {
    let fixture = Fixture::new();
    let mut persistence = fixture.persistence.lock().await;

    assert!(matches!(
        get_critter_detail(&mut persistence, Uuid::new_v4()),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[tokio::test]
async fn test_taxon_hierarchy_is_root_first() {
    let fixture = Fixture::new();

    let response: HierarchyResponse = taxon_hierarchy(&fixture.resolver, MOOSE).await.unwrap();

    assert_eq!(response.scientific_name, "Alces alces");
    assert_eq!(response.hierarchy, vec![ANIMALIA, CERVIDAE, MOOSE]);
}

#[tokio::test]
async fn test_root_taxon_hierarchy_is_itself() {
    let fixture = Fixture::new();

    let response: HierarchyResponse = taxon_hierarchy(&fixture.resolver, ANIMALIA)
        .await
        .unwrap();

    assert_eq!(response.hierarchy, vec![ANIMALIA]);
}

#[tokio::test]
async fn test_search_taxa_by_name() {
    let fixture = Fixture::new();

    let response = search_taxa(&fixture.resolver, "alces ALCES").await.unwrap();

    assert_eq!(response.taxa.len(), 1);
    assert_eq!(response.taxa[0].tsn, TaxonId::new(180_703));
}

#[tokio::test]
async fn test_search_taxa_rejects_blank_name() {
    let fixture = Fixture::new();

    let result = search_taxa(&fixture.resolver, "   ").await;

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
    assert_eq!(fixture.authority.call_count(), 0);
}
