// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use critterbase_domain::{
    BulkCounts, BulkCreate, CollectionUnitLinkCreate, EntityKind, FamilyChildLink, FamilyCreate,
    FamilyParentLink, Marking, MortalityCreate,
};
use uuid::Uuid;

use super::{
    CANIS, MOOSE, capture_create, capture_time, critter_create, generous_deadline,
    location_create, marking_create, store_with_critter,
};
use crate::{PersistenceError, SqlitePersistence};

#[test]
fn test_bulk_create_reports_every_kind() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let counts: BulkCounts = persistence
        .bulk_create(&BulkCreate::default(), generous_deadline())
        .unwrap();

    assert_eq!(counts.created.len(), 11);
    assert!(counts.created.values().all(|count| *count == 0));
    assert!(counts.updated.is_empty());
    assert!(counts.deleted.is_empty());
}

#[test]
fn test_bulk_create_counts_inserted_rows() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let mother: Uuid = Uuid::new_v4();
    let calf: Uuid = Uuid::new_v4();
    let family_id: Uuid = Uuid::new_v4();

    let payload: BulkCreate = BulkCreate {
        critters: vec![critter_create(mother), critter_create(calf)],
        captures: vec![capture_create(mother, Some(location_create(54.1, -122.6)), None)],
        markings: vec![marking_create(mother, None)],
        families: vec![FamilyCreate {
            family_id: Some(family_id),
            family_label: String::from("  Herd 7  "),
            family_comment: None,
        }],
        family_parents: vec![FamilyParentLink {
            family_id,
            parent_critter_id: mother,
        }],
        family_children: vec![FamilyChildLink {
            family_id,
            child_critter_id: calf,
        }],
        ..BulkCreate::default()
    };

    let counts: BulkCounts = persistence.bulk_create(&payload, generous_deadline()).unwrap();

    assert_eq!(counts.created[&EntityKind::Critter], 2);
    assert_eq!(counts.created[&EntityKind::Capture], 1);
    assert_eq!(counts.created[&EntityKind::Marking], 1);
    assert_eq!(counts.created[&EntityKind::Family], 1);
    assert_eq!(counts.created[&EntityKind::FamilyParent], 1);
    assert_eq!(counts.created[&EntityKind::FamilyChild], 1);
    assert_eq!(counts.created[&EntityKind::Location], 0);

    assert_eq!(persistence.count_rows(EntityKind::Critter).unwrap(), 2);
    // The inline capture location is stored once and shared by both slots.
    assert_eq!(persistence.count_rows(EntityKind::Location).unwrap(), 1);
}

#[test]
fn test_bulk_create_markings_may_reference_new_captures() {
    let (mut persistence, critter_id) = store_with_critter();
    let capture = capture_create(critter_id, None, None);
    let capture_id: Uuid = capture.capture_id.unwrap();
    let mut marking = marking_create(critter_id, None);
    marking.capture_id = Some(capture_id);

    persistence
        .bulk_create(
            &BulkCreate {
                captures: vec![capture],
                markings: vec![marking],
                ..BulkCreate::default()
            },
            generous_deadline(),
        )
        .unwrap();

    let markings: Vec<Marking> = persistence.list_markings_for_critter(critter_id).unwrap();
    assert_eq!(markings.len(), 1);
    assert_eq!(markings[0].capture_id, Some(capture_id));
}

#[test]
fn test_bulk_create_mortality_with_inline_location() {
    let (mut persistence, critter_id) = store_with_critter();
    let mortality_id: Uuid = Uuid::new_v4();

    persistence
        .bulk_create(
            &BulkCreate {
                mortalities: vec![MortalityCreate {
                    mortality_id: Some(mortality_id),
                    critter_id,
                    location: Some(location_create(53.9, -122.7)),
                    mortality_timestamp: capture_time(),
                    mortality_comment: Some(String::from("predation")),
                }],
                ..BulkCreate::default()
            },
            generous_deadline(),
        )
        .unwrap();

    let mortality = persistence.get_mortality(mortality_id).unwrap();
    let location_id: Uuid = mortality.location_id.unwrap();
    assert_eq!(
        persistence.get_location(location_id).unwrap().latitude,
        Some(53.9)
    );
}

#[test]
fn test_bulk_create_phase_two_failure_writes_nothing() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let critter_id: Uuid = Uuid::new_v4();

    let payload: BulkCreate = BulkCreate {
        critters: vec![critter_create(critter_id)],
        captures: vec![capture_create(critter_id, Some(location_create(50.0, -120.0)), None)],
        // Points at a unit that does not exist.
        collection_units: vec![CollectionUnitLinkCreate {
            critter_collection_unit_id: None,
            critter_id,
            collection_unit_id: Uuid::new_v4(),
        }],
        ..BulkCreate::default()
    };

    let result: Result<BulkCounts, PersistenceError> =
        persistence.bulk_create(&payload, generous_deadline());

    assert!(matches!(result, Err(PersistenceError::ConstraintViolation(_))));
    assert_eq!(persistence.count_rows(EntityKind::Critter).unwrap(), 0);
    assert_eq!(persistence.count_rows(EntityKind::Capture).unwrap(), 0);
    assert_eq!(persistence.count_rows(EntityKind::Location).unwrap(), 0);
}

#[test]
fn test_bulk_create_marking_for_unknown_critter_is_rejected() {
    let (mut persistence, _) = store_with_critter();

    let result: Result<BulkCounts, PersistenceError> = persistence.bulk_create(
        &BulkCreate {
            markings: vec![marking_create(Uuid::new_v4(), None)],
            ..BulkCreate::default()
        },
        generous_deadline(),
    );

    assert!(matches!(result, Err(PersistenceError::ConstraintViolation(_))));
    assert_eq!(persistence.count_rows(EntityKind::Marking).unwrap(), 0);
}

#[test]
fn test_bulk_create_requires_scientific_name() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let mut critter = critter_create(Uuid::new_v4());
    critter.itis_scientific_name = None;

    let result: Result<BulkCounts, PersistenceError> = persistence.bulk_create(
        &BulkCreate {
            critters: vec![critter],
            ..BulkCreate::default()
        },
        generous_deadline(),
    );

    match result {
        Err(PersistenceError::ConstraintViolation(msg)) => {
            assert!(msg.contains("critters[0].itis_scientific_name"));
        }
        other => panic!("expected constraint violation, got {other:?}"),
    }
}

#[test]
fn test_critter_taxa_reports_existing_critters_only() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let moose: Uuid = Uuid::new_v4();
    let wolf: Uuid = Uuid::new_v4();
    let mut wolf_create = critter_create(wolf);
    wolf_create.itis_tsn = CANIS;
    wolf_create.itis_scientific_name = Some(String::from("Canis lupus"));

    persistence
        .bulk_create(
            &BulkCreate {
                critters: vec![critter_create(moose), wolf_create],
                ..BulkCreate::default()
            },
            generous_deadline(),
        )
        .unwrap();

    let taxa = persistence
        .critter_taxa(&[moose, wolf, Uuid::new_v4()])
        .unwrap();

    assert_eq!(taxa.len(), 2);
    assert_eq!(taxa[&moose], MOOSE);
    assert_eq!(taxa[&wolf], CANIS);
}
