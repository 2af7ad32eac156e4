// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use critterbase_domain::{
    BulkCounts, BulkCreate, BulkDelete, Capture, EntityKind, FamilyCreate, FamilyParentLink,
};
use uuid::Uuid;

use super::{
    capture_create, generous_deadline, location_create, marking_create, store_with_critter,
};
use crate::PersistenceError;

#[test]
fn test_bulk_delete_removes_capture_and_its_location() {
    let (mut persistence, critter_id) = store_with_critter();
    let capture: Capture = persistence
        .create_capture(&capture_create(
            critter_id,
            Some(location_create(54.0, -122.0)),
            None,
        ))
        .unwrap();

    let counts: BulkCounts = persistence
        .bulk_delete(
            &BulkDelete {
                captures: vec![capture.capture_id],
                ..BulkDelete::default()
            },
            generous_deadline(),
        )
        .unwrap();

    assert_eq!(counts.deleted_of(EntityKind::Capture), 1);
    assert_eq!(persistence.count_rows(EntityKind::Capture).unwrap(), 0);
    assert_eq!(persistence.count_rows(EntityKind::Location).unwrap(), 0);
}

#[test]
fn test_bulk_delete_missing_id_deletes_nothing() {
    let (mut persistence, critter_id) = store_with_critter();
    let marking = marking_create(critter_id, None);
    let marking_id: Uuid = marking.marking_id.unwrap();
    persistence
        .bulk_create(
            &BulkCreate {
                markings: vec![marking],
                ..BulkCreate::default()
            },
            generous_deadline(),
        )
        .unwrap();

    let result: Result<BulkCounts, PersistenceError> = persistence.bulk_delete(
        &BulkDelete {
            markings: vec![marking_id, Uuid::new_v4()],
            ..BulkDelete::default()
        },
        generous_deadline(),
    );

    assert!(matches!(
        result,
        Err(PersistenceError::NotFound { ref entity, .. }) if entity == "marking"
    ));
    assert_eq!(persistence.count_rows(EntityKind::Marking).unwrap(), 1);
}

#[test]
fn test_bulk_delete_referenced_capture_is_constraint_violation() {
    let (mut persistence, critter_id) = store_with_critter();
    let capture: Capture = persistence
        .create_capture(&capture_create(critter_id, None, None))
        .unwrap();
    let mut marking = marking_create(critter_id, None);
    marking.capture_id = Some(capture.capture_id);
    persistence
        .bulk_create(
            &BulkCreate {
                markings: vec![marking],
                ..BulkCreate::default()
            },
            generous_deadline(),
        )
        .unwrap();

    let result: Result<BulkCounts, PersistenceError> = persistence.bulk_delete(
        &BulkDelete {
            captures: vec![capture.capture_id],
            ..BulkDelete::default()
        },
        generous_deadline(),
    );

    assert!(matches!(result, Err(PersistenceError::ConstraintViolation(_))));
    assert_eq!(persistence.count_rows(EntityKind::Capture).unwrap(), 1);
}

#[test]
fn test_bulk_delete_marking_and_capture_together() {
    let (mut persistence, critter_id) = store_with_critter();
    let capture: Capture = persistence
        .create_capture(&capture_create(critter_id, None, None))
        .unwrap();
    let mut marking = marking_create(critter_id, None);
    marking.capture_id = Some(capture.capture_id);
    let marking_id: Uuid = marking.marking_id.unwrap();
    persistence
        .bulk_create(
            &BulkCreate {
                markings: vec![marking],
                ..BulkCreate::default()
            },
            generous_deadline(),
        )
        .unwrap();

    // Markings are removed before captures, so the pair succeeds.
    let counts: BulkCounts = persistence
        .bulk_delete(
            &BulkDelete {
                markings: vec![marking_id],
                captures: vec![capture.capture_id],
                ..BulkDelete::default()
            },
            generous_deadline(),
        )
        .unwrap();

    assert_eq!(counts.deleted_of(EntityKind::Marking), 1);
    assert_eq!(counts.deleted_of(EntityKind::Capture), 1);
}

#[test]
fn test_bulk_delete_family_parent_link() {
    let (mut persistence, critter_id) = store_with_critter();
    let family_id: Uuid = Uuid::new_v4();
    let link: FamilyParentLink = FamilyParentLink {
        family_id,
        parent_critter_id: critter_id,
    };
    persistence
        .bulk_create(
            &BulkCreate {
                families: vec![FamilyCreate {
                    family_id: Some(family_id),
                    family_label: String::from("Calving group"),
                    family_comment: Some(String::from("spring 2026")),
                }],
                family_parents: vec![link],
                ..BulkCreate::default()
            },
            generous_deadline(),
        )
        .unwrap();

    persistence
        .bulk_delete(
            &BulkDelete {
                family_parents: vec![link],
                ..BulkDelete::default()
            },
            generous_deadline(),
        )
        .unwrap();

    assert_eq!(persistence.count_rows(EntityKind::FamilyParent).unwrap(), 0);
    assert_eq!(persistence.count_rows(EntityKind::Family).unwrap(), 1);
}
