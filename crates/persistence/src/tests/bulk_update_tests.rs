// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use critterbase_domain::{
    BulkCounts, BulkCreate, BulkDelete, BulkUpdate, CaptureUpdate, CritterUpdate, EntityKind, MarkingPatch,
    MortalityCreate, MortalityUpdate, LocationPatch, RowOp, Sex,
};
use uuid::Uuid;

use super::{
    capture_time, generous_deadline, location_create, marking_create, store_with_critter,
};
use crate::PersistenceError;

#[test]
fn test_bulk_update_overlays_only_supplied_fields() {
    let (mut persistence, critter_id) = store_with_critter();

    let counts: BulkCounts = persistence
        .bulk_update(
            &BulkUpdate {
                critters: vec![CritterUpdate {
                    critter_id: Some(critter_id),
                    animal_id: Some(String::from("Bella")),
                    ..CritterUpdate::default()
                }],
                ..BulkUpdate::default()
            },
            &BulkDelete::default(),
            generous_deadline(),
        )
        .unwrap();

    assert_eq!(counts.updated_of(EntityKind::Critter), 1);
    let critter = persistence.get_critter(critter_id).unwrap();
    assert_eq!(critter.animal_id.as_deref(), Some("Bella"));
    assert_eq!(critter.wlh_id.as_deref(), Some("21-0001"));
    assert_eq!(critter.sex, Sex::Female);
}

#[test]
fn test_bulk_update_missing_row_is_not_found() {
    let (mut persistence, critter_id) = store_with_critter();
    let missing: Uuid = Uuid::new_v4();

    let result: Result<BulkCounts, PersistenceError> = persistence.bulk_update(
        &BulkUpdate {
            critters: vec![
                CritterUpdate {
                    critter_id: Some(critter_id),
                    critter_comment: Some(String::from("collared")),
                    ..CritterUpdate::default()
                },
                CritterUpdate {
                    critter_id: Some(missing),
                    critter_comment: Some(String::from("ghost")),
                    ..CritterUpdate::default()
                },
            ],
            ..BulkUpdate::default()
        },
        &BulkDelete::default(),
        generous_deadline(),
    );

    assert!(matches!(result, Err(PersistenceError::NotFound { .. })));
    // The first update was rolled back with the second.
    assert_eq!(
        persistence.get_critter(critter_id).unwrap().critter_comment,
        None
    );
}

#[test]
fn test_bulk_update_row_without_id_is_required_property_missing() {
    let (mut persistence, critter_id) = store_with_critter();

    let result: Result<BulkCounts, PersistenceError> = persistence.bulk_update(
        &BulkUpdate {
            critters: vec![CritterUpdate {
                critter_id: Some(critter_id),
                critter_comment: Some(String::from("collared")),
                ..CritterUpdate::default()
            }],
            captures: vec![CaptureUpdate {
                capture_comment: Some(String::from("no id")),
                ..CaptureUpdate::default()
            }],
            ..BulkUpdate::default()
        },
        &BulkDelete::default(),
        generous_deadline(),
    );

    match result {
        Err(PersistenceError::RequiredPropertyMissing { kind, index, field }) => {
            assert_eq!(kind, EntityKind::Capture);
            assert_eq!(index, 0);
            assert_eq!(field, "capture_id");
        }
        other => panic!("expected required property missing, got {other:?}"),
    }
    assert_eq!(
        persistence.get_critter(critter_id).unwrap().critter_comment,
        None
    );
}

#[test]
fn test_bulk_update_row_ops_count_by_phase() {
    let (mut persistence, critter_id) = store_with_critter();
    let existing = marking_create(critter_id, None);
    let existing_id: Uuid = existing.marking_id.unwrap();
    let doomed = marking_create(critter_id, None);
    let doomed_id: Uuid = doomed.marking_id.unwrap();
    persistence
        .bulk_create(
            &BulkCreate {
                markings: vec![existing, doomed],
                ..BulkCreate::default()
            },
            generous_deadline(),
        )
        .unwrap();

    let counts: BulkCounts = persistence
        .bulk_update(
            &BulkUpdate {
                markings: vec![
                    RowOp::Create(marking_create(critter_id, None)),
                    RowOp::Update {
                        id: existing_id,
                        patch: MarkingPatch {
                            identifier: Some(String::from("R-2")),
                            ..MarkingPatch::default()
                        },
                    },
                    RowOp::Delete { id: doomed_id },
                ],
                ..BulkUpdate::default()
            },
            &BulkDelete::default(),
            generous_deadline(),
        )
        .unwrap();

    assert_eq!(counts.created_of(EntityKind::Marking), 1);
    assert_eq!(counts.updated_of(EntityKind::Marking), 1);
    assert_eq!(counts.deleted_of(EntityKind::Marking), 1);
    assert_eq!(persistence.count_rows(EntityKind::Marking).unwrap(), 2);
    assert_eq!(
        persistence
            .get_marking(existing_id)
            .unwrap()
            .identifier
            .as_deref(),
        Some("R-2")
    );
}

#[test]
fn test_bulk_update_applies_accompanying_deletes() {
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

    let counts: BulkCounts = persistence
        .bulk_update(
            &BulkUpdate::default(),
            &BulkDelete {
                markings: vec![marking_id],
                ..BulkDelete::default()
            },
            generous_deadline(),
        )
        .unwrap();

    assert_eq!(counts.deleted_of(EntityKind::Marking), 1);
    assert_eq!(persistence.count_rows(EntityKind::Marking).unwrap(), 0);
}

#[test]
fn test_bulk_update_failing_delete_rolls_back_updates() {
    let (mut persistence, critter_id) = store_with_critter();

    let result: Result<BulkCounts, PersistenceError> = persistence.bulk_update(
        &BulkUpdate {
            critters: vec![CritterUpdate {
                critter_id: Some(critter_id),
                sex: Some(Sex::Male),
                ..CritterUpdate::default()
            }],
            ..BulkUpdate::default()
        },
        &BulkDelete {
            markings: vec![Uuid::new_v4()],
            ..BulkDelete::default()
        },
        generous_deadline(),
    );

    assert!(matches!(result, Err(PersistenceError::NotFound { .. })));
    assert_eq!(persistence.get_critter(critter_id).unwrap().sex, Sex::Female);
}

#[test]
fn test_mortality_location_is_updated_in_place() {
    let (mut persistence, critter_id) = store_with_critter();
    let mortality_id: Uuid = Uuid::new_v4();
    persistence
        .bulk_create(
            &BulkCreate {
                mortalities: vec![MortalityCreate {
                    mortality_id: Some(mortality_id),
                    critter_id,
                    location: Some(location_create(53.0, -123.0)),
                    mortality_timestamp: capture_time(),
                    mortality_comment: None,
                }],
                ..BulkCreate::default()
            },
            generous_deadline(),
        )
        .unwrap();
    let location_id: Uuid = persistence
        .get_mortality(mortality_id)
        .unwrap()
        .location_id
        .unwrap();

    persistence
        .bulk_update(
            &BulkUpdate {
                mortalities: vec![MortalityUpdate {
                    mortality_id: Some(mortality_id),
                    location: Some(LocationPatch {
                        elevation: Some(812.0),
                        ..LocationPatch::default()
                    }),
                    ..MortalityUpdate::default()
                }],
                ..BulkUpdate::default()
            },
            &BulkDelete::default(),
            generous_deadline(),
        )
        .unwrap();

    let mortality = persistence.get_mortality(mortality_id).unwrap();
    assert_eq!(mortality.location_id, Some(location_id));
    let location = persistence.get_location(location_id).unwrap();
    assert_eq!(location.elevation, Some(812.0));
    assert_eq!(location.latitude, Some(53.0));
}
