// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod bulk_create_tests;
mod bulk_delete_tests;
mod bulk_update_tests;
mod initialization_tests;

use std::time::Duration;

use critterbase_domain::{
    BulkCreate, CaptureCreate, CritterCreate, LocationCreate, MarkingCreate, Sex, TaxonId,
};
use time::OffsetDateTime;
use time::macros::datetime;
use uuid::Uuid;

use crate::{Deadline, SqlitePersistence};

pub const MOOSE: TaxonId = TaxonId::new(180_703);
pub const CERVIDAE: TaxonId = TaxonId::new(180_692);
pub const CANIS: TaxonId = TaxonId::new(180_595);

pub fn generous_deadline() -> Deadline {
    Deadline::after(Duration::from_secs(30))
}

pub fn capture_time() -> OffsetDateTime {
    datetime!(2026-02-14 09:30 UTC)
}

pub fn critter_create(critter_id: Uuid) -> CritterCreate {
    CritterCreate {
        critter_id: Some(critter_id),
        itis_tsn: MOOSE,
        itis_scientific_name: Some(String::from("Alces alces")),
        sex: Sex::Female,
        wlh_id: Some(String::from("21-0001")),
        animal_id: None,
        critter_comment: None,
    }
}

pub fn location_create(latitude: f64, longitude: f64) -> LocationCreate {
    LocationCreate {
        latitude: Some(latitude),
        longitude: Some(longitude),
        ..LocationCreate::default()
    }
}

pub fn capture_create(
    critter_id: Uuid,
    capture_location: Option<LocationCreate>,
    release_location: Option<LocationCreate>,
) -> CaptureCreate {
    CaptureCreate {
        capture_id: Some(Uuid::new_v4()),
        critter_id,
        capture_location,
        release_location,
        capture_timestamp: capture_time(),
        release_timestamp: None,
        capture_comment: None,
        release_comment: None,
    }
}

pub fn marking_create(critter_id: Uuid, body_location_id: Option<Uuid>) -> MarkingCreate {
    MarkingCreate {
        marking_id: Some(Uuid::new_v4()),
        critter_id,
        capture_id: None,
        mortality_id: None,
        taxon_marking_body_location_id: body_location_id,
        identifier: Some(String::from("Y-104")),
        frequency: None,
        frequency_unit: None,
        attached_timestamp: None,
        removed_timestamp: None,
        comment: None,
    }
}

/// Creates a store holding a single moose critter.
pub fn store_with_critter() -> (SqlitePersistence, Uuid) {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let critter_id: Uuid = Uuid::new_v4();
    persistence
        .bulk_create(
            &BulkCreate {
                critters: vec![critter_create(critter_id)],
                ..BulkCreate::default()
            },
            generous_deadline(),
        )
        .unwrap();
    (persistence, critter_id)
}
