// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Arc;

use critterbase_domain::{
    BulkCreate, CritterCreate, MarkingBodyLocationDefinition, MarkingCreate, Sex, TaxonId,
};
use critterbase_persistence::{Deadline, SqlitePersistence};
use critterbase_taxonomy::{HierarchyResolver, InMemoryAuthority};
use time::OffsetDateTime;
use time::macros::datetime;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::SharedPersistence;

pub const ANIMALIA: TaxonId = TaxonId::new(202_423);
pub const CERVIDAE: TaxonId = TaxonId::new(180_692);
pub const MOOSE: TaxonId = TaxonId::new(180_703);
pub const CANIDAE: TaxonId = TaxonId::new(180_593);
pub const WOLF: TaxonId = TaxonId::new(180_596);
/// Present in the database fixtures but unknown to the authority.
pub const UNKNOWN: TaxonId = TaxonId::new(999_999);

pub fn test_authority() -> InMemoryAuthority {
    InMemoryAuthority::new()
        .with_taxon(202_423, "Animalia", &[])
        .with_taxon(180_692, "Cervidae", &[202_423])
        .with_taxon(180_703, "Alces alces", &[202_423, 180_692])
        .with_taxon(180_593, "Canidae", &[202_423])
        .with_taxon(180_596, "Canis lupus", &[202_423, 180_593])
}

/// A fresh database and a resolver over the test authority.
pub struct Fixture {
    pub persistence: SharedPersistence,
    pub resolver: HierarchyResolver,
    pub authority: Arc<InMemoryAuthority>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_authority(test_authority())
    }

    pub fn with_authority(authority: InMemoryAuthority) -> Self {
        let authority: Arc<InMemoryAuthority> = Arc::new(authority);
        Self {
            persistence: Arc::new(Mutex::new(SqlitePersistence::new_in_memory().unwrap())),
            resolver: HierarchyResolver::new(authority.clone()),
            authority,
        }
    }

    /// Stores a critter directly, bypassing the coordinator.
    pub async fn seed_critter(&self, tsn: TaxonId) -> Uuid {
        let critter_id: Uuid = Uuid::new_v4();
        let mut critter: CritterCreate = critter_create(tsn);
        critter.critter_id = Some(critter_id);
        critter.itis_scientific_name = Some(String::from("seeded"));
        self.persistence
            .lock()
            .await
            .bulk_create(
                &BulkCreate {
                    critters: vec![critter],
                    ..BulkCreate::default()
                },
                Deadline::none(),
            )
            .unwrap();
        critter_id
    }

    /// Stores a marking directly, bypassing eligibility checks.
    pub async fn seed_marking(&self, critter_id: Uuid, body_location_id: Uuid) -> Uuid {
        let marking: MarkingCreate = marking_create(critter_id, Some(body_location_id));
        let marking_id: Uuid = marking.marking_id.unwrap();
        self.persistence
            .lock()
            .await
            .bulk_create(
                &BulkCreate {
                    markings: vec![marking],
                    ..BulkCreate::default()
                },
                Deadline::none(),
            )
            .unwrap();
        marking_id
    }

    pub async fn body_location(&self, owner: TaxonId, name: &str) -> Uuid {
        let definition: MarkingBodyLocationDefinition = self
            .persistence
            .lock()
            .await
            .add_marking_body_location(owner, name, None)
            .unwrap();
        definition.taxon_marking_body_location_id
    }
}

pub fn critter_create(tsn: TaxonId) -> CritterCreate {
    CritterCreate {
        critter_id: Some(Uuid::new_v4()),
        itis_tsn: tsn,
        itis_scientific_name: None,
        sex: Sex::Unknown,
        wlh_id: None,
        animal_id: None,
        critter_comment: None,
    }
}

pub fn marking_create(critter_id: Uuid, body_location_id: Option<Uuid>) -> MarkingCreate {
    MarkingCreate {
        marking_id: Some(Uuid::new_v4()),
        critter_id,
        capture_id: None,
        mortality_id: None,
        taxon_marking_body_location_id: body_location_id,
        identifier: Some(String::from("B-17")),
        frequency: Some(150.23),
        frequency_unit: Some(String::from("MHz")),
        attached_timestamp: None,
        removed_timestamp: None,
        comment: None,
    }
}

pub fn capture_time() -> OffsetDateTime {
    datetime!(2026-03-02 14:00 UTC)
}
