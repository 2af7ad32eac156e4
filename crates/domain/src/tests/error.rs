// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, EntityKind, TaxonId};

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::RequiredPropertyMissing {
        kind: EntityKind::Capture,
        index: 2,
        field: "capture_id",
    };
    assert_eq!(
        format!("{err}"),
        "Required property missing: captures[2].capture_id"
    );

    let err: DomainError = DomainError::InvalidField {
        kind: EntityKind::Location,
        index: 0,
        field: String::from("latitude"),
        reason: String::from("91 is outside -90..=90"),
    };
    assert_eq!(
        format!("{err}"),
        "Invalid value for locations[0].latitude: 91 is outside -90..=90"
    );

    let err: DomainError = DomainError::InvalidHierarchy(String::from("bad token"));
    assert_eq!(format!("{err}"), "Invalid hierarchy: bad token");

    let err: DomainError = DomainError::IntegrityMismatch {
        requested: TaxonId::new(5),
        found: Some(TaxonId::new(4)),
    };
    assert_eq!(format!("{err}"), "Hierarchy for taxon 5 ends with taxon 4");

    let err: DomainError = DomainError::IntegrityMismatch {
        requested: TaxonId::new(5),
        found: None,
    };
    assert_eq!(format!("{err}"), "Hierarchy for taxon 5 is empty");

    let err: DomainError = DomainError::InvalidSex(String::from("X"));
    assert_eq!(format!("{err}"), "Invalid sex: X");
}
