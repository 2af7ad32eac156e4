// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use critterbase_domain::{DomainError, EntityKind, TaxonId};
use critterbase_persistence::PersistenceError;
use critterbase_taxonomy::TaxonomyError;

use crate::{
    ApiError, translate_domain_error, translate_persistence_error, translate_taxonomy_error,
};

#[test]
fn test_invalid_field_names_array_index() {
    let err: ApiError = translate_domain_error(DomainError::InvalidField {
        kind: EntityKind::Location,
        index: 3,
        field: String::from("longitude"),
        reason: String::from("200 is outside -180..=180"),
    });

    assert_eq!(
        err,
        ApiError::InvalidInput {
            field: String::from("locations[3].longitude"),
            message: String::from("200 is outside -180..=180"),
        }
    );
}

#[test]
fn test_required_property_missing_is_preserved() {
    let err: ApiError = translate_domain_error(DomainError::RequiredPropertyMissing {
        kind: EntityKind::Mortality,
        index: 0,
        field: "mortality_id",
    });

    assert_eq!(
        err.to_string(),
        "Required property missing: mortalities[0].mortality_id"
    );
}

#[test]
fn test_taxonomy_errors_keep_their_category() {
    assert!(matches!(
        translate_taxonomy_error(TaxonomyError::ExternalServiceUnreachable(String::from(
            "timed out"
        ))),
        ApiError::ExternalServiceUnreachable { .. }
    ));
    assert_eq!(
        translate_taxonomy_error(TaxonomyError::IntegrityMismatch {
            requested: TaxonId::new(10),
            found: Some(TaxonId::new(3)),
        }),
        ApiError::IntegrityMismatch {
            requested: TaxonId::new(10),
            found: Some(TaxonId::new(3)),
        }
    );
}

#[test]
fn test_persistence_not_found_becomes_resource_not_found() {
    let err: ApiError = translate_persistence_error(PersistenceError::not_found("capture", "abc"));

    assert_eq!(
        err,
        ApiError::ResourceNotFound {
            resource_type: String::from("capture"),
            message: String::from("No row with id abc"),
        }
    );
}

#[test]
fn test_storage_internals_are_not_leaked_as_categories() {
    assert_eq!(
        translate_persistence_error(PersistenceError::TransactionTimeout),
        ApiError::TransactionTimeout
    );
    assert!(matches!(
        translate_persistence_error(PersistenceError::ConstraintViolation(String::from(
            "FOREIGN KEY constraint failed"
        ))),
        ApiError::DomainRuleViolation { .. }
    ));
    assert_eq!(
        translate_persistence_error(PersistenceError::RequiredPropertyMissing {
            kind: EntityKind::Capture,
            index: 2,
            field: String::from("capture_id"),
        }),
        ApiError::RequiredPropertyMissing {
            kind: EntityKind::Capture,
            index: 2,
            field: String::from("capture_id"),
        }
    );
    assert!(matches!(
        translate_persistence_error(PersistenceError::QueryFailed(String::from("boom"))),
        ApiError::Internal { .. }
    ));
}
