// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use critterbase_domain::{DefinitionKind, DomainError, EntityKind, TaxonId};
use critterbase_persistence::PersistenceError;
use critterbase_taxonomy::TaxonomyError;

/// API-level errors.
///
/// These are distinct from domain, taxonomy and persistence errors and
/// represent the API contract. Lower-layer errors reach callers only through
/// the explicit `translate_*` functions below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A bulk payload row lacks the id needed to address it.
    RequiredPropertyMissing {
        /// The payload array the row belongs to.
        kind: EntityKind,
        /// The index of the row within its array.
        index: usize,
        /// The missing field.
        field: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// No definition of the requested kind applies to the taxon.
    NoDefinitionsFound {
        /// The taxon that was looked up.
        tsn: TaxonId,
        /// The definition kind that was requested.
        kind: DefinitionKind,
    },
    /// The taxonomic authority had no usable hierarchy.
    InvalidHierarchy {
        /// A human-readable description of the problem.
        message: String,
    },
    /// The authority returned a chain for a different taxon.
    IntegrityMismatch {
        /// The taxon that was requested.
        requested: TaxonId,
        /// The last element of the returned chain, if any.
        found: Option<TaxonId>,
    },
    /// A bulk operation exceeded its time budget and was rolled back.
    TransactionTimeout,
    /// The taxonomic authority could not be reached.
    ExternalServiceUnreachable {
        /// A description of the transport failure.
        message: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::RequiredPropertyMissing { kind, index, field } => {
                write!(f, "Required property missing: {kind}[{index}].{field}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::NoDefinitionsFound { tsn, kind } => {
                write!(f, "No {kind} definitions found for taxon {tsn}")
            }
            Self::InvalidHierarchy { message } => write!(f, "Invalid hierarchy: {message}"),
            Self::IntegrityMismatch { requested, found } => match found {
                Some(found) => write!(
                    f,
                    "Hierarchy integrity mismatch: requested taxon {requested}, chain ends with {found}"
                ),
                None => write!(
                    f,
                    "Hierarchy integrity mismatch: requested taxon {requested}, chain is empty"
                ),
            },
            Self::TransactionTimeout => {
                write!(f, "Transaction exceeded its time budget and was rolled back")
            }
            Self::ExternalServiceUnreachable { message } => {
                write!(f, "Taxonomic authority unreachable: {message}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::RequiredPropertyMissing { kind, index, field } => {
            ApiError::RequiredPropertyMissing {
                kind,
                index,
                field: field.to_string(),
            }
        }
        DomainError::InvalidField {
            kind,
            index,
            field,
            reason,
        } => ApiError::InvalidInput {
            field: format!("{kind}[{index}].{field}"),
            message: reason,
        },
        DomainError::InvalidHierarchy(message) => ApiError::InvalidHierarchy { message },
        DomainError::IntegrityMismatch { requested, found } => {
            ApiError::IntegrityMismatch { requested, found }
        }
        DomainError::InvalidSex(value) => ApiError::InvalidInput {
            field: String::from("sex"),
            message: format!("'{value}' is not a recognised sex"),
        },
    }
}

/// Translates a taxonomy error into an API error.
#[must_use]
pub fn translate_taxonomy_error(err: TaxonomyError) -> ApiError {
    match err {
        TaxonomyError::InvalidHierarchy(message) => ApiError::InvalidHierarchy { message },
        TaxonomyError::IntegrityMismatch { requested, found } => {
            ApiError::IntegrityMismatch { requested, found }
        }
        TaxonomyError::ExternalServiceUnreachable(message) => {
            ApiError::ExternalServiceUnreachable { message }
        }
    }
}

/// Translates a persistence error into an API error.
///
/// Storage details other than the missing entity or the violated
/// constraint are reported as internal errors.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound { entity, id } => ApiError::ResourceNotFound {
            resource_type: entity,
            message: format!("No row with id {id}"),
        },
        PersistenceError::ConstraintViolation(message) => ApiError::DomainRuleViolation {
            rule: String::from("referential_integrity"),
            message,
        },
        PersistenceError::RequiredPropertyMissing { kind, index, field } => {
            ApiError::RequiredPropertyMissing { kind, index, field }
        }
        PersistenceError::TransactionTimeout => ApiError::TransactionTimeout,
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
