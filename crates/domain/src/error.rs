// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::bulk::EntityKind;
use crate::taxon::TaxonId;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A bulk payload row is missing the key needed to route it.
    RequiredPropertyMissing {
        /// The entity kind of the offending array.
        kind: EntityKind,
        /// The index of the row within its array.
        index: usize,
        /// The missing field.
        field: &'static str,
    },
    /// A bulk payload row carries a value outside its allowed range.
    InvalidField {
        /// The entity kind of the offending array.
        kind: EntityKind,
        /// The index of the row within its array.
        index: usize,
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// A hierarchy representation could not be interpreted.
    InvalidHierarchy(String),
    /// A hierarchy chain does not end with the taxon it was requested for.
    IntegrityMismatch {
        /// The taxon that was requested.
        requested: TaxonId,
        /// The last element of the returned chain, if any.
        found: Option<TaxonId>,
    },
    /// A sex value is not one of the known codes.
    InvalidSex(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequiredPropertyMissing { kind, index, field } => {
                write!(f, "Required property missing: {kind}[{index}].{field}")
            }
            Self::InvalidField {
                kind,
                index,
                field,
                reason,
            } => write!(f, "Invalid value for {kind}[{index}].{field}: {reason}"),
            Self::InvalidHierarchy(msg) => write!(f, "Invalid hierarchy: {msg}"),
            Self::IntegrityMismatch { requested, found } => match found {
                Some(found) => write!(
                    f,
                    "Hierarchy for taxon {requested} ends with taxon {found}"
                ),
                None => write!(f, "Hierarchy for taxon {requested} is empty"),
            },
            Self::InvalidSex(value) => write!(f, "Invalid sex: {value}"),
        }
    }
}

impl std::error::Error for DomainError {}
