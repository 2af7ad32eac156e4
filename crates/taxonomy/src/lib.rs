// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Taxonomic authority access for Critterbase.
//!
//! This crate owns every network call to the external taxonomic authority.
//! It never touches the database, so callers can complete all hierarchy
//! lookups before opening a transaction.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod client;
mod error;
mod memory;
mod resolver;

#[cfg(test)]
mod tests;

pub use client::{DEFAULT_AUTHORITY_URL, HierarchyClient, TaxonRecord, TaxonomyAuthority};
pub use error::TaxonomyError;
pub use memory::InMemoryAuthority;
pub use resolver::{HierarchyResolver, ResolvedTaxon};
