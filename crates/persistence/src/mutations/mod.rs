// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules.
//!
//! This module contains all state-changing operations for the persistence
//! layer. Every function takes the caller's connection and leaves
//! transaction control to the caller.
//!
//! ## Module Organization
//!
//! - `critters`, `locations`, `captures`, `mortalities`, `markings`,
//!   `measurements`, `collection_units`, `families`: per-entity writes
//! - `definitions`: Reference data for taxon-scoped definitions
//! - `bulk`: Ordered multi-entity engine used inside one transaction

pub mod bulk;
pub mod captures;
pub mod collection_units;
pub mod critters;
pub mod definitions;
pub mod families;
pub mod locations;
pub mod markings;
pub mod measurements;
pub mod mortalities;

pub use bulk::Deadline;
