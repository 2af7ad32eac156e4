// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `entities`: Critter, capture, mortality, location and marking lookups
//! - `definitions`: Taxon-scoped definitions and marking eligibility

pub mod definitions;
pub mod entities;
