// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use critterbase_domain::{FamilyChildLink, FamilyCreate, FamilyParentLink};
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use crate::data_models::{NewFamily, NewFamilyChild, NewFamilyParent, id_text};
use crate::diesel_schema::{family, family_child, family_parent};
use crate::error::PersistenceError;

/// # Errors
///
/// Returns an error if the insert fails, including a duplicate label.
pub fn insert_families(
    conn: &mut SqliteConnection,
    creates: &[FamilyCreate],
) -> Result<usize, PersistenceError> {
    if creates.is_empty() {
        return Ok(0);
    }
    let rows: Vec<NewFamily> = creates
        .iter()
        .map(|create| NewFamily {
            family_id: id_text(create.family_id.unwrap_or_else(Uuid::new_v4)),
            family_label: create.family_label.trim().to_string(),
            family_comment: create.family_comment.clone(),
        })
        .collect();
    Ok(diesel::insert_into(family::table)
        .values(&rows)
        .execute(conn)?)
}

/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_family_parents(
    conn: &mut SqliteConnection,
    links: &[FamilyParentLink],
) -> Result<usize, PersistenceError> {
    if links.is_empty() {
        return Ok(0);
    }
    let rows: Vec<NewFamilyParent> = links
        .iter()
        .map(|link| NewFamilyParent {
            family_id: id_text(link.family_id),
            parent_critter_id: id_text(link.parent_critter_id),
        })
        .collect();
    Ok(diesel::insert_into(family_parent::table)
        .values(&rows)
        .execute(conn)?)
}

/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_family_children(
    conn: &mut SqliteConnection,
    links: &[FamilyChildLink],
) -> Result<usize, PersistenceError> {
    if links.is_empty() {
        return Ok(0);
    }
    let rows: Vec<NewFamilyChild> = links
        .iter()
        .map(|link| NewFamilyChild {
            family_id: id_text(link.family_id),
            child_critter_id: id_text(link.child_critter_id),
        })
        .collect();
    Ok(diesel::insert_into(family_child::table)
        .values(&rows)
        .execute(conn)?)
}

/// # Errors
///
/// Returns `NotFound` if the link does not exist.
pub fn delete_family_parent(
    conn: &mut SqliteConnection,
    link: FamilyParentLink,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(
        family_parent::table.find((id_text(link.family_id), id_text(link.parent_critter_id))),
    )
    .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::not_found(
            "family parent",
            format!("{}/{}", link.family_id, link.parent_critter_id),
        ));
    }
    Ok(())
}

/// # Errors
///
/// Returns `NotFound` if the link does not exist.
pub fn delete_family_child(
    conn: &mut SqliteConnection,
    link: FamilyChildLink,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(
        family_child::table.find((id_text(link.family_id), id_text(link.child_critter_id))),
    )
    .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::not_found(
            "family child",
            format!("{}/{}", link.family_id, link.child_critter_id),
        ));
    }
    Ok(())
}
