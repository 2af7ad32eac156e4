// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use critterbase_domain::{CritterCreate, CritterUpdate, EntityKind};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;
use uuid::Uuid;

use crate::data_models::{CritterRow, id_text};
use crate::diesel_schema::critter;
use crate::error::PersistenceError;

/// Inserts critters in one statement.
///
/// Every row must already carry its scientific name; the API layer fills
/// missing names from the taxonomic authority before calling this.
///
/// # Errors
///
/// Returns `ConstraintViolation` if a name is missing or the database
/// rejects a row.
pub fn insert_critters(
    conn: &mut SqliteConnection,
    critters: &[CritterCreate],
) -> Result<usize, PersistenceError> {
    if critters.is_empty() {
        return Ok(0);
    }

    let rows: Vec<CritterRow> = critters
        .iter()
        .enumerate()
        .map(|(index, create)| {
            let itis_scientific_name: String =
                create.itis_scientific_name.clone().ok_or_else(|| {
                    PersistenceError::ConstraintViolation(format!(
                        "{}[{index}].itis_scientific_name is required",
                        EntityKind::Critter
                    ))
                })?;
            Ok(CritterRow {
                critter_id: id_text(create.critter_id.unwrap_or_else(Uuid::new_v4)),
                itis_tsn: create.itis_tsn.value(),
                itis_scientific_name,
                sex: create.sex.as_str().to_string(),
                wlh_id: create.wlh_id.clone(),
                animal_id: create.animal_id.clone(),
                critter_comment: create.critter_comment.clone(),
            })
        })
        .collect::<Result<_, PersistenceError>>()?;

    let inserted: usize = diesel::insert_into(critter::table)
        .values(&rows)
        .execute(conn)?;

    debug!(inserted, "Inserted critters");
    Ok(inserted)
}

/// Applies a critter patch. `None` fields keep their stored value.
///
/// # Errors
///
/// Returns `NotFound` if the critter does not exist.
pub fn update_critter(
    conn: &mut SqliteConnection,
    critter_id: Uuid,
    update: &CritterUpdate,
) -> Result<(), PersistenceError> {
    let mut row: CritterRow = critter::table
        .find(id_text(critter_id))
        .select(CritterRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("critter", critter_id))?;

    if let Some(tsn) = update.itis_tsn {
        row.itis_tsn = tsn.value();
    }
    if let Some(name) = &update.itis_scientific_name {
        row.itis_scientific_name.clone_from(name);
    }
    if let Some(sex) = update.sex {
        row.sex = sex.as_str().to_string();
    }
    if update.wlh_id.is_some() {
        row.wlh_id.clone_from(&update.wlh_id);
    }
    if update.animal_id.is_some() {
        row.animal_id.clone_from(&update.animal_id);
    }
    if update.critter_comment.is_some() {
        row.critter_comment.clone_from(&update.critter_comment);
    }

    diesel::update(critter::table.find(id_text(critter_id)))
        .set(&row)
        .execute(conn)?;

    debug!(%critter_id, "Updated critter");
    Ok(())
}
