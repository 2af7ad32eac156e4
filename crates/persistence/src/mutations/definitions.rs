// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Definition administration.
//!
//! Definitions are reference data owned by one taxon each. These inserts
//! are used to load that reference data; the bulk engine never writes it.

use critterbase_domain::{
    MarkingBodyLocationDefinition, QualitativeMeasurementDefinition, QualitativeOption,
    QuantitativeMeasurementDefinition, TaxonId,
};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;
use uuid::Uuid;

use crate::data_models::{
    MarkingBodyLocationRow, QualitativeDefinitionRow, QualitativeOptionRow,
    QuantitativeDefinitionRow, id_text,
};
use crate::diesel_schema::{
    collection_category, collection_unit, xref_taxon_collection_category,
    xref_taxon_marking_body_location, xref_taxon_measurement_qualitative,
    xref_taxon_measurement_qualitative_option, xref_taxon_measurement_quantitative,
};
use crate::error::PersistenceError;

/// # Errors
///
/// Returns an error if the insert fails, including a duplicate body
/// location for the same taxon.
pub fn insert_marking_body_location(
    conn: &mut SqliteConnection,
    itis_tsn: TaxonId,
    body_location: &str,
    description: Option<&str>,
) -> Result<MarkingBodyLocationDefinition, PersistenceError> {
    let id: Uuid = Uuid::new_v4();
    diesel::insert_into(xref_taxon_marking_body_location::table)
        .values(&MarkingBodyLocationRow {
            taxon_marking_body_location_id: id_text(id),
            itis_tsn: itis_tsn.value(),
            body_location: body_location.to_string(),
            description: description.map(str::to_string),
        })
        .execute(conn)?;

    info!(%itis_tsn, body_location, "Added marking body location definition");
    Ok(MarkingBodyLocationDefinition {
        taxon_marking_body_location_id: id,
        itis_tsn,
        body_location: body_location.to_string(),
        description: description.map(str::to_string),
    })
}

/// Inserts a qualitative definition and its option set.
///
/// # Errors
///
/// Returns an error if an insert fails.
pub fn insert_qualitative_definition(
    conn: &mut SqliteConnection,
    itis_tsn: TaxonId,
    measurement_name: &str,
    options: &[(&str, i32)],
) -> Result<QualitativeMeasurementDefinition, PersistenceError> {
    let definition_id: Uuid = Uuid::new_v4();
    diesel::insert_into(xref_taxon_measurement_qualitative::table)
        .values(&QualitativeDefinitionRow {
            taxon_measurement_id: id_text(definition_id),
            itis_tsn: itis_tsn.value(),
            measurement_name: measurement_name.to_string(),
            measurement_desc: None,
        })
        .execute(conn)?;

    let options: Vec<QualitativeOption> = options
        .iter()
        .map(|(label, value)| QualitativeOption {
            qualitative_option_id: Uuid::new_v4(),
            option_label: (*label).to_string(),
            option_value: *value,
        })
        .collect();
    let option_rows: Vec<QualitativeOptionRow> = options
        .iter()
        .map(|option| QualitativeOptionRow {
            qualitative_option_id: id_text(option.qualitative_option_id),
            taxon_measurement_id: id_text(definition_id),
            option_label: option.option_label.clone(),
            option_value: option.option_value,
        })
        .collect();
    if !option_rows.is_empty() {
        diesel::insert_into(xref_taxon_measurement_qualitative_option::table)
            .values(&option_rows)
            .execute(conn)?;
    }

    info!(%itis_tsn, measurement_name, "Added qualitative measurement definition");
    Ok(QualitativeMeasurementDefinition {
        taxon_measurement_id: definition_id,
        itis_tsn,
        measurement_name: measurement_name.to_string(),
        measurement_desc: None,
        options,
    })
}

/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_quantitative_definition(
    conn: &mut SqliteConnection,
    itis_tsn: TaxonId,
    measurement_name: &str,
    range: (Option<f64>, Option<f64>),
    unit: Option<&str>,
) -> Result<QuantitativeMeasurementDefinition, PersistenceError> {
    let definition_id: Uuid = Uuid::new_v4();
    let (min_value, max_value) = range;
    diesel::insert_into(xref_taxon_measurement_quantitative::table)
        .values(&QuantitativeDefinitionRow {
            taxon_measurement_id: id_text(definition_id),
            itis_tsn: itis_tsn.value(),
            measurement_name: measurement_name.to_string(),
            measurement_desc: None,
            min_value,
            max_value,
            unit: unit.map(str::to_string),
        })
        .execute(conn)?;

    info!(%itis_tsn, measurement_name, "Added quantitative measurement definition");
    Ok(QuantitativeMeasurementDefinition {
        taxon_measurement_id: definition_id,
        itis_tsn,
        measurement_name: measurement_name.to_string(),
        measurement_desc: None,
        min_value,
        max_value,
        unit: unit.map(str::to_string),
    })
}

/// Inserts a collection category linked to each of `taxa`.
///
/// # Errors
///
/// Returns an error if an insert fails.
pub fn insert_collection_category(
    conn: &mut SqliteConnection,
    category_name: &str,
    taxa: &[TaxonId],
) -> Result<Uuid, PersistenceError> {
    let category_id: Uuid = Uuid::new_v4();
    diesel::insert_into(collection_category::table)
        .values((
            collection_category::collection_category_id.eq(id_text(category_id)),
            collection_category::category_name.eq(category_name),
        ))
        .execute(conn)?;

    for tsn in taxa {
        diesel::insert_into(xref_taxon_collection_category::table)
            .values((
                xref_taxon_collection_category::collection_category_taxon_id
                    .eq(id_text(Uuid::new_v4())),
                xref_taxon_collection_category::collection_category_id.eq(id_text(category_id)),
                xref_taxon_collection_category::itis_tsn.eq(tsn.value()),
            ))
            .execute(conn)?;
    }

    info!(category_name, taxa = taxa.len(), "Added collection category");
    Ok(category_id)
}

/// # Errors
///
/// Returns an error if the insert fails, including an unknown category.
pub fn insert_collection_unit(
    conn: &mut SqliteConnection,
    category_id: Uuid,
    unit_name: &str,
) -> Result<Uuid, PersistenceError> {
    let unit_id: Uuid = Uuid::new_v4();
    diesel::insert_into(collection_unit::table)
        .values((
            collection_unit::collection_unit_id.eq(id_text(unit_id)),
            collection_unit::collection_category_id.eq(id_text(category_id)),
            collection_unit::unit_name.eq(unit_name),
        ))
        .execute(conn)?;
    Ok(unit_id)
}
