// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Taxon-scoped definition queries.
//!
//! A definition row is owned by exactly one taxon. A taxon may use every
//! definition owned by any member of its hierarchy chain, so each query
//! here takes the whole chain and returns the union.

use std::collections::HashMap;

use critterbase_domain::{
    CollectionCategoryDefinition, Definition, DefinitionKind, MarkingBodyLocationDefinition,
    QualitativeMeasurementDefinition, QualitativeOption, QuantitativeMeasurementDefinition,
    TaxonId,
};
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use crate::data_models::{
    CollectionCategoryLinkRow, MarkingBodyLocationRow, QualitativeDefinitionRow,
    QualitativeOptionRow, QuantitativeDefinitionRow, collection_category_from_link, id_text,
    parse_id,
};
use crate::diesel_schema::{
    collection_category, marking, xref_taxon_collection_category, xref_taxon_marking_body_location,
    xref_taxon_measurement_qualitative, xref_taxon_measurement_qualitative_option,
    xref_taxon_measurement_quantitative,
};
use crate::error::PersistenceError;

fn raw_tsns(chain: &[TaxonId]) -> Vec<i64> {
    chain.iter().map(|tsn| tsn.value()).collect()
}

/// Definitions of `kind` owned by any taxon in `chain`.
///
/// # Errors
///
/// Returns an error if the query fails or a row does not decode.
pub fn definitions_for_chain(
    conn: &mut SqliteConnection,
    kind: DefinitionKind,
    chain: &[TaxonId],
) -> Result<Vec<Definition>, PersistenceError> {
    let definitions: Vec<Definition> = match kind {
        DefinitionKind::MarkingBodyLocation => marking_body_locations_for_chain(conn, chain)?
            .into_iter()
            .map(Definition::MarkingBodyLocation)
            .collect(),
        DefinitionKind::QualitativeMeasurement => qualitative_definitions_for_chain(conn, chain)?
            .into_iter()
            .map(Definition::QualitativeMeasurement)
            .collect(),
        DefinitionKind::QuantitativeMeasurement => {
            quantitative_definitions_for_chain(conn, chain)?
                .into_iter()
                .map(Definition::QuantitativeMeasurement)
                .collect()
        }
        DefinitionKind::CollectionUnitCategory => collection_categories_for_chain(conn, chain)?
            .into_iter()
            .map(Definition::CollectionUnitCategory)
            .collect(),
    };
    Ok(definitions)
}

/// Marking body locations usable by a taxon with this chain.
///
/// # Errors
///
/// Returns an error if the query fails or a row does not decode.
pub fn marking_body_locations_for_chain(
    conn: &mut SqliteConnection,
    chain: &[TaxonId],
) -> Result<Vec<MarkingBodyLocationDefinition>, PersistenceError> {
    xref_taxon_marking_body_location::table
        .filter(xref_taxon_marking_body_location::itis_tsn.eq_any(raw_tsns(chain)))
        .order((
            xref_taxon_marking_body_location::itis_tsn.asc(),
            xref_taxon_marking_body_location::body_location.asc(),
        ))
        .select(MarkingBodyLocationRow::as_select())
        .load(conn)?
        .into_iter()
        .map(MarkingBodyLocationDefinition::try_from)
        .collect()
}

/// Qualitative measurement definitions with their options attached.
///
/// Options for all matched definitions are fetched in one query and
/// grouped in memory.
///
/// # Errors
///
/// Returns an error if a query fails or a row does not decode.
pub fn qualitative_definitions_for_chain(
    conn: &mut SqliteConnection,
    chain: &[TaxonId],
) -> Result<Vec<QualitativeMeasurementDefinition>, PersistenceError> {
    let definitions: Vec<QualitativeDefinitionRow> = xref_taxon_measurement_qualitative::table
        .filter(xref_taxon_measurement_qualitative::itis_tsn.eq_any(raw_tsns(chain)))
        .order((
            xref_taxon_measurement_qualitative::itis_tsn.asc(),
            xref_taxon_measurement_qualitative::measurement_name.asc(),
        ))
        .select(QualitativeDefinitionRow::as_select())
        .load(conn)?;

    let definition_ids: Vec<&str> = definitions
        .iter()
        .map(|d| d.taxon_measurement_id.as_str())
        .collect();

    let option_rows: Vec<QualitativeOptionRow> = xref_taxon_measurement_qualitative_option::table
        .filter(xref_taxon_measurement_qualitative_option::taxon_measurement_id.eq_any(definition_ids))
        .order(xref_taxon_measurement_qualitative_option::option_value.asc())
        .select(QualitativeOptionRow::as_select())
        .load(conn)?;

    let mut options_by_definition: HashMap<String, Vec<QualitativeOption>> = HashMap::new();
    for row in option_rows {
        let definition_id: String = row.taxon_measurement_id.clone();
        options_by_definition
            .entry(definition_id)
            .or_default()
            .push(QualitativeOption::try_from(row)?);
    }

    definitions
        .into_iter()
        .map(|row| {
            let options: Vec<QualitativeOption> = options_by_definition
                .remove(&row.taxon_measurement_id)
                .unwrap_or_default();
            Ok(QualitativeMeasurementDefinition {
                taxon_measurement_id: parse_id(
                    "xref_taxon_measurement_qualitative.taxon_measurement_id",
                    &row.taxon_measurement_id,
                )?,
                itis_tsn: TaxonId::new(row.itis_tsn),
                measurement_name: row.measurement_name,
                measurement_desc: row.measurement_desc,
                options,
            })
        })
        .collect()
}

/// Quantitative measurement definitions usable by a taxon with this chain.
///
/// # Errors
///
/// Returns an error if the query fails or a row does not decode.
pub fn quantitative_definitions_for_chain(
    conn: &mut SqliteConnection,
    chain: &[TaxonId],
) -> Result<Vec<QuantitativeMeasurementDefinition>, PersistenceError> {
    xref_taxon_measurement_quantitative::table
        .filter(xref_taxon_measurement_quantitative::itis_tsn.eq_any(raw_tsns(chain)))
        .order((
            xref_taxon_measurement_quantitative::itis_tsn.asc(),
            xref_taxon_measurement_quantitative::measurement_name.asc(),
        ))
        .select(QuantitativeDefinitionRow::as_select())
        .load(conn)?
        .into_iter()
        .map(QuantitativeMeasurementDefinition::try_from)
        .collect()
}

/// Collection categories linked to any taxon in this chain.
///
/// A category linked to several chain members appears once per link.
///
/// # Errors
///
/// Returns an error if the query fails or a row does not decode.
pub fn collection_categories_for_chain(
    conn: &mut SqliteConnection,
    chain: &[TaxonId],
) -> Result<Vec<CollectionCategoryDefinition>, PersistenceError> {
    let rows: Vec<CollectionCategoryLinkRow> = xref_taxon_collection_category::table
        .inner_join(collection_category::table)
        .filter(xref_taxon_collection_category::itis_tsn.eq_any(raw_tsns(chain)))
        .order((
            xref_taxon_collection_category::itis_tsn.asc(),
            collection_category::category_name.asc(),
        ))
        .select((
            collection_category::collection_category_id,
            xref_taxon_collection_category::itis_tsn,
            collection_category::category_name,
            collection_category::description,
        ))
        .load(conn)?;

    rows.into_iter().map(collection_category_from_link).collect()
}

/// Of `marking_ids`, those whose body location is owned by a taxon outside
/// `chain`.
///
/// Markings without a body location and ids that match no marking are
/// never reported.
///
/// # Errors
///
/// Returns an error if the query fails or a row does not decode.
pub fn markings_outside_chain(
    conn: &mut SqliteConnection,
    chain: &[TaxonId],
    marking_ids: &[Uuid],
) -> Result<Vec<Uuid>, PersistenceError> {
    let ids: Vec<String> = marking_ids.iter().copied().map(id_text).collect();
    let rows: Vec<String> = marking::table
        .inner_join(xref_taxon_marking_body_location::table)
        .filter(marking::marking_id.eq_any(ids))
        .filter(xref_taxon_marking_body_location::itis_tsn.ne_all(raw_tsns(chain)))
        .select(marking::marking_id)
        .order(marking::marking_id.asc())
        .load(conn)?;

    rows.iter()
        .map(|id| parse_id("marking.marking_id", id))
        .collect()
}

/// Owning taxon of each known body-location definition id.
///
/// # Errors
///
/// Returns an error if the query fails or a row does not decode.
pub fn body_location_owners(
    conn: &mut SqliteConnection,
    body_location_ids: &[Uuid],
) -> Result<HashMap<Uuid, TaxonId>, PersistenceError> {
    let ids: Vec<String> = body_location_ids.iter().copied().map(id_text).collect();
    let rows: Vec<(String, i64)> = xref_taxon_marking_body_location::table
        .filter(xref_taxon_marking_body_location::taxon_marking_body_location_id.eq_any(ids))
        .select((
            xref_taxon_marking_body_location::taxon_marking_body_location_id,
            xref_taxon_marking_body_location::itis_tsn,
        ))
        .load(conn)?;

    rows.into_iter()
        .map(|(id, tsn)| {
            Ok((
                parse_id("xref_taxon_marking_body_location.taxon_marking_body_location_id", &id)?,
                TaxonId::new(tsn),
            ))
        })
        .collect()
}
