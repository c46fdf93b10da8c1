//! Assembly of the "Información general" section.

use super::country::extract_countries_in;
use super::header::{extract_header_fields, find_header_table};
use super::header_first;
use super::yes_no::{extract_other_areas, extract_supplier};
use crate::catalog::{
    country_options, FIELD_ORDER, INFO_GENERAL_ID, INFO_GENERAL_TITLE, KEY_PAIS_AFECTADO,
    KEY_PARTICIPA_PROVEEDOR, LABEL_PAIS_AFECTADO,
};
use crate::model::{Field, Section, TextTable};
use crate::normalize::country::codes_to_strings;
use tracing::debug;

fn order_of(key: &str) -> usize {
    FIELD_ORDER
        .iter()
        .position(|k| *k == key)
        .unwrap_or(FIELD_ORDER.len())
}

/// Build the general-information section from the document tables.
///
/// Header fields come from the header table. The yes/no block, the country
/// block and the supplier block are looked up in the header table first,
/// then in the other tables. `None` when nothing was recognized.
pub fn build_info_general(tables: &[TextTable]) -> Option<Section> {
    let header = find_header_table(tables);
    let mut fields: Vec<Field> = Vec::new();

    if let Some(table) = header.and_then(|i| tables.get(i)) {
        fields.extend(extract_header_fields(table));
    }

    if let Some(block) = header_first(tables, header)
        .map(extract_other_areas)
        .find(|f| !f.is_empty())
    {
        fields.extend(block);
    }

    if let Some(codes) = extract_countries_in(header_first(tables, header)) {
        fields.push(Field::multiselect(
            KEY_PAIS_AFECTADO,
            LABEL_PAIS_AFECTADO,
            codes_to_strings(&codes),
            country_options(),
        ));
    }

    if !fields.iter().any(|f| f.has_key(KEY_PARTICIPA_PROVEEDOR)) {
        if let Some(field) = header_first(tables, header).find_map(extract_supplier) {
            fields.push(field);
        }
    }

    if fields.is_empty() {
        return None;
    }

    fields.sort_by_key(|f| order_of(&f.key));
    debug!(fields = fields.len(), header_table = ?header, "info general");

    let mut section = Section::new(INFO_GENERAL_ID, INFO_GENERAL_TITLE);
    section.fields = fields;
    Some(section)
}
