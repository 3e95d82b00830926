//! Pure projection of a raw table onto canonical records.

use cvp_ingest::RawTable;
use cvp_model::SourceRecord;

use crate::types::ColumnMapping;

/// Projects every data row of `table` onto a [`SourceRecord`].
///
/// Pure and side-effect free, so it is safe to call repeatedly for live
/// previews. Columns without a mapping are dropped. When two source
/// columns map to the same canonical field, the later column in source
/// order wins (last-write-wins).
#[must_use]
pub fn project(table: &RawTable, mapping: &ColumnMapping) -> Vec<SourceRecord> {
    let headers = table.headers();
    table
        .data_rows()
        .iter()
        .map(|row| project_row(headers, row, mapping))
        .collect()
}

fn project_row(headers: &[String], row: &[String], mapping: &ColumnMapping) -> SourceRecord {
    let mut record = SourceRecord::default();
    for (idx, label) in headers.iter().enumerate() {
        let Some(field) = mapping.field_for(label) else {
            continue;
        };
        let value = row.get(idx).map_or("", String::as_str);
        if value.trim().is_empty() {
            // Blank cells never clobber a value written by an earlier
            // column mapped to the same field.
            continue;
        }
        record.set(field, value);
    }
    record
}
