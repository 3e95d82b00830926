//! File ingestion: uploaded bytes in, [`RawTable`] out.
//!
//! Two formats are accepted: delimited text and spreadsheet workbooks
//! (first sheet only). Both are converted to the same raw table shape and
//! either succeed completely or fail before any downstream state is
//! touched.

#![deny(unsafe_code)]

mod delimited;
mod error;
mod sheet;
mod table;

pub use error::{IngestError, Result};
pub use table::RawTable;

use tracing::debug;

/// Accepted source file kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Delimited text (`.csv`).
    Delimited,
    /// Spreadsheet workbook (`.xlsx` / `.xls`).
    Workbook,
}

impl FileKind {
    /// Infers the kind from a file name's extension.
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("csv") => Ok(Self::Delimited),
            Some("xlsx" | "xls") => Ok(Self::Workbook),
            _ => Err(IngestError::FormatUnsupported {
                file_name: file_name.to_string(),
            }),
        }
    }
}

/// Parses an uploaded file into a [`RawTable`].
///
/// The header row is auto-detected and may be re-selected afterwards via
/// [`RawTable::select_header_row`] without re-reading the bytes.
pub fn ingest(bytes: &[u8], file_name: &str) -> Result<RawTable> {
    let kind = FileKind::from_file_name(file_name)?;
    let rows = match kind {
        FileKind::Delimited => delimited::parse_csv(bytes, file_name)?,
        FileKind::Workbook => sheet::parse_workbook(bytes, file_name)?,
    };
    let table = RawTable::new(rows);
    debug!(
        file_name,
        rows = table.row_count(),
        header_row = table.header_row_index(),
        "ingested file"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_on_extension() {
        assert_eq!(
            FileKind::from_file_name("contratos.CSV").unwrap(),
            FileKind::Delimited
        );
        assert_eq!(
            FileKind::from_file_name("contratos.xlsx").unwrap(),
            FileKind::Workbook
        );
        assert!(matches!(
            FileKind::from_file_name("contratos.pdf"),
            Err(IngestError::FormatUnsupported { .. })
        ));
        assert!(FileKind::from_file_name("no_extension").is_err());
    }

    #[test]
    fn ingests_csv_bytes() {
        let table = ingest(b"CNPJ,Valor\n11222333000181,1000\n", "c.csv").expect("ingest");
        assert_eq!(table.headers(), ["CNPJ", "Valor"]);
        assert_eq!(table.data_rows().len(), 1);
    }
}
