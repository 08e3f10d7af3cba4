//! Raw Tabular Input

use crate::error::IngestError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A raw table: one header row plus string cells.
///
/// The caller resolves the source format; this type only carries the
/// cells. `from_csv_path` covers the common case of utility CSV exports.
#[derive(Debug, Clone)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table from in-memory cells
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Load a table from a CSV file
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IngestError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_csv_reader(file)
    }

    /// Load a table from any CSV reader
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();
        if headers.is_empty() {
            return Err(IngestError::EmptyTable);
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Header row
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Cell at (row, column), empty cells and short rows both yield None
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_csv_reader() {
        let csv = "tesisat_no,bina_no,donem,tuketim\nT1,B1,2023-12,45.5\nT2,B1,2023-12,60\n";
        let table = RawTable::from_csv_reader(csv.as_bytes()).unwrap();

        assert_eq!(table.headers(), &["tesisat_no", "bina_no", "donem", "tuketim"]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.cell(0, 3), Some("45.5"));
    }

    #[test]
    fn test_cell_handles_short_rows_and_blanks() {
        let table = RawTable::new(
            vec!["a".into(), "b".into()],
            vec![vec!["x".into()], vec!["".into(), "y".into()]],
        );
        assert_eq!(table.cell(0, 1), None);
        assert_eq!(table.cell(1, 0), None);
        assert_eq!(table.cell(1, 1), Some("y"));
    }
}
