//! Table Normalization into a Dataset

use crate::error::{IngestError, RowError};
use crate::schema::TableLayout;
use crate::table::RawTable;
use consumption_model::{Dataset, Observation, Period};
use serde::Serialize;
use tracing::{debug, info, warn};

/// What happened during ingestion. Row-level failures are collected here
/// rather than aborting the run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    /// Data rows read from the table
    pub rows_read: usize,
    /// Observations loaded into the dataset
    pub observations: usize,
    /// Rows that produced at least one coercion error
    pub rows_with_errors: usize,
    /// Duplicate (installation, period) readings replaced, last write wins
    pub duplicates_replaced: usize,
    /// The individual coercion failures
    pub row_errors: Vec<RowError>,
}

/// Normalize a raw table into a dataset plus an ingestion report.
///
/// Structural problems (unidentifiable columns) fail the whole run; bad
/// cells are excluded, counted, and reported per row.
pub fn ingest(table: &RawTable) -> Result<(Dataset, IngestReport), IngestError> {
    let layout = TableLayout::detect(table.headers())?;
    debug!("detected table layout: {:?}", layout);

    let mut dataset = Dataset::new();
    let mut report = IngestReport {
        rows_read: table.rows().len(),
        ..Default::default()
    };

    for row in 0..table.rows().len() {
        let row_no = row + 1;
        let had_errors = match &layout {
            TableLayout::Long {
                installation,
                building,
                period,
                consumption,
            } => ingest_long_row(
                table,
                row,
                row_no,
                (*installation, *building, *period, *consumption),
                &mut dataset,
                &mut report,
            ),
            TableLayout::Wide {
                installation,
                building,
                months,
            } => ingest_wide_row(
                table,
                row,
                row_no,
                (*installation, *building),
                months,
                &mut dataset,
                &mut report,
            ),
        };
        if had_errors {
            report.rows_with_errors += 1;
        }
    }

    info!(
        "ingested {} observations from {} rows ({} installations, {} duplicates replaced)",
        report.observations,
        report.rows_read,
        dataset.len(),
        report.duplicates_replaced
    );
    if report.rows_with_errors > 0 {
        warn!(
            "{} rows had coercion errors and were partially or fully excluded",
            report.rows_with_errors
        );
    }

    Ok((dataset, report))
}

/// Ingest one long-layout row. Returns true if the row had errors.
fn ingest_long_row(
    table: &RawTable,
    row: usize,
    row_no: usize,
    (installation, building, period, consumption): (usize, usize, usize, usize),
    dataset: &mut Dataset,
    report: &mut IngestReport,
) -> bool {
    let installation_id = match table.cell(row, installation) {
        Some(id) => id.to_string(),
        None => {
            push_error(report, row_no, None, "missing installation identifier");
            return true;
        }
    };
    let building_id = match table.cell(row, building) {
        Some(id) => id.to_string(),
        None => {
            push_error(report, row_no, Some(&installation_id), "missing building identifier");
            return true;
        }
    };
    let period = match table.cell(row, period) {
        Some(cell) => match cell.parse::<Period>() {
            Ok(p) => p,
            Err(e) => {
                push_error(report, row_no, Some(&installation_id), &e.to_string());
                return true;
            }
        },
        None => {
            push_error(report, row_no, Some(&installation_id), "missing period");
            return true;
        }
    };

    // An empty consumption cell is missing data, not an error and not zero.
    let Some(cell) = table.cell(row, consumption) else {
        return false;
    };
    match parse_consumption(cell) {
        Ok(value) => {
            add_observation(dataset, report, installation_id, building_id, period, value);
            false
        }
        Err(message) => {
            push_error(report, row_no, Some(&installation_id), &message);
            true
        }
    }
}

/// Ingest one wide-layout row. Bad month cells are excluded individually;
/// the rest of the row still loads. Returns true if the row had errors.
fn ingest_wide_row(
    table: &RawTable,
    row: usize,
    row_no: usize,
    (installation, building): (usize, usize),
    months: &[(usize, Period)],
    dataset: &mut Dataset,
    report: &mut IngestReport,
) -> bool {
    let installation_id = match table.cell(row, installation) {
        Some(id) => id.to_string(),
        None => {
            push_error(report, row_no, None, "missing installation identifier");
            return true;
        }
    };
    let building_id = match table.cell(row, building) {
        Some(id) => id.to_string(),
        None => {
            push_error(report, row_no, Some(&installation_id), "missing building identifier");
            return true;
        }
    };

    let mut had_errors = false;
    for &(col, period) in months {
        let Some(cell) = table.cell(row, col) else {
            continue;
        };
        match parse_consumption(cell) {
            Ok(value) => {
                add_observation(
                    dataset,
                    report,
                    installation_id.clone(),
                    building_id.clone(),
                    period,
                    value,
                );
            }
            Err(message) => {
                let message = format!("{}: {}", period, message);
                push_error(report, row_no, Some(&installation_id), &message);
                had_errors = true;
            }
        }
    }
    had_errors
}

fn add_observation(
    dataset: &mut Dataset,
    report: &mut IngestReport,
    installation_id: String,
    building_id: String,
    period: Period,
    consumption: f64,
) {
    let replaced = dataset.add(Observation {
        installation_id,
        building_id,
        period,
        consumption,
    });
    if replaced {
        report.duplicates_replaced += 1;
    } else {
        report.observations += 1;
    }
}

fn push_error(report: &mut IngestReport, row: usize, installation_id: Option<&str>, message: &str) {
    debug!("row {}: {}", row, message);
    report.row_errors.push(RowError {
        row,
        installation_id: installation_id.map(str::to_string),
        message: message.to_string(),
    });
}

/// Coerce a consumption cell to a non-negative float.
fn parse_consumption(cell: &str) -> Result<f64, String> {
    let value = match cell.parse::<f64>() {
        Ok(v) => v,
        // Turkish exports use decimal commas.
        Err(_) if cell.contains(',') && !cell.contains('.') => cell
            .replace(',', ".")
            .parse::<f64>()
            .map_err(|_| format!("'{}' is not numeric", cell))?,
        Err(_) => return Err(format!("'{}' is not numeric", cell)),
    };
    if !value.is_finite() {
        return Err(format!("'{}' is not a finite number", cell));
    }
    if value < 0.0 {
        return Err(format!("negative consumption {}", value));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> RawTable {
        RawTable::from_csv_reader(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_ingest_long_table() {
        let table = table(
            "tesisat_no,bina_no,donem,tuketim\n\
             T1,B1,2023-12,45.5\n\
             T1,B1,2024-01,40\n\
             T2,B1,2023-12,80\n",
        );
        let (dataset, report) = ingest(&table).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(report.observations, 3);
        assert_eq!(report.rows_with_errors, 0);
        assert_eq!(
            dataset.get("T1").unwrap().get(Period::new(2023, 12).unwrap()),
            Some(45.5)
        );
    }

    #[test]
    fn test_ingest_wide_table() {
        let table = table(
            "tesisat_no,bina_no,2023-12,2024-01,2024-02\n\
             T1,B1,45,40,38\n\
             T2,B1,80,,75\n",
        );
        let (dataset, report) = ingest(&table).unwrap();

        assert_eq!(report.observations, 5);
        assert_eq!(dataset.get("T2").unwrap().len(), 2);
        // The empty January cell is missing data, not an error
        assert_eq!(report.rows_with_errors, 0);
    }

    #[test]
    fn test_bad_value_excluded_and_counted() {
        let table = table(
            "tesisat_no,bina_no,donem,tuketim\n\
             T1,B1,2023-12,abc\n\
             T2,B1,2023-12,50\n",
        );
        let (dataset, report) = ingest(&table).unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(report.rows_with_errors, 1);
        assert_eq!(report.row_errors.len(), 1);
        assert_eq!(report.row_errors[0].installation_id.as_deref(), Some("T1"));
    }

    #[test]
    fn test_negative_value_rejected() {
        let table = table("tesisat_no,bina_no,donem,tuketim\nT1,B1,2023-12,-5\n");
        let (dataset, report) = ingest(&table).unwrap();

        assert!(dataset.is_empty());
        assert_eq!(report.rows_with_errors, 1);
    }

    #[test]
    fn test_zero_is_a_valid_reading() {
        let table = table("tesisat_no,bina_no,donem,tuketim\nT1,B1,2023-12,0\n");
        let (dataset, report) = ingest(&table).unwrap();

        assert_eq!(report.observations, 1);
        assert_eq!(
            dataset.get("T1").unwrap().get(Period::new(2023, 12).unwrap()),
            Some(0.0)
        );
    }

    #[test]
    fn test_decimal_comma_coerced() {
        let table = table("tesisat_no,bina_no,donem,tuketim\nT1,B1,2023-12,\"45,5\"\n");
        let (dataset, _) = ingest(&table).unwrap();
        assert_eq!(
            dataset.get("T1").unwrap().get(Period::new(2023, 12).unwrap()),
            Some(45.5)
        );
    }

    #[test]
    fn test_duplicate_last_write_wins() {
        let table = table(
            "tesisat_no,bina_no,donem,tuketim\n\
             T1,B1,2023-12,50\n\
             T1,B1,2023-12,20\n",
        );
        let (dataset, report) = ingest(&table).unwrap();

        assert_eq!(report.duplicates_replaced, 1);
        assert_eq!(
            dataset.get("T1").unwrap().get(Period::new(2023, 12).unwrap()),
            Some(20.0)
        );
    }

    #[test]
    fn test_schema_error_is_fatal() {
        let table = table("id,donem,tuketim\nT1,2023-12,50\n");
        assert!(ingest(&table).is_err());
    }
}
