//! Column Identification and Layout Detection

use crate::error::IngestError;
use consumption_model::Period;

/// Header synonyms for the installation identifier column
const INSTALLATION_HEADERS: &[&str] = &[
    "tesisat_no",
    "tesisat no",
    "tesisat",
    "installation_id",
    "installation",
    "meter_id",
    "abone_no",
];

/// Header synonyms for the building identifier column
const BUILDING_HEADERS: &[&str] = &["bina_no", "bina no", "bina", "building_id", "building"];

/// Header synonyms for the period column (long layout)
const PERIOD_HEADERS: &[&str] = &["donem", "dönem", "period", "ay", "month", "tarih", "date"];

/// Header synonyms for the consumption column (long layout)
const CONSUMPTION_HEADERS: &[&str] = &[
    "tuketim",
    "tüketim",
    "tuketim_m3",
    "consumption",
    "consumption_m3",
    "m3",
    "usage",
];

/// Detected table shape and column positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableLayout {
    /// One observation per row: identifier columns plus period and consumption
    Long {
        installation: usize,
        building: usize,
        period: usize,
        consumption: usize,
    },
    /// One installation per row: identifier columns plus one column per month
    Wide {
        installation: usize,
        building: usize,
        /// Month columns as (column index, parsed period)
        months: Vec<(usize, Period)>,
    },
}

impl TableLayout {
    /// Detect the layout from the header row.
    ///
    /// Long layout wins when explicit period and consumption columns are
    /// present; otherwise any non-identifier headers that parse as calendar
    /// months imply wide layout.
    pub fn detect(headers: &[String]) -> Result<Self, IngestError> {
        if headers.is_empty() {
            return Err(IngestError::EmptyTable);
        }

        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let installation = find_column(&normalized, INSTALLATION_HEADERS)
            .ok_or(IngestError::MissingColumn("installation"))?;
        let building = find_column(&normalized, BUILDING_HEADERS)
            .ok_or(IngestError::MissingColumn("building"))?;

        let period = find_column(&normalized, PERIOD_HEADERS);
        let consumption = find_column(&normalized, CONSUMPTION_HEADERS);
        if let (Some(period), Some(consumption)) = (period, consumption) {
            return Ok(TableLayout::Long {
                installation,
                building,
                period,
                consumption,
            });
        }

        let months: Vec<(usize, Period)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != installation && *i != building)
            .filter_map(|(i, h)| h.parse::<Period>().ok().map(|p| (i, p)))
            .collect();
        if months.is_empty() {
            return Err(IngestError::AmbiguousLayout);
        }

        Ok(TableLayout::Wide {
            installation,
            building,
            months,
        })
    }
}

/// First column whose normalized header matches one of the synonyms
fn find_column(normalized: &[String], synonyms: &[&str]) -> Option<usize> {
    for &synonym in synonyms {
        if let Some(idx) = normalized.iter().position(|h| h == synonym) {
            return Some(idx);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_detect_long_layout() {
        let layout = TableLayout::detect(&headers(&["Tesisat_No", "Bina_No", "Donem", "Tuketim"]))
            .unwrap();
        assert_eq!(
            layout,
            TableLayout::Long {
                installation: 0,
                building: 1,
                period: 2,
                consumption: 3,
            }
        );
    }

    #[test]
    fn test_detect_long_layout_english_headers() {
        let layout =
            TableLayout::detect(&headers(&["installation_id", "building_id", "period", "consumption"]))
                .unwrap();
        assert!(matches!(layout, TableLayout::Long { .. }));
    }

    #[test]
    fn test_detect_wide_layout() {
        let layout = TableLayout::detect(&headers(&[
            "tesisat_no",
            "bina_no",
            "2023-11",
            "2023-12",
            "2024-01",
            "2024-02",
        ]))
        .unwrap();
        match layout {
            TableLayout::Wide { months, .. } => {
                assert_eq!(months.len(), 4);
                assert_eq!(months[1].1, Period::new(2023, 12).unwrap());
            }
            other => panic!("expected wide layout, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_installation_column() {
        let err = TableLayout::detect(&headers(&["bina_no", "donem", "tuketim"])).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn("installation")));
    }

    #[test]
    fn test_missing_building_column() {
        let err = TableLayout::detect(&headers(&["tesisat_no", "donem", "tuketim"])).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn("building")));
    }

    #[test]
    fn test_unrecognizable_layout() {
        let err = TableLayout::detect(&headers(&["tesisat_no", "bina_no", "notes"])).unwrap_err();
        assert!(matches!(err, IngestError::AmbiguousLayout));
    }
}
