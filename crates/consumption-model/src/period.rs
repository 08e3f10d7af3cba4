//! Calendar Periods and Winter Seasons

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Calendar months of the heating season
pub const WINTER_MONTHS: [u32; 3] = [12, 1, 2];

/// Error parsing a period string
#[derive(Debug, Clone, Error)]
#[error("'{0}' is not a recognizable period (expected YYYY-MM, YYYY/MM, MM.YYYY or a full date)")]
pub struct PeriodParseError(pub String);

/// One calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Calendar year
    pub year: i32,
    /// Month of year (1-12)
    pub month: u32,
}

impl Period {
    /// Create a period, rejecting invalid months
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Whether this month falls in the heating season
    pub fn is_winter_month(&self) -> bool {
        WINTER_MONTHS.contains(&self.month)
    }

    /// Winter season this period belongs to, if any.
    ///
    /// December opens a season; the following January and February belong
    /// to it, so they map back to the previous calendar year's season.
    pub fn winter_season(&self) -> Option<WinterSeason> {
        match self.month {
            12 => Some(WinterSeason(self.year)),
            1 | 2 => Some(WinterSeason(self.year - 1)),
            _ => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || PeriodParseError(s.to_string());

        // Full dates (e.g. billing period end dates) truncate to the month.
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Period::new(date.year(), date.month()).ok_or_else(err);
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%d.%m.%Y") {
            return Period::new(date.year(), date.month()).ok_or_else(err);
        }

        // Year-first forms: YYYY-MM, YYYY/MM
        for sep in ['-', '/'] {
            if let Some((y, m)) = s.split_once(sep) {
                if let (Ok(year), Ok(month)) = (y.trim().parse(), m.trim().parse()) {
                    return Period::new(year, month).ok_or_else(err);
                }
            }
        }

        // Month-first Turkish export form: MM.YYYY
        if let Some((m, y)) = s.split_once('.') {
            if let (Ok(month), Ok(year)) = (m.trim().parse(), y.trim().parse()) {
                return Period::new(year, month).ok_or_else(err);
            }
        }

        Err(err())
    }
}

/// A winter season, keyed by the calendar year of its December.
///
/// `WinterSeason(2023)` covers December 2023, January 2024 and
/// February 2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WinterSeason(pub i32);

impl WinterSeason {
    /// The season one year earlier
    pub fn prev(&self) -> WinterSeason {
        WinterSeason(self.0 - 1)
    }

    /// The three months making up this season
    pub fn months(&self) -> [Period; 3] {
        [
            Period { year: self.0, month: 12 },
            Period { year: self.0 + 1, month: 1 },
            Period { year: self.0 + 1, month: 2 },
        ]
    }
}

impl fmt::Display for WinterSeason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, self.0 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_year_first() {
        assert_eq!("2023-12".parse::<Period>().unwrap(), Period { year: 2023, month: 12 });
        assert_eq!("2024/01".parse::<Period>().unwrap(), Period { year: 2024, month: 1 });
    }

    #[test]
    fn test_parse_month_first() {
        assert_eq!("01.2024".parse::<Period>().unwrap(), Period { year: 2024, month: 1 });
    }

    #[test]
    fn test_parse_full_date_truncates() {
        assert_eq!("2023-12-31".parse::<Period>().unwrap(), Period { year: 2023, month: 12 });
        assert_eq!("15.01.2024".parse::<Period>().unwrap(), Period { year: 2024, month: 1 });
    }

    #[test]
    fn test_parse_rejects_bad_month() {
        assert!("2023-13".parse::<Period>().is_err());
        assert!("2023-00".parse::<Period>().is_err());
        assert!("tuketim".parse::<Period>().is_err());
    }

    #[test]
    fn test_winter_season_assignment() {
        let dec = Period { year: 2023, month: 12 };
        let jan = Period { year: 2024, month: 1 };
        let feb = Period { year: 2024, month: 2 };
        let jul = Period { year: 2024, month: 7 };

        assert_eq!(dec.winter_season(), Some(WinterSeason(2023)));
        assert_eq!(jan.winter_season(), Some(WinterSeason(2023)));
        assert_eq!(feb.winter_season(), Some(WinterSeason(2023)));
        assert_eq!(jul.winter_season(), None);
    }

    #[test]
    fn test_season_months() {
        let months = WinterSeason(2022).months();
        assert_eq!(months[0], Period { year: 2022, month: 12 });
        assert_eq!(months[2], Period { year: 2023, month: 2 });
        assert!(months.iter().all(Period::is_winter_month));
    }

    #[test]
    fn test_period_ordering() {
        let a = Period { year: 2023, month: 12 };
        let b = Period { year: 2024, month: 1 };
        assert!(a < b);
    }
}
