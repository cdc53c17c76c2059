//! Fiscal year posting rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::LedgerError;

/// Fiscal year status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FiscalYearStatus {
    /// Posting allowed.
    Open,
    /// No posting allowed.
    Closed,
}

/// A fiscal year as seen by the posting engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiscalYearInfo {
    /// Fiscal year id.
    pub id: Uuid,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// Status.
    pub status: FiscalYearStatus,
}

impl FiscalYearInfo {
    /// Returns true if `date` falls inside the year.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Checks that an entry dated `date` may be posted into this year.
    ///
    /// # Errors
    ///
    /// `FiscalYearClosed` for closed years, `DateOutsideFiscalYear` when the
    /// date is not covered.
    pub fn validate_posting(&self, date: NaiveDate) -> Result<(), LedgerError> {
        if self.status == FiscalYearStatus::Closed {
            return Err(LedgerError::FiscalYearClosed);
        }
        if !self.contains(date) {
            return Err(LedgerError::DateOutsideFiscalYear(date));
        }
        Ok(())
    }
}

/// Picks the fiscal year containing `date`, preferring an open one.
///
/// # Errors
///
/// `NoFiscalYear` if no year covers the date.
pub fn find_fiscal_year(
    years: &[FiscalYearInfo],
    date: NaiveDate,
) -> Result<FiscalYearInfo, LedgerError> {
    let mut covering: Vec<&FiscalYearInfo> = years.iter().filter(|y| y.contains(date)).collect();
    covering.sort_by_key(|y| (y.status != FiscalYearStatus::Open, y.start_date));
    covering
        .first()
        .map(|y| **y)
        .ok_or(LedgerError::NoFiscalYear(date))
}

/// Checks a new fiscal year against the tenant's existing years.
///
/// # Errors
///
/// `InvalidFiscalYearRange` unless `start < end`; `OverlappingFiscalYear`
/// if the range shares a day with an existing year.
pub fn validate_new_year(
    start_date: NaiveDate,
    end_date: NaiveDate,
    existing: &[FiscalYearInfo],
) -> Result<(), LedgerError> {
    if start_date >= end_date {
        return Err(LedgerError::InvalidFiscalYearRange);
    }
    if let Some(clash) = existing
        .iter()
        .find(|y| start_date <= y.end_date && end_date >= y.start_date)
    {
        return Err(LedgerError::OverlappingFiscalYear(format!(
            "{} to {}",
            clash.start_date, clash.end_date
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn year(y: i32, status: FiscalYearStatus) -> FiscalYearInfo {
        FiscalYearInfo {
            id: Uuid::new_v4(),
            start_date: date(y, 1, 1),
            end_date: date(y, 12, 31),
            status,
        }
    }

    #[test]
    fn test_open_year_allows_posting() {
        let fy = year(2026, FiscalYearStatus::Open);
        assert!(fy.validate_posting(date(2026, 12, 31)).is_ok());
    }

    #[test]
    fn test_closed_year_rejects() {
        let fy = year(2025, FiscalYearStatus::Closed);
        assert!(matches!(
            fy.validate_posting(date(2025, 6, 1)),
            Err(LedgerError::FiscalYearClosed)
        ));
    }

    #[test]
    fn test_date_outside_year_rejects() {
        let fy = year(2026, FiscalYearStatus::Open);
        assert!(matches!(
            fy.validate_posting(date(2027, 1, 1)),
            Err(LedgerError::DateOutsideFiscalYear(_))
        ));
    }

    #[test]
    fn test_find_prefers_open_year() {
        let closed = year(2026, FiscalYearStatus::Closed);
        let open = year(2026, FiscalYearStatus::Open);
        let found = find_fiscal_year(&[closed, open], date(2026, 3, 1)).unwrap();
        assert_eq!(found.id, open.id);
    }

    #[test]
    fn test_find_without_cover() {
        let years = [year(2025, FiscalYearStatus::Open)];
        assert!(matches!(
            find_fiscal_year(&years, date(2026, 3, 1)),
            Err(LedgerError::NoFiscalYear(_))
        ));
    }

    #[test]
    fn test_new_year_checks() {
        let existing = [year(2025, FiscalYearStatus::Closed)];
        assert!(validate_new_year(date(2026, 1, 1), date(2026, 12, 31), &existing).is_ok());
        assert!(matches!(
            validate_new_year(date(2026, 1, 1), date(2026, 1, 1), &existing),
            Err(LedgerError::InvalidFiscalYearRange)
        ));
        assert!(matches!(
            validate_new_year(date(2025, 7, 1), date(2026, 6, 30), &existing),
            Err(LedgerError::OverlappingFiscalYear(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// A closed year never accepts a posting, whatever the date.
        #[test]
        fn prop_closed_year_never_posts(offset in 0i64..365) {
            let fy = year(2026, FiscalYearStatus::Closed);
            let d = fy.start_date + chrono::Duration::days(offset);
            prop_assert!(fy.validate_posting(d).is_err());
        }
    }
}
