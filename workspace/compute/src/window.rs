//! Date-window filtering.
//!
//! A [`DateWindow`] is an inclusive `[start, end]` range. Records are matched
//! against it in one of three ways: a single date inside the window, a
//! `(start, end)` span overlapping it, or a date whose calendar month equals a
//! target month regardless of year. Records without the relevant date are
//! always excluded.

use chrono::{Datelike, NaiveDate};

use crate::error::{ReportError, Result};

pub const MIN_YEAR: i32 = 1000;
pub const MAX_YEAR: i32 = 9999;

/// Inclusive calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Window from explicit bounds. `start` after `end` is rejected.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(ReportError::validation(format!(
                "data_inicio ({start}) must not be after data_fim ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Single-day window.
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Whole calendar month.
    pub fn month(year: i32, month: u32) -> Result<Self> {
        validate_year(year)?;
        validate_month(month)?;
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| ReportError::validation(format!("Invalid month {year}-{month}")))?;
        let end = last_day_of_month(year, month)
            .ok_or_else(|| ReportError::validation(format!("Invalid month {year}-{month}")))?;
        Ok(Self { start, end })
    }

    /// Whole calendar year.
    pub fn year(year: i32) -> Result<Self> {
        validate_year(year)?;
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| ReportError::validation(format!("Invalid year {year}")))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| ReportError::validation(format!("Invalid year {year}")))?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Contains-point test.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Overlap test for a record span.
    ///
    /// True when the record starts in the window, ends in the window, or
    /// spans the whole window. The span is taken as stored, so a reversed
    /// span is still evaluated without panicking and matches at most once.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.contains(start) || self.contains(end) || (start <= self.start && end >= self.end)
    }
}

/// Rejects months outside 1..=12.
pub fn validate_month(month: u32) -> Result<u32> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(ReportError::validation(format!(
            "Invalid month {month}: expected a value between 1 and 12"
        )))
    }
}

/// Rejects years that are not four digits.
pub fn validate_year(year: i32) -> Result<i32> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(ReportError::validation(format!(
            "Invalid year {year}: expected a four-digit year"
        )))
    }
}

/// Month-of-year test; the year is ignored.
pub fn month_of_year(date: NaiveDate, month: u32) -> bool {
    date.month() == month
}

/// Records whose date falls inside `window`.
pub fn filter_contains<'a, T, F>(records: &'a [T], window: &DateWindow, date_of: F) -> Vec<&'a T>
where
    F: Fn(&T) -> Option<NaiveDate>,
{
    records
        .iter()
        .filter(|record| date_of(record).is_some_and(|date| window.contains(date)))
        .collect()
}

/// Records whose `(start, end)` span overlaps `window`.
pub fn filter_overlapping<'a, T, F>(records: &'a [T], window: &DateWindow, span_of: F) -> Vec<&'a T>
where
    F: Fn(&T) -> Option<(NaiveDate, NaiveDate)>,
{
    records
        .iter()
        .filter(|record| span_of(record).is_some_and(|(start, end)| window.overlaps(start, end)))
        .collect()
}

/// Records whose date falls in calendar `month` of any year.
pub fn filter_month_of_year<'a, T, F>(records: &'a [T], month: u32, date_of: F) -> Result<Vec<&'a T>>
where
    F: Fn(&T) -> Option<NaiveDate>,
{
    validate_month(month)?;
    Ok(records
        .iter()
        .filter(|record| date_of(record).is_some_and(|date| month_of_year(date, month)))
        .collect())
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).and_then(|d| d.pred_opt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_window_bounds() {
        let feb = DateWindow::month(2024, 2).unwrap();
        assert_eq!(feb.start(), date(2024, 2, 1));
        assert_eq!(feb.end(), date(2024, 2, 29));

        let dec = DateWindow::month(2023, 12).unwrap();
        assert_eq!(dec.end(), date(2023, 12, 31));
    }

    #[test]
    fn test_month_out_of_range_is_validation_error() {
        assert!(matches!(
            DateWindow::month(2024, 0),
            Err(ReportError::Validation(_))
        ));
        assert!(matches!(
            DateWindow::month(2024, 13),
            Err(ReportError::Validation(_))
        ));
        assert!(matches!(validate_month(12), Ok(12)));
    }

    #[test]
    fn test_reversed_window_is_rejected() {
        let result = DateWindow::new(date(2024, 6, 30), date(2024, 6, 1));
        assert!(matches!(result, Err(ReportError::Validation(_))));
    }

    #[test]
    fn test_year_must_have_four_digits() {
        assert!(validate_year(2024).is_ok());
        assert!(validate_year(999).is_err());
        assert!(validate_year(10000).is_err());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let june = DateWindow::month(2024, 6).unwrap();
        assert!(june.contains(date(2024, 6, 1)));
        assert!(june.contains(date(2024, 6, 30)));
        assert!(!june.contains(date(2024, 7, 1)));
        assert!(!june.contains(date(2024, 5, 31)));
    }

    #[test]
    fn test_overlap_modes() {
        let june = DateWindow::new(date(2024, 6, 1), date(2024, 6, 30)).unwrap();

        // starts in window
        assert!(june.overlaps(date(2024, 6, 20), date(2024, 7, 5)));
        // ends in window
        assert!(june.overlaps(date(2024, 5, 25), date(2024, 6, 3)));
        // spans the whole window with neither endpoint inside
        assert!(june.overlaps(date(2024, 5, 20), date(2024, 7, 10)));
        // entirely outside
        assert!(!june.overlaps(date(2024, 7, 1), date(2024, 7, 15)));
        assert!(!june.overlaps(date(2024, 4, 1), date(2024, 5, 31)));
    }

    #[test]
    fn test_reversed_span_does_not_panic() {
        let june = DateWindow::month(2024, 6).unwrap();
        // end before start, both outside June
        assert!(!june.overlaps(date(2024, 7, 5), date(2024, 5, 1)));
        // end before start, start inside June
        assert!(june.overlaps(date(2024, 6, 15), date(2024, 5, 1)));
    }

    #[test]
    fn test_filters_exclude_missing_dates() {
        let records = vec![
            Some(date(2000, 1, 10)),
            None,
            Some(date(1995, 3, 2)),
            Some(date(1988, 3, 30)),
            Some(date(1979, 12, 25)),
        ];

        let march = filter_month_of_year(&records, 3, |d| *d).unwrap();
        assert_eq!(march.len(), 2);

        let window = DateWindow::year(2000).unwrap();
        let in_2000 = filter_contains(&records, &window, |d| *d);
        assert_eq!(in_2000, vec![&Some(date(2000, 1, 10))]);
    }

    #[test]
    fn test_filter_month_of_year_rejects_invalid_month() {
        let records: Vec<Option<NaiveDate>> = vec![None];
        assert!(filter_month_of_year(&records, 0, |d| *d).is_err());
        assert!(filter_month_of_year(&records, 13, |d| *d).is_err());
    }

    #[test]
    fn test_filter_overlapping_counts_each_record_once() {
        let spans = vec![
            (date(2024, 5, 20), date(2024, 7, 10)),
            (date(2024, 6, 10), date(2024, 6, 20)),
            (date(2024, 8, 1), date(2024, 8, 15)),
        ];
        let june = DateWindow::month(2024, 6).unwrap();

        let matched = filter_overlapping(&spans, &june, |s| Some(*s));

        assert_eq!(matched.len(), 2);
    }
}
