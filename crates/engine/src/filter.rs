//! Validation of caller supplied query parameters.
//!
//! Raw parameters arrive as loosely typed values; everything is checked here
//! before a single row is read, and a malformed value is reported with
//! [`EngineError::InvalidFilter`] instead of being passed to the store.

use crate::{Category, DateWindow, EngineError, ResultEngine, TransactionKind, period};

/// Default number of buckets returned by the monthly flow report.
pub const DEFAULT_FLOW_MONTHS: usize = 6;
/// Upper bound for the monthly flow window (ten years).
pub const MAX_FLOW_MONTHS: usize = 120;

/// Unvalidated filters for transaction listings and reports.
#[derive(Clone, Debug, Default)]
pub struct TransactionQuery {
    pub month: Option<i64>,
    pub year: Option<i64>,
    pub category: Option<String>,
    /// `income` or `expense`.
    pub kind: Option<String>,
}

/// Validated transaction filter. The owner is not part of it: every store
/// call takes the owner explicitly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactionFilter {
    pub window: Option<DateWindow>,
    pub category: Option<Category>,
    pub kind: Option<TransactionKind>,
}

impl TransactionQuery {
    pub fn validate(self) -> ResultEngine<TransactionFilter> {
        let window = match (self.month, self.year) {
            (Some(month), Some(year)) => {
                Some(DateWindow::month(validate_year(year)?, validate_month(month)?)?)
            }
            (None, Some(year)) => Some(DateWindow::year(validate_year(year)?)?),
            (Some(_), None) => {
                return Err(EngineError::InvalidFilter(
                    "month requires a year".to_string(),
                ));
            }
            (None, None) => None,
        };
        let category = self.category.as_deref().map(validate_category).transpose()?;
        let kind = self.kind.as_deref().map(validate_kind).transpose()?;

        Ok(TransactionFilter {
            window,
            category,
            kind,
        })
    }
}

/// Unvalidated `(month, year)` pair; missing parts default to the current
/// calendar month.
#[derive(Clone, Copy, Debug, Default)]
pub struct PeriodQuery {
    pub month: Option<i64>,
    pub year: Option<i64>,
}

impl PeriodQuery {
    pub fn new(month: Option<i64>, year: Option<i64>) -> Self {
        Self { month, year }
    }

    /// Returns `(year, month)`.
    pub fn resolve(self) -> ResultEngine<(i32, u32)> {
        let (current_year, current_month) = period::current_month();
        let month = self.month.map(validate_month).transpose()?;
        let year = self.year.map(validate_year).transpose()?;
        Ok((year.unwrap_or(current_year), month.unwrap_or(current_month)))
    }
}

pub fn validate_month(month: i64) -> ResultEngine<u32> {
    if (1..=12).contains(&month) {
        return Ok(month as u32);
    }
    Err(EngineError::InvalidFilter(format!(
        "month must be between 1 and 12, got {month}"
    )))
}

pub fn validate_year(year: i64) -> ResultEngine<i32> {
    if (1000..=9999).contains(&year) {
        return Ok(year as i32);
    }
    Err(EngineError::InvalidFilter(format!(
        "year must be a 4-digit number, got {year}"
    )))
}

pub fn validate_category(category: &str) -> ResultEngine<Category> {
    if category.trim().is_empty() {
        return Err(EngineError::InvalidFilter(
            "category must not be empty".to_string(),
        ));
    }
    Ok(Category::from(category))
}

pub fn validate_kind(kind: &str) -> ResultEngine<TransactionKind> {
    TransactionKind::try_from(kind).map_err(|_| {
        EngineError::InvalidFilter(format!("type must be income or expense, got '{kind}'"))
    })
}

/// Validates the monthly flow window size.
pub fn validate_flow_months(months: Option<i64>) -> ResultEngine<usize> {
    match months {
        None => Ok(DEFAULT_FLOW_MONTHS),
        Some(n) if n >= 1 && n <= MAX_FLOW_MONTHS as i64 => Ok(n as usize),
        Some(n) => Err(EngineError::InvalidFilter(format!(
            "months must be between 1 and {MAX_FLOW_MONTHS}, got {n}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_and_year_build_a_month_window() {
        let filter = TransactionQuery {
            month: Some(1),
            year: Some(2025),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(filter.window, Some(DateWindow::month(2025, 1).unwrap()));
        assert_eq!(filter.category, None);
    }

    #[test]
    fn year_alone_builds_a_year_window() {
        let filter = TransactionQuery {
            year: Some(2024),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(filter.window, Some(DateWindow::year(2024).unwrap()));
    }

    #[test]
    fn category_only_filters_by_exact_label() {
        let filter = TransactionQuery {
            category: Some("Rent".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(filter.window, None);
        assert_eq!(filter.category, Some(Category::from("Rent")));
    }

    #[test]
    fn malformed_filters_are_rejected() {
        let cases = [
            TransactionQuery {
                month: Some(0),
                year: Some(2025),
                ..Default::default()
            },
            TransactionQuery {
                month: Some(13),
                year: Some(2025),
                ..Default::default()
            },
            TransactionQuery {
                month: Some(3),
                year: Some(25),
                ..Default::default()
            },
            TransactionQuery {
                month: Some(3),
                ..Default::default()
            },
            TransactionQuery {
                category: Some("   ".to_string()),
                ..Default::default()
            },
            TransactionQuery {
                kind: Some("transfer".to_string()),
                ..Default::default()
            },
        ];
        for query in cases {
            assert!(matches!(
                query.validate(),
                Err(EngineError::InvalidFilter(_))
            ));
        }
    }

    #[test]
    fn flow_months_defaults_and_bounds() {
        assert_eq!(validate_flow_months(None).unwrap(), DEFAULT_FLOW_MONTHS);
        assert_eq!(validate_flow_months(Some(12)).unwrap(), 12);
        assert!(validate_flow_months(Some(0)).is_err());
        assert!(validate_flow_months(Some(-3)).is_err());
        assert!(validate_flow_months(Some(121)).is_err());
    }

    #[test]
    fn period_defaults_to_current_month() {
        let (year, month) = PeriodQuery::default().resolve().unwrap();
        assert_eq!((year, month), period::current_month());

        let (year, month) = PeriodQuery::new(Some(2), Some(2023)).resolve().unwrap();
        assert_eq!((year, month), (2023, 2));
    }
}
