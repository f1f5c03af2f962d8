//! Calendar windows used to scope transaction queries.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

use crate::{EngineError, ResultEngine};

/// A half-open UTC instant range `[start, end)`.
///
/// `end` is the first instant of the following period, so the range contains
/// every instant up to and including the last instant of the period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// Window covering one calendar month.
    pub fn month(year: i32, month: u32) -> ResultEngine<Self> {
        let start = first_instant(year, month)?;
        let end = if month == 12 {
            first_instant(year + 1, 1)?
        } else {
            first_instant(year, month + 1)?
        };
        Ok(Self { start, end })
    }

    /// Window covering one calendar year.
    pub fn year(year: i32) -> ResultEngine<Self> {
        Ok(Self {
            start: first_instant(year, 1)?,
            end: first_instant(year + 1, 1)?,
        })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

fn first_instant(year: i32, month: u32) -> ResultEngine<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::InvalidFilter(format!("invalid period {year}-{month:02}")))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| EngineError::InvalidFilter(format!("invalid period {year}-{month:02}")))?;
    Ok(Utc.from_utc_datetime(&midnight))
}

/// Current `(year, month)` in UTC.
pub fn current_month() -> (i32, u32) {
    let now = Utc::now();
    (now.year(), now.month())
}
