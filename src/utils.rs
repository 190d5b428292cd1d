use crate::error::{EngineError, Result};
use chrono::{Days, NaiveDate, NaiveDateTime};

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .checked_sub_days(Days::new(1))
        .unwrap()
}

/// Inclusive calendar bounds of a quarter (Q1 = Jan-Mar).
pub fn quarter_bounds(year: i32, quarter: u32) -> Result<(NaiveDate, NaiveDate)> {
    if !(1..=4).contains(&quarter) {
        return Err(EngineError::InvalidQuarter(quarter));
    }

    let first_month = (quarter - 1) * 3 + 1;
    let start = NaiveDate::from_ymd_opt(year, first_month, 1).ok_or_else(|| {
        EngineError::DateError(format!("Invalid quarter start: {}-{}", year, first_month))
    })?;
    let end = last_day_of_month(year, first_month + 2);

    Ok((start, end))
}

/// Inclusive calendar bounds of a year.
pub fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| EngineError::DateError(format!("Invalid year: {}", year)))?;
    let end = last_day_of_month(year, 12);

    Ok((start, end))
}

/// Unix timestamp (seconds) of the given calendar day at midnight.
pub fn midnight_epoch(date: NaiveDate) -> i64 {
    midnight(date).and_utc().timestamp()
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    // 00:00:00 always exists for a NaiveDate
    date.and_hms_opt(0, 0, 0).unwrap()
}

/// Rejects NaN/infinite monetary values before they reach a sum.
pub fn ensure_finite(value: f64, entity: &'static str, id: &str, field: &'static str) -> Result<()> {
    if !value.is_finite() {
        return Err(EngineError::NonFiniteAmount {
            entity,
            id: id.to_string(),
            field,
        });
    }
    Ok(())
}
