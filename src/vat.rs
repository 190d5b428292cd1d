//! Quarterly VAT report: VAT collected on sales vs. VAT deductible on
//! purchases, and the resulting balance for the declaration.

use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema::{validate_transactions, Transaction};
use crate::utils::quarter_bounds;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VatReport {
    pub year: i32,
    pub quarter: u32,
    /// VAT collected on revenue transactions (grid 49 of the return).
    pub vat_on_sales: f64,
    /// Deductible VAT on expense transactions (grid 59).
    pub vat_on_purchases: f64,
    /// Positive: owed to the authority (grid 71). Negative: refund (grid 72).
    pub balance: f64,
}

impl VatReport {
    pub fn is_owed(&self) -> bool {
        self.balance >= 0.0
    }
}

pub fn compute_quarter(
    transactions: &[Transaction],
    year: i32,
    quarter: u32,
) -> Result<VatReport> {
    validate_transactions(transactions)?;
    let (start, end) = quarter_bounds(year, quarter)?;

    let in_period = |t: &&Transaction| t.date >= start && t.date <= end;

    let vat_on_sales: f64 = transactions
        .iter()
        .filter(|t| t.is_revenue())
        .filter(in_period)
        .map(|t| t.vat_amount)
        .sum();
    let vat_on_purchases: f64 = transactions
        .iter()
        .filter(|t| t.is_expense())
        .filter(in_period)
        .map(|t| t.vat_amount)
        .sum();

    debug!(
        "VAT {}-Q{}: sales {:.2}, purchases {:.2}",
        year, quarter, vat_on_sales, vat_on_purchases
    );

    Ok(VatReport {
        year,
        quarter,
        vat_on_sales,
        vat_on_purchases,
        balance: vat_on_sales - vat_on_purchases,
    })
}

/// Filing deadline of the Belgian quarterly VAT return: the 20th of the
/// month following the quarter (Q4 rolls over to 20 January).
pub fn declaration_deadline(year: i32, quarter: u32) -> Result<NaiveDate> {
    let (_, end) = quarter_bounds(year, quarter)?;

    let (deadline_year, deadline_month) = if end.month() == 12 {
        (year + 1, 1)
    } else {
        (year, end.month() + 1)
    };

    NaiveDate::from_ymd_opt(deadline_year, deadline_month, 20).ok_or_else(|| {
        crate::error::EngineError::DateError(format!(
            "Invalid deadline: {}-{}-20",
            deadline_year, deadline_month
        ))
    })
}
