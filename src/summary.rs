//! Whole-ledger totals backing the four dashboard cards.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema::{validate_transactions, Transaction};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    pub total_revenues: f64,
    pub total_expenses: f64,
    pub net_balance: f64,
    /// VAT collected minus VAT deductible, over the whole ledger.
    pub vat_balance: f64,
}

pub fn compute_summary(transactions: &[Transaction]) -> Result<DashboardSummary> {
    validate_transactions(transactions)?;

    let mut total_revenues = 0.0;
    let mut total_expenses = 0.0;
    let mut vat_on_sales = 0.0;
    let mut vat_on_purchases = 0.0;

    for transaction in transactions {
        if transaction.is_revenue() {
            total_revenues += transaction.amount_ex_vat;
            vat_on_sales += transaction.vat_amount;
        } else {
            total_expenses += transaction.amount_ex_vat;
            vat_on_purchases += transaction.vat_amount;
        }
    }

    Ok(DashboardSummary {
        total_revenues,
        total_expenses,
        net_balance: total_revenues - total_expenses,
        vat_balance: vat_on_sales - vat_on_purchases,
    })
}
