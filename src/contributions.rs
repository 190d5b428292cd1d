//! Social contribution sizing: annualizes the profit trend observed so far
//! and compares the resulting quarterly amount to what the user currently
//! pays.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema::{validate_transactions, Transaction};
use crate::utils::ensure_finite;

/// Simplified flat contribution rate for self-employed workers.
pub const CONTRIBUTION_RATE: f64 = 0.205;

/// Band (EUR) inside which the current payment counts as aligned, so
/// rounding noise never flips the advice back and forth.
pub const ALIGNMENT_BAND: f64 = 10.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "amount")]
pub enum ContributionAdvice {
    /// No positive profit yet, nothing to annualize.
    NoData,
    /// Raise the quarterly payment by this amount.
    Increase(f64),
    /// Lower the quarterly payment by this amount.
    Decrease(f64),
    WellAligned,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ContributionSuggestion {
    pub estimated_annual_income: f64,
    pub suggested_quarterly: f64,
    pub advice: ContributionAdvice,
}

/// Forward-looking trend estimate over the whole ledger, deliberately
/// unfiltered by period: the annualization extrapolates from everything
/// recorded since the earliest transaction.
pub fn suggest(
    transactions: &[Transaction],
    current_quarterly_payment: f64,
    today: NaiveDate,
) -> Result<ContributionSuggestion> {
    validate_transactions(transactions)?;
    ensure_finite(
        current_quarterly_payment,
        "settings",
        "profile",
        "current_quarterly_payment",
    )?;

    let revenues: f64 = transactions
        .iter()
        .filter(|t| t.is_revenue())
        .map(|t| t.amount_ex_vat)
        .sum();
    let expenses: f64 = transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.amount_ex_vat)
        .sum();
    let profit_so_far = revenues - expenses;

    if profit_so_far <= 0.0 {
        return Ok(ContributionSuggestion {
            estimated_annual_income: 0.0,
            suggested_quarterly: 0.0,
            advice: ContributionAdvice::NoData,
        });
    }

    let earliest = transactions
        .iter()
        .map(|t| t.date)
        .min()
        .unwrap_or(today);
    let days_passed = (today - earliest).num_days().max(1);

    let estimated_annual_income = profit_so_far / days_passed as f64 * 365.0;
    let suggested_quarterly = estimated_annual_income * CONTRIBUTION_RATE / 4.0;

    debug!(
        "Contribution estimate: profit {:.2} over {} day(s), annualized {:.2}",
        profit_so_far, days_passed, estimated_annual_income
    );

    let diff = suggested_quarterly - current_quarterly_payment;
    let advice = if diff > ALIGNMENT_BAND {
        ContributionAdvice::Increase(diff)
    } else if diff < -ALIGNMENT_BAND {
        ContributionAdvice::Decrease(-diff)
    } else {
        ContributionAdvice::WellAligned
    };

    Ok(ContributionSuggestion {
        estimated_annual_income,
        suggested_quarterly,
        advice,
    })
}
