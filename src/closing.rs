//! Annual closing: yearly profit breakdown and the mandatory listing of
//! domestic VAT-registered clients billed above the statutory threshold.

use std::collections::BTreeMap;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema::{validate_invoices, validate_transactions, Invoice, Transaction};
use crate::utils::year_bounds;

/// VAT number prefix identifying domestic (Belgian) clients.
pub const DOMESTIC_VAT_PREFIX: &str = "BE";

/// Statutory ex-VAT threshold for the client listing. Strictly greater
/// than: a client billed exactly 250.00 is not listed.
pub const CLIENT_LISTING_THRESHOLD: f64 = 250.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientVatEntry {
    pub client_vat_number: String,
    pub client_name: String,
    pub total_ex_vat: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnualClosing {
    pub year: i32,
    pub revenues: f64,
    pub expenses: f64,
    pub net_profit: f64,
    /// Expense totals grouped by category token, ordered by category.
    pub expenses_by_category: BTreeMap<String, f64>,
    /// Domestic clients billed strictly more than the threshold, ordered
    /// by VAT number.
    pub client_vat_listing: Vec<ClientVatEntry>,
}

pub fn compute_year(
    transactions: &[Transaction],
    invoices: &[Invoice],
    year: i32,
) -> Result<AnnualClosing> {
    validate_transactions(transactions)?;
    validate_invoices(invoices)?;
    let (start, end) = year_bounds(year)?;

    let in_year: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.date >= start && t.date <= end)
        .collect();

    let revenues: f64 = in_year
        .iter()
        .filter(|t| t.is_revenue())
        .map(|t| t.amount_ex_vat)
        .sum();
    let expenses: f64 = in_year
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.amount_ex_vat)
        .sum();

    let mut expenses_by_category: BTreeMap<String, f64> = BTreeMap::new();
    for transaction in in_year.iter().filter(|t| t.is_expense()) {
        *expenses_by_category
            .entry(transaction.category().to_string())
            .or_insert(0.0) += transaction.amount_ex_vat;
    }

    let client_vat_listing = client_listing(invoices, start, end);

    info!(
        "Annual closing {}: {} listed client(s), net profit {:.2}",
        year,
        client_vat_listing.len(),
        revenues - expenses
    );

    Ok(AnnualClosing {
        year,
        revenues,
        expenses,
        net_profit: revenues - expenses,
        expenses_by_category,
        client_vat_listing,
    })
}

fn client_listing(
    invoices: &[Invoice],
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
) -> Vec<ClientVatEntry> {
    let mut by_vat_number: BTreeMap<String, ClientVatEntry> = BTreeMap::new();

    for invoice in invoices {
        if invoice.issue_date < start || invoice.issue_date > end {
            continue;
        }
        if !invoice.client_vat_number.starts_with(DOMESTIC_VAT_PREFIX) {
            continue;
        }

        by_vat_number
            .entry(invoice.client_vat_number.clone())
            .and_modify(|entry| entry.total_ex_vat += invoice.amount_ex_vat)
            .or_insert_with(|| ClientVatEntry {
                client_vat_number: invoice.client_vat_number.clone(),
                client_name: invoice.client_name.clone(),
                total_ex_vat: invoice.amount_ex_vat,
            });
    }

    by_vat_number
        .into_values()
        .filter(|entry| entry.total_ex_vat > CLIENT_LISTING_THRESHOLD)
        .collect()
}
