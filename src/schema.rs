use chrono::{NaiveDate, NaiveDateTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::utils::ensure_finite;

/// Tolerance for the `total = ex-VAT + VAT` reconciliation, one cent.
const RECONCILE_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[schemars(description = "Money earned: rides, freelance work, invoiced services")]
    Revenue,
    #[schemars(description = "Money spent: fuel, subscriptions, maintenance")]
    Expense,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub enum PaymentStatus {
    #[serde(rename = "Payé")]
    Paid,
    #[serde(rename = "Non payé")]
    Unpaid,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Transaction {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    #[schemars(
        description = "Revenue source or expense label. For expenses, the text before a ' - ' separator is the category (e.g. 'Carburant - TotalEnergies')"
    )]
    pub source: String,

    #[schemars(description = "Amount before VAT (HTVA), in EUR")]
    pub amount_ex_vat: f64,

    #[schemars(description = "VAT rate as a percentage, e.g. 21")]
    pub vat_rate: f64,

    pub vat_amount: f64,

    #[schemars(description = "Amount including VAT (TTC); must equal amount_ex_vat + vat_amount")]
    pub total_amount: f64,

    pub date: NaiveDate,

    #[serde(default)]
    #[schemars(description = "Expenses only: whether the expense has actually been paid out")]
    pub payment_status: Option<PaymentStatus>,
}

impl Transaction {
    pub fn is_revenue(&self) -> bool {
        self.kind == TransactionKind::Revenue
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn is_paid_expense(&self) -> bool {
        self.is_expense() && self.payment_status == Some(PaymentStatus::Paid)
    }

    /// Category token of an expense label: the text before the first
    /// `" - "` separator, or the whole label when there is none.
    pub fn category(&self) -> &str {
        match self.source.split_once(" - ") {
            Some((category, _)) => category.trim(),
            None => self.source.trim(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite(self.amount_ex_vat, "transaction", &self.id, "amount_ex_vat")?;
        ensure_finite(self.vat_rate, "transaction", &self.id, "vat_rate")?;
        ensure_finite(self.vat_amount, "transaction", &self.id, "vat_amount")?;
        ensure_finite(self.total_amount, "transaction", &self.id, "total_amount")?;

        if (self.amount_ex_vat + self.vat_amount - self.total_amount).abs() > RECONCILE_TOLERANCE {
            return Err(EngineError::AmountMismatch {
                id: self.id.clone(),
                amount_ex_vat: self.amount_ex_vat,
                vat_amount: self.vat_amount,
                total_amount: self.total_amount,
            });
        }

        Ok(())
    }
}

pub fn validate_transactions(transactions: &[Transaction]) -> Result<()> {
    for transaction in transactions {
        transaction.validate()?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub enum InvoiceStatus {
    #[serde(rename = "Payée")]
    Paid,
    #[serde(rename = "En attente")]
    Pending,
    #[serde(rename = "Impayée")]
    Unpaid,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Invoice {
    pub id: String,

    #[schemars(description = "Sequential number in the form INV-YYYY-NNNN, assigned once at creation")]
    pub invoice_number: String,

    pub client_name: String,

    #[schemars(description = "Client VAT number; domestic clients start with 'BE'")]
    pub client_vat_number: String,

    pub amount_ex_vat: f64,
    pub vat_rate: f64,
    pub total_amount: f64,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
}

impl Invoice {
    pub fn validate(&self) -> Result<()> {
        ensure_finite(self.amount_ex_vat, "invoice", &self.id, "amount_ex_vat")?;
        ensure_finite(self.vat_rate, "invoice", &self.id, "vat_rate")?;
        ensure_finite(self.total_amount, "invoice", &self.id, "total_amount")?;
        Ok(())
    }
}

pub fn validate_invoices(invoices: &[Invoice]) -> Result<()> {
    for invoice in invoices {
        invoice.validate()?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ThresholdSetting {
    pub enabled: bool,
    #[schemars(description = "Balance (EUR) under which the alert fires")]
    pub threshold: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct WindowSetting {
    pub enabled: bool,
    #[schemars(description = "Number of days defining the rule's window")]
    pub days: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct AlertSettings {
    pub low_balance: ThresholdSetting,
    pub overdue_invoice: WindowSetting,
    pub upcoming_invoice: WindowSetting,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            low_balance: ThresholdSetting {
                enabled: true,
                threshold: 500.0,
            },
            overdue_invoice: WindowSetting {
                enabled: true,
                days: 1,
            },
            upcoming_invoice: WindowSetting {
                enabled: true,
                days: 7,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UserProfile {
    pub name: String,
    pub company_name: String,
    pub vat_number: String,
    #[serde(default)]
    pub alert_settings: AlertSettings,
}

/// Application page a notification links to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Dashboard,
    Revenues,
    Expenses,
    Vat,
    Invoicing,
    Reports,
    Profile,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Alert,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct Notification {
    /// Deterministic id: the same underlying condition always regenerates
    /// the same id, which is what makes merge-by-id safe.
    pub id: String,
    pub message: String,
    pub category: NotificationCategory,
    pub read: bool,
    pub link: Page,
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction(id: &str, ex_vat: f64, vat: f64, total: f64) -> Transaction {
        Transaction {
            id: id.to_string(),
            kind: TransactionKind::Expense,
            source: "Carburant - TotalEnergies".to_string(),
            amount_ex_vat: ex_vat,
            vat_rate: 21.0,
            vat_amount: vat,
            total_amount: total,
            date: NaiveDate::from_ymd_opt(2024, 7, 17).unwrap(),
            payment_status: Some(PaymentStatus::Paid),
        }
    }

    #[test]
    fn test_validate_accepts_reconciled_amounts() {
        assert!(transaction("T3", 50.0, 10.5, 60.5).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let err = transaction("T3", f64::NAN, 10.5, 60.5).validate();
        assert!(matches!(
            err,
            Err(EngineError::NonFiniteAmount { field: "amount_ex_vat", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_mismatched_total() {
        let err = transaction("T3", 50.0, 10.5, 70.0).validate();
        assert!(matches!(err, Err(EngineError::AmountMismatch { .. })));
    }

    #[test]
    fn test_expense_category_token() {
        let t = transaction("T3", 50.0, 10.5, 60.5);
        assert_eq!(t.category(), "Carburant");

        let mut plain = t.clone();
        plain.source = "Loyer".to_string();
        assert_eq!(plain.category(), "Loyer");
    }

    #[test]
    fn test_status_serialization_uses_french_labels() {
        let json = serde_json::to_string(&InvoiceStatus::Pending).unwrap();
        assert_eq!(json, "\"En attente\"");

        let parsed: InvoiceStatus = serde_json::from_str("\"Impayée\"").unwrap();
        assert_eq!(parsed, InvoiceStatus::Unpaid);
    }
}
