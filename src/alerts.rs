//! Derives the currently active alert triggers from a ledger snapshot.
//!
//! Each rule runs independently over the full snapshot and emits a
//! notification with a deterministic id, so rerunning the derivation with
//! identical inputs and the same `now` reproduces the exact same set.

use chrono::{Duration, NaiveDateTime};
use log::debug;

use crate::error::Result;
use crate::schema::{
    validate_invoices, validate_transactions, AlertSettings, Invoice, InvoiceStatus, Notification,
    NotificationCategory, Page, Transaction,
};
use crate::utils::{midnight, midnight_epoch};

pub const OVERDUE_PREFIX: &str = "overdue-";
pub const UPCOMING_PREFIX: &str = "upcoming-";
pub const LOW_BALANCE_PREFIX: &str = "low-balance-";

/// Day-difference logic is midnight-normalized: only the calendar day of
/// `now` matters, never its time of day.
pub fn derive_triggers(
    transactions: &[Transaction],
    invoices: &[Invoice],
    settings: &AlertSettings,
    now: NaiveDateTime,
) -> Result<Vec<Notification>> {
    validate_transactions(transactions)?;
    validate_invoices(invoices)?;

    let mut triggers = Vec::new();

    if settings.overdue_invoice.enabled {
        overdue_triggers(invoices, now, &mut triggers);
    }
    if settings.upcoming_invoice.enabled {
        upcoming_triggers(invoices, settings.upcoming_invoice.days, now, &mut triggers);
    }
    if settings.low_balance.enabled {
        low_balance_trigger(transactions, settings.low_balance.threshold, now, &mut triggers);
    }

    debug!("Derived {} alert trigger(s)", triggers.len());
    Ok(triggers)
}

fn overdue_triggers(invoices: &[Invoice], now: NaiveDateTime, out: &mut Vec<Notification>) {
    let today = now.date();

    for invoice in invoices {
        if invoice.status == InvoiceStatus::Paid {
            continue;
        }

        let diff_days = (today - invoice.due_date).num_days();
        if diff_days <= 0 {
            continue;
        }

        out.push(Notification {
            id: format!("{}{}", OVERDUE_PREFIX, invoice.id),
            message: format!(
                "Facture {} ({}) en retard de {} jours.",
                invoice.invoice_number, invoice.client_name, diff_days
            ),
            category: NotificationCategory::Alert,
            read: false,
            link: Page::Invoicing,
            // Anchored to the due date, not to `now`: the timestamp only
            // moves when diff_days does, which keeps sort order stable
            // across recomputation within the same day.
            created_at: midnight(invoice.due_date) + Duration::days(diff_days),
        });
    }
}

fn upcoming_triggers(
    invoices: &[Invoice],
    window_days: i64,
    now: NaiveDateTime,
    out: &mut Vec<Notification>,
) {
    let today = now.date();

    for invoice in invoices {
        if invoice.status != InvoiceStatus::Pending {
            continue;
        }

        let diff_days = (invoice.due_date - today).num_days();
        if !(0..=window_days).contains(&diff_days) {
            continue;
        }

        out.push(Notification {
            id: format!("{}{}", UPCOMING_PREFIX, invoice.id),
            message: format!(
                "Facture {} ({}) arrive à échéance dans {} jour(s).",
                invoice.invoice_number, invoice.client_name, diff_days
            ),
            category: NotificationCategory::Alert,
            read: false,
            link: Page::Invoicing,
            created_at: now,
        });
    }
}

fn low_balance_trigger(
    transactions: &[Transaction],
    threshold: f64,
    now: NaiveDateTime,
    out: &mut Vec<Notification>,
) {
    let revenues: f64 = transactions
        .iter()
        .filter(|t| t.is_revenue())
        .map(|t| t.total_amount)
        .sum();
    let paid_expenses: f64 = transactions
        .iter()
        .filter(|t| t.is_paid_expense())
        .map(|t| t.total_amount)
        .sum();

    let balance = revenues - paid_expenses;
    if balance >= threshold {
        return;
    }

    let today = now.date();
    out.push(Notification {
        // Keyed by calendar day: at most one low-balance alert can be
        // active on any given day, however often the engine runs.
        id: format!("{}{}", LOW_BALANCE_PREFIX, midnight_epoch(today)),
        message: format!(
            "Votre solde ({:.2} €) est passé sous le seuil d'alerte de {:.2} €.",
            balance, threshold
        ),
        category: NotificationCategory::Alert,
        read: false,
        link: Page::Dashboard,
        created_at: midnight(today),
    });
}
