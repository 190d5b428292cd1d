//! # Compta Engine
//!
//! Financial obligation and alert engine for Belgian self-employed
//! bookkeeping. The surrounding application owns the ledger (transactions
//! and invoices) and the user profile; this crate holds the pure
//! computations behind it:
//!
//! - **Alerts**: overdue invoices, invoices coming due, low balance —
//!   derived from a snapshot and merged into the previous notification set
//!   without losing read state.
//! - **VAT**: quarterly sales/purchases/balance report and the declaration
//!   deadline.
//! - **Social contributions**: quarterly payment suggestion from the
//!   annualized profit trend.
//! - **Advance tax**: the single quarterly prepayment that cancels the
//!   year's surcharge, for each quarter.
//! - **Annual closing**: yearly profit breakdown and the client VAT
//!   listing.
//!
//! Everything is synchronous and side-effect-free over immutable snapshot
//! arguments; the only state carried between invocations is the previous
//! notification list, owned by the caller.
//!
//! ## Example
//!
//! ```rust,ignore
//! use compta_engine::*;
//! use chrono::Utc;
//!
//! let now = Utc::now().naive_utc();
//! let notifications = refresh_notifications(
//!     &transactions,
//!     &invoices,
//!     &profile.alert_settings,
//!     &previous_notifications,
//!     now,
//! )?;
//! ```

pub mod advance_tax;
pub mod alerts;
pub mod closing;
pub mod contributions;
pub mod error;
pub mod invoicing;
pub mod notifications;
pub mod schema;
pub mod summary;
pub mod utils;
pub mod vat;

pub use advance_tax::{compute_schedule, AdvanceTaxSchedule, Quarter};
pub use alerts::derive_triggers;
pub use closing::{compute_year, AnnualClosing, ClientVatEntry};
pub use contributions::{suggest, ContributionAdvice, ContributionSuggestion};
pub use error::{EngineError, Result};
pub use invoicing::next_invoice_number;
pub use notifications::{merge, NotificationSet};
pub use schema::*;
pub use summary::{compute_summary, DashboardSummary};
pub use vat::{compute_quarter, declaration_deadline, VatReport};

use chrono::NaiveDateTime;
use log::info;

/// Full notification pipeline: derive the active triggers from the
/// snapshot, then merge them into the previous notification set. Call this
/// whenever the ledger or the alert settings change.
pub fn refresh_notifications(
    transactions: &[Transaction],
    invoices: &[Invoice],
    settings: &AlertSettings,
    previous: &[Notification],
    now: NaiveDateTime,
) -> Result<Vec<Notification>> {
    let triggers = derive_triggers(transactions, invoices, settings, now)?;

    info!(
        "Refreshing notifications: {} previous, {} active trigger(s)",
        previous.len(),
        triggers.len()
    );

    Ok(merge(previous, &triggers))
}
