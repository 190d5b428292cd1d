use chrono::{NaiveDate, NaiveDateTime};
use compta_engine::*;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(hour, 0, 0).unwrap()
}

fn revenue(id: &str, source: &str, ex_vat: f64, vat: f64, d: NaiveDate) -> Transaction {
    Transaction {
        id: id.to_string(),
        kind: TransactionKind::Revenue,
        source: source.to_string(),
        amount_ex_vat: ex_vat,
        vat_rate: if ex_vat > 0.0 { vat / ex_vat * 100.0 } else { 0.0 },
        vat_amount: vat,
        total_amount: ex_vat + vat,
        date: d,
        payment_status: None,
    }
}

fn expense(
    id: &str,
    source: &str,
    ex_vat: f64,
    vat: f64,
    d: NaiveDate,
    status: PaymentStatus,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        kind: TransactionKind::Expense,
        source: source.to_string(),
        amount_ex_vat: ex_vat,
        vat_rate: 21.0,
        vat_amount: vat,
        total_amount: ex_vat + vat,
        date: d,
        payment_status: Some(status),
    }
}

fn invoice(
    id: &str,
    number: &str,
    client: &str,
    vat_number: &str,
    ex_vat: f64,
    issued: NaiveDate,
    due: NaiveDate,
    status: InvoiceStatus,
) -> Invoice {
    Invoice {
        id: id.to_string(),
        invoice_number: number.to_string(),
        client_name: client.to_string(),
        client_vat_number: vat_number.to_string(),
        amount_ex_vat: ex_vat,
        vat_rate: 21.0,
        total_amount: ex_vat * 1.21,
        issue_date: issued,
        due_date: due,
        status,
    }
}

/// Ledger of a self-employed driver over summer 2024.
fn sample_ledger() -> (Vec<Transaction>, Vec<Invoice>) {
    let transactions = vec![
        revenue("T1", "Uber", 120.50, 7.23, date(2024, 7, 15)),
        revenue("T2", "Bolt", 85.0, 5.10, date(2024, 7, 16)),
        expense(
            "T3",
            "Carburant - TotalEnergies",
            50.0,
            10.50,
            date(2024, 7, 17),
            PaymentStatus::Paid,
        ),
        revenue("T4", "Freelance Project", 500.0, 105.0, date(2024, 7, 18)),
        expense(
            "T5",
            "Abonnement Téléphone",
            25.0,
            5.25,
            date(2024, 7, 20),
            PaymentStatus::Paid,
        ),
        expense(
            "T6",
            "Entretien voiture",
            150.0,
            31.50,
            date(2024, 8, 2),
            PaymentStatus::Unpaid,
        ),
        revenue("T7", "Uber", 150.75, 9.05, date(2024, 8, 5)),
    ];

    let invoices = vec![
        invoice(
            "I1",
            "INV-2024-0001",
            "Client A",
            "BE 0987.654.321",
            1500.0,
            date(2024, 7, 10),
            date(2024, 7, 25),
            InvoiceStatus::Paid,
        ),
        invoice(
            "I2",
            "INV-2024-0002",
            "Client B",
            "BE 0123.987.456",
            750.0,
            date(2024, 7, 20),
            date(2024, 8, 5),
            InvoiceStatus::Pending,
        ),
        invoice(
            "I3",
            "INV-2024-0003",
            "Client C",
            "BE 0456.123.789",
            1200.0,
            date(2024, 6, 25),
            date(2024, 7, 10),
            InvoiceStatus::Unpaid,
        ),
    ];

    (transactions, invoices)
}

#[test]
fn test_notification_lifecycle_over_several_days() {
    let (transactions, invoices) = sample_ledger();
    let settings = AlertSettings::default();

    // 2024-08-10: I3 is 31 days overdue, I2 (Pending) is 5 days overdue.
    let day_one = refresh_notifications(
        &transactions,
        &invoices,
        &settings,
        &[],
        at(2024, 8, 10, 9),
    )
    .unwrap();

    let ids: Vec<&str> = day_one.iter().map(|n| n.id.as_str()).collect();
    assert!(ids.contains(&"overdue-I3"));
    assert!(ids.contains(&"overdue-I2"));

    let i3 = day_one.iter().find(|n| n.id == "overdue-I3").unwrap();
    assert!(i3.message.contains("en retard de 31 jours."));

    // Both overdue timestamps land on today's midnight, so the tie breaks
    // by id ascending.
    assert_eq!(day_one[0].id, "overdue-I2");

    // The user reads I3, then client C pays the next day.
    let mut set = NotificationSet::from_notifications(&day_one);
    set.mark_read("overdue-I3");
    assert_eq!(set.unread_count(), day_one.len() - 1);

    let mut invoices_after = invoices.clone();
    invoices_after[2].status = InvoiceStatus::Paid;

    let day_two = refresh_notifications(
        &transactions,
        &invoices_after,
        &settings,
        &set.sorted(),
        at(2024, 8, 11, 9),
    )
    .unwrap();

    assert!(
        !day_two.iter().any(|n| n.id == "overdue-I3"),
        "paid invoice alert must be pruned"
    );
    let i2 = day_two.iter().find(|n| n.id == "overdue-I2").unwrap();
    assert!(i2.message.contains("en retard de 6 jours."));
}

#[test]
fn test_low_balance_fires_against_raised_threshold() {
    let (transactions, invoices) = sample_ledger();

    // Cash position: 982.63 of revenue in, 90.75 of paid expenses out.
    let mut settings = AlertSettings::default();
    settings.low_balance.threshold = 1000.0;
    settings.overdue_invoice.enabled = false;
    settings.upcoming_invoice.enabled = false;

    let now = at(2024, 8, 10, 9);
    let notifications =
        refresh_notifications(&transactions, &invoices, &settings, &[], now).unwrap();

    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].id.starts_with("low-balance-"));

    // Same day, later run: same id, still one alert after a merge.
    let evening =
        refresh_notifications(&transactions, &invoices, &settings, &notifications, at(2024, 8, 10, 22))
            .unwrap();
    assert_eq!(evening.len(), 1);
    assert_eq!(evening[0].id, notifications[0].id);
}

#[test]
fn test_quarterly_vat_report_for_q3() {
    let (transactions, _) = sample_ledger();

    let report = compute_quarter(&transactions, 2024, 3).unwrap();
    assert!((report.vat_on_sales - 126.38).abs() < 1e-9);
    assert!((report.vat_on_purchases - 47.25).abs() < 1e-9);
    assert!((report.balance - (report.vat_on_sales - report.vat_on_purchases)).abs() < 1e-9);
    assert!(report.is_owed());

    assert_eq!(
        declaration_deadline(2024, 3).unwrap(),
        date(2024, 10, 20)
    );
}

#[test]
fn test_contribution_estimate_feeds_advance_tax_schedule() {
    let (transactions, _) = sample_ledger();

    let suggestion = suggest(&transactions, 200.0, date(2024, 9, 30)).unwrap();
    assert!(suggestion.estimated_annual_income > 0.0);

    let schedule = compute_schedule(suggestion.estimated_annual_income).unwrap();
    assert!(schedule.payment_required());

    let p = schedule.payment_by_quarter;
    assert!(p[0] < p[1] && p[1] < p[2] && p[2] < p[3]);
    for quarter in Quarter::ALL {
        let credit = schedule.payment(quarter) * quarter.bonus_rate();
        assert!((credit - schedule.total_surcharge).abs() < 1e-9);
    }
}

#[test]
fn test_annual_closing_for_2024() {
    let (transactions, invoices) = sample_ledger();

    let closing = compute_year(&transactions, &invoices, 2024).unwrap();
    assert!((closing.revenues - 856.25).abs() < 1e-9);
    assert!((closing.expenses - 225.0).abs() < 1e-9);
    assert!((closing.net_profit - 631.25).abs() < 1e-9);

    assert!((closing.expenses_by_category["Carburant"] - 50.0).abs() < 1e-9);
    assert!((closing.expenses_by_category["Abonnement Téléphone"] - 25.0).abs() < 1e-9);

    // All three clients are Belgian and billed above 250 ex-VAT.
    assert_eq!(closing.client_vat_listing.len(), 3);
    let totals: f64 = closing
        .client_vat_listing
        .iter()
        .map(|e| e.total_ex_vat)
        .sum();
    assert!((totals - 3450.0).abs() < 1e-9);
}

#[test]
fn test_dashboard_summary_matches_ledger() {
    let (transactions, _) = sample_ledger();

    let summary = compute_summary(&transactions).unwrap();
    assert!((summary.total_revenues - 856.25).abs() < 1e-9);
    assert!((summary.total_expenses - 225.0).abs() < 1e-9);
    assert!((summary.net_balance - 631.25).abs() < 1e-9);
    assert!((summary.vat_balance - (126.38 - 47.25)).abs() < 1e-9);
}

#[test]
fn test_next_invoice_number_continues_sequence() {
    let (_, invoices) = sample_ledger();
    assert_eq!(next_invoice_number(&invoices, 2024), "INV-2024-0004");
}

#[test]
fn test_malformed_ledger_is_rejected_everywhere() {
    let (mut transactions, invoices) = sample_ledger();
    transactions[0].amount_ex_vat = f64::NAN;
    transactions[0].total_amount = f64::NAN;

    let now = at(2024, 8, 10, 9);
    assert!(refresh_notifications(&transactions, &invoices, &AlertSettings::default(), &[], now)
        .is_err());
    assert!(compute_quarter(&transactions, 2024, 3).is_err());
    assert!(suggest(&transactions, 0.0, date(2024, 9, 30)).is_err());
    assert!(compute_year(&transactions, &invoices, 2024).is_err());
    assert!(compute_summary(&transactions).is_err());
}

#[test]
fn test_snapshot_round_trips_through_json() {
    let (transactions, invoices) = sample_ledger();

    let json = serde_json::to_string(&transactions).unwrap();
    let parsed: Vec<Transaction> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.len(), transactions.len());

    let json = serde_json::to_string(&invoices[0]).unwrap();
    assert!(json.contains("\"Payée\""));
}
