//! Invoice number sequencing: `INV-YYYY-NNNN`, assigned once at creation
//! and never reused.

use crate::schema::Invoice;

/// Parses the sequence part of an `INV-YYYY-NNNN` number. Numbers in any
/// other shape are ignored by the sequencer.
fn parse_sequence(invoice_number: &str) -> Option<u32> {
    let rest = invoice_number.strip_prefix("INV-")?;
    let (year, sequence) = rest.split_once('-')?;
    if year.len() != 4 || year.parse::<u32>().is_err() {
        return None;
    }
    sequence.parse().ok()
}

/// Next invoice number for the given year: the highest sequence seen so
/// far plus one, starting at 1 for an empty or unparseable history. The
/// sequence is global, not per year, so numbers stay unique across a year
/// rollover.
pub fn next_invoice_number(invoices: &[Invoice], year: i32) -> String {
    let next = invoices
        .iter()
        .filter_map(|i| parse_sequence(&i.invoice_number))
        .max()
        .map_or(1, |highest| highest + 1);

    format!("INV-{}-{:04}", year, next)
}
