//! Bill command: settle everything billable into a history record.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};

use tally_core::{BillOutcome, SessionLedger};

use super::util::format_money;

pub fn run<W: Write>(
    writer: &mut W,
    ledger: &mut SessionLedger,
    currency: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    match ledger.bill(now) {
        BillOutcome::Billed(record) => {
            writeln!(
                writer,
                "Billed {}. Running stations keep running; their windows restart now.",
                format_money(currency, record.amount)
            )?;
        }
        BillOutcome::NothingToBill => {
            writeln!(writer, "Nothing to bill.")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::Status;

    #[test]
    fn bill_reports_amount_and_leaves_stations_running() {
        let mut ledger = SessionLedger::default();
        let id = ledger.create_stopwatch(Some("sw".into()));
        ledger.start(&id);
        ledger.tick_all(300);

        let mut out = Vec::new();
        run(&mut out, &mut ledger, "$", Utc::now()).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("Billed $25.00"), "unexpected output: {out}");
        assert_eq!(ledger.stopwatches()[0].status, Status::Running);
        assert_eq!(ledger.billing_history().len(), 1);
    }

    #[test]
    fn empty_ledger_reports_nothing_to_bill() {
        let mut ledger = SessionLedger::default();
        let mut out = Vec::new();
        run(&mut out, &mut ledger, "$", Utc::now()).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Nothing to bill."));
        assert!(ledger.billing_history().is_empty());
    }
}
