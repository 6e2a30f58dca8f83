//! Billing history listing and clearing.

use std::io::Write;

use anyhow::Result;

use tally_core::SessionLedger;

use super::util::format_money;

pub fn run<W: Write>(
    writer: &mut W,
    ledger: &mut SessionLedger,
    currency: &str,
    clear: bool,
) -> Result<()> {
    if clear {
        // clap enforces --yes; by this point the caller has confirmed.
        ledger.clear_history();
        writeln!(writer, "Billing history cleared.")?;
        return Ok(());
    }

    if ledger.billing_history().is_empty() {
        writeln!(writer, "No billing history.")?;
        return Ok(());
    }

    // Stored newest-first; displayed the same way.
    for record in ledger.billing_history() {
        writeln!(
            writer,
            "{}  {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S"),
            format_money(currency, record.amount)
        )?;
    }
    Ok(())
}
