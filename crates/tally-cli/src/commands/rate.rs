//! Default billing rate display and updates.

use std::io::Write;

use anyhow::Result;

use tally_core::{Rate, SessionLedger};

use super::util::format_money;

pub fn run<W: Write>(
    writer: &mut W,
    ledger: &mut SessionLedger,
    currency: &str,
    cost: Option<f64>,
    minutes: Option<f64>,
) -> Result<()> {
    let current = ledger.default_rate();
    if cost.is_some() || minutes.is_some() {
        let rate = Rate::new(
            cost.unwrap_or(current.cost_per_unit),
            minutes.unwrap_or(current.minutes_per_unit),
        );
        ledger.set_default_rate(rate);
        writeln!(
            writer,
            "Default rate set to {} per {} min.",
            format_money(currency, rate.cost_per_unit),
            rate.minutes_per_unit
        )?;
    } else {
        writeln!(
            writer,
            "Default rate: {} per {} min",
            format_money(currency, current.cost_per_unit),
            current.minutes_per_unit
        )?;
    }
    Ok(())
}
