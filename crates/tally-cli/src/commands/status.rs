//! Status command: all stations, live costs, and the billable total.

use std::io::Write;

use anyhow::Result;
use serde_json::json;

use tally_core::SessionLedger;
use tally_core::persist::LedgerSnapshot;

use super::util::{format_hms, format_money};

pub fn run<W: Write>(
    writer: &mut W,
    ledger: &SessionLedger,
    currency: &str,
    json_output: bool,
) -> Result<()> {
    if json_output {
        return run_json(writer, ledger);
    }

    let rate = ledger.default_rate();
    writeln!(
        writer,
        "Default rate: {} per {} min",
        format_money(currency, rate.cost_per_unit),
        rate.minutes_per_unit
    )?;
    writeln!(
        writer,
        "Banked: {}",
        format_money(currency, ledger.banked_earnings())
    )?;
    writeln!(
        writer,
        "Total billable: {}",
        format_money(currency, ledger.total_billable())
    )?;

    if !ledger.timers().is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Timers:")?;
        for timer in ledger.timers() {
            let progress = if timer.initial_duration > 0 {
                (timer.initial_duration - timer.remaining_time) * 100 / timer.initial_duration
            } else {
                0
            };
            writeln!(
                writer,
                "  {:<20} {:<9} {} / {} ({progress}%)  {}",
                timer.name,
                timer.status.as_str(),
                format_hms(timer.remaining_time),
                format_hms(timer.initial_duration),
                format_money(currency, ledger.timer_cost(timer))
            )?;
        }
    }

    if !ledger.stopwatches().is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Stopwatches:")?;
        for sw in ledger.stopwatches() {
            let laps = if sw.laps.is_empty() {
                String::new()
            } else {
                format!("  {} laps", sw.laps.len())
            };
            writeln!(
                writer,
                "  {:<20} {:<9} {}  {}{}",
                sw.name,
                sw.status.as_str(),
                format_hms(sw.elapsed_time),
                format_money(currency, ledger.stopwatch_cost(sw)),
                laps
            )?;
            // Newest first; storage order is oldest first.
            for (idx, lap) in sw.laps.iter().enumerate().rev() {
                writeln!(writer, "    lap {}  {}", idx + 1, format_hms(*lap))?;
            }
        }
    }

    if ledger.timers().is_empty() && ledger.stopwatches().is_empty() {
        writeln!(writer)?;
        writeln!(writer, "No stations yet. Try 'tally add timer'.")?;
    }

    Ok(())
}

fn run_json<W: Write>(writer: &mut W, ledger: &SessionLedger) -> Result<()> {
    let snapshot = LedgerSnapshot::capture(ledger);
    let doc = json!({
        "timers": snapshot.timers,
        "stopwatches": snapshot.stopwatches,
        "bankedEarnings": snapshot.banked_earnings,
        "totalBillable": ledger.total_billable(),
        "defaultRate": snapshot.default_rate,
        "presets": snapshot.presets,
    });
    writeln!(writer, "{}", serde_json::to_string_pretty(&doc)?)?;
    Ok(())
}
