//! Game preset management.

use std::io::Write;

use anyhow::Result;

use tally_core::{Rate, SessionLedger};

use super::util::{find_preset, format_money};

pub fn list<W: Write>(writer: &mut W, ledger: &SessionLedger, currency: &str) -> Result<()> {
    if ledger.presets().is_empty() {
        writeln!(writer, "No presets. Stations use the default rate.")?;
        return Ok(());
    }
    for preset in ledger.presets() {
        writeln!(
            writer,
            "{}  {} per {} min",
            preset.name,
            format_money(currency, preset.rate.cost_per_unit),
            preset.rate.minutes_per_unit
        )?;
    }
    Ok(())
}

pub fn add<W: Write>(
    writer: &mut W,
    ledger: &mut SessionLedger,
    name: String,
    cost: f64,
    minutes: f64,
) -> Result<()> {
    ledger.add_preset(name.clone(), Rate::new(cost, minutes));
    writeln!(writer, "Added preset '{name}'.")?;
    Ok(())
}

pub fn update<W: Write>(
    writer: &mut W,
    ledger: &mut SessionLedger,
    target: &str,
    name: Option<String>,
    cost: Option<f64>,
    minutes: Option<f64>,
) -> Result<()> {
    let Some(id) = find_preset(ledger, target) else {
        writeln!(writer, "No preset matches '{target}'.")?;
        return Ok(());
    };
    let current = ledger
        .presets()
        .iter()
        .find(|p| p.id == id)
        .expect("preset was just resolved")
        .rate;
    let rate = Rate::new(
        cost.unwrap_or(current.cost_per_unit),
        minutes.unwrap_or(current.minutes_per_unit),
    );
    ledger.update_preset(&id, name, Some(rate));
    writeln!(writer, "Preset updated. Assigned stations use the new rate immediately.")?;
    Ok(())
}

pub fn remove<W: Write>(writer: &mut W, ledger: &mut SessionLedger, target: &str) -> Result<()> {
    let Some(id) = find_preset(ledger, target) else {
        writeln!(writer, "No preset matches '{target}'.")?;
        return Ok(());
    };
    ledger.delete_preset(&id);
    writeln!(
        writer,
        "Preset removed. Stations that used it fall back to the default rate."
    )?;
    Ok(())
}
