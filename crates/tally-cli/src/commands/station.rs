//! Station lifecycle commands: add, rename, re-arm, preset assignment,
//! removal.

use std::io::Write;

use anyhow::Result;

use tally_core::SessionLedger;

use super::util::{find_entity, find_preset, format_hms, format_money};

/// Shortened id for display.
fn short(id: &tally_core::EntityId) -> &str {
    id.as_str().get(..8).unwrap_or_else(|| id.as_str())
}

pub fn add_timer<W: Write>(
    writer: &mut W,
    ledger: &mut SessionLedger,
    name: Option<String>,
    seconds: Option<i64>,
) -> Result<()> {
    let id = ledger.create_timer(name, seconds);
    let timer = ledger
        .timers()
        .iter()
        .find(|t| t.id == id)
        .expect("freshly created timer");
    writeln!(
        writer,
        "Added timer '{}' ({}) with duration {}",
        timer.name,
        short(&id),
        format_hms(timer.initial_duration)
    )?;
    Ok(())
}

pub fn add_stopwatch<W: Write>(
    writer: &mut W,
    ledger: &mut SessionLedger,
    name: Option<String>,
) -> Result<()> {
    let id = ledger.create_stopwatch(name);
    let sw = ledger
        .stopwatches()
        .iter()
        .find(|s| s.id == id)
        .expect("freshly created stopwatch");
    writeln!(writer, "Added stopwatch '{}' ({})", sw.name, short(&id))?;
    Ok(())
}

pub fn rename<W: Write>(
    writer: &mut W,
    ledger: &mut SessionLedger,
    target: &str,
    name: &str,
) -> Result<()> {
    let Some(id) = find_entity(ledger, target) else {
        writeln!(writer, "No station matches '{target}'.")?;
        return Ok(());
    };
    if ledger.rename(&id, name) {
        writeln!(writer, "Renamed to '{}'.", name.trim())?;
    } else {
        writeln!(writer, "Name cannot be empty.")?;
    }
    Ok(())
}

pub fn set_duration<W: Write>(
    writer: &mut W,
    ledger: &mut SessionLedger,
    target: &str,
    seconds: i64,
) -> Result<()> {
    let Some(id) = find_entity(ledger, target) else {
        writeln!(writer, "No station matches '{target}'.")?;
        return Ok(());
    };
    if ledger.edit_duration(&id, seconds) {
        writeln!(writer, "Duration set to {}.", format_hms(seconds))?;
    } else {
        writeln!(
            writer,
            "Duration can only be changed on a stopped timer."
        )?;
    }
    Ok(())
}

pub fn assign<W: Write>(
    writer: &mut W,
    ledger: &mut SessionLedger,
    target: &str,
    preset: Option<&str>,
) -> Result<()> {
    let Some(id) = find_entity(ledger, target) else {
        writeln!(writer, "No station matches '{target}'.")?;
        return Ok(());
    };
    match preset {
        Some(reference) => {
            let Some(preset_id) = find_preset(ledger, reference) else {
                writeln!(writer, "No preset matches '{reference}'.")?;
                return Ok(());
            };
            ledger.assign_preset(&id, Some(preset_id));
            writeln!(writer, "Preset assigned.")?;
        }
        None => {
            ledger.assign_preset(&id, None);
            writeln!(writer, "Preset cleared; using the default rate.")?;
        }
    }
    Ok(())
}

pub fn remove<W: Write>(
    writer: &mut W,
    ledger: &mut SessionLedger,
    currency: &str,
    target: &str,
) -> Result<()> {
    let Some(id) = find_entity(ledger, target) else {
        writeln!(writer, "No station matches '{target}'.")?;
        return Ok(());
    };
    match ledger.delete(&id) {
        Some(discarded) if discarded > 0.0 => {
            // Known quirk carried over from the original app: removal does
            // not bank the open window.
            writeln!(
                writer,
                "Removed. {} of unbanked cost was discarded with it.",
                format_money(currency, discarded)
            )?;
        }
        Some(_) => writeln!(writer, "Removed.")?,
        None => writeln!(writer, "No station matches '{target}'.")?,
    }
    Ok(())
}
