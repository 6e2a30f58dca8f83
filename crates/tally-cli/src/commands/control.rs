//! Run-state commands: start, pause, reset, lap.

use std::io::Write;

use anyhow::Result;

use tally_core::SessionLedger;

use super::util::{find_entity, format_money};

pub fn start<W: Write>(writer: &mut W, ledger: &mut SessionLedger, target: &str) -> Result<()> {
    let Some(id) = find_entity(ledger, target) else {
        writeln!(writer, "No station matches '{target}'.")?;
        return Ok(());
    };

    // Same guard as the original's disabled play button: a finished timer
    // has to be reset (or re-armed) before it can run again. The ledger
    // itself stays permissive.
    if let Some(timer) = ledger.timers().iter().find(|t| t.id == id) {
        if timer.remaining_time == 0 {
            writeln!(writer, "Time is up on '{}'; reset it first.", timer.name)?;
            return Ok(());
        }
    }

    if ledger.start(&id) {
        writeln!(writer, "Started.")?;
    } else {
        writeln!(writer, "Already running.")?;
    }
    Ok(())
}

pub fn pause<W: Write>(writer: &mut W, ledger: &mut SessionLedger, target: &str) -> Result<()> {
    let Some(id) = find_entity(ledger, target) else {
        writeln!(writer, "No station matches '{target}'.")?;
        return Ok(());
    };
    if ledger.pause(&id) {
        writeln!(writer, "Paused. The billing window stays open.")?;
    } else {
        writeln!(writer, "Not running.")?;
    }
    Ok(())
}

pub fn reset<W: Write>(
    writer: &mut W,
    ledger: &mut SessionLedger,
    currency: &str,
    target: &str,
) -> Result<()> {
    let Some(id) = find_entity(ledger, target) else {
        writeln!(writer, "No station matches '{target}'.")?;
        return Ok(());
    };
    let before = ledger.banked_earnings();
    ledger.reset(&id);
    let settled = ledger.banked_earnings() - before;
    if settled > 0.0 {
        writeln!(
            writer,
            "Reset. {} settled into banked earnings.",
            format_money(currency, settled)
        )?;
    } else {
        writeln!(writer, "Reset.")?;
    }
    Ok(())
}

pub fn lap<W: Write>(writer: &mut W, ledger: &mut SessionLedger, target: &str) -> Result<()> {
    let Some(id) = find_entity(ledger, target) else {
        writeln!(writer, "No station matches '{target}'.")?;
        return Ok(());
    };
    if ledger.lap(&id) {
        let sw = ledger
            .stopwatches()
            .iter()
            .find(|s| s.id == id)
            .expect("lap only succeeds on a stopwatch");
        let lap = sw.laps.last().copied().unwrap_or_default();
        writeln!(
            writer,
            "Lap {} at {}.",
            sw.laps.len(),
            super::util::format_hms(lap)
        )?;
    } else {
        writeln!(writer, "Laps need a running stopwatch.")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::Status;

    fn run_to_string<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>),
    {
        let mut out = Vec::new();
        f(&mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn start_refuses_finished_timer() {
        let mut ledger = SessionLedger::default();
        let id = ledger.create_timer(Some("t".into()), Some(60));
        ledger.start(&id);
        ledger.tick_all(60);
        assert_eq!(ledger.timers()[0].status, Status::Finished);

        let out = run_to_string(|out| start(out, &mut ledger, "t").unwrap());
        assert!(out.contains("reset it first"));
        assert_eq!(ledger.timers()[0].status, Status::Finished);
    }

    #[test]
    fn pause_on_stopped_station_is_a_no_op() {
        let mut ledger = SessionLedger::default();
        ledger.create_stopwatch(Some("sw".into()));

        let out = run_to_string(|out| pause(out, &mut ledger, "sw").unwrap());
        assert!(out.contains("Not running"));
        assert_eq!(ledger.stopwatches()[0].status, Status::Stopped);
    }

    #[test]
    fn reset_reports_settled_amount() {
        let mut ledger = SessionLedger::default();
        let id = ledger.create_timer(Some("t".into()), Some(600));
        ledger.start(&id);
        ledger.tick_all(200);

        let out = run_to_string(|out| reset(out, &mut ledger, "$", "t").unwrap());
        assert!(out.contains("$16.67"), "unexpected output: {out}");
        assert!((ledger.banked_earnings() - 50.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn lap_reports_count_and_time() {
        let mut ledger = SessionLedger::default();
        let id = ledger.create_stopwatch(Some("sw".into()));
        ledger.start(&id);
        ledger.tick_all(65);

        let out = run_to_string(|out| lap(out, &mut ledger, "sw").unwrap());
        assert!(out.contains("Lap 1 at 00:01:05"));
    }

    #[test]
    fn lap_on_paused_stopwatch_is_refused() {
        let mut ledger = SessionLedger::default();
        let id = ledger.create_stopwatch(Some("sw".into()));
        ledger.start(&id);
        ledger.tick_all(10);
        ledger.pause(&id);

        let out = run_to_string(|out| lap(out, &mut ledger, "sw").unwrap());
        assert!(out.contains("running stopwatch"));
        assert!(ledger.stopwatches()[0].laps.is_empty());
    }
}
