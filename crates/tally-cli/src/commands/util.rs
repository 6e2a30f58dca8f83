//! Shared utilities for CLI commands.

use tally_core::{EntityId, PresetId, SessionLedger};

/// Formats whole seconds as zero-padded `HH:MM:SS`.
#[must_use]
pub fn format_hms(total_seconds: i64) -> String {
    let total_seconds = total_seconds.max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Formats an amount with the currency symbol, rounded to 2 decimals.
///
/// This is the only place money is rounded; the ledger stores it unrounded.
#[must_use]
pub fn format_money(symbol: &str, amount: f64) -> String {
    format!("{symbol}{amount:.2}")
}

/// Resolves a user-supplied station reference to an entity id.
///
/// Matches, in order: exact id, exact name (case-insensitive), unique id
/// prefix. Returns `None` when nothing matches or a prefix is ambiguous.
#[must_use]
pub fn find_entity(ledger: &SessionLedger, target: &str) -> Option<EntityId> {
    let ids = ledger
        .timers()
        .iter()
        .map(|t| (&t.id, t.name.as_str()))
        .chain(ledger.stopwatches().iter().map(|s| (&s.id, s.name.as_str())));
    resolve_reference(ids, target)
}

/// Resolves a user-supplied preset reference to a preset id, with the same
/// matching rules as [`find_entity`].
#[must_use]
pub fn find_preset(ledger: &SessionLedger, target: &str) -> Option<PresetId> {
    let ids = ledger.presets().iter().map(|p| (&p.id, p.name.as_str()));
    resolve_reference(ids, target)
}

fn resolve_reference<'a, I, Id>(candidates: I, target: &str) -> Option<Id>
where
    I: Iterator<Item = (&'a Id, &'a str)>,
    Id: AsRef<str> + Clone + 'a,
{
    let mut prefix_matches = Vec::new();
    for (id, name) in candidates {
        if id.as_ref() == target || name.eq_ignore_ascii_case(target) {
            return Some(id.clone());
        }
        if id.as_ref().starts_with(target) {
            prefix_matches.push(id.clone());
        }
    }
    match prefix_matches.as_slice() {
        [only] => Some(only.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_hms_pads_and_splits() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(61), "00:01:01");
        assert_eq!(format_hms(3_661), "01:01:01");
        assert_eq!(format_hms(-5), "00:00:00");
    }

    #[test]
    fn format_money_rounds_to_two_decimals() {
        assert_eq!(format_money("$", 50.0 / 3.0), "$16.67");
        assert_eq!(format_money("€", 0.0), "€0.00");
    }

    #[test]
    fn find_entity_matches_name_case_insensitively() {
        let mut ledger = SessionLedger::default();
        let id = ledger.create_timer(Some("PS5 corner".into()), None);
        assert_eq!(find_entity(&ledger, "ps5 corner"), Some(id));
    }

    #[test]
    fn find_entity_matches_unique_id_prefix() {
        let mut ledger = SessionLedger::default();
        let id = ledger.create_stopwatch(None);
        let prefix = &id.as_str()[..8];
        assert_eq!(find_entity(&ledger, prefix), Some(id));
    }

    #[test]
    fn find_entity_rejects_unknown_and_ambiguous() {
        let mut ledger = SessionLedger::default();
        ledger.create_timer(None, None);
        ledger.create_stopwatch(None);
        assert_eq!(find_entity(&ledger, "nothing-like-this"), None);
        // Every UUID shares the empty prefix; ambiguous.
        assert_eq!(find_entity(&ledger, ""), None);
    }

    #[test]
    fn find_preset_by_name() {
        let mut ledger = SessionLedger::default();
        let id = ledger.add_preset("Racing Sim", tally_core::Rate::new(100.0, 10.0));
        assert_eq!(find_preset(&ledger, "racing sim"), Some(id));
    }
}
