//! The session ledger: the single owner of all billing state.
//!
//! Every mutation of timers, stopwatches, banked earnings, billing history,
//! and pricing funnels through this aggregate, which keeps the cost-anchor
//! bookkeeping consistent across pause/resume/reset/bill cycles. All
//! operations are total: an unknown id or an illegal state transition is a
//! no-op reported through the return value, never an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::accrual::accrued_cost;
use crate::entity::{StopwatchEntity, TimerEntity};
use crate::rate::{GamePreset, Rate, resolve};
use crate::types::{EntityId, PresetId, RecordId};

/// One committed billing: the total owed at the moment of a bill.
///
/// Immutable once created; history is newest-first and only ever emptied
/// wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingRecord {
    pub id: RecordId,
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
    pub amount: f64,
}

/// Outcome of [`SessionLedger::bill`].
///
/// Nothing-to-bill is a distinct outcome rather than an error so callers
/// can prompt instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum BillOutcome {
    Billed(BillingRecord),
    NothingToBill,
}

/// Owns the full billing state and orchestrates entity transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionLedger {
    pub(crate) timers: Vec<TimerEntity>,
    pub(crate) stopwatches: Vec<StopwatchEntity>,
    pub(crate) banked_earnings: f64,
    /// Newest first.
    pub(crate) billing_history: Vec<BillingRecord>,
    pub(crate) default_rate: Rate,
    pub(crate) presets: Vec<GamePreset>,
}

impl SessionLedger {
    #[must_use]
    pub const fn new(default_rate: Rate) -> Self {
        Self {
            timers: Vec::new(),
            stopwatches: Vec::new(),
            banked_earnings: 0.0,
            billing_history: Vec::new(),
            default_rate,
            presets: Vec::new(),
        }
    }

    // ----- read surface -----

    #[must_use]
    pub fn timers(&self) -> &[TimerEntity] {
        &self.timers
    }

    #[must_use]
    pub fn stopwatches(&self) -> &[StopwatchEntity] {
        &self.stopwatches
    }

    #[must_use]
    pub const fn banked_earnings(&self) -> f64 {
        self.banked_earnings
    }

    #[must_use]
    pub fn billing_history(&self) -> &[BillingRecord] {
        &self.billing_history
    }

    #[must_use]
    pub const fn default_rate(&self) -> Rate {
        self.default_rate
    }

    #[must_use]
    pub fn presets(&self) -> &[GamePreset] {
        &self.presets
    }

    /// Live, unbanked cost on a timer. Rate resolution happens on every
    /// read, so preset edits show up immediately.
    #[must_use]
    pub fn timer_cost(&self, timer: &TimerEntity) -> f64 {
        let rate = resolve(timer.preset_id.as_ref(), self.default_rate, &self.presets);
        accrued_cost(timer.elapsed_for_cost(), rate)
    }

    /// Live, unbanked cost on a stopwatch.
    #[must_use]
    pub fn stopwatch_cost(&self, stopwatch: &StopwatchEntity) -> f64 {
        let rate = resolve(
            stopwatch.preset_id.as_ref(),
            self.default_rate,
            &self.presets,
        );
        accrued_cost(stopwatch.elapsed_for_cost(), rate)
    }

    /// Banked earnings plus the live accrual of every entity, re-derived on
    /// each call so it always reflects the current ticks.
    #[must_use]
    pub fn total_billable(&self) -> f64 {
        let timers: f64 = self.timers.iter().map(|t| self.timer_cost(t)).sum();
        let stopwatches: f64 = self
            .stopwatches
            .iter()
            .map(|sw| self.stopwatch_cost(sw))
            .sum();
        self.banked_earnings + timers + stopwatches
    }

    // ----- entity lifecycle -----

    /// Creates a stopped countdown timer and returns its id.
    ///
    /// Defaults match the original station cards: name `Station N`, duration
    /// one full billing unit of the default rate.
    pub fn create_timer(&mut self, name: Option<String>, duration: Option<i64>) -> EntityId {
        let name = name.unwrap_or_else(|| format!("Station {}", self.timers.len() + 1));
        let duration = duration.unwrap_or_else(|| self.default_unit_seconds());
        let timer = TimerEntity::new(name, duration);
        let id = timer.id.clone();
        self.timers.push(timer);
        id
    }

    /// Creates a zeroed, stopped stopwatch and returns its id.
    pub fn create_stopwatch(&mut self, name: Option<String>) -> EntityId {
        let name = name.unwrap_or_else(|| format!("Stopwatch {}", self.stopwatches.len() + 1));
        let stopwatch = StopwatchEntity::new(name);
        let id = stopwatch.id.clone();
        self.stopwatches.push(stopwatch);
        id
    }

    /// Starts the entity with this id. No anchor change: a pause/resume
    /// cycle continues the same billing window.
    pub fn start(&mut self, id: &EntityId) -> bool {
        if let Some(timer) = self.timers.iter_mut().find(|t| &t.id == id) {
            timer.start()
        } else if let Some(sw) = self.stopwatches.iter_mut().find(|s| &s.id == id) {
            sw.start()
        } else {
            false
        }
    }

    pub fn pause(&mut self, id: &EntityId) -> bool {
        if let Some(timer) = self.timers.iter_mut().find(|t| &t.id == id) {
            timer.pause()
        } else if let Some(sw) = self.stopwatches.iter_mut().find(|s| &s.id == id) {
            sw.pause()
        } else {
            false
        }
    }

    /// Delivers one clock tick to the entity with this id.
    pub fn tick(&mut self, id: &EntityId) {
        if let Some(timer) = self.timers.iter_mut().find(|t| &t.id == id) {
            timer.advance(1);
        } else if let Some(sw) = self.stopwatches.iter_mut().find(|s| &s.id == id) {
            sw.advance(1);
        }
    }

    /// Sweeps every Running entity forward by `secs` one-second ticks.
    ///
    /// One central sweep replaces per-entity interval timers; applying `n`
    /// seconds at once is observably identical to `n` sequential ticks.
    pub fn tick_all(&mut self, secs: i64) {
        if secs <= 0 {
            return;
        }
        for timer in &mut self.timers {
            timer.advance(secs);
        }
        for sw in &mut self.stopwatches {
            sw.advance(secs);
        }
    }

    /// Settles the entity's open accrual window into banked earnings, then
    /// reinitializes it to its stopped starting state.
    ///
    /// This is the only per-entity path by which live cost becomes banked.
    pub fn reset(&mut self, id: &EntityId) -> bool {
        if let Some(idx) = self.timers.iter().position(|t| &t.id == id) {
            let settled = self.timer_cost(&self.timers[idx]);
            self.bank(settled);
            self.timers[idx].reinitialize();
            true
        } else if let Some(idx) = self.stopwatches.iter().position(|s| &s.id == id) {
            let settled = self.stopwatch_cost(&self.stopwatches[idx]);
            self.bank(settled);
            self.stopwatches[idx].reinitialize();
            true
        } else {
            false
        }
    }

    /// Records a lap on a Running stopwatch.
    pub fn lap(&mut self, id: &EntityId) -> bool {
        self.stopwatches
            .iter_mut()
            .find(|s| &s.id == id)
            .is_some_and(StopwatchEntity::lap)
    }

    /// Re-arms a Stopped timer with a new duration.
    pub fn edit_duration(&mut self, id: &EntityId, duration: i64) -> bool {
        self.timers
            .iter_mut()
            .find(|t| &t.id == id)
            .is_some_and(|t| t.rearm(duration))
    }

    /// Renames an entity. A name that is empty after trimming is rejected.
    pub fn rename(&mut self, id: &EntityId, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        if let Some(timer) = self.timers.iter_mut().find(|t| &t.id == id) {
            timer.name = name.to_string();
            true
        } else if let Some(sw) = self.stopwatches.iter_mut().find(|s| &s.id == id) {
            sw.name = name.to_string();
            true
        } else {
            false
        }
    }

    /// Points an entity at a preset, or back at the default rate with
    /// `None`. No cost effect; the new rate applies from the next read.
    pub fn assign_preset(&mut self, id: &EntityId, preset_id: Option<PresetId>) -> bool {
        if let Some(timer) = self.timers.iter_mut().find(|t| &t.id == id) {
            timer.preset_id = preset_id;
            true
        } else if let Some(sw) = self.stopwatches.iter_mut().find(|s| &s.id == id) {
            sw.preset_id = preset_id;
            true
        } else {
            false
        }
    }

    /// Removes an entity unconditionally.
    ///
    /// Returns the live, unbanked cost that was on it, which is discarded,
    /// not banked. `None` means no such entity.
    pub fn delete(&mut self, id: &EntityId) -> Option<f64> {
        if let Some(idx) = self.timers.iter().position(|t| &t.id == id) {
            let discarded = self.timer_cost(&self.timers[idx]);
            self.timers.remove(idx);
            Some(discarded)
        } else if let Some(idx) = self.stopwatches.iter().position(|s| &s.id == id) {
            let discarded = self.stopwatch_cost(&self.stopwatches[idx]);
            self.stopwatches.remove(idx);
            Some(discarded)
        } else {
            None
        }
    }

    // ----- billing -----

    /// Settles everything billable into a new history record.
    ///
    /// Every entity is re-anchored to its current time value in place:
    /// running clocks keep running, nothing is reset. Banked earnings drop
    /// to zero because the record now carries them.
    pub fn bill(&mut self, now: DateTime<Utc>) -> BillOutcome {
        let amount = self.total_billable();
        if amount <= 0.0 {
            tracing::debug!("bill requested with nothing billable");
            return BillOutcome::NothingToBill;
        }

        let record = BillingRecord {
            id: RecordId::generate(),
            timestamp: now,
            amount,
        };
        self.billing_history.insert(0, record.clone());
        self.banked_earnings = 0.0;
        for timer in &mut self.timers {
            timer.cost_anchor = timer.remaining_time;
        }
        for sw in &mut self.stopwatches {
            sw.cost_anchor = sw.elapsed_time;
        }
        tracing::debug!(amount, "billed");
        BillOutcome::Billed(record)
    }

    /// Empties the billing history. Irreversible; confirmation is the
    /// caller's job.
    pub fn clear_history(&mut self) {
        self.billing_history.clear();
    }

    // ----- pricing -----

    pub fn add_preset(&mut self, name: impl Into<String>, rate: Rate) -> PresetId {
        let preset = GamePreset {
            id: PresetId::generate(),
            name: name.into(),
            rate,
        };
        let id = preset.id.clone();
        self.presets.push(preset);
        id
    }

    pub fn update_preset(&mut self, id: &PresetId, name: Option<String>, rate: Option<Rate>) -> bool {
        self.presets
            .iter_mut()
            .find(|p| &p.id == id)
            .is_some_and(|preset| {
                if let Some(name) = name {
                    preset.name = name;
                }
                if let Some(rate) = rate {
                    preset.rate = rate;
                }
                true
            })
    }

    /// Removes a preset. Entities still referencing it keep the dangling id
    /// and resolve to the default rate from their next cost read.
    pub fn delete_preset(&mut self, id: &PresetId) -> bool {
        let before = self.presets.len();
        self.presets.retain(|p| &p.id != id);
        self.presets.len() != before
    }

    pub const fn set_default_rate(&mut self, rate: Rate) {
        self.default_rate = rate;
    }

    // ----- internals -----

    fn bank(&mut self, amount: f64) {
        if amount > 0.0 {
            self.banked_earnings += amount;
            tracing::debug!(amount, total = self.banked_earnings, "settled into banked earnings");
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "unit durations are small whole-ish minute counts"
    )]
    fn default_unit_seconds(&self) -> i64 {
        (self.default_rate.minutes_per_unit * 60.0).max(0.0) as i64
    }
}

impl Default for SessionLedger {
    fn default() -> Self {
        Self::new(Rate::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;

    fn ledger() -> SessionLedger {
        // 50 per 10 minutes, the stock rate.
        SessionLedger::new(Rate::new(50.0, 10.0))
    }

    #[test]
    fn create_timer_defaults_to_one_billing_unit() {
        let mut ledger = ledger();
        let id = ledger.create_timer(None, None);
        let timer = ledger.timers().iter().find(|t| t.id == id).unwrap();
        assert_eq!(timer.name, "Station 1");
        assert_eq!(timer.initial_duration, 600);
        assert_eq!(timer.cost_anchor, 600);
        assert_eq!(timer.status, Status::Stopped);
    }

    #[test]
    fn reset_settles_into_banked_earnings() {
        let mut ledger = ledger();
        let id = ledger.create_timer(None, Some(600));
        ledger.start(&id);
        ledger.tick_all(200);

        assert!(ledger.reset(&id));

        // 200s = 3.33 min of a 10-minute unit at 50.
        assert!((ledger.banked_earnings() - 50.0 / 3.0).abs() < 1e-9);
        let timer = &ledger.timers()[0];
        assert_eq!(timer.remaining_time, 600);
        assert_eq!(timer.cost_anchor, 600);
        assert_eq!(timer.status, Status::Stopped);
    }

    #[test]
    fn reset_with_no_accrual_banks_nothing() {
        let mut ledger = ledger();
        let id = ledger.create_timer(None, Some(600));
        assert!(ledger.reset(&id));
        assert!(ledger.banked_earnings().abs() < f64::EPSILON);
    }

    #[test]
    fn total_billable_is_idempotent_between_mutations() {
        let mut ledger = ledger();
        let id = ledger.create_stopwatch(None);
        ledger.start(&id);
        ledger.tick_all(300);

        let first = ledger.total_billable();
        let second = ledger.total_billable();
        assert!((first - second).abs() < f64::EPSILON);
        assert!((first - 25.0).abs() < 1e-9);
    }

    #[test]
    fn bill_settles_in_place_without_stopping_anything() {
        let mut ledger = ledger();
        let id = ledger.create_stopwatch(None);
        ledger.start(&id);
        ledger.tick_all(300);

        let outcome = ledger.bill(Utc::now());
        let BillOutcome::Billed(record) = outcome else {
            panic!("expected a billed outcome");
        };
        assert!((record.amount - 25.0).abs() < 1e-9);

        assert_eq!(ledger.billing_history().len(), 1);
        assert!(ledger.banked_earnings().abs() < f64::EPSILON);
        let sw = &ledger.stopwatches()[0];
        assert_eq!(sw.status, Status::Running);
        assert_eq!(sw.elapsed_time, 300);
        assert_eq!(sw.cost_anchor, 300);
        assert!(ledger.total_billable().abs() < f64::EPSILON);
    }

    #[test]
    fn bill_prepends_newest_record() {
        let mut ledger = ledger();
        let id = ledger.create_stopwatch(None);
        ledger.start(&id);
        ledger.tick_all(60);
        ledger.bill(Utc::now());
        ledger.tick_all(120);
        ledger.bill(Utc::now());

        let history = ledger.billing_history();
        assert_eq!(history.len(), 2);
        // Newest first: the second bill covered 120s, the first 60s.
        assert!(history[0].amount > history[1].amount);
    }

    #[test]
    fn bill_with_nothing_accrued_is_reported_distinctly() {
        let mut ledger = ledger();
        ledger.create_timer(None, None);
        assert_eq!(ledger.bill(Utc::now()), BillOutcome::NothingToBill);
        assert!(ledger.billing_history().is_empty());
    }

    #[test]
    fn deleted_preset_falls_back_to_default_rate() {
        let mut ledger = ledger();
        let preset = ledger.add_preset("Racing Sim", Rate::new(100.0, 10.0));
        let id = ledger.create_stopwatch(None);
        ledger.assign_preset(&id, Some(preset.clone()));
        ledger.start(&id);
        ledger.tick_all(600);

        assert!((ledger.total_billable() - 100.0).abs() < 1e-9);

        assert!(ledger.delete_preset(&preset));
        // Dangling reference resolves to the 50-per-10-minutes default.
        assert!((ledger.total_billable() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn preset_edits_are_visible_on_next_read() {
        let mut ledger = ledger();
        let preset = ledger.add_preset("Racing Sim", Rate::new(100.0, 10.0));
        let id = ledger.create_stopwatch(None);
        ledger.assign_preset(&id, Some(preset.clone()));
        ledger.start(&id);
        ledger.tick_all(600);

        assert!(ledger.update_preset(&preset, None, Some(Rate::new(20.0, 10.0))));
        assert!((ledger.total_billable() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn delete_discards_unbanked_accrual() {
        let mut ledger = ledger();
        let id = ledger.create_stopwatch(None);
        ledger.start(&id);
        ledger.tick_all(600);

        let discarded = ledger.delete(&id).unwrap();
        assert!((discarded - 50.0).abs() < 1e-9);
        assert!(ledger.total_billable().abs() < f64::EPSILON);
        assert!(ledger.stopwatches().is_empty());
    }

    #[test]
    fn operations_on_unknown_ids_are_no_ops() {
        let mut ledger = ledger();
        let ghost = EntityId::generate();
        assert!(!ledger.start(&ghost));
        assert!(!ledger.pause(&ghost));
        assert!(!ledger.reset(&ghost));
        assert!(!ledger.lap(&ghost));
        assert!(!ledger.rename(&ghost, "anything"));
        assert!(ledger.delete(&ghost).is_none());
    }

    #[test]
    fn rename_rejects_blank_names_and_trims() {
        let mut ledger = ledger();
        let id = ledger.create_timer(None, None);
        assert!(!ledger.rename(&id, "   "));
        assert!(ledger.rename(&id, "  PS5 corner  "));
        assert_eq!(ledger.timers()[0].name, "PS5 corner");
    }

    #[test]
    fn edit_duration_is_timer_only_and_stopped_only() {
        let mut ledger = ledger();
        let timer = ledger.create_timer(None, Some(600));
        let stopwatch = ledger.create_stopwatch(None);

        assert!(!ledger.edit_duration(&stopwatch, 300));
        ledger.start(&timer);
        assert!(!ledger.edit_duration(&timer, 300));
        ledger.pause(&timer);
        assert!(!ledger.edit_duration(&timer, 300));
        ledger.reset(&timer);
        assert!(ledger.edit_duration(&timer, 300));
        assert_eq!(ledger.timers()[0].initial_duration, 300);
    }

    #[test]
    fn pause_resume_then_bill_covers_the_whole_window() {
        let mut ledger = ledger();
        let id = ledger.create_timer(None, Some(1200));
        ledger.start(&id);
        ledger.tick_all(100);
        ledger.pause(&id);
        ledger.tick_all(500); // paused: no movement
        ledger.start(&id);
        ledger.tick_all(200);

        // 300s accrued across the pause.
        assert!((ledger.total_billable() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn timer_running_past_zero_finishes_and_stops_accruing_further() {
        let mut ledger = ledger();
        let id = ledger.create_timer(None, Some(120));
        ledger.start(&id);
        ledger.tick_all(500);

        let timer = &ledger.timers()[0];
        assert_eq!(timer.remaining_time, 0);
        assert_eq!(timer.status, Status::Finished);
        // Only the 120 real seconds are billable.
        assert!((ledger.total_billable() - 10.0).abs() < 1e-9);

        ledger.tick_all(60);
        assert!((ledger.total_billable() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn single_tick_advances_by_one_second() {
        let mut ledger = ledger();
        let id = ledger.create_stopwatch(None);
        ledger.start(&id);
        ledger.tick(&id);
        ledger.tick(&id);
        assert_eq!(ledger.stopwatches()[0].elapsed_time, 2);
    }

    #[test]
    fn clear_history_empties_unconditionally() {
        let mut ledger = ledger();
        let id = ledger.create_stopwatch(None);
        ledger.start(&id);
        ledger.tick_all(60);
        ledger.bill(Utc::now());
        assert_eq!(ledger.billing_history().len(), 1);
        ledger.clear_history();
        assert!(ledger.billing_history().is_empty());
    }
}
