//! Persistence snapshot types and the versioned-load adapter.
//!
//! State is persisted as one JSON document per logical key (see the `KEY_*`
//! constants), with camelCase field names matching the payloads of the
//! original app this engine replaces. The record structs here are the wire
//! schema; the in-memory entities never carry serde concerns.
//!
//! # Schema migration
//!
//! Records written before cost anchors existed lack the `costAnchor` field.
//! Loading defaults it to "no accrual yet": `initialDuration` for timers,
//! `0` for stopwatches. The default is applied here, in one place, so
//! steady-state logic never sees a missing anchor.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::{StopwatchEntity, TimerEntity};
use crate::ledger::{BillingRecord, SessionLedger};
use crate::rate::{GamePreset, Rate};
use crate::types::{EntityId, PresetId, Status};

pub const KEY_TIMERS: &str = "timers";
pub const KEY_STOPWATCHES: &str = "stopwatches";
pub const KEY_BANKED: &str = "bankedEarnings";
pub const KEY_HISTORY: &str = "billingHistory";
pub const KEY_DEFAULT_RATE: &str = "defaultRate";
pub const KEY_PRESETS: &str = "presets";

/// Wire form of a [`TimerEntity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerRecord {
    pub id: EntityId,
    pub name: String,
    pub initial_duration: i64,
    pub remaining_time: i64,
    #[serde(default)]
    pub status: Status,
    /// Absent in pre-anchor records; defaulted on load.
    #[serde(default)]
    pub cost_anchor: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_preset_id: Option<PresetId>,
}

impl From<&TimerEntity> for TimerRecord {
    fn from(timer: &TimerEntity) -> Self {
        Self {
            id: timer.id.clone(),
            name: timer.name.clone(),
            initial_duration: timer.initial_duration,
            remaining_time: timer.remaining_time,
            status: timer.status,
            cost_anchor: Some(timer.cost_anchor),
            game_preset_id: timer.preset_id.clone(),
        }
    }
}

impl From<TimerRecord> for TimerEntity {
    fn from(record: TimerRecord) -> Self {
        Self {
            cost_anchor: record.cost_anchor.unwrap_or(record.initial_duration),
            id: record.id,
            name: record.name,
            initial_duration: record.initial_duration,
            remaining_time: record.remaining_time,
            status: record.status,
            preset_id: record.game_preset_id,
        }
    }
}

/// Wire form of a [`StopwatchEntity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopwatchRecord {
    pub id: EntityId,
    pub name: String,
    pub elapsed_time: i64,
    #[serde(default)]
    pub laps: Vec<i64>,
    #[serde(default)]
    pub status: Status,
    /// Absent in pre-anchor records; defaulted on load.
    #[serde(default)]
    pub cost_anchor: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_preset_id: Option<PresetId>,
}

impl From<&StopwatchEntity> for StopwatchRecord {
    fn from(sw: &StopwatchEntity) -> Self {
        Self {
            id: sw.id.clone(),
            name: sw.name.clone(),
            elapsed_time: sw.elapsed_time,
            laps: sw.laps.clone(),
            status: sw.status,
            cost_anchor: Some(sw.cost_anchor),
            game_preset_id: sw.preset_id.clone(),
        }
    }
}

impl From<StopwatchRecord> for StopwatchEntity {
    fn from(record: StopwatchRecord) -> Self {
        Self {
            cost_anchor: record.cost_anchor.unwrap_or(0),
            id: record.id,
            name: record.name,
            elapsed_time: record.elapsed_time,
            laps: record.laps,
            status: record.status,
            preset_id: record.game_preset_id,
        }
    }
}

/// Everything the ledger persists, one field per storage key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerSnapshot {
    pub timers: Vec<TimerRecord>,
    pub stopwatches: Vec<StopwatchRecord>,
    pub banked_earnings: f64,
    pub billing_history: Vec<BillingRecord>,
    pub default_rate: Option<Rate>,
    pub presets: Vec<GamePreset>,
}

impl LedgerSnapshot {
    /// Captures the full ledger state for persistence.
    #[must_use]
    pub fn capture(ledger: &SessionLedger) -> Self {
        Self {
            timers: ledger.timers().iter().map(TimerRecord::from).collect(),
            stopwatches: ledger
                .stopwatches()
                .iter()
                .map(StopwatchRecord::from)
                .collect(),
            banked_earnings: ledger.banked_earnings(),
            billing_history: ledger.billing_history().to_vec(),
            default_rate: Some(ledger.default_rate()),
            presets: ledger.presets().to_vec(),
        }
    }

    /// Rebuilds a ledger, applying the load-time anchor defaults.
    #[must_use]
    pub fn restore(self) -> SessionLedger {
        SessionLedger {
            timers: self.timers.into_iter().map(TimerEntity::from).collect(),
            stopwatches: self
                .stopwatches
                .into_iter()
                .map(StopwatchEntity::from)
                .collect(),
            banked_earnings: self.banked_earnings,
            billing_history: self.billing_history,
            default_rate: self.default_rate.unwrap_or_default(),
            presets: self.presets,
        }
    }

    /// Assembles a snapshot from per-key JSON documents as loaded from the
    /// store. An absent or malformed document degrades to that key's
    /// default with a warning; load never fails.
    #[must_use]
    pub fn from_documents(
        timers: Option<Value>,
        stopwatches: Option<Value>,
        banked_earnings: Option<Value>,
        billing_history: Option<Value>,
        default_rate: Option<Value>,
        presets: Option<Value>,
    ) -> Self {
        Self {
            timers: decode_or_default(KEY_TIMERS, timers),
            stopwatches: decode_or_default(KEY_STOPWATCHES, stopwatches),
            banked_earnings: decode_or_default(KEY_BANKED, banked_earnings),
            billing_history: decode_or_default(KEY_HISTORY, billing_history),
            default_rate: decode_or_default(KEY_DEFAULT_RATE, default_rate),
            presets: decode_or_default(KEY_PRESETS, presets),
        }
    }
}

/// Decodes one stored document, falling back to the type's default when the
/// document is absent or does not parse.
fn decode_or_default<T>(key: &str, value: Option<Value>) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    value.map_or_else(T::default, |value| {
        serde_json::from_value(value).unwrap_or_else(|error| {
            tracing::warn!(key, %error, "malformed stored record, using default");
            T::default()
        })
    })
}
