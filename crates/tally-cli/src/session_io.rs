//! Ledger loading, wall-clock catch-up, and best-effort saving.
//!
//! The engine is tick-driven but the binary is process-per-command, so the
//! clock is realized as catch-up: a `lastTick` timestamp is persisted with
//! the rest of the state, and on every invocation the running stations are
//! swept forward by the seconds elapsed since then before the user's
//! command applies. One central sweep replaces per-station interval timers
//! and keeps tick/mutation ordering trivially serial.
//!
//! Saves are advisory: a failed write is logged at WARN and in-memory state
//! stands for the rest of the invocation.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use tally_core::SessionLedger;
use tally_core::persist::{
    KEY_BANKED, KEY_DEFAULT_RATE, KEY_HISTORY, KEY_PRESETS, KEY_STOPWATCHES, KEY_TIMERS,
    LedgerSnapshot,
};
use tally_store::Store;

use crate::Config;

pub const KEY_LAST_TICK: &str = "lastTick";

/// One CLI invocation's view of the persisted ledger.
pub struct Session {
    store: Store,
    pub ledger: SessionLedger,
    now: DateTime<Utc>,
}

impl Session {
    /// Opens the store from config, loads the ledger, and catches running
    /// stations up to the current wall clock.
    pub fn open(config: &Config) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent).context("failed to create database directory")?;
        }
        let store = Store::open(&config.database_path).with_context(|| {
            format!("failed to open store at {}", config.database_path.display())
        })?;
        Ok(Self::from_store(store, Utc::now()))
    }

    /// Loads from an already-open store, catching up to `now`.
    pub fn from_store(store: Store, now: DateTime<Utc>) -> Self {
        let ledger = load_ledger(&store);
        let mut session = Self { store, ledger, now };
        session.catch_up();
        session
    }

    /// The wall-clock instant this invocation is pinned to. Catch-up ticks
    /// and any bill issued in this invocation both use it.
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn catch_up(&mut self) {
        let Some(last_tick) = load_last_tick(&self.store) else {
            return;
        };
        let gap = (self.now - last_tick).num_seconds();
        if gap > 0 {
            self.ledger.tick_all(gap);
            tracing::debug!(gap, "swept running stations up to now");
        }
    }

    /// Persists the whole ledger plus the tick timestamp, best-effort.
    pub fn save(&self) {
        let snapshot = LedgerSnapshot::capture(&self.ledger);
        self.put(KEY_TIMERS, &snapshot.timers);
        self.put(KEY_STOPWATCHES, &snapshot.stopwatches);
        self.put(KEY_BANKED, &snapshot.banked_earnings);
        self.put(KEY_HISTORY, &snapshot.billing_history);
        self.put(KEY_DEFAULT_RATE, &snapshot.default_rate);
        self.put(KEY_PRESETS, &snapshot.presets);
        self.put(KEY_LAST_TICK, &self.now);
    }

    fn put<T: Serialize>(&self, key: &str, value: &T) {
        let result = serde_json::to_value(value)
            .map_err(anyhow::Error::from)
            .and_then(|doc| self.store.save(key, &doc).map_err(anyhow::Error::from));
        if let Err(error) = result {
            tracing::warn!(key, %error, "failed to persist record, keeping in-memory state");
        }
    }
}

fn load_ledger(store: &Store) -> SessionLedger {
    let doc = |key: &str| match store.load(key) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(key, %error, "failed to load record, using default");
            None
        }
    };
    LedgerSnapshot::from_documents(
        doc(KEY_TIMERS),
        doc(KEY_STOPWATCHES),
        doc(KEY_BANKED),
        doc(KEY_HISTORY),
        doc(KEY_DEFAULT_RATE),
        doc(KEY_PRESETS),
    )
    .restore()
}

fn load_last_tick(store: &Store) -> Option<DateTime<Utc>> {
    match store.load(KEY_LAST_TICK) {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(timestamp) => Some(timestamp),
            Err(error) => {
                tracing::warn!(%error, "malformed lastTick, skipping catch-up");
                None
            }
        },
        Ok(None) => None,
        Err(error) => {
            tracing::warn!(%error, "failed to load lastTick, skipping catch-up");
            None
        }
    }
}
