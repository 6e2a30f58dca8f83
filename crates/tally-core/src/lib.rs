//! Core billing-by-time engine for station tracking.
//!
//! This crate contains the fundamental types and logic for:
//! - Accrual: converting elapsed time into money at a billing rate
//! - Pricing: default rate plus named per-game preset overrides
//! - The session ledger: timers, stopwatches, banked earnings, and the
//!   billing history, with the cost-anchor bookkeeping that keeps
//!   pause/resume/reset/bill cycles from double-charging or losing time

pub mod accrual;
pub mod entity;
pub mod ledger;
pub mod persist;
pub mod rate;
pub mod types;

pub use accrual::accrued_cost;
pub use entity::{StopwatchEntity, TimerEntity};
pub use ledger::{BillOutcome, BillingRecord, SessionLedger};
pub use rate::{GamePreset, Rate, resolve};
pub use types::{EntityId, PresetId, RecordId, Status, ValidationError};
