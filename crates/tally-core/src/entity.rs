//! Timer and stopwatch entities and their per-entity state machine.
//!
//! All transitions are total: an operation that is illegal in the current
//! status is a no-op and reports `false`, so the ledger never has to handle
//! a business-rule error.
//!
//! # Cost anchors
//!
//! Each entity carries a `cost_anchor`: the time value at the last point its
//! accrued cost was settled (creation, reset, or bill). The unbanked accrual
//! window is the distance between the anchor and the current time value,
//! which keeps "time shown on the clock" independent from "time owed". A
//! pause/resume cycle never moves the anchor, so pausing does not restart
//! the billing window.

use crate::types::{EntityId, PresetId, Status};

/// A countdown timer for one station.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerEntity {
    pub id: EntityId,
    pub name: String,
    /// Full duration in seconds the countdown starts from.
    pub initial_duration: i64,
    /// Seconds left on the clock, `0..=initial_duration`.
    pub remaining_time: i64,
    pub status: Status,
    /// `remaining_time` at the last settlement point.
    pub cost_anchor: i64,
    pub preset_id: Option<PresetId>,
}

impl TimerEntity {
    pub fn new(name: impl Into<String>, duration: i64) -> Self {
        let duration = duration.max(0);
        Self {
            id: EntityId::generate(),
            name: name.into(),
            initial_duration: duration,
            remaining_time: duration,
            status: Status::Stopped,
            cost_anchor: duration,
            preset_id: None,
        }
    }

    /// Seconds of unbanked accrual on this timer.
    #[must_use]
    pub const fn elapsed_for_cost(&self) -> i64 {
        self.cost_anchor - self.remaining_time
    }

    /// Starts the countdown. The anchor is left alone, so accrual resumes
    /// from where it stood.
    ///
    /// Starting a Finished timer is permitted here; callers that want the
    /// original "play disabled at zero" behavior guard on `remaining_time`
    /// themselves.
    pub fn start(&mut self) -> bool {
        match self.status {
            Status::Stopped | Status::Paused | Status::Finished => {
                self.status = Status::Running;
                true
            }
            Status::Running => false,
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.status == Status::Running {
            self.status = Status::Paused;
            true
        } else {
            false
        }
    }

    /// Advances the clock by `secs` one-second ticks.
    ///
    /// Only Running timers move. The countdown clamps at zero and flips to
    /// Finished exactly once; once Finished, further ticks are no-ops.
    pub fn advance(&mut self, secs: i64) {
        if self.status != Status::Running || secs <= 0 {
            return;
        }
        self.remaining_time = (self.remaining_time - secs).max(0);
        if self.remaining_time == 0 {
            self.status = Status::Finished;
        }
    }

    /// Puts the timer back to its full, stopped starting state and
    /// re-anchors. Settlement of the open window is the ledger's job and
    /// must happen before this.
    pub const fn reinitialize(&mut self) {
        self.status = Status::Stopped;
        self.remaining_time = self.initial_duration;
        self.cost_anchor = self.initial_duration;
    }

    /// Re-arms the timer with a new duration. Only legal while Stopped,
    /// where no open accrual can exist.
    pub fn rearm(&mut self, duration: i64) -> bool {
        if self.status != Status::Stopped || duration < 0 {
            return false;
        }
        self.initial_duration = duration;
        self.remaining_time = duration;
        self.cost_anchor = duration;
        true
    }
}

/// A count-up stopwatch for one station.
#[derive(Debug, Clone, PartialEq)]
pub struct StopwatchEntity {
    pub id: EntityId,
    pub name: String,
    /// Seconds on the clock since the last reset.
    pub elapsed_time: i64,
    /// Lap snapshots of `elapsed_time`, oldest first.
    pub laps: Vec<i64>,
    pub status: Status,
    /// `elapsed_time` at the last settlement point.
    pub cost_anchor: i64,
    pub preset_id: Option<PresetId>,
}

impl StopwatchEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::generate(),
            name: name.into(),
            elapsed_time: 0,
            laps: Vec::new(),
            status: Status::Stopped,
            cost_anchor: 0,
            preset_id: None,
        }
    }

    /// Seconds of unbanked accrual on this stopwatch.
    #[must_use]
    pub const fn elapsed_for_cost(&self) -> i64 {
        self.elapsed_time - self.cost_anchor
    }

    pub fn start(&mut self) -> bool {
        match self.status {
            Status::Stopped | Status::Paused => {
                self.status = Status::Running;
                true
            }
            // Stopwatches never reach Finished.
            Status::Running | Status::Finished => false,
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.status == Status::Running {
            self.status = Status::Paused;
            true
        } else {
            false
        }
    }

    /// Advances the clock by `secs` one-second ticks while Running.
    pub const fn advance(&mut self, secs: i64) {
        if matches!(self.status, Status::Running) && secs > 0 {
            self.elapsed_time += secs;
        }
    }

    /// Records a lap snapshot. Only legal while Running; laps are
    /// append-only and never reordered.
    pub fn lap(&mut self) -> bool {
        if self.status == Status::Running {
            self.laps.push(self.elapsed_time);
            true
        } else {
            false
        }
    }

    /// Puts the stopwatch back to zero, stopped, with laps cleared and the
    /// anchor re-zeroed. Settlement happens in the ledger beforehand.
    pub fn reinitialize(&mut self) {
        self.status = Status::Stopped;
        self.elapsed_time = 0;
        self.laps.clear();
        self.cost_anchor = 0;
    }
}
