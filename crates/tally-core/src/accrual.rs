//! Cost accrual math.
//!
//! One formula converts an elapsed-for-cost window into money; it is used
//! both for live cost display and for settlement at reset/bill time. The
//! only thing that varies between those call sites is which window is
//! passed in.

use crate::rate::Rate;

/// Money accrued over `elapsed_secs` at `rate`.
///
/// Returns 0 for a non-positive window or a rate whose `minutes_per_unit`
/// is the zero sentinel. No rounding is applied here; display rounding is a
/// presentation concern.
#[must_use]
pub fn accrued_cost(elapsed_secs: i64, rate: Rate) -> f64 {
    if elapsed_secs <= 0 || rate.minutes_per_unit <= 0.0 {
        return 0.0;
    }
    #[expect(
        clippy::cast_precision_loss,
        reason = "second counts stay far below f64's exact-integer range"
    )]
    let elapsed_minutes = elapsed_secs as f64 / 60.0;
    (elapsed_minutes / rate.minutes_per_unit) * rate.cost_per_unit
}
