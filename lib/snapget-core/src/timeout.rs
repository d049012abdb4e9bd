//! Timeout conversion.

use std::time::Duration;

/// Convert a timeout in fractional seconds into a whole-call bound.
///
/// The value is truncated to whole milliseconds. Zero, negative and NaN
/// values, as well as anything below one millisecond, mean "no timeout".
#[must_use]
pub fn timeout_from_secs_f64(seconds: f64) -> Option<Duration> {
    if seconds.is_nan() || seconds <= 0.0 {
        return None;
    }

    let millis = (seconds * 1000.0).trunc();
    if millis < 1.0 {
        return None;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let millis = if millis >= u64::MAX as f64 {
        u64::MAX
    } else {
        millis as u64
    };
    Some(Duration::from_millis(millis))
}
