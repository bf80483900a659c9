use std::time::Duration;

/// Elapsed time as whole seconds, rounded to the nearest second.
pub fn rounded_seconds(elapsed: Duration) -> u64 {
    (elapsed.as_millis() as f64 / 1000.0).round() as u64
}
