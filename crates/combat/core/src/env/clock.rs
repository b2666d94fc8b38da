//! Clock oracle used to timestamp combat log entries.

/// Source of wall-clock timestamps (milliseconds since the Unix epoch).
///
/// Timestamps are informational only; ordering of log entries is carried by
/// their sequential ids, never by time.
pub trait ClockOracle: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Clock that always reports the same instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl ClockOracle for FixedClock {
    fn now_millis(&self) -> u64 {
        self.0
    }
}

/// Clock backed by [`std::time::SystemTime`].
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl ClockOracle for SystemClock {
    fn now_millis(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default()
    }
}
