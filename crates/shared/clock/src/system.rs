use chrono::Utc;
use nftrader_core::Timestamp;
use nftrader_ports::Clock;

/// Wall-clock time, for live runs
///
/// Price samples stamped with this clock are not reproducible; tests that
/// compare timestamps use [`crate::WorldClock`] instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}
