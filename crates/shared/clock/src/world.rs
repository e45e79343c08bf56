use chrono::Duration;
use nftrader_core::Timestamp;
use nftrader_ports::Clock;
use std::sync::{Arc, PoisonError, RwLock};

/// Simulation clock - the source of truth for time in a simulation
///
/// Frozen at a chosen instant and only moved by [`WorldClock::advance`].
/// Every price sample the economy records is stamped with this clock, so
/// tests get reproducible histories.
#[derive(Debug)]
pub struct WorldClock {
    current_time: RwLock<Timestamp>,
}

impl WorldClock {
    /// Create a frozen clock at the given time
    pub fn fixed(at: Timestamp) -> Arc<Self> {
        Arc::new(Self {
            current_time: RwLock::new(at),
        })
    }

    /// Move simulated time forward by `duration`
    pub fn advance(&self, duration: Duration) {
        let mut now = self
            .current_time
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *now += duration;
    }
}

impl Clock for WorldClock {
    fn now(&self) -> Timestamp {
        *self
            .current_time
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn name(&self) -> &str {
        "WorldClock"
    }
}
