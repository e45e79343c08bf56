//! NFT Trader Clock Infrastructure
//!
//! Provides time sources for simulation and production:
//!
//! - [`SystemClock`]: wall-clock time
//! - [`WorldClock`]: frozen simulation time that only moves when advanced,
//!   used to make price histories deterministic
//!
//! ## Usage
//!
//! ```ignore
//! use nftrader_clock::WorldClock;
//! use chrono::{Duration, Utc};
//!
//! let world = WorldClock::fixed(Utc::now());  // Frozen time
//! world.advance(Duration::seconds(10));       // Jump forward one tick
//! ```

mod system;
mod world;

pub use system::SystemClock;
pub use world::WorldClock;

// Re-export the Clock trait for convenience
pub use nftrader_ports::Clock;
