//! Delta-generation strategies
//!
//! Each strategy implements [`DeltaStrategy`]: given the previous offset of
//! an asset, produce the change to apply on this tick. The engine adds the
//! delta to the previous offset; strategies never see prices.

mod bounded;
mod mean_reverting;
mod random_walk;
mod scripted;

pub use bounded::BoundedWalk;
pub use mean_reverting::MeanReverting;
pub use random_walk::{DEFAULT_AMPLITUDE, MAX_AMPLITUDE, RandomWalk};
pub use scripted::ScriptedDeltas;

pub use nftrader_ports::DeltaStrategy;
