use nftrader_core::{Percent, round2};
use nftrader_ports::DeltaStrategy;
use rust_decimal::Decimal;

use super::RandomWalk;

/// Walk that pulls the offset back towards zero
///
/// `delta = round2(-previous * reversion + noise)` where the noise is a
/// uniform draw from `[-amplitude, amplitude)`. A reversion of 0 behaves like
/// a plain random walk; 1 snaps back to zero before adding noise.
pub struct MeanReverting {
    reversion: Decimal,
    noise: RandomWalk,
}

impl MeanReverting {
    pub fn new(reversion: Decimal, noise: RandomWalk) -> Self {
        Self {
            reversion: reversion.clamp(Decimal::ZERO, Decimal::ONE),
            noise,
        }
    }

    pub fn reversion(&self) -> Decimal {
        self.reversion
    }
}

impl DeltaStrategy for MeanReverting {
    fn next_delta(&mut self, previous: Percent) -> Percent {
        let pull = -previous * self.reversion;
        round2(pull + self.noise.sample())
    }

    fn name(&self) -> &str {
        "MeanReverting"
    }
}
