//! Uniform random walk
//!
//! Deltas are drawn uniformly from `[-amplitude, amplitude)` in whole cents,
//! so every delta already has at most 2 decimal places and the upper bound
//! is never reached through rounding.

use nftrader_core::{Percent, round2};
use nftrader_ports::DeltaStrategy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

/// Default half-width of the delta range, in percent
pub const DEFAULT_AMPLITUDE: Decimal = dec!(10);

/// Widest half-width a walk accepts, in percent
pub const MAX_AMPLITUDE: Decimal = dec!(1000);
const MAX_AMPLITUDE_CENTS: i64 = 100_000;

/// Random walk that ignores the previous offset
pub struct RandomWalk {
    rng: StdRng,
    /// Half-width of the range in cents of a percent
    amplitude_cents: i64,
}

impl RandomWalk {
    /// Create a random walk seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            amplitude_cents: to_cents(DEFAULT_AMPLITUDE),
        }
    }

    /// Create with a specific seed for reproducible simulations
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            amplitude_cents: to_cents(DEFAULT_AMPLITUDE),
        }
    }

    /// Change the half-width of the delta range, capped at [`MAX_AMPLITUDE`]
    pub fn with_amplitude(mut self, amplitude: Decimal) -> Self {
        self.amplitude_cents = to_cents(amplitude);
        self
    }

    /// Half-width of the delta range
    pub fn amplitude(&self) -> Decimal {
        Decimal::new(self.amplitude_cents, 2)
    }

    /// Draw one sample from `[-amplitude, amplitude)`
    pub fn sample(&mut self) -> Percent {
        if self.amplitude_cents == 0 {
            return Decimal::ZERO;
        }
        let cents = self
            .rng
            .gen_range(-self.amplitude_cents..self.amplitude_cents);
        Decimal::new(cents, 2)
    }
}

impl Default for RandomWalk {
    fn default() -> Self {
        Self::new()
    }
}

impl DeltaStrategy for RandomWalk {
    fn next_delta(&mut self, _previous: Percent) -> Percent {
        self.sample()
    }

    fn name(&self) -> &str {
        "RandomWalk"
    }
}

fn to_cents(amplitude: Decimal) -> i64 {
    round2(amplitude.abs())
        .checked_mul(dec!(100))
        .and_then(|cents| cents.to_i64())
        .map_or(MAX_AMPLITUDE_CENTS, |cents| cents.min(MAX_AMPLITUDE_CENTS))
}
