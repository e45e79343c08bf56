//! Economy configuration

use nftrader_ports::DeltaStrategy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::engine::MAX_HISTORY_POINTS;
use crate::error::{EconomyError, Result};
use crate::strategy::{BoundedWalk, DEFAULT_AMPLITUDE, MAX_AMPLITUDE, MeanReverting, RandomWalk};

/// Which delta strategy to build, and with what parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyKind {
    /// Uniform walk over `[-10, 10)`, no reversion, no bound
    RandomWalk {
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Random noise plus a pull back towards zero
    MeanReverting {
        /// Fraction of the previous offset removed each tick (0..=1)
        reversion: Decimal,
        /// Half-width of the noise range
        amplitude: Decimal,
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Random walk clamped to a band
    Bounded {
        floor: Decimal,
        ceiling: Decimal,
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl Default for StrategyKind {
    fn default() -> Self {
        StrategyKind::RandomWalk { seed: None }
    }
}

impl StrategyKind {
    /// Strategy by name with default parameters
    ///
    /// Accepts `random_walk`, `mean_reverting` and `bounded`.
    pub fn named(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "random_walk" | "random" => Some(StrategyKind::RandomWalk { seed: None }),
            "mean_reverting" => Some(StrategyKind::MeanReverting {
                reversion: DEFAULT_REVERSION,
                amplitude: DEFAULT_AMPLITUDE,
                seed: None,
            }),
            "bounded" => Some(StrategyKind::Bounded {
                floor: DEFAULT_BAND.0,
                ceiling: DEFAULT_BAND.1,
                seed: None,
            }),
            _ => None,
        }
    }

    /// Same strategy with its random source seeded
    pub fn seeded(self, seed: u64) -> Self {
        match self {
            StrategyKind::RandomWalk { .. } => StrategyKind::RandomWalk { seed: Some(seed) },
            StrategyKind::MeanReverting {
                reversion,
                amplitude,
                ..
            } => StrategyKind::MeanReverting {
                reversion,
                amplitude,
                seed: Some(seed),
            },
            StrategyKind::Bounded { floor, ceiling, .. } => StrategyKind::Bounded {
                floor,
                ceiling,
                seed: Some(seed),
            },
        }
    }

    /// Build the configured strategy
    pub fn build(&self) -> Box<dyn DeltaStrategy> {
        match self {
            StrategyKind::RandomWalk { seed } => Box::new(random_walk(*seed)),
            StrategyKind::MeanReverting {
                reversion,
                amplitude,
                seed,
            } => Box::new(MeanReverting::new(
                *reversion,
                random_walk(*seed).with_amplitude(*amplitude),
            )),
            StrategyKind::Bounded {
                floor,
                ceiling,
                seed,
            } => Box::new(BoundedWalk::new(random_walk(*seed), *floor, *ceiling)),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            StrategyKind::RandomWalk { .. } => Ok(()),
            StrategyKind::MeanReverting {
                reversion,
                amplitude,
                ..
            } => {
                if *reversion < Decimal::ZERO || *reversion > Decimal::ONE {
                    return Err(EconomyError::InvalidConfig(format!(
                        "reversion must be within 0..=1, got {}",
                        reversion
                    )));
                }
                if amplitude.is_sign_negative() && !amplitude.is_zero() {
                    return Err(EconomyError::InvalidConfig(format!(
                        "amplitude must not be negative, got {}",
                        amplitude
                    )));
                }
                if *amplitude > MAX_AMPLITUDE {
                    return Err(EconomyError::InvalidConfig(format!(
                        "amplitude must not exceed {}, got {}",
                        MAX_AMPLITUDE, amplitude
                    )));
                }
                Ok(())
            }
            StrategyKind::Bounded { floor, ceiling, .. } => {
                if floor > ceiling {
                    return Err(EconomyError::InvalidConfig(format!(
                        "floor {} is above ceiling {}",
                        floor, ceiling
                    )));
                }
                Ok(())
            }
        }
    }
}

fn random_walk(seed: Option<u64>) -> RandomWalk {
    match seed {
        Some(seed) => RandomWalk::with_seed(seed),
        None => RandomWalk::new(),
    }
}

/// Configuration for the economy engine and its ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Time between ticks (ms)
    pub tick_interval_ms: u64,
    /// Price samples kept per asset
    pub max_history_points: usize,
    /// Delta strategy
    pub strategy: StrategyKind,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 10_000,
            max_history_points: MAX_HISTORY_POINTS,
            strategy: StrategyKind::default(),
        }
    }
}

impl EconomyConfig {
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_max_history_points(mut self, points: usize) -> Self {
        self.max_history_points = points;
        self
    }

    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.strategy = strategy;
        self
    }

    /// Seed the configured strategy, for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.strategy = self.strategy.seeded(seed);
        self
    }

    /// Time between ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Check the configuration before starting an economy
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(EconomyError::InvalidConfig(
                "tick interval must be greater than zero".to_string(),
            ));
        }
        if self.max_history_points == 0 {
            return Err(EconomyError::InvalidConfig(
                "history must keep at least one point".to_string(),
            ));
        }
        self.strategy.validate()
    }
}

/// Default band for a bounded walk
pub const DEFAULT_BAND: (Decimal, Decimal) = (dec!(-50), dec!(50));

/// Default pull towards zero for a mean-reverting walk
pub const DEFAULT_REVERSION: Decimal = dec!(0.1);
