//! Trend indicators for presentation
//!
//! Consumers poll prices and histories; these helpers summarise them for
//! up/down arrows and sparklines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PricePoint;
use crate::values::Price;

/// Direction of a price relative to a reference price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    /// Compare `current` against `reference`
    pub fn between(reference: Price, current: Price) -> Self {
        match current.cmp(&reference) {
            std::cmp::Ordering::Greater => Trend::Up,
            std::cmp::Ordering::Less => Trend::Down,
            std::cmp::Ordering::Equal => Trend::Flat,
        }
    }

    /// Single-character arrow for terminal output
    pub fn arrow(&self) -> char {
        match self {
            Trend::Up => '▲',
            Trend::Down => '▼',
            Trend::Flat => '→',
        }
    }
}

/// Summary of a price history, enough to scale a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sparkline {
    pub first: Price,
    pub last: Price,
    pub min: Price,
    pub max: Price,
    pub points: usize,
}

impl Sparkline {
    /// Summarise a history; `None` when there is nothing to draw
    pub fn from_history(history: &[PricePoint]) -> Option<Self> {
        let first = history.first()?.price;
        let last = history.last()?.price;
        let (min, max) = history
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(p.price), hi.max(p.price)));

        Some(Self {
            first,
            last,
            min,
            max,
            points: history.len(),
        })
    }

    /// Distance between highest and lowest sample
    pub fn span(&self) -> Price {
        self.max - self.min
    }

    /// Trend from first to last sample
    pub fn trend(&self) -> Trend {
        Trend::between(self.first, self.last)
    }

    /// Position of `price` within the range, 0 = min and 1 = max
    ///
    /// A flat history maps everything to 0.
    pub fn normalize(&self, price: Price) -> Decimal {
        let span = self.span();
        if span.is_zero() {
            return Decimal::ZERO;
        }
        (price - self.min) / span
    }
}
