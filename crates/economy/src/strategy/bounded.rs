use nftrader_core::{Percent, round2};
use nftrader_ports::DeltaStrategy;
use rust_decimal::Decimal;

/// Keeps another strategy's walk inside `[floor, ceiling]`
///
/// The inner delta is applied and the resulting offset clamped; the
/// returned delta is whatever moves the offset to the clamped value.
pub struct BoundedWalk<S> {
    inner: S,
    floor: Percent,
    ceiling: Percent,
}

impl<S: DeltaStrategy> BoundedWalk<S> {
    /// Wrap `inner`; swapped bounds are reordered
    pub fn new(inner: S, floor: Percent, ceiling: Percent) -> Self {
        let (floor, ceiling) = if floor <= ceiling {
            (floor, ceiling)
        } else {
            (ceiling, floor)
        };
        Self {
            inner,
            floor,
            ceiling,
        }
    }

    pub fn bounds(&self) -> (Percent, Percent) {
        (self.floor, self.ceiling)
    }
}

impl<S: DeltaStrategy> DeltaStrategy for BoundedWalk<S> {
    fn next_delta(&mut self, previous: Percent) -> Percent {
        let target = previous + self.inner.next_delta(previous);
        let clamped: Decimal = target.clamp(self.floor, self.ceiling);
        round2(clamped - previous)
    }

    fn name(&self) -> &str {
        "BoundedWalk"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{RandomWalk, ScriptedDeltas};
    use rust_decimal_macros::dec;

    #[test]
    fn test_clamps_at_ceiling_and_floor() {
        let script = ScriptedDeltas::new([dec!(8), dec!(8), dec!(-30)]);
        let mut bounded = BoundedWalk::new(script, dec!(-15), dec!(12));

        assert_eq!(bounded.next_delta(dec!(0)), dec!(8));
        assert_eq!(bounded.next_delta(dec!(8)), dec!(4));
        assert_eq!(bounded.next_delta(dec!(12)), dec!(-27));
    }

    #[test]
    fn test_random_walk_stays_in_band() {
        let mut bounded = BoundedWalk::new(RandomWalk::with_seed(5), dec!(-20), dec!(20));
        let mut offset = dec!(0);
        for _ in 0..5_000 {
            offset += bounded.next_delta(offset);
            assert!(offset >= dec!(-20) && offset <= dec!(20));
        }
    }

    #[test]
    fn test_swapped_bounds() {
        let bounded = BoundedWalk::new(ScriptedDeltas::default(), dec!(5), dec!(-5));
        assert_eq!(bounded.bounds(), (dec!(-5), dec!(5)));
    }
}
