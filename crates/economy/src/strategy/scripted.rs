use nftrader_core::Percent;
use nftrader_ports::DeltaStrategy;
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// Deterministic fixture: replays a scripted sequence of deltas
///
/// Once the script runs out the strategy returns zero, unless it was built
/// with [`ScriptedDeltas::cycling`], in which case it starts over.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDeltas {
    script: VecDeque<Percent>,
    cycle: bool,
}

impl ScriptedDeltas {
    pub fn new(deltas: impl IntoIterator<Item = Percent>) -> Self {
        Self {
            script: deltas.into_iter().collect(),
            cycle: false,
        }
    }

    /// Repeat the script forever
    pub fn cycling(deltas: impl IntoIterator<Item = Percent>) -> Self {
        Self {
            script: deltas.into_iter().collect(),
            cycle: true,
        }
    }

    /// Deltas not yet consumed (for a cycling script, the whole script)
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DeltaStrategy for ScriptedDeltas {
    fn next_delta(&mut self, _previous: Percent) -> Percent {
        match self.script.pop_front() {
            Some(delta) => {
                if self.cycle {
                    self.script.push_back(delta);
                }
                delta
            }
            None => Decimal::ZERO,
        }
    }

    fn name(&self) -> &str {
        "ScriptedDeltas"
    }
}
