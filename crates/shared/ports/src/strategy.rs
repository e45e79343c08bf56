use nftrader_core::Percent;

/// Port for the per-tick change of an asset's percentage offset
///
/// The economy engine only ever calls `next_delta`; any rule that can
/// produce the next delta from the previous offset can drive it:
/// - Uniform random walk (default)
/// - Scripted sequence for deterministic tests
/// - Mean-reverting or bounded walks
pub trait DeltaStrategy: Send {
    /// Produce the next delta given the asset's previous offset
    ///
    /// Must return a finite value rounded to 2 decimal places.
    fn next_delta(&mut self, previous: Percent) -> Percent;

    /// Strategy name for logging
    fn name(&self) -> &str {
        "DeltaStrategy"
    }
}

impl<S: DeltaStrategy + ?Sized> DeltaStrategy for Box<S> {
    fn next_delta(&mut self, previous: Percent) -> Percent {
        (**self).next_delta(previous)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
