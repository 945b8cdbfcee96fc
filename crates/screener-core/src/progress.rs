//! Progress reporting for batch computations.

use crate::types::Symbol;

/// Observer notified as a batch walks its tickers.
///
/// Any `Fn(usize, usize, &Symbol)` closure is an observer.
pub trait ProgressObserver: Send + Sync {
    /// Called before `symbol` is processed. `index` is 1-based.
    fn on_progress(&self, index: usize, total: usize, symbol: &Symbol);

    /// Called once after the last ticker.
    fn on_finish(&self) {}
}

impl<F> ProgressObserver for F
where
    F: Fn(usize, usize, &Symbol) + Send + Sync,
{
    fn on_progress(&self, index: usize, total: usize, symbol: &Symbol) {
        self(index, total, symbol);
    }
}

/// Observer that ignores every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _index: usize, _total: usize, _symbol: &Symbol) {}
}
