//! Progress reporting for propagation passes.
//!
//! A graph with an observer announces each top-level pass (`begin`), every
//! output recomputation inside it (`step`) and its end (`finish`). The
//! estimate handed to `begin` is the number of outputs reachable from the pass's
//! source; cycles can make `current` exceed it, in which case `max` grows along.

use std::sync::{Arc, Mutex, PoisonError};

use crate::connector::ConnectorId;

/// Snapshot of a running pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Recomputations so far in this pass.
    pub current: usize,
    /// Estimated total; never below `current`.
    pub max: usize,
    /// Output that was just recomputed.
    pub connector: ConnectorId,
}

impl Progress {
    /// Fraction complete in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.max == 0 {
            1.0
        } else {
            self.current as f64 / self.max as f64
        }
    }
}

/// Receives propagation progress. Observers cannot influence propagation.
pub trait ProgressObserver {
    /// A pass started.
    fn begin(&mut self, _label: &'static str, _estimate: usize) {}

    /// An output was recomputed.
    fn step(&mut self, progress: Progress);

    /// The pass ended after `recomputed` recomputations.
    fn finish(&mut self, _recomputed: usize) {}
}

/// Summary of one finished pass, as recorded by [`ProgressCounter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassRecord {
    /// Operation that started the pass.
    pub label: &'static str,
    /// Estimate reported at the start.
    pub estimate: usize,
    /// Recomputations performed.
    pub recomputed: usize,
}

/// Observer that records every pass.
///
/// Clones share one log, so a clone can be handed to the graph while the
/// original is kept for inspection.
#[derive(Clone, Debug, Default)]
pub struct ProgressCounter {
    log: Arc<Mutex<Vec<PassRecord>>>,
}

impl ProgressCounter {
    /// Creates an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finished and running passes, oldest first.
    pub fn passes(&self) -> Vec<PassRecord> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Total recomputations across all recorded passes.
    pub fn total_recomputed(&self) -> usize {
        self.passes().iter().map(|p| p.recomputed).sum()
    }
}

impl ProgressObserver for ProgressCounter {
    fn begin(&mut self, label: &'static str, estimate: usize) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(PassRecord {
                label,
                estimate,
                recomputed: 0,
            });
    }

    fn step(&mut self, progress: Progress) {
        if let Some(last) = self
            .log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last_mut()
        {
            last.recomputed = progress.current;
        }
    }
}
