//! context.rs
//! The exclusively owned state of one search, plus its cancellation signal.

use crate::analysis::telemetry::MemoryFootprint;
use crate::store::{AliveSet, DegreeCounters, GraphParams};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Bitmap and counters for one nonce at a time. Allocated once per driver
/// and reset between nonces.
#[derive(Debug)]
pub struct SearchContext {
    params: GraphParams,
    pub alive: AliveSet,
    pub counters: DegreeCounters,
}

impl SearchContext {
    pub fn new(params: GraphParams) -> Self {
        Self {
            alive: AliveSet::new(params.nedges()),
            counters: DegreeCounters::new(params.counters_per_part()),
            params,
        }
    }

    pub fn params(&self) -> &GraphParams { &self.params }

    /// Every edge alive, every counter zero.
    pub fn reset(&mut self) {
        self.alive.revive_all();
        self.counters.clear();
    }

    pub fn footprint(&self) -> MemoryFootprint {
        MemoryFootprint {
            edge_bytes: self.params.nedges() / 8,
            node_bytes: self.counters.byte_size(),
        }
    }
}

/// Cooperative abort flag. Checked at round boundaries only, so a cancelled
/// search always stops with the bitmap in a fully pruned state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self { Self::default() }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Re-arms the token for the next run.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}
