use crate::analysis::telemetry::{RoundStats, TrimReport};
use crate::compute::context::{CancelToken, SearchContext};
use crate::compute::kernel;
use crate::oracle::EdgeOracle;
use crate::store::Side;
use rayon::prelude::*;
use rayon::ThreadPool;

/// How a trimming run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimOutcome {
    pub report: TrimReport,
    /// Set when the cancel token stopped the run before `ntrims` rounds.
    pub aborted: bool,
}

/// Runs count/prune rounds over the shared bitmap on a fixed worker pool.
///
/// Every pass is a parallel loop over worker slots; the loop returning is the
/// barrier, so no pruning decision ever reads a counter another worker is
/// still incrementing.
pub struct TrimEngine<'a, O: EdgeOracle> {
    pool: &'a ThreadPool,
    ctx: &'a SearchContext,
    oracle: &'a O,
    cancel: &'a CancelToken,
}

impl<'a, O: EdgeOracle> TrimEngine<'a, O> {
    pub fn new(pool: &'a ThreadPool, ctx: &'a SearchContext, oracle: &'a O, cancel: &'a CancelToken) -> Self {
        Self { pool, ctx, oracle, cancel }
    }

    pub fn run(&self, ntrims: u32) -> TrimOutcome {
        self.run_with(ntrims, |_| {})
    }

    /// Like [`run`](Self::run), calling `on_round` after each completed round.
    pub fn run_with(&self, ntrims: u32, mut on_round: impl FnMut(&RoundStats)) -> TrimOutcome {
        let params = *self.ctx.params();
        let mut report = TrimReport::new(self.ctx.alive.count());

        for round in 1..=ntrims {
            if self.cancel.is_cancelled() {
                tracing::info!(round, "trimming cancelled");
                return TrimOutcome { report, aborted: true };
            }
            for side in Side::BOTH {
                for part in 0..params.nparts() {
                    self.trim_pass(side, part);
                }
            }
            let stats = report.record(round, self.ctx.alive.count(), &params);
            tracing::debug!(round, alive = stats.alive, load = stats.load_percent, "round complete");
            on_round(&stats);
        }

        TrimOutcome { report, aborted: false }
    }

    /// One count + prune over the nodes of `side` in sub-partition `part`.
    fn trim_pass(&self, side: Side, part: u64) {
        let ctx = self.ctx;
        let oracle = self.oracle;
        self.pool.install(|| {
            let nworkers = rayon::current_num_threads();
            ctx.counters.par_clear();
            (0..nworkers).into_par_iter().for_each(|worker| {
                kernel::count_degrees(ctx, oracle, worker, nworkers, side, part);
            });
            (0..nworkers).into_par_iter().for_each(|worker| {
                kernel::kill_leaves(ctx, oracle, worker, nworkers, side, part);
            });
        });
    }
}
