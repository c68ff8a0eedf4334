use crate::analysis::cycles::{CycleSearch, CycleStats};
use crate::analysis::telemetry::{MemoryFootprint, TrimReport, OVERLOAD_PERCENT};
use crate::compute::{CancelToken, SearchContext, TrimEngine};
use crate::config::MinerConfig;
use crate::error::MinerError;
use crate::oracle::{EdgeOracle, SipOracle};
use crate::store::{GraphParams, Proof};
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Everything one nonce produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceOutcome {
    pub nonce: u32,
    pub trim: TrimReport,
    /// The cancel token fired during trimming; no cycle search was run.
    pub aborted: bool,
    pub proofs: Vec<Proof>,
    pub cycle_stats: CycleStats,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningReport {
    pub outcomes: Vec<NonceOutcome>,
    /// Proofs kept across the range, in nonce order, within the caller's capacity.
    pub proofs: Vec<Proof>,
    pub aborted: bool,
}

impl MiningReport {
    pub fn total_solutions(&self) -> usize {
        self.proofs.len()
    }
}

/// Drives trimming and cycle search over a nonce range.
///
/// The worker pool and the bitmap/counter arrays are allocated once and
/// reused for every nonce.
pub struct Miner {
    config: MinerConfig,
    pool: ThreadPool,
    ctx: SearchContext,
    cancel: CancelToken,
}

impl Miner {
    pub fn new(config: MinerConfig) -> Result<Self, MinerError> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|i| format!("trimmer-{i}"))
            .build()?;
        let ctx = SearchContext::new(config.graph_params());
        Ok(Self { config, pool, ctx, cancel: CancelToken::new() })
    }

    pub fn config(&self) -> &MinerConfig { &self.config }

    pub fn params(&self) -> &GraphParams { self.ctx.params() }

    /// Moves the nonce window searched by [`mine`](Self::mine).
    pub fn set_range(&mut self, nonce: u32, range: u32) -> Result<(), MinerError> {
        let config = MinerConfig { nonce, range, ..self.config.clone() };
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// A handle that stops the current search at its next round boundary.
    /// A fired token stays set until the caller resets it.
    pub fn cancel_token(&self) -> CancelToken { self.cancel.clone() }

    pub fn footprint(&self) -> MemoryFootprint { self.ctx.footprint() }

    /// Edges alive after the most recent search, ascending.
    pub fn survivors(&self) -> Vec<u64> {
        self.ctx.alive.iter().collect()
    }

    /// Trims the graph given by `oracle` and searches what survives.
    pub fn search<O: EdgeOracle>(&mut self, oracle: &O, nonce: u32) -> Result<NonceOutcome, MinerError> {
        let started = Instant::now();
        self.ctx.reset();

        let trimmed = TrimEngine::new(&self.pool, &self.ctx, oracle, &self.cancel).run(self.config.trims());
        if trimmed.aborted {
            return Ok(NonceOutcome {
                nonce,
                trim: trimmed.report,
                aborted: true,
                proofs: Vec::new(),
                cycle_stats: CycleStats::default(),
                elapsed_ms: started.elapsed().as_millis() as u64,
            });
        }

        if let Some(last) = trimmed.report.rounds.last() {
            if last.load_percent >= OVERLOAD_PERCENT {
                tracing::warn!(nonce, load = last.load_percent, "survivor load near cuckoo table capacity");
            }
        }

        let found = CycleSearch::build(
            oracle,
            &self.ctx.alive,
            self.config.proof_size,
            self.config.max_sols,
            self.config.survivor_capacity(),
        )?
        .run();
        let proofs: Vec<Proof> = found.cycles.into_iter().map(|edges| Proof::new(nonce, edges)).collect();

        let elapsed_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            nonce,
            survivors = found.stats.survivors,
            proofs = proofs.len(),
            elapsed_ms,
            "nonce searched"
        );
        Ok(NonceOutcome {
            nonce,
            trim: trimmed.report,
            aborted: false,
            proofs,
            cycle_stats: found.stats,
            elapsed_ms,
        })
    }

    pub fn solve_nonce(&mut self, header: &[u8], nonce: u32) -> Result<NonceOutcome, MinerError> {
        let oracle = SipOracle::from_header(header, nonce, self.ctx.params())?;
        self.search(&oracle, nonce)
    }

    /// Searches `[nonce, nonce + range)` from the config, keeping at most
    /// `capacity` proofs overall. Stops early once capacity is filled or the
    /// cancel token fires.
    pub fn mine(&mut self, header: &[u8], capacity: Option<usize>) -> Result<MiningReport, MinerError> {
        let mut report = MiningReport::default();
        let capacity = capacity.unwrap_or(usize::MAX);
        let first = self.config.nonce;

        for nonce in first..first + self.config.range {
            if report.proofs.len() >= capacity {
                break;
            }
            if self.cancel.is_cancelled() {
                report.aborted = true;
                break;
            }

            let mut outcome = self.solve_nonce(header, nonce)?;
            outcome.proofs.truncate(capacity - report.proofs.len());
            report.proofs.extend(outcome.proofs.iter().cloned());
            let aborted = outcome.aborted;
            report.outcomes.push(outcome);
            if aborted {
                report.aborted = true;
                break;
            }
        }
        Ok(report)
    }
}
