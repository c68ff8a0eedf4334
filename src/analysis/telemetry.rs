use crate::store::GraphParams;
use serde::{Serialize, Deserialize};

/// Bytes held by the two shared arrays of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryFootprint {
    pub edge_bytes: u64,
    pub node_bytes: u64,
}

/// Alive edges after one full round (both sides, every part).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStats {
    pub round: u32,
    pub alive: u64,
    /// Alive edges relative to the cycle-search table size. Starts far above
    /// 100 and must end below the overload threshold.
    pub load_percent: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimReport {
    pub initial_alive: u64,
    pub rounds: Vec<RoundStats>,
}

/// Final load at or above this percentage is reported as overload.
pub const OVERLOAD_PERCENT: u64 = 90;

/// Size of the table the survivors are expected to fit in.
pub fn cuckoo_size(params: &GraphParams) -> u64 {
    (2 * params.nnodes()) >> (params.part_bits + 6)
}

pub fn load_percent(alive: u64, params: &GraphParams) -> u64 {
    100 * alive / cuckoo_size(params).max(1)
}

impl TrimReport {
    pub fn new(initial_alive: u64) -> Self {
        Self { initial_alive, rounds: Vec::new() }
    }

    pub fn record(&mut self, round: u32, alive: u64, params: &GraphParams) -> RoundStats {
        let stats = RoundStats { round, alive, load_percent: load_percent(alive, params) };
        self.rounds.push(stats);
        stats
    }

    pub fn final_alive(&self) -> u64 {
        self.rounds.last().map(|r| r.alive).unwrap_or(self.initial_alive)
    }

    pub fn rounds_completed(&self) -> u32 {
        self.rounds.len() as u32
    }

    /// True if the alive count never went up from one round to the next.
    pub fn is_monotonic(&self) -> bool {
        let mut prev = self.initial_alive;
        self.rounds.iter().all(|r| {
            let ok = r.alive <= prev;
            prev = r.alive;
            ok
        })
    }
}
