use crate::analysis::telemetry::MemoryFootprint;
use crate::config::MinerConfig;
use crate::solver::{MiningReport, NonceOutcome};
use crate::store::Proof;
use std::fmt::Write;

/// Scales `bytes` down by 1024 while it stays at or above 1024: `"128KB"`.
/// Sizes below 1K keep a blank unit.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [char; 5] = [' ', 'K', 'M', 'G', 'T'];
    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024 && unit < UNITS.len() - 1 {
        value >>= 10;
        unit += 1;
    }
    format!("{}{}B", value, UNITS[unit])
}

/// The two startup lines: what is searched, and how much memory it takes.
pub fn format_banner(config: &MinerConfig, header: &str, footprint: &MemoryFootprint) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "Looking for {}-cycle on cuckoo{}(\"{}\",{}",
        config.proof_size,
        config.edge_bits + 1,
        header,
        config.nonce
    );
    if config.range > 1 {
        let _ = write!(out, "-{}", config.nonce + config.range - 1);
    }
    let _ = writeln!(out, ") with 50% edges, {} trims, {} threads", config.trims(), config.threads);
    let _ = writeln!(
        out,
        "Using {} edge and {} node memory, 4-way siphash, and 4-byte counters",
        format_bytes(footprint.edge_bytes),
        format_bytes(footprint.node_bytes)
    );
    out
}

/// `Solution` followed by the edge indices in hex.
pub fn format_solution(proof: &Proof) -> String {
    let mut out = String::from("Solution");
    for edge in &proof.edges {
        let _ = write!(out, " {:x}", edge);
    }
    out
}

pub fn format_outcome(outcome: &NonceOutcome) -> String {
    let mut out = String::new();
    if outcome.aborted {
        let _ = writeln!(
            out,
            "Nonce {} aborted after {} rounds",
            outcome.nonce,
            outcome.trim.rounds_completed()
        );
    }
    let _ = writeln!(out, "Time: {} ms", outcome.elapsed_ms);
    for proof in &outcome.proofs {
        let _ = writeln!(out, "{}", format_solution(proof));
    }
    out
}

pub fn format_report(report: &MiningReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        out.push_str(&format_outcome(outcome));
    }
    let _ = writeln!(out, "{} total solutions", report.total_solutions());
    out
}
