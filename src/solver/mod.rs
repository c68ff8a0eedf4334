//! Runs the trim-then-search pipeline over a range of nonces.
pub mod miner;

pub use miner::{Miner, MiningReport, NonceOutcome};
