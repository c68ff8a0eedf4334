// Lean cuckoo-cycle miner core.
// A one-bit-per-edge alive bitmap and 2-bit node counters drive parallel
// leaf trimming; an exact-length cycle search runs over what survives.

pub mod analysis;
pub mod compute;
pub mod config;
pub mod display;
pub mod error;
pub mod oracle;
pub mod solver;
pub mod store;

// Python bindings (`_core` module), built with `--features extension-module`.
#[cfg(feature = "python")]
mod bindings;

pub use analysis::verify;
pub use compute::CancelToken;
pub use config::MinerConfig;
pub use error::{MinerError, VerifyError};
pub use oracle::{EdgeOracle, SipOracle};
pub use solver::{Miner, MiningReport, NonceOutcome};
pub use store::{GraphParams, Proof};
