//! Shared per-search state: the alive-edge bitmap and the degree counters.
pub mod alive;
pub mod twice;
pub mod types;

pub use alive::AliveSet;
pub use twice::{Degree, DegreeCounters};
pub use types::{default_trims, GraphParams, NodeId, Proof, Side, HEADERLEN, MAXSOLS, PROOFSIZE};
