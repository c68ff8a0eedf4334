//! Error types shared by the trimming engine, the cycle search and the driver.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MinerError {
    #[error("Header is {len} bytes, at most {max} allowed")]
    HeaderTooLong { len: usize, max: usize },
    #[error("Header is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Trimming left more edges than the cycle search is sized for.
    #[error("{survivors} edges survived trimming, cycle search capacity is {capacity}")]
    SurvivorOverflow { survivors: u64, capacity: u64 },
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Cannot read config file: {0}")]
    ConfigIo(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reasons a proof is rejected by the verifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    #[error("Proof has {actual} edges, expected {expected}")]
    WrongLength { expected: usize, actual: usize },
    #[error("Edge {edge} is outside the graph of {nedges} edges")]
    EdgeTooBig { edge: u64, nedges: u64 },
    #[error("Edges are not strictly ascending at position {position}")]
    EdgesNotAscending { position: usize },
    #[error("Endpoints do not pair up")]
    NonMatching,
    #[error("Node {node} is touched by {degree} proof edges")]
    Branch { node: u64, degree: usize },
    #[error("Node {node} is a dead end")]
    DeadEnd { node: u64 },
    #[error("Proof edges split into {components} separate cycles")]
    ShortCycle { components: usize },
}
