//! The trimming engine: repeated count/prune passes over the alive bitmap.
pub mod context;
pub mod engine;
pub mod kernel;

pub use context::{CancelToken, SearchContext};
pub use engine::{TrimEngine, TrimOutcome};
