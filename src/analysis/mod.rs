//! Everything that runs after trimming: telemetry, cycle search and proof checks.
pub mod cycles;
pub mod telemetry;
pub mod verify;

pub use cycles::{CycleSearch, CycleSearchResult, CycleStats};
pub use telemetry::{MemoryFootprint, RoundStats, TrimReport, OVERLOAD_PERCENT};
pub use verify::verify;
