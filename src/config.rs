//! Miner configuration.
//!
//! Every field has a default, so a JSON file only needs the values it
//! changes. Command line flags are applied on top by the binary.

use crate::analysis::telemetry::cuckoo_size;
use crate::error::MinerError;
use crate::store::{default_trims, GraphParams, MAXSOLS, PROOFSIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    pub threads: usize,
    /// Rounds of trimming; `None` picks the default for `part_bits`.
    pub ntrims: Option<u32>,
    pub nonce: u32,
    pub range: u32,
    pub edge_bits: u32,
    pub part_bits: u32,
    pub proof_size: usize,
    pub max_sols: usize,
    /// Survivors the cycle search accepts; `None` means the cuckoo table size
    /// of the unpartitioned graph. The survivor set after `ntrims` rounds does
    /// not depend on `part_bits`, so neither does the default.
    pub max_survivors: Option<u64>,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            ntrims: None,
            nonce: 0,
            range: 1,
            edge_bits: 20,
            part_bits: 0,
            proof_size: PROOFSIZE,
            max_sols: MAXSOLS,
            max_survivors: None,
        }
    }
}

impl MinerConfig {
    pub fn from_json_str(s: &str) -> Result<Self, MinerError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, MinerError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded miner config");
        Ok(config)
    }

    pub fn graph_params(&self) -> GraphParams {
        GraphParams::new(self.edge_bits, self.part_bits, self.proof_size)
    }

    pub fn trims(&self) -> u32 {
        self.ntrims.unwrap_or_else(|| default_trims(self.part_bits))
    }

    pub fn survivor_capacity(&self) -> u64 {
        self.max_survivors
            .unwrap_or_else(|| cuckoo_size(&GraphParams { part_bits: 0, ..self.graph_params() }))
    }

    pub fn validate(&self) -> Result<(), MinerError> {
        let invalid = |msg: String| -> Result<(), MinerError> { Err(MinerError::InvalidConfig(msg)) };
        if self.threads == 0 {
            return invalid("threads must be at least 1".into());
        }
        if !(1..=32).contains(&self.edge_bits) {
            return invalid(format!("edge_bits must be in 1..=32, got {}", self.edge_bits));
        }
        if self.part_bits > self.edge_bits {
            return invalid(format!(
                "part_bits ({}) cannot exceed edge_bits ({})",
                self.part_bits, self.edge_bits
            ));
        }
        if self.proof_size < 2 || self.proof_size % 2 != 0 {
            return invalid(format!("proof_size must be even and at least 2, got {}", self.proof_size));
        }
        if self.max_sols == 0 {
            return invalid("max_sols must be at least 1".into());
        }
        if self.nonce.checked_add(self.range).is_none() {
            return invalid(format!("nonce range {}+{} overflows u32", self.nonce, self.range));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = MinerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trims(), 14);
        assert_eq!(config.survivor_capacity(), 32768);
    }

    #[test]
    fn test_default_capacity_ignores_partitions() {
        let whole = MinerConfig { edge_bits: 12, ..Default::default() };
        let split = MinerConfig { edge_bits: 12, part_bits: 3, ..Default::default() };
        assert_eq!(split.survivor_capacity(), whole.survivor_capacity());
        assert_eq!(split.survivor_capacity(), 128);
    }

    #[test]
    fn test_full_width_partitions_are_accepted() {
        let config = MinerConfig { edge_bits: 32, part_bits: 32, ..Default::default() };
        assert!(config.validate().is_ok());
        assert_eq!(config.graph_params().nparts(), 1u64 << 32);
    }

    #[rstest]
    #[case(MinerConfig { threads: 0, ..Default::default() })]
    #[case(MinerConfig { edge_bits: 0, ..Default::default() })]
    #[case(MinerConfig { edge_bits: 33, ..Default::default() })]
    #[case(MinerConfig { edge_bits: 10, part_bits: 11, ..Default::default() })]
    #[case(MinerConfig { proof_size: 41, ..Default::default() })]
    #[case(MinerConfig { proof_size: 0, ..Default::default() })]
    #[case(MinerConfig { max_sols: 0, ..Default::default() })]
    #[case(MinerConfig { nonce: u32::MAX, range: 2, ..Default::default() })]
    fn test_bad_configs_are_rejected(#[case] config: MinerConfig) {
        assert!(matches!(config.validate(), Err(MinerError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = MinerConfig::from_json_str(r#"{ "threads": 4, "ntrims": 30 }"#).unwrap();
        assert_eq!(config.threads, 4);
        assert_eq!(config.trims(), 30);
        assert_eq!(config.edge_bits, 20);
        assert_eq!(config.proof_size, PROOFSIZE);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "edge_bits": 16, "part_bits": 1, "range": 5 }}"#).unwrap();

        let config = MinerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.graph_params(), GraphParams::new(16, 1, PROOFSIZE));
        assert_eq!(config.range, 5);
        assert_eq!(config.trims(), default_trims(1));
    }

    #[test]
    fn test_invalid_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "proof_size": 3 }}"#).unwrap();
        assert!(matches!(
            MinerConfig::from_json_file(file.path()),
            Err(MinerError::InvalidConfig(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(MinerConfig::from_json_file(file.path()), Err(MinerError::Json(_))));

        assert!(matches!(
            MinerConfig::from_json_file(Path::new("/nonexistent/miner.json")),
            Err(MinerError::ConfigIo(_))
        ));
    }
}
