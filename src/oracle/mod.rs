//! The edge oracle: maps an edge index to its two endpoints.
//!
//! The trimming engine and the cycle search only ever see the graph through
//! this trait, recomputing endpoints on every pass instead of storing them.
pub mod keys;
pub mod siphash;

pub use keys::{derive_keys, pad_header};
pub use siphash::{siphash24, siphash24_x4, SipKeys};

use crate::error::MinerError;
use crate::store::{GraphParams, NodeId, Side};

pub trait EdgeOracle: Sync {
    /// Side-local endpoint of `edge` on `side`, in `0..nnodes`.
    fn endpoint(&self, edge: u64, side: Side) -> u64;

    /// Batched form of [`endpoint`](Self::endpoint); must agree with it lane by lane.
    fn endpoints_x4(&self, edges: [u64; 4], side: Side) -> [u64; 4] {
        edges.map(|e| self.endpoint(e, side))
    }

    /// Both endpoints as global node ids.
    fn nodes(&self, edge: u64) -> (NodeId, NodeId) {
        (
            NodeId::new(self.endpoint(edge, Side::U), Side::U),
            NodeId::new(self.endpoint(edge, Side::V), Side::V),
        )
    }
}

/// `endpoint = siphash24(keys, 2*edge + side) & EDGEMASK`.
#[derive(Debug, Clone, Copy)]
pub struct SipOracle {
    keys: SipKeys,
    edge_mask: u64,
}

impl SipOracle {
    pub fn new(keys: SipKeys, params: &GraphParams) -> Self {
        Self { keys, edge_mask: params.edge_mask() }
    }

    pub fn from_header(header: &[u8], nonce: u32, params: &GraphParams) -> Result<Self, MinerError> {
        Ok(Self::new(derive_keys(header, nonce)?, params))
    }

    pub fn keys(&self) -> &SipKeys { &self.keys }
}

impl EdgeOracle for SipOracle {
    #[inline(always)]
    fn endpoint(&self, edge: u64, side: Side) -> u64 {
        siphash24(&self.keys, 2 * edge + side.bit()) & self.edge_mask
    }

    #[inline(always)]
    fn endpoints_x4(&self, edges: [u64; 4], side: Side) -> [u64; 4] {
        let hashes = siphash24_x4(&self.keys, edges.map(|e| 2 * e + side.bit()));
        hashes.map(|h| h & self.edge_mask)
    }
}

/// Explicit endpoint tables, for hand-built graphs in tests.
#[cfg(test)]
pub(crate) struct TableOracle {
    pub u: Vec<u64>,
    pub v: Vec<u64>,
}

#[cfg(test)]
impl TableOracle {
    pub fn new(edges: &[(u64, u64)]) -> Self {
        Self {
            u: edges.iter().map(|e| e.0).collect(),
            v: edges.iter().map(|e| e.1).collect(),
        }
    }
}

#[cfg(test)]
impl EdgeOracle for TableOracle {
    fn endpoint(&self, edge: u64, side: Side) -> u64 {
        match side {
            Side::U => self.u[edge as usize],
            Side::V => self.v[edge as usize],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(4)]
    #[case(10)]
    #[case(16)]
    fn test_endpoints_stay_in_range(#[case] edge_bits: u32) {
        let params = GraphParams::new(edge_bits, 0, 42);
        let oracle = SipOracle::from_header(b"test", 0, &params).unwrap();
        for e in 0..params.nedges().min(4096) {
            assert!(oracle.endpoint(e, Side::U) < params.nnodes());
            assert!(oracle.endpoint(e, Side::V) < params.nnodes());
        }
    }

    #[test]
    fn test_known_endpoints_for_test_header() {
        let params = GraphParams::new(16, 0, 42);
        let oracle = SipOracle::from_header(b"test", 0, &params).unwrap();
        assert_eq!(oracle.nodes(0), (NodeId::new(25132, Side::U), NodeId::new(52714, Side::V)));
        assert_eq!(oracle.endpoint(1, Side::U), 20331);
        assert_eq!(oracle.endpoint(1, Side::V), 46576);
    }

    #[test]
    fn test_batched_endpoints_agree() {
        let params = GraphParams::new(16, 0, 42);
        let oracle = SipOracle::from_header(b"test", 3, &params).unwrap();
        for side in Side::BOTH {
            let edges = [0, 1, 1000, 65535];
            let batch = oracle.endpoints_x4(edges, side);
            for (i, &e) in edges.iter().enumerate() {
                assert_eq!(batch[i], oracle.endpoint(e, side));
            }
        }
    }

    #[test]
    fn test_nodes_are_bipartite() {
        let params = GraphParams::new(12, 0, 42);
        let oracle = SipOracle::from_header(b"test", 0, &params).unwrap();
        let (u, v) = oracle.nodes(77);
        assert_eq!(u.side(), Side::U);
        assert_eq!(v.side(), Side::V);
        assert_eq!(u.raw(), oracle.endpoint(77, Side::U));
    }
}
