use serde::{Serialize, Deserialize};

/// Required cycle length of a canonical proof.
pub const PROOFSIZE: usize = 42;
/// Maximum proofs kept per nonce.
pub const MAXSOLS: usize = 8;
/// Length of the header hashed into the siphash keys, nonce included.
pub const HEADERLEN: usize = 80;

/// One half of the bipartite node universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    U = 0,
    V = 1,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::U, Side::V];

    #[inline(always)]
    pub fn bit(self) -> u64 { self as u64 }
}

/// Node in the full `2^(EDGEBITS+1)` universe: U nodes are even, V nodes odd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    #[inline(always)]
    pub fn new(raw: u64, side: Side) -> Self { Self((raw << 1) | side.bit()) }

    #[inline(always)]
    pub fn raw(&self) -> u64 { self.0 >> 1 }

    #[inline(always)]
    pub fn side(&self) -> Side {
        if self.0 & 1 == 0 { Side::U } else { Side::V }
    }
}

/// Graph shape parameters that every pass and every proof check share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphParams {
    pub edge_bits: u32,
    pub part_bits: u32,
    pub proof_size: usize,
}

impl Default for GraphParams {
    fn default() -> Self {
        Self { edge_bits: 20, part_bits: 0, proof_size: PROOFSIZE }
    }
}

impl GraphParams {
    pub fn new(edge_bits: u32, part_bits: u32, proof_size: usize) -> Self {
        Self { edge_bits, part_bits, proof_size }
    }

    #[inline(always)]
    pub fn nedges(&self) -> u64 { 1u64 << self.edge_bits }

    /// Nodes per side.
    #[inline(always)]
    pub fn nnodes(&self) -> u64 { 1u64 << self.edge_bits }

    #[inline(always)]
    pub fn edge_mask(&self) -> u64 { self.nedges() - 1 }

    pub fn nparts(&self) -> u64 { 1u64 << self.part_bits }

    #[inline(always)]
    pub fn part_mask(&self) -> u64 { (1u64 << self.part_bits) - 1 }

    /// Counters needed for one sub-partition of one side.
    pub fn counters_per_part(&self) -> u64 { self.nnodes() >> self.part_bits }
}

/// Default trim round count for a partition width.
pub fn default_trims(part_bits: u32) -> u32 {
    2 + (part_bits + 3) * (part_bits + 4)
}

/// A cycle of exactly `proof_size` edges found for `nonce`, edges ascending.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Proof {
    pub nonce: u32,
    pub edges: Vec<u64>,
}

impl Proof {
    pub fn new(nonce: u32, mut edges: Vec<u64>) -> Self {
        edges.sort_unstable();
        Self { nonce, edges }
    }
}
