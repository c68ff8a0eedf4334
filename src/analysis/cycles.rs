use crate::error::MinerError;
use crate::oracle::EdgeOracle;
use crate::store::{AliveSet, NodeId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// A surviving edge with its endpoints recomputed once for the search.
#[derive(Debug, Clone, Copy)]
struct SurvivorEdge {
    index: u64,
    u: NodeId,
    v: NodeId,
}

impl SurvivorEdge {
    #[inline(always)]
    fn other(&self, node: NodeId) -> NodeId {
        if self.u == node { self.v } else { self.u }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleStats {
    pub survivors: usize,
    /// Closures back to the root at a length other than the proof size.
    pub wrong_length_closures: usize,
}

/// Cycles found among the survivors, each as ascending edge indices.
#[derive(Debug, Clone, Default)]
pub struct CycleSearchResult {
    pub cycles: Vec<Vec<u64>>,
    pub stats: CycleStats,
}

/// Exhaustive search for simple cycles of exactly `proof_size` edges.
///
/// Survivors are indexed in ascending edge order. A cycle is only reported
/// from its smallest survivor, walked U endpoint first, so each one is found
/// exactly once and the output order does not depend on how trimming was
/// scheduled.
pub struct CycleSearch {
    edges: Vec<SurvivorEdge>,
    adjacency: HashMap<NodeId, SmallVec<[u32; 4]>>,
    proof_size: usize,
    max_sols: usize,
}

impl CycleSearch {
    /// Builds the adjacency of the survivor set with one more oracle scan.
    pub fn build<O: EdgeOracle>(
        oracle: &O,
        alive: &AliveSet,
        proof_size: usize,
        max_sols: usize,
        max_survivors: u64,
    ) -> Result<Self, MinerError> {
        let survivors = alive.count();
        if survivors > max_survivors {
            return Err(MinerError::SurvivorOverflow { survivors, capacity: max_survivors });
        }

        let mut edges = Vec::with_capacity(survivors as usize);
        let mut adjacency: HashMap<NodeId, SmallVec<[u32; 4]>> = HashMap::new();
        for index in alive.iter() {
            let (u, v) = oracle.nodes(index);
            let slot = edges.len() as u32;
            edges.push(SurvivorEdge { index, u, v });
            adjacency.entry(u).or_default().push(slot);
            adjacency.entry(v).or_default().push(slot);
        }

        Ok(Self { edges, adjacency, proof_size, max_sols })
    }

    pub fn run(&self) -> CycleSearchResult {
        let mut result = CycleSearchResult::default();
        result.stats.survivors = self.edges.len();
        if self.max_sols == 0 {
            return result;
        }

        let mut path_edges: Vec<u32> = Vec::with_capacity(self.proof_size);
        let mut path_nodes: Vec<NodeId> = Vec::with_capacity(self.proof_size + 1);
        for root in 0..self.edges.len() as u32 {
            let edge = self.edges[root as usize];
            path_edges.clear();
            path_nodes.clear();
            path_edges.push(root);
            path_nodes.push(edge.u);
            path_nodes.push(edge.v);
            if self.extend(root, &mut path_edges, &mut path_nodes, &mut result) {
                break;
            }
        }
        result
    }

    /// Depth-first extension of the current path. Returns true once the
    /// solution bound is reached.
    fn extend(
        &self,
        root: u32,
        path_edges: &mut Vec<u32>,
        path_nodes: &mut Vec<NodeId>,
        result: &mut CycleSearchResult,
    ) -> bool {
        let start = path_nodes[0];
        let current = path_nodes[path_nodes.len() - 1];
        let last = path_edges[path_edges.len() - 1];
        let len = path_edges.len() + 1;

        let Some(incident) = self.adjacency.get(&current) else {
            return false;
        };
        for &slot in incident {
            if slot <= root || slot == last {
                continue;
            }
            let next = self.edges[slot as usize].other(current);
            if next == start {
                if len == self.proof_size {
                    path_edges.push(slot);
                    result.cycles.push(self.proof_of(path_edges));
                    path_edges.pop();
                    if result.cycles.len() >= self.max_sols {
                        return true;
                    }
                } else {
                    result.stats.wrong_length_closures += 1;
                }
                continue;
            }
            if len >= self.proof_size || path_nodes.contains(&next) {
                continue;
            }

            path_edges.push(slot);
            path_nodes.push(next);
            let full = self.extend(root, path_edges, path_nodes, result);
            path_nodes.pop();
            path_edges.pop();
            if full {
                return true;
            }
        }
        false
    }

    fn proof_of(&self, path: &[u32]) -> Vec<u64> {
        let mut proof: Vec<u64> = path.iter().map(|&s| self.edges[s as usize].index).collect();
        proof.sort_unstable();
        proof
    }
}
