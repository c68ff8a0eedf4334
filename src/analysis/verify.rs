//! Proof checking: recompute every proof edge and confirm they close into a
//! single simple cycle.

use crate::error::VerifyError;
use crate::oracle::EdgeOracle;
use crate::store::{GraphParams, NodeId, Side};
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;

pub fn verify<O: EdgeOracle>(oracle: &O, params: &GraphParams, edges: &[u64]) -> Result<(), VerifyError> {
    if edges.len() != params.proof_size {
        return Err(VerifyError::WrongLength { expected: params.proof_size, actual: edges.len() });
    }

    let mut xor_u = 0u64;
    let mut xor_v = 0u64;
    for (position, &edge) in edges.iter().enumerate() {
        if edge >= params.nedges() {
            return Err(VerifyError::EdgeTooBig { edge, nedges: params.nedges() });
        }
        if position > 0 && edge <= edges[position - 1] {
            return Err(VerifyError::EdgesNotAscending { position });
        }
        xor_u ^= oracle.endpoint(edge, Side::U);
        xor_v ^= oracle.endpoint(edge, Side::V);
    }
    // Every node of a cycle is touched an even number of times.
    if xor_u | xor_v != 0 {
        return Err(VerifyError::NonMatching);
    }

    let mut graph: UnGraph<NodeId, u64> = UnGraph::with_capacity(edges.len(), edges.len());
    let mut index_of: HashMap<NodeId, NodeIndex> = HashMap::with_capacity(edges.len());
    for &edge in edges {
        let (u, v) = oracle.nodes(edge);
        let a = *index_of.entry(u).or_insert_with(|| graph.add_node(u));
        let b = *index_of.entry(v).or_insert_with(|| graph.add_node(v));
        graph.add_edge(a, b, edge);
    }

    for node in graph.node_indices() {
        let degree = graph.edges(node).count();
        if degree > 2 {
            return Err(VerifyError::Branch { node: graph[node].0, degree });
        }
        if degree < 2 {
            return Err(VerifyError::DeadEnd { node: graph[node].0 });
        }
    }

    let components = connected_components(&graph);
    if components != 1 {
        return Err(VerifyError::ShortCycle { components });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::TableOracle;

    fn params(proof_size: usize) -> GraphParams {
        GraphParams::new(4, 0, proof_size)
    }

    // Edges 0..4 form U0-V0-U1-V1; edges 4..8 form U2-V2-U3-V3.
    fn two_squares() -> TableOracle {
        let mut pairs = vec![(0, 0), (1, 0), (1, 1), (0, 1), (2, 2), (3, 2), (3, 3), (2, 3)];
        pairs.extend((0..8).map(|i| (4 + i, 4 + i)));
        TableOracle::new(&pairs)
    }

    #[test]
    fn test_valid_cycle_passes() {
        assert_eq!(verify(&two_squares(), &params(4), &[0, 1, 2, 3]), Ok(()));
    }

    #[test]
    fn test_length_and_order_are_checked_first() {
        let oracle = two_squares();
        assert_eq!(
            verify(&oracle, &params(4), &[0, 1, 2]),
            Err(VerifyError::WrongLength { expected: 4, actual: 3 })
        );
        assert_eq!(
            verify(&oracle, &params(4), &[0, 2, 1, 3]),
            Err(VerifyError::EdgesNotAscending { position: 2 })
        );
        assert_eq!(
            verify(&oracle, &params(4), &[0, 1, 2, 16]),
            Err(VerifyError::EdgeTooBig { edge: 16, nedges: 16 })
        );
    }

    #[test]
    fn test_two_disjoint_cycles_are_rejected() {
        let err = verify(&two_squares(), &params(8), &[0, 1, 2, 3, 4, 5, 6, 7]).unwrap_err();
        assert_eq!(err, VerifyError::ShortCycle { components: 2 });
    }

    #[test]
    fn test_open_path_is_rejected() {
        let err = verify(&two_squares(), &params(4), &[0, 1, 2, 4]).unwrap_err();
        assert_eq!(err, VerifyError::NonMatching);
    }

    #[test]
    fn test_branching_node_is_rejected() {
        // Star on U0 whose raw endpoints still xor to zero.
        let oracle = TableOracle::new(&[(0, 1), (0, 2), (0, 3), (0, 0)]);
        let err = verify(&oracle, &GraphParams::new(2, 0, 4), &[0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, VerifyError::Branch { degree: 4, .. }));
    }
}
