use crate::compute::context::SearchContext;
use crate::oracle::EdgeOracle;
use crate::store::alive::AliveBits;
use crate::store::Side;

/// Visits the alive edges of one bitmap word whose `side` endpoint lies in
/// sub-partition `part`, passing the edge and its counter slot.
///
/// Endpoints are hashed four at a time; the tail of the word falls back to
/// the scalar oracle.
#[inline(always)]
fn for_each_in_part<O, F>(ctx: &SearchContext, oracle: &O, word: usize, side: Side, part: u64, mut visit: F)
where
    O: EdgeOracle,
    F: FnMut(u64, u64),
{
    let params = ctx.params();
    let part_mask = params.part_mask();
    let part_bits = params.part_bits;
    let mut on_node = |edge: u64, node: u64| {
        if node & part_mask == part {
            visit(edge, node >> part_bits);
        }
    };

    let mut batch = [0u64; 4];
    let mut filled = 0;
    for edge in AliveBits::new(word, ctx.alive.word(word)) {
        batch[filled] = edge;
        filled += 1;
        if filled == 4 {
            let nodes = oracle.endpoints_x4(batch, side);
            for (&e, &n) in batch.iter().zip(&nodes) {
                on_node(e, n);
            }
            filled = 0;
        }
    }
    for &e in &batch[..filled] {
        on_node(e, oracle.endpoint(e, side));
    }
}

/// Counting pass for one worker: words `worker, worker + nworkers, ...`.
pub fn count_degrees<O: EdgeOracle>(
    ctx: &SearchContext,
    oracle: &O,
    worker: usize,
    nworkers: usize,
    side: Side,
    part: u64,
) {
    for word in (worker..ctx.alive.word_count()).step_by(nworkers) {
        for_each_in_part(ctx, oracle, word, side, part, |_, slot| ctx.counters.increment(slot));
    }
}

/// Pruning pass for one worker: kills every edge whose `side` endpoint is a leaf.
/// Must only run after every worker's counting pass has finished.
pub fn kill_leaves<O: EdgeOracle>(
    ctx: &SearchContext,
    oracle: &O,
    worker: usize,
    nworkers: usize,
    side: Side,
    part: u64,
) {
    for word in (worker..ctx.alive.word_count()).step_by(nworkers) {
        for_each_in_part(ctx, oracle, word, side, part, |edge, slot| {
            if ctx.counters.is_leaf(slot) {
                ctx.alive.kill(edge);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::TableOracle;
    use crate::store::{Degree, GraphParams};

    // U0-V0, U0-V1, U1-V1, U2-V2
    fn small_graph() -> (SearchContext, TableOracle) {
        let oracle = TableOracle::new(&[(0, 0), (0, 1), (1, 1), (2, 2)]);
        let mut ctx = SearchContext::new(GraphParams::new(2, 0, 2));
        ctx.reset();
        (ctx, oracle)
    }

    #[test]
    fn test_count_then_kill_on_u_side() {
        let (ctx, oracle) = small_graph();
        count_degrees(&ctx, &oracle, 0, 1, Side::U, 0);
        assert_eq!(ctx.counters.degree(0), Degree::Many);
        assert_eq!(ctx.counters.degree(1), Degree::One);
        assert_eq!(ctx.counters.degree(2), Degree::One);
        assert_eq!(ctx.counters.degree(3), Degree::Zero);

        kill_leaves(&ctx, &oracle, 0, 1, Side::U, 0);
        assert_eq!(ctx.alive.iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_partition_filter_skips_other_parts() {
        let oracle = TableOracle::new(&[(0, 0), (1, 1), (2, 2), (3, 3)]);
        let mut ctx = SearchContext::new(GraphParams::new(2, 1, 2));
        ctx.reset();
        // Part 1 holds the odd U nodes 1 and 3, in slots 0 and 1.
        count_degrees(&ctx, &oracle, 0, 1, Side::U, 1);
        kill_leaves(&ctx, &oracle, 0, 1, Side::U, 1);
        assert_eq!(ctx.alive.iter().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_workers_cover_disjoint_words() {
        // 256 edges = 4 words; every edge is a leaf on U.
        let pairs: Vec<(u64, u64)> = (0..256).map(|e| (e, 0)).collect();
        let oracle = TableOracle::new(&pairs);
        let mut ctx = SearchContext::new(GraphParams::new(8, 0, 2));
        ctx.reset();
        for worker in 0..3 {
            count_degrees(&ctx, &oracle, worker, 3, Side::U, 0);
        }
        for worker in 0..3 {
            kill_leaves(&ctx, &oracle, worker, 3, Side::U, 0);
        }
        assert_eq!(ctx.alive.count(), 0);
    }
}
