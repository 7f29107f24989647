use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use crate::algo::residual::{EdgeId, ResidualGraph};
use crate::amount::Amount;
use crate::error::{Error, Violation};

/// A path from source to sink together with its per-unit cost. `edges[i]` is the residual edge
/// from `vertices[i]` to `vertices[i + 1]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortestPath<Amt> {
    pub vertices: Vec<usize>,
    pub edges: Vec<EdgeId>,
    pub cost: Amt,
}

/// Bellman-Ford over the residual graph's flattened edge list.
///
/// Edges without residual capacity are ignored. Negative edge costs are fine; a negative cycle
/// reachable from `s` is reported as a [`Violation::NegativeCycle`]. Returns `Ok(None)` when `t`
/// can't be reached.
pub fn shortest_path<Amt: Amount>(
    graph: &ResidualGraph<Amt>,
    s: usize,
    t: usize,
) -> Result<Option<ShortestPath<Amt>>, Error> {
    let n = graph.num_vertices();
    let mut dist: Vec<Option<Amt>> = vec![None; n];
    let mut pred: Vec<Option<EdgeId>> = vec![None; n];
    dist[s] = Some(Amt::zero());

    let mut stable = false;
    for round in 0..n.saturating_sub(1) {
        if !relax(graph, &mut dist, &mut pred)? {
            log::trace!("bellman-ford stable after {} rounds", round + 1);
            stable = true;
            break;
        }
    }
    if !stable && relax(graph, &mut dist, &mut pred)? {
        return Err(Violation::NegativeCycle.into());
    }

    let cost = match dist[t] {
        Some(cost) => cost,
        None => return Ok(None),
    };

    let mut vertices = vec![t];
    let mut edges = Vec::new();
    let mut v = t;
    while v != s {
        let id = pred[v].ok_or(Violation::BrokenPredecessorChain)?;
        v = graph.get(id).ok_or(Violation::BrokenPredecessorChain)?.tail;
        edges.push(id);
        vertices.push(v);
        if vertices.len() > n {
            return Err(Violation::BrokenPredecessorChain.into());
        }
    }
    vertices.reverse();
    edges.reverse();

    Ok(Some(ShortestPath {
        vertices,
        edges,
        cost,
    }))
}

/// One pass over the live edges with residual capacity. Returns whether any distance improved.
fn relax<Amt: Amount>(
    graph: &ResidualGraph<Amt>,
    dist: &mut [Option<Amt>],
    pred: &mut [Option<EdgeId>],
) -> Result<bool, Error> {
    let mut changed = false;
    for (id, e) in graph.edges().filter(|(_, e)| e.residual > Amt::zero()) {
        if let Some(du) = dist[e.tail] {
            let candidate = du.checked_add(&e.unit_cost).ok_or_else(|| {
                Error::AlgoSpecific(format!("path cost overflows at {} -> {}", e.tail, e.head))
            })?;
            if dist[e.head].map_or(true, |dv| candidate < dv) {
                dist[e.head] = Some(candidate);
                pred[e.head] = Some(id);
                changed = true;
            }
        }
    }
    Ok(changed)
}
