use alloc::vec::Vec;
use core::marker::PhantomData;

use itertools::Itertools;

use crate::algo::bellman_ford::{shortest_path, ShortestPath};
use crate::algo::mcmf::{Augmentation, FlowOutcome, MinCostFlow, Termination};
use crate::algo::residual::{Orientation, ResidualGraph};
use crate::amount::Amount;
use crate::error::{Error, Violation};
use crate::flow::FlowMatrix;
use crate::network::Network;

/// Successive shortest augmenting paths, with Bellman-Ford as the path oracle.
#[derive(Clone, Debug, Default)]
pub struct SuccessiveShortestPaths<Amt> {
    max_augmentations: Option<usize>,
    _phantom: PhantomData<Amt>,
}

impl<Amt> SuccessiveShortestPaths<Amt> {
    pub fn new() -> Self {
        Self {
            max_augmentations: None,
            _phantom: PhantomData,
        }
    }

    /// Bound the number of augmentations. Without a bound the source's supply is used, since
    /// every augmentation delivers at least one unit.
    pub fn with_max_augmentations(mut self, limit: usize) -> Self {
        self.max_augmentations = Some(limit);
        self
    }
}

impl<Amt: Amount> MinCostFlow for SuccessiveShortestPaths<Amt> {
    type Amount = Amt;
    type Error = Error;

    fn min_cost_flow(
        &mut self,
        network: &Network<Self::Amount>,
    ) -> Result<FlowOutcome<Self::Amount>, Self::Error> {
        successive_shortest_paths(network, self.max_augmentations)
    }
}

pub fn successive_shortest_paths<Amt: Amount>(
    network: &Network<Amt>,
    max_augmentations: Option<usize>,
) -> Result<FlowOutcome<Amt>, Error> {
    network.validate()?;

    let (s, t) = (network.source(), network.sink());
    let mut residual = network.residual_graph()?;
    residual.flatten();

    let mut flow = FlowMatrix::new(network.num_vertices());
    let mut remaining = network.supply(s);
    let mut delivered = Amt::zero();
    let mut augmentations: Vec<Augmentation<Amt>> = Vec::new();
    let limit = max_augmentations.unwrap_or_else(|| remaining.to_usize().unwrap_or(usize::MAX));

    let termination = loop {
        if remaining <= Amt::zero() {
            break Termination::SupplyExhausted;
        }

        let path = match shortest_path(&residual, s, t)? {
            Some(path) => path,
            None => break Termination::NoAugmentingPath,
        };

        if augmentations.len() >= limit {
            return Err(Violation::IterationLimit(limit).into());
        }

        let bottleneck = bottleneck(&residual, &path)?.min(remaining);
        augment(&mut residual, &mut flow, &path, bottleneck)?;
        if residual.compact_if_sparse() {
            log::trace!("compacted residual graph to {} edges", residual.edge_count());
        }

        remaining -= bottleneck;
        delivered += bottleneck;
        log::trace!(
            "augmented {bottleneck} along {:?} at unit cost {}",
            path.vertices,
            path.cost
        );

        augmentations.push(Augmentation {
            vertices: path.vertices,
            bottleneck,
            unit_cost: path.cost,
        });
    };

    log::debug!(
        "{} augmentations, {delivered} delivered, {remaining} remaining ({termination:?})",
        augmentations.len()
    );

    Ok(FlowOutcome {
        flow,
        remaining_supply: remaining,
        delivered,
        termination,
        augmentations,
    })
}

fn bottleneck<Amt: Amount>(
    residual: &ResidualGraph<Amt>,
    path: &ShortestPath<Amt>,
) -> Result<Amt, Error> {
    let mut min: Option<Amt> = None;
    for ((&u, &v), &id) in path.vertices.iter().tuple_windows().zip(&path.edges) {
        let r = residual
            .get(id)
            .ok_or(Violation::MissingEdge(u, v))?
            .residual;
        min = Some(min.map_or(r, |m| m.min(r)));
    }
    min.ok_or_else(|| Violation::BrokenPredecessorChain.into())
}

/// Push `amount` along `path`: shrink the residuals of the path's edges (dropping saturated ones)
/// and grow their twins. Flow is recorded on input edges only, so pushing along a reverse edge
/// takes flow back from the input edge it undoes.
fn augment<Amt: Amount>(
    residual: &mut ResidualGraph<Amt>,
    flow: &mut FlowMatrix<Amt>,
    path: &ShortestPath<Amt>,
    amount: Amt,
) -> Result<(), Error> {
    for ((&u, &v), &id) in path.vertices.iter().tuple_windows().zip(&path.edges) {
        let edge = residual.get_mut(id).ok_or(Violation::MissingEdge(u, v))?;
        edge.residual -= amount;
        match edge.orientation {
            Orientation::Forward => flow.add(u, v, amount),
            Orientation::Reverse => flow.sub(v, u, amount),
        }
        if edge.residual.is_zero() {
            residual.retire(id);
        }
        residual.grow_twin(id, amount)?;
    }
    Ok(())
}
