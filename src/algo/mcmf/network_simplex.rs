use alloc::collections::BTreeMap;
use alloc::format;
use alloc::vec::Vec;

use itertools::Itertools;
use mcmf::{Capacity, Cost, GraphBuilder, Vertex};

use crate::algo::mcmf::{Augmentation, FlowOutcome, MinCostFlow, Termination};
use crate::error::Error;
use crate::flow::FlowMatrix;
use crate::network::Network;

/// LEMON's network simplex through the `mcmf` crate. Mostly useful to cross-check
/// [`SuccessiveShortestPaths`](super::ssp::SuccessiveShortestPaths).
#[derive(Clone, Debug, Default)]
pub struct NetworkSimplex;

impl MinCostFlow for NetworkSimplex {
    type Amount = i32;
    type Error = Error;

    fn min_cost_flow(
        &mut self,
        network: &Network<Self::Amount>,
    ) -> Result<FlowOutcome<Self::Amount>, Self::Error> {
        network.validate()?;

        let (s, t) = (network.source(), network.sink());
        let supply = network.supply(s).max(0);
        let costs: BTreeMap<_, _> = network
            .edges()
            .iter()
            .map(|e| ((e.tail, e.head), e.unit_cost))
            .collect();

        // bound the source by its supply, LEMON computes a min-cost max flow
        let mut g = network
            .edges()
            .iter()
            .fold(GraphBuilder::new(), |mut acc, e| {
                acc.add_edge(
                    Vertex::Node(e.tail),
                    Vertex::Node(e.head),
                    Capacity(e.capacity),
                    Cost(e.unit_cost),
                );
                acc
            });
        g.add_edge(Vertex::Source, Vertex::Node(s), Capacity(supply), Cost(0));
        g.add_edge(Vertex::Node(t), Vertex::Sink, Capacity(supply), Cost(0));

        let (_, paths) = g.mcmf();

        let mut flow = FlowMatrix::new(network.num_vertices());
        let mut augmentations = Vec::with_capacity(paths.len());
        let mut delivered = 0;
        for path in paths {
            let amount = match path.flows.first() {
                Some(f) => i32::try_from(f.amount).map_err(|e| Error::AlgoSpecific(format!("{e:?}")))?,
                None => continue,
            };
            let vertices: Vec<usize> = path
                .vertices()
                .into_iter()
                .cloned()
                .filter_map(|n| n.as_option())
                .collect();

            let unit_cost = vertices
                .iter()
                .tuple_windows()
                .map(|(u, v)| costs.get(&(*u, *v)).copied().unwrap_or_default())
                .sum();
            vertices
                .iter()
                .tuple_windows()
                .for_each(|(u, v)| flow.add(*u, *v, amount));

            delivered += amount;
            augmentations.push(Augmentation {
                vertices,
                bottleneck: amount,
                unit_cost,
            });
        }

        let remaining_supply = supply - delivered;
        let termination = if remaining_supply == 0 {
            Termination::SupplyExhausted
        } else {
            Termination::NoAugmentingPath
        };

        Ok(FlowOutcome {
            flow,
            remaining_supply,
            delivered,
            termination,
            augmentations,
        })
    }
}
