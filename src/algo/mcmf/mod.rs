#[cfg(feature = "lemon-cpp")]
pub mod network_simplex;

pub mod ssp;

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::amount::Amount;
use crate::flow::FlowMatrix;
use crate::network::Network;

/// Why the augmentation loop stopped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The source's supply was fully delivered.
    SupplyExhausted,
    /// No augmenting path is left while supply remains (or nothing was deliverable).
    NoAugmentingPath,
}

/// One augmentation step: the path used, the amount pushed and its per-unit cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Augmentation<Amt> {
    pub vertices: Vec<usize>,
    pub bottleneck: Amt,
    pub unit_cost: Amt,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowOutcome<Amt> {
    pub flow: FlowMatrix<Amt>,
    pub remaining_supply: Amt,
    pub delivered: Amt,
    pub termination: Termination,
    pub augmentations: Vec<Augmentation<Amt>>,
}

impl<Amt: Amount> FlowOutcome<Amt> {
    /// Whether the source's whole supply reached the sink.
    pub fn is_complete(&self) -> bool {
        self.remaining_supply <= Amt::zero()
    }
}

/// The minimum cost flow algorithm.
pub trait MinCostFlow {
    type Amount;
    type Error: Debug;

    /// Run the algorithm over the specified network, sending as much of the source's supply as
    /// possible to the sink at minimum cost.
    fn min_cost_flow(
        &mut self,
        network: &Network<Self::Amount>,
    ) -> Result<FlowOutcome<Self::Amount>, Self::Error>;
}
