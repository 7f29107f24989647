use alloc::vec;
use alloc::vec::Vec;

use crate::amount::Amount;
use crate::error::Violation;
use crate::network::Network;

/// Dense `V x V` matrix of accumulated flow per directed vertex pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowMatrix<Amt> {
    num_vertices: usize,
    cells: Vec<Amt>,
}

impl<Amt: Amount> FlowMatrix<Amt> {
    pub fn new(num_vertices: usize) -> Self {
        Self {
            num_vertices,
            cells: vec![Amt::zero(); num_vertices * num_vertices],
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    pub fn get(&self, u: usize, v: usize) -> Amt {
        self.cells[u * self.num_vertices + v]
    }

    pub fn add(&mut self, u: usize, v: usize, amount: Amt) {
        self.cells[u * self.num_vertices + v] += amount;
    }

    pub fn sub(&mut self, u: usize, v: usize, amount: Amt) {
        self.cells[u * self.num_vertices + v] -= amount;
    }

    pub fn outflow(&self, u: usize) -> Amt {
        (0..self.num_vertices).map(|v| self.get(u, v)).sum()
    }

    pub fn inflow(&self, v: usize) -> Amt {
        (0..self.num_vertices).map(|u| self.get(u, v)).sum()
    }

    /// Non-zero cells in row-major order.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, usize, Amt)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_zero())
            .map(move |(idx, f)| (idx / self.num_vertices, idx % self.num_vertices, *f))
    }

    /// Total cost of this flow under the network's per-unit edge costs.
    pub fn cost(&self, network: &Network<Amt>) -> Amt {
        network
            .edges()
            .iter()
            .map(|e| self.get(e.tail, e.head) * e.unit_cost)
            .sum()
    }
}

/// Verify the flow against the network it was computed for: conservation at every vertex other
/// than source and sink, capacity respect on every edge, no flow on pairs without an edge, and
/// the source's outflow bounded by its supply.
pub fn check<Amt: Amount>(network: &Network<Amt>, flow: &FlowMatrix<Amt>) -> Result<(), Violation> {
    let (s, t) = (network.source(), network.sink());

    if let Some(v) = (0..network.num_vertices())
        .filter(|v| *v != s && *v != t)
        .find(|v| flow.inflow(*v) != flow.outflow(*v))
    {
        return Err(Violation::FlowNotConserved(v));
    }

    for (u, v, f) in flow.nonzero() {
        match network.capacity(u, v) {
            Some(capacity) if f > Amt::zero() && f <= capacity => {}
            _ => return Err(Violation::CapacityExceeded(u, v)),
        }
    }

    let sent = flow.outflow(s) - flow.inflow(s);
    if sent > network.supply(s).max(Amt::zero()) {
        return Err(Violation::SupplyExceeded);
    }

    log::debug!("flow check passed, {sent} units leave the source");
    Ok(())
}
