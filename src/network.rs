use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use petgraph::algo::bellman_ford;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::algo::residual::ResidualGraph;
use crate::amount::Amount;
use crate::error::{Error, Violation};

/// A directed edge of the input network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeSpec<Amt> {
    pub tail: usize,
    pub head: usize,
    pub capacity: Amt,
    pub unit_cost: Amt,
}

/// Full description of a single-source single-sink min-cost flow problem.
///
/// Edges keep their insertion order; the supply/demand vector is dense and signed (positive is
/// supply, negative is demand).
#[derive(Clone, Debug)]
pub struct Network<Amt> {
    num_vertices: usize,
    edges: Vec<EdgeSpec<Amt>>,
    supply_demand: Vec<Amt>,
    source: usize,
    sink: usize,
}

impl<Amt: Amount> Network<Amt> {
    pub fn new(num_vertices: usize, source: usize, sink: usize) -> Result<Self, Error> {
        check_endpoint(source, num_vertices)?;
        check_endpoint(sink, num_vertices)?;
        if source == sink {
            return Err(Error::SourceIsSink);
        }

        Ok(Self {
            num_vertices,
            edges: Vec::new(),
            supply_demand: vec![Amt::zero(); num_vertices],
            source,
            sink,
        })
    }

    pub fn add_edge(
        &mut self,
        tail: usize,
        head: usize,
        capacity: Amt,
        unit_cost: Amt,
    ) -> Result<(), Error> {
        check_endpoint(tail, self.num_vertices)?;
        check_endpoint(head, self.num_vertices)?;
        if capacity < Amt::zero() {
            return Err(Error::NegativeCapacity(tail, head));
        }

        self.edges.push(EdgeSpec {
            tail,
            head,
            capacity,
            unit_cost,
        });
        Ok(())
    }

    /// Set the supply (positive) or demand (negative) of `vertex`. The source can only supply.
    pub fn set_supply(&mut self, vertex: usize, amount: Amt) -> Result<(), Error> {
        check_endpoint(vertex, self.num_vertices)?;
        if vertex == self.source && amount < Amt::zero() {
            return Err(Error::NegativeSupply(vertex));
        }
        self.supply_demand[vertex] = amount;
        Ok(())
    }

    pub fn supply(&self, vertex: usize) -> Amt {
        self.supply_demand.get(vertex).copied().unwrap_or_default()
    }

    pub fn supply_demand(&self) -> &[Amt] {
        &self.supply_demand
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    pub fn edges(&self) -> &[EdgeSpec<Amt>] {
        &self.edges
    }

    pub fn source(&self) -> usize {
        self.source
    }

    pub fn sink(&self) -> usize {
        self.sink
    }

    pub fn capacity(&self, tail: usize, head: usize) -> Option<Amt> {
        self.edges
            .iter()
            .find(|e| e.tail == tail && e.head == head)
            .map(|e| e.capacity)
    }

    /// Check the precondition the shortest path oracle relies on: no negative cost cycle may be
    /// reachable from the source through edges with positive capacity.
    pub fn validate(&self) -> Result<(), Error> {
        let mut graph = DiGraph::<(), f64>::with_capacity(self.num_vertices, self.edges.len());
        let nodes: Vec<NodeIndex> = (0..self.num_vertices).map(|_| graph.add_node(())).collect();

        for e in self.edges.iter().filter(|e| e.capacity > Amt::zero()) {
            let cost = e
                .unit_cost
                .to_f64()
                .ok_or_else(|| Error::AlgoSpecific(format!("cost {} overflows", e.unit_cost)))?;
            graph.add_edge(nodes[e.tail], nodes[e.head], cost);
        }

        bellman_ford(&graph, nodes[self.source])
            .map(|_| ())
            .map_err(|_| Violation::NegativeCycle.into())
    }

    /// Build the residual graph store for this network, in edge insertion order.
    pub fn residual_graph(&self) -> Result<ResidualGraph<Amt>, Error> {
        self.edges
            .iter()
            .try_fold(ResidualGraph::new(self.num_vertices), |mut acc, e| {
                acc.add_edge(e.tail, e.head, e.capacity, e.unit_cost)?;
                Ok(acc)
            })
    }
}

fn check_endpoint(vertex: usize, num_vertices: usize) -> Result<(), Error> {
    if vertex < num_vertices {
        Ok(())
    } else {
        Err(Error::InvalidEndpoint {
            vertex,
            num_vertices,
        })
    }
}
