use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use crate::amount::Amount;
use crate::error::Error;

/// Stable identifier of an edge in the residual graph's arena, valid until the next
/// [`ResidualGraph::flatten`] or [`ResidualGraph::compact`].
pub type EdgeId = usize;

/// Matrix cell of the residual graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Edge(EdgeId),
}

/// Whether a residual edge stands for an input edge or undoes flow pushed along one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Remaining capacity of the input edge `tail -> head`.
    Forward,
    /// Flow carried by the input edge `head -> tail`, at negated cost.
    Reverse,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResidualEdge<Amt> {
    pub tail: usize,
    pub head: usize,
    pub unit_cost: Amt,
    pub residual: Amt,
    pub orientation: Orientation,
    live: bool,
}

impl<Amt> ResidualEdge<Amt> {
    pub fn is_live(&self) -> bool {
        self.live
    }
}

/// Residual network stored as two dense matrices of cells pointing into one edge arena.
///
/// Forward and reverse edges between the same ordered pair live in separate matrices, so a
/// reverse edge never takes over the cost of an antiparallel input edge. The arena doubles as the
/// flattened edge list walked by the shortest path oracle. Removing an edge clears its cell and
/// retires the arena entry in place, so the matrices and the flattened list always agree on which
/// edges exist.
#[derive(Clone, Debug)]
pub struct ResidualGraph<Amt> {
    num_vertices: usize,
    forward: Vec<Cell>,
    reverse: Vec<Cell>,
    arena: Vec<ResidualEdge<Amt>>,
    live: usize,
}

impl<Amt: Amount> ResidualGraph<Amt> {
    pub fn new(num_vertices: usize) -> Self {
        Self {
            num_vertices,
            forward: vec![Cell::Empty; num_vertices * num_vertices],
            reverse: vec![Cell::Empty; num_vertices * num_vertices],
            arena: Vec::new(),
            live: 0,
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Number of edges currently present.
    pub fn edge_count(&self) -> usize {
        self.live
    }

    /// Number of arena entries, retired ones included.
    pub fn arena_len(&self) -> usize {
        self.arena.len()
    }

    fn cells(&self, orientation: Orientation) -> &[Cell] {
        match orientation {
            Orientation::Forward => &self.forward,
            Orientation::Reverse => &self.reverse,
        }
    }

    fn cells_mut(&mut self, orientation: Orientation) -> &mut [Cell] {
        match orientation {
            Orientation::Forward => &mut self.forward,
            Orientation::Reverse => &mut self.reverse,
        }
    }

    /// Forward cell of the pair `(u, v)`.
    pub fn cell(&self, u: usize, v: usize) -> Cell {
        self.forward[u * self.num_vertices + v]
    }

    /// Reverse cell of the pair `(u, v)`, undoing flow on the input edge `v -> u`.
    pub fn reverse_cell(&self, u: usize, v: usize) -> Cell {
        self.reverse[u * self.num_vertices + v]
    }

    /// Insert the input edge `u -> v`.
    pub fn add_edge(
        &mut self,
        u: usize,
        v: usize,
        capacity: Amt,
        unit_cost: Amt,
    ) -> Result<EdgeId, Error> {
        self.insert(u, v, capacity, unit_cost, Orientation::Forward)
    }

    /// Insert the reverse edge `u -> v`, which undoes flow on the input edge `v -> u`.
    pub fn add_reverse_edge(
        &mut self,
        u: usize,
        v: usize,
        capacity: Amt,
        unit_cost: Amt,
    ) -> Result<EdgeId, Error> {
        self.insert(u, v, capacity, unit_cost, Orientation::Reverse)
    }

    fn insert(
        &mut self,
        u: usize,
        v: usize,
        capacity: Amt,
        unit_cost: Amt,
        orientation: Orientation,
    ) -> Result<EdgeId, Error> {
        for vertex in [u, v] {
            if vertex >= self.num_vertices {
                return Err(Error::InvalidEndpoint {
                    vertex,
                    num_vertices: self.num_vertices,
                });
            }
        }
        if capacity < Amt::zero() {
            return Err(Error::NegativeCapacity(u, v));
        }
        let idx = u * self.num_vertices + v;
        if self.cells(orientation)[idx] != Cell::Empty {
            return Err(Error::DuplicateEdge(u, v));
        }

        let id = self.arena.len();
        self.arena.push(ResidualEdge {
            tail: u,
            head: v,
            unit_cost,
            residual: capacity,
            orientation,
            live: true,
        });
        self.cells_mut(orientation)[idx] = Cell::Edge(id);
        self.live += 1;
        Ok(id)
    }

    /// Remove the input edge from `u` to `v`, if any, and return the identifier it had.
    pub fn remove_edge(&mut self, u: usize, v: usize) -> Option<EdgeId> {
        match self.cell(u, v) {
            Cell::Empty => None,
            Cell::Edge(id) => {
                self.retire(id);
                Some(id)
            }
        }
    }

    /// Remove the edge with identifier `id`. Retired or unknown identifiers are ignored.
    pub fn retire(&mut self, id: EdgeId) {
        let n = self.num_vertices;
        let (idx, orientation) = match self.arena.get_mut(id) {
            Some(edge) if edge.live => {
                edge.live = false;
                (edge.tail * n + edge.head, edge.orientation)
            }
            _ => return,
        };
        self.cells_mut(orientation)[idx] = Cell::Empty;
        self.live -= 1;
    }

    /// Structural existence test of the input edge `u -> v`, independent of its residual
    /// capacity.
    pub fn edge_exists(&self, u: usize, v: usize) -> bool {
        matches!(self.cell(u, v), Cell::Edge(_))
    }

    pub fn edge(&self, u: usize, v: usize) -> Option<&ResidualEdge<Amt>> {
        match self.cell(u, v) {
            Cell::Empty => None,
            Cell::Edge(id) => Some(&self.arena[id]),
        }
    }

    pub fn reverse_edge(&self, u: usize, v: usize) -> Option<&ResidualEdge<Amt>> {
        match self.reverse_cell(u, v) {
            Cell::Empty => None,
            Cell::Edge(id) => Some(&self.arena[id]),
        }
    }

    /// Live edge with identifier `id`.
    pub fn get(&self, id: EdgeId) -> Option<&ResidualEdge<Amt>> {
        self.arena.get(id).filter(|e| e.live)
    }

    pub fn get_mut(&mut self, id: EdgeId) -> Option<&mut ResidualEdge<Amt>> {
        self.arena.get_mut(id).filter(|e| e.live)
    }

    /// Residual capacity of the input edge `u -> v`.
    pub fn residual(&self, u: usize, v: usize) -> Option<Amt> {
        self.edge(u, v).map(|e| e.residual)
    }

    /// Live edges with their identifiers, in flattened order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &ResidualEdge<Amt>)> + '_ {
        self.arena.iter().enumerate().filter(|(_, e)| e.live)
    }

    /// Rebuild the flattened edge list from the matrices in row-major order, the forward edge of
    /// a pair before its reverse edge, dropping retired entries. Edge identifiers change; cells
    /// are rewritten accordingly.
    pub fn flatten(&mut self) {
        let mut arena = Vec::with_capacity(self.live);
        for idx in 0..self.forward.len() {
            for cell in [&mut self.forward[idx], &mut self.reverse[idx]] {
                if let Cell::Edge(id) = *cell {
                    *cell = Cell::Edge(arena.len());
                    arena.push(self.arena[id].clone());
                }
            }
        }
        self.arena = arena;
    }

    /// Drop retired entries while keeping the flattened order of the live ones. Edge identifiers
    /// change; cells are rewritten accordingly.
    pub fn compact(&mut self) {
        let n = self.num_vertices;
        let arena = core::mem::take(&mut self.arena);
        for edge in arena.into_iter().filter(|e| e.live) {
            let idx = edge.tail * n + edge.head;
            let id = self.arena.len();
            self.cells_mut(edge.orientation)[idx] = Cell::Edge(id);
            self.arena.push(edge);
        }
    }

    /// Compact when retired entries outnumber live ones.
    pub fn compact_if_sparse(&mut self) -> bool {
        if self.arena.len() - self.live > self.live {
            self.compact();
            true
        } else {
            false
        }
    }

    /// Enlarge the residual capacity of the twin of edge `id` (the edge between the same vertices
    /// in the opposite direction and orientation) by `amount`, creating it at negated cost when
    /// absent.
    pub fn grow_twin(&mut self, id: EdgeId, amount: Amt) -> Result<EdgeId, Error> {
        let edge = self
            .arena
            .get(id)
            .ok_or_else(|| Error::AlgoSpecific(format!("unknown edge {id}")))?;
        let (u, v, unit_cost) = (edge.head, edge.tail, -edge.unit_cost);
        let twin = match edge.orientation {
            Orientation::Forward => Orientation::Reverse,
            Orientation::Reverse => Orientation::Forward,
        };

        match self.cells(twin)[u * self.num_vertices + v] {
            Cell::Edge(twin_id) => {
                self.arena[twin_id].residual += amount;
                Ok(twin_id)
            }
            Cell::Empty => self.insert(u, v, amount, unit_cost, twin),
        }
    }
}
