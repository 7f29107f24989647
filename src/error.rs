use alloc::string::String;

use displaydoc::Display;

#[derive(Clone, Debug, PartialEq, Eq, Display)]
pub enum Error {
    /// Invalid edge endpoint {vertex}, expected a vertex below {num_vertices}
    InvalidEndpoint { vertex: usize, num_vertices: usize },
    /// Duplicate edge from {0} to {1}
    DuplicateEdge(usize, usize),
    /// Invalid capacity on edge from {0} to {1}, expected non-negative value
    NegativeCapacity(usize, usize),
    /// Source and sink must be distinct vertices
    SourceIsSink,
    /// Invalid supply at source {0}, expected non-negative value
    NegativeSupply(usize),
    /// Invalid class count for `{0}`, expected non-negative value
    NegativeClasses(String),
    /// Teacher `{teacher}` ranks a subject at position {rank} which has no cost tier
    RankOutOfTiers { teacher: String, rank: usize },
    /// Network invariant violated: {0}
    NetworkInvariantViolation(Violation),
    /// Min-cost flow algorithm specific error: {0}
    AlgoSpecific(String),
}

/// Broken assumption about the network or the flow computed over it.
#[derive(Clone, Debug, PartialEq, Eq, Display)]
pub enum Violation {
    /// negative cost cycle reachable from the source
    NegativeCycle,
    /// no termination after {0} augmentations
    IterationLimit(usize),
    /// predecessor chain does not lead back to the source
    BrokenPredecessorChain,
    /// augmenting path uses missing residual edge {0} -> {1}
    MissingEdge(usize, usize),
    /// flow is not conserved at vertex {0}
    FlowNotConserved(usize),
    /// flow exceeds the capacity of edge {0} -> {1}
    CapacityExceeded(usize, usize),
    /// flow leaving the source exceeds its supply
    SupplyExceeded,
    /// allocation from {0} to {1} has no preference rank
    UnrankedAssignment(usize, usize),
}

impl From<Violation> for Error {
    fn from(v: Violation) -> Self {
        Self::NetworkInvariantViolation(v)
    }
}
