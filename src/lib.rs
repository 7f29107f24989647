#![no_std]
#![deny(
    warnings,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod algo;
pub mod amount;
pub mod assignment;
pub mod error;
pub mod flow;
pub mod impls;
pub mod network;
pub mod roster;
pub mod vertex;

pub use crate::algo::mcmf::ssp::SuccessiveShortestPaths;
pub use crate::algo::mcmf::{Augmentation, FlowOutcome, MinCostFlow, Termination};
pub use crate::assignment::{AllocationReport, Assignment};
pub use crate::error::{Error, Violation};
pub use crate::flow::FlowMatrix;
pub use crate::impls::default::DefaultAllocator;
pub use crate::network::{EdgeSpec, Network};
pub use crate::roster::{AllocationConfig, Classes, CostTiers, Roster, Subject, Teacher};
pub use crate::vertex::{Layout, Role};

#[cfg(feature = "lemon-cpp")]
pub use crate::algo::mcmf::network_simplex::NetworkSimplex;

/// Allocation of a roster's classes to its teachers.
pub trait Allocator {
    type Algo;
    type Error;

    /// Compute the allocation report for the given roster.
    fn run(&mut self, roster: &Roster) -> Result<AllocationReport, Self::Error>;

    /// Verify a report against the roster it was computed from.
    fn check(&self, roster: &Roster, report: &AllocationReport) -> Result<(), Self::Error>;
}

/// Allocate `roster` with successive shortest paths and check the result.
pub fn allocate(roster: &Roster, config: AllocationConfig) -> Result<AllocationReport, Error> {
    let mut allocator = DefaultAllocator::from_config(config);
    let report = allocator.run(roster)?;
    allocator.check(roster, &report)?;
    Ok(report)
}
