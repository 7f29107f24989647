use alloc::collections::BTreeMap;

use crate::algo::mcmf::ssp::SuccessiveShortestPaths;
use crate::algo::mcmf::MinCostFlow;
use crate::assignment::{extract, AllocationReport};
use crate::error::{Error, Violation};
use crate::flow;
use crate::roster::{AllocationConfig, Classes, Roster};
use crate::Allocator;

#[derive(Clone, Debug)]
pub struct DefaultAllocator<Algo> {
    algo: Algo,
    config: AllocationConfig,
}

impl<Algo> DefaultAllocator<Algo> {
    pub fn new(algo: Algo, config: AllocationConfig) -> Self {
        Self { algo, config }
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }
}

impl DefaultAllocator<SuccessiveShortestPaths<Classes>> {
    /// Successive shortest paths, bounded by the configured number of augmentations if any.
    pub fn from_config(config: AllocationConfig) -> Self {
        let algo = match config.max_augmentations {
            Some(limit) => SuccessiveShortestPaths::new().with_max_augmentations(limit),
            None => SuccessiveShortestPaths::new(),
        };
        Self::new(algo, config)
    }
}

impl<Algo> Allocator for DefaultAllocator<Algo>
where
    Algo: MinCostFlow<Amount = Classes>,
    Algo::Error: Into<Error>,
{
    type Algo = Algo;
    type Error = Error;

    fn run(&mut self, roster: &Roster) -> Result<AllocationReport, Self::Error> {
        let (layout, network) = roster.network(&self.config)?;
        log::debug!(
            "network with {} vertices and {} edges, supply {}",
            network.num_vertices(),
            network.edges().len(),
            network.supply(layout.source())
        );

        // run the min-cost flow algo
        let outcome = self.algo.min_cost_flow(&network).map_err(Into::into)?;
        flow::check(&network, &outcome.flow)?;

        let report = extract(roster, &layout, &self.config.tiers, &outcome)?;

        // Print key results
        log::info!("----------------------------------");
        log::info!("  Total classes = {}", roster.total_classes());
        log::info!("      Allocated = {}", report.total_classes);
        log::info!("      Remaining = {}", report.remaining_supply);
        log::info!("     Total cost = {}", report.total_cost);
        log::info!("  Augmentations = {}", outcome.augmentations.len());

        Ok(report)
    }

    fn check(&self, roster: &Roster, report: &AllocationReport) -> Result<(), Self::Error> {
        let layout = roster.layout();

        // per teacher and per subject totals
        let (by_teacher, by_subject) = report.assignments.iter().fold(
            (BTreeMap::<usize, Classes>::new(), BTreeMap::<usize, Classes>::new()),
            |(mut by_teacher, mut by_subject), a| {
                *by_teacher.entry(a.teacher_vertex).or_default() += a.classes;
                *by_subject.entry(a.subject_vertex).or_default() += a.classes;
                (by_teacher, by_subject)
            },
        );

        for a in &report.assignments {
            if a.classes > self.config.capacity_of(&a.subject_code) {
                return Err(Violation::CapacityExceeded(a.teacher_vertex, a.subject_vertex).into());
            }
        }

        for (idx, teacher) in roster.teachers().iter().enumerate() {
            let v = layout.teacher(idx);
            if by_teacher.get(&v).copied().unwrap_or_default() > teacher.offered_classes {
                return Err(Violation::CapacityExceeded(layout.source(), v).into());
            }
        }

        for (idx, subject) in roster.subjects().iter().enumerate() {
            let v = layout.subject(idx);
            if by_subject.get(&v).copied().unwrap_or_default() > subject.classes {
                return Err(Violation::CapacityExceeded(v, layout.sink()).into());
            }
        }

        // allocated and remaining classes add up to the supply
        let allocated: Classes = by_subject.values().sum();
        if allocated != report.total_classes
            || allocated + report.remaining_supply != roster.total_classes()
        {
            return Err(Violation::FlowNotConserved(layout.source()).into());
        }

        let satisfied = roster
            .subjects()
            .iter()
            .enumerate()
            .filter(|(idx, s)| by_subject.get(&layout.subject(*idx)) == Some(&s.classes))
            .count();

        log::debug!("         Teachers: {}", roster.teachers().len());
        log::debug!("         Subjects: {}", roster.subjects().len());
        log::debug!("Subjects complete: {satisfied}");
        log::debug!("    Classes total: {}", roster.total_classes());
        log::debug!("Classes allocated: {allocated}");
        log::debug!("       Total cost: {}", report.total_cost);

        Ok(())
    }
}
