use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;

use itertools::Itertools;
use serde::Serialize;

use crate::algo::mcmf::{FlowOutcome, Termination};
use crate::error::{Error, Violation};
use crate::roster::{Classes, CostTiers, Roster};
use crate::vertex::Layout;

/// Classes of one subject allocated to one teacher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Assignment {
    #[serde(skip)]
    pub teacher_vertex: usize,
    #[serde(skip)]
    pub subject_vertex: usize,
    pub teacher: String,
    pub subject_code: String,
    pub subject_name: String,
    pub classes: Classes,
    pub rank: usize,
    pub cost: Classes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationReport {
    pub assignments: Vec<Assignment>,
    pub total_cost: Classes,
    pub total_classes: Classes,
    /// Teacher vertices that declared no classes or no subjects.
    pub teachers_without_subjects: BTreeSet<usize>,
    pub remaining_supply: Classes,
    pub termination: Termination,
}

impl AllocationReport {
    pub fn is_complete(&self) -> bool {
        self.remaining_supply <= 0
    }
}

/// Project the teacher -> subject part of a flow onto the roster.
pub fn extract(
    roster: &Roster,
    layout: &Layout,
    tiers: &CostTiers,
    outcome: &FlowOutcome<Classes>,
) -> Result<AllocationReport, Error> {
    let assignments = layout
        .teachers()
        .cartesian_product(layout.subjects())
        .filter_map(|(t, s)| {
            let classes = outcome.flow.get(t, s);
            (classes > 0).then_some((t, s, classes))
        })
        .map(|(t, s, classes)| -> Result<Assignment, Error> {
            let teacher = &roster.teachers()[t - layout.teacher(0)];
            let subject = &roster.subjects()[s - layout.subject(0)];
            let rank = roster
                .rank(t - layout.teacher(0), &subject.code)
                .ok_or(Violation::UnrankedAssignment(t, s))?;
            let weight = tiers
                .weight(rank)
                .ok_or(Violation::UnrankedAssignment(t, s))?;

            Ok(Assignment {
                teacher_vertex: t,
                subject_vertex: s,
                teacher: teacher.name.clone(),
                subject_code: subject.code.clone(),
                subject_name: subject.name.clone(),
                classes,
                rank,
                cost: weight * classes,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let total_cost = assignments.iter().map(|a| a.cost).sum();
    let total_classes = assignments.iter().map(|a| a.classes).sum();

    let teachers_without_subjects = roster
        .teachers()
        .iter()
        .enumerate()
        .filter(|(_, t)| t.offered_classes == 0 || t.preferences.is_empty())
        .map(|(idx, _)| layout.teacher(idx))
        .collect();

    Ok(AllocationReport {
        assignments,
        total_cost,
        total_classes,
        teachers_without_subjects,
        remaining_supply: outcome.remaining_supply,
        termination: outcome.termination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowMatrix;
    use crate::roster::{Subject, Teacher};
    use alloc::string::ToString;
    use alloc::vec;

    fn roster() -> Roster {
        Roster::new(
            vec![
                Teacher {
                    name: "Ada".to_string(),
                    offered_classes: 3,
                    preferences: vec!["MTM".to_string(), "CSI".to_string()],
                },
                Teacher {
                    name: "Bob".to_string(),
                    offered_classes: 0,
                    preferences: vec!["MTM".to_string()],
                },
            ],
            vec![
                Subject {
                    code: "CSI".to_string(),
                    name: "Algorithms".to_string(),
                    classes: 2,
                },
                Subject {
                    code: "MTM".to_string(),
                    name: "Calculus".to_string(),
                    classes: 1,
                },
            ],
        )
    }

    #[test]
    fn projects_teacher_subject_cells() {
        let roster = roster();
        let layout = roster.layout();
        let mut flow = FlowMatrix::new(layout.num_vertices());
        // flow outside the teacher x subject block is ignored
        flow.add(0, 1, 3);
        flow.add(1, 3, 2);
        flow.add(1, 4, 1);
        flow.add(3, 5, 2);
        flow.add(4, 5, 1);
        let outcome = FlowOutcome {
            flow,
            remaining_supply: 0,
            delivered: 3,
            termination: Termination::SupplyExhausted,
            augmentations: vec![],
        };

        let report = extract(&roster, &layout, &CostTiers::default(), &outcome).unwrap();
        assert_eq!(report.assignments.len(), 2);
        assert_eq!(report.assignments[0].subject_code, "CSI");
        assert_eq!(report.assignments[0].rank, 1);
        assert_eq!(report.assignments[0].cost, 6);
        assert_eq!(report.assignments[1].subject_name, "Calculus");
        assert_eq!(report.assignments[1].cost, 0);
        assert_eq!(report.total_cost, 6);
        assert_eq!(report.total_classes, 3);
        assert_eq!(report.teachers_without_subjects, BTreeSet::from([2]));
        assert!(report.is_complete());
    }

    #[test]
    fn flow_on_unranked_pair_is_a_violation() {
        let roster = roster();
        let layout = roster.layout();
        let mut flow = FlowMatrix::new(layout.num_vertices());
        // Bob never listed CSI
        flow.add(2, 3, 1);
        let outcome = FlowOutcome {
            flow,
            remaining_supply: 2,
            delivered: 1,
            termination: Termination::NoAugmentingPath,
            augmentations: vec![],
        };

        assert_eq!(
            extract(&roster, &layout, &CostTiers::default(), &outcome),
            Err(Error::NetworkInvariantViolation(Violation::UnrankedAssignment(2, 3)))
        );
    }
}
