use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use serde::Deserialize;

use crate::error::Error;
use crate::network::Network;
use crate::vertex::Layout;

/// Number of classes, the unit of flow in the allocation network.
pub type Classes = i64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Teacher {
    pub name: String,
    /// Classes the teacher declares to take over all subjects.
    pub offered_classes: Classes,
    /// Subject codes, most preferred first.
    pub preferences: Vec<String>,
}

/// Subject roster row, `code;name;classes` in that order.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Subject {
    pub code: String,
    pub name: String,
    /// Classes that must be allocated for this subject.
    pub classes: Classes,
}

/// Cost weights indexed by a teacher's preference rank for a subject (0 is most preferred).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostTiers(Vec<Classes>);

impl CostTiers {
    pub fn new(weights: Vec<Classes>) -> Self {
        Self(weights)
    }

    pub fn weight(&self, rank: usize) -> Option<Classes> {
        self.0.get(rank).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CostTiers {
    fn default() -> Self {
        Self(vec![0, 3, 5, 8, 10])
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationConfig {
    pub tiers: CostTiers,
    /// Classes a teacher may take of a single subject.
    pub class_capacity: Classes,
    /// Per subject code replacements for `class_capacity`.
    pub capacity_overrides: BTreeMap<String, Classes>,
    pub max_augmentations: Option<usize>,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            tiers: CostTiers::default(),
            class_capacity: 2,
            capacity_overrides: BTreeMap::new(),
            max_augmentations: None,
        }
    }
}

impl AllocationConfig {
    pub fn capacity_of(&self, code: &str) -> Classes {
        self.capacity_overrides
            .get(code)
            .copied()
            .unwrap_or(self.class_capacity)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roster {
    teachers: Vec<Teacher>,
    subjects: Vec<Subject>,
    total_classes: Classes,
}

impl Roster {
    /// The total number of classes to allocate is the sum of the subjects' classes.
    pub fn new(teachers: Vec<Teacher>, subjects: Vec<Subject>) -> Self {
        let total_classes = subjects.iter().map(|s| s.classes).sum();
        Self {
            teachers,
            subjects,
            total_classes,
        }
    }

    /// Replace the computed total with a declared one.
    pub fn with_total_classes(mut self, total_classes: Classes) -> Self {
        self.total_classes = total_classes;
        self
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn total_classes(&self) -> Classes {
        self.total_classes
    }

    pub fn layout(&self) -> Layout {
        Layout::new(self.teachers.len(), self.subjects.len())
    }

    /// Build the allocation network `source -> teachers -> subjects -> sink`.
    ///
    /// Zero capacity edges are left out. Preferences naming an unknown subject, or repeating one
    /// already listed, are skipped.
    pub fn network(&self, config: &AllocationConfig) -> Result<(Layout, Network<Classes>), Error> {
        let layout = self.layout();
        let mut network = Network::new(layout.num_vertices(), layout.source(), layout.sink())?;

        if let Some(t) = self.teachers.iter().find(|t| t.offered_classes < 0) {
            return Err(Error::NegativeClasses(t.name.clone()));
        }
        if let Some(s) = self.subjects.iter().find(|s| s.classes < 0) {
            return Err(Error::NegativeClasses(s.code.clone()));
        }

        network.set_supply(layout.source(), self.total_classes)?;
        network.set_supply(layout.sink(), -self.total_classes)?;

        for (idx, teacher) in self.teachers.iter().enumerate() {
            let v = layout.teacher(idx);
            network.set_supply(v, teacher.offered_classes)?;
            if teacher.offered_classes > 0 {
                network.add_edge(layout.source(), v, teacher.offered_classes, 0)?;
            }
        }

        let mut subject_index = BTreeMap::new();
        for (idx, subject) in self.subjects.iter().enumerate() {
            let v = layout.subject(idx);
            network.set_supply(v, subject.classes)?;
            if subject.classes > 0 {
                network.add_edge(v, layout.sink(), subject.classes, 0)?;
            }
            if subject_index.insert(subject.code.as_str(), v).is_some() {
                log::warn!("subject {} is listed more than once", subject.code);
            }
        }

        for (idx, teacher) in self.teachers.iter().enumerate() {
            let mut seen = BTreeSet::new();
            for (rank, code) in teacher.preferences.iter().enumerate() {
                let weight = config.tiers.weight(rank).ok_or_else(|| Error::RankOutOfTiers {
                    teacher: teacher.name.clone(),
                    rank,
                })?;
                let subject = match subject_index.get(code.as_str()) {
                    Some(subject) => *subject,
                    None => {
                        log::warn!("{} prefers unknown subject {code}, skipping", teacher.name);
                        continue;
                    }
                };
                if !seen.insert(subject) {
                    log::warn!("{} lists {code} more than once, skipping", teacher.name);
                    continue;
                }

                let capacity = config.capacity_of(code);
                if capacity > 0 {
                    network.add_edge(layout.teacher(idx), subject, capacity, weight)?;
                }
            }
        }

        Ok((layout, network))
    }

    /// Preference rank of the subject with `code` for the teacher at roster index `teacher`.
    pub fn rank(&self, teacher: usize, code: &str) -> Option<usize> {
        self.teachers
            .get(teacher)?
            .preferences
            .iter()
            .position(|p| p == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn teacher(name: &str, offered: Classes, preferences: &[&str]) -> Teacher {
        Teacher {
            name: name.to_string(),
            offered_classes: offered,
            preferences: preferences.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn subject(code: &str, classes: Classes) -> Subject {
        Subject {
            code: code.to_string(),
            name: code.to_lowercase(),
            classes,
        }
    }

    #[test]
    fn builds_layered_network() {
        let roster = Roster::new(
            vec![teacher("T1", 4, &["S1", "S2"]), teacher("T2", 2, &["S1"])],
            vec![subject("S1", 3), subject("S2", 2)],
        );
        let (layout, network) = roster.network(&AllocationConfig::default()).unwrap();

        assert_eq!(layout.num_vertices(), 6);
        assert_eq!(network.supply(0), 5);
        assert_eq!(network.supply(5), -5);
        assert_eq!(network.supply_demand(), &[5, 4, 2, 3, 2, -5]);
        assert_eq!(network.capacity(0, 1), Some(4));
        assert_eq!(network.capacity(3, 5), Some(3));
        assert_eq!(network.capacity(1, 4), Some(2));
        assert_eq!(network.edges().len(), 7);
        let t1_s2 = network
            .edges()
            .iter()
            .find(|e| e.tail == 1 && e.head == 4)
            .unwrap();
        assert_eq!(t1_s2.unit_cost, 3);
    }

    #[test]
    fn overrides_and_skipped_preferences() {
        let mut config = AllocationConfig::default();
        config.capacity_overrides.insert("CSI000".to_string(), 1);
        let roster = Roster::new(
            vec![teacher("T1", 3, &["CSI000", "NOPE", "CSI000", "S2"])],
            vec![subject("CSI000", 1), subject("S2", 2)],
        );
        let (_, network) = roster.network(&config).unwrap();

        assert_eq!(network.capacity(1, 2), Some(1));
        // rank counts the position in the teacher's list, skipped entries included
        let to_s2 = network.edges().iter().find(|e| e.tail == 1 && e.head == 3).unwrap();
        assert_eq!(to_s2.unit_cost, 8);
        assert_eq!(roster.rank(0, "S2"), Some(3));
    }

    #[test]
    fn preferences_beyond_tiers_are_rejected() {
        let config = AllocationConfig {
            tiers: CostTiers::new(vec![0]),
            ..AllocationConfig::default()
        };
        let roster = Roster::new(
            vec![teacher("T1", 2, &["S1", "S2"])],
            vec![subject("S1", 1), subject("S2", 1)],
        );
        assert_eq!(
            roster.network(&config).unwrap_err(),
            Error::RankOutOfTiers {
                teacher: "T1".to_string(),
                rank: 1
            }
        );
    }

    #[test]
    fn negative_counts_are_rejected() {
        let roster = Roster::new(vec![teacher("T1", -1, &[])], vec![]);
        assert_eq!(
            roster.network(&AllocationConfig::default()).unwrap_err(),
            Error::NegativeClasses("T1".to_string())
        );
    }

    #[test]
    fn declared_total_replaces_sum() {
        let roster = Roster::new(vec![], vec![subject("S1", 3)]).with_total_classes(10);
        assert_eq!(roster.total_classes(), 10);
        let (_, network) = roster.network(&AllocationConfig::default()).unwrap();
        assert_eq!(network.supply(0), 10);
    }
}
