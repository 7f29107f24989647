use core::ops::Range;

/// Role of a vertex in the allocation network. Roles are positional, see [`Layout`].
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug)]
pub enum Role {
    Source,
    /// Teacher with the given roster index
    Teacher(usize),
    /// Subject with the given roster index
    Subject(usize),
    Sink,
}

/// Positional vertex layout: `0` is the source, then one vertex per teacher, one vertex per
/// subject, and the sink last.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    teachers: usize,
    subjects: usize,
}

impl Layout {
    pub fn new(teachers: usize, subjects: usize) -> Self {
        Self { teachers, subjects }
    }

    pub fn num_vertices(&self) -> usize {
        self.teachers + self.subjects + 2
    }

    pub fn num_teachers(&self) -> usize {
        self.teachers
    }

    pub fn num_subjects(&self) -> usize {
        self.subjects
    }

    pub fn source(&self) -> usize {
        0
    }

    pub fn sink(&self) -> usize {
        self.num_vertices() - 1
    }

    pub fn teacher(&self, idx: usize) -> usize {
        debug_assert!(idx < self.teachers);
        1 + idx
    }

    pub fn subject(&self, idx: usize) -> usize {
        debug_assert!(idx < self.subjects);
        1 + self.teachers + idx
    }

    pub fn teachers(&self) -> Range<usize> {
        1..1 + self.teachers
    }

    pub fn subjects(&self) -> Range<usize> {
        1 + self.teachers..1 + self.teachers + self.subjects
    }

    pub fn role(&self, vertex: usize) -> Option<Role> {
        match vertex {
            0 => Some(Role::Source),
            v if self.teachers().contains(&v) => Some(Role::Teacher(v - 1)),
            v if self.subjects().contains(&v) => Some(Role::Subject(v - 1 - self.teachers)),
            v if v == self.sink() => Some(Role::Sink),
            _ => None,
        }
    }
}
