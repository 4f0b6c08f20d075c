//! Domain entities: core data structures

use std::fmt;

/// Identifier of a person, unique across one family tree.
pub type PersonId = i64;

/// Calendar year of birth.
pub type BirthYear = i32;

/// Data payload of a tree node.
///
/// Structural links (parent, children) live in [`crate::domain::PersonNode`];
/// this is the part callers may edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub pid: PersonId,
    /// Empty string marks an invalid person
    pub name: String,
    pub birth_year: BirthYear,
}

impl Person {
    pub fn new(pid: PersonId, name: impl Into<String>, birth_year: BirthYear) -> Self {
        Self {
            pid,
            name: name.into(),
            birth_year,
        }
    }

    /// Label used by the detailed renderer: `name (year) [id]`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) [{}]", self.name, self.birth_year, self.pid)
    }
}

