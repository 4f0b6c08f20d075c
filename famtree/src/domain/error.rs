//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::{BirthYear, PersonId};

/// Domain errors: reasons the builder refuses a set of input tables.
///
/// Every variant means "no tree"; nothing is constructed before the
/// tables pass all checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("birth year given for unknown person: {0}")]
    UnknownName(PersonId),

    #[error("children listed for unknown parent: {0}")]
    UnknownParent(PersonId),

    #[error("unknown child {child} listed under parent {parent}")]
    UnknownChild { parent: PersonId, child: PersonId },

    #[error("person {child} listed as a child more than once (again under {parent})")]
    DuplicateChild { parent: PersonId, child: PersonId },

    #[error("missing birth year for person: {0}")]
    MissingBirthYear(PersonId),

    #[error("no root: every person is somebody's child")]
    NoRoot,

    #[error("multiple roots: {0:?}")]
    MultipleRoots(Vec<PersonId>),

    #[error("cycle detected, persons unreachable from root: {0:?}")]
    CycleDetected(Vec<PersonId>),
}

/// Result type for tree construction.
pub type TreeResult<T> = Result<T, DomainError>;

/// First broken invariant found by a validity check.
///
/// Not a fault: a built tree whose data was edited afterwards simply
/// reports what is wrong with it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("person {0} has an empty name")]
    EmptyName(PersonId),

    #[error("person {pid} born {birth_year}, not after parent born {parent_birth_year}")]
    BirthYearNotAfterParent {
        pid: PersonId,
        birth_year: BirthYear,
        parent_birth_year: BirthYear,
    },

    #[error("children of {parent} share the name {name:?}")]
    DuplicateSiblingName { parent: PersonId, name: String },

    #[error("person is not part of the tree")]
    UnknownPerson,
}
