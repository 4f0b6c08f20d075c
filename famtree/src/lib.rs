//! Genealogical family trees.
//!
//! A [`domain::FamilyTree`] is built from flat id tables by
//! [`domain::FamilyTreeBuilder`] and then queried: validity, ancestors,
//! childless persons, age gaps, line of succession, drawing, and pruning
//! of branches without living descendants.

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{build_family_tree, FamilyTree, FamilyTreeBuilder, Person, PersonId};
