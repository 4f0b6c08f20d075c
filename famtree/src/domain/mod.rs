//! Domain layer: the family tree and its algorithms
//!
//! This layer is independent of external concerns (no I/O beyond a caller
//! supplied writer, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
pub mod prune;
pub mod queries;
pub mod render;
pub mod sample;

pub use arena::{FamilyTree, PersonNode, PostOrderIterator, TreeIterator};
pub use builder::{build_family_tree, FamilyTreeBuilder};
pub use entities::*;
pub use error::{DomainError, TreeResult, Violation};
pub use render::TreeNodeConvert;
