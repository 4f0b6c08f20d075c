//! Read-only queries over a family tree.
//!
//! Every query works on the subtree rooted at the node it is given.
//! [`FamilyTree::valid_family_tree`] is the one exception: it climbs to the
//! true root first.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use generational_arena::Index;
use itertools::Itertools;
use tracing::instrument;

use crate::domain::arena::FamilyTree;
use crate::domain::entities::{BirthYear, PersonId};
use crate::domain::error::Violation;

/// Which side of the limit an age gap must fall on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gap {
    /// `child - parent < limit`
    Below,
    /// `child - parent > limit`
    Above,
}

impl FamilyTree {
    /// True iff the subtree at `start` breaks no invariant.
    pub fn is_valid(&self, start: Index) -> bool {
        self.validate(start).is_ok()
    }

    /// First violation in pre-order, treating `start` as a root.
    #[instrument(level = "debug", skip(self))]
    pub fn validate(&self, start: Index) -> Result<(), Violation> {
        if !self.contains(start) {
            return Err(Violation::UnknownPerson);
        }
        self.validate_rec(start, 0)
    }

    fn validate_rec(&self, idx: Index, parent_birth_year: BirthYear) -> Result<(), Violation> {
        let Some(node) = self.get_node(idx) else {
            return Ok(());
        };
        let person = &node.data;

        if person.name.is_empty() {
            return Err(Violation::EmptyName(person.pid));
        }
        if parent_birth_year >= person.birth_year {
            return Err(Violation::BirthYearNotAfterParent {
                pid: person.pid,
                birth_year: person.birth_year,
                parent_birth_year,
            });
        }

        let mut names = HashSet::new();
        for sibling in node.children.iter().filter_map(|&c| self.person(c)) {
            if !names.insert(sibling.name.as_str()) {
                return Err(Violation::DuplicateSiblingName {
                    parent: person.pid,
                    name: sibling.name.clone(),
                });
            }
        }

        for &child in &node.children {
            self.validate_rec(child, person.birth_year)?;
        }
        Ok(())
    }

    /// Validity of the whole tree `idx` belongs to.
    pub fn valid_family_tree(&self, idx: Index) -> bool {
        self.is_valid(self.top_of(idx))
    }

    /// The true root of the tree `idx` belongs to.
    pub fn top_of(&self, mut idx: Index) -> Index {
        while let Some(parent) = self.parent(idx) {
            idx = parent;
        }
        idx
    }

    /// Ancestors of `idx`, root first. Empty for the root.
    pub fn ancestors(&self, idx: Index) -> Vec<Index> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(idx);
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.parent(parent);
        }
        ancestors.reverse();
        ancestors
    }

    /// Ids of everyone in the subtree without children.
    #[instrument(level = "debug", skip(self))]
    pub fn childless(&self, start: Index) -> BTreeSet<PersonId> {
        self.iter_from(start)
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.data.pid)
            .collect()
    }

    /// Parents with at least one child born less than `limit` years after them.
    pub fn parents_younger_than(&self, start: Index, limit: BirthYear) -> BTreeSet<PersonId> {
        self.parents_by_gap(start, limit, Gap::Below)
    }

    /// Parents with at least one child born more than `limit` years after them.
    pub fn parents_older_than(&self, start: Index, limit: BirthYear) -> BTreeSet<PersonId> {
        self.parents_by_gap(start, limit, Gap::Above)
    }

    #[instrument(level = "debug", skip(self))]
    fn parents_by_gap(&self, start: Index, limit: BirthYear, gap: Gap) -> BTreeSet<PersonId> {
        let mut parents = BTreeSet::new();
        for (_, node) in self.iter_from(start) {
            let parent_year = node.data.birth_year;
            let triggered = node
                .children
                .iter()
                .filter_map(|&c| self.person(c))
                .any(|child| {
                    // the difference of two i32 years always fits an i64
                    let diff = i64::from(child.birth_year) - i64::from(parent_year);
                    match gap {
                        Gap::Below => diff < i64::from(limit),
                        Gap::Above => diff > i64::from(limit),
                    }
                });
            if triggered {
                parents.insert(node.data.pid);
            }
        }
        parents
    }

    /// Rank (1-based) of every alive descendant of `start` in the line of
    /// succession.
    ///
    /// At each level children are taken eldest first; each child is followed
    /// by its own complete line before the next sibling. The person at
    /// `start` is never part of their own line.
    #[instrument(level = "debug", skip(self, alive))]
    pub fn order_of_succession(
        &self,
        start: Index,
        alive: &HashSet<PersonId>,
    ) -> BTreeMap<PersonId, usize> {
        let mut line = Vec::new();
        self.succession_line(start, &mut line);

        line.into_iter()
            .filter(|pid| alive.contains(pid))
            .enumerate()
            .map(|(i, pid)| (pid, i + 1))
            .collect()
    }

    fn succession_line(&self, idx: Index, line: &mut Vec<PersonId>) {
        // sorted_by_key is stable: equal birth years keep sibling order
        let children = self
            .children(idx)
            .iter()
            .filter_map(|&c| self.person(c).map(|p| (c, p.pid, p.birth_year)))
            .sorted_by_key(|&(_, _, birth_year)| birth_year);

        for (child, pid, _) in children {
            line.push(pid);
            self.succession_line(child, line);
        }
    }
}
