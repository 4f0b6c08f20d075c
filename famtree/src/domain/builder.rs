//! Tree builder: validates flat input tables and materializes a family tree.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::FamilyTree;
use crate::domain::entities::{BirthYear, Person, PersonId};
use crate::domain::error::{DomainError, TreeResult};

/// Collects id→name, id→children and id→birth-year tables and turns them
/// into a [`FamilyTree`].
///
/// Tables are kept ordered by id so that, when several rules are broken,
/// the reported one does not depend on hash order.
#[derive(Debug, Default, Clone)]
pub struct FamilyTreeBuilder {
    names: BTreeMap<PersonId, String>,
    children: BTreeMap<PersonId, Vec<PersonId>>,
    birth_years: BTreeMap<PersonId, BirthYear>,
}

impl FamilyTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(
        names: &HashMap<PersonId, String>,
        children: &HashMap<PersonId, Vec<PersonId>>,
        birth_years: &HashMap<PersonId, BirthYear>,
    ) -> Self {
        Self {
            names: names.iter().map(|(&k, v)| (k, v.clone())).collect(),
            children: children.iter().map(|(&k, v)| (k, v.clone())).collect(),
            birth_years: birth_years.iter().map(|(&k, &v)| (k, v)).collect(),
        }
    }

    /// Add a person's name and birth year.
    pub fn person(mut self, pid: PersonId, name: impl Into<String>, birth_year: BirthYear) -> Self {
        self.names.insert(pid, name.into());
        self.birth_years.insert(pid, birth_year);
        self
    }

    /// Set the ordered children of `pid`.
    pub fn children(mut self, pid: PersonId, kids: impl IntoIterator<Item = PersonId>) -> Self {
        self.children.insert(pid, kids.into_iter().collect());
        self
    }

    /// Validate the tables, then build the tree.
    ///
    /// No node is created unless every check passes.
    #[instrument(level = "debug", skip(self), fields(persons = self.names.len()))]
    pub fn build(&self) -> TreeResult<FamilyTree> {
        let root = self.find_root()?;
        self.check_reachable(root)?;

        let mut tree = FamilyTree::with_root(self.person_for(root)?);
        let root_idx = tree.root();
        self.attach_children(&mut tree, root_idx, root)?;

        debug!(root, persons = tree.len(), "family tree built");
        Ok(tree)
    }

    fn find_root(&self) -> TreeResult<PersonId> {
        if let Some(&pid) = self
            .birth_years
            .keys()
            .find(|pid| !self.names.contains_key(pid))
        {
            return Err(DomainError::UnknownName(pid));
        }

        let mut roots: BTreeSet<PersonId> = self.names.keys().copied().collect();
        let mut seen_children = HashSet::new();

        for (&parent, kids) in &self.children {
            if !self.names.contains_key(&parent) {
                return Err(DomainError::UnknownParent(parent));
            }
            for &child in kids {
                if !seen_children.insert(child) {
                    return Err(DomainError::DuplicateChild { parent, child });
                }
                if !self.names.contains_key(&child) {
                    return Err(DomainError::UnknownChild { parent, child });
                }
                roots.remove(&child);
            }
        }

        if let Some(&pid) = self
            .names
            .keys()
            .find(|pid| !self.birth_years.contains_key(pid))
        {
            return Err(DomainError::MissingBirthYear(pid));
        }

        let mut roots = roots.into_iter();
        match (roots.next(), roots.next()) {
            (None, _) => Err(DomainError::NoRoot),
            (Some(root), None) => Ok(root),
            (Some(first), Some(second)) => {
                let mut all = vec![first, second];
                all.extend(roots);
                Err(DomainError::MultipleRoots(all))
            }
        }
    }

    /// A detached cycle leaves a unique root but can never be materialized.
    fn check_reachable(&self, root: PersonId) -> TreeResult<()> {
        let mut reached = HashSet::from([root]);
        let mut stack = vec![root];
        while let Some(pid) = stack.pop() {
            for &child in self.kids_of(pid) {
                if reached.insert(child) {
                    stack.push(child);
                }
            }
        }

        let unreachable: Vec<PersonId> = self
            .names
            .keys()
            .filter(|pid| !reached.contains(pid))
            .copied()
            .collect();
        if unreachable.is_empty() {
            Ok(())
        } else {
            Err(DomainError::CycleDetected(unreachable))
        }
    }

    fn attach_children(&self, tree: &mut FamilyTree, idx: Index, pid: PersonId) -> TreeResult<()> {
        for &child in self.kids_of(pid) {
            let child_idx = tree.insert_child(idx, self.person_for(child)?);
            self.attach_children(tree, child_idx, child)?;
        }
        Ok(())
    }

    fn kids_of(&self, pid: PersonId) -> &[PersonId] {
        self.children.get(&pid).map(Vec::as_slice).unwrap_or(&[])
    }

    fn person_for(&self, pid: PersonId) -> TreeResult<Person> {
        let name = self.names.get(&pid).ok_or(DomainError::UnknownName(pid))?;
        let birth_year = self
            .birth_years
            .get(&pid)
            .ok_or(DomainError::MissingBirthYear(pid))?;
        Ok(Person::new(pid, name.clone(), *birth_year))
    }
}

/// Build a family tree from flat tables; `None` when the tables are malformed.
pub fn build_family_tree(
    names: &HashMap<PersonId, String>,
    children: &HashMap<PersonId, Vec<PersonId>>,
    birth_years: &HashMap<PersonId, BirthYear>,
) -> Option<FamilyTree> {
    match FamilyTreeBuilder::from_tables(names, children, birth_years).build() {
        Ok(tree) => Some(tree),
        Err(e) => {
            debug!(error = %e, "rejecting family tables");
            None
        }
    }
}
