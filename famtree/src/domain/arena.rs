use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{Person, PersonId};

/// Tree node in the arena-based family structure.
#[derive(Debug)]
pub struct PersonNode {
    /// Person data for this node
    pub data: Person,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in sibling order
    pub children: Vec<Index>,
}

/// Arena-based family tree.
///
/// The arena owns every node; a node's `children` list is the ownership
/// edge and `parent` is a plain back-reference. Removed nodes leave their
/// `Index` stale, which the generation check turns into "absent".
#[derive(Debug)]
pub struct FamilyTree {
    arena: Arena<PersonNode>,
    root: Index,
    by_pid: HashMap<PersonId, Index>,
}

impl FamilyTree {
    pub(crate) fn with_root(person: Person) -> Self {
        let pid = person.pid;
        let mut arena = Arena::new();
        let root = arena.insert(PersonNode {
            data: person,
            parent: None,
            children: Vec::new(),
        });
        let mut by_pid = HashMap::new();
        by_pid.insert(pid, root);
        Self {
            arena,
            root,
            by_pid,
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub(crate) fn insert_child(&mut self, parent: Index, person: Person) -> Index {
        let pid = person.pid;
        let node = PersonNode {
            data: person,
            parent: Some(parent),
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);
        if let Some(parent) = self.arena.get_mut(parent) {
            parent.children.push(node_idx);
        }
        self.by_pid.insert(pid, node_idx);
        node_idx
    }

    /// Drops a node from the arena. Callers detach it from its parent.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn release(&mut self, idx: Index) -> Option<PersonNode> {
        let node = self.arena.remove(idx)?;
        self.by_pid.remove(&node.data.pid);
        Some(node)
    }

    pub(crate) fn get_node_mut(&mut self, idx: Index) -> Option<&mut PersonNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, idx: Index) -> bool {
        self.arena.contains(idx)
    }

    pub fn get_node(&self, idx: Index) -> Option<&PersonNode> {
        self.arena.get(idx)
    }

    pub fn person(&self, idx: Index) -> Option<&Person> {
        self.arena.get(idx).map(|node| &node.data)
    }

    /// Edit a person's name or birth year. Structure stays untouched.
    pub fn person_mut(&mut self, idx: Index) -> Option<&mut Person> {
        self.arena.get_mut(idx).map(|node| &mut node.data)
    }

    /// Look up a person by id.
    pub fn find(&self, pid: PersonId) -> Option<Index> {
        self.by_pid.get(&pid).copied()
    }

    pub fn parent(&self, idx: Index) -> Option<Index> {
        self.arena.get(idx).and_then(|node| node.parent)
    }

    pub fn children(&self, idx: Index) -> &[Index] {
        self.arena
            .get(idx)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Pre-order walk of the whole tree.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self, self.root)
    }

    /// Pre-order walk of the subtree rooted at `start`.
    pub fn iter_from(&self, start: Index) -> TreeIterator<'_> {
        TreeIterator::new(self, start)
    }

    /// Post-order walk of the subtree rooted at `start`.
    pub fn iter_postorder_from(&self, start: Index) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, start)
    }

    /// Number of generations below and including the root.
    #[instrument(level = "debug", skip(self))]
    pub fn generations(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }
}

pub struct TreeIterator<'a> {
    tree: &'a FamilyTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a FamilyTree, start: Index) -> Self {
        let mut stack = Vec::new();
        if tree.contains(start) {
            stack.push(start);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a PersonNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a FamilyTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a FamilyTree, start: Index) -> Self {
        let mut stack = Vec::new();
        if tree.contains(start) {
            stack.push((start, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a PersonNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
