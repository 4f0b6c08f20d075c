//! Removal of extinct branches.

use std::collections::HashSet;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::FamilyTree;
use crate::domain::entities::PersonId;

impl FamilyTree {
    /// Remove every branch below `start` that ends in no living person.
    ///
    /// A childless person not in `alive` is removed, which may leave their
    /// parent childless in turn; the cascade stops at `start`, which is
    /// kept even when it ends up childless and dead. Returns the removed
    /// ids, deepest first.
    #[instrument(level = "debug", skip(self, alive))]
    pub fn remove_extinct_branches(
        &mut self,
        start: Index,
        alive: &HashSet<PersonId>,
    ) -> Vec<PersonId> {
        // children come before parents, so each node is tested only after
        // its own children have been settled
        let order: Vec<Index> = self.iter_postorder_from(start).map(|(idx, _)| idx).collect();

        let mut removed = Vec::new();
        for idx in order {
            let Some(node) = self.get_node(idx) else {
                continue;
            };
            let pid = node.data.pid;
            let survivors: Vec<Index> = node
                .children
                .iter()
                .copied()
                .filter(|&child| self.contains(child))
                .collect();

            if survivors.is_empty() && idx != start && !alive.contains(&pid) {
                self.release(idx);
                debug!(pid, "removed extinct person");
                removed.push(pid);
            } else if let Some(node) = self.get_node_mut(idx) {
                node.children = survivors;
            }
        }
        removed
    }
}
