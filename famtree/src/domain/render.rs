//! Textual depiction of a subtree.

use std::io::{self, Write};

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::FamilyTree;

const PIPE: &str = "│  ";
const BLANK: &str = "   ";
const TEE: &str = "├─ ";
const ELBOW: &str = "└─ ";

impl FamilyTree {
    /// Write the subtree at `start`, one line per person.
    ///
    /// Lines are either the bare name or `name (year) [id]`.
    #[instrument(level = "debug", skip(self, out))]
    pub fn draw<W: Write>(&self, start: Index, names_only: bool, out: &mut W) -> io::Result<()> {
        self.draw_rec(start, names_only, &[], None, out)
    }

    pub fn draw_to_string(&self, start: Index, names_only: bool) -> String {
        let mut buf = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.draw(start, names_only, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// `trail[i]` is true while the ancestor at depth `i + 1` still has
    /// siblings to come. `is_last` is `None` for the rendering root.
    fn draw_rec<W: Write>(
        &self,
        idx: Index,
        names_only: bool,
        trail: &[bool],
        is_last: Option<bool>,
        out: &mut W,
    ) -> io::Result<()> {
        let Some(node) = self.get_node(idx) else {
            return Ok(());
        };

        for &open in trail {
            out.write_all(if open { PIPE } else { BLANK }.as_bytes())?;
        }
        if let Some(last) = is_last {
            out.write_all(if last { ELBOW } else { TEE }.as_bytes())?;
        }
        if names_only {
            writeln!(out, "{}", node.data.name)?;
        } else {
            writeln!(out, "{}", node.data)?;
        }

        let child_trail = match is_last {
            Some(last) => {
                let mut extended = trail.to_vec();
                extended.push(!last);
                extended
            }
            None => Vec::new(),
        };
        let count = node.children.len();
        for (i, &child) in node.children.iter().enumerate() {
            self.draw_rec(child, names_only, &child_trail, Some(i + 1 == count), out)?;
        }
        Ok(())
    }
}

/// Conversion into a `termtree` for the alternative layout.
pub trait TreeNodeConvert {
    fn to_tree_string(&self, start: Index, names_only: bool) -> Tree<String>;
}

impl TreeNodeConvert for FamilyTree {
    fn to_tree_string(&self, start: Index, names_only: bool) -> Tree<String> {
        let Some(node) = self.get_node(start) else {
            return Tree::new("Empty tree".to_string());
        };
        let label = if names_only {
            node.data.name.clone()
        } else {
            node.data.label()
        };

        let leaves: Vec<_> = node
            .children
            .iter()
            .map(|&c| self.to_tree_string(c, names_only))
            .collect();

        Tree::new(label).with_leaves(leaves)
    }
}
