use super::{Hierarchical, TreeNode};

/// Drill-down position inside a forest.
///
/// The path is stored as child indices (root index first), so the cursor only
/// makes sense against the forest it was moved on. Replacing the forest must
/// go together with [`NavigationCursor::reset`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavigationCursor {
    path: Vec<usize>,
}

impl NavigationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 0 at the root level.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn is_at_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Forest roots when nothing is entered, else the children of the last entered node.
    pub fn current_level<'a, T>(&self, forest: &'a [TreeNode<T>]) -> &'a [TreeNode<T>] {
        let mut level = forest;
        for &i in &self.path {
            match level.get(i) {
                Some(node) => level = &node.children,
                None => return &[],
            }
        }
        level
    }

    /// Entered nodes, root-to-current.
    pub fn path<'a, T>(&self, forest: &'a [TreeNode<T>]) -> Vec<&'a TreeNode<T>> {
        let mut out = Vec::with_capacity(self.path.len());
        let mut level = forest;
        for &i in &self.path {
            let Some(node) = level.get(i) else {
                break;
            };
            out.push(node);
            level = &node.children;
        }
        out
    }

    /// The node whose children are currently shown.
    pub fn entered<'a, T>(&self, forest: &'a [TreeNode<T>]) -> Option<&'a TreeNode<T>> {
        self.path(forest).pop()
    }

    /// Step into `id` if it is on the current level and has children.
    ///
    /// Returns `false` (and leaves the cursor alone) otherwise.
    pub fn enter<T: Hierarchical>(&mut self, forest: &[TreeNode<T>], id: &str) -> bool {
        let level = self.current_level(forest);
        match level.iter().position(|n| n.id() == id) {
            Some(i) if level[i].has_children() => {
                self.path.push(i);
                true
            }
            _ => false,
        }
    }

    /// Step out one level. `false` at the root level.
    pub fn back(&mut self) -> bool {
        self.path.pop().is_some()
    }

    /// Return to the root level. `true` if the cursor moved.
    pub fn reset(&mut self) -> bool {
        let moved = !self.path.is_empty();
        self.path.clear();
        moved
    }
}
