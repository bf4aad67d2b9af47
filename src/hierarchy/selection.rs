use super::{find, Hierarchical, TreeNode};

/// Holds the id of the selected node.
///
/// Selecting is level-scoped: only a node on the level being shown can be
/// picked. Resolving is not: [`SelectionResolver::current`] searches the whole
/// forest, so a selection survives the cursor moving elsewhere.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionResolver {
    selected: Option<String>,
}

impl SelectionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select `id` if it is one of `level`. Returns whether it was accepted.
    pub fn select<T: Hierarchical>(&mut self, level: &[TreeNode<T>], id: &str) -> bool {
        if level.iter().any(|n| n.id() == id) {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Select a node the caller already holds (e.g. the entered node).
    pub fn select_node<T: Hierarchical>(&mut self, node: &TreeNode<T>) {
        self.selected = Some(node.id().to_string());
    }

    /// Returns whether something was selected.
    pub fn clear(&mut self) -> bool {
        self.selected.take().is_some()
    }

    pub fn is_selected_in<T: Hierarchical>(&self, level: &[TreeNode<T>]) -> bool {
        match &self.selected {
            Some(id) => level.iter().any(|n| n.id() == id),
            None => false,
        }
    }

    /// Full record of the selection, `None` when nothing is selected or the id went stale.
    pub fn current<'a, T: Hierarchical>(&self, forest: &'a [TreeNode<T>]) -> Option<&'a TreeNode<T>> {
        self.selected.as_deref().and_then(|id| find(forest, id))
    }
}
