use super::{build, count, path_to, Hierarchical, NavigationCursor, SelectionResolver, TreeNode};
use strum::{AsRefStr, Display};

/// What `back()` does with the selection when it lands on the root level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, AsRefStr)]
pub enum BackSelection {
    /// Going back from one level deep keeps a selection that is a root node.
    #[default]
    KeepRootLevel,
    /// Every `back()` clears the selection.
    ClearAlways,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionPolicy {
    pub back: BackSelection,

    /// Clear the selection when `reset()` leaves a non-root level.
    pub clear_on_reset: bool,
}

impl SelectionPolicy {
    /// Policy of the read-only tree view: any movement drops the highlight.
    pub fn strict() -> Self {
        Self {
            back: BackSelection::ClearAlways,
            clear_on_reset: true,
        }
    }
}

/// State after a transition.
#[derive(Debug)]
pub struct SessionView<'a, T> {
    /// Whether the transition did anything. Invalid transitions leave the state as is.
    pub changed: bool,
    pub path: Vec<&'a TreeNode<T>>,
    pub current_level: &'a [TreeNode<T>],
    pub selected: Option<&'a TreeNode<T>>,
}

/// One navigation session over one snapshot: forest, cursor and selection.
///
/// Lives as long as the hosting modal or page. Replacing the snapshot starts
/// the navigation over, since cursor indices and selected ids from an older
/// snapshot must not leak into the new one.
#[derive(Clone, Debug)]
pub struct HierarchySession<T> {
    forest: Vec<TreeNode<T>>,
    cursor: NavigationCursor,
    selection: SelectionResolver,
    policy: SelectionPolicy,
    generation: u64,
}

impl<T> Default for HierarchySession<T> {
    fn default() -> Self {
        Self {
            forest: Vec::new(),
            cursor: NavigationCursor::new(),
            selection: SelectionResolver::new(),
            policy: SelectionPolicy::default(),
            generation: 0,
        }
    }
}

impl<T: Hierarchical + Clone> HierarchySession<T> {
    pub fn new(items: &[T], policy: SelectionPolicy) -> Self {
        Self {
            forest: build(items),
            policy,
            ..Self::default()
        }
    }

    pub fn with_policy(policy: SelectionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn forest(&self) -> &[TreeNode<T>] {
        &self.forest
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Bumped on every snapshot replacement.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_empty(&self) -> bool {
        self.forest.is_empty()
    }

    pub fn node_count(&self) -> usize {
        count(&self.forest)
    }

    pub fn depth(&self) -> usize {
        self.cursor.depth()
    }

    pub fn current_level(&self) -> &[TreeNode<T>] {
        self.cursor.current_level(&self.forest)
    }

    pub fn path(&self) -> Vec<&TreeNode<T>> {
        self.cursor.path(&self.forest)
    }

    pub fn entered(&self) -> Option<&TreeNode<T>> {
        self.cursor.entered(&self.forest)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selection.selected_id()
    }

    pub fn selected(&self) -> Option<&TreeNode<T>> {
        self.selection.current(&self.forest)
    }

    pub fn view(&self) -> SessionView<'_, T> {
        self.view_after(false)
    }

    fn view_after(&self, changed: bool) -> SessionView<'_, T> {
        SessionView {
            changed,
            path: self.path(),
            current_level: self.current_level(),
            selected: self.selected(),
        }
    }

    /// Rebuild from a fresh snapshot; navigation starts over at the root level.
    pub fn replace_snapshot(&mut self, items: &[T]) {
        self.forest = build(items);
        self.cursor.reset();
        self.selection.clear();
        self.generation = self.generation.wrapping_add(1);
        tracing::debug!(
            generation = self.generation,
            roots = self.forest.len(),
            "hierarchy snapshot replaced"
        );
    }

    /// Back to the initial state over the same snapshot (modal reopened).
    pub fn restart(&mut self) {
        self.cursor.reset();
        self.selection.clear();
    }

    pub fn enter(&mut self, id: &str) -> SessionView<'_, T> {
        let changed = self.cursor.enter(&self.forest, id);
        if changed {
            self.selection.clear();
            tracing::trace!(id, depth = self.cursor.depth(), "entered node");
        }
        self.view_after(changed)
    }

    pub fn back(&mut self) -> SessionView<'_, T> {
        let from_depth = self.cursor.depth();
        let changed = self.cursor.back();
        if changed {
            let keep = from_depth == 1
                && self.policy.back == BackSelection::KeepRootLevel
                && self.selection.is_selected_in(&self.forest);
            if !keep {
                self.selection.clear();
            }
            tracing::trace!(depth = self.cursor.depth(), kept_selection = keep, "went back");
        }
        self.view_after(changed)
    }

    pub fn reset(&mut self) -> SessionView<'_, T> {
        let changed = self.cursor.reset();
        if changed && self.policy.clear_on_reset {
            self.selection.clear();
        }
        self.view_after(changed)
    }

    /// Select a node of the current level. Anything else is rejected (`changed == false`).
    pub fn select(&mut self, id: &str) -> SessionView<'_, T> {
        let level = self.cursor.current_level(&self.forest);
        let changed = self.selection.select(level, id);
        if !changed {
            tracing::trace!(id, "selection rejected, not on current level");
        }
        self.view_after(changed)
    }

    /// Select the node whose children are being shown. No-op at the root level.
    pub fn select_entered(&mut self) -> SessionView<'_, T> {
        let changed = match self.cursor.entered(&self.forest) {
            Some(node) => {
                self.selection.select_node(node);
                true
            }
            None => false,
        };
        self.view_after(changed)
    }

    pub fn clear_selection(&mut self) -> SessionView<'_, T> {
        let changed = self.selection.clear();
        self.view_after(changed)
    }

    /// Jump to the level holding `id` and select it there. Unknown ids leave
    /// the session as it was.
    pub fn reveal(&mut self, id: &str) -> SessionView<'_, T> {
        let ancestors: Vec<String> = match path_to(&self.forest, id) {
            Some(path) => path[..path.len() - 1]
                .iter()
                .map(|n| n.id().to_string())
                .collect(),
            None => return self.view_after(false),
        };

        let before = (self.cursor.clone(), self.selection.clone());
        self.cursor.reset();
        for ancestor in &ancestors {
            self.cursor.enter(&self.forest, ancestor);
        }
        self.selection
            .select(self.cursor.current_level(&self.forest), id);

        let changed = before != (self.cursor.clone(), self.selection.clone());
        self.view_after(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::testing::{rec, sample, Rec};

    fn ids<T: Hierarchical>(nodes: &[TreeNode<T>]) -> Vec<&str> {
        nodes.iter().map(|n| n.id()).collect()
    }

    fn session() -> HierarchySession<Rec> {
        HierarchySession::new(&sample(), SelectionPolicy::default())
    }

    #[test]
    fn test_navigation_round_trip() {
        let mut s = session();
        let roots: Vec<String> = ids(s.current_level()).iter().map(|x| x.to_string()).collect();

        assert!(s.enter("a").changed);
        let view = s.back();
        assert!(view.changed);
        assert!(view.path.is_empty());
        assert_eq!(ids(view.current_level), roots);
    }

    #[test]
    fn test_invalid_transitions_are_noops() {
        let mut s = session();
        let view = s.back();
        assert!(!view.changed);
        assert!(view.path.is_empty());

        let view = s.enter("e");
        assert!(!view.changed);
        assert_eq!(ids(view.current_level), vec!["a", "e"]);

        let view = s.select("c");
        assert!(!view.changed);
        assert!(view.selected.is_none());

        assert!(!s.select_entered().changed);
        assert!(!s.reset().changed);
    }

    #[test]
    fn test_enter_clears_root_selection() {
        let mut s = session();
        assert!(s.select("a").changed);
        assert_eq!(s.selected_id(), Some("a"));

        let view = s.enter("a");
        assert!(view.changed);
        assert!(view.selected.is_none());
        assert!(s.selected_id().is_none());
    }

    #[test]
    fn test_back_clears_child_selection() {
        let mut s = session();
        s.enter("a");
        assert!(s.select("d").changed);

        let view = s.back();
        assert!(view.selected.is_none());
    }

    #[test]
    fn test_back_from_first_level_keeps_root_selection() {
        let mut s = session();
        s.enter("a");
        let view = s.select_entered();
        assert!(view.changed);
        assert_eq!(view.selected.map(|n| n.id()), Some("a"));

        let view = s.back();
        assert!(view.path.is_empty());
        assert_eq!(view.selected.map(|n| n.id()), Some("a"));
    }

    #[test]
    fn test_back_from_deeper_level_clears_entered_selection() {
        let mut s = session();
        s.enter("a");
        s.enter("b");
        s.select_entered();
        assert_eq!(s.selected_id(), Some("b"));

        let view = s.back();
        assert!(view.selected.is_none());
        assert_eq!(view.path.len(), 1);
        assert_eq!(s.depth(), 1);
    }

    #[test]
    fn test_back_clear_always_policy_drops_root_selection() {
        let mut s = HierarchySession::new(
            &sample(),
            SelectionPolicy {
                back: BackSelection::ClearAlways,
                clear_on_reset: false,
            },
        );
        s.enter("a");
        s.select_entered();
        let view = s.back();
        assert!(view.changed);
        assert!(view.selected.is_none());
    }

    #[test]
    fn test_selection_survives_reset() {
        let mut s = session();
        s.enter("a");
        s.enter("b");
        assert!(s.select("c").changed);

        let view = s.reset();
        assert!(view.changed);
        assert!(view.path.is_empty());
        let node = view.selected.expect("selection should still resolve");
        assert_eq!(node.id(), "c");
        assert_eq!(node.level, 2);
    }

    #[test]
    fn test_strict_policy_clears_on_reset() {
        let mut s = HierarchySession::new(&sample(), SelectionPolicy::strict());
        s.enter("a");
        s.select("b");
        assert!(s.reset().selected.is_none());

        // Reset at the root level is not a movement.
        s.select("e");
        assert_eq!(s.reset().selected.map(|n| n.id()), Some("e"));
    }

    #[test]
    fn test_replace_snapshot_starts_over() {
        let mut s = session();
        s.enter("a");
        s.select("b");
        assert_eq!(s.generation(), 0);

        s.replace_snapshot(&[rec("a", None), rec("z", Some("a"))]);
        assert_eq!(s.generation(), 1);
        assert_eq!(s.depth(), 0);
        assert!(s.selected().is_none());
        assert_eq!(ids(s.current_level()), vec!["a"]);
        assert_eq!(s.node_count(), 2);
    }

    #[test]
    fn test_restart_keeps_forest() {
        let mut s = session();
        s.enter("a");
        s.select("d");
        s.restart();
        assert_eq!(s.depth(), 0);
        assert!(s.selected_id().is_none());
        assert_eq!(s.node_count(), 5);
    }

    #[test]
    fn test_empty_session() {
        let mut s: HierarchySession<Rec> = HierarchySession::with_policy(SelectionPolicy::default());
        assert!(s.is_empty());
        assert!(s.current_level().is_empty());
        assert!(!s.enter("a").changed);
        assert!(s.selected().is_none());
    }

    #[test]
    fn test_entered_follows_path() {
        let mut s = session();
        assert!(s.entered().is_none());
        s.enter("a");
        s.enter("b");
        assert_eq!(s.entered().map(|n| n.id()), Some("b"));
        let path: Vec<&str> = s.path().iter().map(|n| n.id()).collect();
        assert_eq!(path, vec!["a", "b"]);
    }

    #[test]
    fn test_reveal_opens_the_owning_level() {
        let mut s = session();
        s.select("e");
        let view = s.reveal("c");
        assert!(view.changed);
        let path: Vec<&str> = view.path.iter().map(|n| n.id()).collect();
        assert_eq!(path, vec!["a", "b"]);
        assert_eq!(view.selected.map(|n| n.id()), Some("c"));

        assert!(!s.reveal("c").changed);
    }

    #[test]
    fn test_reveal_unknown_id_is_noop() {
        let mut s = session();
        s.enter("a");
        s.select("d");
        let view = s.reveal("zzz");
        assert!(!view.changed);
        assert_eq!(view.path.len(), 1);
        assert_eq!(view.selected.map(|n| n.id()), Some("d"));
    }

    #[test]
    fn test_reveal_root_node() {
        let mut s = session();
        s.enter("a");
        s.enter("b");
        s.reveal("e");
        assert_eq!(s.depth(), 0);
        assert_eq!(s.selected_id(), Some("e"));
    }
}
