//! Plain row data derived from a session, so the views only render.

use crate::hierarchy::{flatten_preorder, path_to, HierarchySession, TreeNode};
use crate::models::OrgNode;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LevelRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub child_count: usize,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct TreeRow {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    /// Indentation relative to the level being shown.
    pub indent: usize,
    pub child_count: usize,
    /// Rows of the shown level can be selected and entered; deeper rows are context.
    pub on_current_level: bool,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Crumb {
    pub id: String,
    pub name: String,
    /// How many `back()` calls bring this crumb's level into view.
    pub backs: usize,
}

fn display_name(node: &TreeNode<OrgNode>) -> String {
    let name = node.item.name.trim();
    if name.is_empty() {
        node.item.id.clone()
    } else {
        name.to_string()
    }
}

pub(crate) fn level_rows(session: &HierarchySession<OrgNode>) -> Vec<LevelRow> {
    let selected = session.selected_id();
    session
        .current_level()
        .iter()
        .map(|n| LevelRow {
            id: n.item.id.clone(),
            name: display_name(n),
            description: n.item.description.clone(),
            is_active: n.item.is_active,
            child_count: n.children.len(),
            selected: selected == Some(n.item.id.as_str()),
        })
        .collect()
}

pub(crate) fn tree_rows(session: &HierarchySession<OrgNode>) -> Vec<TreeRow> {
    let selected = session.selected_id();
    let base = session.depth();
    flatten_preorder(session.current_level())
        .into_iter()
        .map(|n| TreeRow {
            id: n.item.id.clone(),
            name: display_name(n),
            is_active: n.item.is_active,
            indent: n.level.saturating_sub(base),
            child_count: n.children.len(),
            on_current_level: n.level == base,
            selected: selected == Some(n.item.id.as_str()),
        })
        .collect()
}

pub(crate) fn crumbs(session: &HierarchySession<OrgNode>) -> Vec<Crumb> {
    let path = session.path();
    let depth = path.len();
    path.into_iter()
        .enumerate()
        .map(|(i, n)| Crumb {
            id: n.item.id.clone(),
            name: display_name(n),
            backs: depth - i - 1,
        })
        .collect()
}

/// "HQ / Engineering / Platform" for the selected node, wherever it sits.
pub(crate) fn selected_label(session: &HierarchySession<OrgNode>) -> Option<String> {
    let id = session.selected_id()?;
    let path = path_to(session.forest(), id)?;
    Some(
        path.into_iter()
            .map(display_name)
            .collect::<Vec<_>>()
            .join(" / "),
    )
}
