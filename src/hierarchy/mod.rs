//! Hierarchy tree engine.
//!
//! Materializes a forest from a flat, parent-referenced list of records and
//! drives the drill-down navigation used by the org structure modal, the user
//! assignment modal and the tree visualization.
//!
//! Nothing in here touches the DOM or the network, so the whole module is
//! exercised by host-side tests.

mod builder;
mod cursor;
mod fetch;
mod locator;
mod selection;
mod session;

pub use builder::build;
pub use cursor::NavigationCursor;
pub use fetch::FetchGuard;
pub use locator::{count, find, flatten_preorder, path_to};
pub use selection::SelectionResolver;
pub use session::{BackSelection, HierarchySession, SelectionPolicy, SessionView};

use serde::Serialize;

/// A record that knows its own id and, optionally, its parent's id.
pub trait Hierarchical {
    fn id(&self) -> &str;

    /// `None` for roots. An id that matches no record is treated as a root too.
    fn parent_id(&self) -> Option<&str>;
}

/// A record placed in the forest.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TreeNode<T> {
    #[serde(flatten)]
    pub item: T,

    /// 0 for roots.
    pub level: usize,

    pub children: Vec<TreeNode<T>>,
}

impl<T: Hierarchical> TreeNode<T> {
    pub fn id(&self) -> &str {
        self.item.id()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

// Descendants are released from a heap stack; the derived drop glue would
// recurse once per level.
impl<T> Drop for TreeNode<T> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Hierarchical;

    /// Minimal record used by the engine tests.
    #[derive(Clone, Debug, PartialEq)]
    pub(crate) struct Rec {
        pub id: String,
        pub parent: Option<String>,
    }

    impl Hierarchical for Rec {
        fn id(&self) -> &str {
            &self.id
        }

        fn parent_id(&self) -> Option<&str> {
            self.parent.as_deref()
        }
    }

    pub(crate) fn rec(id: &str, parent: Option<&str>) -> Rec {
        Rec {
            id: id.to_string(),
            parent: parent.map(|p| p.to_string()),
        }
    }

    /// a, a/b, a/b/c, a/d, e
    pub(crate) fn sample() -> Vec<Rec> {
        vec![
            rec("a", None),
            rec("b", Some("a")),
            rec("c", Some("b")),
            rec("d", Some("a")),
            rec("e", None),
        ]
    }
}
