use super::{Hierarchical, TreeNode};

/// Find a node anywhere in the forest, collapsed subtrees included.
///
/// Searches depth-first with an explicit stack; `None` is an expected outcome
/// (e.g. a stale id after a snapshot refresh).
pub fn find<'a, T: Hierarchical>(forest: &'a [TreeNode<T>], id: &str) -> Option<&'a TreeNode<T>> {
    let mut stack: Vec<&TreeNode<T>> = forest.iter().rev().collect();
    while let Some(node) = stack.pop() {
        if node.id() == id {
            return Some(node);
        }
        stack.extend(node.children.iter().rev());
    }
    None
}

/// Root-to-node ancestry of `id`, the node itself last.
pub fn path_to<'a, T: Hierarchical>(
    forest: &'a [TreeNode<T>],
    id: &str,
) -> Option<Vec<&'a TreeNode<T>>> {
    // Each frame is a node plus the index of the next child to visit.
    let mut path: Vec<(&TreeNode<T>, usize)> = Vec::new();

    for root in forest {
        path.clear();
        path.push((root, 0));

        while let Some(&(node, next)) = path.last() {
            if next == 0 && node.id() == id {
                return Some(path.iter().map(|(n, _)| *n).collect());
            }
            match node.children.get(next) {
                Some(child) => {
                    if let Some(top) = path.last_mut() {
                        top.1 += 1;
                    }
                    path.push((child, 0));
                }
                None => {
                    path.pop();
                }
            }
        }
    }

    None
}

/// Pre-order listing of the whole forest.
pub fn flatten_preorder<T>(forest: &[TreeNode<T>]) -> Vec<&TreeNode<T>> {
    let mut out = Vec::new();
    let mut stack: Vec<&TreeNode<T>> = forest.iter().rev().collect();
    while let Some(node) = stack.pop() {
        out.push(node);
        stack.extend(node.children.iter().rev());
    }
    out
}

/// Number of nodes in the forest.
pub fn count<T>(forest: &[TreeNode<T>]) -> usize {
    let mut n = 0;
    let mut stack: Vec<&TreeNode<T>> = forest.iter().collect();
    while let Some(node) = stack.pop() {
        n += 1;
        stack.extend(node.children.iter());
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build;
    use crate::hierarchy::testing::sample;

    #[test]
    fn test_find_root_and_deep_nodes() {
        let forest = build(&sample());
        assert_eq!(find(&forest, "e").map(|n| n.level), Some(0));
        let c = find(&forest, "c").expect("c should be found");
        assert_eq!(c.level, 2);
        assert_eq!(c.item.parent.as_deref(), Some("b"));
    }

    #[test]
    fn test_find_returns_subtree() {
        let forest = build(&sample());
        let a = find(&forest, "a").expect("a should be found");
        let kids: Vec<&str> = a.children.iter().map(|n| n.id()).collect();
        assert_eq!(kids, vec!["b", "d"]);
    }

    #[test]
    fn test_find_missing_is_none() {
        let forest = build(&sample());
        assert!(find(&forest, "zzz").is_none());
        assert!(find::<crate::hierarchy::testing::Rec>(&[], "a").is_none());
    }

    #[test]
    fn test_path_to_lists_ancestors() {
        let forest = build(&sample());
        let path: Vec<&str> = path_to(&forest, "c")
            .expect("c should have a path")
            .iter()
            .map(|n| n.id())
            .collect();
        assert_eq!(path, vec!["a", "b", "c"]);

        let path: Vec<&str> = path_to(&forest, "d")
            .expect("d should have a path")
            .iter()
            .map(|n| n.id())
            .collect();
        assert_eq!(path, vec!["a", "d"]);

        let path: Vec<&str> = path_to(&forest, "e")
            .expect("e should have a path")
            .iter()
            .map(|n| n.id())
            .collect();
        assert_eq!(path, vec!["e"]);

        assert!(path_to(&forest, "nope").is_none());
    }

    #[test]
    fn test_flatten_and_count() {
        let forest = build(&sample());
        let order: Vec<&str> = flatten_preorder(&forest).iter().map(|n| n.id()).collect();
        assert_eq!(order, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(count(&forest), 5);
    }
}
