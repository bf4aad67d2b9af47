use super::{Hierarchical, TreeNode};
use std::collections::{HashMap, VecDeque};

/// Build a forest from a flat list of parent-referenced records.
///
/// Every distinct id in `items` ends up in the result exactly once:
/// - a record whose parent id is missing, unknown or its own id becomes a root;
/// - for duplicate ids the last record wins, placed where the id first appeared;
/// - a parent cycle is cut at the member that comes first in `items`.
///
/// Children keep the relative order of `items`. Levels are recomputed from the
/// linked structure and never read from the input.
pub fn build<T: Hierarchical + Clone>(items: &[T]) -> Vec<TreeNode<T>> {
    let mut slot_of: HashMap<&str, usize> = HashMap::with_capacity(items.len());
    let mut records: Vec<&T> = Vec::with_capacity(items.len());

    for item in items {
        match slot_of.get(item.id()) {
            Some(&slot) => records[slot] = item,
            None => {
                slot_of.insert(item.id(), records.len());
                records.push(item);
            }
        }
    }

    if records.len() != items.len() {
        tracing::debug!(
            duplicates = items.len() - records.len(),
            "duplicate node ids collapsed"
        );
    }

    let mut parent: Vec<Option<usize>> = records
        .iter()
        .enumerate()
        .map(|(slot, r)| {
            r.parent_id()
                .and_then(|pid| slot_of.get(pid).copied())
                .filter(|&p| p != slot)
        })
        .collect();

    break_cycles(&mut parent, &records);

    let n = records.len();
    let mut roots: Vec<usize> = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (slot, p) in parent.iter().enumerate() {
        match p {
            Some(p) => children[*p].push(slot),
            None => roots.push(slot),
        }
    }

    // Top-down pass: levels, plus an order in which every parent precedes its children.
    let mut level = vec![0usize; n];
    let mut order: Vec<usize> = Vec::with_capacity(n);
    let mut queue: VecDeque<usize> = roots.iter().copied().collect();
    while let Some(slot) = queue.pop_front() {
        order.push(slot);
        for &c in &children[slot] {
            level[c] = level[slot] + 1;
            queue.push_back(c);
        }
    }

    // Bottom-up pass: children are materialized before the parent that owns them.
    let mut built: Vec<Option<TreeNode<T>>> = (0..n).map(|_| None).collect();
    for &slot in order.iter().rev() {
        let kids = children[slot]
            .iter()
            .filter_map(|&c| built[c].take())
            .collect();
        built[slot] = Some(TreeNode {
            item: records[slot].clone(),
            level: level[slot],
            children: kids,
        });
    }

    let forest: Vec<TreeNode<T>> = roots.iter().filter_map(|&r| built[r].take()).collect();
    tracing::debug!(nodes = n, roots = forest.len(), "hierarchy built");
    forest
}

/// Detach every parent link that closes a cycle, so that each slot reaches a root.
fn break_cycles<T: Hierarchical>(parent: &mut [Option<usize>], records: &[&T]) {
    const UNSEEN: u8 = 0;
    const ON_WALK: u8 = 1;
    const ROOTED: u8 = 2;

    let mut state = vec![UNSEEN; parent.len()];
    let mut walk: Vec<usize> = Vec::new();

    for start in 0..parent.len() {
        if state[start] == ROOTED {
            continue;
        }

        walk.clear();
        let mut cur = start;
        loop {
            if state[cur] == ROOTED {
                break;
            }
            if state[cur] == ON_WALK {
                if let Some(pos) = walk.iter().position(|&s| s == cur) {
                    if let Some(&victim) = walk[pos..].iter().min() {
                        tracing::warn!(
                            id = records[victim].id(),
                            members = walk.len() - pos,
                            "parent cycle detected, promoting node to root"
                        );
                        parent[victim] = None;
                    }
                }
                break;
            }

            state[cur] = ON_WALK;
            walk.push(cur);
            match parent[cur] {
                Some(p) => cur = p,
                None => break,
            }
        }

        for &s in &walk {
            state[s] = ROOTED;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::testing::{rec, sample, Rec};
    use crate::hierarchy::flatten_preorder;

    fn ids(nodes: &[TreeNode<Rec>]) -> Vec<&str> {
        nodes.iter().map(|n| n.id()).collect()
    }

    #[test]
    fn test_build_links_children_and_levels() {
        let forest = build(&[rec("a", None), rec("b", Some("a")), rec("c", Some("b"))]);

        assert_eq!(ids(&forest), vec!["a"]);
        let a = &forest[0];
        assert_eq!(a.level, 0);
        assert_eq!(ids(&a.children), vec!["b"]);
        let b = &a.children[0];
        assert_eq!(b.level, 1);
        assert_eq!(ids(&b.children), vec!["c"]);
        let c = &b.children[0];
        assert_eq!(c.level, 2);
        assert!(c.children.is_empty());
    }

    #[test]
    fn test_build_empty_input() {
        let forest: Vec<TreeNode<Rec>> = build(&[]);
        assert!(forest.is_empty());
    }

    #[test]
    fn test_build_promotes_orphans() {
        let forest = build(&[rec("x", Some("missing"))]);
        assert_eq!(ids(&forest), vec!["x"]);
        assert_eq!(forest[0].level, 0);
    }

    #[test]
    fn test_build_self_reference_is_root() {
        let forest = build(&[rec("y", Some("y"))]);
        assert_eq!(ids(&forest), vec!["y"]);
        assert_eq!(forest[0].level, 0);
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn test_build_child_before_parent_in_input() {
        let forest = build(&[rec("c", Some("p")), rec("p", None)]);
        assert_eq!(ids(&forest), vec!["p"]);
        assert_eq!(ids(&forest[0].children), vec!["c"]);
        assert_eq!(forest[0].children[0].level, 1);
    }

    #[test]
    fn test_build_keeps_input_order_for_siblings() {
        let forest = build(&[
            rec("r", None),
            rec("zeta", Some("r")),
            rec("alpha", Some("r")),
            rec("mid", Some("r")),
            rec("q", None),
        ]);
        assert_eq!(ids(&forest), vec!["r", "q"]);
        assert_eq!(ids(&forest[0].children), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_build_duplicate_ids_last_record_wins() {
        let forest = build(&[
            rec("a", None),
            rec("b", None),
            rec("a", Some("b")),
        ]);
        // One "a", now under "b".
        assert_eq!(ids(&forest), vec!["b"]);
        assert_eq!(ids(&forest[0].children), vec!["a"]);
        assert_eq!(forest[0].children[0].item.parent.as_deref(), Some("b"));
    }

    #[test]
    fn test_build_breaks_two_node_cycle() {
        let forest = build(&[rec("a", Some("b")), rec("b", Some("a"))]);
        assert_eq!(ids(&forest), vec!["a"]);
        assert_eq!(ids(&forest[0].children), vec!["b"]);
        assert_eq!(forest[0].children[0].level, 1);
    }

    #[test]
    fn test_build_breaks_cycle_with_tail() {
        // t hangs below the cycle b -> c -> d -> b.
        let forest = build(&[
            rec("t", Some("c")),
            rec("b", Some("d")),
            rec("c", Some("b")),
            rec("d", Some("c")),
        ]);
        assert_eq!(ids(&forest), vec!["b"]);
        let all: Vec<&str> = flatten_preorder(&forest).iter().map(|n| n.id()).collect();
        assert_eq!(all, vec!["b", "c", "t", "d"]);
        let c = &forest[0].children[0];
        assert_eq!(c.level, 1);
        assert_eq!(ids(&c.children), vec!["t", "d"]);
        assert!(c.children.iter().all(|n| n.level == 2));
    }

    fn levels(forest: &[TreeNode<Rec>]) -> Vec<(&str, usize)> {
        flatten_preorder(forest)
            .into_iter()
            .map(|n| (n.id(), n.level))
            .collect()
    }

    #[test]
    fn test_build_duplicate_record_dissolves_cycle() {
        // b <-> d is a cycle until the later records override both.
        let forest = build(&[
            rec("a", None),
            rec("c", Some("a")),
            rec("b", Some("d")),
            rec("d", Some("b")),
            rec("b", Some("b")),
            rec("d", None),
        ]);
        assert_eq!(levels(&forest), vec![("a", 0), ("c", 1), ("b", 0), ("d", 0)]);
    }

    #[test]
    fn test_build_duplicate_record_closes_cycle() {
        let forest = build(&[
            rec("a", None),
            rec("c", Some("a")),
            rec("b", Some("d")),
            rec("d", None),
            rec("d", Some("b")),
        ]);
        assert_eq!(levels(&forest), vec![("a", 0), ("c", 1), ("b", 0), ("d", 1)]);
    }

    #[test]
    fn test_build_does_not_trust_input_levels() {
        let forest = build(&sample());
        let levels: Vec<(&str, usize)> = flatten_preorder(&forest)
            .iter()
            .map(|n| (n.id(), n.level))
            .collect();
        assert_eq!(
            levels,
            vec![("a", 0), ("b", 1), ("c", 2), ("d", 1), ("e", 0)]
        );
    }

    #[test]
    fn test_build_deep_chain_without_recursion() {
        let depth = 2_000;
        let mut items = vec![rec("n0", None)];
        for i in 1..depth {
            items.push(rec(&format!("n{i}"), Some(&format!("n{}", i - 1))));
        }
        items.reverse();

        let forest = build(&items);
        assert_eq!(ids(&forest), vec!["n0"]);

        let mut node = &forest[0];
        while let Some(next) = node.children.first() {
            node = next;
        }
        assert_eq!(node.id(), format!("n{}", depth - 1));
        assert_eq!(node.level, depth - 1);
    }

    #[test]
    fn test_build_and_drop_hundred_thousand_levels() {
        let depth = 100_000;
        let items: Vec<Rec> = (0..depth)
            .map(|i: usize| {
                let parent = i.checked_sub(1).map(|p| format!("n{p}"));
                rec(&format!("n{i}"), parent.as_deref())
            })
            .collect();

        let forest = build(&items);
        assert_eq!(ids(&forest), vec!["n0"]);
        assert_eq!(crate::hierarchy::count(&forest), depth);

        let last = format!("n{}", depth - 1);
        let found = crate::hierarchy::find(&forest, &last).map(|n| n.level);
        assert_eq!(found, Some(depth - 1));
        drop(forest);
    }
}
