//! Forest assembly: flat node records into nested, id-ordered trees
//!
//! Records are materialized into an index-based arena, linked to their
//! parents by index, ordered by id, and only then turned into owned nested
//! [`Node`] values. Assembly is total: every input record appears exactly
//! once in the output, whatever the input looks like.

use std::collections::HashMap;

use tracing::debug;

use super::node::{Node, NodeId, NodeRecord};

/// Assemble records into a forest of root nodes
///
/// Input is expected in ascending id order (the order `NodeStore::list_all`
/// returns), but the output order does not depend on it: roots and every
/// `children` list come back sorted by id.
///
/// A record whose parent is missing from `records` is an orphan and is
/// promoted to a root. A record naming itself as its parent is treated the
/// same way.
pub fn assemble<I>(records: I) -> Vec<Node>
where
    I: IntoIterator<Item = NodeRecord>,
{
    let mut arena = ForestArena::materialize(records);
    arena.link();
    arena.rescue_cycles();
    arena.order();
    arena.into_forest()
}

struct Slot {
    record: NodeRecord,
    parent: Option<usize>,
    children: Vec<usize>,
}

struct ForestArena {
    slots: Vec<Slot>,
    /// id -> slot index; on duplicate ids the first record wins lookups
    index: HashMap<NodeId, usize>,
    roots: Vec<usize>,
}

impl ForestArena {
    fn materialize<I>(records: I) -> Self
    where
        I: IntoIterator<Item = NodeRecord>,
    {
        let records = records.into_iter();
        let mut slots = Vec::with_capacity(records.size_hint().0);
        let mut index = HashMap::with_capacity(records.size_hint().0);

        for record in records {
            index.entry(record.id).or_insert(slots.len());
            slots.push(Slot {
                record,
                parent: None,
                children: Vec::new(),
            });
        }

        Self {
            slots,
            index,
            roots: Vec::new(),
        }
    }

    fn link(&mut self) {
        let mut orphans = 0usize;

        for i in 0..self.slots.len() {
            let declared = self.slots[i].record.parent_id;
            let parent = declared
                .and_then(|id| self.index.get(&id).copied())
                .filter(|&p| p != i);

            match parent {
                Some(p) => {
                    self.slots[i].parent = Some(p);
                    self.slots[p].children.push(i);
                }
                None => {
                    if declared.is_some() {
                        orphans += 1;
                    }
                    self.roots.push(i);
                }
            }
        }

        if orphans > 0 {
            debug!(orphans, "promoted orphaned nodes to roots");
        }
    }

    /// Break parent cycles so no record is unreachable from a root.
    ///
    /// The store cannot produce cycles, but a snapshot handed in directly
    /// can. For every cycle the member with the smallest id is detached from
    /// its parent and becomes a root.
    fn rescue_cycles(&mut self) {
        let mut reached = vec![false; self.slots.len()];
        for &root in &self.roots {
            self.mark_reached(root, &mut reached);
        }
        if reached.iter().all(|&r| r) {
            return;
        }

        let mut stranded: Vec<usize> = (0..self.slots.len()).filter(|&i| !reached[i]).collect();
        stranded.sort_by_key(|&i| (self.slots[i].record.id, i));

        for start in stranded {
            if reached[start] {
                continue;
            }

            // Walk up until a slot repeats; everything from its first
            // occurrence onwards is the cycle.
            let mut walk: Vec<usize> = Vec::new();
            let mut position: HashMap<usize, usize> = HashMap::new();
            let mut cursor = start;
            let cycle_start = loop {
                if let Some(&pos) = position.get(&cursor) {
                    break pos;
                }
                position.insert(cursor, walk.len());
                walk.push(cursor);
                match self.slots[cursor].parent {
                    Some(parent) => cursor = parent,
                    // Unreachable slots always have a parent; a parentless
                    // one is a root and was marked above.
                    None => break walk.len() - 1,
                }
            };

            let Some(&breaker) = walk[cycle_start..]
                .iter()
                .min_by_key(|&&i| (self.slots[i].record.id, i))
            else {
                continue;
            };

            if let Some(parent) = self.slots[breaker].parent.take() {
                self.slots[parent].children.retain(|&c| c != breaker);
            }
            debug!(id = %self.slots[breaker].record.id, "broke parent cycle");
            self.roots.push(breaker);
            self.mark_reached(breaker, &mut reached);
        }
    }

    fn mark_reached(&self, from: usize, reached: &mut [bool]) {
        let mut stack = vec![from];
        while let Some(i) = stack.pop() {
            if reached[i] {
                continue;
            }
            reached[i] = true;
            stack.extend(self.slots[i].children.iter().copied());
        }
    }

    fn order(&mut self) {
        let keys: Vec<_> = self
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (slot.record.id, i))
            .collect();

        self.roots.sort_by_key(|&i| keys[i]);
        for slot in &mut self.slots {
            slot.children.sort_by_key(|&i| keys[i]);
        }
    }

    fn into_forest(self) -> Vec<Node> {
        let Self { slots, roots, .. } = self;

        let mut records = Vec::with_capacity(slots.len());
        let mut children = Vec::with_capacity(slots.len());
        for slot in slots {
            records.push(Some(slot.record));
            children.push(slot.children);
        }

        // Post-order so each node is built after all of its children.
        let mut post_order = Vec::with_capacity(records.len());
        let mut stack: Vec<(usize, bool)> = roots.iter().rev().map(|&r| (r, false)).collect();
        while let Some((i, expanded)) = stack.pop() {
            if expanded {
                post_order.push(i);
            } else {
                stack.push((i, true));
                stack.extend(children[i].iter().rev().map(|&c| (c, false)));
            }
        }

        let mut built: Vec<Option<Node>> = Vec::with_capacity(records.len());
        built.resize_with(records.len(), || None);

        for i in post_order {
            let Some(record) = records[i].take() else {
                continue;
            };
            let mut node = Node::from_record(record);
            node.children = children[i].iter().filter_map(|&c| built[c].take()).collect();
            built[i] = Some(node);
        }

        roots.iter().filter_map(|&r| built[r].take()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn ids(nodes: &[Node]) -> Vec<i64> {
        nodes.iter().map(|n| n.id.get()).collect()
    }

    fn total(forest: &[Node]) -> usize {
        forest.iter().map(Node::subtree_len).sum()
    }

    fn assert_strictly_ascending(forest: &[Node]) {
        let mut stack: Vec<&[Node]> = vec![forest];
        while let Some(level) = stack.pop() {
            for pair in level.windows(2) {
                assert!(pair[0].id < pair[1].id, "{} !< {}", pair[0].id, pair[1].id);
            }
            for node in level {
                stack.push(&node.children);
            }
        }
    }

    fn sample_rows() -> Vec<NodeRecord> {
        vec![
            NodeRecord::root(1, "root"),
            NodeRecord::child(2, "child1", 1),
            NodeRecord::child(3, "child2", 1),
            NodeRecord::child(4, "grandchild", 2),
            NodeRecord::root(5, "another_root"),
        ]
    }

    /// Random append-only forest: each record's parent is absent or an
    /// earlier id, like the store produces.
    fn random_rows(rng: &mut StdRng, n: i64) -> Vec<NodeRecord> {
        (1..=n)
            .map(|id| {
                if id == 1 || rng.gen_bool(0.2) {
                    NodeRecord::root(id, format!("n{id}"))
                } else {
                    NodeRecord::child(id, format!("n{id}"), rng.gen_range(1..id))
                }
            })
            .collect()
    }

    #[test]
    fn test_sample_scenario() {
        let forest = assemble(sample_rows());

        assert_eq!(ids(&forest), vec![1, 5]);
        assert_eq!(ids(&forest[0].children), vec![2, 3]);
        assert_eq!(ids(&forest[0].children[0].children), vec![4]);
        assert!(forest[0].children[1].children.is_empty());
        assert!(forest[0].children[0].children[0].children.is_empty());
        assert!(forest[1].children.is_empty());
        assert_eq!(forest[0].children[0].children[0].label, "grandchild");
    }

    #[test]
    fn test_empty_input_gives_empty_forest() {
        let forest = assemble(Vec::new());
        assert!(forest.is_empty());
    }

    #[test]
    fn test_parent_ids_are_kept_on_assembled_nodes() {
        let forest = assemble(sample_rows());
        assert_eq!(forest[0].parent_id, None);
        assert_eq!(forest[0].children[1].parent_id, Some(NodeId::new(1)));
    }

    #[test]
    fn test_orphan_is_promoted_to_root() {
        let rows = vec![
            NodeRecord::root(1, "root"),
            NodeRecord::child(2, "orphan", 42),
            NodeRecord::child(3, "orphan child", 2),
        ];
        let forest = assemble(rows);

        assert_eq!(ids(&forest), vec![1, 2]);
        assert_eq!(ids(&forest[1].children), vec![3]);
        assert_eq!(forest[1].parent_id, Some(NodeId::new(42)));
    }

    #[test]
    fn test_self_parent_is_promoted_to_root() {
        let rows = vec![NodeRecord::root(1, "a"), NodeRecord::child(2, "loop", 2)];
        let forest = assemble(rows);
        assert_eq!(ids(&forest), vec![1, 2]);
        assert_eq!(total(&forest), 2);
    }

    #[test]
    fn test_parent_cycle_is_broken_at_smallest_id() {
        let rows = vec![
            NodeRecord::root(1, "root"),
            NodeRecord::child(2, "hangs off cycle", 7),
            NodeRecord::child(5, "cycle a", 6),
            NodeRecord::child(6, "cycle b", 7),
            NodeRecord::child(7, "cycle c", 5),
        ];
        let forest = assemble(rows);

        assert_eq!(ids(&forest), vec![1, 5]);
        assert_eq!(ids(&forest[1].children), vec![7]);
        assert_eq!(ids(&forest[1].children[0].children), vec![2, 6]);
        assert_eq!(total(&forest), 5);
    }

    #[test]
    fn test_children_sorted_regardless_of_input_order() {
        let mut rows = sample_rows();
        rows.reverse();
        assert_eq!(assemble(rows), assemble(sample_rows()));
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(7);
        let rows = random_rows(&mut rng, 200);
        assert_eq!(assemble(rows.clone()), assemble(rows));
    }

    #[test]
    fn test_shuffled_input_yields_same_forest() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let rows = random_rows(&mut rng, 150);
            let expected = assemble(rows.clone());

            let mut shuffled = rows;
            shuffled.shuffle(&mut rng);
            let forest = assemble(shuffled);

            assert_eq!(forest, expected);
            assert_strictly_ascending(&forest);
        }
    }

    #[test]
    fn test_never_drops_rows_with_dangling_parents() {
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..20 {
            let n: i64 = rng.gen_range(0..120);
            let rows: Vec<_> = (1..=n)
                .map(|id| {
                    let parent = rng.gen_range(-5..n + 20);
                    if parent <= 0 {
                        NodeRecord::root(id, "x")
                    } else {
                        NodeRecord::child(id, "x", parent)
                    }
                })
                .collect();

            let forest = assemble(rows);
            assert_eq!(total(&forest), n as usize);
            assert_strictly_ascending(&forest);
        }
    }

    #[test]
    fn test_duplicate_ids_keep_every_record() {
        let rows = vec![
            NodeRecord::root(1, "first"),
            NodeRecord::root(1, "second"),
            NodeRecord::child(2, "child", 1),
        ];
        let forest = assemble(rows);

        assert_eq!(total(&forest), 3);
        assert_eq!(forest[0].label, "first");
        assert_eq!(ids(&forest[0].children), vec![2]);
    }

    #[test]
    fn test_deep_chain() {
        let rows: Vec<_> = (1..=2_000)
            .map(|id| {
                if id == 1 {
                    NodeRecord::root(id, "level 0")
                } else {
                    NodeRecord::child(id, format!("level {}", id - 1), id - 1)
                }
            })
            .collect();
        let forest = assemble(rows);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].subtree_len(), 2_000);

        let mut depth = 0;
        let mut node = &forest[0];
        while let Some(child) = node.children.first() {
            depth += 1;
            node = child;
        }
        assert_eq!(depth, 1_999);
        assert_eq!(node.label, "level 1999");
    }

    #[test]
    fn test_very_deep_chain_on_small_stack() {
        const DEPTH: i64 = 100_000;

        // Assembling, encoding, comparing and dropping must not grow the
        // call stack with the forest's depth.
        let worker = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(|| {
                let chain = || {
                    (1..=DEPTH).map(|id| match id {
                        1 => NodeRecord::root(id, "level 0"),
                        _ => NodeRecord::child(id, format!("level {}", id - 1), id - 1),
                    })
                };
                let forest = assemble(chain());
                assert_eq!(total(&forest), DEPTH as usize);
                assert!(forest == assemble(chain()));

                let json = crate::forest::json::forest_to_vec(&forest).unwrap();
                assert!(json.starts_with(br#"[{"id":1,"label":"level 0","children":[{"id":2,"#));
                assert!(json.ends_with(b"]}]}]"));
                json.len()
            })
            .unwrap();

        assert!(worker.join().unwrap() > 0);
    }
}
