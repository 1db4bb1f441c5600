//! RbTree: the single-threaded balanced ordered tree.
//!
//! A red-black tree whose nodes live in a `SlotMap` arena; parent and
//! child links are generational keys rather than pointers, which keeps
//! the whole structure in safe Rust (stale links are a logic bug that
//! surfaces as a panic, never undefined behavior).
//!
//! Key comparisons go through [`StructuralOrd`] and can fail; every
//! failing operation returns before touching a link or a color, so the
//! red-black invariants survive all error paths. Concurrency is layered
//! on top by [`crate::RbMap`].

use crate::order::{OrderError, StructuralOrd};
use core::cmp::Ordering;
use core::mem;
use slotmap::SlotMap;

slotmap::new_key_type! {
    pub(crate) struct NodeId;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Color {
    Red,
    Black,
}

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    color: Color,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

/// An ordered map over structurally comparable keys. Not synchronized;
/// see [`crate::RbMap`] for the lock-guarded facade.
pub struct RbTree<K, V> {
    nodes: SlotMap<NodeId, Node<K, V>>,
    root: Option<NodeId>,
}

impl<K, V> Default for RbTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RbTree<K, V> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Discard every entry. The arena is dropped wholesale; no per-node
    /// unlinking is needed.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    fn color(&self, id: Option<NodeId>) -> Color {
        // Absent children count as black leaves.
        id.map_or(Color::Black, |n| self.nodes[n].color)
    }

    fn min_node(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.nodes[id].left {
            id = left;
        }
        id
    }

    pub(crate) fn first(&self) -> Option<NodeId> {
        self.root.map(|r| self.min_node(r))
    }

    pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(right) = self.nodes[id].right {
            return Some(self.min_node(right));
        }
        // Climb until we come up from a left child.
        let mut child = id;
        let mut parent = self.nodes[child].parent;
        while let Some(p) = parent {
            if self.nodes[p].left == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self.nodes[p].parent;
        }
        None
    }

    pub(crate) fn entry(&self, id: NodeId) -> (&K, &V) {
        let node = &self.nodes[id];
        (&node.key, &node.value)
    }

    /// Ascending in-order iterator over borrowed entries.
    pub fn iter(&self) -> InOrder<'_, K, V> {
        InOrder {
            tree: self,
            next: self.first(),
        }
    }

    fn rotate_left(&mut self, x: NodeId) {
        let y = self.nodes[x].right.expect("left rotation requires a right child");
        let middle = self.nodes[y].left;
        self.nodes[x].right = middle;
        if let Some(m) = middle {
            self.nodes[m].parent = Some(x);
        }
        let parent = self.nodes[x].parent;
        self.nodes[y].parent = parent;
        match parent {
            None => self.root = Some(y),
            Some(p) => {
                if self.nodes[p].left == Some(x) {
                    self.nodes[p].left = Some(y);
                } else {
                    self.nodes[p].right = Some(y);
                }
            }
        }
        self.nodes[y].left = Some(x);
        self.nodes[x].parent = Some(y);
    }

    fn rotate_right(&mut self, x: NodeId) {
        let y = self.nodes[x].left.expect("right rotation requires a left child");
        let middle = self.nodes[y].right;
        self.nodes[x].left = middle;
        if let Some(m) = middle {
            self.nodes[m].parent = Some(x);
        }
        let parent = self.nodes[x].parent;
        self.nodes[y].parent = parent;
        match parent {
            None => self.root = Some(y),
            Some(p) => {
                if self.nodes[p].left == Some(x) {
                    self.nodes[p].left = Some(y);
                } else {
                    self.nodes[p].right = Some(y);
                }
            }
        }
        self.nodes[y].right = Some(x);
        self.nodes[x].parent = Some(y);
    }

    /// Replace the subtree rooted at `u` with the one rooted at `v` in
    /// `u`'s parent. `u`'s own links are left untouched.
    fn transplant(&mut self, u: NodeId, v: Option<NodeId>) {
        let parent = self.nodes[u].parent;
        match parent {
            None => self.root = v,
            Some(p) => {
                if self.nodes[p].left == Some(u) {
                    self.nodes[p].left = v;
                } else {
                    self.nodes[p].right = v;
                }
            }
        }
        if let Some(v) = v {
            self.nodes[v].parent = parent;
        }
    }
}

impl<K: StructuralOrd, V> RbTree<K, V> {
    fn find_node(&self, key: &K) -> Result<Option<NodeId>, OrderError> {
        let mut cur = self.root;
        while let Some(id) = cur {
            cur = match key.structural_cmp(&self.nodes[id].key)? {
                Ordering::Less => self.nodes[id].left,
                Ordering::Greater => self.nodes[id].right,
                Ordering::Equal => return Ok(Some(id)),
            };
        }
        Ok(None)
    }

    pub fn get(&self, key: &K) -> Result<Option<&V>, OrderError> {
        Ok(self.find_node(key)?.map(|id| &self.nodes[id].value))
    }

    pub fn contains(&self, key: &K) -> Result<bool, OrderError> {
        Ok(self.find_node(key)?.is_some())
    }

    /// Insert or replace. An equal key keeps its node (no rebalancing)
    /// and the displaced value is returned; a new key is attached as a
    /// red leaf and the insert fixup restores the invariants.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, OrderError> {
        let mut parent = None;
        let mut went_left = false;
        let mut cur = self.root;
        while let Some(id) = cur {
            match key.structural_cmp(&self.nodes[id].key)? {
                Ordering::Less => {
                    parent = Some(id);
                    went_left = true;
                    cur = self.nodes[id].left;
                }
                Ordering::Greater => {
                    parent = Some(id);
                    went_left = false;
                    cur = self.nodes[id].right;
                }
                Ordering::Equal => {
                    return Ok(Some(mem::replace(&mut self.nodes[id].value, value)));
                }
            }
        }

        let id = self.nodes.insert(Node {
            key,
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        });
        match parent {
            None => self.root = Some(id),
            Some(p) => {
                if went_left {
                    self.nodes[p].left = Some(id);
                } else {
                    self.nodes[p].right = Some(id);
                }
            }
        }
        self.insert_fixup(id);
        Ok(None)
    }

    fn insert_fixup(&mut self, mut x: NodeId) {
        while let Some(p) = self.nodes[x].parent {
            if self.nodes[p].color == Color::Black {
                break;
            }
            // A red parent cannot be the root, so the grandparent exists.
            let g = self.nodes[p].parent.expect("red node has a parent");
            if self.nodes[g].left == Some(p) {
                match self.nodes[g].right {
                    Some(u) if self.nodes[u].color == Color::Red => {
                        self.nodes[p].color = Color::Black;
                        self.nodes[u].color = Color::Black;
                        self.nodes[g].color = Color::Red;
                        x = g;
                    }
                    _ => {
                        if self.nodes[p].right == Some(x) {
                            x = p;
                            self.rotate_left(x);
                        }
                        let p = self.nodes[x].parent.expect("rotation preserved the parent");
                        let g = self.nodes[p].parent.expect("red node has a parent");
                        self.nodes[p].color = Color::Black;
                        self.nodes[g].color = Color::Red;
                        self.rotate_right(g);
                    }
                }
            } else {
                match self.nodes[g].left {
                    Some(u) if self.nodes[u].color == Color::Red => {
                        self.nodes[p].color = Color::Black;
                        self.nodes[u].color = Color::Black;
                        self.nodes[g].color = Color::Red;
                        x = g;
                    }
                    _ => {
                        if self.nodes[p].left == Some(x) {
                            x = p;
                            self.rotate_right(x);
                        }
                        let p = self.nodes[x].parent.expect("rotation preserved the parent");
                        let g = self.nodes[p].parent.expect("red node has a parent");
                        self.nodes[p].color = Color::Black;
                        self.nodes[g].color = Color::Red;
                        self.rotate_left(g);
                    }
                }
            }
        }
        let root = self.root.expect("fixup runs on a non-empty tree");
        self.nodes[root].color = Color::Black;
    }

    /// Remove a key if present, returning its value. Absent keys are a
    /// no-op. Comparisons happen only during the initial descent; the
    /// splice and fixup are purely structural.
    pub fn remove(&mut self, key: &K) -> Result<Option<V>, OrderError> {
        match self.find_node(key)? {
            Some(id) => Ok(Some(self.remove_node(id))),
            None => Ok(None),
        }
    }

    fn remove_node(&mut self, z: NodeId) -> V {
        // y is the node spliced out of the tree; x (possibly absent) takes
        // its place. x's parent is tracked separately because x may be an
        // absent leaf.
        let mut y = z;
        let mut spliced_color = self.nodes[y].color;
        let x;
        let x_parent;

        if self.nodes[z].left.is_none() {
            x = self.nodes[z].right;
            x_parent = self.nodes[z].parent;
            self.transplant(z, x);
        } else if self.nodes[z].right.is_none() {
            x = self.nodes[z].left;
            x_parent = self.nodes[z].parent;
            self.transplant(z, x);
        } else {
            // Two children: splice out the in-order successor instead and
            // move it into z's position with z's color.
            let right = self.nodes[z].right.expect("two-child node has a right child");
            y = self.min_node(right);
            spliced_color = self.nodes[y].color;
            x = self.nodes[y].right;
            if self.nodes[y].parent == Some(z) {
                x_parent = Some(y);
            } else {
                x_parent = self.nodes[y].parent;
                self.transplant(y, x);
                let zr = self.nodes[z].right;
                self.nodes[y].right = zr;
                if let Some(r) = zr {
                    self.nodes[r].parent = Some(y);
                }
            }
            self.transplant(z, Some(y));
            let zl = self.nodes[z].left;
            self.nodes[y].left = zl;
            if let Some(l) = zl {
                self.nodes[l].parent = Some(y);
            }
            self.nodes[y].color = self.nodes[z].color;
        }

        let node = self.nodes.remove(z).expect("node being removed exists");
        if spliced_color == Color::Black {
            self.remove_fixup(x, x_parent);
        }
        node.value
    }

    // Repair the black-height deficit left where a black node was spliced
    // out. `x` carries the extra black; `parent` is tracked alongside
    // because `x` may be an absent leaf.
    fn remove_fixup(&mut self, mut x: Option<NodeId>, mut parent: Option<NodeId>) {
        while x != self.root && self.color(x) == Color::Black {
            let Some(p) = parent else {
                break;
            };
            if self.nodes[p].left == x {
                let mut w = self.nodes[p]
                    .right
                    .expect("doubly black node has a sibling");
                if self.nodes[w].color == Color::Red {
                    self.nodes[w].color = Color::Black;
                    self.nodes[p].color = Color::Red;
                    self.rotate_left(p);
                    w = self.nodes[p].right.expect("rotation produced a sibling");
                }
                if self.color(self.nodes[w].left) == Color::Black
                    && self.color(self.nodes[w].right) == Color::Black
                {
                    self.nodes[w].color = Color::Red;
                    x = Some(p);
                    parent = self.nodes[p].parent;
                } else {
                    if self.color(self.nodes[w].right) == Color::Black {
                        if let Some(wl) = self.nodes[w].left {
                            self.nodes[wl].color = Color::Black;
                        }
                        self.nodes[w].color = Color::Red;
                        self.rotate_right(w);
                        w = self.nodes[p].right.expect("rotation produced a sibling");
                    }
                    self.nodes[w].color = self.nodes[p].color;
                    self.nodes[p].color = Color::Black;
                    if let Some(wr) = self.nodes[w].right {
                        self.nodes[wr].color = Color::Black;
                    }
                    self.rotate_left(p);
                    x = self.root;
                    parent = None;
                }
            } else {
                let mut w = self.nodes[p]
                    .left
                    .expect("doubly black node has a sibling");
                if self.nodes[w].color == Color::Red {
                    self.nodes[w].color = Color::Black;
                    self.nodes[p].color = Color::Red;
                    self.rotate_right(p);
                    w = self.nodes[p].left.expect("rotation produced a sibling");
                }
                if self.color(self.nodes[w].right) == Color::Black
                    && self.color(self.nodes[w].left) == Color::Black
                {
                    self.nodes[w].color = Color::Red;
                    x = Some(p);
                    parent = self.nodes[p].parent;
                } else {
                    if self.color(self.nodes[w].left) == Color::Black {
                        if let Some(wr) = self.nodes[w].right {
                            self.nodes[wr].color = Color::Black;
                        }
                        self.nodes[w].color = Color::Red;
                        self.rotate_left(w);
                        w = self.nodes[p].left.expect("rotation produced a sibling");
                    }
                    self.nodes[w].color = self.nodes[p].color;
                    self.nodes[p].color = Color::Black;
                    if let Some(wl) = self.nodes[w].left {
                        self.nodes[wl].color = Color::Black;
                    }
                    self.rotate_right(p);
                    x = self.root;
                    parent = None;
                }
            }
        }
        if let Some(x) = x {
            self.nodes[x].color = Color::Black;
        }
    }
}

/// In-order cursor yielding `(&K, &V)` in ascending key order. Walks
/// successor links; nothing is materialized eagerly.
pub struct InOrder<'a, K, V> {
    tree: &'a RbTree<K, V>,
    next: Option<NodeId>,
}

impl<'a, K, V> Iterator for InOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.successor(id);
        Some(self.tree.entry(id))
    }
}

#[cfg(test)]
impl<K: StructuralOrd, V> RbTree<K, V> {
    /// Assert every red-black invariant plus count consistency and
    /// strictly ascending in-order keys. Panics on violation.
    pub(crate) fn check_invariants(&self) {
        match self.root {
            Some(root) => {
                assert!(self.nodes[root].parent.is_none(), "root has no parent");
                assert_eq!(self.nodes[root].color, Color::Black, "root must be black");
                let (count, _black_height) = self.check_subtree(Some(root), None);
                assert_eq!(count, self.nodes.len(), "count matches reachable nodes");
            }
            None => assert!(self.nodes.is_empty(), "no orphaned nodes in an empty tree"),
        }
        let keys: Vec<&K> = self.iter().map(|(k, _)| k).collect();
        for pair in keys.windows(2) {
            assert_eq!(
                pair[0].structural_cmp(pair[1]).unwrap(),
                Ordering::Less,
                "in-order keys strictly ascend"
            );
        }
    }

    fn check_subtree(&self, id: Option<NodeId>, parent: Option<NodeId>) -> (usize, usize) {
        let Some(id) = id else {
            return (0, 1);
        };
        let node = &self.nodes[id];
        assert_eq!(node.parent, parent, "parent link is consistent");
        if node.color == Color::Red {
            assert_eq!(self.color(node.left), Color::Black, "no red-red edge");
            assert_eq!(self.color(node.right), Color::Black, "no red-red edge");
        }
        let (left_count, left_black) = self.check_subtree(node.left, Some(id));
        let (right_count, right_black) = self.check_subtree(node.right, Some(id));
        assert_eq!(left_black, right_black, "equal black-height on all paths");
        let own_black = if node.color == Color::Black { 1 } else { 0 };
        (left_count + right_count + 1, left_black + own_black)
    }

    pub(crate) fn height(&self) -> usize {
        fn depth<K, V>(tree: &RbTree<K, V>, id: Option<NodeId>) -> usize {
            match id {
                None => 0,
                Some(id) => {
                    1 + depth(tree, tree.nodes[id].left).max(depth(tree, tree.nodes[id].right))
                }
            }
        }
        depth(self, self.root)
    }
}
