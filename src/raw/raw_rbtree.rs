use core::borrow::Borrow;
use core::cmp::Ordering;
use core::mem;

use alloc::vec::Vec;

use super::arena::Arena;
use super::cursor::{Cursor, Direction};
use super::handle::Handle;
use super::node::{Color, Node, Side};

/// The red-black tree backing `RBTreeMap`, `RBTreeSet` and `RBTreeMultiset`.
///
/// Nodes are arena slots linked by handles; `root`, the parent links and the
/// child links all name slots in `nodes`. The tree is valid after every
/// completed mutation: in-order keys are non-decreasing, no red node has a red
/// child, every path from the root to an absent child crosses the same number
/// of black nodes, and the root is black.
///
/// Duplicate keys are admitted only when an insertion asks for it; ties then
/// descend left, so a run of equal keys sits contiguously in iteration order
/// with the newest insertion leftmost.
#[derive(Clone)]
pub(crate) struct RawRBTree<K, V> {
    nodes: Arena<Node<K, V>>,
    root: Option<Handle>,
    len: usize,
    /// The current maximum, doubling as the node one step back from the end
    /// position. Recomputed after every structural mutation.
    max: Option<Handle>,
}

impl<K, V> RawRBTree<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
            max: None,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// A static capacity ceiling: the addressable memory divided by the node
    /// footprint, capped by the handle space. Nothing enforces it at runtime.
    pub(crate) const fn max_size(&self) -> usize {
        let by_memory = isize::MAX as usize / size_of::<Node<K, V>>();
        if by_memory < Handle::MAX { by_memory } else { Handle::MAX }
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
        self.max = None;
    }

    /// Exchanges the entire contents of two trees in O(1). Cursors obtained
    /// from either tree keep naming the nodes they named, which now live in
    /// the other tree.
    pub(crate) fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    #[inline]
    pub(crate) fn key(&self, handle: Handle) -> &K {
        &self.nodes.get(handle).key
    }

    #[inline]
    pub(crate) fn value(&self, handle: Handle) -> &V {
        &self.nodes.get(handle).value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, handle: Handle) -> &mut V {
        &mut self.nodes.get_mut(handle).value
    }

    #[inline]
    pub(crate) fn key_value(&self, handle: Handle) -> (&K, &V) {
        let node = self.nodes.get(handle);
        (&node.key, &node.value)
    }

    /// The cached maximum; the node reached by stepping back from the end.
    #[inline]
    pub(crate) const fn cached_max(&self) -> Option<Handle> {
        self.max
    }

    /// Cursor at the smallest node, or the end position when empty.
    pub(crate) fn begin(&self) -> Cursor {
        match self.root {
            Some(root) => Cursor::at(self.min_node_from(root)),
            None => Cursor::end(),
        }
    }

    /// Cursor at the largest node, or the end position when empty.
    pub(crate) const fn last(&self) -> Cursor {
        Cursor::new(self.max)
    }

    /// Moves every entry out in key order, leaving the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut handles = Vec::with_capacity(self.len);
        let mut cursor = self.begin();
        while let Some(handle) = cursor.node() {
            handles.push(handle);
            cursor = cursor.step(self, Direction::Forward);
        }

        let mut result = Vec::with_capacity(handles.len());
        for handle in handles {
            let node = self.nodes.take(handle);
            result.push((node.key, node.value));
        }

        self.nodes.clear();
        self.root = None;
        self.len = 0;
        self.max = None;
        result
    }

    fn min_node_from(&self, mut node: Handle) -> Handle {
        while let Some(left) = self.nodes.get(node).left {
            node = left;
        }
        node
    }

    fn max_node_from(&self, mut node: Handle) -> Handle {
        while let Some(right) = self.nodes.get(node).right {
            node = right;
        }
        node
    }

    fn update_max(&mut self) {
        self.max = self.root.map(|root| self.max_node_from(root));
    }

    #[inline]
    fn side_of(&self, node: Handle, parent: Handle) -> Side {
        if self.nodes.get(parent).left == Some(node) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Color of a possibly-absent node; absent children count as black.
    #[inline]
    fn color_of(&self, node: Option<Handle>) -> Color {
        node.map_or(Color::Black, |handle| self.nodes.get(handle).color)
    }

    /// Rotates `node` down toward `side`, promoting its opposite-side child.
    /// `rotate(n, Side::Left)` is the textbook left rotation.
    fn rotate(&mut self, node: Handle, side: Side) {
        let up = self.node(node).child(side.opposite()).expect("`rotate()` - no child to promote!");
        let inner = self.node(up).child(side);
        let parent = self.node(node).parent;

        self.node_mut(node).set_child(side.opposite(), inner);
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(node);
        }

        self.node_mut(up).parent = parent;
        match parent {
            None => self.root = Some(up),
            Some(parent) => {
                let attach = self.side_of(node, parent);
                self.node_mut(parent).set_child(attach, Some(up));
            }
        }

        self.node_mut(up).set_child(side, Some(node));
        self.node_mut(node).parent = Some(up);
    }

    /// Replaces the subtree rooted at `node` with `replacement` in `node`'s
    /// parent (or at the root). `node`'s own links are left untouched.
    fn transplant(&mut self, node: Handle, replacement: Option<Handle>) {
        let parent = self.node(node).parent;
        match parent {
            None => self.root = replacement,
            Some(parent) => {
                let side = self.side_of(node, parent);
                self.node_mut(parent).set_child(side, replacement);
            }
        }
        if let Some(replacement) = replacement {
            self.node_mut(replacement).parent = parent;
        }
    }
}

impl<K: Ord, V> RawRBTree<K, V> {
    /// Inserts `key`/`value` and rebalances.
    ///
    /// With `unique` set, an equal key aborts the insertion and returns the
    /// cursor of the existing node with `false`; the tree is untouched and
    /// the rejected pair is dropped. Without it, ties descend left, which
    /// places a new equal key in front of the ones already present.
    pub(crate) fn insert(&mut self, key: K, value: V, unique: bool) -> (Cursor, bool) {
        let mut parent = None;
        let mut walk = self.root;
        while let Some(current) = walk {
            parent = Some(current);
            let node = self.nodes.get(current);
            if unique {
                match key.cmp(&node.key) {
                    Ordering::Less => walk = node.left,
                    Ordering::Greater => walk = node.right,
                    Ordering::Equal => return (Cursor::at(current), false),
                }
            } else {
                walk = if key <= node.key { node.left } else { node.right };
            }
        }

        let mut node = Node::new(key, value);
        node.parent = parent;
        let handle = self.nodes.alloc(node);
        match parent {
            None => self.root = Some(handle),
            Some(parent) => {
                let side = if self.nodes.get(handle).key <= self.nodes.get(parent).key {
                    Side::Left
                } else {
                    Side::Right
                };
                self.node_mut(parent).set_child(side, Some(handle));
            }
        }

        self.len += 1;
        self.fix_after_insert(handle);
        self.update_max();
        debug_assert_eq!(self.nodes.len(), self.len);
        (Cursor::at(handle), true)
    }

    /// Inserts a batch sequentially, collecting each result. Every returned
    /// cursor is still valid once the batch completes; insertions never
    /// invalidate cursors.
    pub(crate) fn insert_many<I>(&mut self, items: I, unique: bool) -> Vec<(Cursor, bool)>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let items = items.into_iter();
        let mut results = Vec::with_capacity(items.size_hint().0);
        for (key, value) in items {
            results.push(self.insert(key, value, unique));
        }
        results
    }

    /// Restores the red-black rules above a freshly inserted red node.
    ///
    /// While the parent is red: a red uncle means recolor and resume from the
    /// grandparent; a black (or absent) uncle means rotate an inner grandchild
    /// outward first, then recolor and rotate at the grandparent, which ends
    /// the walk. The root is forced black afterwards.
    fn fix_after_insert(&mut self, mut node: Handle) {
        while let Some(parent) = self.node(node).parent
            && self.node(parent).color == Color::Red
        {
            // A red node is never the root, so a grandparent exists.
            let grand = self.node(parent).parent.expect("`fix_after_insert()` - red node has no parent!");
            let side = self.side_of(parent, grand);
            match self.node(grand).child(side.opposite()) {
                Some(uncle) if self.node(uncle).color == Color::Red => {
                    self.node_mut(parent).color = Color::Black;
                    self.node_mut(uncle).color = Color::Black;
                    self.node_mut(grand).color = Color::Red;
                    node = grand;
                }
                _ => {
                    let mid = if self.side_of(node, parent) == side.opposite() {
                        // Inner grandchild: rotate it outward so one final
                        // rotation at the grandparent suffices.
                        self.rotate(parent, side);
                        node
                    } else {
                        parent
                    };
                    self.node_mut(mid).color = Color::Black;
                    self.node_mut(grand).color = Color::Red;
                    self.rotate(grand, side.opposite());
                    break;
                }
            }
        }

        let root = self.root.expect("`fix_after_insert()` - tree is empty!");
        self.node_mut(root).color = Color::Black;
    }

    /// Any node whose key compares equal, or `None`.
    fn find_node<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut walk = self.root;
        while let Some(current) = walk {
            let node = self.nodes.get(current);
            match key.cmp(node.key.borrow()) {
                Ordering::Less => walk = node.left,
                Ordering::Greater => walk = node.right,
                Ordering::Equal => return Some(current),
            }
        }
        None
    }

    /// Cursor at the first occurrence of `key`: the leftmost entry of its
    /// run of equal keys. The end cursor when the key is absent.
    pub(crate) fn find<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(found) = self.find_node(key) else {
            return Cursor::end();
        };
        let mut first = found;
        loop {
            let prev = Cursor::at(first).step(self, Direction::Backward);
            match prev.node() {
                Some(node) if self.nodes.get(node).key.borrow() == key => first = node,
                _ => break,
            }
        }
        Cursor::at(first)
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.find_node(key).is_some()
    }

    /// Number of entries comparing equal to `key`: a forward scan over the
    /// run starting at the first occurrence.
    pub(crate) fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut total = 0;
        let mut cursor = self.find(key);
        while let Some(node) = cursor.node()
            && self.nodes.get(node).key.borrow() == key
        {
            total += 1;
            cursor = cursor.step(self, Direction::Forward);
        }
        total
    }

    /// Cursor at the first entry not less than `key`.
    pub(crate) fn lower_bound<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut best = None;
        let mut walk = self.root;
        while let Some(current) = walk {
            let node = self.nodes.get(current);
            if node.key.borrow() < key {
                walk = node.right;
            } else {
                best = Some(current);
                walk = node.left;
            }
        }
        Cursor::new(best)
    }

    /// Cursor at the first entry strictly greater than `key`.
    pub(crate) fn upper_bound<Q>(&self, key: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut best = None;
        let mut walk = self.root;
        while let Some(current) = walk {
            let node = self.nodes.get(current);
            if node.key.borrow() <= key {
                walk = node.right;
            } else {
                best = Some(current);
                walk = node.left;
            }
        }
        Cursor::new(best)
    }

    /// The run of entries comparing equal to `key`, as a half-open cursor
    /// pair: first occurrence and one past the last.
    pub(crate) fn equal_range<Q>(&self, key: &Q) -> (Cursor, Cursor)
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Erases one entry whose key compares equal to `key` and returns its
    /// pair; `None` when absent leaves the tree untouched.
    pub(crate) fn remove_key<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let target = self.find_node(key)?;
        let node = self.remove_node(target);
        Some((node.key, node.value))
    }

    /// Erases the node a cursor names; the end cursor is a no-op.
    ///
    /// The cursor must come from this tree and must not have been invalidated
    /// by a prior erasure of its node.
    pub(crate) fn remove_at(&mut self, cursor: Cursor) -> Option<(K, V)> {
        let target = cursor.node()?;
        let node = self.remove_node(target);
        Some((node.key, node.value))
    }

    /// Unlinks `target`, rebalances, and returns the detached node.
    fn remove_node(&mut self, target: Handle) -> Node<K, V> {
        let mut spliced_color = self.node(target).color;
        let fix_child;
        let fix_parent;

        match (self.node(target).left, self.node(target).right) {
            (None, lone) | (lone, None) => {
                // At most one child: splice the target out and promote it.
                fix_child = lone;
                fix_parent = self.node(target).parent;
                self.transplant(target, lone);
            }
            (Some(_), Some(right)) => {
                // Two children: the in-order successor is grafted into the
                // target's slot and inherits its color, so the rules can only
                // be broken where the successor was detached.
                let successor = self.min_node_from(right);
                spliced_color = self.node(successor).color;
                fix_child = self.node(successor).right;
                if self.node(successor).parent == Some(target) {
                    fix_parent = Some(successor);
                } else {
                    fix_parent = self.node(successor).parent;
                    self.transplant(successor, self.node(successor).right);
                    let tail = self.node(target).right;
                    self.node_mut(successor).right = tail;
                    if let Some(tail) = tail {
                        self.node_mut(tail).parent = Some(successor);
                    }
                }
                self.transplant(target, Some(successor));
                let head = self.node(target).left;
                self.node_mut(successor).left = head;
                if let Some(head) = head {
                    self.node_mut(head).parent = Some(successor);
                }
                let color = self.node(target).color;
                self.node_mut(successor).color = color;
            }
        }

        let node = self.nodes.take(target);
        self.len -= 1;
        if spliced_color == Color::Black {
            self.fix_after_remove(fix_child, fix_parent);
        }
        self.update_max();
        debug_assert_eq!(self.nodes.len(), self.len);
        node
    }

    /// Repairs the black-height deficit left where a black node was spliced
    /// out. `node` is the child promoted into the gap, possibly absent, and
    /// `parent` is the node above the gap.
    ///
    /// At each level, in order: a red sibling is rotated down to expose a
    /// black one; a black sibling with two black children sheds the deficit
    /// upward by turning red; a red near nephew is rotated outward; a red far
    /// nephew ends the walk with a rotation at the parent.
    fn fix_after_remove(&mut self, mut node: Option<Handle>, mut parent: Option<Handle>) {
        while node != self.root && self.color_of(node) == Color::Black {
            let Some(above) = parent else {
                break;
            };
            let side = if self.node(above).left == node { Side::Left } else { Side::Right };
            // The deficit side is one black short, so the sibling is real.
            let mut sibling = self
                .node(above)
                .child(side.opposite())
                .expect("`fix_after_remove()` - deficit node has no sibling!");

            if self.node(sibling).color == Color::Red {
                self.node_mut(sibling).color = Color::Black;
                self.node_mut(above).color = Color::Red;
                self.rotate(above, side);
                sibling = self
                    .node(above)
                    .child(side.opposite())
                    .expect("`fix_after_remove()` - rotation lost the sibling!");
            }

            let near = self.node(sibling).child(side);
            let far = self.node(sibling).child(side.opposite());
            if self.color_of(near) == Color::Black && self.color_of(far) == Color::Black {
                self.node_mut(sibling).color = Color::Red;
                node = Some(above);
                parent = self.node(above).parent;
            } else {
                if self.color_of(far) == Color::Black {
                    if let Some(near) = near {
                        self.node_mut(near).color = Color::Black;
                    }
                    self.node_mut(sibling).color = Color::Red;
                    self.rotate(sibling, side.opposite());
                    sibling = self
                        .node(above)
                        .child(side.opposite())
                        .expect("`fix_after_remove()` - rotation lost the sibling!");
                }
                let above_color = self.node(above).color;
                self.node_mut(sibling).color = above_color;
                self.node_mut(above).color = Color::Black;
                if let Some(far) = self.node(sibling).child(side.opposite()) {
                    self.node_mut(far).color = Color::Black;
                }
                self.rotate(above, side);
                node = self.root;
                parent = None;
            }
        }

        if let Some(node) = node {
            self.node_mut(node).color = Color::Black;
        }
    }
}

impl<K, V> Default for RawRBTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
