use super::handle::Handle;
use super::node::Side;
use super::raw_rbtree::RawRBTree;

/// Traversal direction for a cursor step.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// The child side that leads toward the next node in this direction.
    #[inline]
    const fn ahead(self) -> Side {
        match self {
            Direction::Forward => Side::Right,
            Direction::Backward => Side::Left,
        }
    }
}

/// A position in a tree: either a live node or the one-past-the-end position.
///
/// A cursor is a plain handle, so it stays valid across insertions and across
/// erasures of other nodes; only erasing the exact node it names invalidates
/// it. Equality is node identity, not key equality.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Cursor {
    node: Option<Handle>,
}

impl Cursor {
    #[inline]
    pub(crate) const fn new(node: Option<Handle>) -> Self {
        Self { node }
    }

    #[inline]
    pub(crate) const fn at(node: Handle) -> Self {
        Self { node: Some(node) }
    }

    #[inline]
    pub(crate) const fn end() -> Self {
        Self { node: None }
    }

    #[inline]
    pub(crate) const fn node(self) -> Option<Handle> {
        self.node
    }

    #[inline]
    pub(crate) const fn is_end(self) -> bool {
        self.node.is_none()
    }

    /// Moves one position in `direction` and returns the new cursor.
    ///
    /// One routine serves both directions: `direction` picks which child side
    /// counts as "ahead". From the end position, a backward step lands on the
    /// tree's cached maximum and a forward step stays put.
    pub(crate) fn step<K, V>(self, tree: &RawRBTree<K, V>, direction: Direction) -> Cursor {
        let Some(current) = self.node else {
            return match direction {
                Direction::Backward => Cursor::new(tree.cached_max()),
                Direction::Forward => self,
            };
        };

        let ahead = direction.ahead();

        // A subtree ahead of us: its nearest node is the one farthest back
        // inside it.
        if let Some(child) = tree.node(current).child(ahead) {
            let mut next = child;
            while let Some(closer) = tree.node(next).child(ahead.opposite()) {
                next = closer;
            }
            return Cursor::at(next);
        }

        // Otherwise climb until we arrive at an ancestor from its behind-side
        // child; running out of ancestors means we walked off the end.
        let mut walk = current;
        while let Some(parent) = tree.node(walk).parent {
            if tree.node(parent).child(ahead) == Some(walk) {
                walk = parent;
            } else {
                return Cursor::at(parent);
            }
        }
        Cursor::end()
    }

    /// Repeats [`step`](Self::step) up to `count` times, parking at the end
    /// position if the tree is exhausted first. Returns the number of steps
    /// actually taken.
    pub(crate) fn advance<K, V>(&mut self, tree: &RawRBTree<K, V>, count: usize, direction: Direction) -> usize {
        let mut taken = 0;
        while taken < count {
            let next = self.step(tree, direction);
            if next == *self {
                // The end position is absorbing in the forward direction.
                break;
            }
            *self = next;
            taken += 1;
            if next.is_end() {
                break;
            }
        }
        taken
    }
}
