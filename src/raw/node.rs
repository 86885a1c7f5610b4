use super::handle::Handle;

/// Node color for the red-black balancing rules.
///
/// Absent children count as [`Black`](Color::Black).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A child position under a node.
///
/// The rotation and rebalancing routines are written once and take a `Side`,
/// rather than spelling out the mirrored left/right variants by hand.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub(crate) const fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A single tree node.
///
/// The `parent` link is a back-reference used for traversal and rebalancing
/// only; ownership of every node rests with the arena.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
}

impl<K, V> Node<K, V> {
    /// Creates a detached node; fresh nodes enter the tree red.
    pub(crate) const fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) const fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn sides_mirror() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);

        let mut node: Node<u32, ()> = Node::new(1, ());
        assert_eq!(node.color, Color::Red);
        let handle = Handle::from_index(7);
        node.set_child(Side::Left, Some(handle));
        assert_eq!(node.child(Side::Left), Some(handle));
        assert_eq!(node.child(Side::Right), None);
    }
}
