mod arena;
mod cursor;
mod handle;
mod node;
mod raw_rbtree;

pub(crate) use cursor::{Cursor, Direction};
pub(crate) use raw_rbtree::RawRBTree;
