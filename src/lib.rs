//! Red-black tree collections for Rust.
//!
//! This crate provides [`RBTreeMap`], [`RBTreeSet`] and [`RBTreeMultiset`],
//! ordered associative collections backed by a single red-black tree engine:
//!
//! - [`RBTreeMap`] - unique keys mapped to values, no silent overwrite
//! - [`RBTreeSet`] - unique elements
//! - [`RBTreeMultiset`] - duplicate elements, with [`count`](RBTreeMultiset::count)
//!   and [`equal_range`](RBTreeMultiset::equal_range)
//!
//! # Example
//!
//! ```
//! use ruby_tree::{RBTreeMap, RBTreeMultiset};
//!
//! let mut scores = RBTreeMap::new();
//! assert!(scores.insert("Alice", 100));
//! assert!(scores.insert("Bob", 85));
//!
//! // A duplicate key is rejected rather than overwritten.
//! assert!(!scores.insert("Bob", 0));
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//!
//! // Iteration is in key order.
//! let names: Vec<_> = scores.keys().copied().collect();
//! assert_eq!(names, ["Alice", "Bob"]);
//!
//! let mut bag = RBTreeMultiset::new();
//! bag.insert(5);
//! bag.insert(5);
//! bag.insert(1);
//! assert_eq!(bag.count(&5), 2);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Index-based node storage** - Nodes live in an arena and link to each other
//!   through stable indices, so rebalancing never touches a raw pointer
//! - **O(log n) mutation and lookup** - insert, erase, find, `lower_bound` and
//!   `upper_bound` all descend the tree
//! - **Bidirectional iteration** - one successor routine drives both directions
//!
//! # Implementation
//!
//! The collections share a private red-black tree whose balancing follows the
//! classic recolor/rotate case analysis after both insertion and deletion. The
//! multiset sends equal keys to the left during descent, so equal elements form
//! a contiguous run with the most recent insertion leftmost; `find` always
//! reports the leftmost entry of such a run.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod raw;

pub mod rbtree_map;
pub mod rbtree_multiset;
pub mod rbtree_set;

pub use rbtree_map::RBTreeMap;
pub use rbtree_multiset::RBTreeMultiset;
pub use rbtree_set::RBTreeSet;
