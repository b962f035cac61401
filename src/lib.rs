//! An in-memory B+ tree ordered map.
//!
//! This crate provides [`BpTree`], a balanced multi-way search tree that maps
//! comparable keys to opaque values. All records live in the leaves, which are
//! chained into a doubly-linked sibling list, so bounded range searches can
//! walk records in either direction without re-descending from the root:
//!
//! - [`add_record`](BpTree::add_record) / [`update_record`](BpTree::update_record) /
//!   [`add_or_update_record`](BpTree::add_or_update_record) - point writes
//! - [`delete_record`](BpTree::delete_record) / [`has_record`](BpTree::has_record) -
//!   point removal and membership
//! - [`search_forward`](BpTree::search_forward) / [`search_backward`](BpTree::search_backward) -
//!   range iteration over `[lo, hi]`, with [`Key::Min`] and [`Key::Max`] as
//!   structural bounds
//!
//! # Example
//!
//! ```
//! use bptree::{BpTree, Key};
//!
//! let mut tree: BpTree<&str, i32> = BpTree::new(5)?;
//! tree.add_record("banana", 3);
//! tree.add_record("apple", 5);
//! tree.add_record("cherry", 7);
//!
//! let (value, present) = tree.has_record(&"apple");
//! assert_eq!(value, Some(&5));
//! assert!(present);
//!
//! // Records come back in key order regardless of insertion order.
//! let keys: Vec<&str> = tree
//!     .search_forward(Key::Min, Key::Max)
//!     .map(|(&k, _)| k)
//!     .collect();
//! assert_eq!(keys, ["apple", "banana", "cherry"]);
//! # Ok::<(), bptree::TreeError>(())
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Runtime-configurable fan-out** - The maximum degree is chosen at
//!   construction (at least 4) rather than baked in at compile time
//! - **Caller-supplied ordering** - Keys are compared through a
//!   [`KeyComparer`]; [`NaturalOrder`] covers the common `Ord` case
//! - **Read-only traversal** - [`walk`](BpTree::walk) exposes the physical
//!   node layout to visitors such as the built-in text and array dumpers
//!
//! # Implementation
//!
//! Nodes are stored in an index-addressed arena, so internal child references,
//! leaf sibling links, and the root slot are all plain handles rather than
//! owning pointers. Insertion splits full nodes eagerly on the way down;
//! deletion merges or redistributes sparse nodes on the way down. Both walks
//! reuse a single root-to-leaf path cursor.

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

mod comparer;
mod error;
mod raw;

pub mod tree;
pub mod walk;

pub use comparer::{Key, KeyComparer, NaturalOrder, OrderBy};
pub use error::{MIN_MAX_DEGREE, TreeError};
pub use tree::BpTree;
pub use walk::{NodeView, TreeVisitor};
