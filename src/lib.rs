//! An arena-backed B-tree for Rust.
//!
//! This crate provides [`BTree`], an in-memory B-tree over `i64` keys with a
//! caller-chosen order (maximum keys per node). It exposes the structural
//! algorithms directly: insertion with cascading node splits, deletion with
//! cascading borrow/merge rebalancing, and the three classic traversals for
//! inspecting tree shape.
//!
//! # Example
//!
//! ```
//! use grove::BTree;
//!
//! let mut tree = BTree::new(3);
//! for key in [10, 20, 5, 15] {
//!     tree.insert(key).unwrap();
//! }
//!
//! assert!(tree.contains_key(15));
//! assert_eq!(tree.in_order(), "5 -> 10 -> 15 -> 20");
//!
//! tree.delete(10).unwrap();
//! assert_eq!(tree.in_order(), "5 -> 15 -> 20");
//! ```
//!
//! # Implementation
//!
//! Nodes live in a flat arena and refer to each other by index handles, so
//! the parent back-reference every node carries is a plain copyable id rather
//! than a shared pointer. Structural repair after an insert or delete walks
//! the parent chain iteratively, keeping stack use constant regardless of
//! tree height.
//!
//! The tree supports exactly one logical writer and no concurrent readers;
//! `&mut self` on every mutating operation enforces this structurally.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]

extern crate alloc;

mod error;
mod raw;

pub mod btree;

pub use btree::BTree;
pub use error::Error;
