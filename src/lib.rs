//! Height-balanced ordered index for Rust.
//!
//! This crate provides [`OrderedIndex`], an ordered set stored in an AVL tree whose nodes cache
//! their subtree size and height. On top of the usual set operations it offers:
//!
//! - [`get`](OrderedIndex::get) / [`remove_at`](OrderedIndex::remove_at) - access or delete the
//!   key at a sorted position, with negative positions counting from the end
//! - [`rank_of`](OrderedIndex::rank_of) - the sorted position of a key
//! - [`range`](OrderedIndex::range) / [`irange`](OrderedIndex::irange) - bounded ascending
//!   iteration that only visits qualifying keys
//! - in-order, reverse, pre-order, post-order and breadth-first traversals
//! - [`depth`](OrderedIndex::depth) and [`balance`](OrderedIndex::balance) in O(1)
//!
//! # Example
//!
//! ```
//! use avl_index::{IndexError, OrderedIndex, Rank};
//!
//! let mut index: OrderedIndex<i32> = (0..63).collect();
//!
//! // Sequential inserts are rebalanced into a perfect tree.
//! assert_eq!(index.depth(), 6);
//! assert_eq!(index.balance(), 0);
//!
//! // Order-statistic operations (O(log n))
//! assert_eq!(index.get(-1), Ok(&62));
//! assert_eq!(index[Rank(10)], 10);
//! assert_eq!(index.remove_at(0), Ok(0));
//! assert_eq!(index.get(62), Err(IndexError::OutOfRange { index: 62, len: 62 }));
//!
//! // Bounded iteration
//! assert_eq!(index.range(10..13).copied().collect::<Vec<_>>(), [10, 11, 12]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **Arena storage** - Nodes live in one slot vector and link to each other (children and
//!   parent alike) by compact handles, so there are no reference cycles and no per-node boxes
//! - **No recursion** - Traversals keep an explicit stack, bounded by the tree's height
//!
//! # Logging
//!
//! Diagnostics go through the [`log`](https://docs.rs/log) facade: rotations at `trace` level,
//! `clear` and rejected positions at `debug` level. No logger is installed by this crate.

#![no_std]
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

mod error;
mod order_statistic;
mod raw;

pub mod ordered_index;

pub use error::IndexError;
pub use order_statistic::Rank;
pub use ordered_index::OrderedIndex;
