//! An order-statistic sequence for Rust.
//!
//! This crate provides [`OSList`], a sequence container that combines the
//! positional access of a `Vec` with the cheap middle insertion and removal of
//! a linked list:
//!
//! - [`at`](OSList::at) / `list[i]` - Get the element at a given index in O(log n)
//! - [`insert`](OSList::insert) / [`erase`](OSList::erase) - Insert or remove anywhere in O(log n)
//! - [`index_of`](OSList::index_of) - Recover the index of a [`Position`] in O(log n)
//! - [`Cursor`](oslist::Cursor) - Step in O(1), jump by any offset in O(log n)
//!
//! # Example
//!
//! ```
//! use wabi_list::OSList;
//!
//! let mut list = OSList::new();
//! for value in 1..=5 {
//!     list.push_back(value);
//! }
//!
//! // Random access (O(log n))
//! assert_eq!(list.at(2), Ok(&3));
//! assert_eq!(list[4], 5);
//!
//! // Erase in the middle; the returned position names the successor.
//! let three = list.position_at(2).unwrap();
//! let four = list.erase(three);
//! assert_eq!(list.value_at(four), Some(&4));
//!
//! // Insert at the front.
//! list.insert(list.begin(), 10);
//! assert!(list.iter().eq(&[10, 1, 2, 4, 5]));
//!
//! // Jump around with a cursor.
//! let mut cursor = list.cursor_front();
//! cursor.advance(3).unwrap();
//! assert_eq!(cursor.current(), Some(&4));
//! assert_eq!(cursor.index(), 3);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Failure atomic** - Bulk insertions either insert everything or leave the list untouched
//! - **Pluggable storage** - Nodes live in a [`NodeStore`](store::NodeStore), an [`Arena`](store::Arena) by default
//!
//! # Implementation
//!
//! The list is a weight-balanced binary tree whose in-order traversal is the
//! sequence. Every node records the size of its subtree, which turns index
//! lookups into a single root-to-leaf walk, and is also threaded into a doubly
//! linked list in sequence order so that stepping and iteration are O(1).

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: `IterMut` hands out disjoint mutable borrows through a raw pointer, which requires unsafe code.
// #![forbid(unsafe_code)]
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
mod position;
mod raw;

pub mod oslist;
pub mod store;

pub use error::{CapacityError, InsertError, OutOfRange};
pub use oslist::OSList;
pub use position::Position;
