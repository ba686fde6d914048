// Copyright 2025 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bramble Arena: slot-recycling storage and FIFO work queues.
//!
//! These are the containers the bramble spatial indexes are built on:
//!
//! - [`FreeList`]: dense storage of records with stable `u32` indices,
//!   O(1) insert and erase, and reuse of erased slots through an intrusive
//!   LIFO free chain. A four-slot reservation ([`FreeList::insert_quad`])
//!   keeps sibling groups contiguous for callers that address children by
//!   offset.
//! - [`WorkQueue`]: a first-in-first-out queue with a membership test,
//!   used to batch deferred maintenance work.
//!
//! # Example
//!
//! ```
//! use bramble_arena::FreeList;
//!
//! let mut list: FreeList<u32> = FreeList::new();
//! let a = list.insert(7);
//! let b = list.insert(9);
//!
//! // Erased slots are reused, most recent first.
//! list.erase(a);
//! let c = list.insert(11);
//! assert_eq!(c, a);
//! assert_eq!(*list.get(b), 9);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod free_list;
pub mod queue;

pub use free_list::FreeList;
pub use queue::WorkQueue;
