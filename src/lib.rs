//! A 256-way trie map over byte-string keys.
//!
//! This crate provides [`ByteTrie`], an in-memory map keyed by raw byte
//! sequences and backed by an uncompressed trie: every edge is labeled by one
//! byte, and paths from the root spell out keys.
//!
//! # Features
//!
//! - Exact lookups with O(k) complexity where k is the key length
//! - Prefix enumeration in lexicographic order
//! - Longest-stored-prefix queries over arbitrary byte strings
//! - Fixed-length wildcard matching, where `.` matches any single byte
//! - Deletion with structural pruning, so empty branches never linger

mod arena;
mod as_bytes;
mod iter;
mod node;
mod trie;

pub use as_bytes::AsBytes;
pub use iter::{IntoIter, Iter, Keys, MatchKeys, Values};
pub use trie::{ByteTrie, WILDCARD};

#[cfg(test)]
mod proptest_trie;
