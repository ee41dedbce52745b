//! This crate exposes a persistent, self-balancing Binary Search Tree
//! (an AVL tree) of keys.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and remove stored keys. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a key and
//! will sometimes have child `Node`s. The most important invariants of a
//! BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for a key takes `O(height)` (where `height` is the longest path
//! from the root `Node` to a leaf `Node`). An AVL tree adds a third invariant:
//!
//! 3. For every `Node`, the heights of its two subtrees differ by at most one.
//!
//! This limits the height to `O(lg N)` where `N` is the number of nodes. Every
//! `insert` and `remove` restores the invariant on the way back up to the root
//! by rotating subtrees.
//!
//! ## Persistence
//!
//! Trees are never modified in place. `insert` and `remove` build new nodes
//! along the path to the changed key and share every other subtree with the
//! tree they started from, so older trees stay valid snapshots. Nodes are
//! reference counted with `Rc`, or with `Arc` when the `arc` feature is
//! enabled so snapshots can be read from other threads.
//!
//! The [`invariants`] module checks a tree against all three invariants.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod avl;
pub mod invariants;
mod util;
