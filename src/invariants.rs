//! Checks for the two invariants every [`Tree`] must uphold after an
//! `insert` or `remove`:
//!
//! 1. Ordering: every key in a node's left subtree is smaller than the
//!    node's key and every key in its right subtree is larger.
//! 2. Balance: the heights of a node's two subtrees differ by at most one.
//!
//! These walk the whole tree so they are meant for tests and debugging,
//! not for use on every operation.
//!
//! # Examples
//!
//! ```
//! use persistent_avl::avl::Tree;
//! use persistent_avl::invariants;
//!
//! let tree: Tree<_> = (0..100).collect();
//!
//! assert!(invariants::validate(&tree).is_ok());
//! assert_eq!(invariants::keys(&tree.remove(&3)).len(), 99);
//! ```

use thiserror::Error;

use crate::avl::Tree;

/// The first broken invariant found in a tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A node's key isn't strictly between the keys of the ancestors it
    /// sits under.
    #[error("key at depth {depth} is out of order with its ancestors")]
    Unordered {
        /// Distance from the root to the offending node.
        depth: usize,
    },
    /// A node's subtrees differ in height by more than one.
    #[error("node has subtrees of height {left} and {right}")]
    Unbalanced {
        /// Height of the left subtree.
        left: usize,
        /// Height of the right subtree.
        right: usize,
    },
    /// A node's cached height doesn't match the height of its subtree.
    #[error("node caches height {cached} but its subtree has height {actual}")]
    HeightMismatch {
        /// The height stored in the node.
        cached: usize,
        /// The height measured by walking the subtree.
        actual: usize,
    },
}

/// Checks both the ordering and the balance invariants.
pub fn validate<K>(tree: &Tree<K>) -> Result<(), InvariantViolation>
where
    K: Ord,
{
    check_ordering(tree)?;
    check_balance(tree)
}

/// Checks that every key lies between the bounds set by its ancestors.
///
/// Comparing a node only with its direct children isn't enough. This tree
/// passes that check even though 4 is in 5's right subtree:
///
/// ```text
///       5
///      / \
///     3   7
///        / \
///       4   8
/// ```
pub fn check_ordering<K>(tree: &Tree<K>) -> Result<(), InvariantViolation>
where
    K: Ord,
{
    ordered_between(tree, None, None, 0)
}

fn ordered_between<'a, K>(
    tree: &'a Tree<K>,
    lower: Option<&'a K>,
    upper: Option<&'a K>,
    depth: usize,
) -> Result<(), InvariantViolation>
where
    K: Ord,
{
    let node = match tree {
        Tree::Leaf => return Ok(()),
        Tree::Node(n) => n,
    };
    let key = node.key();

    let above_lower = lower.map_or(true, |lower| lower < key);
    let below_upper = upper.map_or(true, |upper| key < upper);
    if !(above_lower && below_upper) {
        return Err(InvariantViolation::Unordered { depth });
    }

    ordered_between(node.left(), lower, Some(key), depth + 1)?;
    ordered_between(node.right(), Some(key), upper, depth + 1)
}

/// Checks that no node's subtrees differ in height by more than one and that every cached
/// height is accurate.
pub fn check_balance<K>(tree: &Tree<K>) -> Result<(), InvariantViolation> {
    measured_height(tree).map(|_| ())
}

/// Recomputes the height of `tree` bottom-up, failing on the first violation.
fn measured_height<K>(tree: &Tree<K>) -> Result<usize, InvariantViolation> {
    let node = match tree {
        Tree::Leaf => return Ok(0),
        Tree::Node(n) => n,
    };

    let left = measured_height(node.left())?;
    let right = measured_height(node.right())?;
    if left.max(right) - left.min(right) > 1 {
        return Err(InvariantViolation::Unbalanced { left, right });
    }

    let actual = left.max(right) + 1;
    if node.height() != actual {
        return Err(InvariantViolation::HeightMismatch {
            cached: node.height(),
            actual,
        });
    }
    Ok(actual)
}

/// All keys in the tree, smallest first.
pub fn keys<K>(tree: &Tree<K>) -> Vec<&K> {
    let mut keys = Vec::new();
    push_in_order(tree, &mut keys);
    keys
}

fn push_in_order<'a, K>(tree: &'a Tree<K>, keys: &mut Vec<&'a K>) {
    if let Tree::Node(n) = tree {
        push_in_order(n.left(), keys);
        keys.push(n.key());
        push_in_order(n.right(), keys);
    }
}
