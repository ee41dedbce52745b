//! A persistent AVL tree. This is modeled after a balanced tree one would
//! see in a functional language like Haskell. Operations that one would
//! expect to modify the tree (`insert` and `remove`) instead return a new
//! tree that shares every untouched subtree with the original.
//!
//! # Examples
//!
//! ```
//! use persistent_avl::avl::Tree;
//!
//! let tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(tree.search(&1).is_none());
//!
//! // This `insert` returns a new tree!
//! let new_tree = tree.insert(1);
//!
//! // The new tree has the key but the old one doesn't.
//! assert_eq!(new_tree.search(&1).map(|n| *n.key()), Some(1));
//! assert!(tree.search(&1).is_none());
//!
//! // Remove it for good measure.
//! let newer_tree = new_tree.remove(&1);
//!
//! // All history is preserved.
//! assert!(newer_tree.search(&1).is_none());
//! assert!(new_tree.search(&1).is_some());
//! assert!(tree.search(&1).is_none());
//! ```

use std::cmp;
use std::iter::FromIterator;

use log::trace;

use crate::util::{ReferenceCounter, Removal};

/// A self-balancing Binary Search Tree (specifically, an AVL tree) of keys.
/// Note that this data structure is functional - operations that would
/// modify the tree instead return a new tree.
#[derive(Debug)]
pub enum Tree<K> {
    /// A marker for the empty pointer at the bottom of a subtree.
    Leaf,
    /// A `Node` that has a key and two children (which are both `Tree`s).
    /// This enum trivially wraps the [`Node`] struct.
    Node(Node<K>),
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloning a tree is cheap: the clone shares its root's children and key.
impl<K> Clone for Tree<K> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf => Self::Leaf,
            Self::Node(n) => Self::Node(n.clone()),
        }
    }
}

impl<K> Tree<K> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self::Leaf
    }

    /// Whether this tree holds no keys.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Leaf)
    }

    /// Returns a new tree that includes the given key. Inserting a key
    /// that is already present returns a tree sharing this tree's root.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_avl::avl::Tree;
    ///
    /// let tree = Tree::new();
    /// let new_tree = tree.insert(1);
    /// let newer_tree = new_tree.insert(2);
    ///
    /// // All history is preserved.
    /// assert!(newer_tree.contains(&2));
    /// assert!(!new_tree.contains(&2));
    /// assert!(!tree.contains(&1));
    /// ```
    pub fn insert(&self, key: K) -> Self
    where
        K: cmp::Ord,
    {
        match self {
            Self::Leaf => Self::Node(Node::new(key)),
            Self::Node(n) => n.insert(key).map_or_else(|| self.clone(), Self::Node),
        }
    }

    /// Potentially finds the node holding the given key in this tree. If no
    /// node has the key, `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_avl::avl::Tree;
    ///
    /// let tree = Tree::new().insert(0);
    ///
    /// // A stored zero is found, not confused with a miss.
    /// assert_eq!(tree.search(&0).map(|n| *n.key()), Some(0));
    /// assert!(tree.search(&42).is_none());
    /// ```
    pub fn search(&self, key: &K) -> Option<&Node<K>>
    where
        K: cmp::Ord,
    {
        match self {
            Self::Leaf => None,
            Self::Node(n) => n.search(key),
        }
    }

    /// Whether a node with the given key is in this tree.
    pub fn contains(&self, key: &K) -> bool
    where
        K: cmp::Ord,
    {
        self.search(key).is_some()
    }

    /// Returns a new tree without the given key. If the tree never
    /// contained the key, the returned tree shares this tree's root.
    ///
    /// # Examples
    ///
    /// ```
    /// use persistent_avl::avl::Tree;
    ///
    /// let tree = Tree::new().insert(1);
    /// let newer_tree = tree.remove(&1);
    ///
    /// // All history is preserved.
    /// assert!(!newer_tree.contains(&1));
    /// assert!(tree.contains(&1));
    /// ```
    pub fn remove(&self, key: &K) -> Self
    where
        K: cmp::Ord,
    {
        match self {
            Self::Leaf => Self::new(),
            Self::Node(n) => match n.remove(key) {
                Removal::NotFound => self.clone(),
                Removal::Removed(subtree) => subtree.0.as_ref().clone(),
            },
        }
    }

    /// The smallest key in this tree.
    pub fn min(&self) -> Option<&K> {
        match self {
            Self::Leaf => None,
            Self::Node(n) => Some(n.min()),
        }
    }

    /// Gets the height of this tree. An empty tree has a height of 0.
    pub fn height(&self) -> usize {
        match self {
            Self::Leaf => 0,
            Self::Node(n) => n.height,
        }
    }

    /// Builds a node without rebalancing, trusting the caller's `height`. Used to hand
    /// malformed trees to the invariant checks.
    #[cfg(test)]
    pub(crate) fn assemble(key: K, left: Self, right: Self, height: usize) -> Self {
        Self::Node(Node {
            height,
            key: ReferenceCounter::new(key),
            left: Child(ReferenceCounter::new(left)),
            right: Child(ReferenceCounter::new(right)),
        })
    }
}

impl<K> FromIterator<K> for Tree<K>
where
    K: cmp::Ord,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |tree, key| tree.insert(key))
    }
}

#[derive(Debug)]
struct Child<K>(ReferenceCounter<Tree<K>>);

impl<K> Clone for Child<K> {
    fn clone(&self) -> Self {
        Self(ReferenceCounter::clone(&self.0))
    }
}

impl<K> Child<K> {
    fn new() -> Self {
        Self(ReferenceCounter::new(Tree::new()))
    }

    fn from_node(node: Node<K>) -> Self {
        Self(ReferenceCounter::new(Tree::Node(node)))
    }

    fn node(&self) -> Option<&Node<K>> {
        match self.0.as_ref() {
            Tree::Leaf => None,
            Tree::Node(n) => Some(n),
        }
    }

    fn height(&self) -> usize {
        self.0.height()
    }

    fn balance_factor(&self) -> isize {
        self.node().map_or(0, Node::balance_factor)
    }

    /// `None` when the key was already present.
    fn insert(&self, key: K) -> Option<Self>
    where
        K: cmp::Ord,
    {
        match self.node() {
            None => Some(Self::from_node(Node::new(key))),
            Some(n) => n.insert(key).map(Self::from_node),
        }
    }

    fn search(&self, key: &K) -> Option<&Node<K>>
    where
        K: cmp::Ord,
    {
        self.0.search(key)
    }

    fn remove(&self, key: &K) -> Removal<Self>
    where
        K: cmp::Ord,
    {
        match self.node() {
            None => Removal::NotFound,
            Some(n) => n.remove(key),
        }
    }

    fn rotate_left(&self) -> Self {
        match self.node() {
            None => self.clone(),
            Some(n) => Self::from_node(n.clone().rotate_left()),
        }
    }

    fn rotate_right(&self) -> Self {
        match self.node() {
            None => self.clone(),
            Some(n) => Self::from_node(n.clone().rotate_right()),
        }
    }
}

/// A `Node` has a key that is used for searching/sorting. It always has two
/// children although those children may be [`Leaf`][Tree::Leaf]s.
#[derive(Debug)]
pub struct Node<K> {
    key: ReferenceCounter<K>,
    left: Child<K>,
    right: Child<K>,

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    height: usize,
}

/// Manual implementation of `Clone` so we don't clone keys when `K` isn't `Clone` itself.
///
/// Note the comment on generic structs in
/// [the docs][<https://doc.rust-lang.org/std/clone/trait.Clone.html#derivable>].
impl<K> Clone for Node<K> {
    fn clone(&self) -> Self {
        Self {
            height: self.height,
            key: ReferenceCounter::clone(&self.key),
            left: self.left.clone(),
            right: self.right.clone(),
        }
    }
}

impl<K> Node<K> {
    /// Construct a new leaf `Node` with the given `key`.
    fn new(key: K) -> Self {
        Self {
            height: 1,
            key: ReferenceCounter::new(key),
            left: Child::new(),
            right: Child::new(),
        }
    }

    /// Create a new Node from its parts, computing its height. Nothing is rebalanced.
    fn from_parts(key: ReferenceCounter<K>, left: Child<K>, right: Child<K>) -> Self {
        let height = left.height().max(right.height()) + 1;
        Self {
            height,
            key,
            left,
            right,
        }
    }

    /// Create a new, rebalanced Node with the same key as this node
    /// but with the given children.
    fn clone_with_children(&self, left_child: Child<K>, right_child: Child<K>) -> Self {
        Self::from_parts(ReferenceCounter::clone(&self.key), left_child, right_child).rebalance()
    }

    /// The key stored in this node.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The subtree of keys smaller than this node's key.
    pub fn left(&self) -> &Tree<K> {
        &self.left.0
    }

    /// The subtree of keys larger than this node's key.
    pub fn right(&self) -> &Tree<K> {
        &self.right.0
    }

    /// The height of the subtree rooted at this node.
    pub fn height(&self) -> usize {
        self.height
    }

    fn insert(&self, key: K) -> Option<Self>
    where
        K: cmp::Ord,
    {
        match key.cmp(&self.key) {
            cmp::Ordering::Less => {
                let new_left = self.left.insert(key)?;
                Some(self.clone_with_children(new_left, self.right.clone()))
            }
            cmp::Ordering::Equal => None,
            cmp::Ordering::Greater => {
                let new_right = self.right.insert(key)?;
                Some(self.clone_with_children(self.left.clone(), new_right))
            }
        }
    }

    fn search(&self, key: &K) -> Option<&Self>
    where
        K: cmp::Ord,
    {
        match key.cmp(&self.key) {
            cmp::Ordering::Less => self.left.search(key),
            cmp::Ordering::Equal => Some(self),
            cmp::Ordering::Greater => self.right.search(key),
        }
    }

    fn remove(&self, key: &K) -> Removal<Child<K>>
    where
        K: cmp::Ord,
    {
        match key.cmp(&self.key) {
            cmp::Ordering::Less => self.left.remove(key).map(|new_left| {
                Child::from_node(self.clone_with_children(new_left, self.right.clone()))
            }),
            cmp::Ordering::Equal => Removal::Removed(match (self.left.node(), self.right.node()) {
                (None, None) => Child::new(),
                (None, Some(_)) => self.right.clone(),
                (Some(_), None) => self.left.clone(),

                // With two children the in-order successor (the smallest key in the right
                // subtree) takes this node's place.
                (Some(_), Some(right)) => {
                    let (successor, new_right) = right.remove_min();
                    Child::from_node(
                        Self::from_parts(successor, self.left.clone(), new_right).rebalance(),
                    )
                }
            }),
            cmp::Ordering::Greater => self.right.remove(key).map(|new_right| {
                Child::from_node(self.clone_with_children(self.left.clone(), new_right))
            }),
        }
    }

    /// Returns the smallest key and a new subtree without the node holding it.
    fn remove_min(&self) -> (ReferenceCounter<K>, Child<K>) {
        match self.left.node() {
            None => (ReferenceCounter::clone(&self.key), self.right.clone()),
            Some(l) => {
                let (min, new_left) = l.remove_min();
                (
                    min,
                    Child::from_node(self.clone_with_children(new_left, self.right.clone())),
                )
            }
        }
    }

    fn min(&self) -> &K {
        match self.left.node() {
            None => &self.key,
            Some(l) => l.min(),
        }
    }

    /// The difference in height between the left and right subtrees. Positive when the left
    /// subtree is taller.
    fn balance_factor(&self) -> isize {
        self.left.height() as isize - self.right.height() as isize
    }

    /// Returns a new tree by rotating the left child up to become the root. To keep the keys in
    /// order, the left child's right child becomes the old root's left child. Without a left
    /// child there is nothing to rotate and `self` is returned.
    ///
    /// ```text
    ///      old_root                new_root
    ///       /     \                 /     \
    ///  new_root    z   rotate ->   x    old_root
    ///    / \                              /  \
    ///   x   y                            y    z
    /// ```
    fn rotate_right(self) -> Self {
        match self.left.node() {
            None => self,
            Some(new_root) => {
                let new_right = Self::from_parts(
                    ReferenceCounter::clone(&self.key),
                    new_root.right.clone(),
                    self.right.clone(),
                );
                Self::from_parts(
                    ReferenceCounter::clone(&new_root.key),
                    new_root.left.clone(),
                    Child::from_node(new_right),
                )
            }
        }
    }

    /// The mirror of [`Node::rotate_right`]: the right child becomes the root and its left child
    /// becomes the old root's right child.
    fn rotate_left(self) -> Self {
        match self.right.node() {
            None => self,
            Some(new_root) => {
                let new_left = Self::from_parts(
                    ReferenceCounter::clone(&self.key),
                    self.left.clone(),
                    new_root.left.clone(),
                );
                Self::from_parts(
                    ReferenceCounter::clone(&new_root.key),
                    Child::from_node(new_left),
                    new_root.right.clone(),
                )
            }
        }
    }

    /// Balances a tree whose children are balanced but whose own balance factor may be off by
    /// one more than allowed. See [the Wikipedia page][wiki] for the four cases.
    ///
    /// **Note** This takes `self` instead of `&self` might not be very functional but it's private,
    /// isn't `mut` and saves us from unnecessary `clone`s when it's already balanced.
    ///
    /// [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Rebalancing
    fn rebalance(self) -> Self {
        let balance_factor = self.balance_factor();
        let return_node = if balance_factor > 1 {
            if self.left.balance_factor() >= 0 {
                trace!("left-left rebalance (balance factor {})", balance_factor);
                self.rotate_right()
            } else {
                trace!("left-right rebalance (balance factor {})", balance_factor);
                let new_left = self.left.rotate_left();
                Self::from_parts(self.key, new_left, self.right).rotate_right()
            }
        } else if balance_factor < -1 {
            if self.right.balance_factor() <= 0 {
                trace!("right-right rebalance (balance factor {})", balance_factor);
                self.rotate_left()
            } else {
                trace!("right-left rebalance (balance factor {})", balance_factor);
                let new_right = self.right.rotate_right();
                Self::from_parts(self.key, self.left, new_right).rotate_left()
            }
        } else {
            self
        };

        // In tests, after balancing, assert that we've restored/maintained the AVL invariant.
        if cfg!(test) {
            assert!(return_node.balance_factor().abs() <= 1);
        }
        return_node
    }
}
