use persistent_avl::avl::Tree;
use persistent_avl::invariants;

use std::collections::{BTreeSet, HashSet};

use crate::{log_init, Op};

/// Applies a set of operations to a tree and a set.
/// This way we can ensure that after a random smattering of inserts
/// and removes we have the same keys in both.
fn do_ops<K>(ops: &[Op<K>], mut tree: Tree<K>, set: &mut BTreeSet<K>) -> Tree<K>
where
    K: Ord + Clone,
{
    for op in ops {
        match op {
            Op::Insert(k) => {
                tree = tree.insert(k.clone());
                set.insert(k.clone());
            }
            Op::Remove(k) => {
                tree = tree.remove(k);
                set.remove(k);
            }
        }
    }

    tree
}

fn build(xs: &[i32]) -> Tree<i32> {
    xs.iter().copied().collect()
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    log_init();
    let mut set = BTreeSet::new();

    let tree = do_ops(&ops, Tree::new(), &mut set);
    invariants::validate(&tree).is_ok() && invariants::keys(&tree) == set.iter().collect::<Vec<_>>()
}

#[quickcheck]
fn ordered_after_inserts(xs: Vec<i32>) -> bool {
    invariants::check_ordering(&build(&xs)).is_ok()
}

#[quickcheck]
fn balanced_after_inserts(xs: Vec<i32>) -> bool {
    invariants::check_balance(&build(&xs)).is_ok()
}

#[quickcheck]
fn valid_after_removals(remaining: Vec<i32>, removals: Vec<i32>) -> bool {
    let all: Vec<_> = remaining.iter().chain(&removals).copied().collect();
    let tree = removals
        .iter()
        .fold(build(&all), |tree, removal| tree.remove(removal));

    invariants::validate(&tree).is_ok()
}

#[quickcheck]
fn contains(xs: Vec<i32>) -> bool {
    let tree = build(&xs);

    xs.iter()
        .all(|x| tree.search(x).map(|node| node.key()) == Some(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.search(x).is_none())
}

#[quickcheck]
fn with_removals(xs: Vec<i8>, removals: Vec<i8>) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    for removal in &removals {
        tree = tree.remove(removal);
    }

    let mut still_present = xs;
    for removal in &removals {
        // We may have inserted the same key multiple times - drop each one.
        while let Some(pos) = still_present.iter().position(|x| x == removal) {
            still_present.swap_remove(pos);
        }
    }

    removals.iter().all(|x| !tree.contains(x)) && still_present.iter().all(|x| tree.contains(x))
}

#[quickcheck]
fn absent_removal_keeps_keys(insertions: Vec<i8>, removals: Vec<i8>) -> bool {
    let tree: Tree<_> = insertions.iter().copied().collect();
    let absent = removals.iter().filter(|x| !insertions.contains(x));
    let after = absent.fold(tree.clone(), |tree, removal| tree.remove(removal));

    invariants::keys(&after) == invariants::keys(&tree) && after.height() == tree.height()
}

#[quickcheck]
fn duplicate_insert_is_idempotent(xs: Vec<i32>, key: i32) -> bool {
    let once = build(&xs).insert(key);
    let twice = once.insert(key);

    invariants::keys(&once) == invariants::keys(&twice)
}

#[quickcheck]
fn snapshots_are_persistent(xs: Vec<i8>, ops: Vec<Op<i8>>) -> bool {
    let snapshot: Tree<_> = xs.iter().copied().collect();
    let before: Vec<i8> = invariants::keys(&snapshot).into_iter().copied().collect();

    let mut set = before.iter().copied().collect();
    let _later = do_ops(&ops, snapshot.clone(), &mut set);

    invariants::keys(&snapshot).into_iter().copied().collect::<Vec<_>>() == before
        && invariants::validate(&snapshot).is_ok()
}

#[quickcheck]
fn min_is_smallest(xs: Vec<i32>) -> bool {
    let tree = build(&xs);
    tree.min() == xs.iter().min()
}
