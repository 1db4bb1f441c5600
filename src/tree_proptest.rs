#![cfg(test)]

// Property tests for RbTree kept inside the crate so they can reach the
// invariant checker and height probe without feature gates.

use crate::order::StructuralOrd;
use crate::tree::RbTree;
use proptest::prelude::*;
use std::collections::BTreeMap;

// Small key pool so ops collide: replaces, removals of present keys, and
// repeated lookups all get exercised. Indices shrink toward earlier keys.
#[derive(Clone, Debug)]
enum Op {
    Insert(i64, i32),
    Remove(i64),
    Get(i64),
    Iterate,
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let key = -8i64..=8;
    let op = prop_oneof![
        (key.clone(), any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        key.clone().prop_map(Op::Remove),
        key.prop_map(Op::Get),
        Just(Op::Iterate),
    ];
    proptest::collection::vec(op, 1..200)
}

// Red-black height bound: height <= 2 * log2(n + 1), via bit width.
fn height_bound(len: usize) -> usize {
    2 * (usize::BITS - (len + 1).leading_zeros()) as usize
}

proptest! {
    #[test]
    fn prop_tree_matches_btreemap_model(ops in arb_ops()) {
        let mut tree: RbTree<i64, i32> = RbTree::new();
        let mut model: BTreeMap<i64, i32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    prop_assert_eq!(tree.insert(k, v).unwrap(), model.insert(k, v));
                }
                Op::Remove(k) => {
                    prop_assert_eq!(tree.remove(&k).unwrap(), model.remove(&k));
                }
                Op::Get(k) => {
                    prop_assert_eq!(tree.get(&k).unwrap(), model.get(&k));
                }
                Op::Iterate => {
                    let got: Vec<(i64, i32)> = tree.iter().map(|(k, v)| (*k, *v)).collect();
                    let want: Vec<(i64, i32)> = model.iter().map(|(k, v)| (*k, *v)).collect();
                    prop_assert_eq!(got, want);
                }
            }

            // Structural invariants after every step.
            tree.check_invariants();
            prop_assert_eq!(tree.len(), model.len());
            prop_assert!(tree.height() <= height_bound(tree.len()));
        }
    }

    #[test]
    fn prop_height_stays_logarithmic(keys in proptest::collection::vec(any::<i64>(), 0..1000)) {
        let mut tree: RbTree<i64, ()> = RbTree::new();
        for k in keys {
            tree.insert(k, ()).unwrap();
        }
        tree.check_invariants();
        prop_assert!(tree.height() <= height_bound(tree.len()));
    }

    // Total order laws for tuple keys, including cross-checking against
    // the tree's in-order sequence.
    #[test]
    fn prop_tuple_order_is_lawful(
        a in any::<(i64, i64)>(),
        b in any::<(i64, i64)>(),
        c in any::<(i64, i64)>(),
    ) {
        use core::cmp::Ordering;
        let ab = a.structural_cmp(&b).unwrap();
        let ba = b.structural_cmp(&a).unwrap();
        prop_assert_eq!(ab, ba.reverse());

        let bc = b.structural_cmp(&c).unwrap();
        let ac = a.structural_cmp(&c).unwrap();
        if ab == Ordering::Less && bc == Ordering::Less {
            prop_assert_eq!(ac, Ordering::Less);
        }
        if ab == Ordering::Equal && bc == Ordering::Equal {
            prop_assert_eq!(ac, Ordering::Equal);
        }
    }
}
