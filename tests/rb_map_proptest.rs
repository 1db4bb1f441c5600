use proptest::prelude::*;
use rw_rbmap::{RbMap, StructuralOrd, Value};

// Mutually comparable tuple keys of mixed arity, so the prefix rule is
// exercised by ordinary map traffic.
fn key_pool() -> Vec<Value> {
    let mut pool = Vec::new();
    for a in 0..3i64 {
        pool.push(Value::Tuple(vec![Value::Int(a)]));
        for b in 0..2i64 {
            pool.push(Value::Tuple(vec![Value::Int(a), Value::Int(b)]));
        }
    }
    pool
}

#[derive(Clone, Debug)]
enum Op {
    Put(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(usize),
    Iterate,
}

fn arb_ops(pool_len: usize) -> impl Strategy<Value = Vec<Op>> {
    let idx = 0..pool_len;
    let op = prop_oneof![
        (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Put(i, v)),
        idx.clone().prop_map(Op::Remove),
        idx.clone().prop_map(Op::Get),
        idx.prop_map(Op::Contains),
        Just(Op::Iterate),
    ];
    proptest::collection::vec(op, 1..150)
}

fn model_position(model: &[(Value, i32)], key: &Value) -> Option<usize> {
    model
        .iter()
        .position(|(k, _)| k.structural_eq(key).unwrap())
}

proptest! {
    // Drive the facade against a flat association-list model; the model
    // uses comparator equality, exactly like the map's row identity.
    #[test]
    fn prop_rb_map_matches_model(ops in arb_ops(9)) {
        let pool = key_pool();
        let m: RbMap<Value, i32> = RbMap::new();
        let mut model: Vec<(Value, i32)> = Vec::new();

        for op in ops {
            match op {
                Op::Put(i, v) => {
                    let prev = m.put(pool[i].clone(), v).unwrap();
                    match model_position(&model, &pool[i]) {
                        Some(p) => {
                            prop_assert_eq!(prev, Some(model[p].1));
                            model[p].1 = v;
                        }
                        None => {
                            prop_assert_eq!(prev, None);
                            model.push((pool[i].clone(), v));
                        }
                    }
                }
                Op::Remove(i) => {
                    let prev = m.remove(&pool[i]).unwrap();
                    match model_position(&model, &pool[i]) {
                        Some(p) => prop_assert_eq!(prev, Some(model.remove(p).1)),
                        None => prop_assert_eq!(prev, None),
                    }
                }
                Op::Get(i) => {
                    let got = m.get(&pool[i]).unwrap();
                    let want = model_position(&model, &pool[i]).map(|p| model[p].1);
                    prop_assert_eq!(got, want);
                }
                Op::Contains(i) => {
                    prop_assert_eq!(
                        m.contains(&pool[i]).unwrap(),
                        model_position(&model, &pool[i]).is_some()
                    );
                }
                Op::Iterate => {
                    let mut want = model.clone();
                    want.sort_by(|(a, _), (b, _)| a.structural_cmp(b).unwrap());
                    let got: Vec<(Value, i32)> = m.iter().collect();
                    prop_assert_eq!(got, want);
                }
            }
            prop_assert_eq!(m.len(), model.len());
        }
    }
}
