#![cfg(test)]

// Property tests for OrderedHashMap kept inside the crate so they can check
// the internal structural invariants after every step.

use crate::ordered_map::OrderedHashMap;
use proptest::prelude::*;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Set(usize, i32),
    Delete(usize),
    Pop(usize),
    Get(usize),
    IndexOf(usize),
    PopFront,
    PopBack,
    Reverse,
    SortAsc,
    SortDesc,
    Clear,
    CloneSwap,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=8).prop_flat_map(|pool| {
        let idx = 0..pool.len();
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Set(i, v)),
            2 => idx.clone().prop_map(OpI::Delete),
            1 => idx.clone().prop_map(OpI::Pop),
            2 => idx.clone().prop_map(OpI::Get),
            1 => idx.clone().prop_map(OpI::IndexOf),
            1 => Just(OpI::PopFront),
            1 => Just(OpI::PopBack),
            1 => Just(OpI::Reverse),
            1 => Just(OpI::SortAsc),
            1 => Just(OpI::SortDesc),
            1 => Just(OpI::Clear),
            1 => Just(OpI::CloneSwap),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: state-machine equivalence against a `Vec<(String, i32)>` model
// kept in iteration order.
// Invariants exercised across random operation sequences:
// - `set` appends new keys and updates existing ones in place.
// - `delete`/`pop`/`pop_front`/`pop_back` remove exactly one entry and keep
//   the relative order of the rest; absent keys are no-ops.
// - `reverse` and the key sorts match the model's reverse and stable sort.
// - A clone behaves identically to its source.
// - Structural invariants (index, chain links, endpoints) hold after each op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 96, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: OrderedHashMap<String, i32> = OrderedHashMap::new();
        let mut model: Vec<(String, i32)> = Vec::new();

        for op in ops {
            match op {
                OpI::Set(i, v) => {
                    let k = pool[i].clone();
                    let prev = sut.set(k.clone(), v);
                    match model.iter_mut().find(|(mk, _)| *mk == k) {
                        Some(slot) => {
                            prop_assert_eq!(prev, Some(slot.1));
                            slot.1 = v;
                        }
                        None => {
                            prop_assert_eq!(prev, None);
                            model.push((k, v));
                        }
                    }
                }
                OpI::Delete(i) => {
                    let k = &pool[i];
                    let pos = model.iter().position(|(mk, _)| mk == k);
                    prop_assert_eq!(sut.delete(k.as_str()), pos.is_some());
                    if let Some(p) = pos {
                        model.remove(p);
                    }
                    prop_assert!(sut.get(k.as_str()).is_err());
                }
                OpI::Pop(i) => {
                    let k = &pool[i];
                    let expected = model
                        .iter()
                        .position(|(mk, _)| mk == k)
                        .map(|p| model.remove(p).1);
                    prop_assert_eq!(sut.pop(k.as_str()), expected);
                }
                OpI::Get(i) => {
                    let k = &pool[i];
                    let expected = model.iter().find(|(mk, _)| mk == k).map(|(_, v)| v);
                    prop_assert_eq!(sut.get(k.as_str()).ok(), expected);
                    prop_assert_eq!(sut.contains_key(k.as_str()), expected.is_some());
                }
                OpI::IndexOf(i) => {
                    let k = &pool[i];
                    let expected = model.iter().position(|(mk, _)| mk == k);
                    prop_assert_eq!(sut.index_of(k.as_str()), expected);
                }
                OpI::PopFront => {
                    let expected = if model.is_empty() { None } else { Some(model.remove(0)) };
                    prop_assert_eq!(sut.pop_front(), expected);
                }
                OpI::PopBack => {
                    prop_assert_eq!(sut.pop_back(), model.pop());
                }
                OpI::Reverse => {
                    sut.reverse();
                    model.reverse();
                }
                OpI::SortAsc => {
                    sut.sort_asc();
                    model.sort_by(|a, b| a.0.cmp(&b.0));
                }
                OpI::SortDesc => {
                    sut.sort_desc();
                    model.sort_by(|a, b| b.0.cmp(&a.0));
                }
                OpI::Clear => {
                    sut.clear();
                    model.clear();
                }
                OpI::CloneSwap => {
                    let copy = sut.clone();
                    prop_assert_eq!(&copy, &sut);
                    sut = copy;
                }
            }

            sut.assert_invariants();
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            let got: Vec<(String, i32)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
            prop_assert_eq!(&got, &model);
            let back: Vec<&String> = sut.keys().rev().collect();
            let model_back: Vec<&String> = model.iter().rev().map(|(k, _)| k).collect();
            prop_assert_eq!(back, model_back);
        }
    }
}

// Property: merge equals sequential `set` of the other map's entries.
proptest! {
    #[test]
    fn prop_merge_matches_sequential_set(
        left in proptest::collection::vec(("[a-e]", any::<u8>()), 0..10),
        right in proptest::collection::vec(("[a-e]", any::<u8>()), 0..10),
    ) {
        let mut a: OrderedHashMap<String, u8> = left.iter().cloned().collect();
        let b: OrderedHashMap<String, u8> = right.iter().cloned().collect();
        let mut expected = a.clone();
        for (k, v) in &b {
            expected.set(k.clone(), *v);
        }
        a.merge(&b);
        a.assert_invariants();
        prop_assert_eq!(&a, &expected);
        for (k, v) in &b {
            prop_assert_eq!(a.get(k.as_str()).ok(), Some(v));
        }
    }
}
