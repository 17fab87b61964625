use ordered_hashmap::{MapError, OrderedHashMap};
use std::sync::Mutex;

fn keys<S>(m: &OrderedHashMap<String, i32, S>) -> Vec<String> {
    m.keys().cloned().collect()
}

fn values<S>(m: &OrderedHashMap<String, i32, S>) -> Vec<i32> {
    m.values().copied().collect()
}

fn map_of(entries: &[(&str, i32)]) -> OrderedHashMap<String, i32> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn set_get_update_delete_scenario() {
    let mut m = OrderedHashMap::new();
    m.set("a".to_string(), 1);
    m.set("b".to_string(), 2);
    m.set("c".to_string(), 3);
    assert_eq!(keys(&m), ["a", "b", "c"]);
    assert_eq!(values(&m), [1, 2, 3]);

    assert_eq!(m.get("b").ok(), Some(&2));
    assert!(matches!(m.get("d"), Err(MapError::KeyNotFound)));

    m.set("b".to_string(), 5);
    assert_eq!(m.get("b").ok(), Some(&5));
    assert_eq!(keys(&m), ["a", "b", "c"]);

    m.delete("b");
    assert!(m.get("b").unwrap_err().is_key_not_found());
    assert_eq!(keys(&m), ["a", "c"]);
    assert_eq!(values(&m), [1, 3]);

    m.set("single".to_string(), 42);
    assert_eq!(m.last(), Some((&"single".to_string(), &42)));
}

/// Order preservation: first-insertion order regardless of interleaved updates.
#[test]
fn interleaved_updates_do_not_reorder() {
    let mut m: OrderedHashMap<String, i32> = OrderedHashMap::new();
    for (i, k) in ["k1", "k2", "k3", "k4"].into_iter().enumerate() {
        m.set(k.to_string(), i as i32);
        m.set("k1".to_string(), 100 + i as i32);
    }
    assert_eq!(keys(&m), ["k1", "k2", "k3", "k4"]);
    assert_eq!(m.index_of("k1"), Some(0));
    assert_eq!(m.get("k1").ok(), Some(&103));
}

#[test]
fn index_of_tracks_position() {
    let mut m = map_of(&[("a", 1), ("b", 2), ("c", 3)]);
    assert_eq!(m.index_of("c"), Some(2));
    assert_eq!(m.index_of("zz"), None);
    m.delete("a");
    assert_eq!(m.index_of("c"), Some(1));
    m.set("c".to_string(), 30);
    assert_eq!(m.index_of("c"), Some(1));
}

/// Delete correctness: length drops by one and the rest keep their order.
#[test]
fn delete_keeps_relative_order() {
    let mut m = map_of(&[("a", 1), ("b", 2), ("c", 3), ("d", 4), ("e", 5)]);
    let before = m.len();
    assert!(m.delete("c"));
    assert_eq!(m.len(), before - 1);
    assert_eq!(keys(&m), ["a", "b", "d", "e"]);
    assert!(!m.delete("c"));
    assert_eq!(m.len(), before - 1);
}

#[test]
fn pop_reports_found() {
    let mut m = map_of(&[("a", 1), ("b", 2)]);
    assert_eq!(m.pop("a"), Some(1));
    assert_eq!(m.pop("a"), None);
    assert_eq!(m.pop_entry("b"), Some(("b".to_string(), 2)));
    assert!(m.is_empty());
}

#[test]
fn get_or_default_and_get_mut() {
    let mut m = map_of(&[("a", 1)]);
    assert_eq!(m.get_or_default("a"), 1);
    assert_eq!(m.get_or_default("missing"), 0);
    *m.get_mut("a").unwrap() += 9;
    assert_eq!(m["a"], 10);
    assert!(m.get_mut("missing").unwrap_err().is_key_not_found());
}

#[test]
fn contains_key_and_value() {
    let m = map_of(&[("a", 1), ("b", -2)]);
    assert!(m.contains_key("a"));
    assert!(!m.contains_key("c"));
    assert!(m.contains_value(&-2));
    assert!(!m.contains_value(&3));
    assert!(m.contains_value_by(&2, |stored, wanted| stored.abs() == *wanted));
}

#[test]
fn for_each_and_reverse_visit_in_order() {
    let m = map_of(&[("x", 1), ("y", 2), ("z", 3)]);
    let mut forward = Vec::new();
    m.for_each(|k, v| forward.push(format!("{k}={v}")));
    assert_eq!(forward, ["x=1", "y=2", "z=3"]);

    let mut backward = Vec::new();
    m.for_each_reverse(|k, _| backward.push(k.clone()));
    assert_eq!(backward, ["z", "y", "x"]);
}

/// Reverse involution.
#[test]
fn reverse_twice_restores_order() {
    let mut m = map_of(&[("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
    let original = keys(&m);
    m.reverse();
    assert_eq!(keys(&m), ["d", "c", "b", "a"]);
    assert_eq!(m.first(), Some((&"d".to_string(), &4)));
    m.reverse();
    assert_eq!(keys(&m), original);
}

/// Sort invertibility: asc then desc ends descending; repeating is idempotent.
#[test]
fn sort_asc_then_desc() {
    let mut m = map_of(&[("pear", 1), ("apple", 2), ("fig", 3), ("Banana", 4)]);
    m.sort_asc();
    assert_eq!(keys(&m), ["Banana", "apple", "fig", "pear"]);

    m.sort_desc();
    let once = keys(&m);
    assert_eq!(once, ["pear", "fig", "apple", "Banana"]);

    m.sort_asc();
    m.sort_desc();
    assert_eq!(keys(&m), once);

    // values travel with their keys
    assert_eq!(m.get("fig").ok(), Some(&3));
}

#[test]
fn sort_by_value() {
    let mut m = map_of(&[("a", 3), ("b", 1), ("c", 2)]);
    m.sort_by(|(_, a), (_, b)| a.cmp(b));
    assert_eq!(keys(&m), ["b", "c", "a"]);
    m.set("d".to_string(), 0);
    assert_eq!(keys(&m), ["b", "c", "a", "d"]);
}

/// Clone isolation in both directions.
#[test]
fn clone_is_isolated() {
    let mut m = map_of(&[("a", 1), ("b", 2), ("c", 3)]);
    let mut c = m.clone();
    m.set("d".to_string(), 4);
    m.delete("a");
    assert_eq!(keys(&c), ["a", "b", "c"]);
    assert_eq!(values(&c), [1, 2, 3]);

    c.delete("c");
    c.set("b".to_string(), 20);
    assert_eq!(keys(&m), ["b", "c", "d"]);
    assert_eq!(values(&m), [2, 3, 4]);
}

/// Merge semantics: existing keys stay put with new values; new keys append.
#[test]
fn merge_updates_and_appends() {
    let mut m1 = map_of(&[("a", 1), ("b", 2)]);
    let m2 = map_of(&[("b", 20), ("c", 3)]);
    m1.merge(&m2);
    assert_eq!(keys(&m1), ["a", "b", "c"]);
    assert_eq!(values(&m1), [1, 20, 3]);
    assert_eq!(keys(&m2), ["b", "c"]);
}

#[test]
fn merge_appends_in_other_order() {
    let mut m1 = map_of(&[("a", 1)]);
    let m2 = map_of(&[("z", 26), ("a", 10), ("m", 13)]);
    m1.merge(&m2);
    assert_eq!(keys(&m1), ["a", "z", "m"]);
    assert_eq!(values(&m1), [10, 26, 13]);
}

#[test]
fn clear_then_reuse() {
    let mut m = map_of(&[("a", 1), ("b", 2), ("c", 3)]);
    m.clear();
    assert!(m.is_empty());
    assert_eq!(m.len(), 0);
    assert!(m.first().is_none());
    assert_eq!(m.iter().count(), 0);
    assert_eq!(m.pooled(), 3);

    m.set("c".to_string(), 30);
    m.set("a".to_string(), 10);
    assert_eq!(keys(&m), ["c", "a"]);
    assert_eq!(m.pooled(), 1);
}

/// High churn keeps the arena at its peak size by reusing retired nodes.
#[test]
fn churn_recycles_nodes() {
    let mut m: OrderedHashMap<u64, u64> = OrderedHashMap::with_capacity(64);
    for round in 0..50u64 {
        for i in 0..64 {
            m.set(round * 1000 + i, i);
        }
        for i in 0..64 {
            assert!(m.delete(&(round * 1000 + i)));
        }
        assert!(m.is_empty());
        assert_eq!(m.pooled(), 64);
    }
}

#[test]
fn owned_iteration_is_ordered_both_ways() {
    let m = map_of(&[("a", 1), ("b", 2), ("c", 3)]);
    let mut it = m.clone().into_iter();
    assert_eq!(it.len(), 3);
    assert_eq!(it.next(), Some(("a".to_string(), 1)));
    assert_eq!(it.next_back(), Some(("c".to_string(), 3)));
    assert_eq!(it.next(), Some(("b".to_string(), 2)));
    assert_eq!(it.next(), None);

    let pairs: Vec<(String, i32)> = m.into_iter().rev().collect();
    assert_eq!(pairs[0], ("c".to_string(), 3));
}

#[test]
fn double_ended_iter_meets_in_the_middle() {
    let m = map_of(&[("a", 1), ("b", 2), ("c", 3)]);
    let mut it = m.iter();
    assert_eq!(it.next().map(|(k, _)| k.as_str()), Some("a"));
    assert_eq!(it.next_back().map(|(k, _)| k.as_str()), Some("c"));
    assert_eq!(it.len(), 1);
    assert_eq!(it.next().map(|(k, _)| k.as_str()), Some("b"));
    assert!(it.next().is_none());
    assert!(it.next_back().is_none());
}

#[test]
fn equality_is_order_sensitive() {
    let a = map_of(&[("x", 1), ("y", 2)]);
    let b = map_of(&[("y", 2), ("x", 1)]);
    assert_ne!(a, b);
    let mut c = b.clone();
    c.sort_asc();
    assert_eq!(a, c);
    assert_eq!(format!("{a:?}"), r#"{"x": 1, "y": 2}"#);
}

#[test]
fn from_array_and_extend() {
    let mut m = OrderedHashMap::from([("b", 2), ("a", 1)]);
    m.extend([("c", 3), ("b", 20)]);
    assert_eq!(m.keys().copied().collect::<Vec<_>>(), ["b", "a", "c"]);
    assert_eq!(m.values().copied().collect::<Vec<_>>(), [20, 1, 3]);
}

#[test]
fn non_text_keys_support_core_operations() {
    let mut m: OrderedHashMap<(u8, u8), &str> = OrderedHashMap::new();
    m.set((2, 0), "two");
    m.set((1, 0), "one");
    m.reverse();
    assert_eq!(m.keys().copied().collect::<Vec<_>>(), [(1, 0), (2, 0)]);
    m.sort_by(|(a, _), (b, _)| b.cmp(a));
    assert_eq!(m.first(), Some((&(2, 0), &"two")));
}

/// Shared use goes through an external lock held per operation.
#[test]
fn shared_behind_mutex() {
    let shared = Mutex::new(OrderedHashMap::<String, usize>::new());
    std::thread::scope(|s| {
        for t in 0..4 {
            let shared = &shared;
            s.spawn(move || {
                for i in 0..25 {
                    shared.lock().unwrap().set(format!("t{t}-{i}"), i);
                }
            });
        }
    });
    let m = shared.into_inner().unwrap();
    assert_eq!(m.len(), 100);
    for t in 0..4 {
        let positions: Vec<usize> = (0..25)
            .map(|i| m.index_of(format!("t{t}-{i}").as_str()).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
