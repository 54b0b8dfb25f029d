use std::collections::BTreeMap;
use std::ops::Bound;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use llrb_rank::{Error, Llrb};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

// Keys drawn from a narrow range so that puts collide and deletes hit.
fn key_strategy() -> impl Strategy<Value = i64> {
    -500i64..500i64
}

#[derive(Debug, Clone)]
enum MapOp {
    Put(i64, i64),
    Delete(i64),
    DeleteMin,
    DeleteMax,
    Get(i64),
    Rank(i64),
    Select(usize),
    Floor(i64),
    Ceiling(i64),
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), any::<i64>()).prop_map(|(k, v)| MapOp::Put(k, v)),
        3 => key_strategy().prop_map(MapOp::Delete),
        1 => Just(MapOp::DeleteMin),
        1 => Just(MapOp::DeleteMax),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::Rank),
        1 => (0usize..1_000).prop_map(MapOp::Select),
        1 => key_strategy().prop_map(MapOp::Floor),
        1 => key_strategy().prop_map(MapOp::Ceiling),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Replays a random sequence of operations on both Llrb and BTreeMap,
    /// tree must stay valid and agree with BTreeMap after every step.
    #[test]
    fn ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut llrb: Llrb<i64, i64> = Llrb::new("proptest");
        let mut btmap: BTreeMap<i64, i64> = BTreeMap::new();

        for op in ops {
            match op {
                MapOp::Put(k, v) => prop_assert_eq!(llrb.put(k, v), btmap.insert(k, v)),
                MapOp::Delete(k) => prop_assert_eq!(llrb.delete(&k), btmap.remove(&k)),
                MapOp::DeleteMin => {
                    let refval = btmap.pop_first();
                    match refval {
                        Some(entry) => prop_assert_eq!(llrb.delete_min(), Ok(entry)),
                        None => prop_assert_eq!(llrb.delete_min(), Err(Error::Underflow)),
                    }
                }
                MapOp::DeleteMax => {
                    let refval = btmap.pop_last();
                    match refval {
                        Some(entry) => prop_assert_eq!(llrb.delete_max(), Ok(entry)),
                        None => prop_assert_eq!(llrb.delete_max(), Err(Error::Underflow)),
                    }
                }
                MapOp::Get(k) => prop_assert_eq!(llrb.get(&k).ok(), btmap.get(&k).cloned()),
                MapOp::Rank(k) => prop_assert_eq!(llrb.rank(&k), btmap.range(..k).count()),
                MapOp::Select(n) => prop_assert_eq!(llrb.select(n).ok(), btmap.keys().nth(n).cloned()),
                MapOp::Floor(k) => {
                    let refval = btmap.range(..=k).next_back().map(|(k, _)| *k);
                    prop_assert_eq!(llrb.floor(&k), refval);
                }
                MapOp::Ceiling(k) => {
                    let refval = btmap.range(k..).next().map(|(k, _)| *k);
                    prop_assert_eq!(llrb.ceiling(&k), refval);
                }
            }
            prop_assert!(llrb.validate().is_ok());
            prop_assert_eq!(llrb.len(), btmap.len());
        }

        let items: Vec<(i64, i64)> = llrb.iter().collect();
        let ref_items: Vec<(i64, i64)> = btmap.into_iter().collect();
        prop_assert_eq!(items, ref_items);
    }

    /// rank() and select() are inverse of each other, for present keys.
    #[test]
    fn rank_select_duality(keys in proptest::collection::btree_set(key_strategy(), 0..300)) {
        let llrb: Llrb<i64, ()> = Llrb::load_from("proptest", keys.iter().map(|k| (*k, ())));
        prop_assert_eq!(llrb.len(), keys.len());
        for key in keys.iter() {
            prop_assert_eq!(llrb.select(llrb.rank(key)), Ok(*key));
        }
        for k in 0..llrb.len() {
            let key = llrb.select(k).unwrap();
            prop_assert_eq!(llrb.rank(&key), k);
        }
        let is_invalid = matches!(llrb.select(llrb.len()), Err(Error::InvalidArgument(_)));
        prop_assert!(is_invalid);
    }

    /// floor(key) <= key <= ceiling(key), with equality on present keys.
    #[test]
    fn floor_ceiling_bounds(
        keys in proptest::collection::btree_set(key_strategy(), 1..300),
        probe in -600i64..600i64,
    ) {
        let llrb: Llrb<i64, i64> = Llrb::load_from("proptest", keys.iter().map(|k| (*k, *k)));
        if let Some(floor) = llrb.floor(&probe) {
            prop_assert!(floor <= probe);
        }
        if let Some(ceiling) = llrb.ceiling(&probe) {
            prop_assert!(ceiling >= probe);
        }
        if keys.contains(&probe) {
            prop_assert_eq!(llrb.floor(&probe), Some(probe));
            prop_assert_eq!(llrb.ceiling(&probe), Some(probe));
        }
    }

    /// Height of a left leaning red black tree is bounded by 2 * lg(n).
    #[test]
    fn height_is_logarithmic(keys in proptest::collection::vec(any::<i64>(), 1..2_000)) {
        let llrb: Llrb<i64, i64> = Llrb::load_from("proptest", keys.into_iter().map(|k| (k, k)));
        let stats = llrb.validate().unwrap();
        let bound = 2.0 * ((llrb.len() + 1) as f64).log2();
        prop_assert!((llrb.height() as f64) <= bound);
        prop_assert_eq!(stats.height(), Some(llrb.height()));
    }
}

#[test]
fn range_matches_btreemap() {
    let iter = (0..200).step_by(2).map(|k| (k, k * 10));
    let llrb: Llrb<i64, i64> = Llrb::load_from("range", iter.clone());
    let btmap: BTreeMap<i64, i64> = iter.collect();

    let bounds = vec![
        (Bound::Included(10), Bound::Excluded(50)),
        (Bound::Excluded(10), Bound::Included(50)),
        (Bound::Included(11), Bound::Included(11)),
        (Bound::Unbounded, Bound::Excluded(7)),
        (Bound::Included(190), Bound::Unbounded),
        (Bound::Unbounded, Bound::Unbounded),
    ];
    for (low, high) in bounds {
        let items: Vec<(i64, i64)> = llrb.range((low, high)).collect();
        let ref_items: Vec<(i64, i64)> = btmap.range((low, high)).map(|(k, v)| (*k, *v)).collect();
        assert_eq!(items, ref_items);

        let items: Vec<(i64, i64)> = llrb.range((low, high)).rev().collect();
        let ref_items: Vec<(i64, i64)> =
            btmap.range((low, high)).rev().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(items, ref_items);
    }
}

#[test]
fn string_keys_borrowed_lookup() {
    let mut llrb: Llrb<String, usize> = Llrb::new("strings");
    for (i, word) in ["kiwi", "apple", "mango", "fig", "banana"].iter().enumerate() {
        llrb.put(word.to_string(), i);
    }
    assert_eq!(llrb.get("fig"), Ok(3));
    assert_eq!(llrb.rank("fig"), 2);
    assert_eq!(llrb.select(0), Ok("apple".to_string()));
    assert_eq!(llrb.floor("grape"), Some("fig".to_string()));
    assert_eq!(llrb.ceiling("grape"), Some("kiwi".to_string()));
    assert_eq!(llrb.delete("kiwi"), Some(0));
    assert_eq!(llrb.get("kiwi"), Err(Error::NotFound));
    assert!(llrb.validate().is_ok());
}
