//! Property tests for the synthetic value generator.

use std::collections::BTreeMap;

use mockstream_core::{Generator, SyntheticValue, MAX_DEPTH, MAX_LIST_LEN, MAX_OBJECT_KEYS, SINGLE_KEY};
use proptest::prelude::*;

/// Walks every nested value, calling `visit` with the depth it was generated at.
fn walk<'a>(value: &'a SyntheticValue, depth: u32, visit: &mut impl FnMut(&'a SyntheticValue, u32)) {
    visit(value, depth);
    match value {
        SyntheticValue::Object(map) => {
            for child in map.values() {
                walk(child, depth + 1, visit);
            }
        }
        SyntheticValue::List(items) => {
            for item in items {
                walk(item, depth, visit);
            }
        }
        _ => {}
    }
}

fn assert_object_keys(map: &BTreeMap<String, SyntheticValue>) {
    if map.len() == 1 && map.contains_key(SINGLE_KEY) {
        return;
    }

    let count = map.len();
    assert!((1..=MAX_OBJECT_KEYS).contains(&count), "key count {count}");
    for i in 0..count {
        assert!(map.contains_key(&format!("key_{i}")), "missing key_{i} in {map:?}");
    }
}

proptest! {
    #[test]
    fn past_the_depth_ceiling_no_object_is_produced(seed in any::<u64>(), depth in (MAX_DEPTH + 1)..64) {
        let mut generator = Generator::seeded(seed);
        let value = generator.generate(depth);

        prop_assert!(!value.is_object());
        walk(&value, depth, &mut |v, _| assert!(!v.is_object()));
    }

    #[test]
    fn objects_only_appear_within_the_budget(seed in any::<u64>(), depth in 0..=MAX_DEPTH) {
        let mut generator = Generator::seeded(seed);
        let value = generator.generate(depth);

        prop_assert!(value.is_object());
        walk(&value, depth, &mut |v, d| {
            assert_eq!(v.is_object(), d <= MAX_DEPTH, "depth {d}: {v:?}");
        });
    }

    #[test]
    fn lists_are_bounded_and_distinct(seed in any::<u64>()) {
        let mut generator = Generator::seeded(seed);

        for _ in 0..16 {
            let value = generator.payload();
            walk(&value, 0, &mut |v, _| {
                if let SyntheticValue::List(items) = v {
                    assert!(!items.is_empty());
                    assert!(items.len() <= MAX_LIST_LEN);
                    for (i, a) in items.iter().enumerate() {
                        for b in &items[i + 1..] {
                            assert_ne!(a, b);
                        }
                    }
                }
            });
        }
    }

    #[test]
    fn object_keys_are_indexed_or_single(seed in any::<u64>()) {
        let mut generator = Generator::seeded(seed);

        for _ in 0..16 {
            let value = generator.payload();
            walk(&value, 0, &mut |v, _| {
                if let SyntheticValue::Object(map) = v {
                    assert_object_keys(map);
                }
            });
        }
    }

    #[test]
    fn serialization_round_trips(seed in any::<u64>()) {
        let mut generator = Generator::seeded(seed);

        for _ in 0..8 {
            let value = generator.payload();
            let json = value.to_json().unwrap();
            let parsed = SyntheticValue::from_json(&json).unwrap();
            prop_assert_eq!(parsed, value);
        }
    }
}

#[test]
fn both_object_shapes_are_produced() {
    let mut generator = Generator::seeded(2024);
    let (mut single, mut indexed) = (0, 0);

    for _ in 0..300 {
        if let SyntheticValue::Object(map) = generator.generate(MAX_DEPTH) {
            if map.len() == 1 && map.contains_key(SINGLE_KEY) {
                single += 1;
            } else {
                indexed += 1;
            }
        }
    }

    assert!(single > 0);
    assert!(indexed > single);
}
