use image::DynamicImage;
use proptest::prelude::*;
use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};
use thumbcache::{BoundedImageCache, CacheKey, DecodedImage, TargetSize};

fn hash_of(key: &CacheKey) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

fn target_size() -> impl Strategy<Value = TargetSize> {
    prop_oneof![
        (0u32..2000, 0u32..2000, 1u32..4)
            .prop_map(|(w, h, s)| TargetSize::size(w as f64, h as f64, s as f64)),
        (0u32..2000, 1u32..4).prop_map(|(w, s)| TargetSize::width(w as f64, s as f64)),
        (0u32..2000, 1u32..4).prop_map(|(h, s)| TargetSize::height(h as f64, s as f64)),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Set { slot: u8, cost: usize },
    Get { slot: u8 },
    Remove { slot: u8 },
    Limits { count: usize, cost: usize },
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0u8..16, 0usize..64).prop_map(|(slot, cost)| Op::Set { slot, cost }),
        2 => (0u8..16).prop_map(|slot| Op::Get { slot }),
        2 => (0u8..16).prop_map(|slot| Op::Remove { slot }),
        1 => (0usize..6, 0usize..128).prop_map(|(count, cost)| Op::Limits { count, cost }),
        1 => Just(Op::Clear),
    ]
}

fn slot_key(slot: u8) -> CacheKey {
    CacheKey::new(&format!("img-{}", slot % 4), &TargetSize::width(slot as f64, 1.0))
}

proptest! {
    #[test]
    fn identical_inputs_give_equal_keys(locator in "[a-z]{1,12}", size in target_size()) {
        let a = CacheKey::new(&locator, &size);
        let b = CacheKey::new(&locator, &size);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn keys_differ_when_a_field_differs(
        a in "[a-z]{1,8}",
        b in "[a-z]{1,8}",
        wa in 1u32..500,
        wb in 1u32..500,
    ) {
        let left = CacheKey::new(&a, &TargetSize::width(wa as f64, 1.0));
        let right = CacheKey::new(&b, &TargetSize::width(wb as f64, 1.0));
        prop_assert_eq!(left == right, a == b && wa == wb);
    }

    #[test]
    fn bounds_hold_after_every_operation(
        initial_count in 0usize..6,
        initial_cost in 0usize..128,
        ops in prop::collection::vec(op(), 1..64),
    ) {
        let cache = BoundedImageCache::with_limits(initial_count, initial_cost);
        let image = DecodedImage::new(DynamicImage::new_rgba8(1, 1));

        for op in ops {
            match op {
                Op::Set { slot, cost } => {
                    cache.set_with_cost(slot_key(slot), image.clone(), cost);
                }
                Op::Get { slot } => {
                    cache.get(&slot_key(slot));
                }
                Op::Remove { slot } => {
                    cache.remove(&slot_key(slot));
                }
                Op::Limits { count, cost } => cache.set_limits(count, cost),
                Op::Clear => {
                    cache.clear();
                    prop_assert!(cache.is_empty());
                }
            }

            let (count_limit, cost_limit) = cache.limits();
            if count_limit > 0 {
                prop_assert!(cache.len() <= count_limit);
            }
            if cost_limit > 0 {
                prop_assert!(cache.total_cost() <= cost_limit);
            }
        }
    }

    #[test]
    fn inserted_entry_survives_count_limit_one(slots in prop::collection::vec(0u8..16, 1..20)) {
        let cache = BoundedImageCache::with_limits(1, 0);
        let image = DecodedImage::new(DynamicImage::new_rgba8(1, 1));

        for slot in slots {
            cache.set(slot_key(slot), image.clone());
            prop_assert_eq!(cache.len(), 1);
            prop_assert!(cache.contains(&slot_key(slot)));
        }
    }
}
