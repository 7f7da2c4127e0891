// ==============================================
// CROSS-POLICY CONTRACT TESTS (integration)
// ==============================================
//
// Behaviors every engine must honor through the shared trait, plus the
// characteristic eviction sequence that distinguishes each policy.

use std::sync::Arc;

use evictkit::error::CacheError;
use evictkit::policy::fifo::FifoCache;
use evictkit::policy::lfu::LfuCache;
use evictkit::policy::lru::LruCache;
use evictkit::policy::lru_k::LrukCache;
use evictkit::traits::EvictionPolicy;

/// All four engines behind the trait object surface. LRU-K is configured
/// with K = 1 so a single put admits, matching the other engines for the
/// shared scenarios.
fn all_policies(capacity: usize) -> Vec<(&'static str, Box<dyn EvictionPolicy<u32, String>>)> {
    vec![
        ("LRU", Box::new(LruCache::try_new(capacity).unwrap())),
        ("FIFO", Box::new(FifoCache::try_new(capacity).unwrap())),
        ("LFU", Box::new(LfuCache::try_new(capacity).unwrap())),
        (
            "LRU-1",
            Box::new(LrukCache::try_with_k(capacity, 1).unwrap()),
        ),
    ]
}

mod shared_contract {
    use super::*;

    #[test]
    fn zero_capacity_is_rejected_everywhere() {
        assert!(LruCache::<u32, u32>::try_new(0).is_err());
        assert!(FifoCache::<u32, u32>::try_new(0).is_err());
        assert!(LfuCache::<u32, u32>::try_new(0).is_err());
        assert!(LrukCache::<u32, u32>::try_new(0).is_err());
    }

    #[test]
    fn put_then_get_round_trips() {
        for (name, cache) in all_policies(4) {
            cache.put(1, "one".to_string()).unwrap();
            let value = cache.get(&1).unwrap_or_else(|e| panic!("{name}: {e}"));
            assert_eq!(*value, "one", "{name}");
            assert!(cache.contains(&1), "{name}");
            assert_eq!(cache.len(), 1, "{name}");
        }
    }

    #[test]
    fn miss_is_key_not_found() {
        for (name, cache) in all_policies(4) {
            assert_eq!(
                cache.get(&99).unwrap_err(),
                CacheError::KeyNotFound,
                "{name}"
            );
        }
    }

    #[test]
    fn update_replaces_value() {
        for (name, cache) in all_policies(4) {
            cache.put(1, "old".to_string()).unwrap();
            cache.put(1, "new".to_string()).unwrap();
            assert_eq!(*cache.get(&1).unwrap(), "new", "{name}");
            assert_eq!(cache.len(), 1, "{name}");
        }
    }

    #[test]
    fn size_never_exceeds_capacity() {
        for (name, cache) in all_policies(3) {
            for i in 0..20 {
                cache.put(i, format!("v{i}")).unwrap();
                assert!(cache.len() <= cache.capacity(), "{name}");
            }
            assert_eq!(cache.len(), 3, "{name}");
        }
    }

    #[test]
    fn clear_empties_but_keeps_capacity() {
        for (name, cache) in all_policies(3) {
            cache.put(1, "a".to_string()).unwrap();
            cache.put(2, "b".to_string()).unwrap();
            cache.clear();
            assert!(cache.is_empty(), "{name}");
            assert_eq!(cache.capacity(), 3, "{name}");
            assert!(!cache.contains(&1), "{name}");
            // Fully usable after clear.
            cache.put(5, "e".to_string()).unwrap();
            assert_eq!(*cache.get(&5).unwrap(), "e", "{name}");
        }
    }

    #[test]
    fn values_are_shared_not_cloned() {
        for (name, cache) in all_policies(2) {
            cache.put(1, "shared".to_string()).unwrap();
            let a = cache.get(&1).unwrap();
            let b = cache.get(&1).unwrap();
            assert!(Arc::ptr_eq(&a, &b), "{name}");
        }
    }

    #[test]
    fn policy_names() {
        let names: Vec<String> = all_policies(2)
            .iter()
            .map(|(_, c)| c.policy_name())
            .collect();
        assert_eq!(names, ["LRU", "FIFO", "LFU", "LRU-1"]);
    }
}

mod characteristic_sequences {
    use super::*;

    // Same access pattern, three different survivors.

    #[test]
    fn lru_evicts_least_recent() {
        let cache: LruCache<u32, &str> = LruCache::try_new(3).unwrap();
        cache.put(1, "a").unwrap();
        cache.put(2, "b").unwrap();
        cache.put(3, "c").unwrap();
        cache.get(&1).unwrap();
        cache.put(4, "d").unwrap();

        assert!(cache.contains(&1));
        assert!(!cache.contains(&2));
        assert!(cache.contains(&3));
        assert!(cache.contains(&4));
    }

    #[test]
    fn fifo_evicts_oldest_insertion_despite_access() {
        let cache: FifoCache<u32, &str> = FifoCache::try_new(3).unwrap();
        cache.put(1, "a").unwrap();
        cache.put(2, "b").unwrap();
        cache.put(3, "c").unwrap();
        cache.get(&1).unwrap();
        cache.put(4, "d").unwrap();

        assert!(!cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
        assert!(cache.contains(&4));
    }

    #[test]
    fn lfu_evicts_lowest_frequency() {
        let cache: LfuCache<u32, &str> = LfuCache::try_new(3).unwrap();
        cache.put(1, "a").unwrap();
        cache.put(2, "b").unwrap();
        cache.put(3, "c").unwrap();
        cache.get(&1).unwrap();
        cache.get(&1).unwrap();
        cache.get(&2).unwrap();
        cache.put(4, "d").unwrap();

        assert!(cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(!cache.contains(&3));
        assert!(cache.contains(&4));
    }
}

mod lru_k_admission {
    use super::*;

    #[test]
    fn first_put_tracks_without_admitting() {
        let cache: LrukCache<u32, String> = LrukCache::try_new(10).unwrap();
        assert_eq!(cache.k_value(), 2);

        cache.put(1, "v".to_string()).unwrap();
        assert!(!cache.contains(&1));
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get(&1).unwrap_err(), CacheError::KeyNotFound);
        assert_eq!(cache.history_access_count(&1), 1);
    }

    #[test]
    fn second_put_admits_with_current_value() {
        let cache: LrukCache<u32, String> = LrukCache::try_new(10).unwrap();
        cache.put(1, "first".to_string()).unwrap();
        cache.put(1, "second".to_string()).unwrap();

        assert!(cache.contains(&1));
        assert_eq!(*cache.get(&1).unwrap(), "second");
        assert_eq!(cache.history_access_count(&1), 0);
        assert_eq!(cache.cache_access_count(&1), 2);
    }

    #[test]
    fn reads_never_advance_admission() {
        let cache: LrukCache<u32, String> = LrukCache::try_with_k(10, 3).unwrap();
        cache.put(1, "v".to_string()).unwrap();
        for _ in 0..10 {
            assert!(cache.get(&1).is_err());
        }
        assert_eq!(cache.history_access_count(&1), 1);

        cache.put(1, "v".to_string()).unwrap();
        cache.put(1, "v".to_string()).unwrap();
        assert!(cache.contains(&1));
    }

    #[test]
    fn size_bound_holds_under_admission_churn() {
        let cache: LrukCache<u32, u32> = LrukCache::try_with_k(4, 2).unwrap();
        for i in 0..200u32 {
            cache.put(i % 16, i).unwrap();
            assert!(cache.len() <= cache.capacity());
        }
    }
}
