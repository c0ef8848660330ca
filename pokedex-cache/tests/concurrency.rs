//! Concurrent stress tests for `ExpiringCache`.

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use bytes::Bytes;
use pokedex_cache::{CacheConfig, ExpiringCache};

const THREADS: usize = 8;
const OPS_PER_THREAD: usize = 2_000;
const KEY_SPACE: usize = 64;

fn key(i: usize) -> String {
    format!("https://pokeapi.co/api/v2/location-area/{}", i % KEY_SPACE)
}

#[test]
fn test_concurrent_add_get_with_reaper_running() {
    // Short TTL and reap period so the reaper races the workers constantly.
    let config = CacheConfig::with_ttl(Duration::from_millis(1)).reap_every(Duration::from_millis(1));
    let cache = Arc::new(ExpiringCache::with_config(config));
    let barrier = Arc::new(Barrier::new(THREADS));

    let workers: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..OPS_PER_THREAD {
                    let k = key(t * 7 + i);
                    if i % 3 == 0 {
                        let payload = Bytes::from(k.clone().into_bytes());
                        cache.add(k, payload);
                    } else if let Some(payload) = cache.get(&k) {
                        // Payload always matches the key it was stored under.
                        assert_eq!(payload.as_ref(), k.as_bytes());
                    }
                }
            })
        })
        .collect();

    for w in workers {
        w.join().expect("worker panicked");
    }

    assert!(cache.len() <= KEY_SPACE);
    let stats = cache.stats();
    assert_eq!(
        stats.hits + stats.misses,
        (THREADS * (OPS_PER_THREAD - OPS_PER_THREAD.div_ceil(3))) as u64
    );

    cache.close();
    assert!(!cache.is_reaping());
}

#[test]
fn test_entries_survive_until_ttl_then_disappear() {
    let ttl = Duration::from_millis(200);
    let cache = ExpiringCache::new(ttl);
    cache.add("a", vec![1u8, 2, 3]);

    thread::sleep(ttl / 4);
    assert_eq!(cache.get("a").as_deref(), Some(&[1u8, 2, 3][..]));

    // Upper bound is ttl + reap interval; leave headroom for a busy scheduler.
    thread::sleep(ttl * 2 + Duration::from_millis(100));
    assert!(cache.get("a").is_none());
    assert!(cache.stats().reaped >= 1);
}

#[test]
fn test_example_scenario() {
    let cache = ExpiringCache::new(Duration::from_millis(5));
    cache.add("a", vec![1u8, 2, 3]);
    assert_eq!(cache.get("a").as_deref(), Some(&[1u8, 2, 3][..]));

    thread::sleep(Duration::from_millis(25));
    assert!(cache.get("a").is_none());
}

#[test]
fn test_drop_joins_reaper_without_hanging() {
    for _ in 0..50 {
        let cache = ExpiringCache::new(Duration::from_secs(3600));
        cache.add("k", Bytes::from_static(b"v"));
        drop(cache);
    }
}

#[test]
fn test_close_while_other_threads_use_cache() {
    let cache = Arc::new(ExpiringCache::new(Duration::from_millis(1)));
    let user = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for i in 0..1_000 {
                cache.add(key(i), Bytes::from_static(b"v"));
                let _ = cache.get(&key(i + 1));
            }
        })
    };

    cache.close();
    user.join().expect("user thread panicked");
    assert!(!cache.is_reaping());
}
