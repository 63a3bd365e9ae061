// ==============================================
// BYTE-LFU CONCURRENCY TESTS (integration)
// ==============================================
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use strcache::{ByteLfuBuilder, ByteLfuCache};

const THREADS: usize = 8;
const OPS_PER_THREAD: usize = 500;

#[test]
fn mixed_operations_keep_accounting_consistent() {
    let cache = ByteLfuCache::new(2048);
    let barrier = Arc::new(Barrier::new(THREADS));
    let hits = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|thread_id| {
            let cache = cache.clone();
            let barrier = Arc::clone(&barrier);
            let hits = Arc::clone(&hits);

            thread::spawn(move || {
                barrier.wait();
                for i in 0..OPS_PER_THREAD {
                    let key = format!("key_{}", (thread_id * 31 + i) % 128);
                    match i % 5 {
                        0 | 1 => {
                            let value = vec![thread_id as u8; 1 + i % 48];
                            cache.set(&key, value).unwrap();
                        },
                        2 | 3 => {
                            if cache.get(&key).is_ok() {
                                hits.fetch_add(1, Ordering::Relaxed);
                            }
                        },
                        _ => {
                            let _ = cache.del(&key);
                        },
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    cache.check_invariants().unwrap();
    assert!(cache.size() <= cache.capacity());
    assert!(hits.load(Ordering::Relaxed) > 0);
}

#[test]
fn concurrent_reads_count_every_access() {
    let cache = ByteLfuBuilder::new(64).seed(3).build();
    cache.set("hot", "value").unwrap();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = cache.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..OPS_PER_THREAD {
                    assert_eq!(&*cache.get("hot").unwrap(), b"value");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let expected = 1 + (THREADS * OPS_PER_THREAD) as i64;
    assert_eq!(cache.frequency("hot"), Some(expected));
    cache.check_invariants().unwrap();
}

#[test]
fn writers_never_exceed_capacity() {
    let cache = ByteLfuCache::new(100);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|thread_id| {
            let cache = cache.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..OPS_PER_THREAD {
                    let key = format!("t{}_{}", thread_id, i);
                    cache.set(&key, [b'x'; 10]).unwrap();
                    assert!(cache.size() <= 100);
                    // Oversized values are rejected without side effects.
                    assert!(cache.set(&key, [b'y'; 101]).unwrap_err().is_no_space());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    cache.check_invariants().unwrap();
    assert_eq!(cache.size(), 100);
    assert_eq!(cache.len(), 10);
}
