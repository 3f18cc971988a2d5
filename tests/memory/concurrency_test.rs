/*!
 * Concurrency Tests
 * Many threads sharing one arena must never receive overlapping grants
 */

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use region_arena::Arena;
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const ROUNDS: usize = 2_000;

#[test]
fn test_concurrent_grants_keep_their_contents() {
    let arena = Arc::new(Arena::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|worker| {
            let arena = Arc::clone(&arena);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(worker as u64);
                let tag = worker as u8 + 1;
                let mut live = Vec::new();

                for _ in 0..ROUNDS {
                    let size = rng.gen_range(1..512);
                    let ptr = arena.allocate(size, None).unwrap();
                    unsafe { std::ptr::write_bytes(ptr.as_ptr(), tag, size) };
                    live.push((ptr.as_ptr() as usize, size));

                    if rng.gen_bool(0.4) {
                        let idx = rng.gen_range(0..live.len());
                        let (addr, size) = live.swap_remove(idx);
                        let bytes = unsafe { std::slice::from_raw_parts(addr as *const u8, size) };
                        assert!(bytes.iter().all(|&b| b == tag), "grant overwritten by another thread");
                        arena.deallocate(std::ptr::NonNull::new(addr as *mut u8).unwrap(), size);
                    }
                }

                for (addr, size) in live {
                    let bytes = unsafe { std::slice::from_raw_parts(addr as *const u8, size) };
                    assert!(bytes.iter().all(|&b| b == tag), "grant overwritten by another thread");
                    arena.deallocate(std::ptr::NonNull::new(addr as *mut u8).unwrap(), size);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let stats = arena.stats();
    assert_eq!(stats.live_allocations, 0);
    assert_eq!(stats.used_bytes, 0);
    assert_eq!(stats.foreign_frees, 0);
}

#[test]
fn test_concurrent_reallocation_preserves_prefix() {
    let arena = Arc::new(Arena::new());

    let handles: Vec<_> = (0..THREADS)
        .map(|worker| {
            let arena = Arc::clone(&arena);
            thread::spawn(move || {
                let tag = 0xA0 | worker as u8;
                let mut size = 8;
                let mut ptr = arena.allocate(size, None).unwrap();
                unsafe { std::ptr::write_bytes(ptr.as_ptr(), tag, size) };

                while size < 16 * 1024 {
                    let next = size * 2;
                    ptr = arena
                        .reallocate(Some(ptr), size, next, Some(ptr))
                        .unwrap()
                        .unwrap();
                    let prefix = unsafe { std::slice::from_raw_parts(ptr.as_ptr(), size) };
                    assert!(prefix.iter().all(|&b| b == tag));
                    unsafe { std::ptr::write_bytes(ptr.as_ptr().add(size), tag, next - size) };
                    size = next;
                }
                arena.deallocate(ptr, size);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(arena.stats().live_allocations, 0);
}
