/*!
 * Reclamation Tests
 * Tail frees, idle-region resets and the holes that are never reused
 */

use pretty_assertions::assert_eq;
use region_arena::Arena;

#[test]
fn test_stack_like_frees_return_every_byte() {
    let arena = Arena::new();
    let sizes = [24usize, 48, 8, 120, 64];

    let ptrs: Vec<_> = sizes
        .iter()
        .map(|&size| arena.allocate(size, None).unwrap())
        .collect();
    assert_eq!(arena.stats().used_bytes, sizes.iter().sum::<usize>());

    for (&ptr, &size) in ptrs.iter().zip(sizes.iter()).skip(1).rev() {
        arena.deallocate(ptr, size);
    }
    // Only the first grant is still live
    assert_eq!(arena.stats().used_bytes, 24);
    assert_eq!(arena.stats().live_allocations, 1);
}

#[test]
fn test_interior_holes_persist_until_region_idles() {
    let arena = Arena::new();
    let a = arena.allocate(100, None).unwrap();
    let b = arena.allocate(100, None).unwrap();
    let c = arena.allocate(100, None).unwrap();

    arena.deallocate(b, 100);
    assert_eq!(arena.stats().used_bytes, 300);

    arena.deallocate(a, 100);
    assert_eq!(arena.stats().used_bytes, 300);

    arena.deallocate(c, 100);
    let stats = arena.stats();
    assert_eq!(stats.used_bytes, 0);
    assert_eq!(stats.idle_regions, 1);

    let reused = arena.allocate(300, None).unwrap();
    assert_eq!(reused, a);
}

#[test]
fn test_out_of_order_tail_free_only_reclaims_true_tail() {
    let arena = Arena::new();
    let a = arena.allocate(32, None).unwrap();
    let b = arena.allocate(32, None).unwrap();
    let _c = arena.allocate(32, None).unwrap();

    // b is not the tail while c is live
    arena.deallocate(b, 32);
    assert_eq!(arena.stats().used_bytes, 96);

    arena.deallocate(a, 32);
    assert_eq!(arena.stats().used_bytes, 96);
    assert_eq!(arena.stats().live_allocations, 1);
}

#[test]
fn test_each_region_reclaims_independently() {
    let arena = Arena::new();
    let first = arena.allocate(4000, None).unwrap();
    let second = arena.allocate(4000, None).unwrap();
    assert_eq!(arena.region_count(), 2);

    arena.deallocate(first, 4000);
    let stats = arena.stats();
    assert_eq!(stats.regions[0].used, 0);
    assert_eq!(stats.regions[1].used, 4000);

    // The idle first region is found before creating a third one
    let third = arena.allocate(2000, None).unwrap();
    assert_eq!(third, first);
    assert_eq!(arena.region_count(), 2);
    arena.deallocate(second, 4000);
}

#[test]
fn test_double_free_never_corrupts_counts() {
    let arena = Arena::new();
    let a = arena.allocate(16, None).unwrap();
    let _b = arena.allocate(16, None).unwrap();

    arena.deallocate(a, 16);
    let stats = arena.stats();
    assert_eq!(stats.live_allocations, 1);

    // The first free lowers the watermark below c, so the second one is
    // treated as a foreign pointer
    let c = arena.allocate(8, None).unwrap();
    arena.deallocate(c, 8);
    arena.deallocate(c, 8);
    assert_eq!(arena.stats().foreign_frees, 1);
}
