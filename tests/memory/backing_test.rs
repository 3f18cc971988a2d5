/*!
 * Backing Store Tests
 * Single release at teardown, injected stores and exhaustion reporting
 */

use pretty_assertions::assert_eq;
use region_arena::memory::backing::{self, DelegatingBacking};
use region_arena::{
    Arena, ArenaConfig, BackingKind, BackingStore, MemoryError, MemoryResult, OomPolicy,
};
use std::collections::HashMap;
use std::ptr::NonNull;
use std::sync::{Arc, Mutex};

/// Records every block it hands out and how often each is released
#[derive(Clone, Default)]
struct CountingBacking {
    inner: DelegatingBacking,
    ledger: Arc<Mutex<Ledger>>,
    limit: Option<usize>,
}

#[derive(Default)]
struct Ledger {
    acquired: Vec<(usize, usize)>,
    released: HashMap<usize, usize>,
}

impl CountingBacking {
    fn limited(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }
}

impl BackingStore for CountingBacking {
    fn acquire(&self, size: usize) -> MemoryResult<NonNull<u8>> {
        let mut ledger = self.ledger.lock().unwrap();
        if self.limit.is_some_and(|limit| ledger.acquired.len() >= limit) {
            return Err(MemoryError::BackingExhausted {
                requested: size,
                backing: self.kind(),
            });
        }
        let block = self.inner.acquire(size)?;
        ledger.acquired.push((block.as_ptr() as usize, size));
        Ok(block)
    }

    unsafe fn release(&self, block: NonNull<u8>, size: usize) {
        *self
            .ledger
            .lock()
            .unwrap()
            .released
            .entry(block.as_ptr() as usize)
            .or_default() += 1;
        self.inner.release(block, size);
    }

    fn kind(&self) -> BackingKind {
        BackingKind::Delegating
    }
}

#[test]
fn test_every_region_released_exactly_once_at_drop() {
    let store = CountingBacking::default();
    let ledger = Arc::clone(&store.ledger);
    let arena = Arena::with_backing(Box::new(store), ArenaConfig::default());

    let a = arena.allocate(3000, None).unwrap();
    let b = arena.allocate(3000, None).unwrap();
    let _c = arena.allocate(9000, None).unwrap();
    arena.deallocate(a, 3000);
    arena.deallocate(b, 3000);
    let _d = arena.allocate(100, None).unwrap();

    assert_eq!(ledger.lock().unwrap().acquired.len(), 3);
    assert!(ledger.lock().unwrap().released.is_empty());

    // Live allocations do not delay teardown
    drop(arena);

    let ledger = ledger.lock().unwrap();
    assert_eq!(ledger.released.len(), 3);
    for (address, _) in &ledger.acquired {
        assert_eq!(ledger.released.get(address), Some(&1));
    }
}

#[test]
fn test_regions_sized_to_default_or_request() {
    let store = CountingBacking::default();
    let ledger = Arc::clone(&store.ledger);
    let arena = Arena::with_backing(Box::new(store), ArenaConfig::default().with_region_size(1024));

    arena.allocate(10, None).unwrap();
    arena.allocate(5000, None).unwrap();

    let sizes: Vec<usize> = ledger.lock().unwrap().acquired.iter().map(|&(_, s)| s).collect();
    assert_eq!(sizes, vec![1024, 5000]);
}

#[test]
fn test_exhaustion_reported_under_report_policy() {
    let config = ArenaConfig::default().with_oom_policy(OomPolicy::Report);
    let arena = Arena::with_backing(Box::new(CountingBacking::limited(1)), config);

    let first = arena.allocate(4000, None).unwrap();
    let err = arena.allocate(4000, None).unwrap_err();
    assert_eq!(
        err,
        MemoryError::BackingExhausted {
            requested: 4096,
            backing: BackingKind::Delegating,
        }
    );

    // Failed growth leaves the original allocation untouched
    let err = arena.reallocate(Some(first), 4000, 8000, None).unwrap_err();
    assert!(matches!(err, MemoryError::BackingExhausted { .. }));
    assert_eq!(arena.locate(first).unwrap().offset, 0);
    assert_eq!(arena.stats().live_allocations, 1);
}

#[test]
fn test_injected_store_kind_wins_over_config() {
    let arena = Arena::with_backing(Box::new(CountingBacking::default()), ArenaConfig::direct());
    assert_eq!(arena.backing_kind(), BackingKind::Delegating);
    assert_eq!(arena.stats().backing, BackingKind::Delegating);
}

#[test]
fn test_both_variants_behave_identically() {
    let mut traces = Vec::new();
    for kind in [BackingKind::Delegating, BackingKind::Direct] {
        if !backing::is_supported(kind) {
            continue;
        }
        let arena = Arena::with_config(ArenaConfig::default().with_backing(kind)).unwrap();
        let mut offsets = Vec::new();
        let mut live = Vec::new();
        for size in [100usize, 2000, 1500, 700, 3000, 40] {
            let ptr = arena.allocate(size, live.last().copied()).unwrap();
            let placed = arena.locate(ptr).unwrap();
            offsets.push((placed.region.index(), placed.offset));
            live.push(ptr);
        }
        traces.push(offsets);
    }
    if traces.len() == 2 {
        assert_eq!(traces[0], traces[1]);
    }
}
