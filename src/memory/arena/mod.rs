/*!
 * Region Arena
 *
 * Bump allocation over a registry of reference-counted regions.
 *
 * ## Allocation
 *
 * - A request goes to the hint's region when it has room, else to the first
 *   region with room, else to a new region of `max(default, request)` bytes
 * - The grant starts at the region's watermark, which then moves up
 *
 * ## Reclamation
 *
 * - **Idle regions**: when a region's last allocation is freed its watermark
 *   drops to 0 and the whole block is reused
 * - **Tail frees**: freeing the allocation just below the watermark lowers it
 * - Interior holes are never reused individually
 *
 * ## Concurrency
 *
 * One `parking_lot::Mutex` per arena serializes every operation end to end.
 * Each `Arena` owns its registry, so independent instances never contend.
 */

mod allocator;

use super::backing::{self, DelegatingBacking};
use super::config::{ArenaConfig, OomPolicy};
use super::registry::RegionRegistry;
use super::traits::{BackingStore, RawArena};
use super::types::{ArenaStats, BackingKind, MemoryError, MemoryResult};
use crate::core::types::{Allocation, Size};
use parking_lot::Mutex;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{error, info};

/// Region-based bump arena
pub struct Arena {
    registry: Mutex<RegionRegistry>,
    config: ArenaConfig,
    foreign_frees: AtomicU64,
}

impl Arena {
    /// Arena with the default configuration
    pub fn new() -> Self {
        let config = ArenaConfig::default();
        Self::with_backing(Box::new(DelegatingBacking::new()), config)
    }

    /// Arena with the backing store named by `config.backing`
    pub fn with_config(config: ArenaConfig) -> MemoryResult<Self> {
        config.validate()?;
        let store = backing::for_kind(config.backing)?;
        Ok(Self::with_backing(store, config))
    }

    /// Arena over a caller-supplied backing store
    ///
    /// `config.backing` is replaced by the store's own kind.
    pub fn with_backing(store: Box<dyn BackingStore>, mut config: ArenaConfig) -> Self {
        config.backing = store.kind();
        info!(
            backing = %config.backing,
            default_region_size = config.default_region_size,
            oom_policy = ?config.oom_policy,
            "Region arena initialized"
        );
        Self {
            registry: Mutex::new(RegionRegistry::with_slots(
                store,
                config.default_region_size,
                config.initial_region_slots,
            )),
            config,
            foreign_frees: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn backing_kind(&self) -> BackingKind {
        self.config.backing
    }

    /// Minimum capacity of a freshly created region
    pub fn default_region_size(&self) -> Size {
        self.config.default_region_size
    }

    pub fn region_count(&self) -> usize {
        self.registry.lock().len()
    }

    /// Region and offset of the live grant containing `ptr`
    pub fn locate(&self, ptr: NonNull<u8>) -> Option<Allocation> {
        let addr = ptr.as_ptr() as usize;
        let registry = self.registry.lock();
        registry.find_containing(addr).map(|id| {
            let offset = addr - registry.region(id).data();
            Allocation::new(id, offset)
        })
    }

    /// Snapshot of every region
    pub fn stats(&self) -> ArenaStats {
        let registry = self.registry.lock();
        let regions = registry.stats();

        ArenaStats {
            backing: registry.backing_kind(),
            default_region_size: registry.default_region_size(),
            region_count: regions.len(),
            total_capacity: regions.iter().map(|r| r.capacity).sum(),
            used_bytes: regions.iter().map(|r| r.used).sum(),
            live_allocations: regions.iter().map(|r| r.live_allocations).sum(),
            idle_regions: regions.iter().filter(|r| r.live_allocations == 0).count(),
            foreign_frees: self.foreign_frees.load(Ordering::Relaxed),
            regions,
        }
    }

    // Apply the configured policy to a failed backing request
    fn check_backing<T>(&self, result: MemoryResult<T>) -> MemoryResult<T> {
        match result {
            Err(err @ MemoryError::BackingExhausted { .. })
                if self.config.oom_policy == OomPolicy::Abort =>
            {
                error!(error = %err, "Arena memory exhausted, aborting");
                std::process::abort();
            }
            other => other,
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("config", &self.config)
            .field("regions", &self.region_count())
            .finish()
    }
}

impl RawArena for Arena {
    fn allocate(&self, size: Size, hint: Option<NonNull<u8>>) -> MemoryResult<NonNull<u8>> {
        Arena::allocate(self, size, hint)
    }

    fn deallocate(&self, ptr: NonNull<u8>, size: Size) {
        Arena::deallocate(self, ptr, size)
    }

    fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        from_size: Size,
        to_size: Size,
        hint: Option<NonNull<u8>>,
    ) -> MemoryResult<Option<NonNull<u8>>> {
        Arena::reallocate(self, ptr, from_size, to_size, hint)
    }

    fn default_region_size(&self) -> Size {
        Arena::default_region_size(self)
    }
}
