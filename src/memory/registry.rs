/*!
 * Region Registry
 *
 * Append-only, creation-ordered collection of regions owned by one arena.
 *
 * ## Lookup Cost
 *
 * Both lookups are linear scans. Regions are few relative to allocations, so
 * O(regions) search is dominated by the O(1) bump inside a region and no
 * size-indexed structure is kept across regions.
 *
 * ## Lifetime
 *
 * Regions are never removed or returned to the backing store while the
 * registry lives; an idle region is recycled in place. Dropping the registry
 * releases every block exactly once, whatever its reference count.
 */

use super::region::Region;
use super::traits::BackingStore;
use super::types::{BackingKind, MemoryResult, RegionStats};
use crate::core::types::{Address, RegionId, Size};
use tracing::debug;

pub struct RegionRegistry {
    regions: Vec<Region>,
    backing: Box<dyn BackingStore>,
    default_region_size: Size,
}

impl RegionRegistry {
    pub fn new(backing: Box<dyn BackingStore>, default_region_size: Size) -> Self {
        Self::with_slots(backing, default_region_size, 0)
    }

    pub fn with_slots(
        backing: Box<dyn BackingStore>,
        default_region_size: Size,
        slots: usize,
    ) -> Self {
        Self {
            regions: Vec::with_capacity(slots),
            backing,
            default_region_size,
        }
    }

    /// Region whose used range `[data, top)` contains `addr`
    pub fn find_containing(&self, addr: Address) -> Option<RegionId> {
        self.regions
            .iter()
            .position(|region| region.contains(addr))
            .map(RegionId)
    }

    /// Region with strictly more than `n` free tail bytes
    ///
    /// The region owning `hint` wins when it has room; otherwise the first
    /// region in creation order that has room.
    pub fn find_fitting(&self, n: Size, hint: Option<Address>) -> Option<RegionId> {
        if let Some(id) = hint.and_then(|addr| self.find_containing(addr)) {
            if self.regions[id.0].has_room_for(n) {
                return Some(id);
            }
        }

        self.regions
            .iter()
            .position(|region| region.has_room_for(n))
            .map(RegionId)
    }

    /// Acquire a new region of `max(default_region_size, min_capacity)` bytes
    pub fn create_region(&mut self, min_capacity: Size) -> MemoryResult<RegionId> {
        let capacity = self.default_region_size.max(min_capacity);
        let base = self.backing.acquire(capacity)?;

        let id = RegionId(self.regions.len());
        self.regions.push(Region::new(base, capacity));

        debug!(
            region = id.0,
            capacity,
            address = base.as_ptr() as usize,
            backing = %self.backing.kind(),
            "Created region"
        );
        Ok(id)
    }

    #[inline]
    pub fn region(&self, id: RegionId) -> &Region {
        &self.regions[id.0]
    }

    #[inline]
    pub fn region_mut(&mut self, id: RegionId) -> &mut Region {
        &mut self.regions[id.0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &Region)> {
        self.regions
            .iter()
            .enumerate()
            .map(|(idx, region)| (RegionId(idx), region))
    }

    pub fn default_region_size(&self) -> Size {
        self.default_region_size
    }

    pub fn backing_kind(&self) -> BackingKind {
        self.backing.kind()
    }

    pub fn stats(&self) -> Vec<RegionStats> {
        self.iter().map(|(id, region)| region.stats(id)).collect()
    }
}

impl Drop for RegionRegistry {
    fn drop(&mut self) {
        let backing = self.backing.kind();
        for (idx, region) in self.regions.drain(..).enumerate() {
            debug!(
                region = idx,
                capacity = region.capacity(),
                live_allocations = region.ref_count(),
                %backing,
                "Releasing region"
            );
            // SAFETY: each region's block came from this store with this
            // capacity, and draining guarantees it is released only once.
            unsafe { self.backing.release(region.base(), region.capacity()) };
        }
    }
}

impl std::fmt::Debug for RegionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionRegistry")
            .field("backing", &self.backing.kind())
            .field("default_region_size", &self.default_region_size)
            .field("regions", &self.regions)
            .finish()
    }
}
