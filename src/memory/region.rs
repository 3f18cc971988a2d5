/*!
 * Region
 * One contiguous backing block with a bump watermark and a live-allocation count
 */

use super::types::RegionStats;
use crate::core::types::{Address, RegionId, Size};
use std::ptr::NonNull;

/// A fixed-capacity block carved by bumping `used`
///
/// Every grant lies inside `[data, top)`. The region never checks its own
/// bounds: callers keep `used` within `[0, capacity]`.
#[derive(Debug)]
pub struct Region {
    base: NonNull<u8>,
    capacity: Size,
    used: Size,
    refs: usize,
}

// SAFETY: a region is only read or mutated while its arena's lock is held, and
// the block it points to is owned exclusively by the registry.
unsafe impl Send for Region {}

impl Region {
    pub(crate) fn new(base: NonNull<u8>, capacity: Size) -> Self {
        Self {
            base,
            capacity,
            used: 0,
            refs: 0,
        }
    }

    #[inline]
    pub(crate) fn base(&self) -> NonNull<u8> {
        self.base
    }

    /// Start of the block
    #[inline]
    pub fn data(&self) -> Address {
        self.base.as_ptr() as Address
    }

    /// Current watermark
    #[inline]
    pub fn top(&self) -> Address {
        self.data() + self.used
    }

    /// One past the last usable byte
    #[inline]
    pub fn end(&self) -> Address {
        self.data() + self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> Size {
        self.capacity
    }

    #[inline]
    pub fn used(&self) -> Size {
        self.used
    }

    /// Bytes left above the watermark
    #[inline]
    pub fn free(&self) -> Size {
        self.capacity - self.used
    }

    #[inline]
    pub fn ref_count(&self) -> usize {
        self.refs
    }

    /// Whether `addr` lies in the used part of the block
    #[inline]
    pub fn contains(&self, addr: Address) -> bool {
        addr >= self.data() && addr < self.top()
    }

    /// Whether strictly more than `n` bytes remain above the watermark
    #[inline]
    pub fn has_room_for(&self, n: Size) -> bool {
        self.free() > n
    }

    /// Move the watermark by `delta` bytes in either direction
    #[inline]
    pub(crate) fn grow_or_shrink(&mut self, delta: isize) {
        let used = self.used as isize + delta;
        debug_assert!(
            used >= 0 && used as usize <= self.capacity,
            "watermark {} outside [0, {}]",
            used,
            self.capacity
        );
        self.used = used as usize;
    }

    #[inline]
    pub(crate) fn reset(&mut self) {
        debug_assert!(self.is_idle(), "reset of a region with live allocations");
        self.used = 0;
    }

    #[inline]
    pub(crate) fn incref(&mut self) {
        self.refs += 1;
    }

    #[inline]
    pub(crate) fn decref(&mut self) {
        debug_assert!(self.refs > 0, "decref of an idle region");
        self.refs = self.refs.saturating_sub(1);
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.refs == 0
    }

    pub fn stats(&self, id: RegionId) -> RegionStats {
        RegionStats {
            id,
            capacity: self.capacity,
            used: self.used,
            live_allocations: self.refs,
        }
    }
}
