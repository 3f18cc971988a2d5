/*!
 * Memory Traits
 * Arena management abstractions
 */

use super::types::*;
use crate::core::types::Size;
use std::ptr::NonNull;

/// Source of the raw blocks underlying regions
///
/// Implementations must hand out blocks that stay at a fixed address until
/// they are released.
pub trait BackingStore: Send + Sync {
    /// Obtain `size` bytes of uninitialized memory
    fn acquire(&self, size: Size) -> MemoryResult<NonNull<u8>>;

    /// Return a block to the store
    ///
    /// # Safety
    /// `block` must come from `acquire(size)` on this same store and must not
    /// have been released already.
    unsafe fn release(&self, block: NonNull<u8>, size: Size);

    /// Which strategy this store implements
    fn kind(&self) -> BackingKind;
}

/// Byte-level allocation contract consumed by typed adapters
pub trait RawArena: Send + Sync {
    /// Allocate `size` bytes, preferring the region that owns `hint`
    fn allocate(&self, size: Size, hint: Option<NonNull<u8>>) -> MemoryResult<NonNull<u8>>;

    /// Release `size` bytes at `ptr`; unknown pointers are ignored
    fn deallocate(&self, ptr: NonNull<u8>, size: Size);

    /// Resize an allocation, moving it when it cannot change in place
    fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        from_size: Size,
        to_size: Size,
        hint: Option<NonNull<u8>>,
    ) -> MemoryResult<Option<NonNull<u8>>>;

    /// Minimum capacity of a freshly created region
    fn default_region_size(&self) -> Size;
}
