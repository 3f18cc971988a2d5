/*!
 * Arena Allocator Implementation
 * Allocation, deallocation and reallocation logic
 */

use super::Arena;
use crate::core::types::{Address, Allocation, RegionId, Size};
use crate::memory::registry::RegionRegistry;
use crate::memory::types::{MemoryError, MemoryResult};
use std::ptr::NonNull;
use std::sync::atomic::Ordering;
use tracing::{trace, warn};

impl Arena {
    /// Allocate `size` uninitialized bytes
    ///
    /// When `hint` points into a region with room, the grant lands in that
    /// region.
    pub fn allocate(&self, size: Size, hint: Option<NonNull<u8>>) -> MemoryResult<NonNull<u8>> {
        let mut registry = self.registry.lock();
        let granted = allocate_in(&mut registry, size, hint.map(address_of));
        let granted = self.check_backing(granted)?;
        Ok(pointer_to(&registry, granted))
    }

    /// Release `size` bytes at `ptr`
    ///
    /// Pointers outside every region are ignored.
    pub fn deallocate(&self, ptr: NonNull<u8>, size: Size) {
        let mut registry = self.registry.lock();
        if deallocate_in(&mut registry, address_of(ptr), size).is_none() {
            self.foreign_frees.fetch_add(1, Ordering::Relaxed);
            warn!(
                address = address_of(ptr),
                size, "Ignored deallocation of pointer outside every region"
            );
        }
    }

    /// Resize the allocation at `ptr` from `from_size` to `to_size` bytes
    ///
    /// - `None` pointer: plain allocation of `to_size`
    /// - `to_size == 0`: deallocation, returns `Ok(None)`
    /// - tail allocation with room: resized in place
    /// - shrinking elsewhere: same pointer, the spare bytes stay reserved
    /// - otherwise: moved, the first `from_size` bytes are copied
    ///
    /// The returned pointer replaces `ptr` even when the two are equal.
    pub fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        from_size: Size,
        to_size: Size,
        hint: Option<NonNull<u8>>,
    ) -> MemoryResult<Option<NonNull<u8>>> {
        let mut registry = self.registry.lock();
        let resized = reallocate_in(&mut registry, ptr, from_size, to_size, hint.map(address_of));
        let resized = self.check_backing(resized)?;
        Ok(resized.map(|granted| pointer_to(&registry, granted)))
    }
}

#[inline]
fn address_of(ptr: NonNull<u8>) -> Address {
    ptr.as_ptr() as Address
}

#[inline]
fn pointer_to(registry: &RegionRegistry, granted: Allocation) -> NonNull<u8> {
    let base = registry.region(granted.region).base();
    // SAFETY: grants start below the region's capacity, so the result stays
    // inside the block and cannot be null.
    unsafe { NonNull::new_unchecked(base.as_ptr().add(granted.offset)) }
}

fn allocate_in(
    registry: &mut RegionRegistry,
    size: Size,
    hint: Option<Address>,
) -> MemoryResult<Allocation> {
    let id = match registry.find_fitting(size, hint) {
        Some(id) => id,
        None => registry.create_region(size)?,
    };

    let region = registry.region_mut(id);
    let offset = region.used();
    region.grow_or_shrink(size as isize);
    region.incref();

    trace!(region = id.index(), offset, size, "Allocated");
    Ok(Allocation::new(id, offset))
}

fn deallocate_in(registry: &mut RegionRegistry, addr: Address, size: Size) -> Option<RegionId> {
    let id = registry.find_containing(addr)?;
    let region = registry.region_mut(id);

    region.decref();
    if region.is_idle() {
        region.reset();
        trace!(region = id.index(), "Region idle, watermark reset");
    } else if region.top().checked_sub(size) == Some(addr) {
        region.grow_or_shrink(-(size as isize));
        trace!(region = id.index(), size, "Reclaimed tail allocation");
    }
    Some(id)
}

fn reallocate_in(
    registry: &mut RegionRegistry,
    ptr: Option<NonNull<u8>>,
    from_size: Size,
    to_size: Size,
    hint: Option<Address>,
) -> MemoryResult<Option<Allocation>> {
    let Some(ptr) = ptr else {
        return allocate_in(registry, to_size, hint).map(Some);
    };
    let addr = address_of(ptr);
    let id = registry
        .find_containing(addr)
        .ok_or(MemoryError::ForeignPointer(addr))?;

    if to_size == 0 {
        deallocate_in(registry, addr, from_size);
        return Ok(None);
    }

    let region = registry.region_mut(id);
    let current = Allocation::new(id, addr - region.data());
    let is_tail = region.top().checked_sub(from_size) == Some(addr);
    let fits = to_size <= from_size || region.has_room_for(to_size - from_size);

    if is_tail && fits {
        region.grow_or_shrink(to_size as isize - from_size as isize);
        trace!(region = id.index(), from_size, to_size, "Resized tail in place");
        return Ok(Some(current));
    }
    if to_size <= from_size {
        return Ok(Some(current));
    }

    let moved = allocate_in(registry, to_size, hint)?;
    let dst = pointer_to(registry, moved);
    // SAFETY: the source holds `from_size` live bytes, the destination is a
    // fresh grant of `to_size > from_size` bytes above every live range, so
    // the two cannot overlap.
    unsafe { std::ptr::copy_nonoverlapping(ptr.as_ptr(), dst.as_ptr(), from_size.min(to_size)) };
    deallocate_in(registry, addr, from_size);

    trace!(
        from_region = id.index(),
        to_region = moved.region.index(),
        from_size,
        to_size,
        "Moved allocation"
    );
    Ok(Some(moved))
}
