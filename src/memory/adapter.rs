/*!
 * Typed Arena Adapter
 *
 * Element-count front end over the process-wide arena. Counts become byte
 * sizes rounded up to `ADAPTER_GRANULE`, zero counts and null pointers are
 * no-ops, and every instance is interchangeable with every other.
 */

use super::global;
use super::types::{MemoryError, MemoryResult};
use crate::core::limits::ADAPTER_GRANULE;
use crate::core::types::Size;
use std::marker::PhantomData;
use std::mem::{align_of, size_of};
use std::ptr::NonNull;

/// Stateless handle allocating arrays of `T` from the global arena
pub struct ArenaAllocator<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> ArenaAllocator<T> {
    const ALIGN_OK: () = assert!(
        align_of::<T>() <= ADAPTER_GRANULE,
        "element alignment exceeds the arena granule"
    );

    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// Byte size of `count` elements, rounded up to the granule
    fn bytes(count: usize) -> MemoryResult<Size> {
        let overflow = || MemoryError::SizeOverflow {
            count,
            elem_size: size_of::<T>(),
        };
        let raw = count.checked_mul(size_of::<T>()).ok_or_else(overflow)?;
        raw.checked_next_multiple_of(ADAPTER_GRANULE)
            .ok_or_else(overflow)
    }

    fn check_alignment(ptr: NonNull<u8>) -> MemoryResult<NonNull<T>> {
        let address = ptr.as_ptr() as usize;
        if address % align_of::<T>() != 0 {
            return Err(MemoryError::Misaligned {
                address,
                alignment: align_of::<T>(),
            });
        }
        Ok(ptr.cast())
    }

    /// Storage for `count` uninitialized elements
    ///
    /// Returns `Ok(None)` when `count` is zero. Zero-sized types get a
    /// dangling pointer and never touch the arena.
    pub fn allocate(&self, count: usize, hint: Option<NonNull<T>>) -> MemoryResult<Option<NonNull<T>>> {
        let () = Self::ALIGN_OK;
        if count == 0 {
            return Ok(None);
        }
        if size_of::<T>() == 0 {
            return Ok(Some(NonNull::dangling()));
        }

        let size = Self::bytes(count)?;
        let ptr = global::allocate(size, hint.map(NonNull::cast))?;
        Self::check_alignment(ptr).map(Some).inspect_err(|_| {
            global::deallocate(ptr, size);
        })
    }

    /// Release storage for `count` elements; `None` and zero counts are no-ops
    pub fn deallocate(&self, ptr: Option<NonNull<T>>, count: usize) {
        let Some(ptr) = ptr else { return };
        if count == 0 || size_of::<T>() == 0 {
            return;
        }
        if let Ok(size) = Self::bytes(count) {
            global::deallocate(ptr.cast(), size);
        }
    }

    /// Resize storage from `from_count` to `to_count` elements
    ///
    /// The first `min(from_count, to_count)` elements are preserved. The
    /// returned pointer replaces `ptr`, even when the two are equal.
    pub fn reallocate(
        &self,
        ptr: Option<NonNull<T>>,
        from_count: usize,
        to_count: usize,
        hint: Option<NonNull<T>>,
    ) -> MemoryResult<Option<NonNull<T>>> {
        let () = Self::ALIGN_OK;
        if size_of::<T>() == 0 {
            return Ok((to_count > 0).then(NonNull::dangling));
        }
        let ptr = match ptr {
            Some(ptr) if from_count > 0 => ptr,
            _ => return self.allocate(to_count, hint),
        };

        let resized = global::reallocate(
            Some(ptr.cast()),
            Self::bytes(from_count)?,
            Self::bytes(to_count)?,
            hint.map(NonNull::cast),
        )?;
        let resized = resized.map(NonNull::cast::<T>);
        debug_assert!(resized.map_or(true, |p| p.as_ptr() as usize % align_of::<T>() == 0));
        Ok(resized)
    }

    /// Minimum capacity of a region, in bytes
    pub fn default_region_size(&self) -> Size {
        global::default_region_size()
    }
}

impl<T> Clone for ArenaAllocator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArenaAllocator<T> {}

impl<T> Default for ArenaAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PartialEq for ArenaAllocator<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> Eq for ArenaAllocator<T> {}

impl<T> std::fmt::Debug for ArenaAllocator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArenaAllocator")
            .field("element", &std::any::type_name::<T>())
            .finish()
    }
}
