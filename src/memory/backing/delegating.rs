/*!
 * Delegating Backing Store
 * Regions carved from the general-purpose allocator
 */

use crate::core::limits::REGION_ALIGN;
use crate::core::types::Size;
use crate::memory::traits::BackingStore;
use crate::memory::types::{BackingKind, MemoryError, MemoryResult};
use std::alloc::{self, Layout};
use std::ptr::NonNull;
use tracing::error;

/// Backing store that forwards every block request to the global allocator
#[derive(Debug, Default, Clone, Copy)]
pub struct DelegatingBacking;

impl DelegatingBacking {
    pub const fn new() -> Self {
        Self
    }

    // Zero-sized layouts are not allowed by the allocator API
    fn layout(size: Size) -> MemoryResult<Layout> {
        Layout::from_size_align(size.max(1), REGION_ALIGN).map_err(|_| {
            MemoryError::BackingExhausted {
                requested: size,
                backing: BackingKind::Delegating,
            }
        })
    }
}

impl BackingStore for DelegatingBacking {
    fn acquire(&self, size: Size) -> MemoryResult<NonNull<u8>> {
        let layout = Self::layout(size)?;
        // SAFETY: layout has a non-zero size
        let block = unsafe { alloc::alloc(layout) };
        NonNull::new(block).ok_or_else(|| {
            error!(requested = size, "General-purpose allocator refused region block");
            MemoryError::BackingExhausted {
                requested: size,
                backing: BackingKind::Delegating,
            }
        })
    }

    unsafe fn release(&self, block: NonNull<u8>, size: Size) {
        // acquire() already validated this layout for the same size
        if let Ok(layout) = Self::layout(size) {
            alloc::dealloc(block.as_ptr(), layout);
        }
    }

    fn kind(&self) -> BackingKind {
        BackingKind::Delegating
    }
}
