/*!
 * Direct Backing Store
 * Regions mapped as anonymous private pages
 */

use crate::core::types::Size;
use crate::memory::traits::BackingStore;
use crate::memory::types::{BackingKind, MemoryError, MemoryResult};
use nix::sys::mman::{mmap_anonymous, munmap, MapFlags, ProtFlags};
use std::num::NonZeroUsize;
use std::ptr::NonNull;
use tracing::{error, warn};

/// Backing store that requests pages from the OS with `mmap(2)`
///
/// The kernel rounds each mapping up to whole pages; the region only ever
/// uses the size it asked for.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectBacking;

impl DirectBacking {
    pub const fn new() -> Self {
        Self
    }
}

impl BackingStore for DirectBacking {
    fn acquire(&self, size: Size) -> MemoryResult<NonNull<u8>> {
        let exhausted = || MemoryError::BackingExhausted {
            requested: size,
            backing: BackingKind::Direct,
        };
        let length = NonZeroUsize::new(size).ok_or_else(exhausted)?;

        // SAFETY: a fresh anonymous mapping aliases no existing memory
        let mapped = unsafe {
            mmap_anonymous(
                None,
                length,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_PRIVATE,
            )
        };

        match mapped {
            Ok(block) => Ok(block.cast::<u8>()),
            Err(errno) => {
                error!(requested = size, %errno, "mmap refused region block");
                Err(exhausted())
            }
        }
    }

    unsafe fn release(&self, block: NonNull<u8>, size: Size) {
        if let Err(errno) = munmap(block.cast(), size) {
            warn!(address = block.as_ptr() as usize, size, %errno, "munmap failed");
        }
    }

    fn kind(&self) -> BackingKind {
        BackingKind::Direct
    }
}
