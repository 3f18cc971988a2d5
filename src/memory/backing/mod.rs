/*!
 * Backing Stores
 *
 * Raw block suppliers for regions:
 * - **Delegating**: forwards to the general-purpose allocator (jemalloc with the
 *   `jemalloc` feature, the system allocator otherwise)
 * - **Direct**: maps anonymous private pages from the OS, bypassing allocator
 *   bookkeeping entirely (unix only)
 *
 * Both variants keep a block at a fixed address until it is released, and
 * blocks are released only when the owning registry is dropped.
 */

mod delegating;
#[cfg(unix)]
mod direct;

pub use delegating::DelegatingBacking;
#[cfg(unix)]
pub use direct::DirectBacking;

use super::traits::BackingStore;
use super::types::{BackingKind, MemoryResult};

/// Build the backing store selected by `kind`
pub fn for_kind(kind: BackingKind) -> MemoryResult<Box<dyn BackingStore>> {
    match kind {
        BackingKind::Delegating => Ok(Box::new(DelegatingBacking::new())),
        #[cfg(unix)]
        BackingKind::Direct => Ok(Box::new(DirectBacking::new())),
        #[cfg(not(unix))]
        BackingKind::Direct => Err(super::types::MemoryError::InvalidConfig(
            "direct backing store requires a unix target".to_string(),
        )),
    }
}

/// Whether `kind` can be constructed on this target
pub fn is_supported(kind: BackingKind) -> bool {
    match kind {
        BackingKind::Delegating => true,
        BackingKind::Direct => cfg!(unix),
    }
}
