/*!
 * Process-Wide Arena
 *
 * A single lazily-built `Arena` shared by the whole process, configured from
 * the `ARENA_*` environment variables on first use. It is never dropped; the
 * OS reclaims its regions at exit.
 */

use super::arena::Arena;
use super::config::ArenaConfig;
use super::types::{ArenaStats, MemoryResult};
use crate::core::types::Size;
use std::ptr::NonNull;
use std::sync::LazyLock;
use tracing::warn;

static GLOBAL_ARENA: LazyLock<Arena> = LazyLock::new(build_global_arena);

fn build_global_arena() -> Arena {
    let config = ArenaConfig::from_env().unwrap_or_else(|err| {
        warn!(error = %err, "Invalid arena environment, using defaults");
        ArenaConfig::default()
    });
    match Arena::with_config(config) {
        Ok(arena) => arena,
        Err(err) => {
            warn!(error = %err, "Falling back to default arena");
            Arena::new()
        }
    }
}

/// The process-wide arena
#[inline]
pub fn arena() -> &'static Arena {
    &GLOBAL_ARENA
}

pub fn allocate(size: Size, hint: Option<NonNull<u8>>) -> MemoryResult<NonNull<u8>> {
    arena().allocate(size, hint)
}

pub fn deallocate(ptr: NonNull<u8>, size: Size) {
    arena().deallocate(ptr, size)
}

pub fn reallocate(
    ptr: Option<NonNull<u8>>,
    from_size: Size,
    to_size: Size,
    hint: Option<NonNull<u8>>,
) -> MemoryResult<Option<NonNull<u8>>> {
    arena().reallocate(ptr, from_size, to_size, hint)
}

pub fn default_region_size() -> Size {
    arena().default_region_size()
}

pub fn stats() -> ArenaStats {
    arena().stats()
}
