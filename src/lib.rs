/*!
 * Region Arena Library
 * Bump allocation over reference-counted regions, shared safely across threads
 */

pub mod core;
pub mod memory;
pub mod monitoring;

// Re-exports
pub use crate::core::types::{Address, Allocation, RegionId, Size};
pub use memory::{
    Arena, ArenaAllocator, ArenaConfig, ArenaStats, BackingKind, BackingStore, MemoryError,
    MemoryResult, OomPolicy, RawArena,
};
pub use monitoring::init_tracing;
