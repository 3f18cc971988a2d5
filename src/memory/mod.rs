/*!
 * Memory Module
 * Region arena, its backing stores and allocation surfaces
 */

pub mod adapter;
pub mod arena;
pub mod backing;
pub mod config;
pub mod global;
pub mod region;
pub mod registry;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use adapter::ArenaAllocator;
pub use arena::Arena;
pub use backing::DelegatingBacking;
#[cfg(unix)]
pub use backing::DirectBacking;
pub use config::{ArenaConfig, OomPolicy};
pub use region::Region;
pub use registry::RegionRegistry;
pub use traits::*;
pub use types::*;
