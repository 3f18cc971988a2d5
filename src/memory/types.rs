/*!
 * Memory Types
 * Common types for arena management
 */

use crate::core::types::{Address, RegionId, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum MemoryError {
    #[error("Backing store exhausted: {backing} could not supply {requested} bytes")]
    #[diagnostic(
        code(arena::backing_exhausted),
        help("The system is out of memory. Lower ARENA_REGION_SIZE or free memory elsewhere.")
    )]
    BackingExhausted { requested: Size, backing: BackingKind },

    #[error("Pointer 0x{0:x} does not belong to any region")]
    #[diagnostic(
        code(arena::foreign_pointer),
        help("The pointer was not obtained from this arena or its region has been reset.")
    )]
    ForeignPointer(Address),

    #[error("Size overflow: {count} elements of {elem_size} bytes")]
    #[diagnostic(code(arena::size_overflow))]
    SizeOverflow { count: usize, elem_size: usize },

    #[error("Misaligned grant at 0x{address:x}, required alignment {alignment}")]
    #[diagnostic(
        code(arena::misaligned),
        help("Allocate through ArenaAllocator or in multiples of ADAPTER_GRANULE bytes.")
    )]
    Misaligned { address: Address, alignment: usize },

    #[error("Invalid arena configuration: {0}")]
    #[diagnostic(
        code(arena::invalid_config),
        help("Review ArenaConfig fields and the ARENA_* environment variables.")
    )]
    InvalidConfig(String),
}

/// Raw memory strategy backing the regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackingKind {
    /// Forwards to the process's general-purpose allocator
    Delegating,
    /// Maps anonymous pages straight from the OS
    Direct,
}

impl std::fmt::Display for BackingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BackingKind::Delegating => write!(f, "delegating"),
            BackingKind::Direct => write!(f, "direct"),
        }
    }
}

impl std::str::FromStr for BackingKind {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "delegating" | "allocator" => Ok(BackingKind::Delegating),
            "direct" | "mmap" => Ok(BackingKind::Direct),
            other => Err(MemoryError::InvalidConfig(format!(
                "unknown backing store '{}'",
                other
            ))),
        }
    }
}

/// Point-in-time view of a single region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionStats {
    pub id: RegionId,
    pub capacity: Size,
    pub used: Size,
    pub live_allocations: usize,
}

impl RegionStats {
    pub fn free(&self) -> Size {
        self.capacity - self.used
    }
}

/// Point-in-time view of a whole arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaStats {
    pub backing: BackingKind,
    pub default_region_size: Size,
    pub region_count: usize,
    pub total_capacity: Size,
    pub used_bytes: Size,
    pub live_allocations: usize,
    pub idle_regions: usize,
    pub foreign_frees: u64,
    pub regions: Vec<RegionStats>,
}

impl ArenaStats {
    /// Fraction of reserved capacity under a watermark
    pub fn utilization(&self) -> f64 {
        if self.total_capacity == 0 {
            0.0
        } else {
            self.used_bytes as f64 / self.total_capacity as f64
        }
    }
}
