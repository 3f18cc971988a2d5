/*!
 * Core Types
 * Common types used across the arena
 */

use serde::{Deserialize, Serialize};

/// Address type for memory operations
pub type Address = usize;

/// Size type for memory operations
pub type Size = usize;

/// Index of a region inside its registry
///
/// Regions are never removed, so an id stays valid for the registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub(crate) usize);

impl RegionId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "region#{}", self.0)
    }
}

/// A live grant, named by its region and byte offset from the region base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Allocation {
    pub region: RegionId,
    pub offset: Size,
}

impl Allocation {
    #[inline]
    pub fn new(region: RegionId, offset: Size) -> Self {
        Self { region, offset }
    }
}
