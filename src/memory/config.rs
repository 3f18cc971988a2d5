/*!
 * Arena Configuration
 *
 * Construction-time settings: region sizing, backing strategy and the
 * out-of-memory policy
 */

use super::backing;
use super::types::{BackingKind, MemoryError, MemoryResult};
use crate::core::limits::{
    DEFAULT_REGION_SIZE, ENV_BACKING, ENV_OOM_POLICY, ENV_REGION_SIZE, INITIAL_REGION_SLOTS,
    LARGE_REGION_SIZE,
};
use crate::core::types::Size;
use serde::{Deserialize, Serialize};

/// What the arena does when its backing store cannot supply a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OomPolicy {
    /// Log and terminate the process, as general allocators do
    Abort,
    /// Hand `MemoryError::BackingExhausted` back to the caller
    Report,
}

impl std::str::FromStr for OomPolicy {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(OomPolicy::Abort),
            "report" => Ok(OomPolicy::Report),
            other => Err(MemoryError::InvalidConfig(format!(
                "unknown oom policy '{}'",
                other
            ))),
        }
    }
}

/// Arena configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Minimum capacity of every new region
    pub default_region_size: Size,
    /// Raw memory strategy
    pub backing: BackingKind,
    /// Behavior on backing exhaustion
    pub oom_policy: OomPolicy,
    /// Registry slots reserved at construction
    pub initial_region_slots: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            default_region_size: DEFAULT_REGION_SIZE,
            backing: BackingKind::Delegating,
            oom_policy: OomPolicy::Abort,
            initial_region_slots: INITIAL_REGION_SLOTS,
        }
    }
}

impl ArenaConfig {
    /// Pages straight from the OS
    pub const fn direct() -> Self {
        Self {
            default_region_size: DEFAULT_REGION_SIZE,
            backing: BackingKind::Direct,
            oom_policy: OomPolicy::Abort,
            initial_region_slots: INITIAL_REGION_SLOTS,
        }
    }

    /// Fewer, bigger regions for buffer-heavy workloads
    pub const fn large_regions() -> Self {
        Self {
            default_region_size: LARGE_REGION_SIZE,
            backing: BackingKind::Delegating,
            oom_policy: OomPolicy::Abort,
            initial_region_slots: INITIAL_REGION_SLOTS,
        }
    }

    pub fn with_region_size(mut self, size: Size) -> Self {
        self.default_region_size = size;
        self
    }

    pub fn with_backing(mut self, backing: BackingKind) -> Self {
        self.backing = backing;
        self
    }

    pub fn with_oom_policy(mut self, policy: OomPolicy) -> Self {
        self.oom_policy = policy;
        self
    }

    /// Defaults overridden by `ARENA_REGION_SIZE`, `ARENA_BACKING` and
    /// `ARENA_OOM_POLICY`
    pub fn from_env() -> MemoryResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> MemoryResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_REGION_SIZE) {
            config.default_region_size = raw.trim().parse().map_err(|_| {
                MemoryError::InvalidConfig(format!("{}='{}' is not a size", ENV_REGION_SIZE, raw))
            })?;
        }
        if let Some(raw) = lookup(ENV_BACKING) {
            config.backing = raw.parse()?;
        }
        if let Some(raw) = lookup(ENV_OOM_POLICY) {
            config.oom_policy = raw.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MemoryResult<()> {
        if self.default_region_size == 0 {
            return Err(MemoryError::InvalidConfig(
                "default_region_size must be greater than 0".to_string(),
            ));
        }
        if !backing::is_supported(self.backing) {
            return Err(MemoryError::InvalidConfig(format!(
                "{} backing store is not available on this target",
                self.backing
            )));
        }
        Ok(())
    }
}
