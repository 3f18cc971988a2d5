/*!
 * Arena Limits and Constants
 *
 * Centralized location for arena-wide sizes and defaults.
 *
 * - Performance-critical constants are marked with [PERF]
 * - Platform-dependent values are marked with [PLATFORM]
 */

// =============================================================================
// REGION SIZING
// =============================================================================

/// Default region capacity (4KB)
/// Requests larger than this get a region sized exactly to the request
/// [PERF] Aligned with common page size
pub const DEFAULT_REGION_SIZE: usize = 4 * 1024;

/// Capacity preset for workloads with larger buffers (64KB)
pub const LARGE_REGION_SIZE: usize = 64 * 1024;

/// Alignment of every region base handed out by the delegating backing store
/// [PLATFORM] Matches the strictest fundamental alignment on 64-bit targets
pub const REGION_ALIGN: usize = 16;

/// Byte granule the typed adapter rounds every request up to
/// Keeps typed grants aligned as long as all users of an arena allocate in
/// multiples of it
pub const ADAPTER_GRANULE: usize = REGION_ALIGN;

// =============================================================================
// REGISTRY
// =============================================================================

/// Registry slots reserved up front
/// [PERF] Most workloads stay within a handful of regions
pub const INITIAL_REGION_SLOTS: usize = 4;

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Overrides `ArenaConfig::default_region_size`
pub const ENV_REGION_SIZE: &str = "ARENA_REGION_SIZE";

/// Selects the backing store (`delegating` or `direct`)
pub const ENV_BACKING: &str = "ARENA_BACKING";

/// Selects the out-of-memory policy (`abort` or `report`)
pub const ENV_OOM_POLICY: &str = "ARENA_OOM_POLICY";

/// Enables JSON tracing output when set to `1` or `true`
pub const ENV_TRACE_JSON: &str = "ARENA_TRACE_JSON";
