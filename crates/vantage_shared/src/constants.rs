//! # Tuning Constants
//!
//! Defaults for the snapshot cache. Every value here can be overridden at
//! runtime through `vantage_snapshot::CacheConfig`; these are what you get
//! when no config file is supplied.

// =============================================================================
// FADE WINDOWS
// =============================================================================

/// Seconds an actor record survives after its entity stops resolving
/// or goes dormant.
pub const ACTOR_FADE_SECS: f32 = 1.75;

/// Seconds a projectile record survives after its last trajectory sample
/// once the entity is gone. Long enough for the trail to stay readable.
pub const PROJECTILE_TRAIL_SECS: f32 = 60.0;

// =============================================================================
// REFRESH CADENCE
// =============================================================================

/// Actor display names are re-read from the simulation every N ticks.
pub const NAME_REFRESH_INTERVAL: u64 = 20;

// =============================================================================
// PROJECTION
// =============================================================================

/// Minimum homogeneous divisor for a point to count as in front of the viewer.
pub const PROJECTION_EPSILON: f32 = 0.001;

// =============================================================================
// RESOURCES
// =============================================================================

/// Edge length of a per-actor avatar bitmap (square, RGBA8).
pub const AVATAR_SIZE: u32 = 32;

/// Number of competitive rank icons.
pub const COMPETITIVE_RANK_COUNT: usize = 19;

/// Number of survival-mode rank icons.
pub const SURVIVAL_RANK_COUNT: usize = 16;

/// Typical number of hitbox bone segments per skeleton; used to size buffers.
pub const BONE_SEGMENT_RESERVE: usize = 20;
