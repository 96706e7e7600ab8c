//! # VANTAGE Shared
//!
//! Common types used by both the simulation-facing producer and the
//! overlay-facing consumer.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - `image`
//! - any GPU or window-related crate
//!
//! If you need texture types, put them in `vantage_snapshot::textures`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod identity;
pub mod math;

pub use constants::{
    ACTOR_FADE_SECS, AVATAR_SIZE, NAME_REFRESH_INTERVAL, PROJECTILE_TRAIL_SECS,
    PROJECTION_EPSILON,
};
pub use identity::IdentityToken;
pub use math::{Aabb, Affine3A, BoneSegment, Mat4, Vec2, Vec3, Vec4};
