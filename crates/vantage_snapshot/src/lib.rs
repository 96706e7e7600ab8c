//! # VANTAGE Snapshot Cache
//!
//! Keeps a render-ready picture of a simulation's entities, rebuilt once per
//! simulation tick, so an overlay renderer running on its own schedule can
//! draw annotations without touching the simulation mid-frame.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ONE PASS PER TICK                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TickGate → SnapshotLock::write()                           │
//! │       ↓                                                     │
//! │  clear transient → viewer → view matrix → walk entities     │
//! │       ↓                          ↓                          │
//! │  merge by IdentityToken    append per category              │
//! │       ↓                                                     │
//! │  sort by distance → fade → evict → publish                  │
//! └─────────────────────────────────────────────────────────────┘
//!          ↑ read()                         ↑ project()
//!       overlay renderer (own thread, same lock)
//! ```
//!
//! ## Modules
//!
//! - [`provider`]: what the cache needs from the simulation
//! - [`records`]: one record type per entity category
//! - [`labels`]: display names keyed by class identifiers
//! - [`culling`] / [`projection`]: view-dependent geometry
//! - [`textures`]: lazily uploaded rank icons and avatars
//! - [`cache`]: the public facade, [`SnapshotCache`]

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod cache;
pub mod config;
pub mod culling;
pub mod labels;
pub mod projection;
pub mod provider;
pub mod records;
pub mod scripted;
pub mod textures;

mod frame;

pub use cache::{SnapshotCache, SnapshotView};
pub use config::{CacheConfig, ConfigError};
pub use culling::Frustum;
pub use frame::{PassStats, Snapshot};
pub use projection::world_to_screen;
pub use provider::{
    ActorState, Bone, DeviceState, EntityClass, GameMode, HeadHitbox, HeldWeapon, ObserverMode,
    ProjectileKind, ProjectileState, PropKind, SimEntity, Simulation, Skeleton, Team,
    ViewerState, ViewerWeapon, WeaponId, WeaponInfo, WeaponKind, WeaponState,
};
pub use records::{
    ActorRecord, AreaEffectRecord, DeviceSite, LootCrateRecord, ObserverRecord, ProjectileRecord,
    PropRecord, SpatialSnapshot, TimedDeviceRecord, ViewerRecord, WeaponRecord,
};
pub use scripted::{ScriptedEntity, ScriptedWorld};
pub use textures::{
    Avatar, EncodedImage, LazyTexture, PixelBuffer, ResourceCache, ResourceSet, TextureBackend,
    TextureError, TextureId,
};

pub use vantage_shared::{Aabb, BoneSegment, IdentityToken};
