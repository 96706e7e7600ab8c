//! # Category Records
//!
//! One record type per entity category, each built on a [`SpatialSnapshot`].
//!
//! ```text
//!   persistent (merged by token, faded)     transient (rebuilt each tick)
//!   ┌──────────────┬──────────────────┐     ┌────────┬───────┬──────────┐
//!   │ ActorRecord  │ ProjectileRecord │     │ Prop   │ Loot  │ Weapon   │
//!   └──────────────┴──────────────────┘     │ Area   │ Observer         │
//!                                           └────────┴──────────────────┘
//!   singletons: ViewerRecord, TimedDeviceRecord
//! ```

mod actor;
mod projectile;
mod props;
mod singletons;
mod spatial;

use glam::Vec3;

pub use actor::ActorRecord;
pub use projectile::ProjectileRecord;
pub use props::{AreaEffectRecord, LootCrateRecord, PropRecord, WeaponRecord};
pub use singletons::{DeviceSite, ObserverRecord, TimedDeviceRecord, ViewerRecord};
pub use spatial::SpatialSnapshot;

use crate::config::CacheConfig;
use crate::culling::Frustum;
use crate::provider::Simulation;

/// Everything a record update may consult during one pass.
pub(crate) struct Observation<'a, S: Simulation> {
    pub sim: &'a S,
    pub viewer: &'a S::Entity,
    pub viewer_origin: Vec3,
    pub frustum: &'a Frustum,
    pub config: &'a CacheConfig,
    pub tick: u64,
    pub now: f32,
}

impl<S: Simulation> Observation<'_, S> {
    /// True if any active sound channel is sourced at `index`.
    pub fn is_audible(&self, index: i32) -> bool {
        self.sim.sound_sources().contains(&index)
    }

    /// Localizes `key`, yielding an empty string when unknown.
    pub fn localize(&self, key: Option<&str>) -> String {
        key.and_then(|key| self.sim.localize(key)).unwrap_or_default()
    }
}
