//! Transient categories, rebuilt from scratch every tick.

use glam::Vec3;
use tracing::warn;
use vantage_shared::IdentityToken;

use super::{Observation, SpatialSnapshot};
use crate::labels::{loot_crate_label, prop_label, weapon_group, weapon_name};
use crate::provider::{PropKind, SimEntity, Simulation, WeaponState};

/// A world prop.
#[derive(Clone, Debug, PartialEq)]
pub struct PropRecord {
    /// Derived geometry.
    pub spatial: SpatialSnapshot,
    /// Prop class.
    pub kind: PropKind,
    /// Display label.
    pub name: &'static str,
}

impl PropRecord {
    pub(crate) fn new<S: Simulation>(entity: &S::Entity, kind: PropKind, obs: &Observation<'_, S>) -> Self {
        Self {
            spatial: SpatialSnapshot::capture(entity, obs.viewer_origin),
            kind,
            name: prop_label(kind),
        }
    }
}

/// A loot crate.
#[derive(Clone, Debug, PartialEq)]
pub struct LootCrateRecord {
    /// Derived geometry.
    pub spatial: SpatialSnapshot,
    /// Display label; `None` for unrecognized models.
    pub name: Option<&'static str>,
}

impl LootCrateRecord {
    pub(crate) fn new<S: Simulation>(entity: &S::Entity, obs: &Observation<'_, S>) -> Self {
        Self {
            spatial: SpatialSnapshot::capture(entity, obs.viewer_origin),
            name: entity.model_name().and_then(loot_crate_label),
        }
    }
}

/// A burning area.
#[derive(Clone, Debug, PartialEq)]
pub struct AreaEffectRecord {
    /// Derived geometry.
    pub spatial: SpatialSnapshot,
    /// World positions of every burning cell.
    pub points: Vec<Vec3>,
}

impl AreaEffectRecord {
    pub(crate) fn new<S: Simulation>(entity: &S::Entity, obs: &Observation<'_, S>) -> Self {
        Self {
            spatial: SpatialSnapshot::capture(entity, obs.viewer_origin),
            points: entity.fire_points(),
        }
    }
}

/// A weapon lying in the world.
#[derive(Clone, Debug, PartialEq)]
pub struct WeaponRecord {
    /// Derived geometry.
    pub spatial: SpatialSnapshot,
    /// Identity token.
    pub token: IdentityToken,
    /// Rounds in the magazine.
    pub clip: i32,
    /// Reserve rounds.
    pub reserve_ammo: i32,
    /// Filter group; `None` without weapon info.
    pub group: Option<&'static str>,
    /// Filter name; `None` without weapon info.
    pub name: Option<&'static str>,
    /// Localized display name.
    pub display_name: String,
}

impl WeaponRecord {
    pub(crate) fn new<S: Simulation>(
        entity: &S::Entity,
        state: &WeaponState,
        obs: &Observation<'_, S>,
    ) -> Self {
        let (group, name, display_name) = match &state.info {
            Some(info) => {
                let display_name = obs.sim.localize(&info.name_key).unwrap_or_else(|| {
                    warn!(key = %info.name_key, "weapon name has no localization");
                    String::new()
                });
                (
                    Some(weapon_group(info.kind, state.id)),
                    Some(weapon_name(state.id)),
                    display_name,
                )
            }
            None => (None, None, String::new()),
        };

        Self {
            spatial: SpatialSnapshot::capture(entity, obs.viewer_origin),
            token: entity.token(),
            clip: state.clip,
            reserve_ammo: state.reserve_ammo,
            group,
            name,
            display_name,
        }
    }
}
