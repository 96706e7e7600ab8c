//! Thrown and placed projectiles.

use glam::Vec3;
use vantage_core::Keyed;
use vantage_shared::IdentityToken;

use super::{Observation, SpatialSnapshot};
use crate::labels::projectile_label;
use crate::provider::{ProjectileKind, ProjectileState, SimEntity, Simulation};

/// Snapshot of one projectile and the path it has travelled.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileRecord {
    /// Derived geometry.
    pub spatial: SpatialSnapshot,
    /// Join key.
    pub token: IdentityToken,
    /// Display label.
    pub name: &'static str,
    /// Thrown by the viewer.
    pub thrown_by_viewer: bool,
    /// Thrown by an actor hostile to the viewer.
    pub thrown_by_enemy: bool,
    /// Has gone off, or its entity is gone.
    pub exploded: bool,
    /// `(real time, position)` samples, one per observed movement.
    pub trajectory: Vec<(f32, Vec3)>,
}

impl Keyed for ProjectileRecord {
    type Key = IdentityToken;

    #[inline]
    fn key(&self) -> IdentityToken {
        self.token
    }
}

impl ProjectileRecord {
    /// Builds a record for a projectile seen for the first time, with its first sample.
    pub(crate) fn new<S: Simulation>(
        entity: &S::Entity,
        kind: ProjectileKind,
        state: &ProjectileState,
        obs: &Observation<'_, S>,
    ) -> Self {
        let mut thrown_by_viewer = false;
        let mut thrown_by_enemy = false;
        if let Some(thrower) = state.thrower {
            if thrower == obs.viewer.token() {
                thrown_by_viewer = true;
            } else if let Some(actor) = obs.sim.resolve(thrower).and_then(SimEntity::actor) {
                thrown_by_enemy = actor.enemy;
            }
        }

        let mut record = Self {
            spatial: SpatialSnapshot::default(),
            token: entity.token(),
            name: projectile_label(kind, entity.model_name()),
            thrown_by_viewer,
            thrown_by_enemy,
            exploded: false,
            trajectory: Vec::new(),
        };
        record.update(entity, obs);
        record
    }

    /// Refreshes geometry and appends a trajectory sample if the projectile moved.
    pub(crate) fn update<S: Simulation>(&mut self, entity: &S::Entity, obs: &Observation<'_, S>) {
        self.spatial = SpatialSnapshot::capture(entity, obs.viewer_origin);

        let position = entity.origin();
        if self.trajectory.last().map_or(true, |&(_, last)| last != position) {
            self.trajectory.push((obs.now, position));
        }
    }

    /// Real time of the newest trajectory sample.
    #[must_use]
    pub fn last_sample_time(&self) -> Option<f32> {
        self.trajectory.last().map(|&(time, _)| time)
    }

    /// True while the record should survive with its entity gone.
    #[must_use]
    pub fn trail_alive(&self, now: f32, trail_secs: f32) -> bool {
        self.last_sample_time()
            .is_some_and(|last| last + trail_secs >= now)
    }
}
