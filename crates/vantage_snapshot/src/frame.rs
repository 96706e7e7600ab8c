//! # Frame Synchronizer
//!
//! The state one pass produces, and the pass itself.
//!
//! ## Pass Order
//!
//! ```text
//! 1. clear transient containers
//! 2. viewer + device singletons        (no viewer → drop persistent, stop)
//! 3. game mode, view-projection, frustum
//! 4. walk live entities once
//!      actor       → upsert by token (+ observer relationship)
//!      projectile  → upsert by token, or flag exploded
//!      prop / loot / area / loose weapon → append
//! 5. sort every container by distance to viewer
//! 6. persistent post-pass: mark unresolvable, fade, evict
//! ```
//!
//! Avatars of dropped actors are handed back from the pass and retired by
//! the caller once the lock is released.

use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};
use tracing::{debug, trace};
use vantage_core::{RecordArena, Upsert};
use vantage_shared::IdentityToken;

use crate::config::CacheConfig;
use crate::culling::Frustum;
use crate::projection::world_to_screen;
use crate::provider::{EntityClass, GameMode, ObserverMode, SimEntity, Simulation};
use crate::records::{
    ActorRecord, AreaEffectRecord, LootCrateRecord, Observation, ObserverRecord, ProjectileRecord,
    PropRecord, SpatialSnapshot, TimedDeviceRecord, ViewerRecord, WeaponRecord,
};
use crate::textures::Avatar;

/// Counters for the last completed pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Tick the pass ran for.
    pub tick: u64,
    /// Live entities enumerated.
    pub entities_seen: usize,
    /// Persistent records created this pass.
    pub created: usize,
    /// Actor records evicted this pass.
    pub evicted_actors: usize,
    /// Projectile records evicted this pass.
    pub evicted_projectiles: usize,
}

/// Everything the renderer can read, as of the last completed pass.
#[derive(Debug)]
pub struct Snapshot {
    viewer: ViewerRecord,
    view_projection: Mat4,
    frustum: Frustum,
    projection_epsilon: f32,
    game_mode: GameMode,
    device: Option<TimedDeviceRecord>,
    real_time: f32,

    actors: RecordArena<ActorRecord>,
    projectiles: RecordArena<ProjectileRecord>,

    observers: Vec<ObserverRecord>,
    weapons: Vec<WeaponRecord>,
    props: Vec<PropRecord>,
    loot_crates: Vec<LootCrateRecord>,
    area_effects: Vec<AreaEffectRecord>,

    released: Vec<Arc<Avatar>>,
    stats: PassStats,
}

impl Snapshot {
    pub(crate) fn new(projection_epsilon: f32) -> Self {
        Self {
            viewer: ViewerRecord::default(),
            view_projection: Mat4::ZERO,
            frustum: Frustum::default(),
            projection_epsilon,
            game_mode: GameMode::default(),
            device: None,
            real_time: 0.0,
            actors: RecordArena::new(),
            projectiles: RecordArena::new(),
            observers: Vec::new(),
            weapons: Vec::new(),
            props: Vec::new(),
            loot_crates: Vec::new(),
            area_effects: Vec::new(),
            released: Vec::new(),
            stats: PassStats::default(),
        }
    }

    // =========================================================================
    // READ ACCESS
    // =========================================================================

    /// The viewer singleton.
    #[must_use]
    pub const fn viewer(&self) -> &ViewerRecord {
        &self.viewer
    }

    /// World-to-clip transform captured this pass.
    #[must_use]
    pub const fn view_projection(&self) -> Mat4 {
        self.view_projection
    }

    /// View frustum derived from [`Snapshot::view_projection`].
    #[must_use]
    pub const fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Game mode captured this pass.
    #[must_use]
    pub const fn game_mode(&self) -> GameMode {
        self.game_mode
    }

    /// The ticking timed device, if any.
    #[must_use]
    pub const fn device(&self) -> Option<&TimedDeviceRecord> {
        self.device.as_ref()
    }

    /// Real time the pass ran at.
    #[must_use]
    pub const fn real_time(&self) -> f32 {
        self.real_time
    }

    /// Actors, nearest first.
    #[must_use]
    pub fn actors(&self) -> &[ActorRecord] {
        self.actors.as_slice()
    }

    /// Looks up an actor by token.
    #[must_use]
    pub fn actor(&self, token: IdentityToken) -> Option<&ActorRecord> {
        self.actors.get(token)
    }

    /// Projectiles, nearest first.
    #[must_use]
    pub fn projectiles(&self) -> &[ProjectileRecord] {
        self.projectiles.as_slice()
    }

    /// Looks up a projectile by token.
    #[must_use]
    pub fn projectile(&self, token: IdentityToken) -> Option<&ProjectileRecord> {
        self.projectiles.get(token)
    }

    /// Spectator relationships.
    #[must_use]
    pub fn observers(&self) -> &[ObserverRecord] {
        &self.observers
    }

    /// Unowned weapons, nearest first.
    #[must_use]
    pub fn weapons(&self) -> &[WeaponRecord] {
        &self.weapons
    }

    /// Props, nearest first.
    #[must_use]
    pub fn props(&self) -> &[PropRecord] {
        &self.props
    }

    /// Loot crates, nearest first.
    #[must_use]
    pub fn loot_crates(&self) -> &[LootCrateRecord] {
        &self.loot_crates
    }

    /// Burning areas, nearest first.
    #[must_use]
    pub fn area_effects(&self) -> &[AreaEffectRecord] {
        &self.area_effects
    }

    /// Counters for the pass that produced this snapshot.
    #[must_use]
    pub const fn stats(&self) -> PassStats {
        self.stats
    }

    /// Projects `point` with this snapshot's view-projection.
    #[must_use]
    pub fn project(&self, point: Vec3, viewport: Vec2, snap: bool) -> Option<Vec2> {
        world_to_screen(&self.view_projection, point, viewport, self.projection_epsilon, snap)
    }

    // =========================================================================
    // MAINTENANCE
    // =========================================================================

    /// Forgets every projectile and its trajectory.
    pub(crate) fn clear_projectiles(&mut self) {
        self.projectiles.clear();
    }

    /// Every actor avatar currently held.
    pub(crate) fn avatars(&self) -> Vec<Arc<Avatar>> {
        self.actors
            .iter()
            .filter_map(|actor| actor.avatar.clone())
            .collect()
    }

    fn clear_transient(&mut self) {
        self.observers.clear();
        self.weapons.clear();
        self.props.clear();
        self.loot_crates.clear();
        self.area_effects.clear();
    }

    fn clear_persistent(&mut self) {
        for actor in self.actors.iter_mut() {
            self.released.extend(actor.take_avatar());
        }
        self.actors.clear();
        self.projectiles.clear();
    }

    // =========================================================================
    // THE PASS
    // =========================================================================

    /// Rebuilds the snapshot from the simulation's current state.
    ///
    /// Returns the avatars of actors dropped this pass; their textures are
    /// still alive.
    #[must_use]
    pub(crate) fn rebuild<S: Simulation>(
        &mut self,
        sim: &S,
        config: &CacheConfig,
    ) -> Vec<Arc<Avatar>> {
        let tick = sim.tick();
        let now = sim.real_time();
        self.real_time = now;
        self.stats = PassStats {
            tick,
            ..PassStats::default()
        };

        self.clear_transient();
        self.viewer = ViewerRecord::capture(sim);
        self.device = TimedDeviceRecord::capture(sim);

        let Some(viewer) = sim.viewer() else {
            self.clear_persistent();
            self.game_mode = GameMode::default();
            debug!(tick, "no viewer, snapshot cleared");
            return std::mem::take(&mut self.released);
        };

        self.game_mode = sim.game_mode();
        self.view_projection = sim.view_projection();
        self.frustum = Frustum::from_view_projection(&self.view_projection);

        let viewer_state = viewer.viewer_state();
        let skipped_target = match viewer_state.observer_mode {
            ObserverMode::InEye => viewer_state.observer_target,
            _ => None,
        };

        let frustum = self.frustum;
        let obs = Observation {
            sim,
            viewer,
            viewer_origin: self.viewer.origin,
            frustum: &frustum,
            config,
            tick,
            now,
        };

        for entity in sim.live_entities() {
            self.stats.entities_seen += 1;
            if !entity.is_locally_known() {
                continue;
            }

            match entity.class() {
                EntityClass::Actor => {
                    let token = entity.token();
                    if token == viewer.token() || Some(token) == skipped_target {
                        continue;
                    }
                    self.observe_actor(entity, &obs);
                }
                class => {
                    if !entity.is_dormant() {
                        self.observe_object(entity, class, &obs);
                    }
                }
            }
        }

        self.sort_by_distance();
        self.evict_projectiles(sim, config, now);
        self.evict_actors(sim, config, now);

        debug!(
            tick,
            actors = self.actors.len(),
            projectiles = self.projectiles.len(),
            props = self.props.len(),
            weapons = self.weapons.len(),
            observers = self.observers.len(),
            created = self.stats.created,
            "snapshot pass complete"
        );
        std::mem::take(&mut self.released)
    }

    fn observe_actor<S: Simulation>(&mut self, entity: &S::Entity, obs: &Observation<'_, S>) {
        let Some(state) = entity.actor() else {
            return;
        };
        if state.is_relay {
            return;
        }

        let token = entity.token();
        if let Some(record) = self
            .actors
            .get_mut(token)
            .filter(|record| !record.same_occupant(&state))
        {
            let mut previous = std::mem::replace(record, ActorRecord::new(entity, &state, obs));
            self.released.extend(previous.take_avatar());
            self.stats.created += 1;
            trace!(%token, name = %state.name, previous = %previous.name, "actor token reused");
        } else {
            let outcome = self.actors.upsert(
                token,
                |record| record.update(entity, &state, obs),
                || ActorRecord::new(entity, &state, obs),
            );
            if outcome == Upsert::Created {
                self.stats.created += 1;
                trace!(%token, name = %state.name, "actor record created");
            }
        }

        if entity.is_dormant() || state.alive {
            return;
        }
        let target = state
            .observer_target
            .and_then(|target| obs.sim.resolve(target))
            .and_then(|target| target.actor().map(|actor| (target.token(), actor.user_id)));
        if let Some((target, target_user_id)) = target {
            self.observers.push(ObserverRecord {
                spectator: token,
                spectator_user_id: state.user_id,
                target,
                target_user_id,
                target_is_viewer: target == obs.viewer.token(),
            });
        }
    }

    fn observe_object<S: Simulation>(
        &mut self,
        entity: &S::Entity,
        class: EntityClass,
        obs: &Observation<'_, S>,
    ) {
        match class {
            EntityClass::Weapon => {
                if let Some(state) = entity.weapon().filter(|weapon| weapon.owner.is_none()) {
                    self.weapons.push(WeaponRecord::new(entity, &state, obs));
                }
            }
            EntityClass::Projectile(kind) => {
                let state = entity.projectile().unwrap_or_default();
                let token = entity.token();
                if state.exploded {
                    if let Some(record) = self.projectiles.get_mut(token) {
                        record.exploded = true;
                    }
                    return;
                }
                let outcome = self.projectiles.upsert(
                    token,
                    |record| record.update(entity, obs),
                    || ProjectileRecord::new(entity, kind, &state, obs),
                );
                if outcome == Upsert::Created {
                    self.stats.created += 1;
                    trace!(%token, ?kind, "projectile record created");
                }
            }
            EntityClass::Prop(kind) => self.props.push(PropRecord::new(entity, kind, obs)),
            EntityClass::LootCrate => self.loot_crates.push(LootCrateRecord::new(entity, obs)),
            EntityClass::AreaEffect => self.area_effects.push(AreaEffectRecord::new(entity, obs)),
            EntityClass::Actor | EntityClass::Unknown => {}
        }
    }

    fn sort_by_distance(&mut self) {
        fn nearest_first(a: &SpatialSnapshot, b: &SpatialSnapshot) -> std::cmp::Ordering {
            a.distance_to_viewer.total_cmp(&b.distance_to_viewer)
        }

        self.actors.sort_by(|a, b| nearest_first(&a.spatial, &b.spatial));
        self.projectiles.sort_by(|a, b| nearest_first(&a.spatial, &b.spatial));
        self.weapons.sort_by(|a, b| nearest_first(&a.spatial, &b.spatial));
        self.props.sort_by(|a, b| nearest_first(&a.spatial, &b.spatial));
        self.loot_crates.sort_by(|a, b| nearest_first(&a.spatial, &b.spatial));
        self.area_effects.sort_by(|a, b| nearest_first(&a.spatial, &b.spatial));
    }

    /// Unresolvable projectiles count as exploded and linger for the trail window.
    fn evict_projectiles<S: Simulation>(&mut self, sim: &S, config: &CacheConfig, now: f32) {
        let trail = config.projectile_trail_secs;
        self.stats.evicted_projectiles = self.projectiles.retain(|projectile| {
            if sim.resolve(projectile.token).is_some() {
                return true;
            }
            projectile.exploded = true;
            let keep = projectile.trail_alive(now, trail);
            if !keep {
                trace!(token = %projectile.token, "projectile record evicted");
            }
            keep
        });
    }

    /// Unresolvable actors get a fade deadline once and are dropped after it.
    fn evict_actors<S: Simulation>(&mut self, sim: &S, config: &CacheConfig, now: f32) {
        let fade = config.actor_fade_secs;
        let released = &mut self.released;
        self.stats.evicted_actors = self.actors.retain(|actor| {
            if sim.resolve(actor.token).is_some() {
                return true;
            }
            let until = *actor.fade_until.get_or_insert(now + fade);
            if until >= now {
                return true;
            }
            released.extend(actor.take_avatar());
            trace!(token = %actor.token, "actor record evicted");
            false
        });
    }
}
