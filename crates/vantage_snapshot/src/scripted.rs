//! # Scripted Simulation
//!
//! An in-memory [`Simulation`] whose state is set directly by the caller.
//! Drives the integration tests, the benchmarks and the soak binary.
//!
//! ```rust,ignore
//! let mut world = ScriptedWorld::new();
//! world.spawn(ScriptedEntity::actor(1, Vec3::ZERO, ActorState::default()));
//! world.set_viewer(IdentityToken(1));
//! world.look_at(Vec3::new(0.0, 0.0, 64.0), Vec3::X, 16.0 / 9.0);
//! world.step(1.0 / 64.0);
//! cache.advance(&world);
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};

use glam::{Affine3A, Mat4, Vec3};
use vantage_shared::{Aabb, IdentityToken};

use crate::provider::{
    ActorState, DeviceState, EntityClass, GameMode, ProjectileKind, ProjectileState, PropKind,
    SimEntity, Simulation, Skeleton, ViewerState, WeaponState,
};

/// Collision box of a standing actor.
pub const ACTOR_BOUNDS: Aabb = Aabb::new(Vec3::new(-16.0, -16.0, 0.0), Vec3::new(16.0, 16.0, 72.0));

/// One entity of a [`ScriptedWorld`]. Every field is freely writable.
#[derive(Clone, Debug)]
pub struct ScriptedEntity {
    /// Identity token.
    pub token: IdentityToken,
    /// Entity index; defaults to the token value.
    pub index: i32,
    /// Category.
    pub class: EntityClass,
    /// Dormant this tick.
    pub dormant: bool,
    /// Fully known to the local side.
    pub locally_known: bool,
    /// World position.
    pub origin: Vec3,
    /// Local bounds.
    pub bounds: Option<Aabb>,
    /// Model path.
    pub model: Option<String>,
    /// Actor state.
    pub actor: Option<ActorState>,
    /// Viewer state.
    pub viewer: ViewerState,
    /// Posed skeleton.
    pub skeleton: Option<Skeleton>,
    /// Projectile state.
    pub projectile: Option<ProjectileState>,
    /// Weapon state.
    pub weapon: Option<WeaponState>,
    /// Burning cells, world space.
    pub fire_points: Vec<Vec3>,
}

impl ScriptedEntity {
    fn base(token: i32, class: EntityClass, origin: Vec3) -> Self {
        Self {
            token: IdentityToken(token),
            index: token,
            class,
            dormant: false,
            locally_known: true,
            origin,
            bounds: None,
            model: None,
            actor: None,
            viewer: ViewerState::default(),
            skeleton: None,
            projectile: None,
            weapon: None,
            fire_points: Vec::new(),
        }
    }

    /// An actor with a standing collision box.
    #[must_use]
    pub fn actor(token: i32, origin: Vec3, state: ActorState) -> Self {
        Self {
            bounds: Some(ACTOR_BOUNDS),
            actor: Some(state),
            ..Self::base(token, EntityClass::Actor, origin)
        }
    }

    /// A projectile in flight.
    #[must_use]
    pub fn projectile(token: i32, kind: ProjectileKind, origin: Vec3, thrower: Option<IdentityToken>) -> Self {
        Self {
            bounds: Some(Aabb::new(Vec3::splat(-2.0), Vec3::splat(2.0))),
            projectile: Some(ProjectileState {
                thrower,
                exploded: false,
            }),
            ..Self::base(token, EntityClass::Projectile(kind), origin)
        }
    }

    /// A world prop.
    #[must_use]
    pub fn prop(token: i32, kind: PropKind, origin: Vec3) -> Self {
        Self {
            bounds: Some(Aabb::new(Vec3::splat(-8.0), Vec3::splat(8.0))),
            ..Self::base(token, EntityClass::Prop(kind), origin)
        }
    }

    /// A weapon entity.
    #[must_use]
    pub fn weapon(token: i32, origin: Vec3, state: WeaponState) -> Self {
        Self {
            weapon: Some(state),
            ..Self::base(token, EntityClass::Weapon, origin)
        }
    }

    /// A loot crate with the given model.
    #[must_use]
    pub fn loot_crate(token: i32, origin: Vec3, model: &str) -> Self {
        Self {
            model: Some(model.to_owned()),
            ..Self::base(token, EntityClass::LootCrate, origin)
        }
    }

    /// A burning area with cells at the given world positions.
    #[must_use]
    pub fn area_effect(token: i32, origin: Vec3, fire_points: Vec<Vec3>) -> Self {
        Self {
            fire_points,
            ..Self::base(token, EntityClass::AreaEffect, origin)
        }
    }

    /// Sets the model path.
    #[must_use]
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_owned());
        self
    }

    /// Mutable actor state.
    pub fn actor_mut(&mut self) -> Option<&mut ActorState> {
        self.actor.as_mut()
    }
}

impl SimEntity for ScriptedEntity {
    fn token(&self) -> IdentityToken {
        self.token
    }

    fn index(&self) -> i32 {
        self.index
    }

    fn class(&self) -> EntityClass {
        self.class
    }

    fn is_dormant(&self) -> bool {
        self.dormant
    }

    fn is_locally_known(&self) -> bool {
        self.locally_known
    }

    fn origin(&self) -> Vec3 {
        self.origin
    }

    fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    fn transform(&self) -> Affine3A {
        Affine3A::from_translation(self.origin)
    }

    fn model_name(&self) -> Option<&str> {
        self.model.as_deref()
    }

    fn actor(&self) -> Option<ActorState> {
        self.actor.clone()
    }

    fn viewer_state(&self) -> ViewerState {
        self.viewer
    }

    fn skeleton(&self) -> Option<Skeleton> {
        self.skeleton.clone()
    }

    fn projectile(&self) -> Option<ProjectileState> {
        self.projectile
    }

    fn weapon(&self) -> Option<WeaponState> {
        self.weapon.clone()
    }

    fn fire_points(&self) -> Vec<Vec3> {
        self.fire_points.clone()
    }
}

/// A simulation whose every answer is scripted.
#[derive(Clone, Debug, Default)]
pub struct ScriptedWorld {
    /// Tick counter.
    pub tick: u64,
    /// Wall-clock seconds.
    pub time: f32,
    /// Live entities in enumeration order.
    pub entities: BTreeMap<IdentityToken, ScriptedEntity>,
    /// The viewer's token.
    pub viewer: Option<IdentityToken>,
    /// World-to-clip transform.
    pub view_projection: Mat4,
    /// Entity indices of playing sounds.
    pub sound_sources: Vec<i32>,
    /// Localization table.
    pub strings: HashMap<String, String>,
    /// Game mode.
    pub game_mode: GameMode,
    /// Planted device.
    pub device: Option<DeviceState>,
    /// Site A and B centers.
    pub sites: Option<(Vec3, Vec3)>,
    /// Avatar bitmaps by account.
    pub avatars: HashMap<u64, Vec<u8>>,
    /// Tokens hidden from the viewer's line of sight.
    pub occluded: HashSet<IdentityToken>,
}

impl ScriptedWorld {
    /// An empty world at tick 0, time 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the tick counter by one and the clock by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.tick += 1;
        self.time += dt;
    }

    /// Adds or replaces an entity.
    pub fn spawn(&mut self, entity: ScriptedEntity) {
        self.entities.insert(entity.token, entity);
    }

    /// Removes an entity; its token stops resolving.
    pub fn despawn(&mut self, token: IdentityToken) -> Option<ScriptedEntity> {
        self.entities.remove(&token)
    }

    /// Mutable access to an entity.
    pub fn entity_mut(&mut self, token: IdentityToken) -> Option<&mut ScriptedEntity> {
        self.entities.get_mut(&token)
    }

    /// Sets the viewer.
    pub fn set_viewer(&mut self, token: IdentityToken) {
        self.viewer = Some(token);
    }

    /// Points a 90° vertical field of view camera from `eye` at `target`, Z up.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, aspect: f32) {
        let projection = Mat4::perspective_rh(90f32.to_radians(), aspect, 1.0, 8192.0);
        self.view_projection = projection * Mat4::look_at_rh(eye, target, Vec3::Z);
    }
}

impl Simulation for ScriptedWorld {
    type Entity = ScriptedEntity;

    fn tick(&self) -> u64 {
        self.tick
    }

    fn real_time(&self) -> f32 {
        self.time
    }

    fn live_entities(&self) -> impl Iterator<Item = &ScriptedEntity> + '_ {
        self.entities.values()
    }

    fn resolve(&self, token: IdentityToken) -> Option<&ScriptedEntity> {
        self.entities.get(&token)
    }

    fn viewer(&self) -> Option<&ScriptedEntity> {
        self.viewer.and_then(|token| self.entities.get(&token))
    }

    fn view_projection(&self) -> Mat4 {
        self.view_projection
    }

    fn sound_sources(&self) -> &[i32] {
        &self.sound_sources
    }

    fn localize(&self, key: &str) -> Option<String> {
        self.strings.get(key).cloned()
    }

    fn game_mode(&self) -> GameMode {
        self.game_mode
    }

    fn line_of_sight(&self, _from: &ScriptedEntity, to: &ScriptedEntity) -> bool {
        !self.occluded.contains(&to.token)
    }

    fn planted_device(&self) -> Option<DeviceState> {
        self.device
    }

    fn site_centers(&self) -> Option<(Vec3, Vec3)> {
        self.sites
    }

    fn avatar_rgba(&self, account_id: u64) -> Option<Vec<u8>> {
        self.avatars.get(&account_id).cloned()
    }
}
