//! Mobile actor records.

use std::sync::Arc;

use glam::Vec3;
use tracing::warn;
use vantage_core::Keyed;
use vantage_shared::constants::BONE_SEGMENT_RESERVE;
use vantage_shared::{Aabb, BoneSegment, IdentityToken};

use super::{Observation, SpatialSnapshot};
use crate::provider::{ActorState, SimEntity, Simulation, Skeleton, Team};
use crate::textures::{Avatar, PixelBuffer};

/// Snapshot of one actor, merged across ticks by identity token.
#[derive(Clone, Debug)]
pub struct ActorRecord {
    /// Derived geometry.
    pub spatial: SpatialSnapshot,
    /// Join key.
    pub token: IdentityToken,
    /// Session-scoped user id.
    pub user_id: i32,
    /// Account the avatar was fetched for.
    pub account_id: Option<u64>,
    /// Display name, refreshed periodically.
    pub name: String,
    /// Team affiliation.
    pub team: Team,
    /// Alive.
    pub alive: bool,
    /// Dormant at the last observation.
    pub dormant: bool,
    /// Health points.
    pub health: i32,
    /// Armor points.
    pub armor: i32,
    /// Money.
    pub money: i32,
    /// Rank index (clamped only when the icon is looked up).
    pub rank: i32,
    /// Localized place name.
    pub last_place_name: String,
    /// World position at the last non-dormant observation.
    pub origin: Vec3,
    /// Bounds intersect the view frustum.
    pub in_frustum: bool,
    /// In frustum, alive and in line of sight of the viewer.
    pub visible: bool,
    /// The actor or its weapon is emitting sound.
    pub audible: bool,
    /// Hostile to the viewer.
    pub enemy: bool,
    /// Spotted on the radar.
    pub spotted: bool,
    /// Spawn-protected.
    pub immune: bool,
    /// Remaining flash blindness in seconds.
    pub flash_duration: f32,
    /// Localized name of the held weapon.
    pub active_weapon: String,
    /// Hitbox bone segments, world space.
    pub bones: Vec<BoneSegment>,
    /// Head hitbox corners, world space.
    pub head_box: Option<Aabb>,
    /// Real time after which a disappeared actor is dropped.
    pub fade_until: Option<f32>,
    pub(crate) avatar: Option<Arc<Avatar>>,
}

impl Keyed for ActorRecord {
    type Key = IdentityToken;

    #[inline]
    fn key(&self) -> IdentityToken {
        self.token
    }
}

impl ActorRecord {
    /// Builds a record for an actor seen for the first time.
    pub(crate) fn new<S: Simulation>(
        entity: &S::Entity,
        state: &ActorState,
        obs: &Observation<'_, S>,
    ) -> Self {
        let mut record = Self {
            spatial: SpatialSnapshot::default(),
            token: entity.token(),
            user_id: state.user_id,
            account_id: state.account_id,
            name: state.name.clone(),
            team: state.team,
            alive: state.alive,
            dormant: false,
            health: state.health,
            armor: state.armor,
            money: state.money,
            rank: state.rank,
            last_place_name: obs.localize(state.place_key.as_deref()),
            origin: entity.origin(),
            in_frustum: false,
            visible: false,
            audible: false,
            enemy: state.enemy,
            spotted: false,
            immune: false,
            flash_duration: 0.0,
            active_weapon: String::new(),
            bones: Vec::new(),
            head_box: None,
            fade_until: None,
            avatar: fetch_avatar(obs.sim, state.account_id, obs.config.avatar_size),
        };
        record.update(entity, state, obs);
        record
    }

    /// Merges a fresh observation into the record.
    ///
    /// A dormant actor only refreshes geometry, rank, armor, alive and
    /// health, and starts its fade timer.
    pub(crate) fn update<S: Simulation>(
        &mut self,
        entity: &S::Entity,
        state: &ActorState,
        obs: &Observation<'_, S>,
    ) {
        self.spatial = SpatialSnapshot::capture(entity, obs.viewer_origin);

        if obs.tick.checked_rem(obs.config.name_refresh_interval) == Some(0) {
            self.name.clone_from(&state.name);
        }
        self.rank = state.rank;
        self.armor = state.armor;

        self.dormant = entity.is_dormant();
        if self.dormant {
            self.fade_until.get_or_insert(obs.now + obs.config.actor_fade_secs);
            self.alive = state.alive;
            self.health = state.health;
            return;
        }

        self.money = state.money;
        self.team = state.team;
        self.last_place_name = obs.localize(state.place_key.as_deref());
        self.fade_until = None;
        self.origin = entity.origin();
        self.in_frustum = obs
            .frustum
            .test_aabb(&self.spatial.world_bounds(self.origin));
        self.alive = state.alive;
        self.enemy = state.enemy;
        self.visible = self.in_frustum && self.alive && obs.sim.line_of_sight(obs.viewer, entity);

        self.audible = obs.is_audible(entity.index());
        self.spotted = state.spotted;
        self.immune = state.immune;
        self.flash_duration = state.flash_duration;
        self.health = state.health;

        if let Some(weapon) = &state.active_weapon {
            self.audible = self.audible || obs.is_audible(weapon.index);
            if let Some(name) = weapon.name_key.as_deref().and_then(|key| obs.sim.localize(key)) {
                self.active_weapon = name;
            }
        }

        if !self.alive || !self.in_frustum {
            return;
        }
        if let Some(skeleton) = entity.skeleton() {
            self.pose(&skeleton);
        }
    }

    /// Rebuilds bone segments and the head box from a posed skeleton.
    fn pose(&mut self, skeleton: &Skeleton) {
        self.bones.clear();
        self.bones.reserve(BONE_SEGMENT_RESERVE);

        for bone in skeleton.bones.iter().filter(|bone| bone.hitbox) {
            let Some(parent) = bone.parent.and_then(|index| skeleton.bones.get(index)) else {
                continue;
            };
            self.bones.push(BoneSegment::new(
                bone.transform.translation.into(),
                parent.transform.translation.into(),
            ));
        }

        let Some(head) = skeleton.head else {
            return;
        };
        let Some(bone) = skeleton.bones.get(head.bone) else {
            warn!(token = %self.token, bone = head.bone, "head hitbox refers to a missing bone");
            return;
        };

        let head_box = Aabb::new(
            bone.transform.transform_point3(head.min),
            bone.transform.transform_point3(head.max),
        );
        self.head_box = Some(if head.capsule_radius > 0.0 {
            head_box.inflated(head.capsule_radius)
        } else {
            head_box
        });
    }

    /// True if `state` describes the entity this record was built for.
    ///
    /// Tokens are reused; a different user or account behind the same
    /// token is a new occupant.
    #[must_use]
    pub fn same_occupant(&self, state: &ActorState) -> bool {
        self.user_id == state.user_id && self.account_id == state.account_id
    }

    /// True if the actor has its own avatar bitmap.
    #[must_use]
    pub fn has_avatar(&self) -> bool {
        self.avatar.is_some()
    }

    /// Seconds of fade left at `now`, or `None` if the actor is not fading.
    #[must_use]
    pub fn fade_remaining(&self, now: f32) -> Option<f32> {
        self.fade_until.map(|until| (until - now).max(0.0))
    }

    /// Hands over the avatar for release outside the snapshot lock.
    pub(crate) fn take_avatar(&mut self) -> Option<Arc<Avatar>> {
        self.avatar.take()
    }
}

fn fetch_avatar<S: Simulation>(sim: &S, account: Option<u64>, size: u32) -> Option<Arc<Avatar>> {
    let rgba = sim.avatar_rgba(account?)?;
    match PixelBuffer::from_rgba(size, size, rgba) {
        Ok(pixels) => Some(Arc::new(Avatar::new(pixels))),
        Err(err) => {
            warn!(%err, "avatar bitmap rejected");
            None
        }
    }
}
