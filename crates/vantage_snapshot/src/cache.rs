//! # Snapshot Cache
//!
//! The object the application owns: one per simulation session.
//!
//! ```text
//! producer (tick callback)        consumer (render callback)
//!   cache.advance(&sim)             let view = cache.read();
//!        │                          for actor in view.actors() { .. }
//!        ▼                          drop(view);
//!   TickGate ─ SnapshotLock ─────── cache.actor_avatar_texture(token)
//!                                      (upload happens outside the lock)
//! ```

use glam::{Vec2, Vec3};
use vantage_core::{ReadGuard, SnapshotLock, TickGate};
use vantage_shared::IdentityToken;

use crate::config::CacheConfig;
use crate::frame::Snapshot;
use crate::provider::Simulation;
use crate::textures::{ResourceCache, TextureId};

/// Read access to the last completed pass. Hold it briefly; the producer
/// waits on it.
pub type SnapshotView<'a> = ReadGuard<'a, Snapshot>;

/// Per-tick snapshot of simulation entities for an overlay renderer.
///
/// All methods take `&self`; share the cache between the producer and
/// consumer threads with an `Arc`.
#[derive(Debug)]
pub struct SnapshotCache {
    config: CacheConfig,
    resources: ResourceCache,
    gate: TickGate,
    state: SnapshotLock<Snapshot>,
}

impl SnapshotCache {
    /// Creates an empty cache.
    ///
    /// Out-of-range settings fall back to their defaults with a warning.
    #[must_use]
    pub fn new(config: CacheConfig, resources: ResourceCache) -> Self {
        let config = config.sanitized();
        let state = SnapshotLock::new(Snapshot::new(config.projection_epsilon));
        Self {
            config,
            resources,
            gate: TickGate::new(),
            state,
        }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Runs one pass if `sim` is on a tick not yet processed.
    ///
    /// Returns true if a pass ran. Repeated calls within one tick are no-ops.
    pub fn advance<S: Simulation>(&self, sim: &S) -> bool {
        if !self.gate.enter(sim.tick()) {
            return false;
        }
        let released = self.state.write().rebuild(sim, &self.config);
        let backend = self.resources.backend();
        for avatar in released {
            avatar.texture().retire(backend);
        }
        true
    }

    /// Locks the last completed pass for reading.
    #[must_use]
    pub fn read(&self) -> SnapshotView<'_> {
        self.state.read()
    }

    /// Like [`read`](Self::read), but gives up instead of waiting for a pass
    /// in progress.
    #[must_use]
    pub fn try_read(&self) -> Option<SnapshotView<'_>> {
        self.state.try_read()
    }

    /// Number of completed write passes, including maintenance calls.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state.generation()
    }

    /// Projects a world point into viewport pixels with the current view.
    #[must_use]
    pub fn project(&self, point: Vec3, viewport: Vec2, snap: bool) -> Option<Vec2> {
        self.state.read().project(point, viewport, snap)
    }

    /// Forgets every projectile and its trajectory (session reset).
    pub fn clear_transient_long_lived_state(&self) {
        self.state.write().clear_projectiles();
    }

    /// Releases every texture; each is re-created lazily on next access.
    ///
    /// Call on graphics context loss or teardown.
    pub fn invalidate_all_textures(&self) {
        self.resources.invalidate_all();
        let avatars = self.state.read().avatars();
        let backend = self.resources.backend();
        for avatar in avatars {
            avatar.texture().invalidate(backend);
        }
    }

    /// Avatar texture for an actor, falling back to its team default.
    pub fn actor_avatar_texture(&self, token: IdentityToken) -> Option<TextureId> {
        let (avatar, team) = {
            let state = self.state.read();
            let actor = state.actor(token)?;
            (actor.avatar.clone(), actor.team)
        };

        match avatar {
            Some(avatar) => self.resources.avatar_texture(&avatar),
            None => self.resources.default_avatar(team),
        }
    }

    /// Rank icon texture for an actor, from the bank the game mode selects.
    pub fn actor_rank_texture(&self, token: IdentityToken) -> Option<TextureId> {
        let (mode, rank) = {
            let state = self.state.read();
            let actor = state.actor(token)?;
            (state.game_mode(), actor.rank)
        };
        self.resources.rank_texture(mode, rank)
    }
}
