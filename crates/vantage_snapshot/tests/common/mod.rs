//! Shared fixtures for the snapshot cache integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use vantage_snapshot::{
    ActorState, CacheConfig, EncodedImage, IdentityToken, ResourceCache, ResourceSet,
    ScriptedEntity, ScriptedWorld, SnapshotCache, Team, TextureBackend, TextureError, TextureId,
};
use glam::{Vec2, Vec3};

pub const VIEWER: IdentityToken = IdentityToken(1);
pub const EYE: Vec3 = Vec3::new(0.0, 0.0, 64.0);
pub const VIEWPORT: Vec2 = Vec2::new(1920.0, 1080.0);
/// Tick length used by the scenarios; a power of two keeps clock sums exact.
pub const DT: f32 = 0.25;

/// 1x1 opaque red PNG.
pub const RED_PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53,
    0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8, 0xCF, 0xC0, 0x00,
    0x00, 0x03, 0x01, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0xB0, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E,
    0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Texture backend that hands out sequential ids and records every call.
#[derive(Default)]
pub struct CountingBackend {
    next: AtomicU64,
    uploads: AtomicUsize,
    pub destroyed: Mutex<Vec<TextureId>>,
}

impl CountingBackend {
    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

impl TextureBackend for CountingBackend {
    fn upload_rgba(&self, width: u32, height: u32, pixels: &[u8]) -> Result<TextureId, TextureError> {
        assert_eq!(pixels.len(), (width * height * 4) as usize);
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(TextureId(self.next.fetch_add(1, Ordering::SeqCst) + 1))
    }

    fn destroy(&self, texture: TextureId) {
        self.destroyed.lock().push(texture);
    }
}

pub fn resource_set() -> ResourceSet {
    let icon = || EncodedImage::from_static(RED_PIXEL_PNG);
    ResourceSet {
        competitive_ranks: (0..19).map(|_| icon()).collect(),
        survival_ranks: (0..16).map(|_| icon()).collect(),
        attackers_avatar: Some(icon()),
        defenders_avatar: Some(icon()),
    }
}

pub fn cache_with(config: CacheConfig) -> (SnapshotCache, Arc<CountingBackend>) {
    let backend = Arc::new(CountingBackend::default());
    let resources = ResourceCache::new(backend.clone(), resource_set());
    (SnapshotCache::new(config, resources), backend)
}

pub fn cache() -> (SnapshotCache, Arc<CountingBackend>) {
    cache_with(CacheConfig::default())
}

pub fn alive(name: &str, team: Team) -> ActorState {
    ActorState {
        user_id: name.len() as i32,
        name: name.to_owned(),
        team,
        alive: true,
        health: 100,
        ..ActorState::default()
    }
}

pub fn enemy(name: &str) -> ActorState {
    ActorState {
        enemy: true,
        ..alive(name, Team::Attackers)
    }
}

/// A world at tick 0 with a living viewer at the origin looking down +X.
pub fn world() -> ScriptedWorld {
    let mut world = ScriptedWorld::new();
    world.spawn(ScriptedEntity::actor(VIEWER.0, Vec3::ZERO, alive("viewer", Team::Defenders)));
    world.set_viewer(VIEWER);
    world.look_at(EYE, EYE + Vec3::X, VIEWPORT.x / VIEWPORT.y);
    world
}
