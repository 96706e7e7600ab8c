//! # Snapshot Pass Benchmark
//!
//! Measures one full `advance` over a scripted world: walk, merge, sort,
//! fade and evict.
//!
//! Target: a 64-actor, 32-projectile pass well under 100µs.

#![allow(missing_docs)]

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Affine3A, Vec2, Vec3};
use vantage_snapshot::{
    ActorState, Bone, CacheConfig, HeadHitbox, IdentityToken, ProjectileKind, PropKind,
    ResourceCache, ResourceSet, ScriptedEntity, ScriptedWorld, Skeleton, SnapshotCache, Team,
    TextureBackend, TextureError, TextureId,
};

struct NullBackend;

impl TextureBackend for NullBackend {
    fn upload_rgba(&self, _: u32, _: u32, _: &[u8]) -> Result<TextureId, TextureError> {
        Ok(TextureId(1))
    }

    fn destroy(&self, _: TextureId) {}
}

fn skeleton(origin: Vec3) -> Skeleton {
    let bones = (0..24)
        .map(|i| Bone {
            transform: Affine3A::from_translation(origin + Vec3::Z * (i as f32 * 3.0)),
            parent: i.checked_sub(1),
            hitbox: i % 3 != 2,
        })
        .collect();
    Skeleton {
        bones,
        head: Some(HeadHitbox {
            bone: 20,
            min: Vec3::splat(-3.0),
            max: Vec3::splat(3.0),
            capsule_radius: 2.0,
        }),
    }
}

fn populated(actors: i32) -> ScriptedWorld {
    let mut world = ScriptedWorld::new();
    world.spawn(ScriptedEntity::actor(
        1,
        Vec3::ZERO,
        ActorState {
            alive: true,
            ..ActorState::default()
        },
    ));
    world.set_viewer(IdentityToken(1));
    world.look_at(Vec3::new(0.0, 0.0, 64.0), Vec3::new(1.0, 0.0, 64.0), 16.0 / 9.0);

    for i in 0..actors {
        let angle = i as f32 * 0.37;
        let origin = Vec3::new(angle.cos(), angle.sin(), 0.0) * (200.0 + i as f32 * 10.0);
        let mut entity = ScriptedEntity::actor(
            100 + i,
            origin,
            ActorState {
                name: format!("bot{i}"),
                team: if i % 2 == 0 { Team::Attackers } else { Team::Defenders },
                alive: true,
                health: 100,
                enemy: i % 2 == 0,
                ..ActorState::default()
            },
        );
        entity.skeleton = Some(skeleton(origin));
        world.spawn(entity);
    }
    for i in 0..actors / 2 {
        world.spawn(ScriptedEntity::projectile(
            1000 + i,
            ProjectileKind::Smoke,
            Vec3::new(100.0 + i as f32, 0.0, 40.0),
            None,
        ));
        world.spawn(ScriptedEntity::prop(2000 + i, PropKind::Chicken, Vec3::new(0.0, 50.0 * i as f32, 0.0)));
    }
    world
}

fn cache() -> SnapshotCache {
    SnapshotCache::new(
        CacheConfig::default(),
        ResourceCache::new(Arc::new(NullBackend), ResourceSet::default()),
    )
}

/// Benchmark a steady-state pass: every record already exists
fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_advance");

    for actors in [16, 64, 256] {
        let mut world = populated(actors);
        let cache = cache();
        cache.advance(&world);

        group.bench_with_input(BenchmarkId::new("steady_state", actors), &actors, |b, _| {
            b.iter(|| {
                world.step(1.0 / 64.0);
                for entity in world.entities.values_mut() {
                    entity.origin.x += 0.5;
                }
                black_box(cache.advance(&world))
            });
        });
    }

    group.finish();
}

/// Benchmark the consumer side: read every actor and project its head
fn bench_read_and_project(c: &mut Criterion) {
    let world = populated(64);
    let cache = cache();
    cache.advance(&world);
    let viewport = Vec2::new(1920.0, 1080.0);

    c.bench_function("snapshot_read_project_64", |b| {
        b.iter(|| {
            let view = cache.read();
            let mut on_screen = 0usize;
            for actor in view.actors() {
                if view.project(actor.origin + Vec3::Z * 72.0, viewport, true).is_some() {
                    on_screen += 1;
                }
            }
            black_box(on_screen)
        });
    });
}

criterion_group!(benches, bench_advance, bench_read_and_project);
criterion_main!(benches);
