//! # Soak World
//!
//! A seeded [`ScriptedWorld`] that keeps moving: actors orbit the viewer,
//! drop in and out of dormancy, die and respawn, and throw projectiles
//! that arc, land and are eventually removed.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::{Affine3A, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use vantage_snapshot::{
    ActorState, Bone, DeviceState, HeadHitbox, HeldWeapon, IdentityToken, ProjectileKind,
    PropKind, ScriptedEntity, ScriptedWorld, Skeleton, Team, ViewerState, ViewerWeapon,
};

use crate::config::SoakConfig;

/// The viewer is always this token.
pub const VIEWER: IdentityToken = IdentityToken(1);

/// Viewer eye height above its origin.
const EYE_HEIGHT: f32 = 64.0;

const GRAVITY: f32 = 800.0;

/// Bone heights of the generated skeleton; the last one is the head.
const BONE_HEIGHTS: [f32; 6] = [0.0, 20.0, 38.0, 48.0, 56.0, 64.0];

const THROWN: [ProjectileKind; 5] = [
    ProjectileKind::Grenade,
    ProjectileKind::Smoke,
    ProjectileKind::Molotov,
    ProjectileKind::Decoy,
    ProjectileKind::Sensor,
];

#[derive(Clone, Copy, Debug)]
struct Orbit {
    token: IdentityToken,
    radius: f32,
    speed: f32,
    phase: f32,
    respawn_at: Option<u64>,
}

impl Orbit {
    fn position(&self, time: f32) -> Vec3 {
        let angle = self.phase + self.speed * time;
        Vec3::new(angle.cos(), angle.sin(), 0.0) * self.radius
    }
}

#[derive(Clone, Copy, Debug)]
struct Flight {
    token: IdentityToken,
    velocity: Vec3,
    remove_at: u64,
}

/// Seeded moving world for the soak driver.
#[derive(Debug)]
pub struct SoakWorld {
    world: ScriptedWorld,
    rng: ChaCha8Rng,
    orbits: Vec<Orbit>,
    flights: VecDeque<Flight>,
    next_token: i32,
    dt: f32,
    aspect: f32,
    projectile_interval: u64,
    projectile_lifetime: u64,
}

impl SoakWorld {
    /// Builds the initial world from `config`.
    #[must_use]
    pub fn new(config: &SoakConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut world = ScriptedWorld::new();

        let mut viewer = ScriptedEntity::actor(
            VIEWER.0,
            Vec3::ZERO,
            ActorState {
                name: "viewer".to_owned(),
                team: Team::Defenders,
                alive: true,
                health: 100,
                ..ActorState::default()
            },
        );
        viewer.viewer = ViewerState {
            weapon: Some(ViewerWeapon::default()),
            fov: 90,
            default_fov: 90,
            ..ViewerState::default()
        };
        world.spawn(viewer);
        world.set_viewer(VIEWER);

        let bitmap_len = (config.cache.avatar_size * config.cache.avatar_size * 4) as usize;
        let mut orbits = Vec::with_capacity(config.actors as usize);
        for i in 0..config.actors {
            let token = IdentityToken(i as i32 + 2);
            let orbit = Orbit {
                token,
                radius: rng.gen_range(150.0..1500.0),
                speed: rng.gen_range(0.1..0.8) * if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
                phase: rng.gen_range(0.0..TAU),
                respawn_at: None,
            };
            let team = if i % 2 == 0 { Team::Attackers } else { Team::Defenders };
            let account = 1_000 + u64::from(i);
            if rng.gen_bool(0.5) {
                let shade: u8 = rng.gen();
                world.avatars.insert(account, vec![shade; bitmap_len]);
            }

            let origin = orbit.position(0.0);
            let mut entity = ScriptedEntity::actor(
                token.0,
                origin,
                ActorState {
                    user_id: token.0,
                    name: format!("bot_{i:02}"),
                    account_id: Some(account),
                    team,
                    alive: true,
                    health: 100,
                    armor: rng.gen_range(0..=100),
                    money: rng.gen_range(800..16_000),
                    rank: rng.gen_range(0..24),
                    enemy: team == Team::Attackers,
                    active_weapon: Some(HeldWeapon {
                        index: token.0 + 512,
                        name_key: Some("#weapon_rifle".to_owned()),
                    }),
                    ..ActorState::default()
                },
            );
            entity.skeleton = Some(skeleton(origin));
            world.spawn(entity);
            orbits.push(orbit);
        }

        let mut next_token = config.actors as i32 + 2;
        for (kind, origin) in [
            (PropKind::Chicken, Vec3::new(300.0, 120.0, 0.0)),
            (PropKind::AmmoBox, Vec3::new(-400.0, 80.0, 0.0)),
            (PropKind::Hostage, Vec3::new(900.0, -300.0, 0.0)),
        ] {
            world.spawn(ScriptedEntity::prop(next_token, kind, origin));
            next_token += 1;
        }
        world.spawn(ScriptedEntity::area_effect(
            next_token,
            Vec3::new(600.0, 0.0, 0.0),
            (0..8)
                .map(|i| Vec3::new(600.0 + 20.0 * i as f32, 0.0, 0.0))
                .collect(),
        ));
        next_token += 1;

        world.sites = Some((Vec3::new(1200.0, 400.0, 0.0), Vec3::new(-1200.0, -400.0, 0.0)));
        world.device = Some(DeviceState {
            ticking: true,
            origin: Vec3::new(1150.0, 420.0, 0.0),
            detonation_time: 40.0,
            timer_length: 40.0,
            ..DeviceState::default()
        });
        world.strings.insert("#weapon_rifle".to_owned(), "Rifle".to_owned());

        let aspect = config.viewport[0] / config.viewport[1];
        world.look_at(Vec3::Z * EYE_HEIGHT, Vec3::new(1.0, 0.0, EYE_HEIGHT), aspect);

        Self {
            world,
            rng,
            orbits,
            flights: VecDeque::new(),
            next_token,
            dt: config.tick_interval(),
            aspect,
            projectile_interval: u64::from(config.projectile_interval.max(1)),
            projectile_lifetime: u64::from(config.projectile_lifetime),
        }
    }

    /// The world as the cache sees it.
    #[must_use]
    pub const fn world(&self) -> &ScriptedWorld {
        &self.world
    }

    /// Projectiles currently in the world.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.flights.len()
    }

    /// Advances one tick.
    pub fn step(&mut self) {
        self.world.step(self.dt);
        let tick = self.world.tick;
        let time = self.world.time;

        let yaw = time * 0.3;
        let eye = Vec3::Z * EYE_HEIGHT;
        self.world
            .look_at(eye, eye + Vec3::new(yaw.cos(), yaw.sin(), 0.0), self.aspect);

        for orbit in &mut self.orbits {
            let Some(entity) = self.world.entities.get_mut(&orbit.token) else {
                continue;
            };
            let origin = orbit.position(time);
            entity.origin = origin;
            entity.skeleton = Some(skeleton(origin));

            if self.rng.gen_ratio(1, 256) {
                entity.dormant = !entity.dormant;
            }
            let Some(state) = entity.actor_mut() else {
                continue;
            };
            match orbit.respawn_at {
                Some(at) if at <= tick => {
                    state.alive = true;
                    state.health = 100;
                    orbit.respawn_at = None;
                }
                None if self.rng.gen_ratio(1, 1024) => {
                    state.alive = false;
                    state.health = 0;
                    orbit.respawn_at = Some(tick + 192);
                }
                _ => {}
            }
        }

        self.fly(tick);
        if tick % self.projectile_interval == 0 {
            self.throw(tick);
        }
    }

    fn fly(&mut self, tick: u64) {
        while let Some(flight) = self.flights.front() {
            if flight.remove_at > tick {
                break;
            }
            self.world.despawn(flight.token);
            self.flights.pop_front();
        }

        for flight in &mut self.flights {
            let Some(entity) = self.world.entities.get_mut(&flight.token) else {
                continue;
            };
            if entity.origin.z <= 0.0 && flight.velocity.z <= 0.0 {
                continue;
            }
            flight.velocity.z -= GRAVITY * self.dt;
            entity.origin += flight.velocity * self.dt;
            if entity.origin.z <= 0.0 {
                entity.origin.z = 0.0;
                flight.velocity = Vec3::ZERO;
            }
        }
    }

    fn throw(&mut self, tick: u64) {
        if self.orbits.is_empty() {
            return;
        }
        let thrower = self.orbits[self.rng.gen_range(0..self.orbits.len())].token;
        let Some(origin) = self.world.entities.get(&thrower).map(|e| e.origin) else {
            return;
        };
        let kind = THROWN[self.rng.gen_range(0..THROWN.len())];
        let heading = self.rng.gen_range(0.0..TAU);
        let velocity = Vec3::new(heading.cos() * 400.0, heading.sin() * 400.0, 300.0);

        let token = IdentityToken(self.next_token);
        self.next_token += 1;
        self.world.spawn(ScriptedEntity::projectile(
            token.0,
            kind,
            origin + Vec3::Z * EYE_HEIGHT,
            Some(thrower),
        ));
        self.flights.push_back(Flight {
            token,
            velocity,
            remove_at: tick + self.projectile_lifetime,
        });
    }
}

/// A straight spine from the feet to the head, every bone a hitbox.
fn skeleton(origin: Vec3) -> Skeleton {
    let bones = BONE_HEIGHTS
        .iter()
        .enumerate()
        .map(|(i, height)| Bone {
            transform: Affine3A::from_translation(origin + Vec3::Z * *height),
            parent: i.checked_sub(1),
            hitbox: true,
        })
        .collect();
    Skeleton {
        bones,
        head: Some(HeadHitbox {
            bone: BONE_HEIGHTS.len() - 1,
            min: Vec3::new(-4.0, -4.0, -2.0),
            max: Vec3::new(4.0, 4.0, 6.0),
            capsule_radius: 1.5,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SoakConfig {
        SoakConfig {
            actors: 6,
            projectile_interval: 4,
            projectile_lifetime: 10,
            ..SoakConfig::default()
        }
    }

    #[test]
    fn test_initial_population() {
        let soak = SoakWorld::new(&config());
        let actors = soak
            .world()
            .entities
            .values()
            .filter(|e| e.actor.is_some())
            .count();
        assert_eq!(actors, 7);
        assert_eq!(soak.world().viewer, Some(VIEWER));
        assert!(soak.world().device.is_some());
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = SoakWorld::new(&config());
        let mut b = SoakWorld::new(&config());
        for _ in 0..200 {
            a.step();
            b.step();
        }
        let origins = |w: &SoakWorld| -> Vec<Vec3> {
            w.world().entities.values().map(|e| e.origin).collect()
        };
        assert_eq!(origins(&a), origins(&b));
    }

    #[test]
    fn test_projectiles_are_thrown_and_removed() {
        let mut soak = SoakWorld::new(&config());
        for _ in 0..4 {
            soak.step();
        }
        assert_eq!(soak.in_flight(), 1);

        for _ in 0..100 {
            soak.step();
        }
        // lifetime 10, one throw every 4 ticks
        assert!(soak.in_flight() <= 3);
        let live_projectiles = soak
            .world()
            .entities
            .values()
            .filter(|e| e.projectile.is_some())
            .count();
        assert_eq!(live_projectiles, soak.in_flight());
    }

    #[test]
    fn test_projectiles_land() {
        let mut soak = SoakWorld::new(&SoakConfig {
            projectile_lifetime: 10_000,
            ..config()
        });
        for _ in 0..4 {
            soak.step();
        }
        for _ in 0..400 {
            soak.step();
        }
        let first = soak
            .world()
            .entities
            .values()
            .find(|e| e.projectile.is_some())
            .map(|e| e.origin);
        assert_eq!(first.map(|o| o.z), Some(0.0));
    }
}
