//! # Soak Driver
//!
//! ```text
//! producer:  step world → advance → send PassStats → sleep to next tick
//!            (halfway: drop every texture, as on graphics context loss)
//! consumer:  wait one frame → read + project → textures outside the lock
//! main:      aggregate events → info! once per second → join
//! ```
//!
//! The producer owns the stop channel. When it finishes, the channel
//! disconnects and the consumer exits on its next frame.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use glam::{Vec2, Vec3};
use tracing::{debug, info};
use vantage_shared::constants::{COMPETITIVE_RANK_COUNT, SURVIVAL_RANK_COUNT};
use vantage_snapshot::{
    IdentityToken, PassStats, ResourceCache, ResourceSet, SnapshotCache,
};

use crate::backend::{solid_png, HeadlessBackend};
use crate::config::{SoakConfig, SoakError, SoakResult};
use crate::world::SoakWorld;

/// Edge length of the generated rank icons.
const ICON_SIZE: u32 = 8;

/// Totals over a whole soak run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SoakReport {
    /// Ticks the producer stepped.
    pub ticks: u64,
    /// Passes the cache actually ran.
    pub passes: u64,
    /// Overlay frames drawn.
    pub frames: u64,
    /// Points that projected on screen.
    pub projected: u64,
    /// Largest actor count seen in one pass.
    pub peak_actors: usize,
    /// Largest projectile count seen in one pass.
    pub peak_projectiles: usize,
    /// Persistent records created.
    pub created: u64,
    /// Persistent records evicted.
    pub evicted: u64,
    /// Avatar and rank lookups that yielded a texture.
    pub textures_resolved: u64,
    /// Texture uploads.
    pub uploads: u64,
    /// Textures alive at the end of the run.
    pub textures_live: usize,
    /// Destroy calls for textures that were not alive.
    pub double_releases: u64,
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameStats {
    projected: u64,
    textures: u64,
}

#[derive(Clone, Copy, Debug)]
enum Event {
    Pass {
        stats: PassStats,
        actors: usize,
        projectiles: usize,
    },
    Frame(FrameStats),
}

/// Runs a soak to completion and returns its totals.
///
/// # Errors
///
/// Returns [`SoakError::Encode`] if the resource images cannot be built,
/// [`SoakError::Spawn`] if a thread cannot start and
/// [`SoakError::Panicked`] if one dies.
pub fn run(config: &SoakConfig) -> SoakResult<SoakReport> {
    config.validate()?;
    let backend = Arc::new(HeadlessBackend::new());
    let resources = ResourceCache::new(backend.clone(), resource_set()?);
    let cache = SnapshotCache::new(config.cache.clone(), resources);
    let world = SoakWorld::new(config);

    info!(
        actors = config.actors,
        ticks = config.ticks,
        tick_rate = config.tick_rate,
        render_rate = config.render_rate,
        "soak starting"
    );

    let mut report = thread::scope(|scope| -> SoakResult<SoakReport> {
        let (events_tx, events_rx) = bounded::<Event>(1024);
        let (stop_tx, stop_rx) = bounded::<()>(0);
        let cache = &cache;

        let producer_events = events_tx.clone();
        let producer = thread::Builder::new()
            .name("vantage-producer".to_owned())
            .spawn_scoped(scope, move || produce(world, cache, config, &producer_events, stop_tx))
            .map_err(|source| SoakError::Spawn {
                name: "producer",
                source,
            })?;

        let consumer = thread::Builder::new()
            .name("vantage-consumer".to_owned())
            .spawn_scoped(scope, move || consume(cache, config, &events_tx, &stop_rx))
            .map_err(|source| SoakError::Spawn {
                name: "consumer",
                source,
            })?;

        let mut report = aggregate(&events_rx);
        report.ticks = producer.join().map_err(|_| SoakError::Panicked("producer"))?;
        consumer.join().map_err(|_| SoakError::Panicked("consumer"))?;
        Ok(report)
    })?;

    report.uploads = backend.uploads();
    report.textures_live = backend.live();
    report.double_releases = backend.double_releases();

    info!(
        ticks = report.ticks,
        passes = report.passes,
        frames = report.frames,
        created = report.created,
        evicted = report.evicted,
        uploads = report.uploads,
        textures_live = report.textures_live,
        double_releases = report.double_releases,
        "soak finished"
    );
    Ok(report)
}

fn resource_set() -> SoakResult<ResourceSet> {
    let bank = |count: usize, green: u8| {
        (0..count)
            .map(|i| solid_png(ICON_SIZE, [(i * 12) as u8, green, 0, 255]))
            .collect::<Result<Vec<_>, _>>()
    };
    Ok(ResourceSet {
        competitive_ranks: bank(COMPETITIVE_RANK_COUNT, 0)?,
        survival_ranks: bank(SURVIVAL_RANK_COUNT, 200)?,
        attackers_avatar: Some(solid_png(ICON_SIZE, [200, 120, 0, 255])?),
        defenders_avatar: Some(solid_png(ICON_SIZE, [0, 80, 200, 255])?),
    })
}

/// Producer loop. Returns the number of ticks stepped.
fn produce(
    mut world: SoakWorld,
    cache: &SnapshotCache,
    config: &SoakConfig,
    events: &Sender<Event>,
    _stop: Sender<()>,
) -> u64 {
    let period = (config.tick_rate > 0)
        .then(|| Duration::from_secs_f64(1.0 / f64::from(config.tick_rate)));
    let started = Instant::now();
    let halfway = config.ticks / 2;

    let mut stepped = 0;
    while stepped < config.ticks {
        world.step();
        stepped += 1;

        if cache.advance(world.world()) {
            let event = {
                let view = cache.read();
                Event::Pass {
                    stats: view.stats(),
                    actors: view.actors().len(),
                    projectiles: view.projectiles().len(),
                }
            };
            if events.send(event).is_err() {
                break;
            }
        }

        if stepped == halfway {
            debug!(tick = stepped, "dropping every texture");
            cache.invalidate_all_textures();
        }

        if let Some(period) = period {
            let deadline = started + period.mul_f64(stepped as f64);
            if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
                thread::sleep(wait);
            }
        }
    }

    cache.clear_transient_long_lived_state();
    stepped
}

/// Consumer loop: one overlay frame per `render_rate` tick until stopped.
fn consume(cache: &SnapshotCache, config: &SoakConfig, events: &Sender<Event>, stop: &Receiver<()>) {
    let frame = Duration::from_secs_f64(1.0 / f64::from(config.render_rate));
    let viewport = Vec2::from(config.viewport);
    let mut tokens: Vec<IdentityToken> = Vec::new();

    loop {
        match stop.recv_timeout(frame) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        let mut stats = FrameStats::default();
        tokens.clear();
        {
            let view = cache.read();
            let mut on_screen = |point: Vec3| {
                if view.project(point, viewport, true).is_some() {
                    stats.projected += 1;
                }
            };

            for actor in view.actors() {
                on_screen(actor.origin);
                for bone in &actor.bones {
                    on_screen(bone.child);
                    on_screen(bone.parent);
                }
                if let Some(head) = actor.head_box {
                    on_screen(head.center());
                }
                tokens.push(actor.token);
            }
            for projectile in view.projectiles() {
                for (_, point) in &projectile.trajectory {
                    on_screen(*point);
                }
            }
        }

        for &token in &tokens {
            stats.textures += u64::from(cache.actor_avatar_texture(token).is_some());
            stats.textures += u64::from(cache.actor_rank_texture(token).is_some());
        }

        if events.send(Event::Frame(stats)).is_err() {
            break;
        }
    }
}

/// Drains events until both threads hang up, logging once per second.
fn aggregate(events: &Receiver<Event>) -> SoakReport {
    let mut report = SoakReport::default();
    let mut window = SoakReport::default();
    let mut last_summary = Instant::now();

    for event in events {
        match event {
            Event::Pass {
                stats,
                actors,
                projectiles,
            } => {
                for totals in [&mut report, &mut window] {
                    totals.passes += 1;
                    totals.created += stats.created as u64;
                    totals.evicted += (stats.evicted_actors + stats.evicted_projectiles) as u64;
                    totals.peak_actors = totals.peak_actors.max(actors);
                    totals.peak_projectiles = totals.peak_projectiles.max(projectiles);
                }
                window.ticks = stats.tick;
            }
            Event::Frame(frame) => {
                for totals in [&mut report, &mut window] {
                    totals.frames += 1;
                    totals.projected += frame.projected;
                    totals.textures_resolved += frame.textures;
                }
            }
        }

        if last_summary.elapsed() >= Duration::from_secs(1) {
            info!(
                tick = window.ticks,
                passes = window.passes,
                frames = window.frames,
                projected = window.projected,
                actors = window.peak_actors,
                projectiles = window.peak_projectiles,
                created = window.created,
                evicted = window.evicted,
                "soak"
            );
            window = SoakReport::default();
            last_summary = Instant::now();
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> SoakConfig {
        SoakConfig {
            actors: 8,
            ticks: 300,
            tick_rate: 0,
            render_rate: 1000,
            projectile_interval: 8,
            projectile_lifetime: 40,
            ..SoakConfig::default()
        }
    }

    #[test]
    fn test_every_tick_runs_one_pass() {
        let report = run(&quick()).unwrap();
        assert_eq!(report.ticks, 300);
        assert_eq!(report.passes, 300);
        assert!(report.peak_actors >= 1);
        assert!(report.peak_projectiles >= 1);
        assert!(report.created >= 8);
    }

    #[test]
    fn test_no_texture_released_twice() {
        let report = run(&quick()).unwrap();
        assert_eq!(report.double_releases, 0);
    }

    #[test]
    fn test_resource_set_has_full_banks() {
        let set = resource_set().unwrap();
        assert_eq!(set.competitive_ranks.len(), COMPETITIVE_RANK_COUNT);
        assert_eq!(set.survival_ranks.len(), SURVIVAL_RANK_COUNT);
        assert!(set.attackers_avatar.is_some() && set.defenders_avatar.is_some());
    }

    #[test]
    fn test_invalid_config_is_rejected_before_start() {
        let config = SoakConfig {
            render_rate: 0,
            ..quick()
        };
        assert!(matches!(run(&config), Err(SoakError::Invalid { .. })));
    }
}
