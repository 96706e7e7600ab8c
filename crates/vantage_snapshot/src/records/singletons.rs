//! Records rebuilt whole every tick: the viewer, the timed device and
//! observer relationships.

use glam::Vec3;
use vantage_shared::IdentityToken;

use crate::provider::{SimEntity, Simulation};

/// The viewer, rebuilt every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewerRecord {
    /// A viewer exists this tick.
    pub exists: bool,
    /// Alive.
    pub alive: bool,
    /// Identity token; [`IdentityToken::INVALID`] without a viewer.
    pub token: IdentityToken,
    /// Reloading.
    pub in_reload: bool,
    /// More than one consecutive shot fired.
    pub shooting: bool,
    /// Holding a sniper rifle without scoping in.
    pub no_scope: bool,
    /// Simulation time of the next allowed primary attack.
    pub next_weapon_attack: f32,
    /// Effective field of view.
    pub fov: i32,
    /// Remaining flash blindness in seconds.
    pub flash_duration: f32,
    /// Recoil punch angles.
    pub aim_punch: Vec3,
    /// Eye origin; the spectated target's origin in locked camera modes.
    pub origin: Vec3,
}

impl ViewerRecord {
    /// Captures the current viewer, or an empty record if there is none.
    pub(crate) fn capture<S: Simulation>(sim: &S) -> Self {
        let Some(viewer) = sim.viewer() else {
            return Self::default();
        };

        let state = viewer.viewer_state();
        let alive = viewer.actor().is_some_and(|actor| actor.alive);
        let weapon = state.weapon.unwrap_or_default();

        let origin = state
            .observer_target
            .filter(|_| state.observer_mode.follows_target())
            .and_then(|target| sim.resolve(target))
            .map_or_else(|| viewer.origin(), SimEntity::origin);

        Self {
            exists: true,
            alive,
            token: viewer.token(),
            in_reload: weapon.in_reload,
            shooting: state.weapon.is_some() && state.shots_fired > 1,
            no_scope: weapon.is_sniper && !state.scoped,
            next_weapon_attack: weapon.next_primary_attack,
            fov: if state.fov != 0 { state.fov } else { state.default_fov },
            flash_duration: state.flash_duration,
            aim_punch: state.aim_punch,
            origin,
        }
    }
}

/// Which target site the device was planted at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeviceSite {
    /// Site A.
    A,
    /// Site B.
    B,
}

/// The ticking timed device.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedDeviceRecord {
    /// World position.
    pub origin: Vec3,
    /// Simulation time of detonation.
    pub detonation_time: f32,
    /// Full countdown length.
    pub timer_length: f32,
    /// Actor currently defusing.
    pub defuser: Option<IdentityToken>,
    /// Simulation time the defuse completes; zero without a defuser.
    pub defuse_countdown: f32,
    /// Full defuse length; zero without a defuser.
    pub defuse_length: f32,
    /// Nearer target site, when site centers are known.
    pub site: Option<DeviceSite>,
}

impl TimedDeviceRecord {
    /// Captures the device if one is planted and ticking.
    pub(crate) fn capture<S: Simulation>(sim: &S) -> Option<Self> {
        let device = sim.planted_device().filter(|device| device.ticking)?;

        let (defuse_countdown, defuse_length) = if device.defuser.is_some() {
            (device.defuse_countdown, device.defuse_length)
        } else {
            (0.0, 0.0)
        };

        let site = sim.site_centers().map(|(a, b)| {
            if device.origin.distance(a) > device.origin.distance(b) {
                DeviceSite::B
            } else {
                DeviceSite::A
            }
        });

        Some(Self {
            origin: device.origin,
            detonation_time: device.detonation_time,
            timer_length: device.timer_length,
            defuser: device.defuser,
            defuse_countdown,
            defuse_length,
            site,
        })
    }

    /// Seconds until detonation at simulation time `now`.
    #[must_use]
    pub fn time_left(&self, now: f32) -> f32 {
        (self.detonation_time - now).max(0.0)
    }
}

/// A dead actor spectating another actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObserverRecord {
    /// The spectator.
    pub spectator: IdentityToken,
    /// Spectator's user id.
    pub spectator_user_id: i32,
    /// The spectated actor.
    pub target: IdentityToken,
    /// Target's user id.
    pub target_user_id: i32,
    /// The spectated actor is the viewer.
    pub target_is_viewer: bool,
}
