//! # Simulation Provider Interface
//!
//! Everything the cache needs from the simulation, and nothing more.
//!
//! ## Boundary
//!
//! ```text
//! Simulation defines:        Cache consumes:
//! ┌────────────────────┐     ┌─────────────────────┐
//! │ entity graph       │ ──→ │ Simulation          │
//! │ property accessors │ ──→ │ SimEntity           │
//! │ memory layout      │  ✗  │ (never seen)        │
//! └────────────────────┘     └─────────────────────┘
//! ```
//!
//! Optional data is expressed as `Option`; the cache treats `None` as
//! "leave the field at its default", never as a failure.

use glam::{Affine3A, Mat4, Vec3};
use vantage_shared::{Aabb, IdentityToken};

// ============================================================================
// CATEGORY TAGS
// ============================================================================

/// Closed set of entity categories the cache understands.
///
/// The simulation maps its own open-ended class tags onto this enum;
/// anything it cannot map is [`EntityClass::Unknown`] and is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityClass {
    /// A mobile actor (player-controlled or bot).
    Actor,
    /// A weapon entity, held or lying in the world.
    Weapon,
    /// A thrown or placed projectile.
    Projectile(ProjectileKind),
    /// A static or slow-moving world prop.
    Prop(PropKind),
    /// A supply crate whose label depends on its model.
    LootCrate,
    /// A burning area-effect volume.
    AreaEffect,
    /// Anything else. Ignored.
    Unknown,
}

/// Projectile classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    /// Generic grenade projectile shared by the flash and fragmentation grenades.
    Grenade,
    /// Breach charge.
    BreachCharge,
    /// Bump mine.
    BumpMine,
    /// Decoy grenade.
    Decoy,
    /// Molotov / incendiary.
    Molotov,
    /// Tactical awareness grenade.
    Sensor,
    /// Smoke grenade.
    Smoke,
    /// Snowball.
    Snowball,
}

/// Prop classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropKind {
    /// Defuse kit lying on the ground.
    DefuseKit,
    /// Chicken.
    Chicken,
    /// The planted timed device.
    PlantedDevice,
    /// Hostage.
    Hostage,
    /// Automated sentry.
    Sentry,
    /// Cash stack.
    Cash,
    /// Ammo box.
    AmmoBox,
    /// Radar jammer.
    RadarJammer,
    /// Snowball pile.
    SnowballPile,
}

/// Weapon family, as reported by the simulation's weapon info.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    /// Pistol.
    Pistol,
    /// Submachine gun.
    SubMachinegun,
    /// Assault rifle.
    Rifle,
    /// Sniper rifle.
    SniperRifle,
    /// Shotgun.
    Shotgun,
    /// Machine gun.
    Machinegun,
    /// Throwable grenade.
    Grenade,
    /// Melee weapon.
    Melee,
    /// Equipment without a family (bomb, healthshot, shield...).
    Unclassified,
}

/// Individual weapon identifiers.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeaponId {
    Glock,
    Hkp2000,
    UspS,
    Elite,
    P250,
    Tec9,
    FiveSeven,
    Cz75a,
    Deagle,
    Revolver,
    Mac10,
    Mp9,
    Mp7,
    Mp5sd,
    Ump45,
    P90,
    Bizon,
    GalilAr,
    Famas,
    Ak47,
    M4A1,
    M4a1S,
    Sg553,
    Aug,
    Ssg08,
    Awp,
    G3sg1,
    Scar20,
    Nova,
    Xm1014,
    Sawedoff,
    Mag7,
    M249,
    Negev,
    Flashbang,
    HeGrenade,
    SmokeGrenade,
    Molotov,
    Decoy,
    IncGrenade,
    TaGrenade,
    Firebomb,
    Diversion,
    FragGrenade,
    Snowball,
    Axe,
    Hammer,
    Spanner,
    C4,
    Healthshot,
    BumpMine,
    ZoneRepulsor,
    Shield,
    /// Knives, tasers and anything else without a dedicated filter entry.
    Other,
}

/// Team affiliation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Team {
    /// Not on a team yet.
    #[default]
    Unassigned,
    /// Spectating.
    Spectator,
    /// Attacking side.
    Attackers,
    /// Defending side.
    Defenders,
}

/// Game mode; selects which rank icon bank is used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GameMode {
    /// Ranked matchmaking.
    #[default]
    Competitive,
    /// Battle-royale style survival mode with its own rank ladder.
    Survival,
    /// Any other mode.
    Other,
}

/// How a spectator is attached to its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ObserverMode {
    /// Not observing.
    #[default]
    None,
    /// Death camera.
    Deathcam,
    /// Freeze camera.
    FreezeCam,
    /// Fixed camera.
    Fixed,
    /// First person through the target's eyes.
    InEye,
    /// Third-person chase camera.
    Chase,
    /// Free roaming.
    Roaming,
}

impl ObserverMode {
    /// Returns true if the camera is locked onto its target's position.
    #[must_use]
    pub const fn follows_target(self) -> bool {
        !matches!(self, Self::Roaming | Self::Deathcam)
    }
}

// ============================================================================
// PER-CATEGORY STATE
// ============================================================================

/// The weapon an actor currently holds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeldWeapon {
    /// Entity index of the weapon (sound source matching).
    pub index: i32,
    /// Localization key of the weapon name.
    pub name_key: Option<String>,
}

/// Actor properties read once per observation.
///
/// For a dormant actor the simulation may only have stale or partial values;
/// the cache only consumes `alive`, `health`, `armor` and `rank` in that case.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActorState {
    /// Session-scoped user id.
    pub user_id: i32,
    /// Display name.
    pub name: String,
    /// Account identifier used to fetch the avatar, if known.
    pub account_id: Option<u64>,
    /// Team affiliation.
    pub team: Team,
    /// Whether the actor is alive.
    pub alive: bool,
    /// Health points.
    pub health: i32,
    /// Armor points.
    pub armor: i32,
    /// Money.
    pub money: i32,
    /// Rank index into the active icon bank.
    pub rank: i32,
    /// Localization key of the last known place name.
    pub place_key: Option<String>,
    /// Hostile to the viewer.
    pub enemy: bool,
    /// Spotted on the radar.
    pub spotted: bool,
    /// Spawn-protected.
    pub immune: bool,
    /// Remaining flash blindness in seconds.
    pub flash_duration: f32,
    /// Currently held weapon.
    pub active_weapon: Option<HeldWeapon>,
    /// What the actor spectates while dead.
    pub observer_mode: ObserverMode,
    /// Whom the actor spectates while dead.
    pub observer_target: Option<IdentityToken>,
    /// Broadcast relay pseudo-actor. Never recorded.
    pub is_relay: bool,
}

/// The viewer's weapon handling state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewerWeapon {
    /// Reload in progress.
    pub in_reload: bool,
    /// Weapon is a sniper rifle.
    pub is_sniper: bool,
    /// Simulation time of the next allowed primary attack.
    pub next_primary_attack: f32,
}

/// Extra state only meaningful for the viewer entity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewerState {
    /// Active weapon handling, if holding one.
    pub weapon: Option<ViewerWeapon>,
    /// Consecutive shots fired.
    pub shots_fired: i32,
    /// Scoped in.
    pub scoped: bool,
    /// Current field of view; zero means "use the default".
    pub fov: i32,
    /// Default field of view.
    pub default_fov: i32,
    /// Remaining flash blindness in seconds.
    pub flash_duration: f32,
    /// Recoil punch angles.
    pub aim_punch: Vec3,
    /// Spectating mode.
    pub observer_mode: ObserverMode,
    /// Spectated entity.
    pub observer_target: Option<IdentityToken>,
}

/// One bone of an animated skeleton, posed for this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bone {
    /// Bone-to-world transform.
    pub transform: Affine3A,
    /// Index of the parent bone.
    pub parent: Option<usize>,
    /// Bone participates in hit detection.
    pub hitbox: bool,
}

/// The head hitbox, in the space of its bone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadHitbox {
    /// Index of the bone the box is attached to.
    pub bone: usize,
    /// Box minimum in bone space.
    pub min: Vec3,
    /// Box maximum in bone space.
    pub max: Vec3,
    /// Capsule radius; zero for a plain box.
    pub capsule_radius: f32,
}

/// A posed skeleton. Only requested for live actors inside the view frustum.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Skeleton {
    /// All bones, parents before children.
    pub bones: Vec<Bone>,
    /// The head hitbox, if the model has a hitbox set.
    pub head: Option<HeadHitbox>,
}

/// Projectile properties.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProjectileState {
    /// Who threw it.
    pub thrower: Option<IdentityToken>,
    /// The simulation reports it has gone off.
    pub exploded: bool,
}

/// Weapon family and name key, when weapon info is available.
#[derive(Clone, Debug, PartialEq)]
pub struct WeaponInfo {
    /// Family.
    pub kind: WeaponKind,
    /// Localization key of the display name.
    pub name_key: String,
}

/// Weapon properties.
#[derive(Clone, Debug, PartialEq)]
pub struct WeaponState {
    /// Owning actor; `None` for weapons lying in the world.
    pub owner: Option<IdentityToken>,
    /// Identifier.
    pub id: WeaponId,
    /// Rounds in the magazine.
    pub clip: i32,
    /// Reserve rounds.
    pub reserve_ammo: i32,
    /// Family and name key.
    pub info: Option<WeaponInfo>,
}

/// The timed device, when one is planted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeviceState {
    /// Countdown running.
    pub ticking: bool,
    /// World position.
    pub origin: Vec3,
    /// Simulation time of detonation.
    pub detonation_time: f32,
    /// Full countdown length.
    pub timer_length: f32,
    /// Actor currently defusing.
    pub defuser: Option<IdentityToken>,
    /// Simulation time the defuse completes.
    pub defuse_countdown: f32,
    /// Full defuse length.
    pub defuse_length: f32,
}

// ============================================================================
// PROVIDER TRAITS
// ============================================================================

/// Read access to one live entity.
pub trait SimEntity {
    /// Identity token, stable while the entity lives.
    fn token(&self) -> IdentityToken;

    /// Entity index (sound channels refer to sources by index).
    fn index(&self) -> i32;

    /// Category tag.
    fn class(&self) -> EntityClass;

    /// Exists but carries no fresh state this tick.
    fn is_dormant(&self) -> bool;

    /// False while the entity has not been fully networked to us yet.
    fn is_locally_known(&self) -> bool {
        true
    }

    /// World position.
    fn origin(&self) -> Vec3;

    /// Local-space bounds (collision box for actors, model bounds otherwise).
    fn bounds(&self) -> Option<Aabb>;

    /// Entity-to-world transform.
    fn transform(&self) -> Affine3A;

    /// Model path, if the entity has a model.
    fn model_name(&self) -> Option<&str> {
        None
    }

    /// Actor properties; `None` for non-actors.
    fn actor(&self) -> Option<ActorState> {
        None
    }

    /// Viewer-only properties.
    fn viewer_state(&self) -> ViewerState {
        ViewerState::default()
    }

    /// Posed skeleton; may be expensive.
    fn skeleton(&self) -> Option<Skeleton> {
        None
    }

    /// Projectile properties.
    fn projectile(&self) -> Option<ProjectileState> {
        None
    }

    /// Weapon properties.
    fn weapon(&self) -> Option<WeaponState> {
        None
    }

    /// World positions of the burning cells of an area effect.
    fn fire_points(&self) -> Vec<Vec3> {
        Vec::new()
    }
}

/// The simulation as seen by the cache.
pub trait Simulation {
    /// Entity view type.
    type Entity: SimEntity;

    /// Monotonic tick counter.
    fn tick(&self) -> u64;

    /// Wall-clock seconds, used for fade windows and trajectory stamps.
    fn real_time(&self) -> f32;

    /// Every live entity, each exactly once.
    fn live_entities(&self) -> impl Iterator<Item = &Self::Entity> + '_;

    /// Resolves a token back to its live entity.
    fn resolve(&self, token: IdentityToken) -> Option<&Self::Entity>;

    /// The entity the overlay is drawn for.
    fn viewer(&self) -> Option<&Self::Entity>;

    /// Current world-to-clip transform.
    fn view_projection(&self) -> Mat4;

    /// Source entity indices of all currently playing sound channels.
    fn sound_sources(&self) -> &[i32];

    /// Looks up a localized string.
    fn localize(&self, key: &str) -> Option<String>;

    /// Current game mode.
    fn game_mode(&self) -> GameMode;

    /// Unobstructed line of sight between two entities.
    fn line_of_sight(&self, from: &Self::Entity, to: &Self::Entity) -> bool;

    /// The planted device, if the map has device targets and one is planted.
    fn planted_device(&self) -> Option<DeviceState>;

    /// Centers of site A and site B.
    fn site_centers(&self) -> Option<(Vec3, Vec3)>;

    /// Small avatar bitmap (RGBA8, square) for an account.
    fn avatar_rgba(&self, account_id: u64) -> Option<Vec<u8>>;
}
