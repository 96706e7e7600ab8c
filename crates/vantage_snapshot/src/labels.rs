//! # Display Labels
//!
//! Pure lookup tables from class identifiers to the names the overlay prints.
//! Every table is an exhaustive `match`; adding a variant upstream is a
//! compile error here, not a silent "unknown".

use crate::provider::{ProjectileKind, PropKind, WeaponId, WeaponKind};

/// Label for a prop.
#[must_use]
pub const fn prop_label(kind: PropKind) -> &'static str {
    match kind {
        PropKind::DefuseKit => "Defuse Kit",
        PropKind::Chicken => "Chicken",
        PropKind::PlantedDevice => "Planted C4",
        PropKind::Hostage => "Hostage",
        PropKind::Sentry => "Sentry",
        PropKind::Cash => "Cash",
        PropKind::AmmoBox => "Ammo Box",
        PropKind::RadarJammer => "Radar Jammer",
        PropKind::SnowballPile => "Snowball Pile",
    }
}

/// Label for a projectile.
///
/// Flashbangs and fragmentation grenades share one projectile class and only
/// differ by model, so the model path decides between them.
#[must_use]
pub fn projectile_label(kind: ProjectileKind, model: Option<&str>) -> &'static str {
    match kind {
        ProjectileKind::Grenade => {
            if model.is_some_and(|m| m.contains("flashbang")) {
                "Flashbang"
            } else {
                "HE Grenade"
            }
        }
        ProjectileKind::BreachCharge => "Breach Charge",
        ProjectileKind::BumpMine => "Bump Mine",
        ProjectileKind::Decoy => "Decoy Grenade",
        ProjectileKind::Molotov => "Molotov",
        ProjectileKind::Sensor => "TA Grenade",
        ProjectileKind::Smoke => "Smoke Grenade",
        ProjectileKind::Snowball => "Snowball",
    }
}

/// Filter group for a weapon.
///
/// Unclassified equipment falls into "Other" when it has a dedicated
/// filter entry and "All" otherwise.
#[must_use]
pub const fn weapon_group(kind: WeaponKind, id: WeaponId) -> &'static str {
    match kind {
        WeaponKind::Pistol => "Pistols",
        WeaponKind::SubMachinegun => "SMGs",
        WeaponKind::Rifle => "Rifles",
        WeaponKind::SniperRifle => "Sniper Rifles",
        WeaponKind::Shotgun => "Shotguns",
        WeaponKind::Machinegun => "Machineguns",
        WeaponKind::Grenade => "Grenades",
        WeaponKind::Melee => "Melee",
        WeaponKind::Unclassified => match id {
            WeaponId::C4
            | WeaponId::Healthshot
            | WeaponId::BumpMine
            | WeaponId::ZoneRepulsor
            | WeaponId::Shield => "Other",
            _ => "All",
        },
    }
}

/// Filter name for a weapon.
#[must_use]
pub const fn weapon_name(id: WeaponId) -> &'static str {
    match id {
        WeaponId::Glock => "Glock-18",
        WeaponId::Hkp2000 => "P2000",
        WeaponId::UspS => "USP-S",
        WeaponId::Elite => "Dual Berettas",
        WeaponId::P250 => "P250",
        WeaponId::Tec9 => "Tec-9",
        WeaponId::FiveSeven => "Five-SeveN",
        WeaponId::Cz75a => "CZ75-Auto",
        WeaponId::Deagle => "Desert Eagle",
        WeaponId::Revolver => "R8 Revolver",

        WeaponId::Mac10 => "MAC-10",
        WeaponId::Mp9 => "MP9",
        WeaponId::Mp7 => "MP7",
        WeaponId::Mp5sd => "MP5-SD",
        WeaponId::Ump45 => "UMP-45",
        WeaponId::P90 => "P90",
        WeaponId::Bizon => "PP-Bizon",

        WeaponId::GalilAr => "Galil AR",
        WeaponId::Famas => "FAMAS",
        WeaponId::Ak47 => "AK-47",
        WeaponId::M4A1 => "M4A4",
        WeaponId::M4a1S => "M4A1-S",
        WeaponId::Sg553 => "SG 553",
        WeaponId::Aug => "AUG",

        WeaponId::Ssg08 => "SSG 08",
        WeaponId::Awp => "AWP",
        WeaponId::G3sg1 => "G3SG1",
        WeaponId::Scar20 => "SCAR-20",

        WeaponId::Nova => "Nova",
        WeaponId::Xm1014 => "XM1014",
        WeaponId::Sawedoff => "Sawed-Off",
        WeaponId::Mag7 => "MAG-7",

        WeaponId::M249 => "M249",
        WeaponId::Negev => "Negev",

        WeaponId::Flashbang => "Flashbang",
        WeaponId::HeGrenade => "HE Grenade",
        WeaponId::SmokeGrenade => "Smoke Grenade",
        WeaponId::Molotov => "Molotov",
        WeaponId::Decoy => "Decoy Grenade",
        WeaponId::IncGrenade => "Incendiary",
        WeaponId::TaGrenade => "TA Grenade",
        WeaponId::Firebomb => "Fire Bomb",
        WeaponId::Diversion => "Diversion",
        WeaponId::FragGrenade => "Frag Grenade",
        WeaponId::Snowball => "Snowball",

        WeaponId::Axe => "Axe",
        WeaponId::Hammer => "Hammer",
        WeaponId::Spanner => "Wrench",

        WeaponId::C4 => "C4",
        WeaponId::Healthshot => "Healthshot",
        WeaponId::BumpMine => "Bump Mine",
        WeaponId::ZoneRepulsor => "Zone Repulsor",
        WeaponId::Shield => "Shield",

        WeaponId::Other => "All",
    }
}

// =============================================================================
// LOOT CRATES - keyed by model path hash
// =============================================================================

/// FNV-1a over the bytes of `text`.
#[must_use]
pub const fn fnv1a(text: &str) -> u64 {
    const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;

    let bytes = text.as_bytes();
    let mut hash = FNV_OFFSET;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

const PISTOL_CASE: u64 = fnv1a("models/props_survival/cases/case_pistol.mdl");
const LIGHT_CASE: u64 = fnv1a("models/props_survival/cases/case_light_weapon.mdl");
const HEAVY_CASE: u64 = fnv1a("models/props_survival/cases/case_heavy_weapon.mdl");
const EXPLOSIVE_CASE: u64 = fnv1a("models/props_survival/cases/case_explosive.mdl");
const TOOLS_CASE: u64 = fnv1a("models/props_survival/cases/case_tools.mdl");
const CASH_DUFFLEBAG: u64 = fnv1a("models/props_survival/cash/dufflebag.mdl");

/// Label for a loot crate, from its model path.
///
/// Returns `None` for models that are not a known crate.
#[must_use]
pub fn loot_crate_label(model: &str) -> Option<&'static str> {
    match fnv1a(model) {
        PISTOL_CASE => Some("Pistol Case"),
        LIGHT_CASE => Some("Light Case"),
        HEAVY_CASE => Some("Heavy Case"),
        EXPLOSIVE_CASE => Some("Explosive Case"),
        TOOLS_CASE => Some("Tools Case"),
        CASH_DUFFLEBAG => Some("Cash Dufflebag"),
        _ => None,
    }
}
