//! Rank icon banks and default avatars.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{Avatar, EncodedImage, LazyTexture, TextureBackend, TextureId};
use crate::provider::{GameMode, Team};

/// Encoded images handed to the cache at construction.
#[derive(Clone, Debug, Default)]
pub struct ResourceSet {
    /// Competitive rank icons, index 0 meaning "unranked".
    pub competitive_ranks: Vec<EncodedImage>,
    /// Survival rank icons, index 0 meaning "unranked".
    pub survival_ranks: Vec<EncodedImage>,
    /// Fallback avatar for the attacking side.
    pub attackers_avatar: Option<EncodedImage>,
    /// Fallback avatar for the defending side.
    pub defenders_avatar: Option<EncodedImage>,
}

#[derive(Debug)]
struct Icon {
    source: EncodedImage,
    texture: LazyTexture,
}

impl Icon {
    fn new(source: EncodedImage) -> Self {
        Self {
            source,
            texture: LazyTexture::new(),
        }
    }

    fn texture_id(&self, backend: &dyn TextureBackend, label: &str) -> Option<TextureId> {
        self.texture.get_or_init(backend, label, || self.source.decode())
    }
}

/// Every lazily created texture the cache owns outside actor records.
pub struct ResourceCache {
    backend: Arc<dyn TextureBackend>,
    competitive: Vec<Icon>,
    survival: Vec<Icon>,
    attackers_avatar: Option<Icon>,
    defenders_avatar: Option<Icon>,
}

impl ResourceCache {
    /// Creates the cache. Nothing is decoded until first access.
    #[must_use]
    pub fn new(backend: Arc<dyn TextureBackend>, set: ResourceSet) -> Self {
        Self {
            backend,
            competitive: set.competitive_ranks.into_iter().map(Icon::new).collect(),
            survival: set.survival_ranks.into_iter().map(Icon::new).collect(),
            attackers_avatar: set.attackers_avatar.map(Icon::new),
            defenders_avatar: set.defenders_avatar.map(Icon::new),
        }
    }

    /// The graphics backend.
    #[must_use]
    pub fn backend(&self) -> &dyn TextureBackend {
        self.backend.as_ref()
    }

    /// Rank icon for `rank` in the bank `mode` selects.
    ///
    /// Out-of-range ranks fall back to index 0.
    pub fn rank_texture(&self, mode: GameMode, rank: i32) -> Option<TextureId> {
        let bank = match mode {
            GameMode::Survival => &self.survival,
            GameMode::Competitive | GameMode::Other => &self.competitive,
        };
        let index = usize::try_from(rank)
            .ok()
            .filter(|&i| i < bank.len())
            .unwrap_or(0);
        bank.get(index)?.texture_id(self.backend(), "rank")
    }

    /// Team fallback avatar. Anyone not attacking gets the defenders' image.
    pub fn default_avatar(&self, team: Team) -> Option<TextureId> {
        let icon = match team {
            Team::Attackers => self.attackers_avatar.as_ref(),
            Team::Defenders | Team::Spectator | Team::Unassigned => self.defenders_avatar.as_ref(),
        };
        icon?.texture_id(self.backend(), "default avatar")
    }

    /// Texture for an actor's own avatar.
    pub fn avatar_texture(&self, avatar: &Avatar) -> Option<TextureId> {
        avatar.texture_id(self.backend())
    }

    /// Releases every bank and default texture.
    pub fn invalidate_all(&self) {
        let backend = self.backend();
        let icons = self
            .competitive
            .iter()
            .chain(&self.survival)
            .chain(&self.attackers_avatar)
            .chain(&self.defenders_avatar);

        let mut released = 0usize;
        for icon in icons {
            if icon.texture.current().is_some() {
                released += 1;
            }
            icon.texture.invalidate(backend);
        }
        debug!(released, "resource textures invalidated");
    }
}

impl fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCache")
            .field("competitive", &self.competitive.len())
            .field("survival", &self.survival.len())
            .field("attackers_avatar", &self.attackers_avatar.is_some())
            .field("defenders_avatar", &self.defenders_avatar.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textures::testing::CountingBackend;

    /// 1x1 opaque red PNG.
    const RED_PIXEL_PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x90,
        0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49, 0x44, 0x41, 0x54, 0x08, 0xD7, 0x63, 0xF8,
        0xCF, 0xC0, 0x00, 0x00, 0x03, 0x01, 0x01, 0x00, 0x18, 0xDD, 0x8D, 0xB0, 0x00, 0x00, 0x00,
        0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    fn cache(backend: Arc<CountingBackend>) -> ResourceCache {
        let icon = || EncodedImage::from_static(RED_PIXEL_PNG);
        ResourceCache::new(
            backend,
            ResourceSet {
                competitive_ranks: vec![icon(), icon(), icon()],
                survival_ranks: vec![icon()],
                attackers_avatar: Some(icon()),
                defenders_avatar: None,
            },
        )
    }

    #[test]
    fn test_rank_out_of_range_uses_first_icon() {
        let backend = Arc::new(CountingBackend::default());
        let cache = cache(Arc::clone(&backend));

        let unranked = cache.rank_texture(GameMode::Competitive, 0);
        assert!(unranked.is_some());
        assert_eq!(cache.rank_texture(GameMode::Competitive, 99), unranked);
        assert_eq!(cache.rank_texture(GameMode::Competitive, -3), unranked);
        assert_ne!(cache.rank_texture(GameMode::Competitive, 2), unranked);
        assert_eq!(backend.uploads(), 2);
    }

    #[test]
    fn test_survival_bank_is_separate() {
        let backend = Arc::new(CountingBackend::default());
        let cache = cache(Arc::clone(&backend));

        let competitive = cache.rank_texture(GameMode::Competitive, 0);
        let survival = cache.rank_texture(GameMode::Survival, 0);
        assert_ne!(competitive, survival);
    }

    #[test]
    fn test_default_avatar_by_team() {
        let backend = Arc::new(CountingBackend::default());
        let cache = cache(backend);

        assert!(cache.default_avatar(Team::Attackers).is_some());
        assert!(cache.default_avatar(Team::Defenders).is_none());
        assert!(cache.default_avatar(Team::Unassigned).is_none());
    }

    #[test]
    fn test_invalidate_all_then_one_redecode() {
        let backend = Arc::new(CountingBackend::default());
        let cache = cache(Arc::clone(&backend));

        let before = cache.rank_texture(GameMode::Competitive, 1);
        cache.rank_texture(GameMode::Competitive, 1);
        assert_eq!(backend.uploads(), 1);

        cache.invalidate_all();
        assert_eq!(backend.destroyed.lock().as_slice(), &[before.unwrap()]);

        let after = cache.rank_texture(GameMode::Competitive, 1);
        cache.rank_texture(GameMode::Competitive, 1);
        assert!(after.is_some());
        assert_ne!(after, before);
        assert_eq!(backend.uploads(), 2);
    }
}
