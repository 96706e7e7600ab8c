//! Single lazily created texture slot.

use parking_lot::Mutex;
use tracing::warn;

use super::{PixelBuffer, TextureBackend, TextureError, TextureId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Empty,
    Ready(TextureId),
    Failed,
    Retired,
}

/// A texture created on first access and released on invalidation.
///
/// The slot carries its own lock, so an upload in flight on the render
/// thread and an invalidation from elsewhere serialize here rather than
/// on the snapshot lock.
#[derive(Debug)]
pub struct LazyTexture {
    slot: Mutex<Slot>,
}

impl LazyTexture {
    /// Creates an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Slot::Empty),
        }
    }

    /// Returns the texture, running `decode` and uploading if the slot is empty.
    ///
    /// A failed decode or upload is logged once and the slot stays empty
    /// (returning `None`) until the next [`LazyTexture::invalidate`].
    pub fn get_or_init(
        &self,
        backend: &dyn TextureBackend,
        label: &str,
        decode: impl FnOnce() -> Result<PixelBuffer, TextureError>,
    ) -> Option<TextureId> {
        let mut slot = self.slot.lock();
        match *slot {
            Slot::Ready(id) => Some(id),
            Slot::Failed | Slot::Retired => None,
            Slot::Empty => match decode().and_then(|pixels| pixels.upload(backend)) {
                Ok(id) => {
                    *slot = Slot::Ready(id);
                    Some(id)
                }
                Err(err) => {
                    warn!(label, %err, "texture unavailable");
                    *slot = Slot::Failed;
                    None
                }
            },
        }
    }

    /// Releases the texture, if any. The next access re-creates it.
    ///
    /// Safe to call on a slot that was never initialized.
    pub fn invalidate(&self, backend: &dyn TextureBackend) {
        let mut slot = self.slot.lock();
        match *slot {
            Slot::Ready(id) => {
                backend.destroy(id);
                *slot = Slot::Empty;
            }
            Slot::Failed => *slot = Slot::Empty,
            Slot::Empty | Slot::Retired => {}
        }
    }

    /// Releases the texture for good; later accesses return `None`.
    pub fn retire(&self, backend: &dyn TextureBackend) {
        let mut slot = self.slot.lock();
        if let Slot::Ready(id) = *slot {
            backend.destroy(id);
        }
        *slot = Slot::Retired;
    }

    /// Returns the texture if it is currently uploaded.
    #[must_use]
    pub fn current(&self) -> Option<TextureId> {
        match *self.slot.lock() {
            Slot::Ready(id) => Some(id),
            _ => None,
        }
    }
}

impl Default for LazyTexture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textures::testing::CountingBackend;

    fn pixels() -> Result<PixelBuffer, TextureError> {
        PixelBuffer::from_rgba(1, 1, vec![0, 0, 0, 255])
    }

    #[test]
    fn test_decodes_once_between_invalidations() {
        let backend = CountingBackend::default();
        let texture = LazyTexture::new();
        let mut decodes = 0;

        for _ in 0..3 {
            texture.get_or_init(&backend, "test", || {
                decodes += 1;
                pixels()
            });
        }
        assert_eq!(decodes, 1);

        texture.invalidate(&backend);
        assert_eq!(texture.current(), None);
        assert_eq!(backend.destroyed.lock().len(), 1);

        texture.get_or_init(&backend, "test", || {
            decodes += 1;
            pixels()
        });
        assert_eq!(decodes, 2);
        assert_eq!(backend.uploads(), 2);
    }

    #[test]
    fn test_invalidate_never_initialized() {
        let backend = CountingBackend::default();
        let texture = LazyTexture::new();
        texture.invalidate(&backend);
        texture.invalidate(&backend);
        assert!(backend.destroyed.lock().is_empty());
    }

    #[test]
    fn test_failure_is_sticky_until_invalidated() {
        let backend = CountingBackend::default();
        let texture = LazyTexture::new();
        let bad = || PixelBuffer::from_rgba(4, 4, vec![0; 3]);

        assert_eq!(texture.get_or_init(&backend, "bad", bad), None);
        // No retry while failed
        assert_eq!(texture.get_or_init(&backend, "bad", pixels), None);

        texture.invalidate(&backend);
        assert!(texture.get_or_init(&backend, "good", pixels).is_some());
    }

    #[test]
    fn test_retired_slot_stays_empty() {
        let backend = CountingBackend::default();
        let texture = LazyTexture::new();
        let id = texture.get_or_init(&backend, "test", pixels).unwrap();

        texture.retire(&backend);
        assert_eq!(*backend.destroyed.lock(), vec![id]);

        texture.invalidate(&backend);
        assert_eq!(texture.get_or_init(&backend, "test", pixels), None);
        assert_eq!(backend.uploads(), 1);
    }
}
