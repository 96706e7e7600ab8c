//! # Headless Texture Backend
//!
//! Hands out texture ids and tracks what is alive, without a GPU. A leak
//! or a double release shows up in the counters.

use std::collections::HashSet;
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};

use image::{ImageFormat, Rgba, RgbaImage};
use parking_lot::Mutex;
use tracing::warn;
use vantage_snapshot::{EncodedImage, TextureBackend, TextureError, TextureId};

/// Texture backend that keeps uploads in a live set.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next: AtomicU64,
    uploaded_bytes: AtomicU64,
    live: Mutex<HashSet<TextureId>>,
    double_releases: AtomicU64,
}

impl HeadlessBackend {
    /// An empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Textures currently alive.
    #[must_use]
    pub fn live(&self) -> usize {
        self.live.lock().len()
    }

    /// Uploads since creation.
    #[must_use]
    pub fn uploads(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }

    /// Pixel bytes uploaded since creation.
    #[must_use]
    pub fn uploaded_bytes(&self) -> u64 {
        self.uploaded_bytes.load(Ordering::Relaxed)
    }

    /// Destroy calls for ids that were not alive.
    #[must_use]
    pub fn double_releases(&self) -> u64 {
        self.double_releases.load(Ordering::Relaxed)
    }
}

impl TextureBackend for HeadlessBackend {
    fn upload_rgba(&self, width: u32, height: u32, pixels: &[u8]) -> Result<TextureId, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Upload(format!("empty {width}x{height} texture")));
        }
        let id = TextureId(self.next.fetch_add(1, Ordering::Relaxed) + 1);
        self.uploaded_bytes
            .fetch_add(pixels.len() as u64, Ordering::Relaxed);
        self.live.lock().insert(id);
        Ok(id)
    }

    fn destroy(&self, id: TextureId) {
        if !self.live.lock().remove(&id) {
            self.double_releases.fetch_add(1, Ordering::Relaxed);
            warn!(%id, "destroy of a texture that is not alive");
        }
    }
}

/// Encodes a solid-color square PNG.
///
/// # Errors
///
/// Returns the encoder error, which for an in-memory PNG only happens on
/// allocation failure.
pub fn solid_png(size: u32, rgba: [u8; 4]) -> Result<EncodedImage, image::ImageError> {
    let image = RgbaImage::from_pixel(size, size, Rgba(rgba));
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(EncodedImage::from_vec(bytes.into_inner()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_and_destroy_tracking() {
        let backend = HeadlessBackend::new();
        let a = backend.upload_rgba(2, 2, &[0; 16]).unwrap();
        let b = backend.upload_rgba(1, 1, &[0; 4]).unwrap();
        assert_ne!(a, b);
        assert_eq!(backend.live(), 2);
        assert_eq!(backend.uploaded_bytes(), 20);

        backend.destroy(a);
        backend.destroy(a);
        assert_eq!(backend.live(), 1);
        assert_eq!(backend.double_releases(), 1);
    }

    #[test]
    fn test_rejects_empty_texture() {
        let backend = HeadlessBackend::new();
        assert!(matches!(
            backend.upload_rgba(0, 4, &[]),
            Err(TextureError::Upload(_))
        ));
        assert_eq!(backend.uploads(), 0);
    }

    #[test]
    fn test_solid_png_decodes() {
        let png = solid_png(4, [10, 20, 30, 255]).unwrap();
        let pixels = png.decode().unwrap();
        assert_eq!((pixels.width(), pixels.height()), (4, 4));
        assert_eq!(&pixels.as_bytes()[..4], &[10, 20, 30, 255]);
    }
}
