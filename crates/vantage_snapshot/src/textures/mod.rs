//! # Resource Cache
//!
//! Lazily uploaded textures for rank icons and actor avatars.
//!
//! ## Lifecycle
//!
//! ```text
//!             get_or_init                 invalidate
//!   Empty ───────────────→ Ready(id) ───────────────→ Empty
//!     │   decode fails                                  ↑
//!     └──────────────────→ Failed ──────────────────────┘
//!
//!   retire (record evicted): any ──→ Retired (terminal)
//! ```
//!
//! Decoding and upload happen at most once between invalidations. The
//! graphics context may be torn down independently of the cache, so
//! textures are released by explicit invalidation, never by `Drop`.

mod lazy;
mod resources;

use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

pub use lazy::LazyTexture;
pub use resources::{ResourceCache, ResourceSet};

/// Opaque handle to an uploaded texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tex#{}", self.0)
    }
}

/// Errors from decoding or uploading an image.
#[derive(Error, Debug)]
pub enum TextureError {
    /// The encoded bytes are not a supported image.
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// Pixel data does not match the declared size.
    #[error("pixel buffer is {len} bytes, expected {width}x{height} RGBA8")]
    Dimensions {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Actual byte length.
        len: usize,
    },

    /// The graphics backend refused the upload.
    #[error("texture upload refused: {0}")]
    Upload(String),
}

/// The graphics side of texture management.
///
/// Both calls are made outside the snapshot lock; implementations
/// serialize against their own context.
pub trait TextureBackend: Send + Sync {
    /// Uploads tightly packed RGBA8 pixels and returns a handle.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::Upload`] if the context cannot create the texture.
    fn upload_rgba(&self, width: u32, height: u32, pixels: &[u8]) -> Result<TextureId, TextureError>;

    /// Releases a texture previously returned by [`TextureBackend::upload_rgba`].
    fn destroy(&self, texture: TextureId);
}

/// Decoded RGBA8 pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps raw RGBA8 pixels.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::Dimensions`] if `pixels` is not exactly
    /// `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, TextureError> {
        let expected = (width as usize) * (height as usize) * 4;
        if pixels.len() != expected || expected == 0 {
            return Err(TextureError::Dimensions {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes, row-major.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Uploads the pixels through `backend`.
    ///
    /// # Errors
    ///
    /// Propagates the backend's refusal.
    pub fn upload(&self, backend: &dyn TextureBackend) -> Result<TextureId, TextureError> {
        backend.upload_rgba(self.width, self.height, &self.pixels)
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// An encoded image (PNG) passed through unchanged until first use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage(Cow<'static, [u8]>);

impl EncodedImage {
    /// Wraps bytes embedded in the binary.
    #[must_use]
    pub const fn from_static(bytes: &'static [u8]) -> Self {
        Self(Cow::Borrowed(bytes))
    }

    /// Wraps owned bytes.
    #[must_use]
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self(Cow::Owned(bytes))
    }

    /// The encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Decodes to RGBA8.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::Decode`] if the bytes are not a supported image.
    pub fn decode(&self) -> Result<PixelBuffer, TextureError> {
        let rgba = image::load_from_memory(&self.0)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        PixelBuffer::from_rgba(width, height, rgba.into_raw())
    }
}

/// Per-actor avatar: the raw bitmap and its lazily uploaded texture.
#[derive(Debug)]
pub struct Avatar {
    pixels: PixelBuffer,
    texture: LazyTexture,
}

impl Avatar {
    /// Wraps a freshly fetched bitmap.
    #[must_use]
    pub fn new(pixels: PixelBuffer) -> Self {
        Self {
            pixels,
            texture: LazyTexture::new(),
        }
    }

    /// The bitmap.
    #[must_use]
    pub const fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// The texture slot.
    #[must_use]
    pub const fn texture(&self) -> &LazyTexture {
        &self.texture
    }

    /// Returns the uploaded texture, uploading on first use.
    pub fn texture_id(&self, backend: &dyn TextureBackend) -> Option<TextureId> {
        self.texture
            .get_or_init(backend, "avatar", || Ok(self.pixels.clone()))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Backend double that counts uploads.

    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::{TextureBackend, TextureError, TextureId};

    #[derive(Default)]
    pub struct CountingBackend {
        next: AtomicU64,
        pub uploads: AtomicUsize,
        pub destroyed: Mutex<Vec<TextureId>>,
    }

    impl CountingBackend {
        pub fn uploads(&self) -> usize {
            self.uploads.load(Ordering::SeqCst)
        }
    }

    impl TextureBackend for CountingBackend {
        fn upload_rgba(&self, _width: u32, _height: u32, _pixels: &[u8]) -> Result<TextureId, TextureError> {
            self.uploads.fetch_add(1, Ordering::SeqCst);
            Ok(TextureId(self.next.fetch_add(1, Ordering::SeqCst) + 1))
        }

        fn destroy(&self, texture: TextureId) {
            self.destroyed.lock().push(texture);
        }
    }
}
