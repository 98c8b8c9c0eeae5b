//! Particle textures and the embedded `.pex` texture payload codec
//!
//! Particle Designer can inline the texture as `data="..."`: a base64 string
//! whose bytes are usually a gzip stream wrapping a PNG. Decoding goes
//! base64 → gzip inflate (only when the gzip magic is present) → image decode.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ember_core::{EmberError, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use image::{ImageFormat, RgbaImage};
use std::fmt;
use std::io::{Cursor, Read, Write};
use std::sync::Arc;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decoded RGBA8 texture, cheap to clone.
#[derive(Clone)]
pub struct Texture {
    image: Arc<RgbaImage>,
}

impl Texture {
    pub fn from_rgba(image: RgbaImage) -> Self {
        Self {
            image: Arc::new(image),
        }
    }

    /// Decode PNG/JPEG/... bytes
    pub fn from_image_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| EmberError::TextureLoadError(e.to_string()))?;
        Ok(Self::from_rgba(decoded.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Tightly packed RGBA8 rows
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        self.image
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| EmberError::TextureLoadError(e.to_string()))?;
        Ok(out.into_inner())
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl PartialEq for Texture {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.image, &other.image)
            || (self.width() == other.width()
                && self.height() == other.height()
                && self.pixels() == other.pixels())
    }
}

/// Decode a base64 payload; embedded line breaks and spaces are skipped.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| EmberError::DecodeError(format!("base64: {e}")))
}

/// Inflate a gzip stream, or pass the bytes through untouched if they are not gzip.
pub fn inflate_if_gzipped(bytes: Vec<u8>) -> Result<Vec<u8>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(bytes);
    }
    let mut out = Vec::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_end(&mut out)
        .map_err(|e| EmberError::DecodeError(format!("gzip: {e}")))?;
    Ok(out)
}

/// Full embedded-payload decode
pub fn decode_embedded(data: &str) -> Result<Texture> {
    let raw = decode_base64(data)?;
    let image_bytes = inflate_if_gzipped(raw)?;
    Texture::from_image_bytes(&image_bytes)
}

/// Inverse of [`decode_embedded`]: PNG, gzip, base64.
pub fn encode_embedded(texture: &Texture) -> Result<String> {
    let png = texture.to_png_bytes()?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&png)?;
    let compressed = encoder.finish()?;
    Ok(STANDARD.encode(compressed))
}
