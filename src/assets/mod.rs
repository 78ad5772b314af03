//! Imported-image handling: decoding bytes into cached pixel data keyed by
//! content hash, plus the deferred texture-load queue.
//!
//! Decoding happens once at import time; attaching pixels to a live
//! material is deferred to the frame tick, mirroring the out-of-band
//! texture loads of the rendering engine. A completion that arrives after
//! its material was disposed is simply dropped.

use crate::color;
use crate::render::{MaterialHandle, Resources};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Opaque content reference for an imported image: hex SHA-256 of the
/// source bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct TextureRef(String);

impl TextureRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[cfg(test)]
    pub fn from_raw(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to decode image bytes: {0}")]
    Decode(#[from] image::ImageError),
    #[error("imported image has no pixels")]
    EmptyImage,
}

#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedImage {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Content-addressed cache of decoded images.
#[derive(Debug, Default)]
pub struct TextureStore {
    images: HashMap<TextureRef, DecodedImage>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `bytes` and caches the pixels. Returns the content reference
    /// and the width/height aspect ratio. Re-importing identical bytes is
    /// idempotent.
    pub fn import_image(&mut self, bytes: &[u8]) -> Result<(TextureRef, f32), AssetError> {
        let decoded = image::load_from_memory(bytes)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(AssetError::EmptyImage);
        }

        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let reference = TextureRef(format!("{:x}", hasher.finalize()));

        let entry = DecodedImage {
            width,
            height,
            rgba: rgba.into_raw(),
        };
        let aspect_ratio = entry.aspect_ratio();
        self.images.entry(reference.clone()).or_insert(entry);
        Ok((reference, aspect_ratio))
    }

    pub fn get(&self, reference: &TextureRef) -> Option<&DecodedImage> {
        self.images.get(reference)
    }
}

/// Pending texture attachments, completed during the frame tick.
#[derive(Debug, Default)]
pub struct TextureQueue {
    pending: Vec<(MaterialHandle, TextureRef)>,
}

impl TextureQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, material: MaterialHandle, reference: TextureRef) {
        self.pending.push((material, reference));
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Completes every pending load. Loads whose material has since been
    /// disposed are inert; a missing cache entry falls back to neutral gray
    /// on the material and is only logged.
    pub fn pump(&mut self, store: &TextureStore, resources: &mut Resources) {
        for (material, reference) in self.pending.drain(..) {
            if !resources.material_alive(material) {
                continue;
            }
            match store.get(&reference) {
                Some(image) => {
                    let texture = resources.create_texture(image.width, image.height);
                    if let Some(slot) = resources.material_mut(material) {
                        slot.texture = Some(texture);
                    }
                }
                None => {
                    log::warn!(
                        "texture load failed for {}: not in store, using fallback color",
                        reference.as_str()
                    );
                    if let Some(slot) = resources.material_mut(material) {
                        slot.color = color::NEUTRAL_GRAY;
                    }
                }
            }
        }
    }
}
