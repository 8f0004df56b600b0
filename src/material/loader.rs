// SPDX-License-Identifier: MPL-2.0
//! Texture file decoding.

use super::texture::TextureImage;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Decodes an image file into RGBA8.
pub fn decode_texture(path: &Path) -> Result<TextureImage> {
    let image = image_rs::open(path)?.to_rgba8();
    let (width, height) = image.dimensions();
    TextureImage::new(width, height, image.into_raw())
        .ok_or_else(|| Error::Texture(format!("inconsistent pixel buffer in {}", path.display())))
}

/// Decodes a texture on the blocking thread pool.
pub async fn load_texture(path: PathBuf) -> Result<TextureImage> {
    tokio::task::spawn_blocking(move || {
        let started = std::time::Instant::now();
        let result = decode_texture(&path);
        match &result {
            Ok(image) => tracing::debug!(
                path = %path.display(),
                width = image.width,
                height = image.height,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "decoded texture"
            ),
            Err(err) => tracing::warn!(path = %path.display(), error = %err, "texture load failed"),
        }
        result
    })
    .await
    .map_err(|e| Error::Texture(e.to_string()))?
}
