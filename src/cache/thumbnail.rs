/// Thumbnail generation and on-disk caching
///
/// Source photos are far too large to decode on every visit, so the
/// first time an image comes into view a downscaled PNG is written
/// under the cache root and reused from then on. The cache mirrors the
/// photo tree: `1/IMAG0001.JPG` caches to `temp/1/IMAG0001.png`.
///
/// The cache is existence-checked only. A source photo edited after
/// its thumbnail was written keeps showing the stale thumbnail; delete
/// the cache entry by hand to refresh it.

use image::imageops::FilterType;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::state::catalog::key_to_path;

/// Directory under the photo root where thumbnails are cached
pub const CACHE_ROOT: &str = "temp";

/// Bounding box thumbnails are scaled to fit within (square)
const THUMBNAIL_SIZE: u32 = 832;

/// Deterministic cache path for a relative image path.
pub fn cache_path(root: &Path, relative: &str) -> PathBuf {
    let mut path = root.join(CACHE_ROOT).join(key_to_path(relative));
    path.set_extension("png");
    path
}

/// Make sure a photo's thumbnail exists and return its path.
///
/// If the cache file is already there it is returned as-is, without
/// touching the source image. Otherwise the source is decoded, scaled
/// down to fit within the bounding box (aspect ratio preserved, small
/// images are left at their original size), and saved as PNG with any
/// intervening cache directories created on the way.
pub fn ensure_thumbnail(root: &Path, relative: &str) -> Result<PathBuf> {
    let target = cache_path(root, relative);
    if target.exists() {
        return Ok(target);
    }

    let source = root.join(key_to_path(relative));
    let img = image::open(&source).map_err(|source_err| Error::Image {
        path: source.clone(),
        source: source_err,
    })?;

    let thumbnail = if img.width() > THUMBNAIL_SIZE || img.height() > THUMBNAIL_SIZE {
        img.resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Lanczos3)
    } else {
        // already fits, never upscale
        img
    };

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    thumbnail.save(&target).map_err(|source_err| Error::Image {
        path: target.clone(),
        source: source_err,
    })?;

    println!("📸 Generated thumbnail: {}", target.display());
    Ok(target)
}
