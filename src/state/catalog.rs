/// Image catalog: discovery and navigation position
///
/// The catalog is built once at startup by walking the photo tree and
/// stays fixed for the lifetime of the program. The cursor is an index
/// into it and wraps around in both directions, so "next" from the last
/// photo lands on the first one and vice versa.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cache::thumbnail::CACHE_ROOT;

/// File extensions recognized as photos (lowercase)
const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

/// Ordered list of discovered image paths plus the viewing position.
///
/// Paths are stored relative to the photo root with `/` separators so
/// they can double as platform-independent record keys.
#[derive(Debug)]
pub struct Catalog {
    entries: Vec<String>,
    cursor: usize,
}

impl Catalog {
    /// Walk the photo tree and collect every image file.
    ///
    /// Order is filesystem traversal order, not sorted. The cache
    /// directory is skipped so thumbnails never show up as photos.
    pub fn discover(root: &Path) -> Self {
        let mut entries = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.path() != root.join(CACHE_ROOT))
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            // Only process files (not directories)
            if !path.is_file() {
                continue;
            }

            // Check the extension, case-insensitively
            if let Some(extension) = path.extension() {
                let ext = extension.to_string_lossy().to_lowercase();
                if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
                    continue;
                }
            } else {
                continue;
            }

            if let Ok(relative) = path.strip_prefix(root) {
                entries.push(relative_key(relative));
            }
        }

        Catalog { entries, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Relative path of the image under the cursor.
    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Index of a path in the catalog, if it is still present on disk.
    pub fn position_of(&self, path: &str) -> Option<usize> {
        self.entries.iter().position(|p| p == path)
    }

    /// Continue from where the last session left off. A path that is
    /// no longer in the catalog resets the cursor to the first image.
    pub fn resume_at(&mut self, path: &str) {
        self.cursor = self.position_of(path).unwrap_or(0);
    }

    /// Move to the next image, wrapping past the end.
    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % self.entries.len();
    }

    /// Move to the previous image, wrapping before the start.
    pub fn retreat(&mut self) {
        self.cursor = (self.cursor + self.entries.len() - 1) % self.entries.len();
    }
}

/// Turn a relative `Path` into a `/`-separated record key.
fn relative_key(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Turn a `/`-separated record key back into a platform path.
pub fn key_to_path(key: &str) -> PathBuf {
    key.split('/').collect()
}
