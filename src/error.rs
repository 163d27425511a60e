/// Crate-wide error type
///
/// Everything that can fail while loading the record file, scanning for
/// images, reading EXIF metadata, or producing thumbnails funnels into
/// this enum. The update loop treats most of these as fatal (the tool
/// cannot meaningfully continue without its record file or thumbnails),
/// so callers either propagate with `?` or stop with `expect`.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem problem (record file, cache directories, thumbnails)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The record file exists but is not parseable as delimited rows
    #[error("record file is not valid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Source image could not be decoded or the thumbnail not encoded
    #[error("image processing failed for {path}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    /// The EXIF block could not be read at all
    #[error("EXIF read failed for {path}: {source}")]
    Exif { path: PathBuf, source: exif::Error },

    /// EXIF was readable but carried no usable capture time.
    /// The viewer cannot proceed without it: the timestamp column is
    /// part of every record.
    #[error("no usable EXIF capture time in {0}")]
    CaptureTime(PathBuf),
}
