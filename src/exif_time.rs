/// EXIF capture time extraction
///
/// The timestamp column of every record comes from the photo's EXIF
/// block. Cameras write it as `YYYY:MM:DD HH:MM:SS`; we reformat it to
/// `YYYY/MM/DD HH:MM:SS` for display. A photo without a usable capture
/// time stops the program: the column cannot be synthesized.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDateTime;
use exif::{In, Tag, Value};

use crate::error::{Error, Result};

/// Textual pattern cameras use in the EXIF DateTime tags
const EXIF_PATTERN: &str = "%Y:%m:%d %H:%M:%S";
/// Pattern used for display and the record file
const DISPLAY_PATTERN: &str = "%Y/%m/%d %H:%M:%S";

/// Read and reformat the capture time of a photo.
pub fn capture_datetime(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new()
        .read_from_container(&mut reader)
        .map_err(|source| Error::Exif {
            path: path.to_path_buf(),
            source,
        })?;

    datetime_field(&exif)
        .and_then(|raw| reformat(&raw))
        .ok_or_else(|| Error::CaptureTime(path.to_path_buf()))
}

/// First usable DateTime tag, preferring the original capture time
/// over the file modification time some editors rewrite.
fn datetime_field(exif: &exif::Exif) -> Option<String> {
    for tag in [Tag::DateTimeOriginal, Tag::DateTime] {
        if let Some(field) = exif.get_field(tag, In::PRIMARY) {
            if let Value::Ascii(ref vec) = field.value {
                if let Some(bytes) = vec.first() {
                    if let Ok(s) = std::str::from_utf8(bytes) {
                        return Some(s.trim().to_string());
                    }
                }
            }
        }
    }
    None
}

/// Reparse `YYYY:MM:DD HH:MM:SS` into the display form.
/// Returns `None` when the tag text does not match the pattern.
fn reformat(raw: &str) -> Option<String> {
    NaiveDateTime::parse_from_str(raw, EXIF_PATTERN)
        .ok()
        .map(|dt| dt.format(DISPLAY_PATTERN).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reformat_camera_pattern() {
        assert_eq!(
            reformat("2019:08:01 10:35:02").as_deref(),
            Some("2019/08/01 10:35:02")
        );
    }

    #[test]
    fn test_reformat_rejects_malformed_input() {
        assert_eq!(reformat(""), None);
        assert_eq!(reformat("2019-08-01 10:35:02"), None);
        assert_eq!(reformat("2019:13:45 99:99:99"), None);
    }

    #[test]
    fn test_missing_exif_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.jpg");
        // a bare pixel written by the image crate carries no EXIF block
        image::RgbImage::new(1, 1).save(&path).unwrap();

        match capture_datetime(&path) {
            Err(Error::Exif { .. }) | Err(Error::CaptureTime(_)) => {}
            other => panic!("expected an EXIF error, got {:?}", other),
        }
    }
}
