/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the record file layer and the UI layer.

use serde::{Deserialize, Serialize};

/// Describes one column of the record file.
///
/// The column set is fixed at compile time. `shown` columns appear as
/// editable inputs in the window; hidden columns are derived from the
/// image itself and written on every commit.
pub struct FieldDef {
    /// Column name, also used as the input label
    pub name: &'static str,
    /// Whether the field is shown as an editable input
    pub shown: bool,
}

/// The full column schema, in record-file order.
pub const SCHEMA: [FieldDef; 7] = [
    FieldDef { name: "jpg", shown: false },
    FieldDef { name: "camnum", shown: false },
    FieldDef { name: "filename", shown: false },
    FieldDef { name: "timestamp", shown: false },
    FieldDef { name: "rem1", shown: true },
    FieldDef { name: "rem2", shown: true },
    FieldDef { name: "rem3", shown: true },
];

/// Number of free-text remark columns
pub const REMARK_COUNT: usize = 3;

/// Values derived from the image itself when it comes into view.
///
/// These never depend on user input: the path identifies the record,
/// the camera number is the top-level directory the photo sits in,
/// and the capture time comes from the EXIF block.
#[derive(Debug, Clone, PartialEq)]
pub struct Derived {
    /// Relative path of the image, `/`-separated (the record key)
    pub path: String,
    /// Capture-device id = top-level directory segment
    pub camera: String,
    /// Bare filename (final path segment)
    pub filename: String,
    /// Reformatted capture time, `YYYY/MM/DD HH:MM:SS`
    pub datetime: String,
}

impl Derived {
    /// Build the derived values for an image path.
    /// `datetime` is the already-reformatted EXIF capture time.
    pub fn new(path: String, datetime: String) -> Self {
        let camera = camera_of(&path);
        let filename = filename_of(&path);
        Derived {
            path,
            camera,
            filename,
            datetime,
        }
    }

    /// Date component of the capture time (`YYYY/MM/DD`).
    /// Only the date is persisted to the record file.
    pub fn date(&self) -> &str {
        self.datetime.split(' ').next().unwrap_or("")
    }
}

/// Capture-device id for a relative image path.
/// Photos live directly under one directory per camera, so the id is
/// the first path segment. A photo at the root has no camera id.
pub fn camera_of(path: &str) -> String {
    match path.split_once('/') {
        Some((camera, _)) => camera.to_string(),
        None => String::new(),
    }
}

/// Final path segment of a relative image path.
pub fn filename_of(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}

/// One row of the record file.
///
/// Field order matches [`SCHEMA`]; the serialized CSV row is exactly
/// these fields in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub path: String,
    pub camera: String,
    pub filename: String,
    pub timestamp: String,
    pub rem1: String,
    pub rem2: String,
    pub rem3: String,
}

impl ImageRecord {
    /// Default record for a path that has no row yet: identifier
    /// columns pre-filled from the derived values, remarks empty.
    pub fn synthesized(derived: &Derived) -> Self {
        ImageRecord {
            path: derived.path.clone(),
            camera: derived.camera.clone(),
            filename: derived.filename.clone(),
            timestamp: derived.date().to_string(),
            rem1: String::new(),
            rem2: String::new(),
            rem3: String::new(),
        }
    }

    /// The record written on every navigation event: remark columns
    /// take the edit boxes verbatim (empty stays empty), identifier
    /// columns always take the freshly derived values.
    pub fn committed(derived: &Derived, remarks: &[String; REMARK_COUNT]) -> Self {
        ImageRecord {
            path: derived.path.clone(),
            camera: derived.camera.clone(),
            filename: derived.filename.clone(),
            timestamp: derived.date().to_string(),
            rem1: remarks[0].clone(),
            rem2: remarks[1].clone(),
            rem3: remarks[2].clone(),
        }
    }

    /// Remark columns in schema order.
    pub fn remarks(&self) -> [&str; REMARK_COUNT] {
        [&self.rem1, &self.rem2, &self.rem3]
    }

    /// True when any remark column carries text.
    pub fn has_remarks(&self) -> bool {
        self.remarks().iter().any(|r| !r.is_empty())
    }

    /// `name=value` pairs of the shown columns, for the commit log line.
    pub fn log_line(&self) -> String {
        SCHEMA
            .iter()
            .filter(|f| f.shown)
            .zip(self.remarks())
            .map(|(f, v)| format!("{}={}", f.name, v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derived() -> Derived {
        Derived::new(
            "2/IMAG0001.JPG".to_string(),
            "2019/08/01 10:35:02".to_string(),
        )
    }

    #[test]
    fn test_camera_is_top_level_segment() {
        assert_eq!(camera_of("1/IMAG0001.JPG"), "1");
        assert_eq!(camera_of("2/sub/IMAG0002.JPG"), "2");
        assert_eq!(camera_of("IMAG0003.JPG"), "");
    }

    #[test]
    fn test_filename_is_final_segment() {
        assert_eq!(filename_of("1/IMAG0001.JPG"), "IMAG0001.JPG");
        assert_eq!(filename_of("2/sub/IMAG0002.JPG"), "IMAG0002.JPG");
        assert_eq!(filename_of("IMAG0003.JPG"), "IMAG0003.JPG");
    }

    #[test]
    fn test_synthesized_prefills_identifiers() {
        let rec = ImageRecord::synthesized(&derived());
        assert_eq!(rec.path, "2/IMAG0001.JPG");
        assert_eq!(rec.camera, "2");
        assert_eq!(rec.filename, "IMAG0001.JPG");
        // date component only
        assert_eq!(rec.timestamp, "2019/08/01");
        assert!(!rec.has_remarks());
    }

    #[test]
    fn test_committed_takes_remarks_verbatim() {
        let remarks = ["xyz".to_string(), String::new(), "後で確認".to_string()];
        let rec = ImageRecord::committed(&derived(), &remarks);
        assert_eq!(rec.rem1, "xyz");
        assert_eq!(rec.rem2, "");
        assert_eq!(rec.rem3, "後で確認");
        assert_eq!(rec.timestamp, "2019/08/01");
        assert!(rec.has_remarks());
    }

    #[test]
    fn test_log_line_lists_shown_fields() {
        let remarks = ["a".to_string(), String::new(), "c".to_string()];
        let rec = ImageRecord::committed(&derived(), &remarks);
        assert_eq!(rec.log_line(), "rem1=a, rem2=, rem3=c");
    }

    #[test]
    fn test_schema_shape() {
        assert_eq!(SCHEMA.len(), 7);
        assert_eq!(SCHEMA.iter().filter(|f| f.shown).count(), REMARK_COUNT);
        // identifier columns come first, remarks last
        assert!(SCHEMA[..4].iter().all(|f| !f.shown));
        assert!(SCHEMA[4..].iter().all(|f| f.shown));
    }
}
