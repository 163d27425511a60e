/// The record store manages the delimited remark file.
///
/// It is loaded in full at startup, mutated in memory on every
/// navigation event, and written back in full at shutdown. Row order is
/// meaningful: it is the insertion order of the in-memory mapping, and
/// the record of the photo viewed last is moved to the end on save so
/// the next session can continue where this one stopped.
///
/// The file on disk is plain comma-delimited rows without a header,
/// encoded as Shift_JIS (the file is shared with spreadsheet tooling
/// that still expects the legacy encoding).

use std::fs;
use std::io;
use std::path::Path;

use encoding_rs::SHIFT_JIS;

use super::data::{Derived, ImageRecord, SCHEMA};
use crate::error::Result;

/// File name of the record store, resolved against the photo root
pub const RECORD_FILE: &str = "info.csv";

/// In-memory mapping from image path to record.
///
/// Backed by a plain vector: lookups are by linear scan, which is more
/// than enough for a single operator stepping through a few thousand
/// photos, and keeps insertion order for free.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<ImageRecord>,
}

impl RecordStore {
    /// Read the record file. A missing file is not an error: it just
    /// means no remarks have been written yet.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(RecordStore::default());
            }
            Err(e) => return Err(e.into()),
        };

        // Decode the legacy encoding before handing the text to the
        // CSV parser. Undecodable bytes become replacement characters
        // rather than aborting the load.
        let (text, _, _) = SHIFT_JIS.decode(&bytes);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            // Tolerate rows written by older variants with a different
            // column count: pad to the full schema, drop anything extra.
            let mut padded = csv::StringRecord::new();
            for i in 0..SCHEMA.len() {
                padded.push_field(row.get(i).unwrap_or(""));
            }
            let record: ImageRecord = padded.deserialize(None)?;
            records.push(record);
        }

        Ok(RecordStore { records })
    }

    /// Overwrite the record file with every record in mapping order.
    /// Nothing is ever pruned: rows for photos that no longer exist on
    /// disk are written back verbatim.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut buf = Vec::new();
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut buf);
            for record in &self.records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }

        let text = String::from_utf8(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let (encoded, _, _) = SHIFT_JIS.encode(&text);
        fs::write(path, &encoded)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stored record for a path, if any.
    pub fn get(&self, path: &str) -> Option<&ImageRecord> {
        self.records.iter().find(|r| r.path == path)
    }

    /// Record for the photo under the cursor. A path with no row yet
    /// gets a default record pre-filled with the derived columns.
    pub fn get_or_synthesize(&self, derived: &Derived) -> ImageRecord {
        match self.get(&derived.path) {
            Some(record) => record.clone(),
            None => ImageRecord::synthesized(derived),
        }
    }

    /// Insert a record, or replace the existing one in place so the
    /// row keeps its position in the file.
    pub fn put(&mut self, record: ImageRecord) {
        match self.records.iter_mut().find(|r| r.path == record.path) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }

    /// Move the record for `path` to the end of the mapping. The last
    /// row identifies the photo to resume from on the next run.
    pub fn move_to_end(&mut self, path: &str) {
        if let Some(ix) = self.records.iter().position(|r| r.path == path) {
            let record = self.records.remove(ix);
            self.records.push(record);
        }
    }

    /// Path of the last row, the resume point recorded by the
    /// previous session.
    pub fn last_path(&self) -> Option<&str> {
        self.records.last().map(|r| r.path.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::REMARK_COUNT;

    fn record(path: &str, rem1: &str) -> ImageRecord {
        let derived = Derived::new(path.to_string(), "2019/08/01 10:35:02".to_string());
        let mut remarks: [String; REMARK_COUNT] = Default::default();
        remarks[0] = rem1.to_string();
        ImageRecord::committed(&derived, &remarks)
    }

    #[test]
    fn test_missing_file_yields_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::load(&dir.path().join(RECORD_FILE)).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_load_round_trip_preserves_order_and_text() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(RECORD_FILE);

        let mut store = RecordStore::default();
        store.put(record("1/a.jpg", "xyz"));
        store.put(record("1/b.jpg", "ほげほげ"));
        store.save(&file).unwrap();

        let reloaded = RecordStore::load(&file).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("1/a.jpg").unwrap().rem1, "xyz");
        assert_eq!(reloaded.get("1/b.jpg").unwrap().rem1, "ほげほげ");
        assert_eq!(reloaded.last_path(), Some("1/b.jpg"));
    }

    #[test]
    fn test_file_is_written_in_legacy_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(RECORD_FILE);

        let mut store = RecordStore::default();
        store.put(record("1/a.jpg", "テスト"));
        store.save(&file).unwrap();

        let bytes = fs::read(&file).unwrap();
        // Shift_JIS kana bytes are not valid UTF-8
        assert!(String::from_utf8(bytes.clone()).is_err());
        let (decoded, _, had_errors) = SHIFT_JIS.decode(&bytes);
        assert!(!had_errors);
        assert!(decoded.contains("テスト"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(RECORD_FILE);
        fs::write(&file, b"1/a.jpg,1\n").unwrap();

        let store = RecordStore::load(&file).unwrap();
        let rec = store.get("1/a.jpg").unwrap();
        assert_eq!(rec.camera, "1");
        assert_eq!(rec.filename, "");
        assert!(!rec.has_remarks());
    }

    #[test]
    fn test_put_replaces_in_place() {
        let mut store = RecordStore::default();
        store.put(record("1/a.jpg", "first"));
        store.put(record("1/b.jpg", "second"));
        store.put(record("1/a.jpg", "updated"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("1/a.jpg").unwrap().rem1, "updated");
        // replaced row keeps its original position
        assert_eq!(store.records[0].path, "1/a.jpg");
    }

    #[test]
    fn test_move_to_end_sets_resume_point() {
        let mut store = RecordStore::default();
        store.put(record("1/a.jpg", ""));
        store.put(record("1/b.jpg", ""));
        store.put(record("2/c.jpg", ""));

        store.move_to_end("1/b.jpg");
        assert_eq!(store.last_path(), Some("1/b.jpg"));
        assert_eq!(store.records[0].path, "1/a.jpg");
        assert_eq!(store.records[1].path, "2/c.jpg");

        // unknown paths are a no-op
        store.move_to_end("9/gone.jpg");
        assert_eq!(store.last_path(), Some("1/b.jpg"));
    }

    /// The whole two-photo session: remark "xyz" on the first photo,
    /// "next", then close on the second photo without edits.
    #[test]
    fn test_two_photo_session_scenario() {
        use crate::state::catalog::Catalog;

        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("1")).unwrap();
        fs::write(dir.path().join("1/a.jpg"), b"x").unwrap();
        fs::write(dir.path().join("1/b.jpg"), b"x").unwrap();
        let file = dir.path().join(RECORD_FILE);

        let mut catalog = Catalog::discover(dir.path());
        // traversal order is not guaranteed, pin the start of the walk
        catalog.resume_at("1/a.jpg");
        let mut store = RecordStore::load(&file).unwrap();
        assert!(store.is_empty());

        // at 1/a.jpg: type "xyz" into rem1, click "next"
        let a = Derived::new(catalog.current().to_string(), "2019/08/01 10:35:02".to_string());
        store.put(ImageRecord::committed(
            &a,
            &["xyz".to_string(), String::new(), String::new()],
        ));
        catalog.advance();

        // at 1/b.jpg: no edits, close the window
        let b = Derived::new(catalog.current().to_string(), "2019/08/02 09:00:00".to_string());
        assert_eq!(b.path, "1/b.jpg");
        store.put(ImageRecord::committed(&b, &Default::default()));
        store.move_to_end(&b.path);
        store.save(&file).unwrap();

        // the file holds both rows, derived columns filled in, and the
        // photo viewed last sits at the end
        let reloaded = RecordStore::load(&file).unwrap();
        assert_eq!(reloaded.len(), 2);
        let rec_a = reloaded.get("1/a.jpg").unwrap();
        assert_eq!(rec_a.rem1, "xyz");
        assert_eq!((rec_a.camera.as_str(), rec_a.filename.as_str()), ("1", "a.jpg"));
        assert_eq!(rec_a.timestamp, "2019/08/01");
        let rec_b = reloaded.get("1/b.jpg").unwrap();
        assert!(!rec_b.has_remarks());
        assert_eq!(rec_b.timestamp, "2019/08/02");
        assert_eq!(reloaded.last_path(), Some("1/b.jpg"));

        // a fresh run resumes the cursor at that photo
        let mut fresh = Catalog::discover(dir.path());
        fresh.resume_at(reloaded.last_path().unwrap());
        assert_eq!(fresh.current(), "1/b.jpg");
    }

    #[test]
    fn test_rows_for_deleted_photos_survive_a_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(RECORD_FILE);

        let mut store = RecordStore::default();
        store.put(record("9/deleted.jpg", "keep me"));
        store.put(record("1/a.jpg", "xyz"));
        store.save(&file).unwrap();

        // a later session never prunes rows it does not visit
        let mut reloaded = RecordStore::load(&file).unwrap();
        reloaded.put(record("1/a.jpg", "changed"));
        reloaded.save(&file).unwrap();

        let last = RecordStore::load(&file).unwrap();
        assert_eq!(last.get("9/deleted.jpg").unwrap().rem1, "keep me");
        assert_eq!(last.records[0].path, "9/deleted.jpg");
    }
}
