use std::collections::HashMap;
use std::path::PathBuf;

/// Provenance of a registered artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileSource {
    /// Delivered inline with its content on a `files` record.
    Direct,
    /// Discovered through a code-interpreter observation in telemetry.
    CodeInterpreter,
}

/// One artifact known to the registry.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FileRecord {
    /// File name, unique within the registry.
    pub name: String,
    /// Content-type label.
    #[serde(rename = "type")]
    pub media_type: String,
    /// Resolved storage location.
    pub path: PathBuf,
    /// How the artifact was discovered.
    pub source: FileSource,
}

/// Ordered, name-deduplicated collection of artifact records.
///
/// Iteration order is first-registration order and is never changed by later
/// mentions of the same name.
#[derive(Debug, Default)]
pub struct FileRegistry {
    records: Vec<FileRecord>,
    index: HashMap<String, usize>,
}

impl FileRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, or applies the provenance upgrade rule if one with
    /// the same name already exists.
    ///
    /// An existing record only ever changes its `source`, and only from
    /// `Direct` to `CodeInterpreter`; every other field keeps its original
    /// value. The upgrade is one-directional and idempotent.
    pub fn register(&mut self, record: FileRecord) {
        match self.index.get(&record.name) {
            Some(&pos) => {
                if record.source == FileSource::CodeInterpreter {
                    self.records[pos].source = FileSource::CodeInterpreter;
                }
            }
            None => {
                self.index.insert(record.name.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Records in first-registration order.
    pub fn snapshot(&self) -> &[FileRecord] {
        &self.records
    }

    /// Looks up a record by name.
    pub fn get(&self, name: &str) -> Option<&FileRecord> {
        self.index.get(name).map(|&pos| &self.records[pos])
    }

    /// Number of distinct registered names.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in first-registration order.
    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter()
    }
}

/// Maps a file name's extension to a coarse content-type label.
///
/// Used only for code-interpreter mentions; inline artifacts carry their own
/// declared type and bypass this classifier.
pub fn content_type_for(name: &str) -> String {
    let ext = std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" | "jpg" | "jpeg" | "gif" => format!("image/{ext}"),
        "csv" => "text/csv".to_string(),
        "xls" | "xlsx" => "application/vnd.ms-excel".to_string(),
        _ => "application/octet-stream".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, source: FileSource) -> FileRecord {
        FileRecord {
            name: name.to_string(),
            media_type: content_type_for(name),
            path: PathBuf::from(format!("/tmp/out/{name}")),
            source,
        }
    }

    #[test]
    fn registry_keeps_one_record_per_name() {
        let mut registry = FileRegistry::new();
        registry.register(record("a.csv", FileSource::Direct));
        registry.register(record("a.csv", FileSource::Direct));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn direct_record_is_upgraded_by_code_interpreter_mention() {
        let mut registry = FileRegistry::new();
        registry.register(record("a.csv", FileSource::Direct));
        registry.register(record("a.csv", FileSource::CodeInterpreter));
        assert_eq!(
            registry.get("a.csv").map(|r| r.source),
            Some(FileSource::CodeInterpreter)
        );
    }

    #[test]
    fn code_interpreter_record_is_never_downgraded() {
        let mut registry = FileRegistry::new();
        registry.register(record("a.csv", FileSource::CodeInterpreter));
        registry.register(record("a.csv", FileSource::Direct));
        assert_eq!(
            registry.get("a.csv").map(|r| r.source),
            Some(FileSource::CodeInterpreter)
        );
    }

    #[test]
    fn upgrade_is_idempotent_and_preserves_other_fields() {
        let mut registry = FileRegistry::new();
        let mut first = record("report.bin", FileSource::Direct);
        first.media_type = "text/plain".to_string();
        registry.register(first);

        let mut later = record("report.bin", FileSource::CodeInterpreter);
        later.media_type = "application/octet-stream".to_string();
        later.path = PathBuf::from("/elsewhere/report.bin");
        registry.register(later.clone());
        registry.register(later);

        let kept = registry.get("report.bin").unwrap();
        assert_eq!(kept.source, FileSource::CodeInterpreter);
        assert_eq!(kept.media_type, "text/plain");
        assert_eq!(kept.path, PathBuf::from("/tmp/out/report.bin"));
    }

    #[test]
    fn snapshot_preserves_first_registration_order() {
        let mut registry = FileRegistry::new();
        registry.register(record("b.png", FileSource::Direct));
        registry.register(record("a.csv", FileSource::Direct));
        registry.register(record("b.png", FileSource::CodeInterpreter));
        let names: Vec<&str> = registry.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b.png", "a.csv"]);
    }

    #[test]
    fn content_type_covers_known_extensions() {
        assert_eq!(content_type_for("plot.png"), "image/png");
        assert_eq!(content_type_for("photo.JPG"), "image/jpg");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("anim.gif"), "image/gif");
        assert_eq!(content_type_for("data.csv"), "text/csv");
        assert_eq!(content_type_for("book.xls"), "application/vnd.ms-excel");
        assert_eq!(content_type_for("book.xlsx"), "application/vnd.ms-excel");
        assert_eq!(content_type_for("notes.txt"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }

    #[test]
    fn record_serializes_with_wire_field_names() {
        let value = serde_json::to_value(record("a.csv", FileSource::CodeInterpreter)).unwrap();
        assert_eq!(value["name"], "a.csv");
        assert_eq!(value["type"], "text/csv");
        assert_eq!(value["path"], "/tmp/out/a.csv");
        assert_eq!(value["source"], "code_interpreter");
    }
}
