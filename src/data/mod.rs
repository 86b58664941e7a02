//! Record sources.
//!
//! Records are loaded once at startup from a [`RecordSource`] and then
//! shared read-only. The built-in sample set is used when no data file
//! is configured.

use crate::models::Record;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while loading records.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("unsupported data format for {} (expected .json or .toml)", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Anything that can produce a finite list of records.
pub trait RecordSource {
    /// Load all records, in their original order.
    fn load(&self) -> Result<Vec<Record>, DataError>;

    /// Human-readable description of where records come from.
    fn describe(&self) -> String;
}

/// Records held in memory.
#[derive(Debug, Clone)]
pub struct StaticSource {
    records: Vec<Record>,
    label: String,
}

impl StaticSource {
    pub fn new(records: Vec<Record>, label: impl Into<String>) -> Self {
        Self {
            records,
            label: label.into(),
        }
    }

    /// The built-in fifteen-record sample set.
    pub fn sample() -> Self {
        Self::new(sample_records(), "built-in sample data")
    }
}

impl RecordSource for StaticSource {
    fn load(&self) -> Result<Vec<Record>, DataError> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// Supported record file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }
}

/// Records stored in a JSON or TOML file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

/// TOML layout: an array of `[[records]]` tables. The key is required so
/// a misspelled table name fails instead of loading nothing.
#[derive(Debug, Deserialize)]
struct TomlRecords {
    records: Vec<Record>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse(&self, format: FileFormat, content: &str) -> Result<Vec<Record>, DataError> {
        let parse_error = |message: String| DataError::Parse {
            path: self.path.clone(),
            message,
        };

        match format {
            FileFormat::Json => {
                serde_json::from_str::<Vec<Record>>(content).map_err(|e| parse_error(e.to_string()))
            }
            FileFormat::Toml => toml::from_str::<TomlRecords>(content)
                .map(|file| file.records)
                .map_err(|e| parse_error(e.to_string())),
        }
    }
}

impl RecordSource for FileSource {
    fn load(&self) -> Result<Vec<Record>, DataError> {
        let format = FileFormat::from_path(&self.path)
            .ok_or_else(|| DataError::UnsupportedFormat(self.path.clone()))?;

        debug!("Reading records from {} ({:?})", self.path.display(), format);

        let content = std::fs::read_to_string(&self.path).map_err(|source| DataError::Io {
            path: self.path.clone(),
            source,
        })?;

        let records = self.parse(format, &content)?;
        info!("Loaded {} records from {}", records.len(), self.path.display());

        Ok(records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Pick the source for an optional data file path.
pub fn source_for(path: Option<&Path>) -> Box<dyn RecordSource + Send + Sync> {
    match path {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(StaticSource::sample()),
    }
}

/// The reference data set: three givers over 2020-2024.
pub fn sample_records() -> Vec<Record> {
    vec![
        Record::new(2020, 5000, "おじいちゃん"),
        Record::new(2020, 3000, "おばあちゃん"),
        Record::new(2020, 2000, "叔父さん"),
        Record::new(2021, 5000, "おじいちゃん"),
        Record::new(2021, 3000, "おばあちゃん"),
        Record::new(2021, 3000, "叔父さん"),
        Record::new(2022, 10000, "おじいちゃん"),
        Record::new(2022, 5000, "おばあちゃん"),
        Record::new(2022, 3000, "叔父さん"),
        Record::new(2023, 10000, "おじいちゃん"),
        Record::new(2023, 5000, "おばあちゃん"),
        Record::new(2023, 5000, "叔父さん"),
        Record::new(2024, 10000, "おじいちゃん"),
        Record::new(2024, 5000, "おばあちゃん"),
        Record::new(2024, 5000, "叔父さん"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sample_source() {
        let source = StaticSource::sample();
        let records = source.load().unwrap();

        assert_eq!(records.len(), 15);
        assert_eq!(records[0], Record::new(2020, 5000, "おじいちゃん"));
        assert_eq!(source.describe(), "built-in sample data");
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_path(Path::new("a.json")), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_path(Path::new("a.TOML")), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_path(Path::new("a.csv")), None);
        assert_eq!(FileFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_load_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(
            &path,
            r#"[{"year": 2020, "amount": 5000, "giver": "A"},
               {"year": 2021, "amount": 3000, "giver": "B"}]"#,
        )
        .unwrap();

        let records = FileSource::new(&path).load().unwrap();
        assert_eq!(
            records,
            vec![Record::new(2020, 5000, "A"), Record::new(2021, 3000, "B")]
        );
    }

    #[test]
    fn test_load_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.toml");
        std::fs::write(
            &path,
            r#"
[[records]]
year = 2022
amount = 10000
giver = "C"

[[records]]
year = 2023
amount = 2000
giver = "D"
"#,
        )
        .unwrap();

        let records = FileSource::new(&path).load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1], Record::new(2023, 2000, "D"));
    }

    #[test]
    fn test_unsupported_format() {
        let err = FileSource::new("records.csv").load().unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = FileSource::new(dir.path().join("missing.json"))
            .load()
            .unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"[{"year": "soon"}]"#).unwrap();

        let err = FileSource::new(&path).load().unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_toml_without_records_table() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("typo.toml");
        std::fs::write(
            &path,
            r#"
[[record]]
year = 2022
amount = 10000
giver = "C"
"#,
        )
        .unwrap();

        let err = FileSource::new(&path).load().unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }));
        assert!(err.to_string().contains("records"));
    }

    #[test]
    fn test_source_for() {
        assert_eq!(source_for(None).describe(), "built-in sample data");
        assert_eq!(
            source_for(Some(Path::new("gifts.json"))).describe(),
            "gifts.json"
        );
    }
}
