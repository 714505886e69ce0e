//! Slot records read from a JSON dump written by a scrape run.
//!
//! The file holds either an array of records or an object with a
//! `slots` array. It is re-read on every fetch.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use courtwatch_rules::PreferenceRule;

use crate::adapters::batch_for_court;
use crate::traits::{ScrapeError, SlotBatch, SlotSource};

/// Outer shape only; elements are decoded one by one.
#[derive(Deserialize)]
#[serde(untagged)]
enum SlotDump {
    List(Vec<Value>),
    Wrapped { slots: Vec<Value> },
}

impl SlotDump {
    fn into_records(self) -> Vec<Value> {
        match self {
            SlotDump::List(records) | SlotDump::Wrapped { slots: records } => records,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SlotSource for FileSource {
    async fn fetch(&self, rule: &PreferenceRule) -> Result<SlotBatch, ScrapeError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ScrapeError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        let dump: SlotDump = serde_json::from_str(&content)?;
        let batch = batch_for_court(dump.into_records(), &rule.court);
        tracing::debug!(
            path = %self.path.display(),
            court = %rule.court,
            count = batch.raw.len(),
            malformed = batch.malformed,
            "read slot dump"
        );
        Ok(batch)
    }

    fn kind(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn dump(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn reads_records_for_rule_court() {
        let file = dump(
            r#"[
                {"court": "Riverside", "start": "2026-10-17T18:00:00", "duration_minutes": 60},
                {"court": "Hillside", "start": "2026-10-17T18:00:00", "duration_minutes": 60},
                {"court": "Riverside", "date": "2026-10-18", "time_label": "9:00am", "duration": 90}
            ]"#,
        );
        let source = FileSource::new(file.path());
        let batch = source.fetch(&PreferenceRule::new("Riverside")).await.unwrap();
        assert_eq!(batch.raw.len(), 2);
        assert_eq!(batch.malformed, 0);
    }

    #[tokio::test]
    async fn one_bad_record_does_not_lose_the_rest() {
        let file = dump(
            r#"[
                {"court": "Riverside", "date": "2026-10-17", "start": "18:00", "duration": 60},
                {"court": "Riverside", "date": "2026-10-17", "start": "19:00", "duration": 60.5}
            ]"#,
        );
        let batch = FileSource::new(file.path())
            .fetch(&PreferenceRule::new("Riverside"))
            .await
            .unwrap();
        assert_eq!(batch.raw.len(), 1);
        assert_eq!(batch.malformed, 1);
    }

    #[tokio::test]
    async fn accepts_wrapped_dump() {
        let file = dump(r#"{"slots": [{"court": "Riverside", "date": "2026-10-17", "start": "18:00", "duration": 60}]}"#);
        let batch = FileSource::new(file.path())
            .fetch(&PreferenceRule::new("Riverside"))
            .await
            .unwrap();
        assert_eq!(batch.raw.len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("nope.json"));
        let err = source.fetch(&PreferenceRule::new("Riverside")).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Io { .. }));
    }

    #[tokio::test]
    async fn garbage_is_decode_error() {
        let file = dump("not json at all");
        let err = FileSource::new(file.path())
            .fetch(&PreferenceRule::new("Riverside"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Decode(_)));
    }
}
