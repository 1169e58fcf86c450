use super::{MoodLog, header_row, records_from_values};
use crate::errors::StoreError;
use crate::models::RawRecord;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::{fs, sync::Mutex};
use tracing::{debug, error};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct SheetFile {
    values: Vec<Vec<String>>,
}

/// Mood log kept in a local JSON file.
#[derive(Debug)]
pub struct FileLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileLog {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        debug!("using mood log file {}", path.display());
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn read_sheet(path: &Path) -> Result<SheetFile, StoreError> {
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| {
            error!("failed to parse mood log {}: {err}", path.display());
            StoreError::Json(err)
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(SheetFile::default()),
        Err(err) => {
            error!("failed to read mood log {}: {err}", path.display());
            Err(err.into())
        }
    }
}

async fn persist_sheet(path: &Path, sheet: &SheetFile) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(sheet)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, payload).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl MoodLog for FileLog {
    async fn append_row(&self, row: [String; 3]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut sheet = read_sheet(&self.path).await?;
        if sheet.values.is_empty() {
            sheet.values.push(header_row());
        }
        sheet.values.push(row.to_vec());
        persist_sheet(&self.path, &sheet).await
    }

    async fn get_all_records(&self) -> Result<Vec<RawRecord>, StoreError> {
        let sheet = read_sheet(&self.path).await?;
        Ok(records_from_values(&sheet.values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ts: &str, mood: &str, note: &str) -> [String; 3] {
        [ts.to_string(), mood.to_string(), note.to_string()]
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileLog::open(dir.path().join("nested/moods.json")).await.unwrap();
        assert!(log.get_all_records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn appends_write_header_once_and_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moods.json");

        let log = FileLog::open(&path).await.unwrap();
        log.append_row(row("2024-01-01T10:00:00", "😊", "")).await.unwrap();
        log.append_row(row("2024-01-01T11:00:00", "😠", "queue stuck")).await.unwrap();

        let reopened = FileLog::open(&path).await.unwrap();
        let records = reopened.get_all_records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["note"], "queue stuck");

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["values"][0][0], "timestamp");
        assert_eq!(raw["values"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moods.json");
        std::fs::write(&path, b"{not json").unwrap();

        let log = FileLog::open(&path).await.unwrap();
        assert!(matches!(log.get_all_records().await, Err(StoreError::Json(_))));
        assert!(log.append_row(row("x", "y", "z")).await.is_err());
    }
}
