use super::{MoodLog, header_row, records_from_values};
use crate::errors::StoreError;
use crate::models::RawRecord;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// In-process mood log. Can be told to fail to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryLog {
    values: Mutex<Vec<Vec<String>>>,
    fail_appends: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = [String; 3]>,
    {
        let mut values = vec![header_row()];
        values.extend(rows.into_iter().map(|row| row.to_vec()));
        Self {
            values: Mutex::new(values),
            ..Self::default()
        }
    }

    pub fn fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub async fn row_count(&self) -> usize {
        self.values.lock().await.len().saturating_sub(1)
    }
}

#[async_trait]
impl MoodLog for MemoryLog {
    async fn append_row(&self, row: [String; 3]) -> Result<(), StoreError> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("append rejected".to_string()));
        }
        let mut values = self.values.lock().await;
        if values.is_empty() {
            values.push(header_row());
        }
        values.push(row.to_vec());
        Ok(())
    }

    async fn get_all_records(&self) -> Result<Vec<RawRecord>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("read rejected".to_string()));
        }
        Ok(records_from_values(&self.values.lock().await))
    }
}
