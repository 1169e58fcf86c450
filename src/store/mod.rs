//! Backends for the shared mood log.
//!
//! Every backend exposes the log the way a spreadsheet does: a header row
//! followed by one row per entry.

pub mod auth;
pub mod file;
pub mod memory;
pub mod sheets;

use crate::config::{CredentialSource, StoreBackend};
use crate::errors::{ConnectionError, StoreError};
use crate::models::{LOG_COLUMNS, RawRecord};
use async_trait::async_trait;
use auth::{ServiceAccountKey, ServiceAccountTokens, StaticToken, TokenSource};
use serde_json::Value;
use sheets::Endpoints;
use std::sync::Arc;
use tracing::info;

pub use file::FileLog;
pub use memory::MemoryLog;
pub use sheets::SheetsLog;

#[async_trait]
pub trait MoodLog: Send + Sync {
    /// Appends `[timestamp, mood, note]` after the last row.
    async fn append_row(&self, row: [String; 3]) -> Result<(), StoreError>;

    /// Every data row keyed by the header names.
    async fn get_all_records(&self) -> Result<Vec<RawRecord>, StoreError>;
}

/// Opens the configured backend. Any failure here is fatal to the process.
pub async fn connect(backend: &StoreBackend) -> Result<Arc<dyn MoodLog>, ConnectionError> {
    match backend {
        StoreBackend::Sheets {
            target,
            credentials,
        } => {
            let client = reqwest::Client::new();
            let tokens = token_source(credentials, client.clone()).await?;
            let log = SheetsLog::connect(target.clone(), tokens, client, Endpoints::default()).await?;
            Ok(Arc::new(log))
        }
        StoreBackend::File(path) => {
            let log = FileLog::open(path.clone()).await?;
            info!("using local mood log at {}", log.path().display());
            Ok(Arc::new(log))
        }
        StoreBackend::Memory => {
            info!("using in-memory mood log; entries are lost on exit");
            Ok(Arc::new(MemoryLog::new()))
        }
    }
}

async fn token_source(
    credentials: &CredentialSource,
    client: reqwest::Client,
) -> Result<Arc<dyn TokenSource>, ConnectionError> {
    let key = match credentials {
        CredentialSource::AccessToken(token) => return Ok(Arc::new(StaticToken(token.clone()))),
        CredentialSource::KeyJson(raw) => ServiceAccountKey::from_json(raw)?,
        CredentialSource::KeyFile(path) => ServiceAccountKey::from_file(path).await?,
    };
    let tokens = ServiceAccountTokens::new(key, client)?;
    info!("authenticating as {}", tokens.client_email());
    tokens.access_token().await?;
    Ok(Arc::new(tokens))
}

pub fn header_row() -> Vec<String> {
    LOG_COLUMNS.iter().map(|name| name.to_string()).collect()
}

/// Maps a value grid onto header-keyed records. Short rows are padded with
/// empty strings and blank rows are skipped.
pub fn records_from_values(values: &[Vec<String>]) -> Vec<RawRecord> {
    let Some((header, rows)) = values.split_first() else {
        return Vec::new();
    };

    rows.iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| {
            header
                .iter()
                .enumerate()
                .filter(|(_, name)| !name.is_empty())
                .map(|(i, name)| {
                    let cell = row.get(i).cloned().unwrap_or_default();
                    (name.clone(), Value::String(cell))
                })
                .collect()
        })
        .collect()
}
