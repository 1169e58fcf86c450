use super::auth::TokenSource;
use super::{MoodLog, header_row, records_from_values};
use crate::errors::{ConnectionError, StoreError};
use crate::models::RawRecord;
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DRIVE_FILES_API: &str = "https://www.googleapis.com/drive/v3/files";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub sheets: String,
    pub drive_files: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            sheets: SHEETS_API.to_string(),
            drive_files: DRIVE_FILES_API.to_string(),
        }
    }
}

/// How to locate the spreadsheet holding the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetTarget {
    Id(String),
    Name(String),
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<Worksheet>,
}

#[derive(Debug, Deserialize)]
struct Worksheet {
    properties: WorksheetProperties,
}

#[derive(Debug, Deserialize)]
struct WorksheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

/// Mood log stored in the first worksheet of a Google spreadsheet.
pub struct SheetsLog {
    client: reqwest::Client,
    tokens: Arc<dyn TokenSource>,
    endpoints: Endpoints,
    spreadsheet_id: String,
    worksheet: String,
}

impl SheetsLog {
    /// Resolves the spreadsheet, picks its first worksheet and makes sure the
    /// header row is present.
    pub async fn connect(
        target: SheetTarget,
        tokens: Arc<dyn TokenSource>,
        client: reqwest::Client,
        endpoints: Endpoints,
    ) -> Result<Self, ConnectionError> {
        let mut log = Self {
            client,
            tokens,
            endpoints,
            spreadsheet_id: String::new(),
            worksheet: String::new(),
        };

        log.spreadsheet_id = match target {
            SheetTarget::Id(id) => id,
            SheetTarget::Name(name) => log
                .find_spreadsheet(&name)
                .await?
                .ok_or(ConnectionError::SpreadsheetNotFound(name))?,
        };
        log.worksheet = log.first_worksheet().await?.ok_or(ConnectionError::NoWorksheet)?;
        log.ensure_header().await?;

        info!(
            "connected to spreadsheet {} (worksheet '{}')",
            log.spreadsheet_id, log.worksheet
        );
        Ok(log)
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn worksheet(&self) -> &str {
        &self.worksheet
    }

    async fn find_spreadsheet(&self, name: &str) -> Result<Option<String>, StoreError> {
        let query = format!(
            "name = '{}' and mimeType = '{SPREADSHEET_MIME}' and trashed = false",
            name.replace('\\', "\\\\").replace('\'', "\\'")
        );
        let url = parse_url(&self.endpoints.drive_files)?;
        let request = self.client.get(url).query(&[
            ("q", query.as_str()),
            ("fields", "files(id,name)"),
            ("supportsAllDrives", "true"),
            ("includeItemsFromAllDrives", "true"),
        ]);
        let list: FileList = self.send_json(request).await?;
        Ok(list.files.into_iter().next().map(|file| file.id))
    }

    async fn first_worksheet(&self) -> Result<Option<String>, StoreError> {
        let url = self.sheet_url(&[])?;
        let request = self
            .client
            .get(url)
            .query(&[("fields", "sheets.properties.title")]);
        let spreadsheet: Spreadsheet = self.send_json(request).await?;
        Ok(spreadsheet
            .sheets
            .into_iter()
            .next()
            .map(|sheet| sheet.properties.title))
    }

    async fn ensure_header(&self) -> Result<(), StoreError> {
        let header_range = format!("{}!A1:C1", self.range());
        if !self.get_values(&header_range).await?.is_empty() {
            return Ok(());
        }

        debug!("writing header row to empty worksheet '{}'", self.worksheet);
        let url = self.sheet_url(&["values", header_range.as_str()])?;
        let request = self
            .client
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "values": [header_row()] }));
        self.send(request).await.map(drop)
    }

    async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let url = self.sheet_url(&["values", range])?;
        let request = self.client.get(url).query(&[("majorDimension", "ROWS")]);
        let range: ValueRange = self.send_json(request).await?;
        Ok(range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_string).collect())
            .collect())
    }

    fn range(&self) -> String {
        format!("'{}'", self.worksheet.replace('\'', "''"))
    }

    fn sheet_url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = parse_url(&self.endpoints.sheets)?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Malformed(format!("bad base url {}", self.endpoints.sheets)))?
            .pop_if_empty()
            .push(&self.spreadsheet_id)
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let token = self.tokens.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Status { status, body })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let response = self.send(request).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl MoodLog for SheetsLog {
    async fn append_row(&self, row: [String; 3]) -> Result<(), StoreError> {
        let append_range = format!("{}:append", self.range());
        let url = self.sheet_url(&["values", append_range.as_str()])?;
        let request = self
            .client
            .post(url)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&json!({ "values": [row] }));
        self.send(request).await.map(drop)
    }

    async fn get_all_records(&self) -> Result<Vec<RawRecord>, StoreError> {
        let values = self.get_values(&self.range()).await?;
        Ok(records_from_values(&values))
    }
}

fn parse_url(raw: &str) -> Result<Url, StoreError> {
    Url::parse(raw).map_err(|err| StoreError::Malformed(format!("bad url {raw}: {err}")))
}

fn cell_string(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
