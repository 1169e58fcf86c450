use axum::http::StatusCode;

/// Failure talking to the mood log backend.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },

    #[error("unknown store backend '{0}' (expected sheets, file or memory)")]
    UnknownBackend(String),

    #[error("no spreadsheet configured: set MOOD_SHEET_ID or MOOD_SHEET_NAME")]
    MissingSheet,

    #[error(
        "no credentials configured: set GOOGLE_APPLICATION_CREDENTIALS, MOOD_SERVICE_ACCOUNT_JSON or MOOD_ACCESS_TOKEN"
    )]
    MissingCredentials,
}

/// Startup failure. Fatal to the process.
#[derive(thiserror::Error, Debug)]
pub enum ConnectionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not load credentials: {0}")]
    Credentials(String),

    #[error("spreadsheet '{0}' not found")]
    SpreadsheetNotFound(String),

    #[error("spreadsheet has no worksheets")]
    NoWorksheet,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(thiserror::Error, Debug)]
#[error("Error recording mood: {0}")]
pub struct RecordError(#[source] pub StoreError);

#[derive(thiserror::Error, Debug)]
#[error("Error retrieving data: {0}")]
pub struct LoadError(#[source] pub StoreError);

/// A stored row whose timestamp could not be read.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("row {row}: unparseable timestamp '{value}'")]
pub struct ParseError {
    pub row: usize,
    pub value: String,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
