use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Icons offered by the mood picker.
pub const MOOD_CHOICES: [&str; 4] = ["😊", "😠", "😕", "🎉"];

/// Column names of the log, in stored order.
pub const LOG_COLUMNS: [&str; 3] = ["timestamp", "mood", "note"];

/// One loosely typed row as handed back by the store.
pub type RawRecord = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodRecord {
    pub timestamp: Option<NaiveDateTime>,
    pub mood: String,
    pub note: String,
}

impl MoodRecord {
    /// Local calendar day of the entry, if the timestamp was readable.
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub moods: Vec<String>,
    pub group_by_day: bool,
}

impl Selection {
    pub fn today() -> Self {
        Self::default()
    }

    pub fn moods<I, S>(moods: I, group_by_day: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            moods: moods.into_iter().map(Into::into).collect(),
            group_by_day,
        }
    }

    pub fn is_default_view(&self) -> bool {
        self.moods.is_empty()
    }

    pub fn contains(&self, mood: &str) -> bool {
        self.moods.iter().any(|selected| selected == mood)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Today,
    Overall,
    ByDay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountRow {
    pub label: String,
    pub counts: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountTable {
    pub view: ViewKind,
    pub index: String,
    pub columns: Vec<String>,
    pub rows: Vec<CountRow>,
}

impl CountTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.rows
            .iter()
            .flat_map(|row| row.counts.iter())
            .sum()
    }

    pub fn get(&self, row: &str, column: &str) -> Option<u64> {
        let col = self.columns.iter().position(|name| name == column)?;
        self.rows
            .iter()
            .find(|r| r.label == row)
            .and_then(|r| r.counts.get(col).copied())
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    pub mood: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordResponse {
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CountsQuery {
    /// Comma-separated mood labels.
    #[serde(default)]
    pub moods: Option<String>,
    #[serde(default)]
    pub group_by_day: bool,
}

impl CountsQuery {
    pub fn selection(&self) -> Selection {
        let moods = self
            .moods
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|mood| !mood.is_empty());
        Selection::moods(moods, self.group_by_day)
    }
}

#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub records: Vec<MoodRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CountsResponse {
    pub header: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<&'static str>,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub table: CountTable,
    pub available_moods: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
