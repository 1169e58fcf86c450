use crate::clock::Clock;
use crate::errors::RecordError;
use crate::store::MoodLog;
use std::sync::Arc;
use tracing::{error, info};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Appends mood entries to the shared log.
#[derive(Clone)]
pub struct Recorder {
    log: Arc<dyn MoodLog>,
    clock: Arc<dyn Clock>,
}

impl Recorder {
    pub fn new(log: Arc<dyn MoodLog>, clock: Arc<dyn Clock>) -> Self {
        Self { log, clock }
    }

    /// Stores `mood` and `note` stamped with the current local time. A failed
    /// append is reported, never retried.
    pub async fn record(&self, mood: &str, note: &str) -> Result<(), RecordError> {
        let timestamp = self.clock.now().format(TIMESTAMP_FORMAT).to_string();
        let row = [timestamp, mood.to_string(), note.to_string()];

        match self.log.append_row(row).await {
            Ok(()) => {
                info!(mood, has_note = !note.is_empty(), "mood recorded");
                Ok(())
            }
            Err(err) => {
                error!("failed to record mood: {err}");
                Err(RecordError(err))
            }
        }
    }
}
