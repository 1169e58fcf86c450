use crate::clock::Clock;
use crate::errors::LoadError;
use crate::models::{CountTable, MoodRecord, Selection};
use crate::normalize::normalize;
use crate::stats::filter_and_count;
use crate::store::MoodLog;
use std::sync::Arc;
use tracing::{debug, error};

/// Reads the whole log and turns it into count tables.
#[derive(Clone)]
pub struct Aggregator {
    log: Arc<dyn MoodLog>,
    clock: Arc<dyn Clock>,
}

impl Aggregator {
    pub fn new(log: Arc<dyn MoodLog>, clock: Arc<dyn Clock>) -> Self {
        Self { log, clock }
    }

    pub async fn load_all(&self) -> Result<Vec<MoodRecord>, LoadError> {
        let rows = self.log.get_all_records().await.map_err(LoadError)?;
        debug!("loaded {} mood rows", rows.len());
        Ok(normalize(rows))
    }

    /// Like [`Aggregator::load_all`], but a failed fetch yields no records
    /// alongside the error so callers can keep rendering.
    pub async fn load_or_empty(&self) -> (Vec<MoodRecord>, Option<LoadError>) {
        match self.load_all().await {
            Ok(records) => (records, None),
            Err(err) => {
                error!("{err}");
                (Vec::new(), Some(err))
            }
        }
    }

    /// Counts `records` for the current day according to the clock.
    pub fn view(&self, records: &[MoodRecord], selection: &Selection) -> CountTable {
        filter_and_count(records, selection, self.clock.today())
    }
}
