use crate::aggregator::Aggregator;
use crate::clock::Clock;
use crate::recorder::Recorder;
use crate::store::MoodLog;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub recorder: Recorder,
    pub aggregator: Aggregator,
    pub refresh_secs: u64,
}

impl AppState {
    pub fn new(log: Arc<dyn MoodLog>, clock: Arc<dyn Clock>, refresh_secs: u64) -> Self {
        Self {
            recorder: Recorder::new(log.clone(), clock.clone()),
            aggregator: Aggregator::new(log, clock),
            refresh_secs,
        }
    }
}
