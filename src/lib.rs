pub mod aggregator;
pub mod app;
pub mod clock;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod recorder;
pub mod state;
pub mod stats;
pub mod store;
pub mod ui;

pub use aggregator::Aggregator;
pub use app::router;
pub use config::Config;
pub use recorder::Recorder;
pub use state::AppState;
