use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/mood", post(handlers::submit_form))
        .route("/api/moods", get(handlers::list_moods).post(handlers::record_mood))
        .route("/api/counts", get(handlers::get_counts))
        .with_state(state)
}
