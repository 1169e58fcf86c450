use crate::errors::AppError;
use crate::models::{
    CountsQuery, CountsResponse, MOOD_CHOICES, RecordRequest, RecordResponse, RecordsResponse,
};
use crate::state::AppState;
use crate::stats::unique_moods;
use crate::ui::{captions, render_index};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&MOOD_CHOICES, state.refresh_secs))
}

pub async fn record_mood(
    State(state): State<AppState>,
    Json(payload): Json<RecordRequest>,
) -> Result<(StatusCode, Json<RecordResponse>), AppError> {
    apply_record(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(RecordResponse {
            status: "recorded".to_string(),
        }),
    ))
}

pub async fn submit_form(
    State(state): State<AppState>,
    Form(payload): Form<RecordRequest>,
) -> Result<Redirect, AppError> {
    apply_record(&state, payload).await?;
    Ok(Redirect::to("/"))
}

pub async fn list_moods(State(state): State<AppState>) -> Json<RecordsResponse> {
    let (records, err) = state.aggregator.load_or_empty().await;
    Json(RecordsResponse {
        records,
        error: err.map(|e| e.to_string()),
    })
}

pub async fn get_counts(
    State(state): State<AppState>,
    Query(query): Query<CountsQuery>,
) -> Json<CountsResponse> {
    let (records, err) = state.aggregator.load_or_empty().await;
    let table = state.aggregator.view(&records, &query.selection());
    let captions = captions(table.view);

    Json(CountsResponse {
        header: captions.header,
        section: captions.section,
        title: captions.title,
        x_label: captions.x_label,
        y_label: captions.y_label,
        available_moods: unique_moods(&records),
        table,
        error: err.map(|e| e.to_string()),
    })
}

async fn apply_record(state: &AppState, payload: RecordRequest) -> Result<(), AppError> {
    let mood = payload.mood.trim();
    if mood.is_empty() {
        return Err(AppError::bad_request("mood must not be empty"));
    }

    state.recorder.record(mood, &payload.note).await?;
    Ok(())
}
