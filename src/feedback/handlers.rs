use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{auth::services::AuthUser, error::LedgerResult, state::AppState};

use super::{dto::SubmitFeedbackRequest, repo::Feedback, services};

/// Listing is public.
pub fn read_routes() -> Router<AppState> {
    Router::new().route("/", get(list_feedback))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/", post(submit_feedback))
}

#[instrument(skip(state))]
pub async fn list_feedback(State(state): State<AppState>) -> LedgerResult<Json<Vec<Feedback>>> {
    Ok(Json(services::list(state.feedback.as_ref()).await?))
}

#[instrument(skip(state, payload))]
pub async fn submit_feedback(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<SubmitFeedbackRequest>,
) -> LedgerResult<(StatusCode, Json<Feedback>)> {
    let stored =
        services::submit(state.feedback.as_ref(), user_id, payload, OffsetDateTime::now_utc()).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}
