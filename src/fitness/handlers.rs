use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::services::AuthUser,
    error::{LedgerError, LedgerResult},
    ledger::{
        model::{WorkoutDay, WorkoutRecord},
        views::FitnessSummary,
        Day,
    },
    state::AppState,
};

use super::{
    dto::{
        ActivityRequest, CaloriesRequest, CompletedWorkout, ExerciseRequest, HistoryResponse,
        MessageResponse, MilestoneRequest, RemoveExerciseRequest, RemoveHistoryExerciseRequest,
        WeightRequest,
    },
    services,
};

pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_summary))
        .route("/weight", post(add_weight))
        .route("/weight/:date", delete(remove_weight))
        .route("/calories", post(log_calories))
        .route("/milestone", post(add_milestone))
        .route("/milestone/:id", delete(remove_milestone))
        .route("/activity", post(record_activity))
        .route("/workout/:date", delete(remove_workout))
        .route("/reset", post(reset))
}

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/workout-plan", get(workout_plan))
        .route("/today-workout", get(today_workout))
        .route("/add-exercise", post(add_exercise))
        .route("/remove-exercise", post(remove_exercise))
        .route("/complete-workout", post(complete_workout))
        .route("/workout-history", get(workout_history))
        .route("/remove-history-exercise", post(remove_history_exercise))
}

#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> LedgerResult<Json<FitnessSummary>> {
    Ok(Json(services::summary(state.ledgers.as_ref(), user_id).await?))
}

#[instrument(skip(state))]
pub async fn add_weight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<WeightRequest>,
) -> LedgerResult<Json<FitnessSummary>> {
    let weight = payload
        .weight
        .ok_or_else(|| LedgerError::validation("Weight is required"))?;
    let date = state.request_day(payload.date.as_deref())?;
    let summary = services::add_weight(state.ledgers.as_ref(), user_id, date, weight).await?;
    Ok(Json(summary))
}

#[instrument(skip(state))]
pub async fn remove_weight(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> LedgerResult<Json<FitnessSummary>> {
    let date: Day = date.parse()?;
    Ok(Json(services::remove_weight(state.ledgers.as_ref(), user_id, date).await?))
}

#[instrument(skip(state))]
pub async fn log_calories(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CaloriesRequest>,
) -> LedgerResult<Json<MessageResponse>> {
    let calories = payload
        .calories
        .ok_or_else(|| LedgerError::validation("Calories are required"))?;
    let date = state.request_day(payload.date.as_deref())?;
    services::log_calories(state.ledgers.as_ref(), user_id, date, calories).await?;
    Ok(Json(MessageResponse {
        message: "Calorie entry added successfully".into(),
    }))
}

#[instrument(skip(state))]
pub async fn add_milestone(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<MilestoneRequest>,
) -> LedgerResult<Json<FitnessSummary>> {
    let name = payload.milestone_name.unwrap_or_default();
    let summary =
        services::add_milestone(state.ledgers.as_ref(), user_id, &name, OffsetDateTime::now_utc()).await?;
    Ok(Json(summary))
}

#[instrument(skip(state))]
pub async fn remove_milestone(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> LedgerResult<Json<FitnessSummary>> {
    Ok(Json(services::remove_milestone(state.ledgers.as_ref(), user_id, id).await?))
}

#[instrument(skip(state))]
pub async fn record_activity(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ActivityRequest>,
) -> LedgerResult<Json<FitnessSummary>> {
    let date = state.request_day(payload.date.as_deref())?;
    let summary = services::record_activity(
        state.ledgers.as_ref(),
        user_id,
        date,
        payload.workouts,
        payload.calories,
    )
    .await?;
    Ok(Json(summary))
}

#[instrument(skip(state))]
pub async fn remove_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<String>,
) -> LedgerResult<Json<FitnessSummary>> {
    let date: Day = date.parse()?;
    Ok(Json(services::remove_workout(state.ledgers.as_ref(), user_id, date).await?))
}

#[instrument(skip(state))]
pub async fn reset(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> LedgerResult<Json<MessageResponse>> {
    services::reset(state.ledgers.as_ref(), user_id).await?;
    Ok(Json(MessageResponse {
        message: "Fitness data reset successfully".into(),
    }))
}

#[instrument(skip(state))]
pub async fn workout_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> LedgerResult<Json<Vec<WorkoutDay>>> {
    Ok(Json(services::workout_plan(state.ledgers.as_ref(), user_id).await?))
}

#[instrument(skip(state))]
pub async fn today_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> LedgerResult<Json<WorkoutDay>> {
    let today = state.today();
    Ok(Json(services::today_workout(state.ledgers.as_ref(), user_id, today).await?))
}

#[instrument(skip(state))]
pub async fn add_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ExerciseRequest>,
) -> LedgerResult<Json<WorkoutDay>> {
    let exercise = payload.into_exercise()?;
    let today = state.today();
    Ok(Json(services::add_exercise(state.ledgers.as_ref(), user_id, today, exercise).await?))
}

#[instrument(skip(state))]
pub async fn remove_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<RemoveExerciseRequest>,
) -> LedgerResult<Json<WorkoutDay>> {
    let index = payload
        .index
        .ok_or_else(|| LedgerError::validation("Please provide the exercise index"))?;
    let today = state.today();
    Ok(Json(services::remove_exercise(state.ledgers.as_ref(), user_id, today, index).await?))
}

#[instrument(skip(state))]
pub async fn complete_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> LedgerResult<Json<CompletedWorkout>> {
    let today = state.today();
    Ok(Json(services::complete_workout(state.ledgers.as_ref(), user_id, today).await?))
}

#[instrument(skip(state))]
pub async fn workout_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> LedgerResult<Json<Vec<WorkoutRecord>>> {
    Ok(Json(services::workout_history(state.ledgers.as_ref(), user_id).await?))
}

#[instrument(skip(state))]
pub async fn remove_history_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<RemoveHistoryExerciseRequest>,
) -> LedgerResult<Json<HistoryResponse>> {
    let (Some(date), Some(index)) = (payload.date, payload.exercise_index) else {
        return Err(LedgerError::validation(
            "Please provide both date and exercise index",
        ));
    };
    let date: Day = date.parse()?;
    let history =
        services::remove_history_exercise(state.ledgers.as_ref(), user_id, date, index).await?;
    Ok(Json(HistoryResponse { history }))
}

#[cfg(test)]
mod tests {
    use crate::app::test_support::{app_with_user, call};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn weight_then_summary() {
        let (app, _, _, token) = app_with_user();
        let t = Some(token.as_str());
        for (date, weight) in [("2024-01-01", 80.0), ("2024-01-15", 77.0)] {
            let (status, _) = call(
                &app,
                Method::POST,
                "/api/fitness/weight",
                t,
                Some(json!({ "weight": weight, "date": date })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = call(&app, Method::GET, "/api/fitness", t, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["weightLost"], 3.0);
        assert_eq!(body["weightData"][1]["timeLabel"], "2024-01-15");
        assert_eq!(body["allWeightEntries"].as_array().unwrap().len(), 2);

        let (status, body) =
            call(&app, Method::DELETE, "/api/fitness/weight/2024-01-15", t, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["weightLost"], 0.0);
    }

    #[tokio::test]
    async fn missing_weight_is_bad_request() {
        let (app, _, _, token) = app_with_user();
        let (status, body) =
            call(&app, Method::POST, "/api/fitness/weight", Some(&token), Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Weight is required");
    }

    #[tokio::test]
    async fn todays_plan_round_trip() {
        let (app, _, _, token) = app_with_user();
        let t = Some(token.as_str());
        let (status, plan) = call(
            &app,
            Method::POST,
            "/api/fitness/add-exercise",
            t,
            Some(json!({ "name": "Squats", "focus": "Legs", "duration": 15, "calories": 120 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(plan["totalCalories"], 120.0);

        let (_, today) = call(&app, Method::GET, "/api/fitness/today-workout", t, None).await;
        assert_eq!(today["exercises"].as_array().unwrap().len(), 1);

        let (status, done) =
            call(&app, Method::POST, "/api/fitness/complete-workout", t, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(done["history"].as_array().unwrap().len(), 1);

        let (_, history) = call(&app, Method::GET, "/api/fitness/workout-history", t, None).await;
        assert_eq!(history[0]["totalDuration"], 15.0);
    }

    #[tokio::test]
    async fn reset_clears_summary() {
        let (app, _, _, token) = app_with_user();
        let t = Some(token.as_str());
        call(
            &app,
            Method::POST,
            "/api/fitness/activity",
            t,
            Some(json!({ "workouts": 1, "calories": 250 })),
        )
        .await;
        let (status, _) = call(&app, Method::POST, "/api/fitness/reset", t, None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = call(&app, Method::GET, "/api/fitness", t, None).await;
        assert_eq!(body["workoutsCompleted"], 0);
    }
}
