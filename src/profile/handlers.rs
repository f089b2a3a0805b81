use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::services::AuthUser,
    error::{LedgerError, LedgerResult},
    ledger::{
        recommendations::Recommendations,
        views::{GoalsView, ProgressView},
        Day, GoalCategory,
    },
    state::AppState,
};

use super::{
    dto::{
        GoalSummary, ResetStepsRequest, StepGoalRequest, StepGoalResponse, StepsRequest,
        StepsResponse, UpdateGoalRequest, UpdateGoalResponse,
    },
    services,
};

pub fn goal_routes() -> Router<AppState> {
    Router::new()
        .route("/updateGoal", post(update_goal))
        .route("/getUserGoals", get(get_user_goals))
        .route("/updateStepGoal", post(update_step_goal))
}

pub fn activity_routes() -> Router<AppState> {
    Router::new()
        .route("/updateSteps", post(update_steps))
        .route("/resetDailySteps", post(reset_daily_steps))
        .route("/progress", get(get_progress))
        .route("/recommendations", get(get_recommendations))
}

#[instrument(skip(state))]
pub async fn update_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateGoalRequest>,
) -> LedgerResult<Json<UpdateGoalResponse>> {
    let category: GoalCategory = payload
        .goal
        .as_deref()
        .ok_or_else(|| LedgerError::validation("Goal is required"))?
        .parse()?;
    let view = services::update_goal(
        state.ledgers.as_ref(),
        user_id,
        category,
        payload.daily_calorie_goal,
        payload.weight_loss_goal_kg,
    )
    .await?;
    Ok(Json(UpdateGoalResponse {
        success: true,
        message: "Goal updated successfully".into(),
        user: GoalSummary {
            goal: view.goal,
            daily_calorie_target: view.daily_calorie_target,
            daily_step_goal: view.daily_step_goal,
        },
    }))
}

#[instrument(skip(state))]
pub async fn get_user_goals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> LedgerResult<Json<GoalsView>> {
    Ok(Json(services::user_goals(state.ledgers.as_ref(), user_id).await?))
}

#[instrument(skip(state))]
pub async fn update_step_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<StepGoalRequest>,
) -> LedgerResult<Json<StepGoalResponse>> {
    let goal = payload
        .daily_step_goal
        .ok_or_else(|| LedgerError::validation("Invalid step goal"))?;
    let daily_step_goal = services::update_step_goal(state.ledgers.as_ref(), user_id, goal).await?;
    Ok(Json(StepGoalResponse {
        success: true,
        daily_step_goal,
    }))
}

#[instrument(skip(state))]
pub async fn update_steps(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<StepsRequest>,
) -> LedgerResult<Json<StepsResponse>> {
    let (Some(date), Some(steps)) = (payload.date, payload.steps) else {
        return Err(LedgerError::validation("Invalid date or steps"));
    };
    let date: Day = date.parse()?;
    let steps = services::update_steps(state.ledgers.as_ref(), user_id, date, steps).await?;
    Ok(Json(StepsResponse {
        success: true,
        steps,
        date,
    }))
}

#[instrument(skip(state))]
pub async fn reset_daily_steps(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ResetStepsRequest>,
) -> LedgerResult<Json<StepsResponse>> {
    let date: Day = payload
        .date
        .as_deref()
        .ok_or_else(|| LedgerError::validation("Date is required"))?
        .parse()?;
    services::reset_daily_steps(state.ledgers.as_ref(), user_id, date).await?;
    Ok(Json(StepsResponse {
        success: true,
        steps: 0,
        date,
    }))
}

#[instrument(skip(state))]
pub async fn get_progress(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> LedgerResult<Json<ProgressView>> {
    Ok(Json(services::progress(state.ledgers.as_ref(), user_id).await?))
}

#[instrument(skip(state))]
pub async fn get_recommendations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> LedgerResult<Json<Recommendations>> {
    let today = state.today();
    Ok(Json(services::recommendations(state.ledgers.as_ref(), user_id, today).await?))
}
