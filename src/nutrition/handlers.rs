use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    auth::services::AuthUser,
    error::{LedgerError, LedgerResult},
    ledger::{model::DailyBucket, views::NutritionView, Day},
    state::AppState,
};

use super::{
    dto::{
        AddMealRequest, CalorieGoalRequest, CalorieGoalResponse, CalorieTargetRequest, FoodQuery,
        LoggedMeal, MessageResponse, NutritionQuery, RemoveMealRequest, ResetDailyRequest,
        ResetDailyResponse,
    },
    food_db::{self, FoodItem},
    services,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/nutrition", get(get_nutrition))
        .route("/nutrition/history", get(get_history))
        .route("/nutrition/foodDatabase", get(food_database))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/nutrition/addMeal", post(add_meal))
        .route("/nutrition/removeMeal", post(remove_meal))
        .route("/nutrition/resetDaily", post(reset_daily))
        .route("/nutrition/updateCalorieGoal", post(update_calorie_goal))
        .route("/updateCalorieTarget", post(update_calorie_target))
}

#[instrument(skip(state))]
pub async fn get_nutrition(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<NutritionQuery>,
) -> LedgerResult<Json<NutritionView>> {
    let today = state.today();
    let date = Day::from_request(q.date.as_deref(), today, state.config.ledger.utc_offset)?;
    let view = services::nutrition_view(state.ledgers.as_ref(), user_id, date, today).await?;
    Ok(Json(view))
}

#[instrument(skip(state))]
pub async fn get_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> LedgerResult<Json<Vec<DailyBucket>>> {
    Ok(Json(services::history(state.ledgers.as_ref(), user_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn add_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddMealRequest>,
) -> LedgerResult<Json<LoggedMeal>> {
    let new_meal = payload.to_new_meal()?;
    let date = state.request_day(payload.date.as_deref())?;
    let meal = services::add_meal(
        state.ledgers.as_ref(),
        user_id,
        date,
        new_meal,
        OffsetDateTime::now_utc(),
    )
    .await?;
    Ok(Json(LoggedMeal { meal, date }))
}

#[instrument(skip(state, payload))]
pub async fn remove_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<RemoveMealRequest>,
) -> LedgerResult<Json<MessageResponse>> {
    let key = payload
        .meal_id
        .ok_or_else(|| LedgerError::validation("mealId is required"))?
        .into_match()?;
    let date = state.request_day(payload.date.as_deref())?;
    services::remove_meal(state.ledgers.as_ref(), user_id, date, &key).await?;
    Ok(Json(MessageResponse {
        message: "Meal removed successfully".into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn reset_daily(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ResetDailyRequest>,
) -> LedgerResult<Json<ResetDailyResponse>> {
    let date: Day = payload
        .date
        .as_deref()
        .ok_or_else(|| LedgerError::validation("Date is required"))?
        .parse()?;
    services::reset_daily(state.ledgers.as_ref(), user_id, date).await?;
    Ok(Json(ResetDailyResponse {
        success: true,
        message: "Daily nutrition data reset successfully".into(),
        date,
    }))
}

async fn set_calorie_goal(
    state: &AppState,
    user_id: uuid::Uuid,
    calories: Option<f64>,
    message: &str,
) -> LedgerResult<Json<CalorieGoalResponse>> {
    let calories = calories.ok_or_else(|| LedgerError::validation("Invalid calorie goal"))?;
    let goal = services::update_calorie_goal(state.ledgers.as_ref(), user_id, calories).await?;
    Ok(Json(CalorieGoalResponse {
        message: message.into(),
        daily_calorie_goal: goal,
        daily_calorie_target: goal,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_calorie_goal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CalorieGoalRequest>,
) -> LedgerResult<Json<CalorieGoalResponse>> {
    set_calorie_goal(&state, user_id, payload.daily_calorie_goal, "Calorie goal updated successfully").await
}

#[instrument(skip(state, payload))]
pub async fn update_calorie_target(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CalorieTargetRequest>,
) -> LedgerResult<Json<CalorieGoalResponse>> {
    set_calorie_goal(&state, user_id, payload.daily_calorie_target, "Calorie target updated successfully").await
}

#[instrument(skip_all)]
pub async fn food_database(
    AuthUser(_user_id): AuthUser,
    Query(q): Query<FoodQuery>,
) -> Json<Vec<FoodItem>> {
    Json(food_db::search(&q.search_term))
}
