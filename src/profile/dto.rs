use serde::{Deserialize, Serialize};

use crate::ledger::{Day, GoalCategory};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    pub goal: Option<String>,
    pub daily_calorie_goal: Option<f64>,
    pub weight_loss_goal_kg: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSummary {
    pub goal: GoalCategory,
    pub daily_calorie_target: u32,
    pub daily_step_goal: u32,
}

#[derive(Debug, Serialize)]
pub struct UpdateGoalResponse {
    pub success: bool,
    pub message: String,
    pub user: GoalSummary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepGoalRequest {
    pub daily_step_goal: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepGoalResponse {
    pub success: bool,
    pub daily_step_goal: u32,
}

#[derive(Debug, Deserialize)]
pub struct StepsRequest {
    pub date: Option<String>,
    pub steps: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ResetStepsRequest {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StepsResponse {
    pub success: bool,
    pub steps: u32,
    pub date: Day,
}
