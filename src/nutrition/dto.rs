use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{LedgerError, LedgerResult},
    ledger::{model::Meal, Day, MealMatch, MealTime, NewMeal},
};

#[derive(Debug, Deserialize)]
pub struct NutritionQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodQuery {
    #[serde(default)]
    pub search_term: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMealRequest {
    pub name: Option<String>,
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fats: f64,
    pub meal_time: Option<String>,
    pub date: Option<String>,
}

impl AddMealRequest {
    pub fn to_new_meal(&self) -> LedgerResult<NewMeal> {
        let meal_time: MealTime = self.meal_time.as_deref().unwrap_or_default().parse()?;
        let (Some(name), Some(calories)) = (self.name.as_ref(), self.calories) else {
            return Err(LedgerError::validation("Meal name and calories are required"));
        };
        Ok(NewMeal {
            name: name.clone(),
            calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fats,
            meal_time,
        })
    }
}

/// Meal as echoed back after it was logged.
#[derive(Debug, Serialize)]
pub struct LoggedMeal {
    #[serde(flatten)]
    pub meal: Meal,
    pub date: Day,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealFields {
    pub name: String,
    pub calories: f64,
    pub meal_time: String,
}

/// `mealId` is either a meal's id or its `{name, calories, mealTime}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MealKey {
    Id(Uuid),
    Fields(MealFields),
}

impl MealKey {
    pub fn into_match(self) -> LedgerResult<MealMatch> {
        Ok(match self {
            MealKey::Id(id) => MealMatch::Id(id),
            MealKey::Fields(f) => MealMatch::Fields {
                meal_time: f.meal_time.parse()?,
                name: f.name.trim().to_string(),
                calories: f.calories,
            },
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveMealRequest {
    pub meal_id: Option<MealKey>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetDailyRequest {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResetDailyResponse {
    pub success: bool,
    pub message: String,
    pub date: Day,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieGoalRequest {
    pub daily_calorie_goal: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieTargetRequest {
    pub daily_calorie_target: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalorieGoalResponse {
    pub message: String,
    pub daily_calorie_goal: u32,
    pub daily_calorie_target: u32,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
