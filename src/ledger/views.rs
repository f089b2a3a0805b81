use std::collections::BTreeMap;

use serde::Serialize;

use super::{
    day::Day,
    goals::GoalCategory,
    model::{CalorieEntry, DailyBucket, Meal, MealTime, Milestone, UserLedger, WorkoutRecord},
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionView {
    pub meals: BTreeMap<MealTime, Vec<Meal>>,
    pub daily_totals: Vec<DailyBucket>,
    pub daily_calorie_goal: u32,
    pub date: Day,
    pub today: Day,
}

impl NutritionView {
    pub fn build(ledger: &UserLedger, date: Day, today: Day) -> Self {
        let meals = match ledger.bucket(date) {
            Some(bucket) => bucket.grouped_meals(),
            None => DailyBucket::empty(date).grouped_meals(),
        };
        Self {
            meals,
            daily_totals: ledger.daily_totals.clone(),
            daily_calorie_goal: ledger.goals.daily_calorie_goal,
            date,
            today,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightPoint {
    pub time_label: Day,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeightEntry {
    pub date: Day,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessSummary {
    pub workouts_completed: u32,
    pub calories_burned: f64,
    pub weight_lost: f64,
    pub weight_data: Vec<WeightPoint>,
    pub all_weight_entries: Vec<WeightEntry>,
    pub milestones: Vec<Milestone>,
    pub workout_history: Vec<WorkoutRecord>,
}

impl FitnessSummary {
    pub fn build(ledger: &UserLedger) -> Self {
        let samples = &ledger.weight_history.samples;
        Self {
            workouts_completed: ledger.workouts_completed(),
            calories_burned: ledger.workouts.iter().map(|w| w.total_calories).sum(),
            weight_lost: ledger.weight_history.weight_lost(),
            weight_data: samples
                .iter()
                .map(|s| WeightPoint {
                    time_label: s.date,
                    weight: s.weight,
                })
                .collect(),
            all_weight_entries: samples
                .iter()
                .map(|s| WeightEntry {
                    date: s.date,
                    weight: s.weight,
                })
                .collect(),
            milestones: ledger.milestones.clone(),
            workout_history: ledger.workout_history.clone(),
        }
    }

    pub fn empty() -> Self {
        Self {
            workouts_completed: 0,
            calories_burned: 0.0,
            weight_lost: 0.0,
            weight_data: Vec::new(),
            all_weight_entries: Vec::new(),
            milestones: Vec::new(),
            workout_history: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightProgressPoint {
    pub date: Day,
    pub weight: f64,
    pub weight_change: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressView {
    pub weight_history: Vec<WeightProgressPoint>,
    pub calorie_history: Vec<CalorieEntry>,
    pub goal_progress: i64,
    pub goal_progress_change: i64,
}

impl ProgressView {
    pub fn build(ledger: &UserLedger) -> Self {
        let history = &ledger.weight_history;
        Self {
            weight_history: history
                .samples
                .iter()
                .map(|s| WeightProgressPoint {
                    date: s.date,
                    weight: s.weight,
                    weight_change: s.weight_change,
                })
                .collect(),
            calorie_history: ledger.calorie_history.clone(),
            goal_progress: history.goal_progress,
            goal_progress_change: history.goal_progress_change,
        }
    }

    pub fn empty() -> Self {
        Self {
            weight_history: Vec::new(),
            calorie_history: Vec::new(),
            goal_progress: 0,
            goal_progress_change: 0,
        }
    }
}

/// Goal targets as the profile screen reads them. Both calorie fields carry
/// the same value: there is only one stored goal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsView {
    pub goal: GoalCategory,
    pub daily_step_goal: u32,
    pub daily_calorie_target: u32,
    pub daily_calorie_goal: u32,
    pub weight_loss_goal_kg: f64,
}

impl GoalsView {
    pub fn build(ledger: &UserLedger, default_weight_loss_goal_kg: f64) -> Self {
        let goals = &ledger.goals;
        Self {
            goal: goals.category,
            daily_step_goal: goals.daily_step_goal,
            daily_calorie_target: goals.daily_calorie_goal,
            daily_calorie_goal: goals.daily_calorie_goal,
            weight_loss_goal_kg: goals.weight_loss_goal_or(default_weight_loss_goal_kg),
        }
    }
}
