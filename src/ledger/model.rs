use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{day::Day, goals::GoalCategory};
use crate::error::{LedgerError, LedgerResult};

/// Fixed meal slots, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MealTime {
    Breakfast,
    #[serde(rename = "Morning Snack")]
    MorningSnack,
    Lunch,
    #[serde(rename = "Evening Snack")]
    EveningSnack,
    Dinner,
}

impl MealTime {
    pub const ALL: [MealTime; 5] = [
        MealTime::Breakfast,
        MealTime::MorningSnack,
        MealTime::Lunch,
        MealTime::EveningSnack,
        MealTime::Dinner,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealTime::Breakfast => "Breakfast",
            MealTime::MorningSnack => "Morning Snack",
            MealTime::Lunch => "Lunch",
            MealTime::EveningSnack => "Evening Snack",
            MealTime::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealTime {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealTime::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| LedgerError::validation("Invalid meal time"))
    }
}

/// Client-supplied part of a meal, before it gets an id and a timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeal {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub meal_time: MealTime,
}

impl NewMeal {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::validation("Meal name is required"));
        }
        for (field, value) in [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
        ] {
            ensure_non_negative(field, value)?;
        }
        Ok(())
    }

    pub fn into_meal(self, logged_at: OffsetDateTime) -> LedgerResult<Meal> {
        self.validate()?;
        Ok(Meal {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            meal_time: self.meal_time,
            logged_at,
        })
    }
}

/// A logged meal. Owned by exactly one [`DailyBucket`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: Uuid,
    pub name: String,
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    pub meal_time: MealTime,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
}

/// All meals of one calendar day plus their cached totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBucket {
    pub date: Day,
    #[serde(default)]
    pub total_calories: f64,
    #[serde(default)]
    pub total_protein: f64,
    #[serde(default)]
    pub total_carbs: f64,
    #[serde(default)]
    pub total_fat: f64,
    #[serde(default)]
    pub meals: Vec<Meal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightSample {
    pub date: Day,
    pub weight: f64,
    #[serde(default)]
    pub weight_change: f64,
}

/// Weight samples sorted by date, plus the stored goal progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightHistory {
    #[serde(default)]
    pub samples: Vec<WeightSample>,
    #[serde(default)]
    pub goal_progress: i64,
    #[serde(default)]
    pub goal_progress_change: i64,
    /// Set when samples were edited since the last progress refresh.
    #[serde(skip)]
    pub(crate) samples_dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieEntry {
    pub date: Day,
    pub calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub focus: String,
    /// Minutes.
    pub duration: f64,
    pub calories: f64,
}

/// The workout plan for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDay {
    pub date: Day,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    /// Calories logged through free activity rather than an exercise.
    #[serde(default)]
    pub activity_calories: f64,
    #[serde(default)]
    pub total_calories: f64,
    #[serde(default)]
    pub total_duration: f64,
    #[serde(default)]
    pub total_workouts: u32,
    #[serde(default)]
    pub completed: bool,
}

/// A completed workout, snapshotted into the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRecord {
    pub date: Day,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub total_calories: f64,
    #[serde(default)]
    pub total_duration: f64,
}

pub const DEFAULT_STEP_GOAL: u32 = 10_000;
pub const DEFAULT_CALORIE_GOAL: u32 = 2_000;

/// The single place goal targets live. Every view reads from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSettings {
    #[serde(default)]
    pub category: GoalCategory,
    #[serde(default = "default_step_goal")]
    pub daily_step_goal: u32,
    #[serde(default = "default_calorie_goal")]
    pub daily_calorie_goal: u32,
    /// Target loss used for goal progress; falls back to the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_loss_goal_kg: Option<f64>,
}

fn default_step_goal() -> u32 {
    DEFAULT_STEP_GOAL
}

fn default_calorie_goal() -> u32 {
    DEFAULT_CALORIE_GOAL
}

impl Default for GoalSettings {
    fn default() -> Self {
        Self {
            category: GoalCategory::default(),
            daily_step_goal: DEFAULT_STEP_GOAL,
            daily_calorie_goal: DEFAULT_CALORIE_GOAL,
            weight_loss_goal_kg: None,
        }
    }
}

impl GoalSettings {
    pub fn weight_loss_goal_or(&self, fallback_kg: f64) -> f64 {
        self.weight_loss_goal_kg.unwrap_or(fallback_kg)
    }
}

/// A user's whole fitness and nutrition state, stored as one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLedger {
    pub user_id: Uuid,
    /// Managed by the store; 0 means never persisted.
    #[serde(skip)]
    pub version: i64,
    #[serde(default)]
    pub goals: GoalSettings,
    #[serde(default)]
    pub daily_totals: Vec<DailyBucket>,
    #[serde(default)]
    pub weight_history: WeightHistory,
    #[serde(default)]
    pub calorie_history: Vec<CalorieEntry>,
    #[serde(default)]
    pub step_history: BTreeMap<Day, u32>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub workouts: Vec<WorkoutDay>,
    #[serde(default)]
    pub workout_history: Vec<WorkoutRecord>,
}

impl UserLedger {
    pub fn new(user_id: Uuid, daily_calorie_goal: u32) -> Self {
        Self {
            user_id,
            version: 0,
            goals: GoalSettings {
                daily_calorie_goal,
                ..GoalSettings::default()
            },
            daily_totals: Vec::new(),
            weight_history: WeightHistory::default(),
            calorie_history: Vec::new(),
            step_history: BTreeMap::new(),
            milestones: Vec::new(),
            workouts: Vec::new(),
            workout_history: Vec::new(),
        }
    }

    /// Recomputes every derived field from its source collection.
    pub fn normalize(&mut self, weight_loss_goal_kg: f64) {
        for bucket in &mut self.daily_totals {
            bucket.recompute_totals();
        }
        for day in &mut self.workouts {
            day.recompute_totals();
        }
        for record in &mut self.workout_history {
            record.recompute_totals();
        }
        let goal_kg = self.goals.weight_loss_goal_or(weight_loss_goal_kg);
        self.weight_history.recompute();
        self.weight_history.sync_progress(goal_kg);
    }

    /// Checks the invariants every stored version must satisfy.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.goals.daily_calorie_goal == 0 {
            return Err(LedgerError::validation("Daily calorie goal must be positive"));
        }
        if self.goals.daily_step_goal == 0 {
            return Err(LedgerError::validation("Daily step goal must be positive"));
        }
        if let Some(kg) = self.goals.weight_loss_goal_kg {
            ensure_positive("weight loss goal", kg)?;
        }

        let mut seen = std::collections::HashSet::new();
        for bucket in &self.daily_totals {
            if !seen.insert(bucket.date) {
                return Err(LedgerError::validation(format!(
                    "duplicate daily bucket for {}",
                    bucket.date
                )));
            }
            bucket.check_totals()?;
        }

        self.weight_history.check_consistency()?;
        Ok(())
    }
}

pub(crate) fn ensure_non_negative(field: &str, value: f64) -> LedgerResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(LedgerError::validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(())
}

pub(crate) fn ensure_positive(field: &str, value: f64) -> LedgerResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LedgerError::validation(format!(
            "{} must be a positive number",
            field
        )));
    }
    Ok(())
}
