use serde::{Deserialize, Serialize};

use crate::{
    error::{LedgerError, LedgerResult},
    ledger::{
        model::{WorkoutDay, WorkoutRecord},
        Exercise,
    },
};

#[derive(Debug, Deserialize)]
pub struct WeightRequest {
    pub weight: Option<f64>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CaloriesRequest {
    pub calories: Option<f64>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneRequest {
    pub milestone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityRequest {
    pub workouts: Option<u32>,
    pub calories: Option<f64>,
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExerciseRequest {
    pub name: Option<String>,
    pub focus: Option<String>,
    pub duration: Option<f64>,
    pub calories: Option<f64>,
}

impl ExerciseRequest {
    pub fn into_exercise(self) -> LedgerResult<Exercise> {
        match (self.name, self.focus, self.duration, self.calories) {
            (Some(name), Some(focus), Some(duration), Some(calories)) => {
                let exercise = Exercise {
                    name: name.trim().to_string(),
                    focus: focus.trim().to_string(),
                    duration,
                    calories,
                };
                exercise.validate()?;
                Ok(exercise)
            }
            _ => Err(LedgerError::validation("Please provide all required fields")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RemoveExerciseRequest {
    pub index: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveHistoryExerciseRequest {
    pub date: Option<String>,
    pub exercise_index: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct CompletedWorkout {
    pub history: Vec<WorkoutRecord>,
    pub workouts: Vec<WorkoutDay>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<WorkoutRecord>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
