use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    day::Day,
    model::{
        ensure_non_negative, ensure_positive, CalorieEntry, Exercise, Milestone, UserLedger,
        WorkoutDay, WorkoutRecord,
    },
};
use crate::error::{LedgerError, LedgerResult};

impl Exercise {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.name.trim().is_empty() || self.focus.trim().is_empty() {
            return Err(LedgerError::validation("Please provide all required fields"));
        }
        ensure_positive("duration", self.duration)?;
        ensure_positive("calories", self.calories)?;
        Ok(())
    }
}

impl WorkoutDay {
    pub fn empty(date: Day) -> Self {
        Self {
            date,
            exercises: Vec::new(),
            activity_calories: 0.0,
            total_calories: 0.0,
            total_duration: 0.0,
            total_workouts: 0,
            completed: false,
        }
    }

    /// Totals are the exercises' sums plus calories logged as free activity.
    pub fn recompute_totals(&mut self) {
        self.total_calories =
            self.exercises.iter().map(|e| e.calories).sum::<f64>() + self.activity_calories;
        self.total_duration = self.exercises.iter().map(|e| e.duration).sum();
    }
}

impl WorkoutRecord {
    pub fn recompute_totals(&mut self) {
        self.total_calories = self.exercises.iter().map(|e| e.calories).sum();
        self.total_duration = self.exercises.iter().map(|e| e.duration).sum();
    }
}

impl UserLedger {
    /// Sum of logged workout sessions across every day, saturating at `u32::MAX`.
    pub fn workouts_completed(&self) -> u32 {
        self.workouts
            .iter()
            .fold(0u32, |acc, w| acc.saturating_add(w.total_workouts))
    }

    pub fn workout(&self, date: Day) -> Option<&WorkoutDay> {
        self.workouts.iter().find(|w| w.date == date)
    }

    fn workout_mut(&mut self, date: Day) -> LedgerResult<&mut WorkoutDay> {
        self.workouts
            .iter_mut()
            .find(|w| w.date == date)
            .ok_or_else(|| LedgerError::not_found("No workout found for today"))
    }

    fn get_or_create_workout(&mut self, date: Day) -> &mut WorkoutDay {
        let idx = match self.workouts.iter().position(|w| w.date == date) {
            Some(idx) => idx,
            None => {
                self.workouts.push(WorkoutDay::empty(date));
                self.workouts.len() - 1
            }
        };
        &mut self.workouts[idx]
    }

    pub fn add_exercise(&mut self, date: Day, exercise: Exercise) -> LedgerResult<&WorkoutDay> {
        exercise.validate()?;
        let day = self.get_or_create_workout(date);
        day.exercises.push(exercise);
        day.recompute_totals();
        Ok(day)
    }

    pub fn remove_exercise(&mut self, date: Day, index: usize) -> LedgerResult<&WorkoutDay> {
        let day = self.workout_mut(date)?;
        if index >= day.exercises.len() {
            return Err(LedgerError::validation("Invalid exercise index"));
        }
        day.exercises.remove(index);
        day.recompute_totals();
        Ok(day)
    }

    /// Marks the day's workout completed and snapshots it into the history.
    pub fn complete_workout(&mut self, date: Day) -> LedgerResult<()> {
        let day = self.workout_mut(date)?;
        day.completed = true;
        let record = WorkoutRecord {
            date,
            exercises: day.exercises.clone(),
            total_calories: day.total_calories,
            total_duration: day.total_duration,
        };
        self.workout_history.push(record);
        Ok(())
    }

    /// Removes one exercise from a history record; empty records are dropped.
    pub fn remove_history_exercise(&mut self, date: Day, index: usize) -> LedgerResult<()> {
        let pos = self
            .workout_history
            .iter()
            .position(|w| w.date == date)
            .ok_or_else(|| LedgerError::not_found("Workout not found in history"))?;
        let record = &mut self.workout_history[pos];
        if index >= record.exercises.len() {
            return Err(LedgerError::validation("Invalid exercise index"));
        }
        record.exercises.remove(index);
        record.recompute_totals();
        if record.exercises.is_empty() {
            self.workout_history.remove(pos);
        }
        Ok(())
    }

    pub fn remove_workout(&mut self, date: Day) -> usize {
        let before = self.workouts.len();
        self.workouts.retain(|w| w.date != date);
        before - self.workouts.len()
    }

    /// Adds free-form activity (session count and/or burned calories) to a day.
    pub fn record_activity(
        &mut self,
        date: Day,
        workouts: Option<u32>,
        calories: Option<f64>,
    ) -> LedgerResult<()> {
        let workouts = workouts.filter(|w| *w > 0);
        let calories = calories.filter(|c| *c != 0.0);
        if workouts.is_none() && calories.is_none() {
            return Err(LedgerError::validation(
                "At least one of workouts or calories is required",
            ));
        }
        if let Some(c) = calories {
            ensure_non_negative("calories", c)?;
        }
        let day = self.get_or_create_workout(date);
        if let Some(w) = workouts {
            day.total_workouts = day
                .total_workouts
                .checked_add(w)
                .ok_or_else(|| LedgerError::validation("Too many workouts for one day"))?;
            day.completed = true;
        }
        if let Some(c) = calories {
            day.activity_calories += c;
        }
        day.recompute_totals();
        Ok(())
    }

    pub fn add_milestone(&mut self, name: &str, at: OffsetDateTime) -> LedgerResult<&Milestone> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::validation("Milestone name is required"));
        }
        self.milestones.push(Milestone {
            id: Uuid::new_v4(),
            name: name.to_string(),
            date: at,
            completed: false,
        });
        Ok(&self.milestones[self.milestones.len() - 1])
    }

    pub fn remove_milestone(&mut self, id: Uuid) -> usize {
        let before = self.milestones.len();
        self.milestones.retain(|m| m.id != id);
        before - self.milestones.len()
    }

    pub fn log_calories(&mut self, date: Day, calories: f64) -> LedgerResult<()> {
        ensure_positive("Calories", calories)?;
        self.calorie_history.push(CalorieEntry { date, calories });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> Day {
        s.parse().unwrap()
    }

    fn run(minutes: f64, calories: f64) -> Exercise {
        Exercise {
            name: "Run".into(),
            focus: "Cardio".into(),
            duration: minutes,
            calories,
        }
    }

    #[test]
    fn exercises_roll_up_into_totals() {
        let mut ledger = UserLedger::new(Uuid::new_v4(), 2000);
        let today = day("2024-01-10");
        ledger.add_exercise(today, run(30.0, 300.0)).unwrap();
        let totals = ledger.add_exercise(today, run(15.0, 120.0)).unwrap();
        assert_eq!(totals.total_duration, 45.0);
        assert_eq!(totals.total_calories, 420.0);

        let after = ledger.remove_exercise(today, 0).unwrap();
        assert_eq!(after.total_calories, 120.0);
        assert_eq!(after.exercises.len(), 1);
    }

    #[test]
    fn exercise_requires_fields() {
        let mut ledger = UserLedger::new(Uuid::new_v4(), 2000);
        let mut bad = run(30.0, 300.0);
        bad.focus = String::new();
        assert!(ledger.add_exercise(day("2024-01-10"), bad).is_err());
        assert!(ledger.add_exercise(day("2024-01-10"), run(0.0, 10.0)).is_err());
        assert!(ledger.workouts.is_empty());
    }

    #[test]
    fn remove_exercise_errors() {
        let mut ledger = UserLedger::new(Uuid::new_v4(), 2000);
        let today = day("2024-01-10");
        assert!(matches!(
            ledger.remove_exercise(today, 0),
            Err(LedgerError::NotFound(_))
        ));
        ledger.add_exercise(today, run(30.0, 300.0)).unwrap();
        assert!(matches!(
            ledger.remove_exercise(today, 3),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn completing_snapshots_into_history() {
        let mut ledger = UserLedger::new(Uuid::new_v4(), 2000);
        let today = day("2024-01-10");
        ledger.add_exercise(today, run(30.0, 300.0)).unwrap();
        ledger.add_exercise(today, run(10.0, 90.0)).unwrap();
        ledger.complete_workout(today).unwrap();

        assert!(ledger.workout(today).unwrap().completed);
        assert_eq!(ledger.workout_history.len(), 1);
        assert_eq!(ledger.workout_history[0].total_calories, 390.0);

        ledger.remove_history_exercise(today, 0).unwrap();
        assert_eq!(ledger.workout_history[0].total_calories, 90.0);
        ledger.remove_history_exercise(today, 0).unwrap();
        assert!(ledger.workout_history.is_empty());
    }

    #[test]
    fn activity_survives_normalize() {
        let mut ledger = UserLedger::new(Uuid::new_v4(), 2000);
        let today = day("2024-01-10");
        ledger.record_activity(today, Some(2), Some(250.0)).unwrap();
        ledger.add_exercise(today, run(20.0, 100.0)).unwrap();
        ledger.normalize(10.0);

        let w = ledger.workout(today).unwrap();
        assert_eq!(w.total_calories, 350.0);
        assert_eq!(ledger.workouts_completed(), 2);
        assert!(w.completed);
    }

    #[test]
    fn history_totals_follow_exercises() {
        let mut ledger = UserLedger::new(Uuid::new_v4(), 2000);
        let today = day("2024-01-10");
        ledger.add_exercise(today, run(30.0, 300.0)).unwrap();
        ledger.add_exercise(today, run(12.5, 95.5)).unwrap();
        ledger.add_exercise(today, run(10.0, 90.0)).unwrap();
        ledger.complete_workout(today).unwrap();

        ledger.remove_history_exercise(today, 1).unwrap();
        let record = &ledger.workout_history[0];
        assert_eq!(record.total_calories, 390.0);
        assert_eq!(record.total_duration, 40.0);

        ledger.workout_history[0].total_calories = 1.0;
        ledger.normalize(10.0);
        assert_eq!(ledger.workout_history[0].total_calories, 390.0);
    }

    #[test]
    fn activity_count_overflow_is_rejected() {
        let mut ledger = UserLedger::new(Uuid::new_v4(), 2000);
        let today = day("2024-01-10");
        ledger.record_activity(today, Some(u32::MAX), None).unwrap();
        assert!(matches!(
            ledger.record_activity(today, Some(1), None),
            Err(LedgerError::Validation(_))
        ));
        assert_eq!(ledger.workout(today).unwrap().total_workouts, u32::MAX);

        ledger.record_activity(day("2024-01-11"), Some(5), None).unwrap();
        assert_eq!(ledger.workouts_completed(), u32::MAX);
    }

    #[test]
    fn activity_needs_something() {
        let mut ledger = UserLedger::new(Uuid::new_v4(), 2000);
        assert!(ledger.record_activity(day("2024-01-10"), None, None).is_err());
        assert!(ledger.record_activity(day("2024-01-10"), Some(0), None).is_err());
    }

    #[test]
    fn milestones_add_and_remove() {
        let mut ledger = UserLedger::new(Uuid::new_v4(), 2000);
        let id = ledger
            .add_milestone("First 5k", OffsetDateTime::UNIX_EPOCH)
            .unwrap()
            .id;
        assert!(ledger.add_milestone("  ", OffsetDateTime::UNIX_EPOCH).is_err());
        assert_eq!(ledger.remove_milestone(Uuid::new_v4()), 0);
        assert_eq!(ledger.remove_milestone(id), 1);
        assert!(ledger.milestones.is_empty());
    }

    #[test]
    fn remove_workout_by_date() {
        let mut ledger = UserLedger::new(Uuid::new_v4(), 2000);
        ledger.add_exercise(day("2024-01-10"), run(30.0, 300.0)).unwrap();
        assert_eq!(ledger.remove_workout(day("2024-01-09")), 0);
        assert_eq!(ledger.remove_workout(day("2024-01-10")), 1);
    }
}
