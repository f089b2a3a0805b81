use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::model::{ensure_positive, GoalSettings, DEFAULT_CALORIE_GOAL};
use crate::error::{LedgerError, LedgerResult};

/// The five fitness objectives a user can pick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalCategory {
    #[default]
    #[serde(rename = "Weight loss")]
    WeightLoss,
    #[serde(rename = "Muscle gain")]
    MuscleGain,
    Endurance,
    Flexibility,
    #[serde(rename = "Overall fitness")]
    OverallFitness,
}

impl GoalCategory {
    pub const ALL: [GoalCategory; 5] = [
        GoalCategory::WeightLoss,
        GoalCategory::MuscleGain,
        GoalCategory::Endurance,
        GoalCategory::Flexibility,
        GoalCategory::OverallFitness,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GoalCategory::WeightLoss => "Weight loss",
            GoalCategory::MuscleGain => "Muscle gain",
            GoalCategory::Endurance => "Endurance",
            GoalCategory::Flexibility => "Flexibility",
            GoalCategory::OverallFitness => "Overall fitness",
        }
    }

    /// `(daily step goal, calorie multiplier)` for this objective.
    pub fn targets(self) -> (u32, f64) {
        match self {
            GoalCategory::WeightLoss => (10_000, 0.8),
            GoalCategory::MuscleGain => (8_000, 1.2),
            GoalCategory::Endurance => (12_000, 1.1),
            GoalCategory::Flexibility => (7_000, 1.0),
            GoalCategory::OverallFitness => (10_000, 1.0),
        }
    }
}

impl fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalCategory {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GoalCategory::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| LedgerError::validation(format!("Unknown goal '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalTargets {
    pub category: GoalCategory,
    pub daily_step_goal: u32,
    pub calorie_multiplier: f64,
    pub daily_calorie_goal: u32,
}

/// Turns a goal category and an optional base intake into concrete targets.
pub fn resolve(category: GoalCategory, base_calories: Option<f64>) -> LedgerResult<GoalTargets> {
    let base = match base_calories {
        Some(c) => {
            ensure_positive("Base calories", c)?;
            c
        }
        None => f64::from(DEFAULT_CALORIE_GOAL),
    };
    let (daily_step_goal, calorie_multiplier) = category.targets();
    let daily_calorie_goal = (base * calorie_multiplier).round();
    if daily_calorie_goal < 1.0 || daily_calorie_goal > f64::from(u32::MAX) {
        return Err(LedgerError::validation("Base calories out of range"));
    }
    Ok(GoalTargets {
        category,
        daily_step_goal,
        calorie_multiplier,
        daily_calorie_goal: daily_calorie_goal as u32,
    })
}

impl GoalSettings {
    pub fn apply(&mut self, targets: &GoalTargets) {
        self.category = targets.category;
        self.daily_step_goal = targets.daily_step_goal;
        self.daily_calorie_goal = targets.daily_calorie_goal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn muscle_gain_from_default_base() {
        let t = resolve(GoalCategory::MuscleGain, Some(2000.0)).unwrap();
        assert_eq!(t.daily_step_goal, 8000);
        assert_eq!(t.daily_calorie_goal, 2400);
    }

    #[test]
    fn full_table() {
        let cases = [
            (GoalCategory::WeightLoss, 10_000, 1600),
            (GoalCategory::MuscleGain, 8_000, 2400),
            (GoalCategory::Endurance, 12_000, 2200),
            (GoalCategory::Flexibility, 7_000, 2000),
            (GoalCategory::OverallFitness, 10_000, 2000),
        ];
        for (category, steps, calories) in cases {
            let t = resolve(category, None).unwrap();
            assert_eq!(t.daily_step_goal, steps, "{}", category);
            assert_eq!(t.daily_calorie_goal, calories, "{}", category);
        }
    }

    #[test]
    fn calorie_goal_is_rounded() {
        let t = resolve(GoalCategory::Endurance, Some(1855.0)).unwrap();
        assert_eq!(t.daily_calorie_goal, 2041);
    }

    #[test]
    fn bad_base_calories_rejected() {
        assert!(resolve(GoalCategory::WeightLoss, Some(0.0)).is_err());
        assert!(resolve(GoalCategory::WeightLoss, Some(-10.0)).is_err());
        assert!(resolve(GoalCategory::WeightLoss, Some(f64::INFINITY)).is_err());
    }

    #[test]
    fn parse_exact_names_only() {
        assert_eq!(
            "Overall fitness".parse::<GoalCategory>().unwrap(),
            GoalCategory::OverallFitness
        );
        assert!(matches!(
            "Bulking".parse::<GoalCategory>(),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn apply_writes_single_source() {
        let mut settings = GoalSettings::default();
        let t = resolve(GoalCategory::Endurance, Some(2000.0)).unwrap();
        settings.apply(&t);
        assert_eq!(settings.category, GoalCategory::Endurance);
        assert_eq!(settings.daily_step_goal, 12_000);
        assert_eq!(settings.daily_calorie_goal, 2200);
    }
}
