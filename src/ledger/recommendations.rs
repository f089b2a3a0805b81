//! Rule-based advice derived from the last week of step counts.
//!
//! Everything here is a pure function of [`RecommendationInput`]; the same
//! input always yields the same messages in the same order.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{day::Day, goals::GoalCategory};

pub const MAX_RECOMMENDATIONS: usize = 3;
const TREND_THRESHOLD: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepTrend {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone)]
pub struct RecommendationInput<'a> {
    pub today: Day,
    pub step_history: &'a BTreeMap<Day, u32>,
    pub workouts_completed: u32,
    pub goal: GoalCategory,
    pub daily_step_goal: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepMetrics {
    pub average_steps: u32,
    pub step_consistency: f64,
    pub workout_consistency: u32,
    pub daily_step_goal: u32,
    pub step_trend: StepTrend,
    pub today_steps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub recommendations: Vec<String>,
    pub metrics: StepMetrics,
}

fn steps_on(history: &BTreeMap<Day, u32>, day: Day) -> u32 {
    history.get(&day).copied().unwrap_or(0)
}

fn last_days(today: Day, n: i64) -> impl Iterator<Item = Day> {
    (0..n).map(move |i| today.days_before(i))
}

pub fn average_steps(history: &BTreeMap<Day, u32>, today: Day) -> u32 {
    let total: u64 = last_days(today, 7).map(|d| u64::from(steps_on(history, d))).sum();
    (total as f64 / 7.0).round() as u32
}

/// Share of the last seven days with any steps, as a percentage.
pub fn step_consistency(history: &BTreeMap<Day, u32>, today: Day) -> f64 {
    let active = last_days(today, 7).filter(|d| steps_on(history, *d) > 0).count();
    active as f64 / 7.0 * 100.0
}

pub fn step_trend(history: &BTreeMap<Day, u32>, today: Day) -> StepTrend {
    let delta = i64::from(steps_on(history, today)) - i64::from(steps_on(history, today.days_before(2)));
    if delta > TREND_THRESHOLD {
        StepTrend::Increasing
    } else if delta < -TREND_THRESHOLD {
        StepTrend::Decreasing
    } else {
        StepTrend::Stable
    }
}

pub fn generate(input: &RecommendationInput<'_>) -> Recommendations {
    let history = input.step_history;
    let goal_steps = input.daily_step_goal;
    let avg = average_steps(history, input.today);
    let consistency = step_consistency(history, input.today);
    let trend = step_trend(history, input.today);
    let today_steps = steps_on(history, input.today);
    let workouts = input.workouts_completed;
    let below = |ratio: f64| f64::from(avg) < f64::from(goal_steps) * ratio;

    let mut out: Vec<String> = Vec::new();

    if today_steps >= goal_steps {
        out.push(format!(
            "Great job! You've reached your daily step goal of {} steps! Keep up the momentum!",
            goal_steps
        ));
    } else if today_steps > 0 {
        out.push(format!(
            "You're making progress! You have {} steps remaining to reach your daily goal of {} steps.",
            goal_steps - today_steps,
            goal_steps
        ));
    }

    if consistency < 50.0 {
        out.push("You're not consistently meeting your daily step goals. Try setting reminders or using a step tracker app to stay motivated.".into());
    } else if trend == StepTrend::Decreasing {
        out.push("Your step count has been decreasing lately. Try to maintain your activity level by taking regular breaks to walk.".into());
    } else if trend == StepTrend::Increasing {
        out.push("Great job! Your step count is increasing. Keep up the momentum by maintaining this positive trend.".into());
    }

    match input.goal {
        GoalCategory::WeightLoss => {
            if below(0.7) {
                out.push("Your average step count is below target. Try taking short walks during breaks or parking further from your destination to increase daily activity.".into());
            }
            if workouts < 3 {
                out.push("Increasing workout frequency to 3-4 times per week can significantly boost your weight loss progress.".into());
            }
            if consistency > 80.0 {
                out.push("You're consistently hitting your step goals! Consider adding more high-intensity interval training (HIIT) sessions to maximize calorie burn.".into());
            }
        }
        GoalCategory::MuscleGain => {
            if workouts < 4 {
                out.push("For optimal muscle growth, aim for 4-5 strength training sessions per week.".into());
            }
            if consistency > 70.0 {
                out.push("While your step count is good, remember to balance cardio with strength training for muscle growth.".into());
            }
            out.push("Focus on progressive overload by gradually increasing weights or reps in your exercises.".into());
        }
        GoalCategory::Endurance => {
            if below(0.8) {
                out.push("Your average activity level could be improved. Try incorporating more cardio activities like running or cycling.".into());
            }
            if consistency > 60.0 {
                out.push("You're maintaining good activity levels. Add interval training sessions to improve your cardiovascular capacity.".into());
            }
            out.push("Consider increasing your workout duration gradually to build endurance.".into());
        }
        GoalCategory::Flexibility => {
            if workouts < 2 {
                out.push("Aim for at least 2-3 flexibility sessions per week to see improvements.".into());
            }
            if consistency > 70.0 {
                out.push("While your step count is good, remember to include dedicated stretching sessions in your routine.".into());
            }
            out.push("Try incorporating dynamic stretching before workouts and static stretching after.".into());
        }
        GoalCategory::OverallFitness => {
            if below(0.7) {
                out.push("Your average activity level needs improvement. Try to be more active throughout the day.".into());
            }
            if workouts < 3 {
                out.push("Aim for at least 3-4 balanced workouts per week combining cardio and strength training.".into());
            }
            if consistency > 80.0 {
                out.push("You're maintaining excellent activity levels! Consider adding more variety to your workouts.".into());
            }
        }
    }

    if consistency > 90.0 && workouts > 4 {
        out.push("You're showing excellent commitment to your fitness goals! Keep up the great work!".into());
    }

    out.truncate(MAX_RECOMMENDATIONS);

    Recommendations {
        recommendations: out,
        metrics: StepMetrics {
            average_steps: avg,
            step_consistency: consistency,
            workout_consistency: workouts,
            daily_step_goal: goal_steps,
            step_trend: trend,
            today_steps,
        },
    }
}
