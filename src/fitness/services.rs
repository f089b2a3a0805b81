use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{LedgerError, LedgerResult},
    ledger::{
        model::{WorkoutDay, WorkoutRecord},
        views::FitnessSummary,
        Day, Exercise, LedgerStore, UserLedger,
    },
};

use super::dto::CompletedWorkout;

const NO_FITNESS_DATA: &str = "Fitness data not found";

/// Applies `change` to the user's ledger (created on first use), saves, and
/// returns the refreshed summary.
async fn update_summary<F>(store: &dyn LedgerStore, user_id: Uuid, change: F) -> LedgerResult<FitnessSummary>
where
    F: FnOnce(&mut UserLedger) -> LedgerResult<()> + Send,
{
    let mut ledger = store.load_or_new(user_id).await?;
    change(&mut ledger)?;
    store.save(&mut ledger).await?;
    Ok(FitnessSummary::build(&ledger))
}

pub async fn summary(store: &dyn LedgerStore, user_id: Uuid) -> LedgerResult<FitnessSummary> {
    match store.load(user_id).await {
        Ok(ledger) => Ok(FitnessSummary::build(&ledger)),
        Err(LedgerError::NotFound(_)) => Ok(FitnessSummary::empty()),
        Err(e) => Err(e),
    }
}

pub async fn add_weight(
    store: &dyn LedgerStore,
    user_id: Uuid,
    date: Day,
    weight: f64,
) -> LedgerResult<FitnessSummary> {
    let summary = update_summary(store, user_id, |l| l.weight_history.add_sample(date, weight)).await?;
    info!(%user_id, %date, weight, "weight logged");
    Ok(summary)
}

pub async fn remove_weight(store: &dyn LedgerStore, user_id: Uuid, date: Day) -> LedgerResult<FitnessSummary> {
    let mut ledger = store.load_existing(user_id, NO_FITNESS_DATA).await?;
    let removed = ledger.weight_history.remove_sample(date);
    if removed > 0 {
        store.save(&mut ledger).await?;
    }
    info!(%user_id, %date, removed, "weight entry removed");
    Ok(FitnessSummary::build(&ledger))
}

pub async fn log_calories(store: &dyn LedgerStore, user_id: Uuid, date: Day, calories: f64) -> LedgerResult<()> {
    update_summary(store, user_id, |l| l.log_calories(date, calories)).await?;
    info!(%user_id, %date, calories, "calorie entry logged");
    Ok(())
}

pub async fn add_milestone(
    store: &dyn LedgerStore,
    user_id: Uuid,
    name: &str,
    at: OffsetDateTime,
) -> LedgerResult<FitnessSummary> {
    update_summary(store, user_id, |l| l.add_milestone(name, at).map(|_| ())).await
}

pub async fn remove_milestone(store: &dyn LedgerStore, user_id: Uuid, id: Uuid) -> LedgerResult<FitnessSummary> {
    let mut ledger = store.load_existing(user_id, NO_FITNESS_DATA).await?;
    if ledger.remove_milestone(id) == 0 {
        return Err(LedgerError::not_found("Milestone not found"));
    }
    store.save(&mut ledger).await?;
    Ok(FitnessSummary::build(&ledger))
}

pub async fn record_activity(
    store: &dyn LedgerStore,
    user_id: Uuid,
    date: Day,
    workouts: Option<u32>,
    calories: Option<f64>,
) -> LedgerResult<FitnessSummary> {
    update_summary(store, user_id, |l| l.record_activity(date, workouts, calories)).await
}

pub async fn remove_workout(store: &dyn LedgerStore, user_id: Uuid, date: Day) -> LedgerResult<FitnessSummary> {
    let mut ledger = store.load_existing(user_id, NO_FITNESS_DATA).await?;
    if ledger.remove_workout(date) > 0 {
        store.save(&mut ledger).await?;
        info!(%user_id, %date, "workout removed");
    }
    Ok(FitnessSummary::build(&ledger))
}

pub async fn workout_plan(store: &dyn LedgerStore, user_id: Uuid) -> LedgerResult<Vec<WorkoutDay>> {
    match store.load(user_id).await {
        Ok(ledger) => Ok(ledger.workouts),
        Err(LedgerError::NotFound(_)) => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

/// The day's plan, or an empty one that is not stored.
pub async fn today_workout(store: &dyn LedgerStore, user_id: Uuid, today: Day) -> LedgerResult<WorkoutDay> {
    let plan = workout_plan(store, user_id).await?;
    Ok(plan
        .into_iter()
        .find(|w| w.date == today)
        .unwrap_or_else(|| WorkoutDay::empty(today)))
}

pub async fn add_exercise(
    store: &dyn LedgerStore,
    user_id: Uuid,
    date: Day,
    exercise: Exercise,
) -> LedgerResult<WorkoutDay> {
    let mut ledger = store.load_or_new(user_id).await?;
    ledger.add_exercise(date, exercise)?;
    store.save(&mut ledger).await?;
    plan_day(&ledger, date)
}

pub async fn remove_exercise(
    store: &dyn LedgerStore,
    user_id: Uuid,
    date: Day,
    index: usize,
) -> LedgerResult<WorkoutDay> {
    let mut ledger = store.load_existing(user_id, "No workout found for today").await?;
    ledger.remove_exercise(date, index)?;
    store.save(&mut ledger).await?;
    plan_day(&ledger, date)
}

fn plan_day(ledger: &UserLedger, date: Day) -> LedgerResult<WorkoutDay> {
    ledger
        .workout(date)
        .cloned()
        .ok_or_else(|| LedgerError::not_found("No workout found for today"))
}

pub async fn complete_workout(store: &dyn LedgerStore, user_id: Uuid, date: Day) -> LedgerResult<CompletedWorkout> {
    let mut ledger = store.load_existing(user_id, "No workout found for today").await?;
    ledger.complete_workout(date)?;
    store.save(&mut ledger).await?;
    info!(%user_id, %date, "workout completed");
    Ok(CompletedWorkout {
        history: ledger.workout_history,
        workouts: ledger.workouts,
    })
}

pub async fn workout_history(store: &dyn LedgerStore, user_id: Uuid) -> LedgerResult<Vec<WorkoutRecord>> {
    match store.load(user_id).await {
        Ok(ledger) => Ok(ledger.workout_history),
        Err(LedgerError::NotFound(_)) => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

pub async fn remove_history_exercise(
    store: &dyn LedgerStore,
    user_id: Uuid,
    date: Day,
    index: usize,
) -> LedgerResult<Vec<WorkoutRecord>> {
    let mut ledger = store.load_existing(user_id, "Workout not found in history").await?;
    ledger.remove_history_exercise(date, index)?;
    store.save(&mut ledger).await?;
    Ok(ledger.workout_history)
}

/// Drops the user's whole ledger.
pub async fn reset(store: &dyn LedgerStore, user_id: Uuid) -> LedgerResult<()> {
    if store.delete(user_id).await? {
        info!(%user_id, "fitness data reset");
    } else {
        warn!(%user_id, "reset without a ledger");
    }
    Ok(())
}
