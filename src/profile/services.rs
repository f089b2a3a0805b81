use tracing::info;
use uuid::Uuid;

use crate::{
    error::{LedgerError, LedgerResult},
    ledger::{
        goals,
        recommendations::{self, RecommendationInput, Recommendations},
        views::{GoalsView, ProgressView},
        Day, GoalCategory, LedgerStore,
    },
};

/// Resolves the goal's targets and stores them as the single goal settings.
pub async fn update_goal(
    store: &dyn LedgerStore,
    user_id: Uuid,
    category: GoalCategory,
    base_calories: Option<f64>,
    weight_loss_goal_kg: Option<f64>,
) -> LedgerResult<GoalsView> {
    let targets = goals::resolve(category, base_calories)?;
    let mut ledger = store.load_or_new(user_id).await?;
    ledger.goals.apply(&targets);
    if let Some(kg) = weight_loss_goal_kg {
        ledger.goals.weight_loss_goal_kg = Some(kg);
    }
    store.save(&mut ledger).await?;
    info!(%user_id, goal = %category, calories = targets.daily_calorie_goal, "goal updated");
    Ok(GoalsView::build(&ledger, store.config().weight_loss_goal_kg))
}

pub async fn user_goals(store: &dyn LedgerStore, user_id: Uuid) -> LedgerResult<GoalsView> {
    let ledger = store.load_or_new(user_id).await?;
    Ok(GoalsView::build(&ledger, store.config().weight_loss_goal_kg))
}

pub async fn update_step_goal(store: &dyn LedgerStore, user_id: Uuid, goal: i64) -> LedgerResult<u32> {
    let goal = u32::try_from(goal)
        .ok()
        .filter(|g| *g > 0)
        .ok_or_else(|| LedgerError::validation("Invalid step goal"))?;
    let mut ledger = store.load_or_new(user_id).await?;
    ledger.goals.daily_step_goal = goal;
    store.save(&mut ledger).await?;
    Ok(goal)
}

pub async fn update_steps(store: &dyn LedgerStore, user_id: Uuid, date: Day, steps: i64) -> LedgerResult<u32> {
    let steps = u32::try_from(steps).map_err(|_| LedgerError::validation("Invalid date or steps"))?;
    let mut ledger = store.load_or_new(user_id).await?;
    ledger.step_history.insert(date, steps);
    store.save(&mut ledger).await?;
    info!(%user_id, %date, steps, "steps recorded");
    Ok(steps)
}

pub async fn reset_daily_steps(store: &dyn LedgerStore, user_id: Uuid, date: Day) -> LedgerResult<()> {
    update_steps(store, user_id, date, 0).await.map(|_| ())
}

pub async fn progress(store: &dyn LedgerStore, user_id: Uuid) -> LedgerResult<ProgressView> {
    match store.load(user_id).await {
        Ok(ledger) => Ok(ProgressView::build(&ledger)),
        Err(LedgerError::NotFound(_)) => Ok(ProgressView::empty()),
        Err(e) => Err(e),
    }
}

pub async fn recommendations(store: &dyn LedgerStore, user_id: Uuid, today: Day) -> LedgerResult<Recommendations> {
    let ledger = store.load_or_new(user_id).await?;
    let input = RecommendationInput {
        today,
        step_history: &ledger.step_history,
        workouts_completed: ledger.workouts_completed(),
        goal: ledger.goals.category,
        daily_step_goal: ledger.goals.daily_step_goal,
    };
    Ok(recommendations::generate(&input))
}
