use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::{LedgerError, LedgerResult},
    ledger::{
        model::{ensure_positive, DailyBucket, Meal},
        views::NutritionView,
        Day, LedgerStore, MealMatch, NewMeal, UserLedger,
    },
};

/// Daily view for `date`. Users without a ledger get the defaults and
/// nothing is written; otherwise a zero bucket is stored for a new date.
pub async fn nutrition_view(
    store: &dyn LedgerStore,
    user_id: Uuid,
    date: Day,
    today: Day,
) -> LedgerResult<NutritionView> {
    let mut ledger = match store.load(user_id).await {
        Ok(l) => l,
        Err(LedgerError::NotFound(_)) => {
            let fresh = UserLedger::new(user_id, store.config().default_calorie_goal);
            return Ok(NutritionView::build(&fresh, date, today));
        }
        Err(e) => return Err(e),
    };

    if ledger.bucket(date).is_none() {
        ledger.get_or_create_bucket(date);
        store.save(&mut ledger).await?;
        debug!(%user_id, %date, "created empty bucket");
    }
    Ok(NutritionView::build(&ledger, date, today))
}

/// Every stored day, oldest bucket first.
pub async fn history(store: &dyn LedgerStore, user_id: Uuid) -> LedgerResult<Vec<DailyBucket>> {
    match store.load(user_id).await {
        Ok(ledger) => {
            let mut buckets = ledger.daily_totals;
            buckets.sort_by_key(|b| b.date);
            Ok(buckets)
        }
        Err(LedgerError::NotFound(_)) => Ok(Vec::new()),
        Err(e) => Err(e),
    }
}

pub async fn add_meal(
    store: &dyn LedgerStore,
    user_id: Uuid,
    date: Day,
    new_meal: NewMeal,
    logged_at: OffsetDateTime,
) -> LedgerResult<Meal> {
    let meal = new_meal.into_meal(logged_at)?;
    let mut ledger = store.load_or_new(user_id).await?;
    ledger.get_or_create_bucket(date).add_meal(meal.clone());
    store.save(&mut ledger).await?;
    info!(%user_id, %date, meal_id = %meal.id, "meal added");
    Ok(meal)
}

pub async fn remove_meal(
    store: &dyn LedgerStore,
    user_id: Uuid,
    date: Day,
    key: &MealMatch,
) -> LedgerResult<Meal> {
    let mut ledger = store.load_existing(user_id, "Nutrition data not found").await?;
    let removed = ledger
        .bucket_mut(date)
        .ok_or_else(|| LedgerError::not_found("No data found for the specified date"))?
        .remove_meal(key)?;
    store.save(&mut ledger).await?;
    info!(%user_id, %date, meal_id = %removed.id, "meal removed");
    Ok(removed)
}

/// Empties the bucket for `date`. A date without a bucket is left alone.
pub async fn reset_daily(store: &dyn LedgerStore, user_id: Uuid, date: Day) -> LedgerResult<()> {
    let mut ledger = store.load_existing(user_id, "Nutrition data not found").await?;
    if let Some(bucket) = ledger.bucket_mut(date) {
        bucket.clear();
        store.save(&mut ledger).await?;
    }
    info!(%user_id, %date, "daily nutrition reset");
    Ok(())
}

/// Sets the single daily calorie goal every view reads.
pub async fn update_calorie_goal(
    store: &dyn LedgerStore,
    user_id: Uuid,
    calories: f64,
) -> LedgerResult<u32> {
    ensure_positive("Daily calorie goal", calories)?;
    let rounded = calories.round();
    if rounded < 1.0 || rounded > f64::from(u32::MAX) {
        return Err(LedgerError::validation("Daily calorie goal out of range"));
    }
    let goal = rounded as u32;
    let mut ledger = store.load_or_new(user_id).await?;
    ledger.goals.daily_calorie_goal = goal;
    store.save(&mut ledger).await?;
    info!(%user_id, goal, "calorie goal updated");
    Ok(goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::LedgerConfig,
        ledger::{memory::MemoryLedgerStore, MealTime},
    };

    fn store() -> MemoryLedgerStore {
        MemoryLedgerStore::new(LedgerConfig::default())
    }

    fn day(s: &str) -> Day {
        s.parse().unwrap()
    }

    fn oatmeal() -> NewMeal {
        NewMeal {
            name: "Oatmeal".into(),
            calories: 150.0,
            protein: 5.0,
            carbs: 27.0,
            fat: 3.0,
            meal_time: MealTime::Breakfast,
        }
    }

    #[tokio::test]
    async fn view_without_ledger_writes_nothing() {
        let store = store();
        let user = Uuid::new_v4();
        let view = nutrition_view(&store, user, day("2024-01-10"), day("2024-01-10"))
            .await
            .unwrap();
        assert!(view.daily_totals.is_empty());
        assert_eq!(view.daily_calorie_goal, 2000);
        assert_eq!(view.meals.len(), 5);
        assert!(matches!(store.load(user).await, Err(LedgerError::NotFound(_))));
    }

    #[tokio::test]
    async fn view_creates_bucket_once() {
        let store = store();
        let user = Uuid::new_v4();
        add_meal(&store, user, day("2024-01-09"), oatmeal(), OffsetDateTime::UNIX_EPOCH)
            .await
            .unwrap();

        for _ in 0..2 {
            let view = nutrition_view(&store, user, day("2024-01-10"), day("2024-01-10"))
                .await
                .unwrap();
            assert_eq!(view.daily_totals.len(), 2);
        }
        let bucket = store.find_bucket(user, day("2024-01-10")).await.unwrap().unwrap();
        assert_eq!(bucket.total_calories, 0.0);
    }

    #[tokio::test]
    async fn add_then_remove_by_fields_restores_totals() {
        let store = store();
        let user = Uuid::new_v4();
        let date = day("2024-01-10");
        add_meal(&store, user, date, oatmeal(), OffsetDateTime::UNIX_EPOCH)
            .await
            .unwrap();
        let second = NewMeal {
            name: "Banana".into(),
            calories: 105.0,
            protein: 1.0,
            carbs: 27.0,
            fat: 0.0,
            meal_time: MealTime::MorningSnack,
        };
        add_meal(&store, user, date, second, OffsetDateTime::UNIX_EPOCH)
            .await
            .unwrap();

        let key = MealMatch::Fields {
            name: "Banana".into(),
            calories: 105.0,
            meal_time: MealTime::MorningSnack,
        };
        let removed = remove_meal(&store, user, date, &key).await.unwrap();
        assert_eq!(removed.name, "Banana");

        let bucket = store.find_bucket(user, date).await.unwrap().unwrap();
        assert_eq!(bucket.meals.len(), 1);
        assert_eq!(bucket.total_calories, 150.0);
        assert_eq!(bucket.total_carbs, 27.0);
    }

    #[tokio::test]
    async fn remove_reports_missing_pieces() {
        let store = store();
        let user = Uuid::new_v4();
        let key = MealMatch::Id(Uuid::new_v4());

        let err = remove_meal(&store, user, day("2024-01-10"), &key).await.unwrap_err();
        assert_eq!(err.to_string(), "Nutrition data not found");

        add_meal(&store, user, day("2024-01-10"), oatmeal(), OffsetDateTime::UNIX_EPOCH)
            .await
            .unwrap();
        let err = remove_meal(&store, user, day("2024-01-11"), &key).await.unwrap_err();
        assert_eq!(err.to_string(), "No data found for the specified date");

        let err = remove_meal(&store, user, day("2024-01-10"), &key).await.unwrap_err();
        assert_eq!(err.to_string(), "Meal not found");
        let bucket = store.find_bucket(user, day("2024-01-10")).await.unwrap().unwrap();
        assert_eq!(bucket.meals.len(), 1);
    }

    #[tokio::test]
    async fn reset_daily_clears_only_that_day() {
        let store = store();
        let user = Uuid::new_v4();
        for d in ["2024-01-09", "2024-01-10"] {
            add_meal(&store, user, day(d), oatmeal(), OffsetDateTime::UNIX_EPOCH)
                .await
                .unwrap();
        }
        reset_daily(&store, user, day("2024-01-10")).await.unwrap();

        let cleared = store.find_bucket(user, day("2024-01-10")).await.unwrap().unwrap();
        assert!(cleared.meals.is_empty());
        assert_eq!(cleared.total_calories, 0.0);
        let kept = store.find_bucket(user, day("2024-01-09")).await.unwrap().unwrap();
        assert_eq!(kept.total_calories, 150.0);
    }

    #[tokio::test]
    async fn history_is_sorted_by_date() {
        let store = store();
        let user = Uuid::new_v4();
        assert!(history(&store, user).await.unwrap().is_empty());
        for d in ["2024-01-10", "2024-01-08", "2024-01-09"] {
            add_meal(&store, user, day(d), oatmeal(), OffsetDateTime::UNIX_EPOCH)
                .await
                .unwrap();
        }
        let dates: Vec<String> = history(&store, user)
            .await
            .unwrap()
            .iter()
            .map(|b| b.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2024-01-08", "2024-01-09", "2024-01-10"]);
    }

    #[tokio::test]
    async fn calorie_goal_is_rounded_and_positive() {
        let store = store();
        let user = Uuid::new_v4();
        assert_eq!(update_calorie_goal(&store, user, 1849.6).await.unwrap(), 1850);
        assert_eq!(store.load(user).await.unwrap().goals.daily_calorie_goal, 1850);
        assert!(matches!(
            update_calorie_goal(&store, user, 0.0).await,
            Err(LedgerError::Validation(_))
        ));
        for bad in [0.4, 1e20] {
            assert!(matches!(
                update_calorie_goal(&store, user, bad).await,
                Err(LedgerError::Validation(_))
            ));
        }
        assert_eq!(store.load(user).await.unwrap().goals.daily_calorie_goal, 1850);
    }

    #[tokio::test]
    async fn padded_name_round_trips_through_remove() {
        let store = store();
        let user = Uuid::new_v4();
        let date = day("2024-01-10");
        let padded = NewMeal {
            name: " Oatmeal ".into(),
            ..oatmeal()
        };
        add_meal(&store, user, date, padded, OffsetDateTime::UNIX_EPOCH)
            .await
            .unwrap();
        let key = MealMatch::Fields {
            name: "Oatmeal".into(),
            calories: 150.0,
            meal_time: MealTime::Breakfast,
        };
        remove_meal(&store, user, date, &key).await.unwrap();
        assert!(store.find_bucket(user, date).await.unwrap().unwrap().meals.is_empty());
    }
}
