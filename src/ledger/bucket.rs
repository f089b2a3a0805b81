use std::collections::BTreeMap;

use uuid::Uuid;

use super::{
    day::Day,
    model::{DailyBucket, Meal, MealTime, UserLedger},
};
use crate::error::{LedgerError, LedgerResult};

/// How a meal to remove is identified.
#[derive(Debug, Clone, PartialEq)]
pub enum MealMatch {
    Id(Uuid),
    /// Legacy identity: the first meal with the same name, calories and slot.
    Fields {
        name: String,
        calories: f64,
        meal_time: MealTime,
    },
}

impl MealMatch {
    fn matches(&self, meal: &Meal) -> bool {
        match self {
            MealMatch::Id(id) => meal.id == *id,
            MealMatch::Fields {
                name,
                calories,
                meal_time,
            } => meal.name == *name && meal.calories == *calories && meal.meal_time == *meal_time,
        }
    }
}

impl DailyBucket {
    pub fn empty(date: Day) -> Self {
        Self {
            date,
            total_calories: 0.0,
            total_protein: 0.0,
            total_carbs: 0.0,
            total_fat: 0.0,
            meals: Vec::new(),
        }
    }

    pub fn add_meal(&mut self, meal: Meal) {
        self.meals.push(meal);
        self.recompute_totals();
    }

    /// Removes the first meal matching `key` and returns it.
    pub fn remove_meal(&mut self, key: &MealMatch) -> LedgerResult<Meal> {
        let idx = self
            .meals
            .iter()
            .position(|m| key.matches(m))
            .ok_or_else(|| LedgerError::not_found("Meal not found"))?;
        let removed = self.meals.remove(idx);
        self.recompute_totals();
        Ok(removed)
    }

    /// Totals are always a full sum over `meals`, so add/remove never drift.
    pub fn recompute_totals(&mut self) {
        let (calories, protein, carbs, fat) = sum_meals(&self.meals);
        self.total_calories = calories;
        self.total_protein = protein;
        self.total_carbs = carbs;
        self.total_fat = fat;
    }

    pub fn clear(&mut self) {
        self.meals.clear();
        self.recompute_totals();
    }

    /// Meals keyed by slot; every slot is present, each list in insertion order.
    pub fn grouped_meals(&self) -> BTreeMap<MealTime, Vec<Meal>> {
        let mut grouped: BTreeMap<MealTime, Vec<Meal>> =
            MealTime::ALL.into_iter().map(|t| (t, Vec::new())).collect();
        for meal in &self.meals {
            grouped.entry(meal.meal_time).or_default().push(meal.clone());
        }
        grouped
    }

    pub(crate) fn check_totals(&self) -> LedgerResult<()> {
        let (calories, protein, carbs, fat) = sum_meals(&self.meals);
        let drifted = [
            (self.total_calories, calories),
            (self.total_protein, protein),
            (self.total_carbs, carbs),
            (self.total_fat, fat),
        ]
        .iter()
        .any(|(stored, summed)| (stored - summed).abs() > 1e-9);
        if drifted {
            return Err(LedgerError::validation(format!(
                "totals for {} do not match its meals",
                self.date
            )));
        }
        Ok(())
    }
}

fn sum_meals(meals: &[Meal]) -> (f64, f64, f64, f64) {
    meals.iter().fold((0.0, 0.0, 0.0, 0.0), |acc, m| {
        (
            acc.0 + m.calories,
            acc.1 + m.protein,
            acc.2 + m.carbs,
            acc.3 + m.fat,
        )
    })
}

impl UserLedger {
    pub fn bucket(&self, date: Day) -> Option<&DailyBucket> {
        self.daily_totals.iter().find(|b| b.date == date)
    }

    pub fn bucket_mut(&mut self, date: Day) -> Option<&mut DailyBucket> {
        self.daily_totals.iter_mut().find(|b| b.date == date)
    }

    /// Returns the bucket for `date`, appending a zeroed one if it is missing.
    pub fn get_or_create_bucket(&mut self, date: Day) -> &mut DailyBucket {
        let idx = match self.daily_totals.iter().position(|b| b.date == date) {
            Some(idx) => idx,
            None => {
                self.daily_totals.push(DailyBucket::empty(date));
                self.daily_totals.len() - 1
            }
        };
        &mut self.daily_totals[idx]
    }
}
