//! Per-user fitness and nutrition ledger: the document model, the pure
//! aggregators that keep its derived fields consistent, and the store.

pub mod bucket;
pub mod day;
pub mod goals;
pub mod memory;
pub mod model;
pub mod recommendations;
pub mod repo;
pub mod views;
pub mod weight;
pub mod workouts;

pub use bucket::MealMatch;
pub use day::Day;
pub use goals::GoalCategory;
pub use model::{Exercise, MealTime, NewMeal, UserLedger};
pub use repo::LedgerStore;
