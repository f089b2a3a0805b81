mod dto;
pub mod handlers;
pub mod memory;
pub mod repo;
mod services;

use crate::state::AppState;
use axum::Router;

pub use repo::FeedbackStore;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
