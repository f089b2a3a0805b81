use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repo::{Feedback, FeedbackStore, NewFeedback};
use crate::error::LedgerResult;

#[derive(Default)]
pub struct MemoryFeedbackStore {
    entries: RwLock<Vec<Feedback>>,
}

impl MemoryFeedbackStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackStore for MemoryFeedbackStore {
    async fn insert(&self, entry: NewFeedback) -> LedgerResult<Feedback> {
        let stored = Feedback {
            id: Uuid::new_v4(),
            user_id: entry.user_id,
            name: entry.name,
            email: entry.email,
            rating: entry.rating,
            message: entry.message,
            date: entry.date,
        };
        self.entries.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> LedgerResult<Vec<Feedback>> {
        let mut all = self.entries.read().await.clone();
        all.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(all)
    }
}
