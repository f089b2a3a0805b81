use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::LedgerResult;

/// Stored feedback entry. The submitter id stays server-side.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Feedback {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub rating: i16,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

/// Validated submission, ready to store.
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub user_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub rating: i16,
    pub message: String,
    pub date: OffsetDateTime,
}

#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn insert(&self, entry: NewFeedback) -> LedgerResult<Feedback>;

    /// Every entry, newest first.
    async fn list(&self) -> LedgerResult<Vec<Feedback>>;
}

pub struct PgFeedbackStore {
    db: PgPool,
}

impl PgFeedbackStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FeedbackStore for PgFeedbackStore {
    async fn insert(&self, entry: NewFeedback) -> LedgerResult<Feedback> {
        let row = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (user_id, name, email, rating, message, date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, name, email, rating, message, date
            "#,
        )
        .bind(entry.user_id)
        .bind(&entry.name)
        .bind(&entry.email)
        .bind(entry.rating)
        .bind(&entry.message)
        .bind(entry.date)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn list(&self) -> LedgerResult<Vec<Feedback>> {
        let rows = sqlx::query_as::<_, Feedback>(
            r#"
            SELECT id, user_id, name, email, rating, message, date
            FROM feedback
            ORDER BY date DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}
