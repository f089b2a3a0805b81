use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::NewFeedback;
use crate::{
    auth::services::is_valid_email,
    error::{LedgerError, LedgerResult},
};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

#[derive(Debug, Deserialize)]
pub struct SubmitFeedbackRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub rating: Option<i64>,
    pub message: Option<String>,
}

impl SubmitFeedbackRequest {
    pub fn into_new_feedback(self, user_id: Uuid, date: OffsetDateTime) -> LedgerResult<NewFeedback> {
        let trimmed = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        let (Some(name), Some(rating), Some(message)) =
            (trimmed(self.name), self.rating, trimmed(self.message))
        else {
            return Err(LedgerError::validation("Name, rating, and message are required"));
        };
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(LedgerError::validation("Rating must be between 1 and 5"));
        }
        let email = trimmed(self.email).map(|e| e.to_lowercase());
        if email.as_deref().is_some_and(|e| !is_valid_email(e)) {
            return Err(LedgerError::validation("Invalid email format"));
        }
        Ok(NewFeedback {
            user_id,
            name,
            email,
            rating: rating as i16,
            message,
            date,
        })
    }
}
