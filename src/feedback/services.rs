use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::{
    dto::SubmitFeedbackRequest,
    repo::{Feedback, FeedbackStore},
};
use crate::error::LedgerResult;

pub async fn submit(
    store: &dyn FeedbackStore,
    user_id: Uuid,
    request: SubmitFeedbackRequest,
    at: OffsetDateTime,
) -> LedgerResult<Feedback> {
    let entry = request.into_new_feedback(user_id, at)?;
    let stored = store.insert(entry).await?;
    info!(%user_id, feedback_id = %stored.id, rating = stored.rating, "feedback submitted");
    Ok(stored)
}

pub async fn list(store: &dyn FeedbackStore) -> LedgerResult<Vec<Feedback>> {
    store.list().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::memory::MemoryFeedbackStore;
    use time::Duration;

    fn request(name: &str, rating: i64) -> SubmitFeedbackRequest {
        SubmitFeedbackRequest {
            name: Some(name.into()),
            email: None,
            rating: Some(rating),
            message: Some("Great app".into()),
        }
    }

    #[tokio::test]
    async fn listing_is_newest_first() {
        let store = MemoryFeedbackStore::new();
        let user = Uuid::new_v4();
        let start = OffsetDateTime::UNIX_EPOCH;
        submit(&store, user, request("Old", 3), start).await.unwrap();
        submit(&store, user, request("New", 5), start + Duration::days(2)).await.unwrap();
        submit(&store, user, request("Mid", 4), start + Duration::days(1)).await.unwrap();

        let names: Vec<String> = list(&store).await.unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["New", "Mid", "Old"]);
    }

    #[tokio::test]
    async fn invalid_submission_is_not_stored() {
        let store = MemoryFeedbackStore::new();
        assert!(submit(&store, Uuid::new_v4(), request("Jane", 0), OffsetDateTime::UNIX_EPOCH)
            .await
            .is_err());
        assert!(list(&store).await.unwrap().is_empty());
    }
}
