//! Common tag service.

use promptstash_common::AppResult;
use promptstash_db::{entities::common_tag, repositories::CommonTagRepository};
use sea_orm::ConnectionTrait;
use serde::Serialize;

/// Response for a common tag.
#[derive(Debug, Serialize)]
pub struct CommonTagResponse {
    pub id: String,
    pub name: String,
    pub count: i32,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<common_tag::Model> for CommonTagResponse {
    fn from(t: common_tag::Model) -> Self {
        Self {
            id: t.id,
            name: t.name,
            count: t.count,
            user_id: t.user_id,
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}

/// Service for the per-user common-tag aggregator.
#[derive(Clone)]
pub struct CommonTagService {
    tag_repo: CommonTagRepository,
}

impl CommonTagService {
    /// Create a new common tag service.
    #[must_use]
    pub const fn new(tag_repo: CommonTagRepository) -> Self {
        Self { tag_repo }
    }

    /// All tags for a user, ordered by count descending (ties by insertion
    /// order). Storage failures propagate with the raw message intact.
    pub async fn list_for_user(&self, user_id: &str) -> AppResult<Vec<CommonTagResponse>> {
        let tags = self.tag_repo.find_by_user_id(user_id).await?;
        Ok(tags.into_iter().map(CommonTagResponse::from).collect())
    }

    /// Record one observation of each tag name for a user.
    pub async fn observe(&self, user_id: &str, names: &[String]) -> AppResult<()> {
        self.observe_on(self.tag_repo.conn(), user_id, names).await
    }

    /// Like [`Self::observe`], on a caller-supplied connection so the bumps
    /// can join an enclosing transaction.
    pub async fn observe_on<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
        names: &[String],
    ) -> AppResult<()> {
        for name in names {
            self.tag_repo.increment(db, user_id, name).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use promptstash_common::AppError;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_tag(id: &str, user_id: &str, name: &str, count: i32) -> common_tag::Model {
        common_tag::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            count,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_list_for_user() {
        let tag1 = create_test_tag("t1", "u1", "high quality", 200);
        let tag2 = create_test_tag("t2", "u1", "portrait", 150);
        let tag3 = create_test_tag("t3", "u1", "landscape", 120);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[tag1, tag2, tag3]])
                .into_connection(),
        );

        let service = CommonTagService::new(CommonTagRepository::new(db));
        let tags = service.list_for_user("u1").await.unwrap();

        assert_eq!(tags.len(), 3);
        assert_eq!(tags[0].count, 200);
        assert_eq!(tags[1].count, 150);
        assert_eq!(tags[2].count, 120);
    }

    #[tokio::test]
    async fn test_list_for_user_empty() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<common_tag::Model>::new()])
                .into_connection(),
        );

        let service = CommonTagService::new(CommonTagRepository::new(db));
        let tags = service.list_for_user("u1").await.unwrap();

        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn test_observe_bumps_existing_tag() {
        let tag = create_test_tag("t1", "u1", "portrait", 3);
        let mut updated = tag.clone();
        updated.count = 4;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[tag]])
                .append_exec_results([sea_orm::MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[updated]])
                .into_connection(),
        );

        let service = CommonTagService::new(CommonTagRepository::new(db));
        let result = service.observe("u1", &["portrait".to_string()]).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_storage_failure_propagates_message() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([sea_orm::DbErr::Custom("Database error".to_string())])
                .into_connection(),
        );

        let service = CommonTagService::new(CommonTagRepository::new(db));
        let result = service.list_for_user("u1").await;

        match result {
            Err(AppError::Database(msg)) => assert!(msg.contains("Database error")),
            _ => panic!("Expected Database error"),
        }
    }
}
