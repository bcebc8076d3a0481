//! Common tag repository.

use std::sync::Arc;

use crate::entities::{CommonTag, common_tag};
use chrono::Utc;
use promptstash_common::{AppError, AppResult, IdGenerator};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

/// Common tag repository for database operations.
#[derive(Clone)]
pub struct CommonTagRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl CommonTagRepository {
    /// Create a new common tag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Shared connection, for callers opening multi-statement units of work.
    #[must_use]
    pub fn conn(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// All tags for a user, ordered by count descending.
    ///
    /// Ties break by ascending id; ids are ULIDs, so that is insertion
    /// order and the sort is stable across calls.
    pub async fn find_by_user_id(&self, user_id: &str) -> AppResult<Vec<common_tag::Model>> {
        CommonTag::find()
            .filter(common_tag::Column::UserId.eq(user_id))
            .order_by_desc(common_tag::Column::Count)
            .order_by_asc(common_tag::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a tag by owner and name.
    pub async fn find_by_user_and_name<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
        name: &str,
    ) -> AppResult<Option<common_tag::Model>> {
        CommonTag::find()
            .filter(common_tag::Column::UserId.eq(user_id))
            .filter(common_tag::Column::Name.eq(name))
            .one(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get or create the `(user_id, name)` tag row.
    pub async fn get_or_create<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
        name: &str,
    ) -> AppResult<common_tag::Model> {
        if let Some(tag) = self.find_by_user_and_name(db, user_id, name).await? {
            return Ok(tag);
        }

        let model = common_tag::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            name: Set(name.to_string()),
            count: Set(0),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        model
            .insert(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment the observation count for a tag, creating it on first use.
    ///
    /// Takes the connection so the bump can join a caller's transaction.
    pub async fn increment<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
        name: &str,
    ) -> AppResult<common_tag::Model> {
        let tag = self.get_or_create(db, user_id, name).await?;

        let count = tag.count;
        let mut active: common_tag::ActiveModel = tag.into();
        active.count = Set(count + 1);
        active.updated_at = Set(Utc::now().into());

        active
            .update(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

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
    async fn test_find_by_user_id() {
        let tag1 = create_test_tag("t1", "u1", "high quality", 200);
        let tag2 = create_test_tag("t2", "u1", "portrait", 150);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[tag1, tag2]])
                .into_connection(),
        );

        let repo = CommonTagRepository::new(db);
        let result = repo.find_by_user_id("u1").await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "high quality");
    }

    #[tokio::test]
    async fn test_increment_existing_tag() {
        let tag = create_test_tag("t1", "u1", "portrait", 3);
        let mut updated = tag.clone();
        updated.count = 4;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[tag]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[updated]])
                .into_connection(),
        );

        let repo = CommonTagRepository::new(db);
        let result = repo.increment(repo.conn(), "u1", "portrait").await.unwrap();

        assert_eq!(result.count, 4);
    }

    #[tokio::test]
    async fn test_listing_orders_count_desc_then_id_asc() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<common_tag::Model>::new()])
                .into_connection(),
        );

        let repo = CommonTagRepository::new(Arc::clone(&db));
        repo.find_by_user_id("u1").await.unwrap();
        drop(repo);

        let Ok(conn) = Arc::try_unwrap(db) else {
            panic!("connection still shared")
        };
        let log = format!("{:?}", conn.into_transaction_log()).replace('\\', "");
        assert!(
            log.contains(r#"ORDER BY "common_tag"."count" DESC, "common_tag"."id" ASC"#),
            "unexpected listing SQL: {log}"
        );
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces_database_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_errors([sea_orm::DbErr::Custom("Database error".to_string())])
                .into_connection(),
        );

        let repo = CommonTagRepository::new(db);
        let result = repo.find_by_user_id("u1").await;

        match result {
            Err(AppError::Database(msg)) => assert!(msg.contains("Database error")),
            _ => panic!("Expected Database error"),
        }
    }
}
