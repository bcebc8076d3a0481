//! Entry repository.

use std::sync::Arc;

use crate::entities::{Entry, entry};
use chrono::NaiveDate;
use promptstash_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

/// Entry repository for database operations.
#[derive(Clone)]
pub struct EntryRepository {
    db: Arc<DatabaseConnection>,
}

impl EntryRepository {
    /// Create a new entry repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Shared connection, for callers opening multi-statement units of work.
    #[must_use]
    pub fn conn(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// Find an entry by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<entry::Model>> {
        Entry::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an entry by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<entry::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::EntryNotFound(id.to_string()))
    }

    /// Find a user's entries, optionally restricted to one directory date,
    /// ordered by id ascending (creation order).
    ///
    /// Search filtering and seed grouping happen in the service layer on
    /// top of this result set.
    pub async fn find_for_user(
        &self,
        user_id: &str,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<entry::Model>> {
        let mut query = Entry::find().filter(entry::Column::UserId.eq(user_id));

        if let Some(date) = date {
            query = query.filter(entry::Column::Date.eq(date));
        }

        query
            .order_by_asc(entry::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new entry.
    ///
    /// Takes the connection so ingestion can run inside a transaction.
    pub async fn create<C: ConnectionTrait>(
        &self,
        db: &C,
        model: entry::ActiveModel,
    ) -> AppResult<entry::Model> {
        model
            .insert(db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user::Tier;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;

    fn create_test_entry(id: &str, user_id: &str, seed: i64) -> entry::Model {
        entry::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            seed,
            prompt: "a red fox".to_string(),
            negative_prompt: "blurry".to_string(),
            generation_params: json!({"Steps": "20"}),
            raw_metadata: String::new(),
            visibility: Tier::Free,
            image_path: format!("2024-03-20/{id}.png"),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let entry = create_test_entry("e1", "u1", 42);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[entry.clone()]])
                .into_connection(),
        );

        let repo = EntryRepository::new(db);
        let result = repo.find_by_id("e1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().seed, 42);
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<entry::Model>::new()])
                .into_connection(),
        );

        let repo = EntryRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::EntryNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_for_user() {
        let e1 = create_test_entry("e1", "u1", 1);
        let e2 = create_test_entry("e2", "u1", 1);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[e1, e2]])
                .into_connection(),
        );

        let repo = EntryRepository::new(db);
        let result = repo.find_for_user("u1", None).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, "e1");
    }
}
