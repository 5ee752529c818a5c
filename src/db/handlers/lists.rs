//! Database repository for lists.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::lists::{ListCreateDBRequest, ListDBResponse, ListUpdateDBRequest},
};
use crate::types::{ListId, UserId};
use chrono::{DateTime, Utc};
use sqlx::{Connection, FromRow, SqliteConnection};
use tracing::instrument;

/// Filter for listing lists
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Restrict to lists owned by this user
    pub author_id: Option<UserId>,
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct List {
    id: ListId,
    name: String,
    author_id: UserId,
    created_at: DateTime<Utc>,
}

impl From<List> for ListDBResponse {
    fn from(list: List) -> Self {
        Self {
            id: list.id,
            name: list.name,
            author_id: list.author_id,
            created_at: list.created_at,
        }
    }
}

pub struct Lists<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> Lists<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Lists<'c> {
    type CreateRequest = ListCreateDBRequest;
    type UpdateRequest = ListUpdateDBRequest;
    type Response = ListDBResponse;
    type Id = ListId;
    type Filter = ListFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let list = sqlx::query_as::<_, List>(
            "INSERT INTO lists (name, author_id, created_at)
             VALUES (?, ?, ?)
             RETURNING *",
        )
        .bind(&request.name)
        .bind(request.author_id)
        .bind(Utc::now())
        .fetch_one(&mut *self.db)
        .await?;

        Ok(list.into())
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let list = sqlx::query_as::<_, List>("SELECT * FROM lists WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(list.map(ListDBResponse::from))
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let lists = match filter.author_id {
            Some(author_id) => {
                sqlx::query_as::<_, List>("SELECT * FROM lists WHERE author_id = ? ORDER BY id")
                    .bind(author_id)
                    .fetch_all(&mut *self.db)
                    .await?
            }
            None => {
                sqlx::query_as::<_, List>("SELECT * FROM lists ORDER BY id")
                    .fetch_all(&mut *self.db)
                    .await?
            }
        };

        Ok(lists.into_iter().map(ListDBResponse::from).collect())
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let list = sqlx::query_as::<_, List>(
            "UPDATE lists SET name = COALESCE(?, name) WHERE id = ? RETURNING *",
        )
        .bind(&request.name)
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(list.into())
    }

    /// Delete a list and all movies it owns.
    ///
    /// The cascade is explicit: child movies go first, then the list,
    /// inside one transaction so a partial delete never persists.
    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM movies WHERE list_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM lists WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
