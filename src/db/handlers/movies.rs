//! Database repository for movies.

use crate::api::models::movies::Category;
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::movies::{MovieCreateDBRequest, MovieDBResponse, MovieUpdateDBRequest},
};
use crate::types::{ListId, MovieId, UserId};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};
use tracing::instrument;

/// Filter for listing movies
#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    /// Restrict to movies in this list
    pub list_id: Option<ListId>,
    /// Restrict to movies with this category tag
    pub category: Option<Category>,
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct Movie {
    id: MovieId,
    title: String,
    year: Option<String>,
    description: Option<String>,
    rating: Option<String>,
    review: Option<String>,
    img_url: Option<String>,
    category: Category,
    list_id: ListId,
    author_id: UserId,
    created_at: DateTime<Utc>,
}

impl From<Movie> for MovieDBResponse {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            year: movie.year,
            description: movie.description,
            rating: movie.rating,
            review: movie.review,
            img_url: movie.img_url,
            category: movie.category,
            list_id: movie.list_id,
            author_id: movie.author_id,
            created_at: movie.created_at,
        }
    }
}

pub struct Movies<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> Movies<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Movies<'c> {
    type CreateRequest = MovieCreateDBRequest;
    type UpdateRequest = MovieUpdateDBRequest;
    type Response = MovieDBResponse;
    type Id = MovieId;
    type Filter = MovieFilter;

    #[instrument(skip(self, request), fields(title = %request.title), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let movie = sqlx::query_as::<_, Movie>(
            "INSERT INTO movies (title, year, description, img_url, category, list_id, author_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(&request.title)
        .bind(&request.year)
        .bind(&request.description)
        .bind(&request.img_url)
        .bind(request.category)
        .bind(request.list_id)
        .bind(request.author_id)
        .bind(Utc::now())
        .fetch_one(&mut *self.db)
        .await?;

        Ok(movie.into())
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let movie = sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(movie.map(MovieDBResponse::from))
    }

    /// List movies in reverse insertion order (newest first), optionally
    /// narrowed to one list and/or one category.
    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut sql = String::from("SELECT * FROM movies");
        let mut clauses = Vec::new();
        if filter.list_id.is_some() {
            clauses.push("list_id = ?");
        }
        if filter.category.is_some() {
            clauses.push("category = ?");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY id DESC");

        let mut query = sqlx::query_as::<_, Movie>(&sql);
        if let Some(list_id) = filter.list_id {
            query = query.bind(list_id);
        }
        if let Some(category) = filter.category {
            query = query.bind(category);
        }

        let movies = query.fetch_all(&mut *self.db).await?;

        Ok(movies.into_iter().map(MovieDBResponse::from).collect())
    }

    /// Set rating and review. Re-submission overwrites the previous values.
    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let movie = sqlx::query_as::<_, Movie>(
            "UPDATE movies SET
                rating = COALESCE(?, rating),
                review = COALESCE(?, review)
             WHERE id = ?
             RETURNING *",
        )
        .bind(&request.rating)
        .bind(&request.review)
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(movie.into())
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::handlers::{Lists, Users};
    use crate::db::models::{lists::ListCreateDBRequest, users::UserCreateDBRequest};
    use sqlx::SqlitePool;

    async fn setup_owner(conn: &mut SqliteConnection) -> (UserId, ListId) {
        let author_id = Users::new(conn)
            .create(&UserCreateDBRequest {
                email: "movies@example.com".to_string(),
                name: "Movie Fan".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
            .id;

        let list_id = Lists::new(conn)
            .create(&ListCreateDBRequest {
                name: "Backlog".to_string(),
                author_id,
            })
            .await
            .unwrap()
            .id;

        (author_id, list_id)
    }

    fn create_request(title: &str, category: Category, list_id: ListId, author_id: UserId) -> MovieCreateDBRequest {
        MovieCreateDBRequest {
            title: title.to_string(),
            year: Some("1999".to_string()),
            description: Some("A film.".to_string()),
            img_url: Some("https://image.example.com/w500/poster.jpg".to_string()),
            category,
            list_id,
            author_id,
        }
    }

    #[sqlx::test]
    async fn test_create_movie(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let (author_id, list_id) = setup_owner(&mut conn).await;
        let mut repo = Movies::new(&mut conn);

        let movie = repo
            .create(&create_request("The Matrix", Category::Action, list_id, author_id))
            .await
            .unwrap();

        assert_eq!(movie.title, "The Matrix");
        assert_eq!(movie.category, Category::Action);
        assert_eq!(movie.list_id, list_id);
        assert_eq!(movie.author_id, author_id);
        assert!(movie.rating.is_none());
        assert!(movie.review.is_none());
    }

    #[sqlx::test]
    async fn test_list_newest_first_and_filter_by_list(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let (author_id, list_id) = setup_owner(&mut conn).await;

        let other_list_id = Lists::new(&mut conn)
            .create(&ListCreateDBRequest {
                name: "Other".to_string(),
                author_id,
            })
            .await
            .unwrap()
            .id;

        let mut repo = Movies::new(&mut conn);
        let first = repo
            .create(&create_request("First", Category::Comedy, list_id, author_id))
            .await
            .unwrap();
        let second = repo
            .create(&create_request("Second", Category::Comedy, list_id, author_id))
            .await
            .unwrap();
        repo.create(&create_request("Elsewhere", Category::Comedy, other_list_id, author_id))
            .await
            .unwrap();

        let all = repo.list(&MovieFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        // Reverse insertion order
        assert_eq!(all[0].title, "Elsewhere");

        let in_list = repo
            .list(&MovieFilter {
                list_id: Some(list_id),
                category: None,
            })
            .await
            .unwrap();
        assert_eq!(in_list.iter().map(|m| m.id).collect::<Vec<_>>(), vec![second.id, first.id]);
    }

    #[sqlx::test]
    async fn test_filter_by_category(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let (author_id, list_id) = setup_owner(&mut conn).await;
        let mut repo = Movies::new(&mut conn);

        repo.create(&create_request("Halloween", Category::Horror, list_id, author_id))
            .await
            .unwrap();
        repo.create(&create_request("The Thing", Category::Horror, list_id, author_id))
            .await
            .unwrap();
        repo.create(&create_request("Airplane!", Category::Comedy, list_id, author_id))
            .await
            .unwrap();

        let horror = repo
            .list(&MovieFilter {
                list_id: None,
                category: Some(Category::Horror),
            })
            .await
            .unwrap();

        assert_eq!(horror.len(), 2);
        assert!(horror.iter().all(|m| m.category == Category::Horror));
    }

    #[sqlx::test]
    async fn test_rate_overwrites(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let (author_id, list_id) = setup_owner(&mut conn).await;
        let mut repo = Movies::new(&mut conn);

        let movie = repo
            .create(&create_request("Heat", Category::Action, list_id, author_id))
            .await
            .unwrap();

        let rated = repo
            .update(
                movie.id,
                &MovieUpdateDBRequest {
                    rating: Some("8.5".to_string()),
                    review: Some("Great film".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(rated.rating.as_deref(), Some("8.5"));
        assert_eq!(rated.review.as_deref(), Some("Great film"));

        // Re-rating overwrites rather than appending
        let rerated = repo
            .update(
                movie.id,
                &MovieUpdateDBRequest {
                    rating: Some("9".to_string()),
                    review: Some("Even better on rewatch".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(rerated.rating.as_deref(), Some("9"));
        assert_eq!(rerated.review.as_deref(), Some("Even better on rewatch"));
    }

    #[sqlx::test]
    async fn test_update_unknown_is_not_found(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Movies::new(&mut conn);

        let err = repo.update(404, &MovieUpdateDBRequest::default()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound));
    }

    #[sqlx::test]
    async fn test_delete_unknown_leaves_store_unchanged(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let (author_id, list_id) = setup_owner(&mut conn).await;
        let mut repo = Movies::new(&mut conn);

        repo.create(&create_request("Survivor", Category::Action, list_id, author_id))
            .await
            .unwrap();

        assert!(!repo.delete(9999).await.unwrap());
        assert_eq!(repo.list(&MovieFilter::default()).await.unwrap().len(), 1);
    }
}
