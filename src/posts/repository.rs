// Repository pattern - isolates all post storage side effects
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use thiserror::Error;

use crate::id::EntityId;
use crate::posts::domain::Post;
use crate::state::DbPool;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] r2d2::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("post not found")]
    NotFound,
}

/// Equality filter over posts; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub id: Option<EntityId>,
    pub user: Option<EntityId>,
}

impl PostFilter {
    pub fn by_id(id: EntityId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_user(user: EntityId) -> Self {
        Self {
            user: Some(user),
            ..Self::default()
        }
    }

    fn where_clause(&self) -> (String, Vec<Value>) {
        let mut clauses = Vec::new();
        let mut values = Vec::new();

        if let Some(id) = &self.id {
            clauses.push(format!("id = ?{}", values.len() + 1));
            values.push(Value::Text(id.to_hex()));
        }
        if let Some(user) = &self.user {
            clauses.push(format!("user_id = ?{}", values.len() + 1));
            values.push(Value::Text(user.to_hex()));
        }

        if clauses.is_empty() {
            (String::new(), values)
        } else {
            (format!("WHERE {}", clauses.join(" AND ")), values)
        }
    }
}

/// Storage collaborator for posts
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert or replace the post keyed by its id (idempotent upsert)
    async fn save(&self, post: &Post) -> Result<(), RepositoryError>;

    /// First post matching the filter, oldest first
    async fn find_one(&self, filter: &PostFilter) -> Result<Post, RepositoryError>;
}

/// SQLite implementation
pub struct SqlitePostRepository {
    pool: DbPool,
}

impl SqlitePostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for SqlitePostRepository {
    async fn save(&self, post: &Post) -> Result<(), RepositoryError> {
        let conn = self.pool.get()?;

        let categories = serde_json::to_string(&post.categories)?;
        let tags = serde_json::to_string(&post.tags)?;

        conn.execute(
            "INSERT INTO posts (id, user_id, title, content, categories, tags, thumbnail, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(id) DO UPDATE SET
               title = excluded.title,
               content = excluded.content,
               categories = excluded.categories,
               tags = excluded.tags,
               thumbnail = excluded.thumbnail,
               updated_at = excluded.updated_at",
            params![
                post.id.to_hex(),
                post.user.to_hex(),
                post.title,
                post.content,
                categories,
                tags,
                post.thumbnail.map(|t| t.to_hex()),
                post.created_at.to_rfc3339(),
                post.updated_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!(post_id = %post.id, "post saved");
        Ok(())
    }

    async fn find_one(&self, filter: &PostFilter) -> Result<Post, RepositoryError> {
        let conn = self.pool.get()?;

        let (where_clause, values) = filter.where_clause();
        let sql = format!(
            "SELECT id, user_id, title, content, categories, tags, thumbnail, created_at, updated_at
             FROM posts {} ORDER BY created_at ASC, id ASC LIMIT 1",
            where_clause
        );

        let row = conn
            .query_row(&sql, params_from_iter(values), PostRow::from_row)
            .optional()?;

        match row {
            Some(row) => row.into_post(),
            None => Err(RepositoryError::NotFound),
        }
    }
}

/// Raw column values, converted to a `Post` outside the rusqlite closure.
struct PostRow {
    id: String,
    user_id: String,
    title: String,
    content: String,
    categories: String,
    tags: String,
    thumbnail: Option<String>,
    created_at: String,
    updated_at: String,
}

impl PostRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            categories: row.get(4)?,
            tags: row.get(5)?,
            thumbnail: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn into_post(self) -> Result<Post, RepositoryError> {
        Ok(Post {
            id: parse_id(&self.id)?,
            user: parse_id(&self.user_id)?,
            title: self.title,
            content: self.content,
            categories: serde_json::from_str(&self.categories)?,
            tags: serde_json::from_str(&self.tags)?,
            thumbnail: self.thumbnail.as_deref().map(parse_id).transpose()?,
            created_at: parse_time(&self.created_at)?,
            updated_at: parse_time(&self.updated_at)?,
        })
    }
}

fn parse_id(s: &str) -> Result<EntityId, RepositoryError> {
    EntityId::parse(s).map_err(|e| RepositoryError::Corrupt(format!("{}: {}", s, e)))
}

fn parse_time(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Corrupt(format!("{}: {}", s, e)))
}
