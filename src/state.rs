use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::Config;
use crate::posts::repository::{PostRepository, SqlitePostRepository};

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub posts: Arc<dyn PostRepository>,
}

impl AppState {
    /// State backed by SQLite for both sessions and posts.
    pub fn new(db: DbPool, config: Config) -> Self {
        let posts = Arc::new(SqlitePostRepository::new(db.clone()));
        Self { db, config, posts }
    }
}
