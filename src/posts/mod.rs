pub mod binder;
pub mod domain;
pub mod handlers;
pub mod repository;

pub use binder::PostPayload;
pub use domain::{Post, PostForm};
pub use repository::{PostFilter, PostRepository, RepositoryError, SqlitePostRepository};
