use axum::routing::{get, post};
use axum::Router;

use crate::posts::handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/posts", post(handlers::add_post))
        .route(
            "/api/v1/posts/{id}",
            get(handlers::get_post).put(handlers::edit_post),
        )
}
