use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::id::EntityId;
use crate::posts::binder::PostPayload;
use crate::posts::domain::Post;
use crate::posts::repository::PostFilter;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PostResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub post: Post,
}

/// POST /api/v1/posts
pub async fn add_post(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: Result<PostPayload, AppError>,
) -> AppResult<Json<PostResponse>> {
    let PostPayload(form) = payload?;

    let post = Post::new(user.id, form);
    state.posts.save(&post).await?;

    tracing::info!(post_id = %post.id, user = %user.username, "post created");
    Ok(Json(PostResponse {
        message: Some("post created successfully"),
        post,
    }))
}

/// PUT /api/v1/posts/{id}
///
/// Ownership is not checked and the owner never changes.
pub async fn edit_post(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<String>,
    payload: Result<PostPayload, AppError>,
) -> AppResult<Json<PostResponse>> {
    // Identifier first: a bad id is reported before the body or storage is touched
    let id = EntityId::parse(&id)?;
    let PostPayload(form) = payload?;

    let mut post = state.posts.find_one(&PostFilter::by_id(id)).await?;
    post.apply(form);
    post.touch();

    state.posts.save(&post).await?;

    tracing::info!(post_id = %post.id, "post updated");
    Ok(Json(PostResponse {
        message: Some("post updated successfully"),
        post,
    }))
}

/// GET /api/v1/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<PostResponse>> {
    let id = EntityId::parse(&id)?;
    let post = state.posts.find_one(&PostFilter::by_id(id)).await?;

    Ok(Json(PostResponse {
        message: None,
        post,
    }))
}
