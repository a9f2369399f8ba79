use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use rusqlite::{params, OptionalExtension};

use crate::error::AppError;
use crate::id::EntityId;
use crate::state::AppState;

/// Represents the currently authenticated user.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: EntityId,
    pub username: String,
}

/// Extractor that requires authentication.
/// Accepts the session cookie or an `Authorization: Bearer` token; 401 otherwise.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let parts: &Parts = parts;
        let token = extract_bearer_token(parts)
            .or_else(|| extract_session_token(parts, &state.config.auth.cookie_name))
            .ok_or(AppError::Unauthorized)?;

        let conn = state
            .db
            .get()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT u.id, u.username FROM sessions s \
                 JOIN users u ON u.id = s.user_id \
                 WHERE s.token = ?1 AND s.expires_at > datetime('now')",
                params![token],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let (id, username) = row.ok_or(AppError::Unauthorized)?;
        let id = EntityId::parse(&id).map_err(|e| {
            tracing::error!("Stored user id {} is malformed: {}", id, e);
            AppError::Unauthorized
        })?;

        Ok(CurrentUser { id, username })
    }
}

fn extract_bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn extract_session_token<'a>(parts: &'a Parts, cookie_name: &str) -> Option<&'a str> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == cookie_name {
                Some(val)
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(name: header::HeaderName, value: &str) -> Parts {
        let (parts, _) = Request::builder()
            .header(name, value)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn finds_named_cookie_among_others() {
        let parts = parts_with(header::COOKIE, "theme=dark; quire_session=abc123; lang=en");
        assert_eq!(extract_session_token(&parts, "quire_session"), Some("abc123"));
        assert_eq!(extract_session_token(&parts, "missing"), None);
    }

    #[test]
    fn reads_bearer_token() {
        let parts = parts_with(header::AUTHORIZATION, "Bearer tok");
        assert_eq!(extract_bearer_token(&parts), Some("tok"));
    }

    #[test]
    fn ignores_other_authorization_schemes() {
        let parts = parts_with(header::AUTHORIZATION, "Basic dXNlcjpwYXNz");
        assert_eq!(extract_bearer_token(&parts), None);
    }
}
