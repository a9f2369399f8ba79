use axum::extract::{FromRequest, Request};
use axum::http::header;
use axum::Json;
use axum_extra::extract::Form;

use crate::error::AppError;
use crate::posts::domain::PostForm;

const JSON: &str = "application/json";
const URLENCODED: &str = "application/x-www-form-urlencoded";

/// Post form decoded from either a JSON or a urlencoded body.
///
/// Urlencoded lists use repeated keys: `tags=a&tags=b`.
/// Only the payload shape is checked here, never field contents.
#[derive(Debug)]
pub struct PostPayload(pub PostForm);

impl<S> FromRequest<S> for PostPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mime = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match mime.as_str() {
            m if is_json(m) => {
                let Json(form) = Json::<PostForm>::from_request(req, state)
                    .await
                    .map_err(|rejection| AppError::Binding(rejection.body_text()))?;
                Ok(Self(form))
            }
            URLENCODED => {
                let Form(form) = Form::<PostForm>::from_request(req, state)
                    .await
                    .map_err(|rejection| AppError::Binding(rejection.to_string()))?;
                Ok(Self(form))
            }
            "" => Err(AppError::Binding("missing content type".into())),
            other => Err(AppError::Binding(format!(
                "unsupported content type: {}",
                other
            ))),
        }
    }
}

// `application/json` and structured-syntax suffixes such as `application/ld+json`
fn is_json(mime: &str) -> bool {
    mime == JSON || (mime.starts_with("application/") && mime.ends_with("+json"))
}
