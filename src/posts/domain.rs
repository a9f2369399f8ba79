// Post domain types - pure data, no storage or HTTP concerns
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::id::EntityId;

/// A user-authored document with categorization and tagging metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: EntityId,
    /// Owning user. Set once at creation; edits never change it.
    pub user: EntityId,
    pub title: String,
    pub content: String,
    pub categories: Vec<EntityId>,
    pub tags: Vec<String>,
    pub thumbnail: Option<EntityId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable fields of a post as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PostForm {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<EntityId>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "empty_as_none")]
    pub thumbnail: Option<EntityId>,
}

impl Post {
    pub fn new(user: EntityId, form: PostForm) -> Self {
        let now = Utc::now();
        let mut post = Self {
            id: EntityId::new(),
            user,
            title: String::new(),
            content: String::new(),
            categories: Vec::new(),
            tags: Vec::new(),
            thumbnail: None,
            created_at: now,
            updated_at: now,
        };
        post.apply(form);
        post
    }

    /// Overwrite the editable fields. Identity, ownership and creation time stay.
    pub fn apply(&mut self, form: PostForm) {
        self.title = form.title;
        self.content = form.content;
        self.categories = form.categories;
        self.tags = form.tags;
        self.thumbnail = form.thumbnail;
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// An explicit null binds like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Missing, null and "" all mean "no thumbnail".
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<EntityId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => EntityId::parse(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> PostForm {
        PostForm {
            title: "Hello".into(),
            content: "World".into(),
            categories: vec![EntityId::new()],
            tags: vec!["rust".into(), "web".into()],
            thumbnail: Some(EntityId::new()),
        }
    }

    #[test]
    fn new_post_is_owned_by_caller() {
        let user = EntityId::new();
        let form = sample_form();
        let post = Post::new(user, form.clone());

        assert_eq!(post.user, user);
        assert_eq!(post.title, form.title);
        assert_eq!(post.categories, form.categories);
        assert_eq!(post.tags, form.tags);
        assert_eq!(post.thumbnail, form.thumbnail);
        assert_eq!(post.created_at, post.updated_at);
    }

    #[test]
    fn apply_keeps_identity_and_owner() {
        let user = EntityId::new();
        let mut post = Post::new(user, sample_form());
        let id = post.id;
        let created_at = post.created_at;

        post.apply(PostForm {
            title: "Edited".into(),
            ..PostForm::default()
        });

        assert_eq!(post.id, id);
        assert_eq!(post.user, user);
        assert_eq!(post.created_at, created_at);
        assert_eq!(post.title, "Edited");
        assert!(post.categories.is_empty());
        assert!(post.tags.is_empty());
        assert!(post.thumbnail.is_none());
    }

    #[test]
    fn form_fields_default_when_missing() {
        let form: PostForm = serde_json::from_str("{}").unwrap();
        assert_eq!(form, PostForm::default());
    }

    #[test]
    fn empty_or_null_thumbnail_is_none() {
        let form: PostForm = serde_json::from_str(r#"{"thumbnail": ""}"#).unwrap();
        assert!(form.thumbnail.is_none());

        let form: PostForm = serde_json::from_str(r#"{"thumbnail": null}"#).unwrap();
        assert!(form.thumbnail.is_none());
    }

    #[test]
    fn null_fields_bind_as_empty() {
        let form: PostForm = serde_json::from_str(
            r#"{"title": null, "content": null, "categories": null, "tags": null}"#,
        )
        .unwrap();
        assert_eq!(form, PostForm::default());

        let form: PostForm = serde_json::from_str(r#"{"title": "x", "tags": null}"#).unwrap();
        assert_eq!(form.title, "x");
        assert!(form.tags.is_empty());
    }

    #[test]
    fn malformed_thumbnail_is_rejected() {
        let result: Result<PostForm, _> = serde_json::from_str(r#"{"thumbnail": "xyz"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn categories_must_be_a_list() {
        let result: Result<PostForm, _> =
            serde_json::from_str(r#"{"categories": "5f1a2b3c4d5e6f7a8b9c0d1e"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn post_serializes_ids_as_hex() {
        let post = Post::new(EntityId::new(), sample_form());
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["id"], post.id.to_string());
        assert_eq!(json["user"], post.user.to_string());
        assert_eq!(json["tags"], serde_json::json!(["rust", "web"]));
    }
}
