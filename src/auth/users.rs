use rusqlite::{params, OptionalExtension};

use crate::id::EntityId;
use crate::state::DbPool;

#[derive(Debug, Clone)]
pub struct User {
    pub id: EntityId,
    pub username: String,
}

/// Insert a user with a freshly generated id.
pub fn create_user(pool: &DbPool, username: &str) -> anyhow::Result<User> {
    let conn = pool.get()?;
    let id = EntityId::new();

    conn.execute(
        "INSERT INTO users (id, username) VALUES (?1, ?2)",
        params![id.to_hex(), username],
    )?;

    Ok(User {
        id,
        username: username.to_string(),
    })
}

pub fn find_by_username(pool: &DbPool, username: &str) -> anyhow::Result<Option<User>> {
    let conn = pool.get()?;

    let id: Option<String> = conn
        .query_row(
            "SELECT id FROM users WHERE username = ?1",
            params![username],
            |row| row.get(0),
        )
        .optional()?;

    match id {
        Some(id) => Ok(Some(User {
            id: EntityId::parse(&id)?,
            username: username.to_string(),
        })),
        None => Ok(None),
    }
}
