//! User persistence

use crate::auth::types::User;
use crate::error::{Error, Result};
use crate::storage::{from_millis, to_millis, Database};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// A user row including the password hash
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub hashed_password: String,
}

/// User store over the shared database
pub struct UserStore {
    db: Database,
}

impl UserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a new user. Fails with `Conflict` if the username is taken.
    pub async fn create(&self, username: &str, hashed_password: &str) -> Result<User> {
        let conn = self.db.lock().await;
        if Self::find_by_username(&conn, username)?.is_some() {
            return Err(Error::Conflict("Username already registered".into()));
        }

        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO users (username, hashed_password, created_at) VALUES (?1, ?2, ?3)",
            params![username, hashed_password, to_millis(created_at)],
        )?;

        let user = User {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
            created_at: from_millis(to_millis(created_at)),
        };
        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Look up a user (with hash) by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<UserRecord>> {
        let conn = self.db.lock().await;
        Self::find_by_username(&conn, username)
    }

    /// Look up a user by id
    fn find_by_username(conn: &Connection, username: &str) -> Result<Option<UserRecord>> {
        let record = conn
            .query_row(
                "SELECT id, username, hashed_password, created_at FROM users WHERE username = ?1",
                [username],
                map_record,
            )
            .optional()?;
        Ok(record)
    }
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        user: User {
            id: row.get(0)?,
            username: row.get(1)?,
            created_at: from_millis(row.get(3)?),
        },
        hashed_password: row.get(2)?,
    })
}
