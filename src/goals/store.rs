//! Goal persistence
//!
//! Every query is scoped to the owner, so a goal belonging to someone else
//! is indistinguishable from a missing one.

use crate::error::{Error, Result};
use crate::goals::types::*;
use crate::storage::{from_millis, to_millis, Database};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

const GOAL_COLUMNS: &str =
    "id, owner_id, title, description, category, frequency, active, created_at, updated_at";

/// Goal store over the shared database
pub struct GoalStore {
    db: Database,
}

impl GoalStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create(&self, owner_id: i64, req: &CreateGoalRequest) -> Result<Goal> {
        let conn = self.db.lock().await;
        let now = to_millis(Utc::now());
        conn.execute(
            "INSERT INTO goals (owner_id, title, description, category, frequency, active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)",
            params![
                owner_id,
                req.title.trim(),
                req.description,
                req.category,
                req.target_frequency,
                now
            ],
        )?;
        let id = conn.last_insert_rowid();
        tracing::debug!(goal_id = id, owner_id, "Goal created");
        load_goal(&conn, owner_id, id)?.ok_or_else(|| Error::Internal(format!("Goal {} vanished", id)))
    }

    /// All goals of `owner_id`, oldest first
    pub async fn list(&self, owner_id: i64) -> Result<Vec<Goal>> {
        let conn = self.db.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM goals WHERE owner_id = ?1 ORDER BY created_at, id",
            GOAL_COLUMNS
        ))?;
        let goals = stmt
            .query_map([owner_id], row_to_goal)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(goals)
    }

    pub async fn get(&self, owner_id: i64, id: i64) -> Result<Goal> {
        let conn = self.db.lock().await;
        load_goal(&conn, owner_id, id)?.ok_or_else(not_found)
    }

    /// Apply the present fields of `req`; refreshes `updated_at`
    pub async fn update(&self, owner_id: i64, id: i64, req: &UpdateGoalRequest) -> Result<Goal> {
        let conn = self.db.lock().await;
        let mut goal = load_goal(&conn, owner_id, id)?.ok_or_else(not_found)?;

        if let Some(title) = &req.title {
            goal.title = title.trim().to_string();
        }
        if let Some(description) = &req.description {
            goal.description = Some(description.clone());
        }
        if let Some(category) = req.category {
            goal.category = category;
        }
        if let Some(frequency) = req.target_frequency {
            goal.target_frequency = frequency;
        }
        if let Some(active) = req.active {
            goal.active = active;
        }
        goal.updated_at = Utc::now();

        conn.execute(
            "UPDATE goals SET title = ?1, description = ?2, category = ?3, frequency = ?4, \
             active = ?5, updated_at = ?6 WHERE id = ?7 AND owner_id = ?8",
            params![
                goal.title,
                goal.description,
                goal.category,
                goal.target_frequency,
                goal.active,
                to_millis(goal.updated_at),
                id,
                owner_id
            ],
        )?;
        load_goal(&conn, owner_id, id)?.ok_or_else(not_found)
    }

    /// Delete a goal; its ratings on entries cascade
    pub async fn delete(&self, owner_id: i64, id: i64) -> Result<()> {
        let conn = self.db.lock().await;
        let removed = conn.execute(
            "DELETE FROM goals WHERE id = ?1 AND owner_id = ?2",
            params![id, owner_id],
        )?;
        if removed == 0 {
            return Err(not_found());
        }
        tracing::debug!(goal_id = id, owner_id, "Goal deleted");
        Ok(())
    }
}

fn not_found() -> Error {
    Error::NotFound("Goal not found".into())
}

fn load_goal(conn: &Connection, owner_id: i64, id: i64) -> Result<Option<Goal>> {
    let goal = conn
        .query_row(
            &format!(
                "SELECT {} FROM goals WHERE id = ?1 AND owner_id = ?2",
                GOAL_COLUMNS
            ),
            params![id, owner_id],
            row_to_goal,
        )
        .optional()?;
    Ok(goal)
}

fn row_to_goal(row: &Row<'_>) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        target_frequency: row.get(5)?,
        active: row.get(6)?,
        created_at: from_millis(row.get(7)?),
        updated_at: from_millis(row.get(8)?),
    })
}
