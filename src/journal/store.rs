//! Journal entry persistence
//!
//! Entries are written together with their answers and goal ratings in one
//! transaction. Updates replace the full answer set and refresh the timestamp.

use crate::error::{Error, Result};
use crate::journal::types::*;
use crate::storage::{from_millis, to_millis, Database};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

/// Journal store over the shared database
pub struct JournalStore {
    db: Database,
}

impl JournalStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create an entry for `owner_id`, timestamped now
    pub async fn create(&self, owner_id: i64, req: &JournalEntryRequest) -> Result<JournalEntry> {
        let mut conn = self.db.lock().await;
        let tx = conn.transaction()?;

        check_goal_ownership(&tx, owner_id, &req.goal_progress)?;
        tx.execute(
            "INSERT INTO journal_entries (owner_id, time_block, timestamp) VALUES (?1, ?2, ?3)",
            params![owner_id, req.time_block, to_millis(Utc::now())],
        )?;
        let id = tx.last_insert_rowid();
        write_children(&tx, id, req)?;
        tx.commit()?;

        tracing::debug!(entry_id = id, owner_id, time_block = %req.time_block, "Journal entry created");
        load_entry(&conn, id)?.ok_or_else(|| Error::Internal(format!("Entry {} vanished", id)))
    }

    /// Get an entry by id, regardless of owner
    pub async fn get(&self, id: i64) -> Result<Option<JournalEntry>> {
        let conn = self.db.lock().await;
        load_entry(&conn, id)
    }

    /// Get an entry that must belong to `owner_id`
    pub async fn get_owned(&self, id: i64, owner_id: i64) -> Result<JournalEntry> {
        let entry = self
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound("Journal entry not found".into()))?;
        if entry.owner_id != owner_id {
            return Err(Error::Forbidden("Not authorized to access this entry".into()));
        }
        Ok(entry)
    }

    /// All entries of `owner_id`, oldest first, optionally for one time-block
    pub async fn list(&self, owner_id: i64, time_block: Option<TimeBlock>) -> Result<Vec<JournalEntry>> {
        let conn = self.db.lock().await;
        let ids = match time_block {
            Some(block) => query_ids(
                &conn,
                "SELECT id FROM journal_entries WHERE owner_id = ?1 AND time_block = ?2 \
                 ORDER BY timestamp, id",
                params![owner_id, block],
            )?,
            None => query_ids(
                &conn,
                "SELECT id FROM journal_entries WHERE owner_id = ?1 ORDER BY timestamp, id",
                params![owner_id],
            )?,
        };
        load_entries(&conn, &ids)
    }

    /// Entries of `owner_id` with `start <= timestamp <= end`, oldest first
    pub async fn list_in_range(
        &self,
        owner_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<JournalEntry>> {
        let conn = self.db.lock().await;
        let ids = query_ids(
            &conn,
            "SELECT id FROM journal_entries \
             WHERE owner_id = ?1 AND timestamp >= ?2 AND timestamp <= ?3 \
             ORDER BY timestamp, id",
            params![owner_id, to_millis(start), to_millis(end)],
        )?;
        load_entries(&conn, &ids)
    }

    /// The `limit` most recent entries for one time-block, returned oldest first
    pub async fn recent_for_block(
        &self,
        owner_id: i64,
        time_block: TimeBlock,
        limit: usize,
    ) -> Result<Vec<JournalEntry>> {
        let conn = self.db.lock().await;
        let mut ids = query_ids(
            &conn,
            "SELECT id FROM journal_entries WHERE owner_id = ?1 AND time_block = ?2 \
             ORDER BY timestamp DESC, id DESC LIMIT ?3",
            params![owner_id, time_block, limit as i64],
        )?;
        ids.reverse();
        load_entries(&conn, &ids)
    }

    /// Replace an entry's time-block, answers and ratings; refreshes the timestamp
    pub async fn update(&self, id: i64, req: &JournalEntryRequest) -> Result<JournalEntry> {
        let mut conn = self.db.lock().await;
        let tx = conn.transaction()?;

        let owner_id: i64 = tx
            .query_row(
                "SELECT owner_id FROM journal_entries WHERE id = ?1",
                [id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| Error::NotFound("Journal entry not found".into()))?;

        check_goal_ownership(&tx, owner_id, &req.goal_progress)?;
        tx.execute(
            "UPDATE journal_entries SET time_block = ?1, timestamp = ?2 WHERE id = ?3",
            params![req.time_block, to_millis(Utc::now()), id],
        )?;
        tx.execute("DELETE FROM answers WHERE entry_id = ?1", [id])?;
        tx.execute("DELETE FROM goal_progress WHERE entry_id = ?1", [id])?;
        write_children(&tx, id, req)?;
        tx.commit()?;

        tracing::debug!(entry_id = id, "Journal entry replaced");
        load_entry(&conn, id)?.ok_or_else(|| Error::Internal(format!("Entry {} vanished", id)))
    }

    /// Delete an entry; answers and ratings cascade. Returns false if missing.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.db.lock().await;
        let removed = conn.execute("DELETE FROM journal_entries WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }
}

fn check_goal_ownership(conn: &Connection, owner_id: i64, ratings: &[GoalRating]) -> Result<()> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM goals WHERE id = ?1 AND owner_id = ?2")?;
    for rating in ratings {
        if !stmt.exists(params![rating.goal_id, owner_id])? {
            return Err(Error::Validation(format!(
                "Goal {} not found",
                rating.goal_id
            )));
        }
    }
    Ok(())
}

fn write_children(conn: &Connection, entry_id: i64, req: &JournalEntryRequest) -> Result<()> {
    let mut answer_stmt = conn.prepare_cached(
        "INSERT INTO answers (entry_id, position, question, content) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (position, answer) in req.answers.iter().enumerate() {
        answer_stmt.execute(params![
            entry_id,
            position as i64,
            answer.question,
            answer.content
        ])?;
    }

    let mut progress_stmt = conn.prepare_cached(
        "INSERT INTO goal_progress (entry_id, goal_id, rating) VALUES (?1, ?2, ?3)",
    )?;
    for rating in &req.goal_progress {
        progress_stmt.execute(params![entry_id, rating.goal_id, rating.rating])?;
    }
    Ok(())
}

fn query_ids(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(sql)?;
    let ids = stmt
        .query_map(params, |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(ids)
}

fn load_entries(conn: &Connection, ids: &[i64]) -> Result<Vec<JournalEntry>> {
    let mut entries = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(entry) = load_entry(conn, *id)? {
            entries.push(entry);
        }
    }
    Ok(entries)
}

fn load_entry(conn: &Connection, id: i64) -> Result<Option<JournalEntry>> {
    let head = conn
        .query_row(
            "SELECT owner_id, time_block, timestamp FROM journal_entries WHERE id = ?1",
            [id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, TimeBlock>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            },
        )
        .optional()?;

    let Some((owner_id, time_block, timestamp)) = head else {
        return Ok(None);
    };

    let mut stmt = conn.prepare_cached(
        "SELECT id, question, content FROM answers WHERE entry_id = ?1 ORDER BY position, id",
    )?;
    let answers = stmt
        .query_map([id], |row| {
            Ok(Answer {
                id: row.get(0)?,
                question: row.get(1)?,
                content: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut stmt = conn.prepare_cached(
        "SELECT goal_id, rating FROM goal_progress WHERE entry_id = ?1 ORDER BY goal_id",
    )?;
    let goal_progress = stmt
        .query_map([id], |row| {
            Ok(GoalRating {
                goal_id: row.get(0)?,
                rating: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(Some(JournalEntry {
        id,
        owner_id,
        time_block,
        timestamp: from_millis(timestamp),
        answers,
        goal_progress,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn make_store() -> (JournalStore, Database, i64, i64) {
        let db = Database::in_memory().unwrap();
        let (ana, ben) = {
            let conn = db.lock().await;
            conn.execute(
                "INSERT INTO users (username, hashed_password, created_at) VALUES ('ana', 'h', 0)",
                [],
            )
            .unwrap();
            let ana = conn.last_insert_rowid();
            conn.execute(
                "INSERT INTO users (username, hashed_password, created_at) VALUES ('ben', 'h', 0)",
                [],
            )
            .unwrap();
            (ana, conn.last_insert_rowid())
        };
        (JournalStore::new(db.clone()), db, ana, ben)
    }

    async fn insert_goal(db: &Database, owner_id: i64) -> i64 {
        let conn = db.lock().await;
        conn.execute(
            "INSERT INTO goals (owner_id, title, category, frequency, active, created_at, updated_at) \
             VALUES (?1, 'Run', 'health', 'daily', 1, 0, 0)",
            [owner_id],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    fn entry(block: TimeBlock, answers: &[(&str, &str)]) -> JournalEntryRequest {
        JournalEntryRequest {
            time_block: block,
            answers: answers
                .iter()
                .map(|(q, c)| AnswerInput {
                    question: q.to_string(),
                    content: c.to_string(),
                })
                .collect(),
            goal_progress: vec![],
        }
    }

    async fn backdate(db: &Database, id: i64, ts: DateTime<Utc>) {
        let conn = db.lock().await;
        conn.execute(
            "UPDATE journal_entries SET timestamp = ?1 WHERE id = ?2",
            params![to_millis(ts), id],
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_create_keeps_answer_order() {
        let (store, _db, ana, _) = make_store().await;
        let created = store
            .create(
                ana,
                &entry(
                    TimeBlock::Morning,
                    &[("Intention?", "Focus"), ("First step?", "Write"), ("Energy?", "High")],
                ),
            )
            .await
            .unwrap();

        assert_eq!(created.owner_id, ana);
        assert_eq!(created.time_block, TimeBlock::Morning);
        let questions: Vec<_> = created.answers.iter().map(|a| a.question.as_str()).collect();
        assert_eq!(questions, vec!["Intention?", "First step?", "Energy?"]);

        let fetched = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_list_is_per_owner_and_filterable() {
        let (store, _db, ana, ben) = make_store().await;
        store.create(ana, &entry(TimeBlock::Morning, &[("q", "a")])).await.unwrap();
        store.create(ana, &entry(TimeBlock::Evening, &[("q", "b")])).await.unwrap();
        store.create(ben, &entry(TimeBlock::Morning, &[("q", "c")])).await.unwrap();

        assert_eq!(store.list(ana, None).await.unwrap().len(), 2);
        assert_eq!(store.list(ben, None).await.unwrap().len(), 1);

        let evenings = store.list(ana, Some(TimeBlock::Evening)).await.unwrap();
        assert_eq!(evenings.len(), 1);
        assert_eq!(evenings[0].answers[0].content, "b");
    }

    #[tokio::test]
    async fn test_update_replaces_answers() {
        let (store, _db, ana, _) = make_store().await;
        let created = store
            .create(ana, &entry(TimeBlock::Morning, &[("q1", "a1"), ("q2", "a2")]))
            .await
            .unwrap();

        let updated = store
            .update(created.id, &entry(TimeBlock::Lunch, &[("q3", "a3")]))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.time_block, TimeBlock::Lunch);
        assert_eq!(updated.answers.len(), 1);
        assert_eq!(updated.answers[0].question, "q3");
        assert!(updated.timestamp >= created.timestamp);
    }

    #[tokio::test]
    async fn test_update_missing_entry() {
        let (store, _db, _, _) = make_store().await;
        let result = store.update(404, &entry(TimeBlock::Morning, &[])).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let (store, db, ana, _) = make_store().await;
        let created = store
            .create(ana, &entry(TimeBlock::Evening, &[("q", "a")]))
            .await
            .unwrap();

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert!(store.get(created.id).await.unwrap().is_none());

        let conn = db.lock().await;
        let orphans: i64 = conn
            .query_row("SELECT COUNT(*) FROM answers", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[tokio::test]
    async fn test_list_in_range() {
        let (store, db, ana, _) = make_store().await;
        let now = Utc::now();
        let old = store.create(ana, &entry(TimeBlock::Morning, &[("q", "old")])).await.unwrap();
        let recent = store.create(ana, &entry(TimeBlock::Morning, &[("q", "recent")])).await.unwrap();
        backdate(&db, old.id, now - Duration::days(10)).await;
        backdate(&db, recent.id, now - Duration::days(2)).await;

        let week = store
            .list_in_range(ana, now - Duration::days(7), now)
            .await
            .unwrap();
        assert_eq!(week.len(), 1);
        assert_eq!(week[0].id, recent.id);

        let month = store
            .list_in_range(ana, now - Duration::days(30), now)
            .await
            .unwrap();
        assert_eq!(month.iter().map(|e| e.id).collect::<Vec<_>>(), vec![old.id, recent.id]);
    }

    #[tokio::test]
    async fn test_recent_for_block_limits_and_orders() {
        let (store, db, ana, _) = make_store().await;
        let now = Utc::now();
        let mut ids = Vec::new();
        for day in (1..=4).rev() {
            let content = format!("day -{}", day);
            let e = store
                .create(ana, &entry(TimeBlock::Evening, &[("q", content.as_str())]))
                .await
                .unwrap();
            backdate(&db, e.id, now - Duration::days(day)).await;
            ids.push(e.id);
        }
        store.create(ana, &entry(TimeBlock::Morning, &[("q", "other")])).await.unwrap();

        let recent = store.recent_for_block(ana, TimeBlock::Evening, 2).await.unwrap();
        assert_eq!(recent.iter().map(|e| e.id).collect::<Vec<_>>(), ids[2..].to_vec());
    }

    #[tokio::test]
    async fn test_goal_progress_round_trip() {
        let (store, db, ana, _) = make_store().await;
        let goal = insert_goal(&db, ana).await;
        let mut req = entry(TimeBlock::Evening, &[("q", "a")]);
        req.goal_progress = vec![GoalRating { goal_id: goal, rating: 4 }];

        let created = store.create(ana, &req).await.unwrap();
        assert_eq!(created.goal_progress, vec![GoalRating { goal_id: goal, rating: 4 }]);

        let replaced = store
            .update(created.id, &entry(TimeBlock::Evening, &[("q", "a")]))
            .await
            .unwrap();
        assert!(replaced.goal_progress.is_empty());
    }

    #[tokio::test]
    async fn test_goal_progress_rejects_foreign_goal() {
        let (store, db, ana, ben) = make_store().await;
        let bens_goal = insert_goal(&db, ben).await;
        let mut req = entry(TimeBlock::Evening, &[("q", "a")]);
        req.goal_progress = vec![GoalRating { goal_id: bens_goal, rating: 3 }];

        let result = store.create(ana, &req).await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(store.list(ana, None).await.unwrap().is_empty());
    }
}
