//! Journal wire types
//!
//! All types use camelCase JSON. `TimeBlock` serializes as its label
//! (`"Morning"`, `"Lunch"`, `"Evening"`).

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

pub const MAX_QUESTION_LEN: usize = 255;
pub const MAX_CONTENT_LEN: usize = 2048;

/// Journaling session within a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeBlock {
    #[serde(alias = "morning")]
    Morning,
    /// The midday block
    #[serde(alias = "lunch", alias = "Midday", alias = "midday")]
    Lunch,
    #[serde(alias = "evening")]
    Evening,
}

impl TimeBlock {
    pub const ALL: [TimeBlock; 3] = [TimeBlock::Morning, TimeBlock::Lunch, TimeBlock::Evening];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Lunch => "Lunch",
            Self::Evening => "Evening",
        }
    }
}

impl std::fmt::Display for TimeBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimeBlock {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(Self::Morning),
            "lunch" | "midday" => Ok(Self::Lunch),
            "evening" => Ok(Self::Evening),
            other => Err(Error::Validation(format!(
                "Unknown time block '{}'. Must be Morning, Lunch, or Evening.",
                other
            ))),
        }
    }
}

impl ToSql for TimeBlock {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TimeBlock {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: Error| FromSqlError::Other(Box::new(e)))
    }
}

/// A stored answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: i64,
    pub question: String,
    pub content: String,
}

/// An answer as submitted by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerInput {
    pub question: String,
    pub content: String,
}

/// A 1..=5 rating of one of the owner's goals, attached to an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRating {
    pub goal_id: i64,
    pub rating: u8,
}

/// A journal entry with its answers in submission order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: i64,
    pub owner_id: i64,
    pub time_block: TimeBlock,
    pub timestamp: DateTime<Utc>,
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub goal_progress: Vec<GoalRating>,
}

/// Request body for creating or replacing an entry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryRequest {
    pub time_block: TimeBlock,
    pub answers: Vec<AnswerInput>,
    #[serde(default)]
    pub goal_progress: Vec<GoalRating>,
}

impl JournalEntryRequest {
    pub fn validate(&self) -> Result<()> {
        for answer in &self.answers {
            if answer.question.trim().is_empty() {
                return Err(Error::Validation("Answer question must not be empty".into()));
            }
            if answer.question.chars().count() > MAX_QUESTION_LEN {
                return Err(Error::Validation(format!(
                    "Question must be at most {} characters",
                    MAX_QUESTION_LEN
                )));
            }
            if answer.content.chars().count() > MAX_CONTENT_LEN {
                return Err(Error::Validation(format!(
                    "Answer content must be at most {} characters",
                    MAX_CONTENT_LEN
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for progress in &self.goal_progress {
            if !(1..=5).contains(&progress.rating) {
                return Err(Error::Validation(format!(
                    "Rating for goal {} must be between 1 and 5",
                    progress.goal_id
                )));
            }
            if !seen.insert(progress.goal_id) {
                return Err(Error::Validation(format!(
                    "Goal {} rated more than once",
                    progress.goal_id
                )));
            }
        }
        Ok(())
    }
}
