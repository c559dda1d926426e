//! Insight wire types

use crate::journal::{AnswerInput, JournalEntry, TimeBlock};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The parts of an entry a prompt needs. Also accepted from clients as
/// `pastEntries` when asking for questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySnapshot {
    pub time_block: TimeBlock,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub answers: Vec<AnswerInput>,
}

impl From<&JournalEntry> for EntrySnapshot {
    fn from(entry: &JournalEntry) -> Self {
        Self {
            time_block: entry.time_block,
            timestamp: entry.timestamp,
            answers: entry
                .answers
                .iter()
                .map(|a| AnswerInput {
                    question: a.question.clone(),
                    content: a.content.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EntryInsightResponse {
    pub insights: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub summary_insights: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsRequest {
    pub time_block: TimeBlock,
    #[serde(default)]
    pub past_entries: Option<Vec<EntrySnapshot>>,
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<String>,
}
