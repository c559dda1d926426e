//! Insight orchestration
//!
//! Builds prompts, calls the injected provider, and interprets the result.
//! Entry insights and summaries surface provider failures to the caller;
//! question generation recovers with the fixed per-block defaults.

use crate::error::Result;
use crate::insights::defaults::default_questions;
use crate::insights::prompt::{
    adaptive_questions_prompt, entry_insight_prompt, parse_questions, summary_prompt,
};
use crate::insights::provider::InsightProvider;
use crate::insights::types::EntrySnapshot;
use crate::insights::window::TimeRange;
use crate::journal::{JournalStore, TimeBlock};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Stateless front to an `InsightProvider`
#[derive(Clone)]
pub struct InsightOrchestrator {
    provider: Arc<dyn InsightProvider>,
}

impl InsightOrchestrator {
    pub fn new(provider: Arc<dyn InsightProvider>) -> Self {
        Self { provider }
    }

    /// Reflection on a single entry; the provider text is returned as-is
    pub async fn entry_insight(&self, entry: &EntrySnapshot) -> Result<String> {
        let prompt = entry_insight_prompt(entry);
        self.provider.generate(&prompt).await.map_err(|e| {
            tracing::warn!(provider = self.provider.name(), error = %e, "Entry insight failed");
            e
        })
    }

    /// New questions for `block`. Never fails: provider errors and empty
    /// answers fall back to the default list.
    pub async fn adaptive_questions(&self, past: &[EntrySnapshot], block: TimeBlock) -> Vec<String> {
        let relevant: Vec<EntrySnapshot> = past
            .iter()
            .filter(|entry| entry.time_block == block)
            .cloned()
            .collect();
        let prompt = adaptive_questions_prompt(&relevant, block);

        match self.provider.generate(&prompt).await {
            Ok(text) => {
                let questions = parse_questions(&text);
                if questions.is_empty() {
                    tracing::warn!(
                        provider = self.provider.name(),
                        time_block = %block,
                        "Provider returned no questions, using defaults"
                    );
                    default_questions(block)
                } else {
                    questions
                }
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    time_block = %block,
                    error = %e,
                    "Question generation failed, using defaults"
                );
                default_questions(block)
            }
        }
    }

    /// Trend summary over `entries`; the caller handles the empty case
    pub async fn summary_insight(&self, entries: &[EntrySnapshot], range: TimeRange) -> Result<String> {
        let prompt = summary_prompt(entries, range);
        self.provider.generate(&prompt).await.map_err(|e| {
            tracing::warn!(provider = self.provider.name(), range = %range, error = %e, "Summary failed");
            e
        })
    }

    /// Summarize the user's entries in the `time_range` window ending at `now`.
    ///
    /// The range keyword is validated before storage or the provider is
    /// touched. An empty window yields a fixed message without a provider call.
    pub async fn summarize(
        &self,
        journal: &JournalStore,
        user_id: i64,
        time_range: &str,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let range: TimeRange = time_range.parse()?;
        let (start, end) = range.window(now);

        let entries = journal.list_in_range(user_id, start, end).await?;
        if entries.is_empty() {
            return Ok(format!("No journal entries found for the {} period.", range));
        }

        tracing::debug!(user_id, range = %range, entries = entries.len(), "Summarizing entries");
        let snapshots: Vec<EntrySnapshot> = entries.iter().map(EntrySnapshot::from).collect();
        self.summary_insight(&snapshots, range).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::Error;
    use crate::journal::{AnswerInput, JournalEntryRequest};
    use crate::storage::Database;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns a fixed text and counts calls
    pub(crate) struct FixedProvider {
        pub text: String,
        pub calls: AtomicUsize,
    }

    impl FixedProvider {
        pub(crate) fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl InsightProvider for FixedProvider {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    /// Fails every call the way a timed-out request would, counting calls
    pub(crate) struct FailingProvider {
        pub calls: AtomicUsize,
    }

    impl FailingProvider {
        pub(crate) fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl InsightProvider for FailingProvider {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::ProviderUnavailable("request timed out".into()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    /// Echoes the prompt, so tests can see what was sent
    struct EchoProvider;

    #[async_trait]
    impl InsightProvider for EchoProvider {
        async fn generate(&self, prompt: &str) -> Result<String> {
            Ok(prompt.to_string())
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    fn snapshot(block: TimeBlock, content: &str) -> EntrySnapshot {
        EntrySnapshot {
            time_block: block,
            timestamp: Utc::now(),
            answers: vec![AnswerInput {
                question: "How did it go?".into(),
                content: content.into(),
            }],
        }
    }

    async fn journal_with_user() -> (JournalStore, i64) {
        let db = Database::in_memory().unwrap();
        {
            let conn = db.lock().await;
            conn.execute(
                "INSERT INTO users (username, hashed_password, created_at) VALUES ('ana', 'x', 0)",
                [],
            )
            .unwrap();
        }
        (JournalStore::new(db), 1)
    }

    #[tokio::test]
    async fn test_defaults_for_every_block_on_failure() {
        let orchestrator = InsightOrchestrator::new(Arc::new(FailingProvider::new()));
        for block in TimeBlock::ALL {
            let questions = orchestrator.adaptive_questions(&[], block).await;
            assert_eq!(questions, default_questions(block));
        }
    }

    #[tokio::test]
    async fn test_defaults_when_provider_returns_blank() {
        let orchestrator = InsightOrchestrator::new(Arc::new(FixedProvider::new("\n  \n")));
        let questions = orchestrator.adaptive_questions(&[], TimeBlock::Lunch).await;
        assert_eq!(questions, default_questions(TimeBlock::Lunch));
    }

    #[tokio::test]
    async fn test_provider_questions_kept_in_order() {
        let text = "What went well?\n  What will you change?  \n\nWho helped you?";
        let orchestrator = InsightOrchestrator::new(Arc::new(FixedProvider::new(text)));
        let questions = orchestrator.adaptive_questions(&[], TimeBlock::Evening).await;
        assert_eq!(
            questions,
            vec!["What went well?", "What will you change?", "Who helped you?"]
        );
    }

    #[tokio::test]
    async fn test_questions_only_use_matching_block() {
        let orchestrator = InsightOrchestrator::new(Arc::new(EchoProvider));
        let past = vec![
            snapshot(TimeBlock::Morning, "morning-only-detail"),
            snapshot(TimeBlock::Evening, "evening-detail"),
        ];
        let lines = orchestrator.adaptive_questions(&past, TimeBlock::Evening).await;
        let prompt = lines.join("\n");
        assert!(prompt.contains("evening-detail"));
        assert!(!prompt.contains("morning-only-detail"));
    }

    #[tokio::test]
    async fn test_entry_insight_returns_text_unmodified() {
        let text = "  You are consistent.\n\nTry a walk.  ";
        let orchestrator = InsightOrchestrator::new(Arc::new(FixedProvider::new(text)));
        let insight = orchestrator
            .entry_insight(&snapshot(TimeBlock::Morning, "x"))
            .await
            .unwrap();
        assert_eq!(insight, text);
    }

    #[tokio::test]
    async fn test_entry_insight_surfaces_timeout() {
        let orchestrator = InsightOrchestrator::new(Arc::new(FailingProvider::new()));
        let err = orchestrator
            .entry_insight(&snapshot(TimeBlock::Morning, "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_summarize_rejects_invalid_range_before_provider() {
        let provider = Arc::new(FixedProvider::new("summary"));
        let orchestrator = InsightOrchestrator::new(provider.clone());
        let (journal, user) = journal_with_user().await;

        let err = orchestrator
            .summarize(&journal, user, "yearly", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_summarize_empty_window_skips_provider() {
        let provider = Arc::new(FixedProvider::new("summary"));
        let orchestrator = InsightOrchestrator::new(provider.clone());
        let (journal, user) = journal_with_user().await;

        let text = orchestrator
            .summarize(&journal, user, "monthly", Utc::now())
            .await
            .unwrap();
        assert_eq!(text, "No journal entries found for the monthly period.");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_summarize_with_entries() {
        let (journal, user) = journal_with_user().await;
        let request = JournalEntryRequest {
            time_block: TimeBlock::Evening,
            answers: vec![AnswerInput {
                question: "Biggest win?".into(),
                content: "Ran 5k".into(),
            }],
            goal_progress: vec![],
        };
        journal.create(user, &request).await.unwrap();

        let echo = InsightOrchestrator::new(Arc::new(EchoProvider));
        let prompt = echo
            .summarize(&journal, user, "daily", Utc::now())
            .await
            .unwrap();
        assert!(prompt.contains("(Evening) ---"));
        assert!(prompt.contains("- Biggest win?: Ran 5k"));

        let failing = InsightOrchestrator::new(Arc::new(FailingProvider::new()));
        let err = failing
            .summarize(&journal, user, "weekly", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_idempotent_with_deterministic_provider() {
        let orchestrator = InsightOrchestrator::new(Arc::new(FixedProvider::new("A?\nB?")));
        let past = vec![snapshot(TimeBlock::Morning, "x")];
        let first = orchestrator.adaptive_questions(&past, TimeBlock::Morning).await;
        let second = orchestrator.adaptive_questions(&past, TimeBlock::Morning).await;
        assert_eq!(first, second);

        let entry = snapshot(TimeBlock::Morning, "x");
        assert_eq!(
            orchestrator.entry_insight(&entry).await.unwrap(),
            orchestrator.entry_insight(&entry).await.unwrap()
        );
    }
}
