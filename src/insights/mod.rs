//! Insights module — AI reflections, summaries, and adaptive questions
//!
//! The orchestrator turns journal entries into prompts for an injected
//! `InsightProvider` and interprets what comes back. Only question
//! generation has a local fallback; insight and summary failures reach the
//! client as 503.

pub mod defaults;
pub mod handler;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod types;
pub mod window;

pub use handler::{insights_router, InsightsState};
pub use orchestrator::InsightOrchestrator;
pub use provider::{GeminiProvider, InsightProvider, UnconfiguredProvider};
pub use window::TimeRange;
