//! Daybook - Time-blocked journaling with AI reflections
//!
//! Daybook is a small journaling service. Users write short entries in
//! three sessions of the day (morning, lunch, evening), track goals, and ask
//! an external text-generation provider for reflections, trend summaries,
//! and tailored questions for their next session.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        HTTP API (axum)                        │
//! │   auth ── journal ── goals ── insights                        │
//! └─────┬──────────┬────────┬─────────┬──────────────────────────┘
//!       │          │        │         │
//!       │          │        │   ┌─────▼──────────────────┐
//!       │          │        │   │  InsightOrchestrator   │
//!       │          │        │   │  prompts, fallbacks    │
//!       │          │        │   └─────┬──────────────────┘
//!       │          │        │         │ InsightProvider
//! ┌─────▼──────────▼────────▼───┐ ┌───▼────────────────────┐
//! │   SQLite (storage)          │ │  Gemini generateContent │
//! └─────────────────────────────┘ └────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`]: Router assembly, CORS, probes
//! - [`auth`]: Registration, login, bearer-token extractor
//! - [`journal`]: Journal entries and answers
//! - [`goals`]: User goals
//! - [`insights`]: Insight orchestration and providers
//! - [`storage`]: Shared SQLite database
//! - [`config`]: Configuration management

pub mod api;
pub mod auth;
pub mod body;
pub mod config;
pub mod error;
pub mod goals;
pub mod insights;
pub mod journal;
pub mod storage;

pub use config::DaybookConfig;
pub use error::{Error, Result};
