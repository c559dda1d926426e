//! Journal module — time-blocked reflection entries
//!
//! Provides REST endpoints for creating, listing, replacing, and deleting
//! journal entries. Each entry belongs to one user and one time-block of
//! the day, and carries an ordered list of question/answer pairs plus
//! optional 1..=5 ratings of the owner's goals.

pub mod handler;
pub mod store;
pub mod types;

pub use handler::{journal_router, JournalState};
pub use store::JournalStore;
pub use types::{Answer, AnswerInput, JournalEntry, JournalEntryRequest, TimeBlock};
