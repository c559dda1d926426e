//! Prompt construction and response parsing

use crate::insights::types::EntrySnapshot;
use crate::insights::window::TimeRange;
use crate::journal::TimeBlock;

/// Prompt asking for a reflection on a single entry
pub fn entry_insight_prompt(entry: &EntrySnapshot) -> String {
    let mut prompt = String::from(
        "Analyze the following journal entry and provide insights and actionable suggestions.\n\n",
    );
    prompt.push_str(&format!(
        "Time Block: {}\nTimestamp: {}\n\nAnswers:\n",
        entry.time_block,
        entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    for answer in &entry.answers {
        prompt.push_str(&format!("- {}: {}\n", answer.question, answer.content));
    }
    prompt.push_str(
        "\nInsights:\n\
         Provide a brief analysis of this entry, identifying any notable patterns, \
         sentiments, or themes.\n\n\
         Actionable Suggestions:\n\
         Suggest 1-2 simple, actionable steps the user could take to improve their \
         well-being, productivity, or alignment with their goals.",
    );
    prompt
}

/// Prompt asking for new questions for `block`, built from same-block history
pub fn adaptive_questions_prompt(past: &[EntrySnapshot], block: TimeBlock) -> String {
    let mut prompt = format!(
        "Based on the following past journal entries for the '{block}' time block, \
         generate 2-4 new, relevant, and engaging questions for the user to answer. \
         The questions should encourage reflection and progress, and build upon themes \
         or challenges identified in previous entries. If no specific themes are apparent, \
         generate general but insightful questions for the '{block}' time block.\n\
         \nPast Entries:\n",
    );
    if past.is_empty() {
        prompt.push_str("No past entries available.\n");
    } else {
        for entry in past {
            prompt.push_str(&format!("- Entry from {}:\n", entry.timestamp.format("%Y-%m-%d")));
            for answer in &entry.answers {
                prompt.push_str(&format!("  - {}: {}\n", answer.question, answer.content));
            }
        }
    }
    prompt.push_str("\nNew Questions (list only the questions, one per line):\n");
    prompt
}

/// Prompt asking for a trend summary over `entries`
pub fn summary_prompt(entries: &[EntrySnapshot], range: TimeRange) -> String {
    let mut prompt = format!(
        "Analyze the following journal entries from the past {range} for a user focused on \
         habit building, discipline, recognizing successes, and motivation. Provide a concise \
         summary of trends, successes, challenges, and areas for improvement. Then offer 2-3 \
         actionable suggestions for building better habits, discipline, and motivation.\n\
         \nJournal Entries ({range}):\n",
    );
    for entry in entries {
        prompt.push_str(&format!(
            "\n--- Entry from {} ({}) ---\n",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.time_block
        ));
        for answer in &entry.answers {
            prompt.push_str(&format!("- {}: {}\n", answer.question, answer.content));
        }
    }
    prompt.push_str(
        "\nSummary of Trends, Successes, Challenges, and Areas for Improvement:\n\n\
         Actionable Suggestions for Habits, Discipline, and Motivation:\n",
    );
    prompt
}

/// One question per non-blank line, trimmed, in provider order
pub fn parse_questions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
