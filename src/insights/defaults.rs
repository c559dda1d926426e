//! Fallback reflection questions, used when the provider cannot help

use crate::journal::TimeBlock;

const MORNING: [&str; 3] = [
    "What is one small, actionable step you will take today to move closer to a key habit or goal?",
    "How will you ensure discipline in your most important task today?",
    "What positive intention are you setting for yourself this morning?",
];

const LUNCH: [&str; 3] = [
    "What is one success, no matter how small, you've achieved so far today?",
    "How have you demonstrated discipline or focus in your work/tasks this morning?",
    "What challenge have you faced, and how did you approach it?",
];

const EVENING: [&str; 4] = [
    "What specific actions did you take today that align with your long-term goals or habits?",
    "What was your biggest win or moment of discipline today, and why?",
    "What are you grateful for or proud of from today's efforts?",
    "What is one thing you will do differently tomorrow to improve your discipline or motivation?",
];

/// The fixed question list for `block`, in display order
pub fn default_questions(block: TimeBlock) -> Vec<String> {
    let questions: &[&str] = match block {
        TimeBlock::Morning => &MORNING,
        TimeBlock::Lunch => &LUNCH,
        TimeBlock::Evening => &EVENING,
    };
    questions.iter().map(|q| q.to_string()).collect()
}
