// src/grading/mod.rs
//
// The grading pipeline: a canonical answer key, a submission gathered from one
// of three sources (manual entry, recognized sheet text, or the AI vision
// service), a pure scorer, and the aggregate rollup for the results dashboard.

pub mod aggregate;
pub mod answer_key;
pub mod choice;
pub mod scorer;
pub mod sheet;
pub mod submission;
pub mod vision;

pub use aggregate::{AggregateStats, summarize};
pub use answer_key::{AnswerKey, AnswerKeyError};
pub use choice::Choice;
pub use scorer::{QuestionOutcome, ScoreCard, score};
pub use sheet::extract_answers;
pub use submission::Submission;
