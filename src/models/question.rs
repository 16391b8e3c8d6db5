// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::grading::Choice;

/// Represents the 'questions' table in the database.
///
/// Questions are the authored statements shown to students; the grading
/// pipeline itself only consults the answer key embedded in the test row, so
/// these are informational alongside it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub test_id: i64,

    /// 1-based position within the test; unique per test.
    pub number: i64,

    pub statement: String,

    /// Question kind: 'multiple-choice' or 'essay'.
    pub kind: String,

    pub option_a: Option<String>,
    pub option_b: Option<String>,
    pub option_c: Option<String>,
    pub option_d: Option<String>,

    /// The correct choice letter for multiple-choice questions.
    pub correct_choice: Option<String>,

    pub created_at: Option<chrono::NaiveDateTime>,
}

/// DTO for creating or updating a question.
#[derive(Debug, Deserialize, Validate)]
pub struct QuestionRequest {
    #[validate(range(min = 1, max = 200, message = "Question number must be between 1 and 200."))]
    pub number: u32,
    #[validate(length(min = 1, max = 2000, message = "Statement must be between 1 and 2000 characters."))]
    pub statement: String,
    #[validate(custom(function = validate_kind))]
    pub kind: String,
    #[validate(length(max = 500))]
    pub option_a: Option<String>,
    #[validate(length(max = 500))]
    pub option_b: Option<String>,
    #[validate(length(max = 500))]
    pub option_c: Option<String>,
    #[validate(length(max = 500))]
    pub option_d: Option<String>,
    #[validate(custom(function = validate_correct_choice))]
    pub correct_choice: Option<String>,
}

fn validate_kind(kind: &str) -> Result<(), validator::ValidationError> {
    match kind {
        "multiple-choice" | "essay" => Ok(()),
        _ => Err(validator::ValidationError::new("unknown_question_kind")),
    }
}

fn validate_correct_choice(letter: &str) -> Result<(), validator::ValidationError> {
    if Choice::parse(letter).is_none() {
        return Err(validator::ValidationError::new("invalid_choice_letter"));
    }
    Ok(())
}
