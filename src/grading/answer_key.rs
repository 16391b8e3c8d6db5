// src/grading/answer_key.rs

use std::fmt;

use super::choice::Choice;

/// Why an answer key could not be constructed.
///
/// `Empty` is a contract violation on the caller's side (a test cannot have
/// zero questions); the other two mean the stored key does not match the test
/// it belongs to and grading must refuse to proceed.
#[derive(Debug, PartialEq, Eq)]
pub enum AnswerKeyError {
    Empty,
    BadLength { expected: u32, found: u32 },
    BadChoice(String),
    BadFormat(String),
}

impl fmt::Display for AnswerKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerKeyError::Empty => write!(f, "answer key must cover at least one question"),
            AnswerKeyError::BadLength { expected, found } => write!(
                f,
                "answer key has {} entries but the test has {} questions",
                found, expected
            ),
            AnswerKeyError::BadChoice(letter) => {
                write!(f, "'{}' is not a valid choice letter", letter)
            }
            AnswerKeyError::BadFormat(msg) => write!(f, "answer key is not valid JSON: {}", msg),
        }
    }
}

impl std::error::Error for AnswerKeyError {}

/// Canonical correct-choice mapping for one test: a fixed-size array with the
/// choice for question q at index q-1. Question count is fixed at construction
/// and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerKey {
    choices: Vec<Choice>,
}

impl AnswerKey {
    pub fn new(choices: Vec<Choice>) -> Result<Self, AnswerKeyError> {
        if choices.is_empty() {
            return Err(AnswerKeyError::Empty);
        }
        Ok(Self { choices })
    }

    /// Rebuilds a key from the JSON array stored on the test row, validating
    /// it against the test's question count. Any mismatch is a data-integrity
    /// failure: the row was written wrong or tampered with.
    pub fn from_stored(raw: &str, question_count: u32) -> Result<Self, AnswerKeyError> {
        let letters: Vec<String> = serde_json::from_str(raw)
            .map_err(|e| AnswerKeyError::BadFormat(e.to_string()))?;

        let mut choices = Vec::with_capacity(letters.len());
        for letter in &letters {
            let choice =
                Choice::parse(letter).ok_or_else(|| AnswerKeyError::BadChoice(letter.clone()))?;
            choices.push(choice);
        }

        if choices.len() as u32 != question_count {
            return Err(AnswerKeyError::BadLength {
                expected: question_count,
                found: choices.len() as u32,
            });
        }

        Self::new(choices)
    }

    pub fn question_count(&self) -> u32 {
        self.choices.len() as u32
    }

    /// Correct choice for a 1-based question number.
    pub fn choice_for(&self, number: u32) -> Option<Choice> {
        if number == 0 {
            return None;
        }
        self.choices.get(number as usize - 1).copied()
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }
}
