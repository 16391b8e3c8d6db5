// src/grading/submission.rs

use std::collections::BTreeMap;

use super::choice::Choice;

/// A student's chosen answers for one test, keyed by 1-based question number.
///
/// A submission may be partial while it is being gathered (sheet extraction
/// routinely recognizes only some lines); completeness is checked by the
/// grading handler before scoring, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    answers: BTreeMap<u32, Choice>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserting twice for the same question keeps the later value.
    pub fn insert(&mut self, number: u32, choice: Choice) {
        self.answers.insert(number, choice);
    }

    pub fn get(&self, number: u32) -> Option<Choice> {
        self.answers.get(&number).copied()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// True when every question 1..=question_count has an answer.
    pub fn is_complete(&self, question_count: u32) -> bool {
        (1..=question_count).all(|q| self.answers.contains_key(&q))
    }

    /// Question numbers in 1..=question_count with no answer yet, in order.
    pub fn missing_questions(&self, question_count: u32) -> Vec<u32> {
        (1..=question_count)
            .filter(|q| !self.answers.contains_key(q))
            .collect()
    }

    pub fn answers(&self) -> &BTreeMap<u32, Choice> {
        &self.answers
    }
}

impl FromIterator<(u32, Choice)> for Submission {
    fn from_iter<I: IntoIterator<Item = (u32, Choice)>>(iter: I) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}
