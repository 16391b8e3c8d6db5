// src/grading/scorer.rs

use serde::Serialize;

use super::answer_key::AnswerKey;
use super::choice::Choice;
use super::submission::Submission;

/// Verdict for a single question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionOutcome {
    pub number: u32,
    pub expected: Choice,
    pub submitted: Option<Choice>,
    pub correct: bool,
}

/// Output of one scoring pass. Invariant:
/// `correct_count + incorrect_count == key.question_count()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCard {
    pub correct_count: u32,
    pub incorrect_count: u32,
    /// Canonical 0-100 scale; display layers convert if they want 0-10.
    pub score_pct: f64,
    pub breakdown: Vec<QuestionOutcome>,
}

/// Compares a submission against the answer key. Pure and deterministic.
///
/// Every question in the key is judged; a missing submission entry counts as
/// incorrect rather than an error, so a partial submission still yields a
/// complete scorecard. Whether partial submissions are *allowed* to reach
/// this point is the caller's policy.
pub fn score(key: &AnswerKey, submission: &Submission) -> ScoreCard {
    let question_count = key.question_count();
    let mut correct_count = 0u32;
    let mut breakdown = Vec::with_capacity(question_count as usize);

    for number in 1..=question_count {
        // The key is validated at construction, so every number resolves.
        let expected = match key.choice_for(number) {
            Some(c) => c,
            None => continue,
        };
        let submitted = submission.get(number);
        let correct = submitted == Some(expected);
        if correct {
            correct_count += 1;
        }
        breakdown.push(QuestionOutcome {
            number,
            expected,
            submitted,
            correct,
        });
    }

    let incorrect_count = question_count - correct_count;
    let score_pct = f64::from(correct_count) / f64::from(question_count) * 100.0;

    ScoreCard {
        correct_count,
        incorrect_count,
        score_pct,
        breakdown,
    }
}
