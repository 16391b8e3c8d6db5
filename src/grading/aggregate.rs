// src/grading/aggregate.rs

use serde::Serialize;

use crate::models::result::StoredResult;

/// Class-level rollup for one test's results dashboard. Derived on demand
/// from the stored results, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    pub question_count: u32,
    pub students_graded: u32,
    pub total_correct: i64,
    pub total_incorrect: i64,
    /// Mean of the per-student 0-100 scores; 0 when no results exist.
    pub mean_score_pct: f64,
}

/// Sums and averages are commutative, so the stats are stable under any
/// ordering of the result set.
pub fn summarize(results: &[StoredResult], question_count: u32) -> AggregateStats {
    let students_graded = results.len() as u32;
    let total_correct: i64 = results.iter().map(|r| r.correct_count).sum();
    let total_incorrect: i64 = results.iter().map(|r| r.incorrect_count).sum();

    let mean_score_pct = if results.is_empty() {
        0.0
    } else {
        results.iter().map(|r| r.score_pct).sum::<f64>() / results.len() as f64
    };

    AggregateStats {
        question_count,
        students_graded,
        total_correct,
        total_incorrect,
        mean_score_pct,
    }
}
