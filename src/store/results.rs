// src/store/results.rs
//
// Sole writer of the 'results' table. The idempotency guarantee of the
// grading workflow lives here: the row id is derived deterministically from
// (test, student), and an upsert replaces the previous row entirely, so
// re-grading a student can never leave a duplicate or ghost record. If two
// grading operations race for the same pair, the last write to complete wins;
// that is accepted, no locking.

use sqlx::SqlitePool;

use crate::models::result::{Judgment, StoredResult};

/// Deterministic storage key for a (test, student) pair.
pub fn result_key(test_id: i64, student_id: i64) -> String {
    format!("{}_{}", test_id, student_id)
}

/// A result about to be written; the store derives the key itself.
#[derive(Debug, Clone)]
pub struct NewResult {
    pub test_id: i64,
    pub student_id: i64,
    pub correct_count: i64,
    pub incorrect_count: i64,
    pub score_pct: f64,
    pub answers: Option<String>,
    pub corrections: Option<String>,
    pub judgment: Judgment,
}

/// Inserts or fully replaces the stored result for this (test, student) pair
/// and returns the row as stored.
pub async fn upsert_result(
    pool: &SqlitePool,
    result: &NewResult,
) -> Result<StoredResult, sqlx::Error> {
    let id = result_key(result.test_id, result.student_id);

    sqlx::query_as::<_, StoredResult>(
        r#"
        INSERT INTO results
            (id, test_id, student_id, correct_count, incorrect_count,
             score_pct, answers, corrections, judgment, graded_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(id) DO UPDATE SET
            correct_count = excluded.correct_count,
            incorrect_count = excluded.incorrect_count,
            score_pct = excluded.score_pct,
            answers = excluded.answers,
            corrections = excluded.corrections,
            judgment = excluded.judgment,
            graded_at = CURRENT_TIMESTAMP
        RETURNING id, test_id, student_id, correct_count, incorrect_count,
                  score_pct, answers, corrections, judgment, graded_at
        "#,
    )
    .bind(&id)
    .bind(result.test_id)
    .bind(result.student_id)
    .bind(result.correct_count)
    .bind(result.incorrect_count)
    .bind(result.score_pct)
    .bind(&result.answers)
    .bind(&result.corrections)
    .bind(result.judgment.as_str())
    .fetch_one(pool)
    .await
}

/// All stored results whose test_id matches exactly.
pub async fn results_for_test(
    pool: &SqlitePool,
    test_id: i64,
) -> Result<Vec<StoredResult>, sqlx::Error> {
    sqlx::query_as::<_, StoredResult>(
        r#"
        SELECT id, test_id, student_id, correct_count, incorrect_count,
               score_pct, answers, corrections, judgment, graded_at
        FROM results
        WHERE test_id = ?
        ORDER BY student_id
        "#,
    )
    .bind(test_id)
    .fetch_all(pool)
    .await
}

/// Explicit operator deletion; returns how many rows went away (0 or 1).
pub async fn delete_result(pool: &SqlitePool, id: &str) -> Result<u64, sqlx::Error> {
    let outcome = sqlx::query("DELETE FROM results WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(outcome.rows_affected())
}
