// src/models/result.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Who produced the correctness judgment stored on a result row.
///
/// `Local` rows were scored here against the trusted answer key; `Vision`
/// rows carry the AI vision service's judgment verbatim. Keeping the
/// provenance in data makes the trust boundary explicit instead of an
/// implicit difference between code paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Judgment {
    Local,
    Vision,
}

impl Judgment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Judgment::Local => "local",
            Judgment::Vision => "vision",
        }
    }
}

/// Represents the 'results' table in the database: one scored result per
/// (test, student) pair, keyed by the deterministic composite id
/// `"{test_id}_{student_id}"`. Re-grading overwrites this row, never appends.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct StoredResult {
    pub id: String,
    pub test_id: i64,
    pub student_id: i64,
    pub correct_count: i64,
    pub incorrect_count: i64,
    /// 0-100 scale.
    pub score_pct: f64,
    /// The raw submission as JSON ({"1":"A",...}), kept for audit/display.
    /// Absent on the vision path, which never sees individual letters.
    pub answers: Option<String>,
    /// Per-question correctness as JSON ([{"question_id":"1","correct":true},...]).
    pub corrections: Option<String>,
    pub judgment: String,
    pub graded_at: Option<chrono::NaiveDateTime>,
}

/// DTO for sending a result to the client with the JSON columns parsed back
/// into structured values.
#[derive(Debug, Serialize)]
pub struct ResultView {
    pub id: String,
    pub test_id: i64,
    pub student_id: i64,
    pub correct_count: i64,
    pub incorrect_count: i64,
    pub score_pct: f64,
    pub answers: Option<serde_json::Value>,
    pub corrections: Option<serde_json::Value>,
    pub judgment: String,
    pub graded_at: Option<chrono::NaiveDateTime>,
}

impl StoredResult {
    pub fn into_view(self) -> Result<ResultView, serde_json::Error> {
        let answers = self.answers.as_deref().map(serde_json::from_str).transpose()?;
        let corrections = self
            .corrections
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        Ok(ResultView {
            id: self.id,
            test_id: self.test_id,
            student_id: self.student_id,
            correct_count: self.correct_count,
            incorrect_count: self.incorrect_count,
            score_pct: self.score_pct,
            answers,
            corrections,
            judgment: self.judgment,
            graded_at: self.graded_at,
        })
    }
}
