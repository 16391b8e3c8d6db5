// src/handlers/grading.rs
//
// The three submission sources feeding the scoring pipeline: direct manual
// entry, text recognized from a photographed answer sheet, and the AI vision
// service that judges two images in one call. The first two run through the
// local scorer over the trusted answer key; the third trusts the remote
// judgment and stores it as such.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    grading::{
        AnswerKey, Choice, Submission, extract_answers, score,
        vision::{CorrectionEntry, DataUri},
    },
    handlers::{students::fetch_student, tests::fetch_test},
    models::{result::Judgment, test::Test},
    state::AppState,
    store::results::{NewResult, upsert_result},
};

/// DTO for grading a manually entered submission.
#[derive(Debug, Deserialize)]
pub struct ManualGradeRequest {
    pub student_id: i64,
    /// Question number -> chosen letter.
    pub answers: BTreeMap<u32, String>,
}

/// Scores a manually entered submission against the test's answer key and
/// upserts the result.
///
/// Grading is blocked until the submission covers every question; the scorer
/// itself would tolerate gaps, but the operator policy is that nothing gets
/// stored off an incomplete sheet.
pub async fn grade_manual(
    State(pool): State<SqlitePool>,
    Path(test_id): Path<i64>,
    Json(payload): Json<ManualGradeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let test = fetch_test(&pool, test_id).await?;
    let key = load_answer_key(&test)?;
    ensure_student_in_class(&pool, payload.student_id, test.class_group_id).await?;

    let submission = parse_submission(&payload.answers, key.question_count())?;

    if !submission.is_complete(key.question_count()) {
        let missing = submission.missing_questions(key.question_count());
        return Err(AppError::IncompleteSubmission(format!(
            "Submission is missing answers for questions: {}",
            join_numbers(&missing)
        )));
    }

    let card = score(&key, &submission);

    let corrections: Vec<CorrectionEntry> = card
        .breakdown
        .iter()
        .map(|outcome| CorrectionEntry {
            question_id: outcome.number.to_string(),
            correct: outcome.correct,
        })
        .collect();

    let stored = upsert_result(
        &pool,
        &NewResult {
            test_id,
            student_id: payload.student_id,
            correct_count: i64::from(card.correct_count),
            incorrect_count: i64::from(card.incorrect_count),
            score_pct: card.score_pct,
            answers: Some(serde_json::to_string(submission.answers())?),
            corrections: Some(serde_json::to_string(&corrections)?),
            judgment: Judgment::Local,
        },
    )
    .await?;

    tracing::info!(
        "Graded test {} for student {}: {}/{} correct",
        test_id,
        payload.student_id,
        card.correct_count,
        key.question_count()
    );

    let view = stored
        .into_view()
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(json!({
        "result": view,
        "breakdown": card.breakdown,
    })))
}

/// DTO carrying the text output of the recognition engine.
#[derive(Debug, Deserialize)]
pub struct SheetTextRequest {
    pub text: String,
}

/// Extracts question/choice pairs from recognized answer-sheet text.
///
/// Persists nothing: the operator reviews the extraction, fills the gaps,
/// and grades through the manual route. Recognizing zero lines is its own
/// error state so the operator knows to fall back to manual entry rather
/// than mistaking it for an empty-but-fine pass.
pub async fn extract_sheet(
    State(pool): State<SqlitePool>,
    Path(test_id): Path<i64>,
    Json(payload): Json<SheetTextRequest>,
) -> Result<impl IntoResponse, AppError> {
    let test = fetch_test(&pool, test_id).await?;

    let submission = extract_answers(&payload.text);

    if submission.is_empty() {
        return Err(AppError::RecognitionEmpty(
            "No answers could be recognized in the provided text".to_string(),
        ));
    }

    let missing = submission.missing_questions(test.question_count as u32);

    Ok(Json(json!({
        "answers": submission.answers(),
        "recognized_count": submission.len(),
        "missing": missing,
    })))
}

/// DTO for grading from two photographed images.
#[derive(Debug, Deserialize)]
pub struct VisionGradeRequest {
    pub student_id: i64,
    /// The student's answer sheet as a data URI (data:<mime>;base64,...).
    pub photo_data_uri: String,
    /// The official answer key photo, same encoding.
    pub answer_key_data_uri: String,
}

/// Grades through the AI vision service and stores its judgment verbatim.
///
/// Any remote failure aborts the operation with nothing written; no partial
/// result is fabricated locally.
pub async fn grade_vision(
    State(state): State<AppState>,
    Path(test_id): Path<i64>,
    Json(payload): Json<VisionGradeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let pool = &state.pool;
    let test = fetch_test(pool, test_id).await?;
    ensure_student_in_class(pool, payload.student_id, test.class_group_id).await?;

    let photo = DataUri::parse(&payload.photo_data_uri).map_err(AppError::BadRequest)?;
    let answer_key =
        DataUri::parse(&payload.answer_key_data_uri).map_err(AppError::BadRequest)?;

    let output = state
        .grader
        .grade(&photo, &answer_key, test_id, payload.student_id)
        .await?;

    let stored = upsert_result(
        pool,
        &NewResult {
            test_id,
            student_id: payload.student_id,
            correct_count: output.results.correct_count,
            incorrect_count: output.results.incorrect_count,
            score_pct: output.results.accuracy,
            answers: None,
            corrections: Some(serde_json::to_string(&output.corrections)?),
            judgment: Judgment::Vision,
        },
    )
    .await?;

    tracing::info!(
        "Vision-graded test {} for student {}: {} correct, {} incorrect",
        test_id,
        payload.student_id,
        output.results.correct_count,
        output.results.incorrect_count
    );

    let view = stored
        .into_view()
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(json!({
        "result": view,
        "corrections": output.corrections,
    })))
}

fn load_answer_key(test: &Test) -> Result<AnswerKey, AppError> {
    AnswerKey::from_stored(&test.answer_key, test.question_count as u32)
        .map_err(|e| AppError::DataIntegrity(format!("Test {}: {}", test.id, e)))
}

/// Letters arrive as strings at the API boundary; everything past here is a
/// `Choice`. Out-of-range question numbers are rejected outright - the sheet
/// extractor may hand the operator such pairs, but they must be corrected
/// before grading.
fn parse_submission(
    answers: &BTreeMap<u32, String>,
    question_count: u32,
) -> Result<Submission, AppError> {
    let mut submission = Submission::new();
    for (&number, letter) in answers {
        if number == 0 || number > question_count {
            return Err(AppError::BadRequest(format!(
                "Question number {} is outside 1..={}",
                number, question_count
            )));
        }
        let choice = Choice::parse(letter).ok_or_else(|| {
            AppError::BadRequest(format!(
                "'{}' is not a valid choice for question {}",
                letter, number
            ))
        })?;
        submission.insert(number, choice);
    }
    Ok(submission)
}

async fn ensure_student_in_class(
    pool: &sqlx::SqlitePool,
    student_id: i64,
    class_group_id: i64,
) -> Result<(), AppError> {
    let student = fetch_student(pool, student_id).await?;
    if student.class_group_id != class_group_id {
        return Err(AppError::BadRequest(format!(
            "Student {} is not in the test's class",
            student_id
        )));
    }
    Ok(())
}

fn join_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
