// src/handlers/questions.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::tests::fetch_test,
    models::question::{Question, QuestionRequest},
};

/// Lists a test's questions in order.
pub async fn list_questions(
    State(pool): State<SqlitePool>,
    Path(test_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    fetch_test(&pool, test_id).await?;

    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, test_id, number, statement, kind,
               option_a, option_b, option_c, option_d, correct_choice, created_at
        FROM questions
        WHERE test_id = ?
        ORDER BY number
        "#,
    )
    .bind(test_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(questions))
}

/// Adds a question to a test. The question number must be within the test's
/// declared question count and unused.
pub async fn create_question(
    State(pool): State<SqlitePool>,
    Path(test_id): Path<i64>,
    Json(payload): Json<QuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let test = fetch_test(&pool, test_id).await?;
    if i64::from(payload.number) > test.question_count {
        return Err(AppError::BadRequest(format!(
            "Question number {} exceeds the test's {} questions",
            payload.number, test.question_count
        )));
    }

    let question = sqlx::query_as::<_, Question>(
        r#"
        INSERT INTO questions
            (test_id, number, statement, kind, option_a, option_b, option_c, option_d, correct_choice)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id, test_id, number, statement, kind,
                  option_a, option_b, option_c, option_d, correct_choice, created_at
        "#,
    )
    .bind(test_id)
    .bind(i64::from(payload.number))
    .bind(&payload.statement)
    .bind(&payload.kind)
    .bind(&payload.option_a)
    .bind(&payload.option_b)
    .bind(&payload.option_c)
    .bind(&payload.option_d)
    .bind(&payload.correct_choice)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            AppError::Conflict(format!(
                "Question {} already exists for this test",
                payload.number
            ))
        } else {
            tracing::error!("Failed to create question: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    Ok((StatusCode::CREATED, Json(question)))
}

/// Updates a question's statement and options.
pub async fn update_question(
    State(pool): State<SqlitePool>,
    Path((test_id, question_id)): Path<(i64, i64)>,
    Json(payload): Json<QuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let test = fetch_test(&pool, test_id).await?;
    if i64::from(payload.number) > test.question_count {
        return Err(AppError::BadRequest(format!(
            "Question number {} exceeds the test's {} questions",
            payload.number, test.question_count
        )));
    }

    let question = sqlx::query_as::<_, Question>(
        r#"
        UPDATE questions SET
            number = ?, statement = ?, kind = ?,
            option_a = ?, option_b = ?, option_c = ?, option_d = ?, correct_choice = ?
        WHERE id = ? AND test_id = ?
        RETURNING id, test_id, number, statement, kind,
                  option_a, option_b, option_c, option_d, correct_choice, created_at
        "#,
    )
    .bind(i64::from(payload.number))
    .bind(&payload.statement)
    .bind(&payload.kind)
    .bind(&payload.option_a)
    .bind(&payload.option_b)
    .bind(&payload.option_c)
    .bind(&payload.option_d)
    .bind(&payload.correct_choice)
    .bind(question_id)
    .bind(test_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Question not found".to_string()))?;

    Ok(Json(question))
}

/// Removes a question from a test.
pub async fn delete_question(
    State(pool): State<SqlitePool>,
    Path((test_id, question_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = sqlx::query("DELETE FROM questions WHERE id = ? AND test_id = ?")
        .bind(question_id)
        .bind(test_id)
        .execute(&pool)
        .await?;

    if outcome.rows_affected() == 0 {
        return Err(AppError::NotFound("Question not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
