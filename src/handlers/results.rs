// src/handlers/results.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    grading::summarize,
    handlers::tests::fetch_test,
    store::results::{delete_result as delete_stored_result, results_for_test},
};

/// The results dashboard payload for one test: every stored per-student
/// result plus the aggregate rollup, recomputed on each read.
pub async fn test_results(
    State(pool): State<SqlitePool>,
    Path(test_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let test = fetch_test(&pool, test_id).await?;

    let rows = results_for_test(&pool, test_id).await?;
    let stats = summarize(&rows, test.question_count as u32);

    let results = rows
        .into_iter()
        .map(|row| row.into_view())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::DataIntegrity(format!("stored result is malformed: {}", e)))?;

    Ok(Json(json!({
        "test_id": test_id,
        "stats": stats,
        "results": results,
    })))
}

/// Explicit operator deletion of one stored result. This is the only way a
/// result ever goes away short of deleting its test or student.
pub async fn delete_result(
    State(pool): State<SqlitePool>,
    Path(result_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let removed = delete_stored_result(&pool, &result_id).await?;

    if removed == 0 {
        return Err(AppError::NotFound("Result not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
