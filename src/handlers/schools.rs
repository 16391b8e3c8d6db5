// src/handlers/schools.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{error::AppError, models::school::{School, SchoolRequest}};

/// Lists all registered schools.
pub async fn list_schools(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let schools = sqlx::query_as::<_, School>(
        "SELECT id, name, address, created_at FROM schools ORDER BY id DESC",
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(schools))
}

/// Retrieves a single school by ID.
pub async fn get_school(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let school = sqlx::query_as::<_, School>(
        "SELECT id, name, address, created_at FROM schools WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("School not found".to_string()))?;

    Ok(Json(school))
}

/// Registers a new school.
pub async fn create_school(
    State(pool): State<SqlitePool>,
    Json(payload): Json<SchoolRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let school = sqlx::query_as::<_, School>(
        r#"
        INSERT INTO schools (name, address)
        VALUES (?, ?)
        RETURNING id, name, address, created_at
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.address)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create school: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(school)))
}

/// Updates a school's name and address.
pub async fn update_school(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<SchoolRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let school = sqlx::query_as::<_, School>(
        r#"
        UPDATE schools SET name = ?, address = ?
        WHERE id = ?
        RETURNING id, name, address, created_at
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.address)
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("School not found".to_string()))?;

    Ok(Json(school))
}

/// Deletes a school and, via cascade, its classes, students and tests.
pub async fn delete_school(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = sqlx::query("DELETE FROM schools WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?;

    if outcome.rows_affected() == 0 {
        return Err(AppError::NotFound("School not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
