// src/handlers/class_groups.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::class_group::{ClassGroup, ClassGroupRequest},
};

/// Query parameters for listing class groups.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub school_id: Option<i64>,
}

/// Lists class groups, optionally filtered by school.
pub async fn list_class_groups(
    State(pool): State<SqlitePool>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    // Unified query handling the optional filter
    let class_groups = sqlx::query_as::<_, ClassGroup>(
        r#"
        SELECT id, name, year, school_id, created_at
        FROM class_groups
        WHERE (?1 IS NULL OR school_id = ?1)
        ORDER BY year DESC, name
        "#,
    )
    .bind(params.school_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(class_groups))
}

/// Retrieves a single class group by ID.
pub async fn get_class_group(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let class_group = sqlx::query_as::<_, ClassGroup>(
        "SELECT id, name, year, school_id, created_at FROM class_groups WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Class not found".to_string()))?;

    Ok(Json(class_group))
}

/// Creates a new class group under an existing school.
pub async fn create_class_group(
    State(pool): State<SqlitePool>,
    Json(payload): Json<ClassGroupRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    ensure_school_exists(&pool, payload.school_id).await?;

    let class_group = sqlx::query_as::<_, ClassGroup>(
        r#"
        INSERT INTO class_groups (name, year, school_id)
        VALUES (?, ?, ?)
        RETURNING id, name, year, school_id, created_at
        "#,
    )
    .bind(&payload.name)
    .bind(payload.year)
    .bind(payload.school_id)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(class_group)))
}

/// Updates a class group.
pub async fn update_class_group(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<ClassGroupRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    ensure_school_exists(&pool, payload.school_id).await?;

    let class_group = sqlx::query_as::<_, ClassGroup>(
        r#"
        UPDATE class_groups SET name = ?, year = ?, school_id = ?
        WHERE id = ?
        RETURNING id, name, year, school_id, created_at
        "#,
    )
    .bind(&payload.name)
    .bind(payload.year)
    .bind(payload.school_id)
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Class not found".to_string()))?;

    Ok(Json(class_group))
}

/// Deletes a class group and its dependents.
pub async fn delete_class_group(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = sqlx::query("DELETE FROM class_groups WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?;

    if outcome.rows_affected() == 0 {
        return Err(AppError::NotFound("Class not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_school_exists(pool: &SqlitePool, school_id: i64) -> Result<(), AppError> {
    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM schools WHERE id = ?")
        .bind(school_id)
        .fetch_one(pool)
        .await?;

    if exists == 0 {
        return Err(AppError::BadRequest(format!(
            "School {} does not exist",
            school_id
        )));
    }
    Ok(())
}
