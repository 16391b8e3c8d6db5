// src/handlers/students.rs

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
    models::student::{Student, StudentRequest},
};

/// Query parameters for listing students.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub class_id: Option<i64>,
    pub school_id: Option<i64>,
}

/// Lists students, optionally filtered by class and/or school.
pub async fn list_students(
    State(pool): State<SqlitePool>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, AppError> {
    let students = sqlx::query_as::<_, Student>(
        r#"
        SELECT id, name, birth_date, school_id, class_group_id, created_at
        FROM students
        WHERE (?1 IS NULL OR class_group_id = ?1)
          AND (?2 IS NULL OR school_id = ?2)
        ORDER BY name
        "#,
    )
    .bind(params.class_id)
    .bind(params.school_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(students))
}

/// Retrieves a single student by ID.
pub async fn get_student(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let student = fetch_student(&pool, id).await?;
    Ok(Json(student))
}

/// Registers a new student in a class.
pub async fn create_student(
    State(pool): State<SqlitePool>,
    Json(payload): Json<StudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    ensure_class_in_school(&pool, payload.class_group_id, payload.school_id).await?;

    let student = sqlx::query_as::<_, Student>(
        r#"
        INSERT INTO students (name, birth_date, school_id, class_group_id)
        VALUES (?, ?, ?, ?)
        RETURNING id, name, birth_date, school_id, class_group_id, created_at
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.birth_date)
    .bind(payload.school_id)
    .bind(payload.class_group_id)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(student)))
}

/// Updates a student's record.
pub async fn update_student(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<StudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    ensure_class_in_school(&pool, payload.class_group_id, payload.school_id).await?;

    let student = sqlx::query_as::<_, Student>(
        r#"
        UPDATE students SET name = ?, birth_date = ?, school_id = ?, class_group_id = ?
        WHERE id = ?
        RETURNING id, name, birth_date, school_id, class_group_id, created_at
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.birth_date)
    .bind(payload.school_id)
    .bind(payload.class_group_id)
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Student not found".to_string()))?;

    Ok(Json(student))
}

/// Deletes a student and their stored results.
pub async fn delete_student(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = sqlx::query("DELETE FROM students WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?;

    if outcome.rows_affected() == 0 {
        return Err(AppError::NotFound("Student not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Fetch-or-404 used by the grading handlers as well.
pub(crate) async fn fetch_student(pool: &SqlitePool, id: i64) -> Result<Student, AppError> {
    sqlx::query_as::<_, Student>(
        "SELECT id, name, birth_date, school_id, class_group_id, created_at FROM students WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Student not found".to_string()))
}

async fn ensure_class_in_school(
    pool: &SqlitePool,
    class_group_id: i64,
    school_id: i64,
) -> Result<(), AppError> {
    let found = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM class_groups WHERE id = ? AND school_id = ?",
    )
    .bind(class_group_id)
    .bind(school_id)
    .fetch_one(pool)
    .await?;

    if found == 0 {
        return Err(AppError::BadRequest(format!(
            "Class {} does not exist in school {}",
            class_group_id, school_id
        )));
    }
    Ok(())
}
