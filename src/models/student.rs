// src/models/student.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'students' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    /// ISO date string; kept as text, the app never computes with it.
    pub birth_date: String,
    pub school_id: i64,
    pub class_group_id: i64,
    pub created_at: Option<chrono::NaiveDateTime>,
}

/// DTO for creating or updating a student.
#[derive(Debug, Deserialize, Validate)]
pub struct StudentRequest {
    #[validate(length(min = 1, max = 200, message = "Student name must be between 1 and 200 characters."))]
    pub name: String,
    #[validate(length(min = 1, max = 20, message = "Birth date is required."))]
    pub birth_date: String,
    pub school_id: i64,
    pub class_group_id: i64,
}
