// src/models/class_group.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'class_groups' table (a "turma": one class of students
/// within a school, in a given school year).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ClassGroup {
    pub id: i64,
    pub name: String,
    pub year: i64,
    pub school_id: i64,
    pub created_at: Option<chrono::NaiveDateTime>,
}

/// DTO for creating or updating a class group.
#[derive(Debug, Deserialize, Validate)]
pub struct ClassGroupRequest {
    #[validate(length(min = 1, max = 100, message = "Class name must be between 1 and 100 characters."))]
    pub name: String,
    #[validate(range(min = 2000, max = 2100, message = "Year must be a plausible school year."))]
    pub year: i64,
    pub school_id: i64,
}
