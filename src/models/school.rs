// src/models/school.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'schools' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct School {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub created_at: Option<chrono::NaiveDateTime>,
}

/// DTO for creating or updating a school.
#[derive(Debug, Deserialize, Validate)]
pub struct SchoolRequest {
    #[validate(length(min = 1, max = 200, message = "School name must be between 1 and 200 characters."))]
    pub name: String,
    #[validate(length(min = 1, max = 300, message = "Address must be between 1 and 300 characters."))]
    pub address: String,
}
