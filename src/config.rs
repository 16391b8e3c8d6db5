// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,

    /// Base URL of the AI vision-grading service. Grading over photos is
    /// unavailable when unset; every other flow works without it.
    pub grader_url: Option<String>,
    pub grader_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://provafacil.db".to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let grader_url = env::var("GRADER_URL").ok();
        let grader_api_key = env::var("GRADER_API_KEY").ok();

        Self {
            database_url,
            rust_log,
            grader_url,
            grader_api_key,
        }
    }
}
