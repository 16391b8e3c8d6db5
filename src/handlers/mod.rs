// src/handlers/mod.rs

pub mod class_groups;
pub mod grading;
pub mod questions;
pub mod results;
pub mod schools;
pub mod students;
