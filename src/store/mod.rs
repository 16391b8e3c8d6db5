// src/store/mod.rs

pub mod results;
