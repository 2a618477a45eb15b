// src/utils/mod.rs
//! Configuration and error types shared across the engine

pub mod config;
pub mod errors;
