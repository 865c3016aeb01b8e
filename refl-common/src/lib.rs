//! # Reflections Common Library
//!
//! Shared code for the Reflections services including:
//! - Database initialization, models, and the data-access layer
//! - Error taxonomy
//! - Configuration loading

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
