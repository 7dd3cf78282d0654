//! Core domain types for habit-lens.
//!
//! Usage and health models, the app category table, timestamp
//! normalization, CLI settings and small formatting helpers shared by the
//! data and binary crates.

mod builtin_categories;

pub mod categories;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{LensError, Result};
