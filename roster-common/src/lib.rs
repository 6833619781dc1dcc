//! # Roster Common Library
//!
//! Shared code for the bhajan roster service:
//! - Error taxonomy and result alias
//! - Configuration loading
//! - Calendar day / month parsing (UTC day buckets)
//! - Database pool initialization and schema
//! - Row models

pub mod config;
pub mod date;
pub mod db;
pub mod error;

pub use error::{Error, Result};
