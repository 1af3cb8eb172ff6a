//! # Presswork Common Library
//!
//! Shared code for the Presswork content backend:
//! - Database models and schema initialization
//! - Error taxonomy and HTTP mapping
//! - Configuration loading
//! - Input normalization for loosely-typed form payloads
//! - Object id utilities

pub mod config;
pub mod db;
pub mod defaults;
pub mod error;
pub mod ids;
pub mod normalize;

pub use error::{Error, Result};
