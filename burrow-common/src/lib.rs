//! # Burrow Common Library
//!
//! Shared foundation for the burrow family reading journal:
//!
//! - **slug**: title normalization producing the join key between
//!   reviews and cached metadata
//! - **sanitize**: tolerant normalization of user-submitted fields
//! - **config**: tiered configuration and root folder resolution
//! - **db**: SQLite schema creation and connection setup
//! - **auth**: upload key verification for write gating
//! - **error**: shared error type

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod sanitize;
pub mod slug;

pub use error::{Error, Result};
