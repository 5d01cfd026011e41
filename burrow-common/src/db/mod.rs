//! Database layer
//!
//! Schema creation lives here; query helpers for each table live in
//! the web service next to the handlers that use them.

pub mod init;

pub use init::{create_schema, init_database};
