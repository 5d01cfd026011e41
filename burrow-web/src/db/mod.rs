//! Database access for burrow-web
//!
//! One module per table, each with its record struct and save/load
//! helpers. Schema creation lives in burrow-common.

pub mod artworks;
pub mod audiobooks;
pub mod counter;
pub mod metadata;
pub mod reviews;
