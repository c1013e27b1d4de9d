//! Data models: raw records in, computed documents out.

pub mod config;
pub mod document;
pub mod line;
pub mod party;
pub mod raw;
