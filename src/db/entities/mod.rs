//! Database entities

pub mod theme;
pub mod user;
