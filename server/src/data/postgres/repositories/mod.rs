//! PostgreSQL repositories

pub mod iconography;
