//! Richelieu iconography search server

mod app;

pub mod api;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
