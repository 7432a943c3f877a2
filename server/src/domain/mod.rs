//! Domain logic for iconography search
//!
//! - `search` - Parameter sanitizer, boolean query compiler and date intervals

pub mod search;
