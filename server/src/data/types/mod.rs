//! Row types returned by the data layer

mod iconography;

pub use iconography::IconographyRow;
