//! Data model for tabular cell data

mod value;

pub use value::{CellValue, Row};
