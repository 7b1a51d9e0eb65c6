//! Build a table mapping each UMLS concept to its preferred English name and its semantic types,
//! from MRCONSO, MRSTY, and the semantic type abbreviation table.

pub mod combine;
pub mod error;
pub mod files;
pub mod nested;
pub mod output;
pub mod pipeline;
pub mod tables;

pub use error::{Error, Result};
