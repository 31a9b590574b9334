//! Dataset sources.

pub mod arff;

pub use arff::{load_arff, parse_arff};
