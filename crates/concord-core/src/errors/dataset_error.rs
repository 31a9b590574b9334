//! Dataset loading and validation errors.

/// Errors raised while reading a dataset or checking rows against its schema.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Dataset not found: {path}")]
    NotFound { path: String },

    #[error("Failed to read dataset {path}: {message}")]
    Io { path: String, message: String },

    #[error("Malformed dataset at line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("Attribute {name} has unsupported type {kind}; only nominal attributes are supported")]
    UnsupportedAttribute { name: String, kind: String },

    #[error("Row {row} has {found} values, schema declares {expected} attributes")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row}: value index {value} out of range for attribute {attribute}")]
    ValueOutOfRange {
        row: usize,
        attribute: String,
        value: usize,
    },

    #[error("Row {row}: value {value:?} is not declared for attribute {attribute}")]
    UnknownValue {
        row: usize,
        attribute: String,
        value: String,
    },
}
