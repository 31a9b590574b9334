//! Result store errors.

/// Errors raised by the result store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Run has {antecedents} antecedents but {consequents} consequents")]
    MismatchedRun {
        antecedents: usize,
        consequents: usize,
    },

    #[error("Schema has already been set on this store")]
    SchemaAlreadySet,

    #[error("Schema has not been set; consensus matching requires it")]
    SchemaMissing,

    #[error("Store lock poisoned: {0}")]
    Poisoned(String),
}
