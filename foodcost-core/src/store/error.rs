//! Store error types.

use thiserror::Error;

use crate::entity::Collection;

/// Errors returned by store mutations.
///
/// Persistence failures are never returned; see
/// [`DemoStore::last_persist_error`](super::DemoStore::last_persist_error).
#[derive(Error, Debug)]
pub enum StoreError {
    /// The payload for a new record does not describe a valid record.
    #[error("Invalid {collection} record: {source}")]
    InvalidEntity {
        collection: Collection,
        source: serde_json::Error,
    },

    /// The record produced by merging a patch is not valid.
    #[error("Invalid patch for {collection} '{id}': {source}")]
    InvalidPatch {
        collection: Collection,
        id: String,
        source: serde_json::Error,
    },

    /// The patch names a field that is managed by the store.
    #[error("Field '{0}' cannot be changed")]
    ImmutableField(String),

    /// The record holds a value JSON cannot represent, such as NaN.
    #[error("{collection} record '{id}' cannot be saved: numbers must be finite")]
    NotPersistable { collection: Collection, id: String },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
