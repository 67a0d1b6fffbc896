use crate::{
    serialize::SerializeError, session::SessionError, snapshot::SnapshotError,
    storage::StorageError, store::StoreError,
};
use thiserror::Error as ThisError;

///
/// Error
///
/// Top-level error surface, composed from the subsystem taxonomies.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
