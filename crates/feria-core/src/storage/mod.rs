mod dir;
mod memory;

pub use dir::DirBackend;
pub use memory::MemoryBackend;

use crate::serialize::{SerializeError, deserialize_bounded};
use serde::de::DeserializeOwned;
use thiserror::Error as ThisError;

/// Max serialized bytes for a single stored value to keep loads bounded.
pub const MAX_VALUE_BYTES: u32 = 4 * 1024 * 1024;

///
/// StorageError
///

#[derive(Debug, ThisError)]
pub enum StorageError {
    #[error("storage io failure: {message}")]
    Io { message: String },

    #[error(transparent)]
    Value(#[from] RawValueError),
}

impl StorageError {
    pub(crate) fn io(err: &std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

///
/// RawValueError
///

#[derive(Debug, ThisError)]
pub enum RawValueError {
    #[error("value exceeds max size: {len} bytes (limit {MAX_VALUE_BYTES})")]
    TooLarge { len: usize },
}

///
/// RawValue
///
/// Opaque, size-bounded byte payload as held by a storage backend. Decoding
/// into a typed record is the caller's concern.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawValue(Vec<u8>);

impl RawValue {
    pub fn try_new(bytes: Vec<u8>) -> Result<Self, RawValueError> {
        if bytes.len() > MAX_VALUE_BYTES as usize {
            return Err(RawValueError::TooLarge { len: bytes.len() });
        }
        Ok(Self(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn try_decode<T: DeserializeOwned>(&self) -> Result<T, SerializeError> {
        deserialize_bounded(&self.0, MAX_VALUE_BYTES as usize)
    }
}

///
/// StorageBackend
///
/// The injected storage port: a flat string-keyed byte store. Implementations
/// are synchronous and single-threaded; interior mutability keeps the trait
/// object shareable from `&self` call sites.
///

pub trait StorageBackend {
    /// Fetch a value, `None` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<RawValue>, StorageError>;

    /// Write a value, fully replacing any prior value for the key.
    fn put(&self, key: &str, value: RawValue) -> Result<(), StorageError>;

    /// Remove a key; removing an absent key is a no-op.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Every key currently present, in unspecified order.
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Destructively drop every key in the namespace.
    fn wipe(&self) -> Result<(), StorageError>;
}

///
/// TESTS
///
