use crate::storage::{RawValue, StorageBackend, StorageError};
use std::{cell::RefCell, collections::BTreeMap};

///
/// MemoryBackend
///
/// In-memory storage backend. The default for ephemeral sessions and the
/// fake used throughout the test suite.
///

#[derive(Debug, Default)]
pub struct MemoryBackend {
    cells: RefCell<BTreeMap<String, RawValue>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<RawValue>, StorageError> {
        Ok(self.cells.borrow().get(key).cloned())
    }

    fn put(&self, key: &str, value: RawValue) -> Result<(), StorageError> {
        self.cells.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.cells.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.cells.borrow().keys().cloned().collect())
    }

    fn wipe(&self) -> Result<(), StorageError> {
        self.cells.borrow_mut().clear();
        Ok(())
    }
}

///
/// TESTS
///
