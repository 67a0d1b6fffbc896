pub mod day;
pub mod roster;

pub use day::DayStore;
pub use roster::RosterStore;

use crate::{
    error::Error,
    obs::{self, Event},
    storage::{MemoryBackend, StorageBackend},
};
use thiserror::Error as ThisError;

///
/// StoreError
///
/// Store-level failures. Absence of a record is never an error; a `Corrupt`
/// record is fatal to the operation and is not retried.
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("corrupt record at {key}: {message}")]
    Corrupt { key: String, message: String },
}

impl StoreError {
    pub(crate) fn corrupt(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Corrupt {
            key: key.into(),
            message: message.to_string(),
        }
    }
}

///
/// Db
///
/// Handle to the persisted namespace behind an injected storage backend.
/// Entry point for the date store and the fixed-vendor roster.
///

pub struct Db {
    backend: Box<dyn StorageBackend>,
}

impl Db {
    #[must_use]
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// A database over a fresh in-memory backend.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::new()))
    }

    #[must_use]
    pub fn days(&self) -> DayStore<'_> {
        DayStore::new(self.backend.as_ref())
    }

    #[must_use]
    pub fn roster(&self) -> RosterStore<'_> {
        RosterStore::new(self.backend.as_ref())
    }

    /// Destructively drop every persisted key in the namespace.
    pub fn wipe(&self) -> Result<(), Error> {
        self.backend.wipe()?;
        obs::emit(Event::Wipe);

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog, date::Date};

    #[test]
    fn wipe_clears_days_and_roster() {
        let db = Db::in_memory();
        let date = Date::new_checked(2024, 1, 1).unwrap();
        let snapshot = catalog::generate();

        db.days().commit(date, &snapshot).unwrap();
        db.roster().rebuild(&snapshot).unwrap();

        db.wipe().unwrap();
        assert!(db.days().load(date).unwrap().is_none());
        assert!(db.roster().read().unwrap().is_empty());
    }
}
