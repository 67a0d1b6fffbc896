use crate::{
    date::Date,
    error::Error,
    obs::{self, Event},
    serialize::serialize,
    snapshot::Snapshot,
    storage::{RawValue, StorageBackend, StorageError},
    store::StoreError,
};

/// Key prefix for per-date snapshots.
pub const DATA_PREFIX: &str = "data:";

///
/// DayStore
///
/// Date-keyed persistence: one full snapshot per visited calendar date,
/// stored under `data:<YYYY-MM-DD>` with the ISO date used verbatim.
///

pub struct DayStore<'a> {
    backend: &'a dyn StorageBackend,
}

impl<'a> DayStore<'a> {
    pub(crate) const fn new(backend: &'a dyn StorageBackend) -> Self {
        Self { backend }
    }

    fn key(date: Date) -> String {
        format!("{DATA_PREFIX}{date}")
    }

    /// Fetch the committed snapshot for an exact date, or `None` if the date
    /// has never been committed.
    ///
    /// Decoded snapshots are invariant-checked; bytes that do not decode to a
    /// well-formed snapshot are a corrupt record, not a recoverable state.
    pub fn load(&self, date: Date) -> Result<Option<Snapshot>, Error> {
        let key = Self::key(date);

        let Some(raw) = self.backend.get(&key)? else {
            return Ok(None);
        };

        let snapshot: Snapshot = raw
            .try_decode()
            .map_err(|e| StoreError::corrupt(&key, e))?;
        snapshot.verify().map_err(|e| StoreError::corrupt(&key, e))?;

        Ok(Some(snapshot))
    }

    /// Persist the full snapshot, replacing any prior value for the date.
    pub fn commit(&self, date: Date, snapshot: &Snapshot) -> Result<(), Error> {
        let bytes = serialize(snapshot)?;
        let value = RawValue::try_new(bytes).map_err(StorageError::from)?;

        self.backend.put(&Self::key(date), value)?;
        obs::emit(Event::Commit { date });

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog,
        group::GroupId,
        stall::{StallId, Status},
        store::Db,
    };

    fn date(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    #[test]
    fn load_of_unvisited_date_is_none() {
        let db = Db::in_memory();
        assert!(db.days().load(date("2024-01-01")).unwrap().is_none());
    }

    #[test]
    fn commit_then_load_round_trips() {
        let db = Db::in_memory();
        let mut snapshot = catalog::generate();
        {
            let stall = snapshot.get_mut(StallId::new(3)).unwrap();
            stall.status = Status::Occupied;
            stall.vendor_name = "Ana".into();
        }

        db.days().commit(date("2024-01-01"), &snapshot).unwrap();
        let loaded = db.days().load(date("2024-01-01")).unwrap().unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn commit_replaces_prior_snapshot() {
        let db = Db::in_memory();
        let blank = catalog::generate();
        let mut edited = blank.clone();
        {
            let stall = edited.get_mut(StallId::new(1)).unwrap();
            stall.status = Status::Occupied;
            stall.vendor_name = "Luis".into();
        }

        db.days().commit(date("2024-01-01"), &blank).unwrap();
        db.days().commit(date("2024-01-01"), &edited).unwrap();

        let loaded = db.days().load(date("2024-01-01")).unwrap().unwrap();
        assert_eq!(loaded, edited);
    }

    #[test]
    fn dates_are_isolated_keys() {
        let db = Db::in_memory();
        let snapshot = catalog::generate();

        db.days().commit(date("2024-01-01"), &snapshot).unwrap();
        assert!(db.days().load(date("2024-01-02")).unwrap().is_none());
    }

    #[test]
    fn undecodable_bytes_surface_as_corrupt() {
        let backend = crate::storage::MemoryBackend::new();
        backend
            .put(
                "data:2024-01-01",
                RawValue::try_new(vec![0xFF, 0x00, 0x13]).unwrap(),
            )
            .unwrap();

        let db = Db::new(Box::new(backend));
        let err = db.days().load(date("2024-01-01")).unwrap_err();
        assert!(matches!(
            err,
            Error::Store(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn invariant_violating_snapshot_surfaces_as_corrupt() {
        // A "pack" with a gap serializes fine but must fail the load check.
        let mut snapshot = catalog::generate();
        let group_id = GroupId::generate();
        for id in [2, 4] {
            let stall = snapshot.get_mut(StallId::new(id)).unwrap();
            stall.status = Status::Occupied;
            stall.vendor_name = "Ana".into();
            stall.group_id = Some(group_id);
            stall.group_size = 2;
        }

        let backend = crate::storage::MemoryBackend::new();
        backend
            .put(
                "data:2024-01-01",
                RawValue::try_new(serialize(&snapshot).unwrap()).unwrap(),
            )
            .unwrap();

        let db = Db::new(Box::new(backend));
        let err = db.days().load(date("2024-01-01")).unwrap_err();
        assert!(matches!(
            err,
            Error::Store(StoreError::Corrupt { .. })
        ));
    }
}
