use crate::{
    error::Error,
    group::GroupId,
    obs::{self, Event},
    serialize::serialize,
    snapshot::Snapshot,
    stall::{Stall, StallId},
    storage::{RawValue, StorageBackend, StorageError},
    store::StoreError,
};
use derive_more::{Deref, DerefMut};
use serde::{Deserialize, Serialize};

/// Well-known key for the fixed-vendor roster. Not date-scoped.
pub const ROSTER_KEY: &str = "roster:fixed";

///
/// RosterEntry
///
/// Date-independent projection of a fixed stall. Per-date fields (`has_paid`,
/// `attended`) are deliberately absent: they never propagate across dates.
/// `notes` does propagate; it is vendor-identity data, not daily status.
///

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct RosterEntry {
    pub id: StallId,
    pub vendor_name: String,
    pub description: String,
    pub notes: String,
    pub is_fixed: bool,
    pub group_id: Option<GroupId>,
    pub group_size: u8,
}

impl RosterEntry {
    fn project(stall: &Stall) -> Self {
        Self {
            id: stall.id,
            vendor_name: stall.vendor_name.clone(),
            description: stall.description.clone(),
            notes: stall.notes.clone(),
            is_fixed: stall.is_fixed,
            group_id: stall.group_id,
            group_size: stall.group_size,
        }
    }
}

///
/// Roster
///
/// Pure derived view: the `is_fixed` stalls of whichever snapshot was most
/// recently committed. Never independently edited; always rebuilt in full.
///

#[derive(Clone, Debug, Default, Deref, DerefMut, Eq, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Roster(Vec<RosterEntry>);

impl Roster {
    /// Derive the roster for a snapshot: filter fixed stalls, project.
    #[must_use]
    pub fn derive(snapshot: &Snapshot) -> Self {
        Self(
            snapshot
                .iter()
                .filter(|s| s.is_fixed)
                .map(RosterEntry::project)
                .collect(),
        )
    }

    #[must_use]
    pub fn entry_for(&self, id: StallId) -> Option<&RosterEntry> {
        self.0.iter().find(|e| e.id == id)
    }
}

///
/// RosterStore
///

pub struct RosterStore<'a> {
    backend: &'a dyn StorageBackend,
}

impl<'a> RosterStore<'a> {
    pub(crate) const fn new(backend: &'a dyn StorageBackend) -> Self {
        Self { backend }
    }

    /// Fetch the current roster; empty if none has ever been written.
    pub fn read(&self) -> Result<Roster, Error> {
        let Some(raw) = self.backend.get(ROSTER_KEY)? else {
            return Ok(Roster::default());
        };

        let roster = raw
            .try_decode()
            .map_err(|e| StoreError::corrupt(ROSTER_KEY, e))?;

        Ok(roster)
    }

    /// Rebuild the roster from a snapshot and persist it, fully replacing the
    /// prior roster. Called after every snapshot commit, so the most recent
    /// edit anywhere always wins for propagation purposes.
    pub fn rebuild(&self, snapshot: &Snapshot) -> Result<Roster, Error> {
        let roster = Roster::derive(snapshot);

        let bytes = serialize(&roster)?;
        let value = RawValue::try_new(bytes).map_err(StorageError::from)?;
        self.backend.put(ROSTER_KEY, value)?;

        obs::emit(Event::RosterRebuild {
            entries: roster.len(),
        });

        Ok(roster)
    }
}

///
/// TESTS
///
