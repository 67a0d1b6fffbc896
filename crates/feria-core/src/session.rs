use crate::{
    date::Date,
    error::Error,
    materialize,
    mutate::{self, OccupancyEdit},
    snapshot::Snapshot,
    stall::{Stall, StallId, Status},
    stats::DayStats,
    store::Db,
};
use thiserror::Error as ThisError;

///
/// SessionError
///
/// Boundary rejections for collaborator input. The mutator itself performs
/// no validation; everything that can be wrong with an edit is caught here.
///

#[derive(Debug, ThisError)]
pub enum SessionError {
    #[error("no active date; select a date first")]
    NoActiveDate,

    #[error("no stall selected")]
    NoSelection,

    #[error("unknown stall id: {id}")]
    UnknownStall { id: StallId },

    #[error("vendor name is required for an occupied stall")]
    VendorNameRequired,

    #[error("requested pack of {requested} but only {available} contiguous stalls available")]
    PackTooLarge { requested: u8, available: u8 },
}

///
/// DraftField
///
/// One single-field edit against the draft. Pure local operation, no
/// persistence until save.
///

#[derive(Clone, Debug)]
pub enum DraftField {
    Status(Status),
    VendorName(String),
    Description(String),
    Notes(String),
    IsFixed(bool),
    HasPaid(bool),
    Attended(bool),
}

///
/// Draft
///
/// Local edit buffer: a copy of the selected stall plus the requested pack
/// size. Discarded on date change, save, or release.
///

#[derive(Clone, Debug)]
pub struct Draft {
    stall: Stall,
    requested: u8,
}

impl Draft {
    fn for_stall(stall: &Stall) -> Self {
        Self {
            stall: stall.clone(),
            requested: stall.group_size.max(1),
        }
    }

    #[must_use]
    pub const fn stall(&self) -> &Stall {
        &self.stall
    }

    #[must_use]
    pub const fn requested(&self) -> u8 {
        self.requested
    }

    fn edit(&mut self, field: DraftField) {
        match field {
            DraftField::Status(status) => self.stall.status = status,
            DraftField::VendorName(name) => self.stall.vendor_name = name,
            DraftField::Description(text) => self.stall.description = text,
            DraftField::Notes(text) => self.stall.notes = text,
            DraftField::IsFixed(fixed) => self.stall.is_fixed = fixed,
            DraftField::HasPaid(paid) => self.stall.has_paid = paid,
            DraftField::Attended(attended) => self.stall.attended = attended,
        }
    }

    fn to_edit(&self) -> OccupancyEdit {
        OccupancyEdit {
            status: self.stall.status,
            vendor_name: self.stall.vendor_name.clone(),
            description: self.stall.description.clone(),
            notes: self.stall.notes.clone(),
            is_fixed: self.stall.is_fixed,
            has_paid: self.stall.has_paid,
            attended: self.stall.attended,
        }
    }
}

struct ActiveDay {
    date: Date,
    snapshot: Snapshot,
}

///
/// Session
///
/// The collaborator-facing surface. Owns the storage handle, the active-date
/// context (exactly one date is active at a time; its snapshot is replaced
/// wholesale on date change), and the local edit draft. Single-threaded and
/// synchronous: every operation runs to completion before the next.
///

pub struct Session {
    db: Db,
    active: Option<ActiveDay>,
    draft: Option<Draft>,
}

impl Session {
    #[must_use]
    pub const fn new(db: Db) -> Self {
        Self {
            db,
            active: None,
            draft: None,
        }
    }

    /// A session over a fresh in-memory backend.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Db::in_memory())
    }

    #[must_use]
    pub fn active_date(&self) -> Option<Date> {
        self.active.as_ref().map(|a| a.date)
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.active.as_ref().map(|a| &a.snapshot)
    }

    #[must_use]
    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    /// Make `date` the active date, materializing its snapshot. Any pending
    /// draft for the prior date is discarded.
    pub fn change_date(&mut self, date: Date) -> Result<&Snapshot, Error> {
        self.draft = None;

        let snapshot = materialize::materialize(&self.db.days(), &self.db.roster(), date)?;
        self.active = Some(ActiveDay { date, snapshot });

        Ok(&self.active.as_ref().expect("active day just set").snapshot)
    }

    /// Copy a live stall into the edit draft.
    pub fn select(&mut self, id: StallId) -> Result<&Draft, Error> {
        let active = self.active.as_ref().ok_or(SessionError::NoActiveDate)?;
        let stall = active
            .snapshot
            .get(id)
            .ok_or(SessionError::UnknownStall { id })?;

        self.draft = Some(Draft::for_stall(stall));

        Ok(self.draft.as_ref().expect("draft just set"))
    }

    /// Apply a single-field edit to the draft. No persistence.
    pub fn edit(&mut self, field: DraftField) -> Result<(), Error> {
        let draft = self.draft.as_mut().ok_or(SessionError::NoSelection)?;
        draft.edit(field);

        Ok(())
    }

    /// Set the requested pack size on the draft. No persistence.
    pub fn choose_group_size(&mut self, requested: u8) -> Result<(), Error> {
        let draft = self.draft.as_mut().ok_or(SessionError::NoSelection)?;
        draft.requested = requested.max(1);

        Ok(())
    }

    /// Apply the draft to the active snapshot, then commit the day and
    /// rebuild the fixed-vendor roster.
    pub fn save(&mut self) -> Result<(), Error> {
        let active = self.active.as_ref().ok_or(SessionError::NoActiveDate)?;
        let draft = self.draft.as_ref().ok_or(SessionError::NoSelection)?;
        let target = draft.stall().id;

        if draft.stall().status == Status::Occupied && draft.stall().vendor_name.trim().is_empty()
        {
            return Err(SessionError::VendorNameRequired.into());
        }

        let live = active
            .snapshot
            .get(target)
            .ok_or(SessionError::UnknownStall { id: target })?;

        // A new occupancy claims a contiguous run; validate capacity before
        // the mutator sees the request. Pack edits keep their membership and
        // skip the check.
        if live.group_id.is_none() && draft.stall().status == Status::Occupied {
            let available = mutate::max_available_run(&active.snapshot, target);
            if draft.requested() > available {
                return Err(SessionError::PackTooLarge {
                    requested: draft.requested(),
                    available,
                }
                .into());
            }
        }

        let next = mutate::assign(
            &active.snapshot,
            target,
            &draft.to_edit(),
            draft.requested(),
        );
        self.commit_active(next)?;
        self.draft = None;

        Ok(())
    }

    /// Release a stall (or its whole pack) back to free, then commit and
    /// rebuild the roster.
    pub fn release(&mut self, id: StallId) -> Result<(), Error> {
        let active = self.active.as_ref().ok_or(SessionError::NoActiveDate)?;
        active
            .snapshot
            .get(id)
            .ok_or(SessionError::UnknownStall { id })?;

        let next = mutate::vacate(&active.snapshot, id);
        self.commit_active(next)?;
        self.draft = None;

        Ok(())
    }

    /// Read-only capacity query for the pack-size chooser.
    pub fn max_run(&self, id: StallId) -> Result<u8, Error> {
        let active = self.active.as_ref().ok_or(SessionError::NoActiveDate)?;
        active
            .snapshot
            .get(id)
            .ok_or(SessionError::UnknownStall { id })?;

        Ok(mutate::max_available_run(&active.snapshot, id))
    }

    /// Derived statistics for the active day.
    #[must_use]
    pub fn stats(&self) -> Option<DayStats> {
        self.active
            .as_ref()
            .map(|a| DayStats::for_snapshot(&a.snapshot))
    }

    /// Destructively clear every persisted key and drop the active context.
    pub fn reset_all(&mut self) -> Result<(), Error> {
        self.db.wipe()?;
        self.active = None;
        self.draft = None;

        Ok(())
    }

    fn commit_active(&mut self, next: Snapshot) -> Result<(), Error> {
        let active = self.active.as_mut().expect("commit requires an active day");

        self.db.days().commit(active.date, &next)?;
        self.db.roster().rebuild(&next)?;
        active.snapshot = next;

        Ok(())
    }
}

///
/// TESTS
///
