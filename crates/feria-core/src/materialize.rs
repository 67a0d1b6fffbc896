//! Day materialization: decide what occupancy state a date gets when it
//! becomes active.
//!
//! A visited date's committed snapshot is authoritative and is returned
//! untouched. An unseen date starts from the blank template with the
//! fixed-vendor roster overlaid, and is committed immediately so the day
//! exists durably before any edit.

use crate::{
    catalog,
    date::Date,
    error::Error,
    obs::{self, Event},
    snapshot::Snapshot,
    stall::Status,
    store::{DayStore, RosterStore},
};

/// Produce the snapshot for `date`.
pub fn materialize(days: &DayStore<'_>, roster: &RosterStore<'_>, date: Date) -> Result<Snapshot, Error> {
    if let Some(snapshot) = days.load(date)? {
        obs::emit(Event::MaterializeHit { date });
        return Ok(snapshot);
    }

    let mut snapshot = catalog::generate();
    let roster = roster.read()?;

    let mut fixed = 0;
    for entry in roster.iter() {
        // Identity fields always come from the template; a roster entry whose
        // id fell outside the current layout is silently ignored.
        let Some(stall) = snapshot.get_mut(entry.id) else {
            continue;
        };

        stall.status = Status::Occupied;
        stall.vendor_name = entry.vendor_name.clone();
        stall.description = entry.description.clone();
        stall.notes = entry.notes.clone();
        stall.is_fixed = entry.is_fixed;
        stall.group_id = entry.group_id;
        stall.group_size = entry.group_size;
        stall.has_paid = false;
        stall.attended = false;

        fixed += 1;
    }

    days.commit(date, &snapshot)?;
    obs::emit(Event::MaterializeMerge { date, fixed });

    Ok(snapshot)
}

///
/// TESTS
///
