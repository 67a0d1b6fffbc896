//! Occupancy mutation: pure transforms over a snapshot.
//!
//! Every operation here assumes its target is a live member of the snapshot;
//! an unknown id is a programming error at the session boundary, not a
//! recoverable runtime condition.

use crate::{
    MAX_PACK_SIZE,
    group::GroupId,
    snapshot::Snapshot,
    stall::{Stall, StallId, Status},
};

///
/// OccupancyEdit
///
/// The field set a single save applies. Always carries a status; when the
/// status is `Occupied` the session boundary has already required a
/// non-empty vendor name.
///

#[derive(Clone, Debug, Default)]
pub struct OccupancyEdit {
    pub status: Status,
    pub vendor_name: String,
    pub description: String,
    pub notes: String,
    pub is_fixed: bool,
    pub has_paid: bool,
    pub attended: bool,
}

impl OccupancyEdit {
    fn apply(&self, stall: &mut Stall) {
        if self.status == Status::Free {
            // A save that flips a stall back to free must land on the full
            // free defaults, or the snapshot would carry vendor data on a
            // free stall.
            stall.clear_occupancy();
            return;
        }

        stall.status = Status::Occupied;
        stall.vendor_name = self.vendor_name.clone();
        stall.description = self.description.clone();
        stall.notes = self.notes.clone();
        stall.is_fixed = self.is_fixed;
        stall.has_paid = self.has_paid;
        stall.attended = self.attended;
    }
}

/// Apply an edit at `target`, producing the updated snapshot.
///
/// A target already in a pack edits every member of that pack; membership
/// and group size are unchanged. Otherwise the edit claims the contiguous
/// run of `requested` stalls starting at the target's position — by index,
/// not by status; the caller validates availability via
/// [`max_available_run`] first. A fresh group id is minted only when the
/// run spans more than one stall.
#[must_use]
pub fn assign(snapshot: &Snapshot, target: StallId, edit: &OccupancyEdit, requested: u8) -> Snapshot {
    let anchor = snapshot
        .get(target)
        .expect("assign target must be a live stall");

    let mut next = snapshot.clone();

    if let Some(group_id) = anchor.group_id {
        for stall in next.iter_mut().filter(|s| s.group_id == Some(group_id)) {
            edit.apply(stall);
        }
        return next;
    }

    let requested = requested.max(1);
    let category = anchor.category;
    let first = anchor.index_in_category;
    let end = first.saturating_add(requested);
    let group_id = (requested > 1 && edit.status == Status::Occupied).then(GroupId::generate);

    for stall in next.iter_mut().filter(|s| {
        s.category == category && s.index_in_category >= first && s.index_in_category < end
    }) {
        edit.apply(stall);
        if stall.status == Status::Occupied {
            stall.group_id = group_id;
            stall.group_size = if group_id.is_some() { requested } else { 1 };
        }
    }

    next
}

/// Reset the target's whole pack (or just the target when ungrouped) to the
/// free defaults. Always clears `is_fixed`.
#[must_use]
pub fn vacate(snapshot: &Snapshot, target: StallId) -> Snapshot {
    let anchor = snapshot
        .get(target)
        .expect("vacate target must be a live stall");

    let mut next = snapshot.clone();

    match anchor.group_id {
        Some(group_id) => {
            for stall in next.iter_mut().filter(|s| s.group_id == Some(group_id)) {
                stall.clear_occupancy();
            }
        }
        None => {
            next.get_mut(target)
                .expect("vacate target must be a live stall")
                .clear_occupancy();
        }
    }

    next
}

/// How many contiguous stalls a pack anchored at `target` could span.
///
/// An existing pack reports its own size (it cannot be extended through this
/// query). Otherwise: the target itself plus each immediately-following free
/// stall in the same category, stopping at the first non-free stall, the
/// category boundary, or [`MAX_PACK_SIZE`].
#[must_use]
pub fn max_available_run(snapshot: &Snapshot, target: StallId) -> u8 {
    let anchor = snapshot
        .get(target)
        .expect("run query target must be a live stall");

    if anchor.group_id.is_some() {
        return anchor.group_size;
    }

    let mut run = 1;
    while run < MAX_PACK_SIZE {
        match snapshot.stall_at(anchor.category, anchor.index_in_category + run) {
            Some(next) if next.is_free() => run += 1,
            _ => break,
        }
    }

    run
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use proptest::prelude::*;

    fn occupied(vendor: &str) -> OccupancyEdit {
        OccupancyEdit {
            status: Status::Occupied,
            vendor_name: vendor.into(),
            ..OccupancyEdit::default()
        }
    }

    #[test]
    fn single_assignment_has_no_group() {
        let snapshot = assign(&catalog::generate(), StallId::new(1), &occupied("Ana"), 1);

        let stall = snapshot.get(StallId::new(1)).unwrap();
        assert_eq!(stall.status, Status::Occupied);
        assert_eq!(stall.vendor_name, "Ana");
        assert!(stall.group_id.is_none());
        assert_eq!(stall.group_size, 1);

        assert!(snapshot.get(StallId::new(2)).unwrap().is_free());
        snapshot.verify().unwrap();
    }

    #[test]
    fn pack_assignment_groups_the_run() {
        // Stall id 1 is Verde index 0; a pack of three spans indices 0..3.
        let snapshot = assign(&catalog::generate(), StallId::new(1), &occupied("Ana"), 3);

        let group_id = snapshot.get(StallId::new(1)).unwrap().group_id.unwrap();
        assert_eq!(snapshot.group_members(group_id).count(), 3);
        for id in [1, 2, 3] {
            let stall = snapshot.get(StallId::new(id)).unwrap();
            assert_eq!(stall.group_id, Some(group_id));
            assert_eq!(stall.group_size, 3);
            assert_eq!(stall.vendor_name, "Ana");
        }
        assert!(snapshot.get(StallId::new(4)).unwrap().is_free());
        snapshot.verify().unwrap();
    }

    #[test]
    fn editing_a_pack_touches_every_member_and_nothing_else() {
        let base = assign(&catalog::generate(), StallId::new(1), &occupied("Ana"), 3);

        let mut edit = occupied("Ana");
        edit.has_paid = true;
        edit.is_fixed = true;
        // Edit via a non-anchor member; the whole pack follows.
        let snapshot = assign(&base, StallId::new(2), &edit, 1);

        for id in [1, 2, 3] {
            let stall = snapshot.get(StallId::new(id)).unwrap();
            assert!(stall.has_paid);
            assert!(stall.is_fixed);
            assert_eq!(stall.group_size, 3);
        }
        assert!(snapshot.get(StallId::new(4)).unwrap().is_free());
        snapshot.verify().unwrap();
    }

    #[test]
    fn freeing_edit_resets_to_defaults() {
        let base = assign(&catalog::generate(), StallId::new(10), &occupied("Luis"), 1);

        let edit = OccupancyEdit {
            status: Status::Free,
            vendor_name: "Luis".into(),
            ..OccupancyEdit::default()
        };
        let snapshot = assign(&base, StallId::new(10), &edit, 1);

        let stall = snapshot.get(StallId::new(10)).unwrap();
        assert!(stall.is_free());
        assert!(stall.vendor_name.is_empty());
        snapshot.verify().unwrap();
    }

    #[test]
    fn vacate_clears_the_whole_pack() {
        let mut edit = occupied("Ana");
        edit.is_fixed = true;
        let base = assign(&catalog::generate(), StallId::new(1), &edit, 3);

        let snapshot = vacate(&base, StallId::new(2));
        for id in [1, 2, 3] {
            let stall = snapshot.get(StallId::new(id)).unwrap();
            assert!(stall.is_free());
            assert!(!stall.is_fixed);
            assert!(stall.group_id.is_none());
        }
        snapshot.verify().unwrap();
    }

    #[test]
    fn vacate_of_single_stall_leaves_neighbors_alone() {
        let base = assign(&catalog::generate(), StallId::new(5), &occupied("Ana"), 1);
        let base = assign(&base, StallId::new(6), &occupied("Luis"), 1);

        let snapshot = vacate(&base, StallId::new(5));
        assert!(snapshot.get(StallId::new(5)).unwrap().is_free());
        assert_eq!(snapshot.get(StallId::new(6)).unwrap().vendor_name, "Luis");
    }

    #[test]
    fn run_is_capped_at_max_pack_size() {
        // Verde index 0 has 35 free stalls ahead of it.
        let run = max_available_run(&catalog::generate(), StallId::new(1));
        assert_eq!(run, MAX_PACK_SIZE);
    }

    #[test]
    fn run_stops_at_occupied_neighbor() {
        let snapshot = assign(&catalog::generate(), StallId::new(3), &occupied("Ana"), 1);
        // Ids 1 and 2 are free; id 3 is occupied.
        assert_eq!(max_available_run(&snapshot, StallId::new(1)), 2);
    }

    #[test]
    fn run_stops_at_category_boundary() {
        // Rosa holds ids 72..=77; id 76 is its second-to-last stall.
        let snapshot = catalog::generate();
        assert_eq!(max_available_run(&snapshot, StallId::new(76)), 2);
        assert_eq!(max_available_run(&snapshot, StallId::new(77)), 1);
    }

    #[test]
    fn run_for_a_pack_is_its_own_size() {
        let snapshot = assign(&catalog::generate(), StallId::new(1), &occupied("Ana"), 3);
        assert_eq!(max_available_run(&snapshot, StallId::new(2)), 3);
    }

    proptest! {
        #[test]
        fn run_never_exceeds_cap_or_crosses_occupied(
            target in 1u32..=77,
            occupied_id in 1u32..=77,
        ) {
            let base = assign(
                &catalog::generate(),
                StallId::new(occupied_id),
                &occupied("X"),
                1,
            );
            let run = max_available_run(&base, StallId::new(target));

            prop_assert!(run >= 1);
            prop_assert!(run <= MAX_PACK_SIZE);

            let anchor = base.get(StallId::new(target)).unwrap();
            // Every counted follower is free and in the same category.
            for offset in 1..run {
                let follower = base
                    .stall_at(anchor.category, anchor.index_in_category + offset)
                    .unwrap();
                prop_assert!(follower.is_free());
            }
        }

        #[test]
        fn group_invariants_survive_random_assign_vacate(
            ops in prop::collection::vec((1u32..=77, 1u8..=4, prop::bool::ANY), 1..12),
        ) {
            let mut snapshot = catalog::generate();

            for (id, requested, release) in ops {
                let target = StallId::new(id);
                if release {
                    snapshot = vacate(&snapshot, target);
                } else {
                    let available = max_available_run(&snapshot, target);
                    let requested = requested.min(available);
                    snapshot = assign(&snapshot, target, &occupied("prop"), requested);
                }

                prop_assert!(snapshot.verify().is_ok());
            }
        }
    }
}
