use crate::{
    catalog::{self, Category},
    group::GroupId,
    stall::{Stall, StallId},
};
use derive_more::{Deref, DerefMut};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// SnapshotError
///

#[derive(Debug, ThisError)]
pub enum SnapshotError {
    #[error("snapshot invariant violation: {message}")]
    InvariantViolation { message: String },
}

impl SnapshotError {
    fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }
}

///
/// Snapshot
///
/// The ordered collection of every stall for one calendar date. Owned
/// exclusively by the active date context and replaced wholesale on date
/// change.
///

#[derive(Clone, Debug, Default, Deref, DerefMut, Eq, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Snapshot(Vec<Stall>);

impl Snapshot {
    #[must_use]
    pub const fn new(stalls: Vec<Stall>) -> Self {
        Self(stalls)
    }

    #[must_use]
    pub fn get(&self, id: StallId) -> Option<&Stall> {
        self.0.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: StallId) -> Option<&mut Stall> {
        self.0.iter_mut().find(|s| s.id == id)
    }

    /// Stall at a category-relative position, if the index is in range.
    #[must_use]
    pub fn stall_at(&self, category: Category, index: u8) -> Option<&Stall> {
        self.0
            .iter()
            .find(|s| s.category == category && s.index_in_category == index)
    }

    pub fn group_members(&self, group_id: GroupId) -> impl Iterator<Item = &Stall> {
        self.0.iter().filter(move |s| s.group_id == Some(group_id))
    }

    /// Check the structural invariants: catalog topology, free-stall
    /// defaults, and pack coherence (shared fields, contiguity, cardinality).
    ///
    /// Run at load boundaries; a failure means the persisted record is
    /// corrupt or was produced by broken code.
    pub fn verify(&self) -> Result<(), SnapshotError> {
        if self.0.len() != catalog::TOTAL_STALLS {
            return Err(SnapshotError::invariant(format!(
                "expected {} stalls, found {}",
                catalog::TOTAL_STALLS,
                self.0.len()
            )));
        }

        for (position, stall) in self.0.iter().enumerate() {
            if stall.id.get() as usize != position + 1 {
                return Err(SnapshotError::invariant(format!(
                    "stall at position {position} has id {}",
                    stall.id
                )));
            }

            if stall.is_free()
                && (!stall.vendor_name.is_empty()
                    || stall.group_id.is_some()
                    || stall.group_size != 1
                    || stall.has_paid
                    || stall.attended)
            {
                return Err(SnapshotError::invariant(format!(
                    "free stall {} carries occupancy data",
                    stall.id
                )));
            }
        }

        let mut groups: BTreeMap<GroupId, Vec<&Stall>> = BTreeMap::new();
        for stall in &self.0 {
            if let Some(group_id) = stall.group_id {
                groups.entry(group_id).or_default().push(stall);
            }
        }

        for (group_id, members) in groups {
            let head = members[0];

            if members.len() != head.group_size as usize {
                return Err(SnapshotError::invariant(format!(
                    "group {group_id} has {} members but group_size {}",
                    members.len(),
                    head.group_size
                )));
            }

            for pair in members.windows(2) {
                if pair[1].category != pair[0].category
                    || pair[1].index_in_category != pair[0].index_in_category + 1
                {
                    return Err(SnapshotError::invariant(format!(
                        "group {group_id} is not contiguous at stall {}",
                        pair[1].id
                    )));
                }
            }

            for member in &members {
                if member.vendor_name != head.vendor_name
                    || member.description != head.description
                    || member.is_fixed != head.is_fixed
                    || member.group_size != head.group_size
                {
                    return Err(SnapshotError::invariant(format!(
                        "group {group_id} members diverge at stall {}",
                        member.id
                    )));
                }
            }
        }

        Ok(())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stall::Status;

    fn occupy_run(snapshot: &mut Snapshot, ids: &[u32], vendor: &str, group_id: GroupId) {
        #[expect(clippy::cast_possible_truncation)]
        let size = ids.len() as u8;
        for id in ids {
            let stall = snapshot.get_mut(StallId::new(*id)).unwrap();
            stall.status = Status::Occupied;
            stall.vendor_name = vendor.into();
            stall.group_id = Some(group_id);
            stall.group_size = size;
        }
    }

    #[test]
    fn blank_template_verifies() {
        catalog::generate().verify().unwrap();
    }

    #[test]
    fn lookup_by_id_and_position_agree() {
        let snapshot = catalog::generate();
        let by_id = snapshot.get(StallId::new(37)).unwrap();
        let by_pos = snapshot.stall_at(Category::Amarillo, 0).unwrap();
        assert_eq!(by_id.id, by_pos.id);
    }

    #[test]
    fn contiguous_group_verifies() {
        let mut snapshot = catalog::generate();
        occupy_run(&mut snapshot, &[2, 3, 4], "Ana", GroupId::generate());
        snapshot.verify().unwrap();
    }

    #[test]
    fn gap_in_group_is_rejected() {
        let mut snapshot = catalog::generate();
        occupy_run(&mut snapshot, &[2, 4], "Ana", GroupId::generate());
        assert!(snapshot.verify().is_err());
    }

    #[test]
    fn group_size_mismatch_is_rejected() {
        let mut snapshot = catalog::generate();
        let group_id = GroupId::generate();
        occupy_run(&mut snapshot, &[2, 3], "Ana", group_id);
        snapshot.get_mut(StallId::new(2)).unwrap().group_size = 3;
        assert!(snapshot.verify().is_err());
    }

    #[test]
    fn diverging_vendor_in_group_is_rejected() {
        let mut snapshot = catalog::generate();
        occupy_run(&mut snapshot, &[2, 3], "Ana", GroupId::generate());
        snapshot.get_mut(StallId::new(3)).unwrap().vendor_name = "Luis".into();
        assert!(snapshot.verify().is_err());
    }

    #[test]
    fn free_stall_with_vendor_is_rejected() {
        let mut snapshot = catalog::generate();
        snapshot.get_mut(StallId::new(1)).unwrap().vendor_name = "ghost".into();
        assert!(snapshot.verify().is_err());
    }

    #[test]
    fn cross_category_group_is_rejected() {
        let mut snapshot = catalog::generate();
        // Verde ends at id 36; Amarillo starts at id 37.
        occupy_run(&mut snapshot, &[36, 37], "Ana", GroupId::generate());
        assert!(snapshot.verify().is_err());
    }

    #[test]
    fn truncated_snapshot_is_rejected() {
        let mut snapshot = catalog::generate();
        snapshot.pop();
        assert!(snapshot.verify().is_err());
    }
}
