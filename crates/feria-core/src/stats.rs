use crate::snapshot::Snapshot;

/// Flat per-day stall fee, charged once per paid stall.
pub const STALL_FEE: u32 = 1_500;

///
/// DayStats
///
/// Derived statistics for one day's snapshot. Pure read-model; never
/// persisted.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DayStats {
    pub occupied: usize,
    pub fixed: usize,
    pub paid: usize,
    pub attended: usize,
}

impl DayStats {
    #[must_use]
    pub fn for_snapshot(snapshot: &Snapshot) -> Self {
        let mut stats = Self::default();

        for stall in snapshot.iter() {
            if stall.is_free() {
                continue;
            }
            stats.occupied += 1;
            if stall.is_fixed {
                stats.fixed += 1;
            }
            if stall.has_paid {
                stats.paid += 1;
            }
            if stall.attended {
                stats.attended += 1;
            }
        }

        stats
    }

    /// Attendance as a whole percentage of occupied stalls; zero when the
    /// day has no occupancy.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub fn attendance_rate(&self) -> u8 {
        if self.occupied == 0 {
            return 0;
        }

        ((self.attended * 100 + self.occupied / 2) / self.occupied) as u8
    }

    /// Fees collected so far today.
    #[must_use]
    pub const fn fees_collected(&self) -> u64 {
        self.paid as u64 * STALL_FEE as u64
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
        mutate::{self, OccupancyEdit},
        stall::{StallId, Status},
    };

    #[test]
    fn blank_day_has_zero_stats() {
        let stats = DayStats::for_snapshot(&catalog::generate());
        assert_eq!(stats, DayStats::default());
        assert_eq!(stats.attendance_rate(), 0);
        assert_eq!(stats.fees_collected(), 0);
    }

    #[test]
    fn counts_follow_the_snapshot() {
        let mut snapshot = catalog::generate();
        for (id, paid, attended) in [(1, true, true), (2, true, false), (40, false, true)] {
            let edit = OccupancyEdit {
                status: Status::Occupied,
                vendor_name: format!("vendor-{id}"),
                is_fixed: id == 40,
                has_paid: paid,
                attended,
                ..OccupancyEdit::default()
            };
            snapshot = mutate::assign(&snapshot, StallId::new(id), &edit, 1);
        }

        let stats = DayStats::for_snapshot(&snapshot);
        assert_eq!(stats.occupied, 3);
        assert_eq!(stats.fixed, 1);
        assert_eq!(stats.paid, 2);
        assert_eq!(stats.attended, 2);
        assert_eq!(stats.fees_collected(), 3_000);
        assert_eq!(stats.attendance_rate(), 67);
    }
}
