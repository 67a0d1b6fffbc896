//! Core runtime for Feria: the stall catalog, day snapshots, the date-keyed
//! store, the fixed-vendor roster, the day materializer, occupancy mutation,
//! and the session surface exported via the `prelude`.

pub mod catalog;
pub mod date;
pub mod error;
pub mod group;
pub mod materialize;
pub mod mutate;
pub mod obs;
pub mod serialize;
pub mod session;
pub mod snapshot;
pub mod stall;
pub mod stats;
pub mod storage;
pub mod store;

pub use error::Error;

///
/// CONSTANTS
///

/// Maximum number of contiguous stalls a single pack may span.
///
/// Bounds the forward scan in [`mutate::max_available_run`] regardless of how
/// much contiguous free space exists.
pub const MAX_PACK_SIZE: u8 = 4;

///
/// Prelude
///
/// Domain vocabulary only. No errors, stores, serializers, or helpers are
/// re-exported here.
///

pub mod prelude {
    pub use crate::{
        catalog::{Category, ColorKey},
        date::Date,
        group::GroupId,
        mutate::OccupancyEdit,
        session::{Draft, DraftField, Session},
        snapshot::Snapshot,
        stall::{Stall, StallId, Status},
        stats::DayStats,
        store::roster::{Roster, RosterEntry},
    };
}
