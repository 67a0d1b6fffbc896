//! Feria — date-indexed stall occupancy for street markets.
//!
//! ## Crate layout
//! - `core`: the engine — catalog, snapshots, the date store, the
//!   fixed-vendor roster, materialization, mutation, and the session.
//! - the optional `shell` feature adds an interactive driver binary; it is a
//!   collaborator of the engine, never part of it.
//!
//! The `prelude` module mirrors the surface a collaborator uses.

pub use feria_core as core;

pub use feria_core::{Error, MAX_PACK_SIZE};

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use feria_core::prelude::*;
    pub use feria_core::{
        catalog,
        storage::{DirBackend, MemoryBackend, StorageBackend},
        store::Db,
    };
}
