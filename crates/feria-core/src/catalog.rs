use crate::{
    snapshot::Snapshot,
    stall::{Stall, StallId},
};
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// Category
///
/// The four physical rows of the market. Capacities and row metadata are
/// compile-time constants; the catalog is the single source of truth for
/// topology.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum Category {
    Verde,
    Amarillo,
    Rojo,
    Rosa,
}

impl Category {
    pub const ALL: [Self; 4] = [Self::Verde, Self::Amarillo, Self::Rojo, Self::Rosa];

    /// Number of stalls in this category's row.
    #[must_use]
    pub const fn capacity(self) -> u8 {
        match self {
            Self::Verde => 36,
            Self::Amarillo => 26,
            Self::Rojo => 9,
            Self::Rosa => 6,
        }
    }

    #[must_use]
    pub const fn color_key(self) -> ColorKey {
        match self {
            Self::Verde => ColorKey::Green,
            Self::Amarillo => ColorKey::Yellow,
            Self::Rojo => ColorKey::Red,
            Self::Rosa => ColorKey::Pink,
        }
    }

    #[must_use]
    pub const fn row_name(self) -> &'static str {
        match self {
            Self::Verde => "Fila 1 - Sector General",
            Self::Amarillo => "Fila 2 - Sector Central",
            Self::Rojo => "Fila 2.5 - Sector Premium",
            Self::Rosa => "Fila 3 - Sector Exclusivo",
        }
    }

    /// Display-number prefix. Rojo and Rosa share `R`; the prefix is a label,
    /// not an identity.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Verde => 'V',
            Self::Amarillo => 'A',
            Self::Rojo | Self::Rosa => 'R',
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Verde => "Verde",
            Self::Amarillo => "Amarillo",
            Self::Rojo => "Rojo",
            Self::Rosa => "Rosa",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

///
/// ColorKey
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorKey {
    Green,
    Yellow,
    Red,
    Pink,
}

/// Total catalog size across all categories.
pub const TOTAL_STALLS: usize = 36 + 26 + 9 + 6;

/// Generate the blank template: every stall slot with free defaults.
///
/// Ids are assigned sequentially from 1 in category order; per-category
/// indices start at 0. Idempotent in shape across calls.
#[must_use]
pub fn generate() -> Snapshot {
    let mut stalls = Vec::with_capacity(TOTAL_STALLS);
    let mut id = 1;

    for category in Category::ALL {
        for index in 0..category.capacity() {
            stalls.push(Stall::blank(StallId::new(id), category, index));
            id += 1;
        }
    }

    Snapshot::new(stalls)
}

///
/// TESTS
///
