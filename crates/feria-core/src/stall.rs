use crate::{
    catalog::{Category, ColorKey},
    group::GroupId,
};
use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize};

///
/// StallId
///
/// Stable integer identity, assigned once at catalog-generation time and
/// never reused or reassigned.
///

#[derive(
    Clone, Copy, Debug, Display, Eq, FromStr, Hash, Ord, PartialEq, PartialOrd, Deserialize,
    Serialize,
)]
#[repr(transparent)]
#[serde(transparent)]
pub struct StallId(u32);

impl StallId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

///
/// Status
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Free,
    Occupied,
}

///
/// Stall
///
/// One slot in the fixed physical layout. Identity fields (`id`, `number`,
/// `category`, `color_key`, `row_name`, `index_in_category`) are set at
/// generation and never change; the remaining fields describe one day's
/// occupancy.
///

#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Stall {
    pub id: StallId,
    pub number: String,
    pub category: Category,
    pub color_key: ColorKey,
    pub row_name: String,
    pub index_in_category: u8,

    pub status: Status,
    pub vendor_name: String,
    pub description: String,
    pub notes: String,
    pub is_fixed: bool,
    pub group_id: Option<GroupId>,
    pub group_size: u8,
    pub has_paid: bool,
    pub attended: bool,
}

impl Stall {
    /// A free stall at the given catalog position.
    #[must_use]
    pub fn blank(id: StallId, category: Category, index_in_category: u8) -> Self {
        Self {
            id,
            number: format!("{}-{}", category.prefix(), index_in_category + 1),
            category,
            color_key: category.color_key(),
            row_name: category.row_name().to_string(),
            index_in_category,
            status: Status::Free,
            vendor_name: String::new(),
            description: String::new(),
            notes: String::new(),
            is_fixed: false,
            group_id: None,
            group_size: 1,
            has_paid: false,
            attended: false,
        }
    }

    #[must_use]
    pub fn is_free(&self) -> bool {
        self.status == Status::Free
    }

    /// Reset every occupancy field to its free default. Identity fields are
    /// untouched.
    pub fn clear_occupancy(&mut self) {
        self.status = Status::Free;
        self.vendor_name.clear();
        self.description.clear();
        self.notes.clear();
        self.is_fixed = false;
        self.group_id = None;
        self.group_size = 1;
        self.has_paid = false;
        self.attended = false;
    }
}

///
/// TESTS
///
