use derive_more::{Display, FromStr};
use serde::{Deserialize, Serialize, de::Deserializer, ser::Serializer};
use std::sync::{LazyLock, Mutex};
use ulid::Ulid;

///
/// GENERATOR is lazily initiated with a Mutex
/// it has to keep state so ids stay monotonic within a millisecond
///

static GENERATOR: LazyLock<Mutex<ulid::Generator>> =
    LazyLock::new(|| Mutex::new(ulid::Generator::new()));

///
/// GroupId
///
/// Identifier shared by every stall of one contiguous pack. Minted once when
/// a multi-stall assignment is created and never reused.
///

#[derive(Clone, Copy, Debug, Display, Eq, FromStr, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct GroupId(Ulid);

impl GroupId {
    #[must_use]
    pub const fn nil() -> Self {
        Self(Ulid::nil())
    }

    /// Mint a fresh group id.
    ///
    /// Monotonic within a millisecond; falls back to a plain ulid if the
    /// monotonic generator overflows its random component.
    #[must_use]
    pub fn generate() -> Self {
        let mut generator = GENERATOR.lock().expect("group id generator mutex poisoned");

        generator.generate().map_or_else(|_| Self(Ulid::new()), Self)
    }
}

impl Serialize for GroupId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for GroupId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid group id: {s}")))
    }
}

///
/// TESTS
///
