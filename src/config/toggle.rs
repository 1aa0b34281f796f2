//! Option groups that accept either a boolean or a table.
//!
//! `mangle = false` disables a group, `mangle = true` enables it with
//! defaults, and `mangle = { toplevel = true }` enables it with overrides.
//! The deserializer is written by hand instead of `#[serde(untagged)]`:
//! untagged enums buffer their input, which would hide unknown keys inside
//! the table from `serde_ignored`.

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;
use std::marker::PhantomData;

/// A boolean switch or a group of explicit settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle<T> {
    Enabled(bool),
    Custom(T),
}

impl<T> Toggle<T> {
    /// Whether the group is switched on (any table counts as on).
    pub const fn is_enabled(&self) -> bool {
        match self {
            Self::Enabled(on) => *on,
            Self::Custom(_) => true,
        }
    }

    /// Explicit settings, if a table was given.
    pub const fn custom(&self) -> Option<&T> {
        match self {
            Self::Custom(inner) => Some(inner),
            Self::Enabled(_) => None,
        }
    }
}

impl<T> From<bool> for Toggle<T> {
    fn from(on: bool) -> Self {
        Self::Enabled(on)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Toggle<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ToggleVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for ToggleVisitor<T> {
            type Value = Toggle<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a boolean or a table of options")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(Toggle::Enabled(v))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                T::deserialize(de::value::MapAccessDeserializer::new(map)).map(Toggle::Custom)
            }
        }

        deserializer.deserialize_any(ToggleVisitor(PhantomData))
    }
}
