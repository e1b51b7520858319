//! Identifier management using string interning
//!
//! This module provides the [`Id`] type used for device type tags. Type tags
//! are compared on every palette lookup and registry access, so they are
//! interned once and passed around as a `Copy` symbol.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Efficient identifier type using string interning
///
/// # Examples
///
/// ```
/// use devgraph_core::identifier::Id;
///
/// let sensor = Id::new("sensor");
/// let again: Id = "sensor".into();
///
/// assert_eq!(sensor, again);
/// assert_eq!(sensor, "sensor");
/// assert_eq!(sensor.to_string(), "sensor");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str, interning it on first use.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{str_value}")
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "sensor"`
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        interner.resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("machine");
        let id2 = Id::new("machine");
        let id3 = Id::new("sensor");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "machine");
    }

    #[test]
    fn test_display_trait() {
        let id = Id::new("conveyor");
        assert_eq!(format!("{id}"), "conveyor");
    }

    #[test]
    fn test_from_trait() {
        let id1: Id = "valve".into();
        assert_eq!(id1, Id::new("valve"));
    }

    #[test]
    fn test_hash_and_eq() {
        let mut map = HashMap::new();
        map.insert(Id::new("key1"), "value1");
        map.insert(Id::new("key2"), "value2");

        assert_eq!(map.get(&Id::new("key1")), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_partial_eq_str() {
        let id = Id::new("temperature-sensor");

        assert!(id == "temperature-sensor");
        assert!(id != "temperature");

        let empty = Id::new("");
        assert!(empty == "");
    }
}
