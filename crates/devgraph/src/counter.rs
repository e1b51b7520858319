//! Named counters for devices and arrows.

use std::fmt;

/// A signed counter altered by the diagram on create and delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    name: &'static str,
    count: i64,
}

impl Counter {
    pub fn new(name: &'static str) -> Self {
        Self { name, count: 0 }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    /// Adds `delta` (which may be negative) and returns the new count.
    pub fn alter_count(&mut self, delta: i64) -> i64 {
        self.count += delta;
        self.count
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.count)
    }
}
