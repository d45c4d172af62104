//! Name-based duplicate filtering.

use std::collections::HashSet;

use crate::models::Place;

/// Remembers every accepted place name for the rest of the run.
///
/// Names are compared literally: no trimming and no case folding.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `place` if its name is non-empty and not seen before.
    pub fn accept(&mut self, place: &Place) -> bool {
        !place.name.is_empty() && self.seen.insert(place.name.clone())
    }
}
