use crate::error::{Error, Result};
use crate::trail::mountain::Mountain;

/// Keeps mountains ranked by (length, difficulty, name).
#[derive(Default)]
pub struct MountainOrganiser {
    /// Sorted by the `Mountain` ordering at all times.
    mountains: Vec<Mountain>,
}

impl MountainOrganiser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a batch of mountains and re-establishes the ranking.
    pub fn add_mountains(&mut self, mountains: Vec<Mountain>) {
        self.mountains.extend(mountains);
        self.mountains.sort();
    }

    /// Rank of `mountain` among everything added so far, starting at 0.
    pub fn rank_of(&self, mountain: &Mountain) -> Result<usize> {
        self.mountains
            .binary_search(mountain)
            .map_err(|_| Error::KeyNotFound(mountain.name.clone()))
    }

    pub fn len(&self) -> usize {
        self.mountains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mountains.is_empty()
    }
}
