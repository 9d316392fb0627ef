use crate::error::{Error, Result};
use crate::trail::mountain::Mountain;

/// A flat collection of mountains with difficulty-based queries.
#[derive(Default)]
pub struct MountainManager {
    mountains: Vec<Mountain>,
}

impl MountainManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mountain(&mut self, mountain: Mountain) {
        self.mountains.push(mountain);
    }

    /// Removes a mountain; `KeyNotFound` if it was never added.
    pub fn remove_mountain(&mut self, mountain: &Mountain) -> Result<()> {
        match self.mountains.iter().position(|m| m == mountain) {
            Some(index) => {
                self.mountains.remove(index);
                Ok(())
            }
            None => Err(Error::KeyNotFound(mountain.name.clone())),
        }
    }

    /// Replaces `old` with `new` in place.
    pub fn edit_mountain(&mut self, old: &Mountain, new: Mountain) -> Result<()> {
        match self.mountains.iter().position(|m| m == old) {
            Some(index) => {
                self.mountains[index] = new;
                Ok(())
            }
            None => Err(Error::KeyNotFound(old.name.clone())),
        }
    }

    /// All mountains with exactly this difficulty, in insertion order.
    pub fn with_difficulty(&self, difficulty: u32) -> Vec<&Mountain> {
        self.mountains
            .iter()
            .filter(|m| m.difficulty == difficulty)
            .collect()
    }

    /// All mountains grouped by difficulty, groups in ascending order.
    pub fn group_by_difficulty(&self) -> Vec<Vec<&Mountain>> {
        let mut sorted: Vec<&Mountain> = self.mountains.iter().collect();
        sorted.sort_by_key(|m| m.difficulty);

        let mut groups: Vec<Vec<&Mountain>> = Vec::new();
        for mountain in sorted {
            match groups.last_mut() {
                Some(group) if group[0].difficulty == mountain.difficulty => {
                    group.push(mountain);
                }
                _ => groups.push(vec![mountain]),
            }
        }
        groups
    }

    pub fn len(&self) -> usize {
        self.mountains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mountains.is_empty()
    }
}
